//! Login, registration and logout

use choosepure_core::{AuthToken, Session, UserProfile};

use crate::api::{AuthResponse, Credentials, Registration};
use crate::error::ClientResult;
use crate::state::AppState;
use crate::ui::Notification;

fn establish(state: &AppState, response: AuthResponse) -> ClientResult<Session> {
    let session = Session::new(AuthToken::new(response.token), response.user);
    state.session.establish(session.clone())?;
    Ok(session)
}

/// Log in and persist the session.
///
/// A rejected login leaves any existing session untouched, except a 401,
/// which follows the global sign-out policy.
pub async fn login(state: &AppState, credentials: &Credentials) -> ClientResult<Session> {
    let result = state
        .api
        .login(credentials)
        .await
        .and_then(|response| establish(state, response));

    match result {
        Ok(session) => {
            state.notify(Notification::info(
                "Welcome back!",
                format!("Logged in as {}", session.user.name),
            ));
            state.refresh_subscription().await;
            Ok(session)
        }
        Err(e) => {
            tracing::warn!(email = %credentials.email, error = %e, "Login failed");
            state.notify(Notification::error("Login Failed", e.user_message("Login failed")));
            Err(e)
        }
    }
}

pub async fn register(state: &AppState, registration: &Registration) -> ClientResult<Session> {
    let result = state
        .api
        .register(registration)
        .await
        .and_then(|response| establish(state, response));

    match result {
        Ok(session) => {
            state.notify(Notification::info(
                "Account Created!",
                "Welcome to ChoosePure community",
            ));
            state.refresh_subscription().await;
            Ok(session)
        }
        Err(e) => {
            tracing::warn!(email = %registration.email, error = %e, "Registration failed");
            state.notify(Notification::error(
                "Registration Failed",
                e.user_message("Registration failed"),
            ));
            Err(e)
        }
    }
}

/// Clear the session locally; no server call is made
pub fn logout(state: &AppState) {
    state.session.clear();
    state.set_subscription(Default::default());
    tracing::info!("Logged out");
    state.notify(Notification::info("Logged Out", "You have been logged out"));
}

/// Fetch the current profile from the server and refresh the stored copy
pub async fn current_user(state: &AppState) -> ClientResult<UserProfile> {
    let user = state.api.me().await?;
    state.session.update_user(user.clone())?;
    Ok(user)
}
