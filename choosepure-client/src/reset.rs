//! Password reset flow
//!
//! Drives [`PasswordReset`] against the `/password-reset` endpoints. Local
//! validation always runs first; an input rejected locally never reaches
//! the network.

use std::sync::Arc;

use tokio::task::JoinHandle;

use choosepure_core::reset::RETURN_TO_LOGIN_DELAY;
use choosepure_core::{PasswordReset, ResetStep};

use crate::error::{ClientError, ClientResult};
use crate::state::AppState;
use crate::ui::{Notification, Route};

pub struct PasswordResetFlow {
    state: Arc<AppState>,
    machine: PasswordReset,
    return_to_login: Option<JoinHandle<()>>,
}

impl PasswordResetFlow {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            machine: PasswordReset::new(),
            return_to_login: None,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.machine.step()
    }

    pub fn email(&self) -> &str {
        self.machine.email()
    }

    /// The code echoed by the server, only when debug secrets are exposed
    pub fn echoed_code(&self) -> Option<&str> {
        if self.state.config.expose_debug_secrets {
            self.machine.echoed_code()
        } else {
            None
        }
    }

    /// Step 1: ask the server to send a code to `email`
    pub async fn request_code(&mut self, email: &str) -> ClientResult<()> {
        if let Err(e) = self.machine.set_email(email) {
            return Err(self.reject(e.into()));
        }
        self.send_code().await
    }

    /// Ask for another code while waiting for one
    pub async fn resend_code(&mut self) -> ClientResult<()> {
        if self.machine.step() != ResetStep::AwaitingCode {
            return Err(ClientError::from(choosepure_core::Error::InvalidResetStep(
                self.machine.step(),
            )));
        }
        self.send_code().await
    }

    async fn send_code(&mut self) -> ClientResult<()> {
        let email = self.machine.email().to_string();
        match self.state.api.request_reset(&email).await {
            Ok(ack) => {
                self.machine.code_requested(ack.reset_token)?;
                tracing::info!(step = %self.machine.step(), "Reset code requested");
                self.state.notify(Notification::info(
                    "Code Sent!",
                    "Check your email for the 6-digit reset code",
                ));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reset code request failed");
                self.state.notify(Notification::error(
                    "Error",
                    e.user_message("Failed to send reset code"),
                ));
                Err(e)
            }
        }
    }

    /// Update the code field; returns what the field now shows
    pub fn input_code(&mut self, input: &str) -> String {
        self.machine.input_code(input).to_string()
    }

    /// Step 2: check the entered code with the server
    pub async fn verify_code(&mut self) -> ClientResult<()> {
        let code = match self.machine.submittable_code() {
            Ok(code) => code.to_string(),
            Err(e) => return Err(self.reject(e.into())),
        };
        let email = self.machine.email().to_string();

        match self.state.api.verify_reset_code(&email, &code).await {
            Ok(_) => {
                self.machine.code_verified()?;
                tracing::info!(step = %self.machine.step(), "Reset code verified");
                self.state
                    .notify(Notification::info("Code Verified!", "Now set your new password"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reset code rejected");
                self.state.notify(Notification::error(
                    "Invalid Code",
                    e.user_message("The code is invalid or expired"),
                ));
                Err(e)
            }
        }
    }

    /// Step 3: set the new password.
    ///
    /// On success the flow schedules a return to the login entry point after
    /// [`RETURN_TO_LOGIN_DELAY`].
    pub async fn reset_password(
        &mut self,
        new_password: &str,
        confirm_password: &str,
    ) -> ClientResult<()> {
        if let Err(e) = self
            .machine
            .check_new_password(new_password, confirm_password)
        {
            return Err(self.reject(e.into()));
        }
        let email = self.machine.email().to_string();
        let code = self.machine.code().to_string();

        match self
            .state
            .api
            .reset_password(&email, &code, new_password)
            .await
        {
            Ok(_) => {
                self.machine.password_reset()?;
                tracing::info!("Password reset complete");
                self.state
                    .notify(Notification::info("Success!", "Your password has been reset"));
                self.schedule_return_to_login();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Password reset failed");
                self.state.notify(Notification::error(
                    "Error",
                    e.user_message("Failed to reset password"),
                ));
                Err(e)
            }
        }
    }

    /// Go back one step
    pub fn back(&mut self) -> ClientResult<()> {
        self.machine.back()?;
        Ok(())
    }

    /// Wait for the scheduled return to login, if one is pending
    pub async fn wait_for_return(&mut self) {
        if let Some(handle) = self.return_to_login.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Return to login task failed");
            }
        }
    }

    fn schedule_return_to_login(&mut self) {
        let navigator = self.state.navigator.clone();
        self.return_to_login = Some(tokio::spawn(async move {
            tokio::time::sleep(RETURN_TO_LOGIN_DELAY).await;
            navigator.redirect(Route::Login);
        }));
    }

    /// Notify about a local rejection and hand the error back
    fn reject(&self, err: ClientError) -> ClientError {
        if let ClientError::Validation(invalid) = &err {
            self.state
                .notify(Notification::error(invalid.title, invalid.message.clone()));
        }
        err
    }
}
