//! ChoosePure command-line client
//!
//! Drives the community platform's flows from a terminal against a running
//! backend. Payments are completed out of band and their gateway response
//! pasted back in.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use choosepure_client::admin::{
    denied_link, AdminPanel, AdminResource, BlogPosts, SubscriptionTiers, TestReports,
    UpcomingTests,
};
use choosepure_client::api::{Credentials, Registration, ReportQuery};
use choosepure_client::checkout::{
    load_plans, Donation, DonationDetails, ReportPurchaseDetails, ReportPurchaseKind,
    SubscriptionCheckout,
};
use choosepure_client::reports::ReportCatalog;
use choosepure_client::reset::PasswordResetFlow;
use choosepure_client::voting::VotingBoard;
use choosepure_client::{
    auth, AppState, CheckoutFlow, CheckoutKind, Config, ConsoleUi, ConsoleWidget,
    InMemoryStorage, LazyWidget, SqliteStorage, Storage,
};
use choosepure_core::voting::NewSuggestion;
use choosepure_core::{CheckoutStatus, ResetStep, ScoreView};

#[derive(Parser)]
#[command(name = "choosepure", version, about = "ChoosePure community platform client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and keep the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List test reports as the current user may see them
    Reports {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// List subscription plans
    Plans,
    /// List product suggestions open for voting
    Suggestions,
    /// Vote for a product suggestion
    Vote { id: String },
    /// Suggest a product for testing
    Suggest {
        #[arg(long)]
        product_name: String,
        #[arg(long)]
        brand: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Donate towards testing
    Donate {
        #[arg(long, default_value_t = 500.0)]
        amount: f64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Subscribe to a plan
    Subscribe { plan_id: String },
    /// Buy the full milk quality report
    BuyReport {
        #[arg(long)]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        pincode: String,
    },
    /// Reset a forgotten password
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Manage content (admins only)
    Admin {
        #[arg(value_enum)]
        resource: AdminTarget,
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AdminTarget {
    Reports,
    Blog,
    UpcomingTests,
    Tiers,
}

#[derive(Subcommand)]
enum AdminAction {
    List,
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "choosepure_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");

    let storage: Arc<dyn Storage> = match &config.storage_path {
        Some(path) => Arc::new(
            SqliteStorage::open(path)
                .with_context(|| format!("opening session storage {}", path.display()))?,
        ),
        None => Arc::new(InMemoryStorage::new()),
    };

    let ui = Arc::new(ConsoleUi::new());
    let widget = Arc::new(LazyWidget::new(ConsoleWidget::new(
        config.checkout_script_url.clone(),
    )));
    let state = Arc::new(AppState::new(config, storage, ui.clone(), ui.clone())?);

    match cli.command {
        Command::Login { email, password } => {
            let password = password_or_prompt(password)?;
            auth::login(&state, &Credentials { email, password }).await?;
        }
        Command::Register {
            name,
            email,
            mobile,
            password,
        } => {
            let password = password_or_prompt(password)?;
            auth::register(
                &state,
                &Registration {
                    name,
                    email,
                    mobile,
                    password,
                },
            )
            .await?;
        }
        Command::Logout => auth::logout(&state),
        Command::Whoami => {
            let user = auth::current_user(&state).await?;
            let subscription = state.refresh_subscription().await;
            println!("{} <{}>", user.name, user.email);
            println!("admin: {}", user.is_admin());
            if subscription.is_subscribed {
                println!("subscribed, {} days remaining", subscription.days_remaining);
            } else {
                println!("not subscribed");
            }
        }
        Command::Reports { category, search } => {
            let catalog = ReportCatalog::load(state.clone(), &ReportQuery { category, search }).await?;
            for report in catalog.gated() {
                let score = match report.score {
                    ScoreView::Score(score) => format!("{:.1}", score),
                    ScoreView::Unscored => "-".to_string(),
                    ScoreView::Locked => "locked (subscribe to see)".to_string(),
                };
                println!(
                    "{}  {} / {}  score: {}",
                    report.id, report.product_name, report.brand, score
                );
            }
        }
        Command::Plans => {
            for plan in load_plans(&state).await {
                println!(
                    "{}  {}  ₹{} / {} days{}",
                    plan.id,
                    plan.name,
                    plan.price,
                    plan.duration_days,
                    if plan.popular { "  (popular)" } else { "" }
                );
            }
        }
        Command::Suggestions => {
            let board = VotingBoard::load(state.clone()).await?;
            if let Some(votes) = board.user_votes() {
                println!(
                    "votes left this month: {} of {}",
                    votes.votes_remaining, votes.monthly_vote_limit
                );
            }
            for suggestion in board.suggestions() {
                println!(
                    "{}  {} by {}  {}/{} votes  [{:?}]",
                    suggestion.id,
                    suggestion.product_name,
                    suggestion.brand,
                    suggestion.votes,
                    suggestion.vote_threshold,
                    board.gate(&suggestion.id)
                );
            }
        }
        Command::Vote { id } => {
            let mut board = VotingBoard::load(state.clone()).await?;
            board.vote(&id).await?;
        }
        Command::Suggest {
            product_name,
            brand,
            category,
            description,
        } => {
            let mut board = VotingBoard::load(state.clone()).await?;
            board
                .suggest(&NewSuggestion {
                    product_name,
                    brand,
                    category,
                    description,
                })
                .await?;
        }
        Command::Donate {
            amount,
            name,
            email,
            phone,
            message,
        } => {
            let donation = Donation::new(DonationDetails {
                amount,
                donor_name: name,
                donor_email: email,
                donor_phone: phone,
                message,
            });
            run_checkout(CheckoutFlow::new(state.clone(), widget, donation)).await?;
        }
        Command::Subscribe { plan_id } => {
            let plan = load_plans(&state)
                .await
                .into_iter()
                .find(|plan| plan.id == plan_id)
                .with_context(|| format!("no plan with id {}", plan_id))?;
            let mut kind = SubscriptionCheckout::new();
            kind.select(plan);
            run_checkout(CheckoutFlow::new(state.clone(), widget, kind)).await?;
        }
        Command::BuyReport {
            first_name,
            last_name,
            email,
            phone,
            address,
            city,
            pincode,
        } => {
            let kind = ReportPurchaseKind::new(ReportPurchaseDetails {
                first_name,
                last_name,
                email,
                phone,
                address,
                city,
                pincode,
            });
            let flow = run_checkout(CheckoutFlow::new(state.clone(), widget, kind)).await?;
            if let Some(reference) = flow.receipt().and_then(|r| r.reference.as_deref()) {
                println!("Order reference: {}", reference);
            }
        }
        Command::ResetPassword { email } => reset_password(state.clone(), &email).await?,
        Command::Admin { resource, action } => match resource {
            AdminTarget::Reports => run_admin::<TestReports>(state.clone(), action, &ui).await?,
            AdminTarget::Blog => run_admin::<BlogPosts>(state.clone(), action, &ui).await?,
            AdminTarget::UpcomingTests => {
                run_admin::<UpcomingTests>(state.clone(), action, &ui).await?
            }
            AdminTarget::Tiers => {
                run_admin::<SubscriptionTiers>(state.clone(), action, &ui).await?
            }
        },
    }

    Ok(())
}

async fn run_checkout<K: CheckoutKind>(
    mut flow: CheckoutFlow<K, ConsoleWidget>,
) -> Result<CheckoutFlow<K, ConsoleWidget>> {
    let status = flow.submit().await?;
    if status == CheckoutStatus::Failed {
        anyhow::bail!("payment could not be verified");
    }
    Ok(flow)
}

async fn reset_password(state: Arc<AppState>, email: &str) -> Result<()> {
    let mut flow = PasswordResetFlow::new(state);
    flow.request_code(email).await?;
    if let Some(code) = flow.echoed_code() {
        println!("(debug) reset code: {}", code);
    }

    while flow.step() == ResetStep::AwaitingCode {
        let code = prompt("6-digit code (empty to resend)")?;
        if code.is_empty() {
            flow.resend_code().await?;
            continue;
        }
        flow.input_code(&code);
        if flow.verify_code().await.is_err() {
            continue;
        }
    }

    while flow.step() == ResetStep::AwaitingNewPassword {
        let new_password = prompt("New password")?;
        let confirm_password = prompt("Confirm password")?;
        let _ = flow.reset_password(&new_password, &confirm_password).await;
    }

    flow.wait_for_return().await;
    Ok(())
}

async fn run_admin<R>(state: Arc<AppState>, action: AdminAction, ui: &ConsoleUi) -> Result<()>
where
    R: AdminResource,
    R::Item: Serialize,
{
    let mut panel = match AdminPanel::<R>::open(state).await {
        Ok(panel) => panel,
        Err(e) => {
            if let Some(route) = denied_link(&e) {
                println!("Back to home: {}", route.path());
            }
            return Err(e.into());
        }
    };
    match action {
        AdminAction::List => {
            for item in panel.items() {
                println!("{}", serde_json::to_string(item)?);
            }
        }
        AdminAction::Delete { id } => {
            if !panel.delete(&id, ui).await? {
                println!("Not deleted");
            }
        }
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password"),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    read_answer(&mut io::stdin().lock())
}

/// One trimmed line; end of input is an error so interactive loops stop
fn read_answer(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("standard input closed");
    }
    Ok(line.trim().to_string())
}
