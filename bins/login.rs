use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use common::graphql::ShopifyFetcher;
use dotenvy::dotenv;
use service::auth::{Credentials, LoginHandler};
use service::customer::CustomerRevalidator;
use service::session::FileSessionStore;
use tracing::{error, info};
use uuid::Uuid;

/// Log a storefront customer in and persist the session token.
#[derive(Parser)]
#[command(name = "storefront-login", version)]
struct Args {
    #[arg(long, env = "STOREFRONT_EMAIL", default_value = "")]
    email: String,
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true, default_value = "")]
    password: String,
    /// Emit JSON structured logs
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    // load .env first so RUST_LOG from it applies
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_and_validate()?;

    let fetch = Arc::new(ShopifyFetcher::new(
        cfg.storefront.graphql_endpoint(),
        cfg.storefront.access_token.clone(),
        cfg.storefront.request_timeout(),
    )?);
    let ttl = chrono::Duration::try_days(cfg.session.token_ttl_days)
        .ok_or_else(|| anyhow::anyhow!("session.token_ttl_days out of range"))?;
    let session = FileSessionStore::new(cfg.session.token_path.clone(), ttl).await?;
    let customer = Arc::new(CustomerRevalidator::new(fetch.clone(), session.clone()));
    let login = LoginHandler::new(session).use_hook(fetch, customer.clone());

    login.login(Credentials::new(args.email, args.password)).await?;

    match customer.customer().await {
        Some(c) => {
            let name = c.display_name.or(c.email).unwrap_or(c.id);
            info!(event = "login_succeeded", "customer session stored");
            println!("logged in as {name}");
        }
        None => println!("login accepted, no customer profile returned"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.json_logs);

    let run_id = Uuid::new_v4();
    info!(service = "storefront-login", event = "start", %run_id, version = env!("CARGO_PKG_VERSION"), "login starting");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "storefront-login", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "storefront-login", event = "login_failed", %run_id, error = %e, "login failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
