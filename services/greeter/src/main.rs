use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shared::errors::{ErrorCategory, ErrorCode, ServiceError};

use greeter::{
    Config, Connection, CounterWatcher, ExplorerLinks, GreeterError, GreeterSession, Identities,
    Provisioned, SessionView,
};

#[derive(Parser)]
#[command(name = "greeter", version, about = "Say hello to the greeter program")]
struct Cli {
    /// Print the session view and errors as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Check program info and create the greeting account if needed
    Check,
    /// Send a greeting and print the new counter
    Greet,
    /// Read the current counter
    Read,
    /// Print every counter change until interrupted
    Watch,
}

#[tokio::main]
async fn main() {
    // Before tracing, so LOG_FORMAT and RUST_LOG may come from .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    tracing::info!(
        service = "greeter",
        version = env!("CARGO_PKG_VERSION"),
        "Starting greeter"
    );

    if let Err(e) = execute(&cli).await {
        report_error(&e, cli.json);
        std::process::exit(1);
    }
}

async fn execute(cli: &Cli) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let identities = Identities::load(&config.identity).context("Failed to load identities")?;
    info!(
        rpc_url = %config.solana.rpc_url,
        ws_url = %config.solana.ws_url,
        commitment = %config.solana.commitment,
        program_id = %identities.program_id(),
        "Configuration loaded"
    );

    let connection = Arc::new(Connection::from_config(&config.solana));
    let session = GreeterSession::new(connection.clone(), identities)?;
    let links = ExplorerLinks::from_config(&config);

    // Ctrl-C stops waiting on a greeting or ends a watch
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                cancel.cancel();
            }
        }
    });

    run(cli.command, &session, &connection, &cancel).await?;

    let view = SessionView::capture(&session, &links).await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view);
    }

    Ok(())
}

async fn run(
    command: Command,
    session: &GreeterSession<Connection>,
    connection: &Connection,
    cancel: &CancellationToken,
) -> Result<(), GreeterError> {
    match command {
        Command::Check => {
            match session.ensure_greeting_account().await? {
                Provisioned::Created { signature, lamports } => {
                    info!(signature = %signature, lamports, "Program deployed, greeting account created");
                }
                Provisioned::AlreadyExists => info!("Program deployed, greeting account ready"),
            }
            session.read_counter().await?;
        }
        Command::Greet => {
            // A fresh process is a fresh session: provision first, as the
            // greet action is only offered after a successful check
            session.ensure_greeting_account().await?;
            let outcome = session.greet_with_cancel(cancel).await?;
            info!(
                signature = %outcome.signature,
                counter = outcome.counter,
                "Transaction confirmed"
            );
        }
        Command::Read => {
            session.read_counter().await?;
        }
        Command::Watch => {
            let watcher = CounterWatcher::for_connection(connection, session.greeting_address());
            watcher
                .run(cancel, |counter| println!("Greetings counter: {}", counter))
                .await?;
        }
    }
    Ok(())
}

/// Single report per failure: JSON on stdout with `--json`, text on stderr
/// otherwise.
fn report_error(e: &anyhow::Error, json: bool) {
    let report = match e.downcast_ref::<GreeterError>() {
        Some(greeter_error) => greeter_error.to_service_error(),
        None => ServiceError::new(
            ErrorCategory::Configuration,
            ErrorCode::CONFIGURATION_INVALID,
            format!("{:#}", e),
        ),
    };

    match report.category.log_level() {
        "error" => error!(code = %report.code, error = %report, "Greeter action failed"),
        "warn" => warn!(code = %report.code, error = %report, "Greeter action failed"),
        _ => info!(code = %report.code, error = %report, "Greeter action stopped"),
    }

    if json {
        if let Ok(body) = serde_json::to_string_pretty(&serde_json::json!({ "error": report })) {
            println!("{}", body);
        }
    } else if report.category.is_user_recoverable() {
        eprintln!("{} (try again)", report);
    } else {
        eprintln!("{}", report);
    }
}

fn init_tracing() {
    // Structured logging, JSON or human-readable (configurable via env)
    let use_json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greeter=info".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
