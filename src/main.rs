use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use enarva_os::activity::ActivityLog;
use enarva_os::config::EnarvaConfig;
use enarva_os::db::Database;
use enarva_os::error::Result;
use enarva_os::http::{AppState, router};
use enarva_os::realtime::{Broadcaster, PushSender};
use enarva_os::workflow::Workflow;

#[derive(Parser)]
#[command(name = "enarva-os", about = "Mission lifecycle and quality-gate service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "enarva.toml")]
    config: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve,
    /// Delete activity records older than the retention window.
    Sweep,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("enarva_os=debug")
    } else {
        EnvFilter::new("enarva_os=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = EnarvaConfig::load(&cli.config).await?;
    let db = Database::open(&config.database.path)?;

    match cli.command {
        Commands::Serve => serve(config, db).await,
        Commands::Sweep => sweep(config, db),
    }
}

async fn serve(config: EnarvaConfig, db: Database) -> Result<()> {
    let push = PushSender::from_config(&config.push);
    let events = Broadcaster::new(config.realtime.channel_capacity).with_push(push);
    let activity = ActivityLog::new(db.clone());
    let workflow = Workflow::new(db.clone(), activity, events);

    let app = router(AppState { db, workflow });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn sweep(config: EnarvaConfig, db: Database) -> Result<()> {
    let activity = ActivityLog::new(db);
    let removed = activity.sweep(config.retention.activity_days)?;
    info!(
        removed,
        retention_days = config.retention.activity_days,
        "Activity retention sweep finished"
    );
    Ok(())
}
