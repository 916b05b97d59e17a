//! Carebase REST API entry point.
//!
//! Binary name: `carebase`
//!
//! Parses CLI arguments, initializes the database, vector store, and
//! embedding model, runs the startup spreadsheet load, then serves the
//! REST API until Ctrl+C or SIGTERM.

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use carebase_infra::sheets::XlsxRecordSource;
use state::AppState;

#[derive(Parser)]
#[command(name = "carebase", about = "Clinical records API with semantic search")]
struct Cli {
    /// Host address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Directory for the SQLite database and LanceDB vector store.
    #[arg(long, env = "CAREBASE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Patients workbook (xlsx).
    #[arg(long, env = "CAREBASE_PATIENTS_XLSX", default_value = "./sheets/patients.xlsx")]
    patients: PathBuf,

    /// Doctors workbook (xlsx).
    #[arg(long, env = "CAREBASE_DOCTORS_XLSX", default_value = "./sheets/doctors.xlsx")]
    doctors: PathBuf,

    /// Appointments workbook (xlsx).
    #[arg(
        long,
        env = "CAREBASE_APPOINTMENTS_XLSX",
        default_value = "./sheets/appointments.xlsx"
    )]
    appointments: PathBuf,

    /// Prescriptions workbook (xlsx).
    #[arg(
        long,
        env = "CAREBASE_PRESCRIPTIONS_XLSX",
        default_value = "./sheets/prescriptions.xlsx"
    )]
    prescriptions: PathBuf,

    /// Skip the startup spreadsheet load and serve existing data.
    #[arg(long)]
    skip_load: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,carebase=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let state = AppState::init(cli.data_dir.clone()).await?;

    // Load the spreadsheets before accepting traffic; a bad source file
    // aborts startup instead of serving partial data.
    if cli.skip_load {
        tracing::info!("startup spreadsheet load skipped");
    } else {
        let source = XlsxRecordSource::new(
            cli.patients.clone(),
            cli.doctors.clone(),
            cli.appointments.clone(),
            cli.prescriptions.clone(),
        );
        state
            .run_startup_load(source)
            .await
            .map_err(|e| anyhow::anyhow!("startup data load failed: {e}"))?;
    }

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Carebase API listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
