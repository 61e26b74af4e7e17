//! mercury - command line front-end
//!
//! Archives or unarchives threads using a saved app state.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mercury_rs::{AppState, ClientConfig, MessengerClient, SessionContext, build_info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "mercury", version, about = "Messenger thread management from the command line")]
struct Cli {
    /// YAML configuration file (defaults to MERCURY_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Archive (or unarchive) one or more threads
    Archive {
        /// Saved session cookies (JSON app state)
        #[arg(long, env = "MERCURY_APP_STATE")]
        app_state: PathBuf,

        /// Request-signing token of the session
        #[arg(long, env = "MERCURY_FB_DTSG")]
        fb_dtsg: Option<String>,

        /// Move the threads back to the inbox instead
        #[arg(long)]
        unarchive: bool,

        /// Thread ids
        #[arg(required = true)]
        threads: Vec<String>,
    },
    /// Print build information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path).await?,
        None => ClientConfig::from_env()?,
    };
    mercury_rs::utils::logging::init_logging(&config.logging)?;

    match cli.command {
        Command::Version => {
            println!("mercury {}", build_info::VERSION);
            println!("git:   {}", build_info::GIT_HASH);
            println!("built: {}", build_info::BUILD_TIME);
            println!("rustc: {}", build_info::RUST_VERSION);
            Ok(())
        }
        Command::Archive {
            app_state,
            fb_dtsg,
            unarchive,
            threads,
        } => {
            let state = AppState::from_file(&app_state)
                .await
                .with_context(|| format!("loading app state from {}", app_state.display()))?;

            let mut builder = SessionContext::builder()
                .base_url(config.base_url.clone())
                .app_state(state);
            if let Some(token) = fb_dtsg {
                builder = builder.fb_dtsg(token);
            }
            let session = Arc::new(builder.build()?);

            let client = MessengerClient::new(config, session)?;
            let count = threads.len();
            client.change_archived_status(threads, !unarchive).await?;

            println!(
                "{} {} thread(s)",
                if unarchive { "Unarchived" } else { "Archived" },
                count
            );
            Ok(())
        }
    }
}
