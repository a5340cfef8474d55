//! eKYC CLI - Main entry point

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ekyc_cli::{commands, AppContext};
use ekyc_core::EvidenceSlot;
use ekyc_session::CaptureKind;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ekyc")]
#[command(about = "eKYC - Identity verification pipeline", long_about = None)]
struct Cli {
    /// JSON configuration file (validation and session sections)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw capture blob and print the typed result
    Parse {
        /// Blob file, or - for stdin
        blob: PathBuf,
    },

    /// Parse and validate a raw capture blob
    Validate {
        /// Blob file, or - for stdin
        blob: PathBuf,
        /// Evaluate expiry against this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Run capture, validation and submission against in-memory services
    Simulate {
        /// Blob file the simulated device returns, or - for stdin
        blob: PathBuf,
        /// Capture kind (full, document_only, face_only)
        #[arg(long, default_value = "full")]
        kind: CaptureKind,
        /// Evidence slot whose upload should fail (repeatable)
        #[arg(long = "fail-upload")]
        fail_upload: Vec<EvidenceSlot>,
        /// Make the persistence API answer USER_ALREADY_VERIFIED
        #[arg(long)]
        already_verified: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ekyc=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { blob } => {
            let raw = commands::read_blob(&blob)?;
            print_json(&commands::parse(&raw)?)?;
        }

        Commands::Validate { blob, today } => {
            let ctx = AppContext::load(cli.config.as_deref())?;
            let raw = commands::read_blob(&blob)?;
            let report = commands::validate(&ctx, &raw, today)?;
            print_json(&report)?;

            if report.is_valid() {
                println!("✅ Capture is valid");
            } else {
                println!("❌ Capture rejected ({} errors)", report.errors().len());
            }
        }

        Commands::Simulate {
            blob,
            kind,
            fail_upload,
            already_verified,
        } => {
            let ctx = AppContext::load(cli.config.as_deref())?;
            let raw = commands::read_blob(&blob)?;
            let options = commands::SimulateOptions {
                kind,
                fail_uploads: fail_upload,
                already_verified,
            };
            let report = commands::simulate(&ctx, &raw, options).await?;
            print_json(&report)?;

            match (&report.submission, &report.presentation) {
                (Some(receipt), _) => println!("✅ Submitted ({})", receipt.status),
                (None, Some(presentation)) => {
                    println!("❌ {}: {}", presentation.title, presentation.guidance)
                }
                (None, None) => println!("⚠️  Nothing submitted"),
            }
        }
    }

    Ok(())
}
