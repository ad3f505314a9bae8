//! datasweep - Main Entry Point

use clap::Parser;
use datasweep::cli::{cmd_clean, cmd_correlate, cmd_info, CleanFlags, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datasweep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            data,
            output,
            fill_mean,
            fill_mode,
            drop_missing,
            drop_duplicates,
            drop_outliers,
            all,
            correlate,
            json,
        } => {
            let flags = CleanFlags {
                fill_mean,
                fill_mode,
                drop_missing,
                drop_duplicates,
                drop_outliers,
                all,
            };
            cmd_clean(&data, &output, flags, correlate, json)?;
        }
        Commands::Info { data, json } => {
            cmd_info(&data, json)?;
        }
        Commands::Correlate { data } => {
            cmd_correlate(&data)?;
        }
    }

    Ok(())
}
