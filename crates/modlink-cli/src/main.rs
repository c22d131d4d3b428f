//! Modlink CLI - Main entry point

use clap::Parser;
use modlink_cli::Cli;
use modlink_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .filter_directives("sqlx=warn")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The upload works without logging, so a setup failure is not fatal
    let _ = init_logging(&log_config);

    let Some(ref root) = cli.path else {
        eprintln!("Error: a module directory is required");
        process::exit(2);
    };

    if let Err(e) = modlink_cli::commands::upload::run(&cli, root).await {
        error!(error = %e, "Upload failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
