//! `modlink <PATH>` command implementation
//!
//! Resolves connection settings, prepares the upload from disk, then writes
//! the module and its fragments inside one transaction.

use crate::config::DatabaseConfig;
use crate::db;
use crate::discovery::DiscoveryPolicy;
use crate::error::Result;
use crate::progress::Reporter;
use crate::store::{MemoryStore, PgStore};
use crate::upload::{self, UploadReport, UploadRequest};
use crate::Cli;
use colored::Colorize;
use std::path::Path;

/// Build the upload request described by the command line
pub fn request_from_cli(cli: &Cli, root: &Path) -> UploadRequest {
    let mut request = UploadRequest::new(root)
        .with_subscription_plan(cli.subscription_plan)
        .with_discovery(if cli.recursive {
            DiscoveryPolicy::Recursive
        } else {
            DiscoveryPolicy::Flat
        });
    if let Some(ref dir) = cli.module {
        request = request.with_metadata_dir(dir);
    }
    request
}

/// Upload the module at `root`
pub async fn run(cli: &Cli, root: &Path) -> Result<()> {
    let reporter = Reporter::new(cli.verbose);
    let request = request_from_cli(cli, root);

    if cli.dry_run {
        return dry_run(&request, &reporter).await;
    }

    let database = DatabaseConfig::load(&cli.config, &cli.section, cli.database_url.as_deref())?;
    let prepared = upload::prepare(&request, &reporter)?;

    reporter.step(format!("Connecting using {}", database.describe()));
    let pool = db::connect(&database).await?;
    if cli.migrate {
        reporter.step("Applying migrations");
        db::migrate(&pool).await?;
    }

    let mut store = PgStore::begin(&pool).await?;
    let report = upload::persist(&mut store, prepared, &reporter).await?;
    store.commit().await?;
    pool.close().await;

    print_summary(&report);
    Ok(())
}

async fn dry_run(request: &UploadRequest, reporter: &Reporter) -> Result<()> {
    let prepared = upload::prepare(request, reporter)?;
    let mut store = MemoryStore::new();
    let report = upload::persist(&mut store, prepared, reporter).await?;

    println!(
        "{} module '{}' would be stored with {} fragment(s) on subscription plan {}",
        "Dry run:".yellow().bold(),
        report.module.name,
        report.fragment_ids.len(),
        report.module.plan_id()
    );
    if !report.fragment_names.is_empty() {
        println!("  {}", report.fragment_names.join(" -> "));
    }
    Ok(())
}

fn print_summary(report: &UploadReport) {
    let head = report
        .head_fragment_id()
        .map(|id| format!(", head fragment {}", id))
        .unwrap_or_default();
    println!(
        "{} module '{}' (id {}) with {} fragment(s){}",
        "Uploaded".green().bold(),
        report.module.name,
        report.module_id,
        report.fragment_ids.len(),
        head
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_request_from_cli() {
        let cli = Cli::try_parse_from(["modlink", "course", "-m", "meta", "-s", "4", "-r"]).unwrap();
        let request = request_from_cli(&cli, Path::new("course"));

        assert_eq!(request.root, PathBuf::from("course"));
        assert_eq!(request.metadata_dir(), Path::new("meta"));
        assert_eq!(request.subscription_plan_id, 4);
        assert_eq!(request.discovery, DiscoveryPolicy::Recursive);
    }

    #[test]
    fn test_metadata_dir_defaults_to_root() {
        let cli = Cli::try_parse_from(["modlink", "course"]).unwrap();
        let request = request_from_cli(&cli, Path::new("course"));

        assert_eq!(request.metadata_dir(), Path::new("course"));
        assert_eq!(request.discovery, DiscoveryPolicy::Flat);
    }
}
