//! Modlink CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Imports a module directory into PostgreSQL: one YAML descriptor plus a set
//! of `.html` fragments, stored as a linked list ordered by file name.
//!
//! # Overview
//!
//! - **Discovery**: collect fragment files ([`discovery`])
//! - **Descriptor**: find and validate the module descriptor ([`descriptor`])
//! - **Linkage**: persist fragments tail first, each pointing at its successor ([`linkage`])
//! - **Storage**: PostgreSQL and in-memory stores ([`store`], [`db`])
//! - **Orchestration**: the end-to-end upload ([`upload`], [`commands`])

pub mod commands;
pub mod config;
pub mod db;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod linkage;
pub mod progress;
pub mod store;
pub mod upload;

// Re-export commonly used types
pub use error::{Result, UploadError};
pub use upload::{UploadReport, UploadRequest};

use clap::Parser;
use modlink_common::DEFAULT_SUBSCRIPTION_PLAN_ID;
use std::path::PathBuf;

/// Upload a module and its fragments in the correct order
#[derive(Parser, Debug)]
#[command(name = "modlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Module directory holding the .html fragments
    #[arg(required_unless_present = "markdown_help")]
    pub path: Option<PathBuf>,

    /// Directory holding the module descriptor (defaults to PATH)
    #[arg(short, long = "module", value_name = "DIR")]
    pub module: Option<PathBuf>,

    /// Id of the subscription plan this module is intended for
    #[arg(
        short,
        long = "subscription-plan",
        visible_alias = "subscriptionplan",
        value_name = "ID",
        default_value_t = DEFAULT_SUBSCRIPTION_PLAN_ID
    )]
    pub subscription_plan: i32,

    /// Print progress lines
    #[arg(short, long)]
    pub verbose: bool,

    /// Connection configuration file
    #[arg(short, long, env = "MODLINK_CONFIG", default_value = config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Section of the configuration file holding connection parameters
    #[arg(long, default_value = config::DEFAULT_SECTION)]
    pub section: String,

    /// Connection URL, takes precedence over the configuration file
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Also collect fragments from subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Apply bundled schema migrations before uploading
    #[arg(long, conflicts_with = "dry_run")]
    pub migrate: bool,

    /// Validate and link in memory without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Print the command reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}
