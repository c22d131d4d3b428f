//! Modlink Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared domain types and logging setup for the modlink workspace.
//!
//! # Overview
//!
//! - **Types**: modules, content fragments and the ordered fragment chain
//! - **Logging**: tracing subscriber configuration for binaries
//!
//! # Example
//!
//! ```
//! use modlink_common::types::{Fragment, FragmentChain};
//!
//! let chain = FragmentChain::from_unordered(vec![
//!     Fragment::new("2", "b.html"),
//!     Fragment::new("1", "a.html"),
//! ]);
//! assert_eq!(chain.head().map(|f| f.name.as_str()), Some("a.html"));
//! ```

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{Fragment, FragmentChain, Module, DEFAULT_SUBSCRIPTION_PLAN_ID};
