//! Operator-facing progress output
//!
//! Progress lines go to stdout and only in verbose mode. Diagnostics belong
//! in `tracing`, not here.

use colored::Colorize;

/// Verbosity passed explicitly into the upload flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Reporter that prints nothing
    pub fn quiet() -> Self {
        Self::new(false)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print one progress line in verbose mode
    pub fn step(&self, message: impl AsRef<str>) {
        if self.verbose {
            println!("{} {}", "::".cyan().bold(), message.as_ref());
        }
    }

    /// Print an indented detail line in verbose mode
    pub fn detail(&self, message: impl AsRef<str>) {
        if self.verbose {
            println!("   {}", message.as_ref().dimmed());
        }
    }
}
