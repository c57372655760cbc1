//! File input/output and status reporting.

pub mod utils;

#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressStyle};

use std::fmt;

/// How much non-critical status information to report.
#[derive(Clone)]
pub enum Verbosity {
    Quiet,
    Messages,
    #[cfg(feature = "cli")]
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Creates a progress bar for the given number of items, hidden unless
    /// progress reporting is enabled.
    #[cfg(feature = "cli")]
    pub fn create_progress_bar(&self, size: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => ProgressBar::new(size as u64).with_style(style.clone()),
            _ => ProgressBar::hidden(),
        }
    }
}

// `ProgressStyle` has no `Debug` implementation, so only the variant is shown.
impl fmt::Debug for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Quiet => "Quiet",
            Self::Messages => "Messages",
            #[cfg(feature = "cli")]
            Self::Progress(_) => "Progress",
        };
        write!(f, "{}", name)
    }
}
