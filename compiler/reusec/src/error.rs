//! Driver errors and their exit codes.

use std::io;
use std::path::PathBuf;

use reuse_sched::ReuseError;

use crate::options::OptionsError;

/// Exit status for a bad command line.
pub const EXIT_USAGE: i32 = 2;

/// Exit status for a failed scheduling run.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Reuse(#[from] ReuseError),

    #[error("failed to read {}: {source}", display_path(.path.as_ref()))]
    Read {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", display_path(.path.as_ref()))]
    Write {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize schedule dump: {0}")]
    Dump(#[source] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Options(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    match path {
        Some(path) => format!("'{}'", path.display()),
        None => "standard stream".to_string(),
    }
}
