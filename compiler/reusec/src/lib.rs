//! Command-line driver for the stencil reuse scheduler.
//!
//! The sweep scripts call `reusec` once per configuration: one JSON request
//! document in, the same document with `num_ops` and `total_distance` out.

pub mod error;
pub mod options;
pub mod run;
mod tracing_setup;

pub use error::{CliError, EXIT_FAILURE, EXIT_USAGE};
pub use options::{parse_args, Command, Options, OptionsError, PolicyChoice, USAGE};
pub use run::run;
pub use tracing_setup::init_tracing;
