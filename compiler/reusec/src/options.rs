//! Command-line options.
//!
//! Flags take the `--name=value` form; `-o <path>` is the one flag that
//! reads its value from the next argument.

use std::path::PathBuf;

use reuse_sched::{LineBuffer, NeighborShift, ReusePolicy, ScheduleContext, Weights};

pub const USAGE: &str = "\
Usage: reusec [OPTIONS] [INPUT]

Reads a JSON request document (from INPUT, or stdin when INPUT is absent or
'-'), schedules its read attributes, and writes the document back with
num_ops and total_distance filled in.

Options:
  -o, --output=<path>       Write the result here instead of stdout
  --pretty                  Pretty-print the result document
  --policy=<name>           Reuse policy: neighbor (default), line-buffer
  --max-shift=<n>           neighbor: largest L1 shift that is reusable (default 1)
  --tile-size=<a,b,...>     line-buffer: tile extent per dimension
  --unroll=<n>              line-buffer: unroll factor (default 1)
  --max-depth=<n>           line-buffer: largest buffered stream distance
  --op-weight=<n>           Cost of one computed operation (default 64)
  --distance-weight=<n>     Cost of one step of reuse distance (default 1)
  --dump-schedule=<path>    Also write the full schedule as JSON
  --log-tree                Render RUST_LOG output as an indented span tree
  -h, --help                Show this message
  -V, --version             Show version";

/// Errors in the command line itself.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for {option}: expected {expected}")]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("unexpected argument '{0}': only one input document is accepted")]
    UnexpectedArgument(String),

    #[error("the line-buffer policy requires --tile-size")]
    MissingTileSize,
}

/// Which reuse policy to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PolicyChoice {
    #[default]
    Neighbor,
    LineBuffer,
}

impl PolicyChoice {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "neighbor" => Some(PolicyChoice::Neighbor),
            "line-buffer" | "line_buffer" => Some(PolicyChoice::LineBuffer),
            _ => None,
        }
    }
}

/// What the invocation asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Options),
    Help,
    Version,
}

/// Settings for one scheduling run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Request document; `None` reads stdin.
    pub input: Option<PathBuf>,
    /// Result document; `None` writes stdout.
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub policy: PolicyChoice,
    pub max_shift: u64,
    pub tile_size: Option<Vec<u64>>,
    pub unroll: u64,
    pub max_depth: Option<u64>,
    pub weights: Weights,
    pub dump_schedule: Option<PathBuf>,
    pub log_tree: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            input: None,
            output: None,
            pretty: false,
            policy: PolicyChoice::default(),
            max_shift: NeighborShift::DEFAULT_MAX_SHIFT,
            tile_size: None,
            unroll: 1,
            max_depth: None,
            weights: Weights::default(),
            dump_schedule: None,
            log_tree: false,
        }
    }
}

impl Options {
    /// Build the scheduling context these options describe.
    pub fn context(&self) -> Result<ScheduleContext, OptionsError> {
        let policy: Box<dyn ReusePolicy> = match self.policy {
            PolicyChoice::Neighbor => Box::new(NeighborShift::new(self.max_shift)),
            PolicyChoice::LineBuffer => {
                let tile_size = self.tile_size.clone().ok_or(OptionsError::MissingTileSize)?;
                let mut policy = LineBuffer::new(tile_size).with_unroll_factor(self.unroll);
                if let Some(depth) = self.max_depth {
                    policy = policy.with_max_depth(depth);
                }
                Box::new(policy)
            }
        };
        Ok(ScheduleContext::new(policy).with_weights(self.weights))
    }
}

/// Parse the arguments that follow the program name.
pub fn parse_args(args: &[String]) -> Result<Command, OptionsError> {
    let mut options = Options::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        } else if arg == "-V" || arg == "--version" {
            return Ok(Command::Version);
        } else if arg == "-o" {
            let path = args.get(i + 1).ok_or(OptionsError::MissingValue("-o"))?;
            options.output = Some(PathBuf::from(path));
            i += 1;
        } else if let Some(path) = arg.strip_prefix("--output=") {
            options.output = Some(PathBuf::from(path));
        } else if arg == "--pretty" {
            options.pretty = true;
        } else if arg == "--log-tree" {
            options.log_tree = true;
        } else if let Some(name) = arg.strip_prefix("--policy=") {
            options.policy = PolicyChoice::from_str(name).ok_or_else(|| {
                OptionsError::InvalidValue {
                    option: "--policy",
                    value: name.to_string(),
                    expected: "neighbor or line-buffer",
                }
            })?;
        } else if let Some(n) = arg.strip_prefix("--max-shift=") {
            options.max_shift = parse_u64("--max-shift", n)?;
        } else if let Some(list) = arg.strip_prefix("--tile-size=") {
            options.tile_size = Some(parse_list("--tile-size", list)?);
        } else if let Some(n) = arg.strip_prefix("--unroll=") {
            let unroll = parse_u64("--unroll", n)?;
            if unroll == 0 {
                return Err(OptionsError::InvalidValue {
                    option: "--unroll",
                    value: n.to_string(),
                    expected: "a positive integer",
                });
            }
            options.unroll = unroll;
        } else if let Some(n) = arg.strip_prefix("--max-depth=") {
            options.max_depth = Some(parse_u64("--max-depth", n)?);
        } else if let Some(n) = arg.strip_prefix("--op-weight=") {
            options.weights.op = parse_u64("--op-weight", n)?;
        } else if let Some(n) = arg.strip_prefix("--distance-weight=") {
            options.weights.distance = parse_u64("--distance-weight", n)?;
        } else if let Some(path) = arg.strip_prefix("--dump-schedule=") {
            options.dump_schedule = Some(PathBuf::from(path));
        } else if arg == "-" || !arg.starts_with('-') {
            if options.input.is_some() {
                return Err(OptionsError::UnexpectedArgument(arg.to_string()));
            }
            if arg != "-" {
                options.input = Some(PathBuf::from(arg));
            }
        } else {
            return Err(OptionsError::UnknownOption(arg.to_string()));
        }
        i += 1;
    }
    Ok(Command::Run(options))
}

fn parse_u64(option: &'static str, value: &str) -> Result<u64, OptionsError> {
    value.parse().map_err(|_| OptionsError::InvalidValue {
        option,
        value: value.to_string(),
        expected: "a non-negative integer",
    })
}

fn parse_list(option: &'static str, value: &str) -> Result<Vec<u64>, OptionsError> {
    if value.is_empty() {
        return Err(OptionsError::MissingValue(option));
    }
    value
        .split(',')
        .map(|part| {
            part.trim().parse().map_err(|_| OptionsError::InvalidValue {
                option,
                value: value.to_string(),
                expected: "a comma-separated list of non-negative integers",
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
