//! One scheduling run: read, plan, emit, write.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use reuse_sched::{plan, report, Document};

use crate::error::CliError;
use crate::options::Options;

/// Schedule the request named by `options` and write the result.
///
/// Nothing is written to the output unless the whole pipeline succeeds.
/// The schedule dump, if requested, is written only after the result.
pub fn run(options: &Options) -> Result<(), CliError> {
    let ctx = options.context()?;
    let text = read_input(options.input.as_deref())?;
    let document = Document::from_json(&text)?;

    let schedule = plan(&document, &ctx)?;
    tracing::info!(
        num_ops = schedule.num_ops(),
        total_distance = schedule.total_distance(),
        policy = schedule.policy_name(),
        "scheduled request"
    );

    let dump = match &options.dump_schedule {
        Some(path) => Some((
            path.as_path(),
            serde_json::to_string_pretty(&schedule.summary(ctx.weights()))
                .map_err(CliError::Dump)?,
        )),
        None => None,
    };

    let result = report::emit(document, schedule.report());
    let rendered = if options.pretty {
        result.to_json_pretty()?
    } else {
        result.to_json()?
    };
    write_output(options.output.as_deref(), &rendered)?;

    if let Some((path, dump)) = dump {
        write_output(Some(path), &dump)?;
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: Some(path.to_path_buf()),
            source,
        }),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Read { path: None, source })?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    let result = match path {
        Some(path) => fs::write(path, format!("{text}\n")),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}").and_then(|()| stdout.flush())
        }
    };
    result.map_err(|source| CliError::Write {
        path: path.map(Path::to_path_buf),
        source,
    })
}
