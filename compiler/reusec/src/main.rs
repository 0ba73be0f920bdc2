//! Stencil reuse scheduler CLI.

use reusec::{init_tracing, parse_args, run, Command, EXIT_USAGE, USAGE};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Command::Version) => {
            println!("reusec {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(EXIT_USAGE);
        }
    };

    init_tracing(options.log_tree);

    if let Err(e) = run(&options) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
