use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn run_options(list: &[&str]) -> Options {
    match parse_args(&args(list)).unwrap() {
        Command::Run(options) => options,
        other => panic!("expected a run, got {other:?}"),
    }
}

#[test]
fn defaults_read_stdin() {
    let options = run_options(&[]);
    assert_eq!(options, Options::default());
    assert_eq!(run_options(&["-"]).input, None);
    let ctx = options.context().unwrap();
    assert_eq!(ctx.policy().name(), "neighbor(max_shift=1)");
    assert_eq!(ctx.weights(), Weights::default());
}

#[test]
fn full_line_buffer_invocation() {
    let options = run_options(&[
        "request.json",
        "-o",
        "result.json",
        "--pretty",
        "--policy=line-buffer",
        "--tile-size=2000, 0",
        "--unroll=4",
        "--max-depth=4000",
        "--op-weight=100",
        "--distance-weight=2",
        "--dump-schedule=schedule.json",
        "--log-tree",
    ]);
    assert_eq!(options.input, Some(PathBuf::from("request.json")));
    assert_eq!(options.output, Some(PathBuf::from("result.json")));
    assert!(options.pretty);
    assert!(options.log_tree);
    assert_eq!(options.tile_size, Some(vec![2000, 0]));
    assert_eq!(options.dump_schedule, Some(PathBuf::from("schedule.json")));

    let ctx = options.context().unwrap();
    assert_eq!(
        ctx.policy().name(),
        "line-buffer(tile_size=[2000,0], unroll=4, max_depth=4000)"
    );
    assert_eq!(
        ctx.weights(),
        Weights {
            op: 100,
            distance: 2,
        }
    );
}

#[test]
fn neighbor_shift_bound() {
    let ctx = run_options(&["--max-shift=3", "--output=out.json"])
        .context()
        .unwrap();
    assert_eq!(ctx.policy().name(), "neighbor(max_shift=3)");
}

#[test]
fn help_and_version_stop_parsing() {
    // Arguments before the flag are still checked.
    assert_eq!(
        parse_args(&args(&["--bogus", "-h"])),
        Err(OptionsError::UnknownOption("--bogus".into()))
    );
    assert_eq!(parse_args(&args(&["in.json", "--help"])), Ok(Command::Help));
    assert_eq!(parse_args(&args(&["-V"])), Ok(Command::Version));
}

#[test]
fn rejects_bad_values() {
    assert_eq!(
        parse_args(&args(&["--max-shift=-1"])),
        Err(OptionsError::InvalidValue {
            option: "--max-shift",
            value: "-1".into(),
            expected: "a non-negative integer",
        })
    );
    assert!(matches!(
        parse_args(&args(&["--policy=optimal"])),
        Err(OptionsError::InvalidValue {
            option: "--policy",
            ..
        })
    ));
    assert!(matches!(
        parse_args(&args(&["--unroll=0"])),
        Err(OptionsError::InvalidValue {
            option: "--unroll",
            ..
        })
    ));
    assert!(matches!(
        parse_args(&args(&["--tile-size=8,x"])),
        Err(OptionsError::InvalidValue { .. })
    ));
    assert_eq!(
        parse_args(&args(&["--tile-size="])),
        Err(OptionsError::MissingValue("--tile-size"))
    );
    assert_eq!(
        parse_args(&args(&["-o"])),
        Err(OptionsError::MissingValue("-o"))
    );
}

#[test]
fn rejects_second_input() {
    assert_eq!(
        parse_args(&args(&["a.json", "b.json"])),
        Err(OptionsError::UnexpectedArgument("b.json".into()))
    );
}

#[test]
fn line_buffer_needs_tile_size() {
    let options = run_options(&["--policy=line-buffer"]);
    assert_eq!(options.context().unwrap_err(), OptionsError::MissingTileSize);
}
