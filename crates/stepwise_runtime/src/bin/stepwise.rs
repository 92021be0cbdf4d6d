//! Stepwise CLI entry point.

use std::env;
use std::process::ExitCode;

use stepwise_debug::{DebuggerConfig, HumanFormatter, OutputFormat, PrintLevel};
use stepwise_runtime::{Debugger, Outcome, Program, ScriptedEditor};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors that end the CLI.
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Debugger(#[from] stepwise_foundation::Error),
}

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    print_level: Option<PrintLevel>,
    strict: bool,
    json: bool,
    indent: bool,
    show_vars: bool,
    batch: bool,
    limit: Option<u64>,
    program: Program,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STEPWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(Outcome::Succeeded(_) | Outcome::Aborted) => ExitCode::SUCCESS,
        Ok(Outcome::Exception(_) | Outcome::EventLimit) => ExitCode::from(2),
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{flag} requires a value")))
}

fn number<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T, CliError> {
    let raw = value(args, i, flag)?;
    raw.parse()
        .map_err(|_| CliError::Usage(format!("invalid {flag} value: {raw}")))
}

fn parse_args(args: &[String]) -> Result<CliConfig, CliError> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch = true,
            "--strict" => config.strict = true,
            "--json" => config.json = true,
            "--indent" => config.indent = true,
            "--show-vars" => config.show_vars = true,
            "--print-level" => {
                let level = value(args, &mut i, "--print-level")?;
                config.print_level = Some(
                    level
                        .parse()
                        .map_err(|_| CliError::Usage(format!("invalid --print-level value: {level}")))?,
                );
            }
            "--limit" => config.limit = Some(number(args, &mut i, "--limit")?),
            "--from" => config.program.from = number(args, &mut i, "--from")?,
            "--to" => config.program.to = number(args, &mut i, "--to")?,
            "--max" => config.program.limit = number(args, &mut i, "--max")?,
            "--dividend" => config.program.dividend = number(args, &mut i, "--dividend")?,
            other => return Err(CliError::Usage(format!("unknown option: {other}"))),
        }
        i += 1;
    }

    Ok(config)
}

fn debugger_config(cli: &CliConfig) -> DebuggerConfig {
    let mut config = if cli.batch {
        DebuggerConfig::batch()
    } else {
        DebuggerConfig::interactive()
    };
    if let Some(level) = cli.print_level {
        config = config.with_print_level(level);
    }
    if cli.strict {
        config = config.with_strict(true);
    }
    if cli.json {
        config = config.with_format(OutputFormat::Json);
    }
    let mut human = HumanFormatter::new();
    if cli.indent {
        human = human.with_indent();
    }
    if cli.show_vars {
        human = human.with_vars();
    }
    config.with_human(human)
}

fn run(args: &[String]) -> Result<Outcome, CliError> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(Outcome::Aborted);
    }

    if cli.show_version {
        println!("stepwise {}", env!("CARGO_PKG_VERSION"));
        return Ok(Outcome::Aborted);
    }

    let config = debugger_config(&cli);
    let outcome = if config.interactive {
        Debugger::new(config)?.run(cli.program, cli.limit)?.0
    } else {
        // Batch runs never read input.
        Debugger::with_editor(config, ScriptedEditor::default())
            .run(cli.program, cli.limit)?
            .0
    };
    Ok(outcome)
}

fn print_help() {
    println!(
        "\x1b[1mStepwise\x1b[0m - Step through a traced program

\x1b[1mUSAGE:\x1b[0m
    stepwise [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help             Print help information
    -V, --version          Print version information
    -b, --batch            Run to the end without prompting
    --print-level LEVEL    none, some or all (default: some; batch: all)
    --strict               Ignore spy points when stepping
    --json                 Print event lines as JSON
    --indent               Indent event lines by call depth
    --show-vars            List live variable names on event lines
    --limit N              Stop after N events

\x1b[1mPROGRAM OPTIONS:\x1b[0m
    --from N               Lower bound for between/3 (default 1)
    --to N                 Upper bound for between/3 (default 6)
    --max N                Reject values greater than N (default 4)
    --dividend N           Dividend for divide/3 (default 12)

\x1b[1mEXAMPLES:\x1b[0m
    stepwise                         Debug the program interactively
    stepwise -b                      Print every event
    stepwise -b --from 0             Watch divide/3 raise an exception
    stepwise -b --json --limit 20    First 20 events as JSON

Type `help` at the mdb> prompt for debugger commands.
STEPWISE_LOG=debug enables diagnostic logging on stderr."
    );
}
