//! Operator console commands.
//!
//! Parses one line typed at the debugger prompt into a [`ConsoleCommand`].
//! Commands that depend on the current event (`step`, `finish` without an
//! argument) are resolved later by the session.

use std::fmt;
use std::str::FromStr;

use stepwise_foundation::{Error, Result};

use crate::trace::{PrintLevel, TraceCommand};

/// Full names of every command, for completion.
pub const COMMAND_NAMES: &[&str] = &[
    "step",
    "goto",
    "finish",
    "forward",
    "return",
    "mindepth",
    "maxdepth",
    "continue",
    "print_level",
    "strict",
    "spy",
    "nospy",
    "hold",
    "print",
    "held_vars",
    "vars",
    "help",
    "quit",
];

/// Help text shown by the `help` command, one entry per line.
pub const HELP: &[&str] = &[
    "step [N]              stop N events from now (default 1)",
    "goto N                stop at event N",
    "finish [SEQNO]        stop when the invocation exits, fails or throws",
    "forward               stop at the next event not reached by failure",
    "return                stop at the next event that is not an exit",
    "mindepth N            stop at the next event at depth N or deeper",
    "maxdepth N            stop at the next event at depth N or shallower",
    "continue              run to the end",
    "print_level [LEVEL]   show or set the print level (none, some, all)",
    "strict [on|off]       show or set whether spy points are ignored",
    "spy PROC [print]      stop (or only print) at events of PROC",
    "nospy PROC            remove the spy point on PROC",
    "hold NAME VAR         keep VAR (or $HELD) as $NAME",
    "print VAR | $NAME     print a live or held variable",
    "held_vars             list held variables",
    "vars                  list live variables",
    "help                  show this text",
    "quit                  abandon the session",
];

// =============================================================================
// Value References
// =============================================================================

/// A value named on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueRef {
    /// A variable live at the current event.
    Live(String),
    /// A held variable, written `$name`.
    Held(String),
}

impl FromStr for ValueRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix('$') {
            Some("") => Err(Error::invalid_command("print", "missing name after '$'")),
            Some(name) => Ok(Self::Held(name.to_owned())),
            None if s.is_empty() => Err(Error::invalid_command("print", "missing variable name")),
            None => Ok(Self::Live(s.to_owned())),
        }
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live(name) => f.write_str(name),
            Self::Held(name) => write!(f, "${name}"),
        }
    }
}

// =============================================================================
// Console Command
// =============================================================================

/// One parsed operator command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Install a trace command and resume.
    Resume(TraceCommand),
    /// Resume and stop after this many more events.
    Step(u64),
    /// Resume until the current invocation finishes.
    FinishCurrent,
    /// Show (`None`) or set the print level.
    PrintLevel(Option<PrintLevel>),
    /// Show (`None`) or set strictness.
    Strict(Option<bool>),
    /// Add a spy point.
    Spy {
        /// Procedure name, e.g. `even/1`.
        procedure: String,
        /// Stop (false) or only print (true).
        print_only: bool,
    },
    /// Remove a spy point.
    NoSpy(String),
    /// Hold a value under a new name.
    Hold {
        /// Name to hold it under, without `$`.
        name: String,
        /// Where the value comes from.
        source: ValueRef,
    },
    /// Print a value.
    Print(ValueRef),
    /// List held variable names.
    HeldVars,
    /// List live variables.
    Vars,
    /// Show help.
    Help,
    /// Abandon the session.
    Quit,
}

fn parse_int(command: &str, arg: &str) -> Result<i64> {
    arg.parse::<i64>()
        .map_err(|_| Error::invalid_command(command, format!("expected an integer, got {arg:?}")))
}

fn parse_switch(arg: &str) -> Result<bool> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(Error::invalid_command(
            "strict",
            format!("expected on or off, got {other:?}"),
        )),
    }
}

fn expect_arity(command: &str, args: &[&str], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(Error::invalid_command(
            command,
            format!("expected {expected} argument(s), got {}", args.len()),
        ));
    }
    Ok(())
}

impl ConsoleCommand {
    /// Parses one input line.
    ///
    /// A blank line means `step`.
    ///
    /// # Errors
    ///
    /// Returns an unknown-command error for an unrecognized word, or an
    /// invalid-command error for bad arguments.
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Self::Step(1));
        };
        let args: Vec<&str> = words.collect();

        match name {
            "step" | "s" => {
                expect_arity("step", &args, 0, 1)?;
                match args.first() {
                    None => Ok(Self::Step(1)),
                    Some(arg) => {
                        let n = parse_int("step", arg)?;
                        u64::try_from(n).map(Self::Step).map_err(|_| {
                            Error::invalid_command("step", format!("count must be non-negative, got {n}"))
                        })
                    }
                }
            }
            "goto" | "g" => {
                expect_arity("goto", &args, 1, 1)?;
                Ok(Self::Resume(TraceCommand::goto(parse_int("goto", args[0])?)?))
            }
            "finish" | "f" => {
                expect_arity("finish", &args, 0, 1)?;
                match args.first() {
                    None => Ok(Self::FinishCurrent),
                    Some(arg) => Ok(Self::Resume(TraceCommand::finish(parse_int("finish", arg)?)?)),
                }
            }
            "forward" => {
                expect_arity("forward", &args, 0, 0)?;
                Ok(Self::Resume(TraceCommand::ResumeForward))
            }
            "return" => {
                expect_arity("return", &args, 0, 0)?;
                Ok(Self::Resume(TraceCommand::Return))
            }
            "mindepth" => {
                expect_arity("mindepth", &args, 1, 1)?;
                Ok(Self::Resume(TraceCommand::min_depth(parse_int("mindepth", args[0])?)?))
            }
            "maxdepth" => {
                expect_arity("maxdepth", &args, 1, 1)?;
                Ok(Self::Resume(TraceCommand::max_depth(parse_int("maxdepth", args[0])?)?))
            }
            "continue" | "c" => {
                expect_arity("continue", &args, 0, 0)?;
                Ok(Self::Resume(TraceCommand::ToEnd))
            }
            "print_level" => {
                expect_arity("print_level", &args, 0, 1)?;
                args.first()
                    .map(|arg| arg.parse::<PrintLevel>())
                    .transpose()
                    .map(Self::PrintLevel)
            }
            "strict" => {
                expect_arity("strict", &args, 0, 1)?;
                args.first()
                    .map(|arg| parse_switch(arg))
                    .transpose()
                    .map(Self::Strict)
            }
            "spy" => {
                expect_arity("spy", &args, 1, 2)?;
                let print_only = match args.get(1) {
                    None => false,
                    Some(&"print") => true,
                    Some(other) => {
                        return Err(Error::invalid_command(
                            "spy",
                            format!("expected print, got {other:?}"),
                        ));
                    }
                };
                Ok(Self::Spy {
                    procedure: args[0].to_owned(),
                    print_only,
                })
            }
            "nospy" => {
                expect_arity("nospy", &args, 1, 1)?;
                Ok(Self::NoSpy(args[0].to_owned()))
            }
            "hold" => {
                expect_arity("hold", &args, 2, 2)?;
                let name = args[0].strip_prefix('$').unwrap_or(args[0]);
                if name.is_empty() {
                    return Err(Error::invalid_command("hold", "missing name"));
                }
                Ok(Self::Hold {
                    name: name.to_owned(),
                    source: args[1].parse()?,
                })
            }
            "print" | "p" => {
                expect_arity("print", &args, 1, 1)?;
                Ok(Self::Print(args[0].parse()?))
            }
            "held_vars" => {
                expect_arity("held_vars", &args, 0, 0)?;
                Ok(Self::HeldVars)
            }
            "vars" | "v" => {
                expect_arity("vars", &args, 0, 0)?;
                Ok(Self::Vars)
            }
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(Error::unknown_command(other)),
        }
    }

    /// Returns true if the command hands control back to the engine.
    #[must_use]
    pub const fn resumes(&self) -> bool {
        matches!(self, Self::Resume(_) | Self::Step(_) | Self::FinishCurrent)
    }
}

impl FromStr for ConsoleCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// =============================================================================
// Tests
// =============================================================================
