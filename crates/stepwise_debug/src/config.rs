//! Configuration for a debugging session.

use crate::held::INITIAL_HELD_CAPACITY;
use crate::trace::{HumanFormatter, OutputFormat, PrintLevel, TraceCommand, TraceOutput};

/// Configuration for a debugging session.
///
/// Controls the initial stepping command, printing, and where summary lines
/// go.
#[derive(Clone, Debug)]
pub struct DebuggerConfig {
    /// Command in force before the first event.
    pub initial_command: TraceCommand,

    /// Initial print level.
    pub print_level: PrintLevel,

    /// Whether commands start out strict (ignoring spy-point stops).
    pub strict: bool,

    /// Initial capacity of the held-variable table.
    pub held_capacity: usize,

    /// Summary line format.
    pub format: OutputFormat,

    /// Layout of human-readable summary lines.
    pub human: HumanFormatter,

    /// Summary line destination.
    pub output: TraceOutput,

    /// Prompt shown at stops.
    pub prompt: String,

    /// Whether the operator is prompted at stops.
    pub interactive: bool,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

impl DebuggerConfig {
    /// Interactive defaults: stop at the first event, print spy-point
    /// matches, honor spy-point stops.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            initial_command: TraceCommand::Goto { stop_event: 0 },
            print_level: PrintLevel::Some,
            strict: false,
            held_capacity: INITIAL_HELD_CAPACITY,
            format: OutputFormat::Human,
            human: HumanFormatter::new(),
            output: TraceOutput::Stdout,
            prompt: "mdb> ".to_owned(),
            interactive: true,
        }
    }

    /// Batch defaults: run to the end printing every event, never prompt.
    #[must_use]
    pub fn batch() -> Self {
        Self {
            initial_command: TraceCommand::ToEnd,
            print_level: PrintLevel::All,
            strict: true,
            interactive: false,
            ..Self::interactive()
        }
    }

    /// Builder method to set the initial command.
    #[must_use]
    pub fn with_initial_command(mut self, command: TraceCommand) -> Self {
        self.initial_command = command;
        self
    }

    /// Builder method to set the print level.
    #[must_use]
    pub fn with_print_level(mut self, level: PrintLevel) -> Self {
        self.print_level = level;
        self
    }

    /// Builder method to set strictness.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builder method to set the held-variable table's initial capacity.
    #[must_use]
    pub fn with_held_capacity(mut self, capacity: usize) -> Self {
        self.held_capacity = capacity;
        self
    }

    /// Builder method to set the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method to set the layout of human-readable lines.
    #[must_use]
    pub fn with_human(mut self, human: HumanFormatter) -> Self {
        self.human = human;
        self
    }

    /// Builder method to set the output destination.
    #[must_use]
    pub fn with_output(mut self, output: TraceOutput) -> Self {
        self.output = output;
        self
    }

    /// Builder method to set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}
