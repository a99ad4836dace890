//! # Command Stream
//!
//! The channel between the producer of a template's commands and everything that consumes them.
//!
//! Consumers can either register a handler before production starts and receive every command
//! synchronously as it is written (push), or read the recorded sequence back once the producer
//! has finished (replay). Both see exactly the same commands in the same order.
//!
//! Warnings from the markup parser travel through the stream alongside the commands,
//! so they reach the same consumers.

use crate::command_log;
use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::return_compiler_error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamWarning {
    pub message: String,

    // The template code the warning points at
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub kind: WarningKind,
}

impl StreamWarning {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        StreamWarning {
            message: message.into(),
            code: code.into(),
            kind: WarningKind::Template,
        }
    }

    pub fn with_kind(mut self, kind: WarningKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn to_compiler_warning(&self) -> CompilerWarning {
        CompilerWarning::new(&self.message, &self.code, self.kind)
    }
}

/// Receives commands as they are written.
/// Called inline on the producer's thread, in registration order.
pub trait CommandHandler {
    fn on_emit(&mut self, command: &Command);

    fn on_warning(&mut self, _warning: &StreamWarning) {}

    /// Called once when the producer closes the stream
    fn on_done(&mut self) {}
}

impl<F: FnMut(&Command)> CommandHandler for F {
    fn on_emit(&mut self, command: &Command) {
        self(command)
    }
}

#[derive(Default)]
pub struct CommandStream {
    commands: Vec<Command>,
    warnings: Vec<StreamWarning>,
    handlers: Vec<Box<dyn CommandHandler>>,
    closed: bool,
}

impl std::fmt::Debug for CommandStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandStream")
            .field("commands", &self.commands)
            .field("warnings", &self.warnings)
            .field("handlers", &self.handlers.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl CommandStream {
    pub fn new() -> Self {
        CommandStream::default()
    }

    /// A closed stream holding an already produced sequence
    pub fn from_commands(commands: Vec<Command>) -> Self {
        CommandStream {
            commands,
            warnings: Vec::new(),
            handlers: Vec::new(),
            closed: true,
        }
    }

    /// Handlers only see commands written after they were added
    pub fn add_handler(&mut self, handler: Box<dyn CommandHandler>) {
        self.handlers.push(handler);
    }

    pub fn write(&mut self, command: Command) -> Result<(), CompilerError> {
        if self.closed {
            return_compiler_error!(
                format!("Tried to write '{command}' to a command stream that was already closed"),
                { CompilationStage => "Command Stream" }
            )
        }

        command_log!(Dark Blue "emit ", { command.to_string() });

        for handler in self.handlers.iter_mut() {
            handler.on_emit(&command);
        }

        self.commands.push(command);
        Ok(())
    }

    pub fn warn(&mut self, warning: StreamWarning) -> Result<(), CompilerError> {
        if self.closed {
            return_compiler_error!(
                format!(
                    "Tried to add warning '{}' to a command stream that was already closed",
                    warning.message
                ),
                { CompilationStage => "Command Stream" }
            )
        }

        for handler in self.handlers.iter_mut() {
            handler.on_warning(&warning);
        }

        self.warnings.push(warning);
        Ok(())
    }

    /// Signals the end of production. Closing twice does nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        for handler in self.handlers.iter_mut() {
            handler.on_done();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn warnings(&self) -> &[StreamWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Command>, Vec<StreamWarning>) {
        (self.commands, self.warnings)
    }
}

#[cfg(test)]
#[path = "tests/command_stream_tests.rs"]
mod command_stream_tests;
