//! # Stateful Replay
//!
//! Drives a pass over a recorded command sequence, threading the pass's state through each step
//! by value. A pass can ask for the range opened by the current Start command to be skipped,
//! the driver then drops everything up to and including the matching End of the same kind
//! without showing it to the pass.

use crate::compiler_frontend::commands::command_nodes::{Boundary, Command, CommandKind};
use crate::compiler_frontend::commands::command_stream::CommandStream;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::return_compiler_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,

    /// Skip the current Start command and everything through its matching End
    IgnoreRange,
}

pub trait StatefulPass {
    type State;

    fn initial_state(&self) -> Self::State;

    /// `upcoming` is everything after `command`, for passes that need to look ahead into a block
    fn step(
        &self,
        state: Self::State,
        command: &Command,
        upcoming: &[Command],
        output: &mut CommandStream,
    ) -> Result<(Self::State, Step), CompilerError>;

    /// Called after the last command, for checks on the final state
    fn finish(&self, _state: Self::State) -> Result<(), CompilerError> {
        Ok(())
    }
}

struct IgnoredRange {
    kind: CommandKind,

    // Same kind Starts seen inside the range that are still open
    depth: usize,
}

pub fn replay<P: StatefulPass + ?Sized>(
    pass: &P,
    input: &[Command],
    output: &mut CommandStream,
) -> Result<(), CompilerError> {
    let mut state = pass.initial_state();
    let mut ignored: Option<IgnoredRange> = None;

    for (index, command) in input.iter().enumerate() {
        if let Some(range) = ignored.as_mut() {
            if command.kind() == range.kind {
                match command.boundary() {
                    Boundary::Start => range.depth += 1,
                    Boundary::End if range.depth == 0 => ignored = None,
                    Boundary::End => range.depth -= 1,
                    Boundary::Leaf => {}
                }
            }
            continue;
        }

        let (next_state, step) = pass.step(state, command, &input[index + 1..], output)?;
        state = next_state;

        if step == Step::IgnoreRange {
            if command.boundary() != Boundary::Start {
                return_compiler_error!(
                    format!("A pass tried to skip a range starting at '{command}', which doesn't open a block"),
                    { CompilationStage => "Optimization" }
                )
            }

            ignored = Some(IgnoredRange {
                kind: command.kind(),
                depth: 0,
            });
        }
    }

    if let Some(range) = ignored {
        return_compiler_error!(
            format!(
                "The command stream ended inside a skipped {} block",
                range.kind.to_str()
            ),
            { CompilationStage => "Optimization" }
        )
    }

    pass.finish(state)
}

/// The body of the block opened just before `upcoming`, without its End
pub fn block_body(kind: CommandKind, upcoming: &[Command]) -> &[Command] {
    let mut depth = 0usize;

    for (index, command) in upcoming.iter().enumerate() {
        if command.kind() != kind {
            continue;
        }

        match command.boundary() {
            Boundary::Start => depth += 1,
            Boundary::End if depth == 0 => return &upcoming[..index],
            Boundary::End => depth -= 1,
            Boundary::Leaf => {}
        }
    }

    upcoming
}
