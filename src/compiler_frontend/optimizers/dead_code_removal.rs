//! # Dead Code Removal
//!
//! Removes conditionals whose outcome is already known from a literal binding.
//!
//! ```text
//! let v = 'a'          let v = 'a'
//! if v                 text "X"
//!   text "X"     ->
//! end if
//! let v = false        let v = false
//! if v
//!   text "Y"
//! end if
//! ```
//!
//! A conditional that always passes loses its Start and End but keeps its body.
//! One that never passes is dropped through its matching End.
//! Conditionals on anything not bound to a literal are left alone.

use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::CommandStream;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::stateful_replay::{StatefulPass, Step, replay};
use crate::compiler_frontend::optimizers::stream_transformer::StreamTransformer;
use crate::compiler_frontend::optimizers::variable_tracker::{
    ScopeKind, VariableTracker, mismatched_end_message,
};
use crate::{pass_log, return_compiler_error};

pub struct DeadCodeRemoval;

pub struct DeadCodeState {
    // Truth of each variable bound to a literal
    variables: VariableTracker<bool>,

    conditionals: Vec<OpenConditional>,
}

struct OpenConditional {
    // Whether its End is written
    kept_end: bool,

    // Scopes open around it, a removed conditional has no scope of its own to check its End against
    scope_depth: usize,
}

impl StatefulPass for DeadCodeRemoval {
    type State = DeadCodeState;

    fn initial_state(&self) -> DeadCodeState {
        DeadCodeState {
            variables: VariableTracker::new(),
            conditionals: Vec::new(),
        }
    }

    fn step(
        &self,
        mut state: DeadCodeState,
        command: &Command,
        upcoming: &[Command],
        output: &mut CommandStream,
    ) -> Result<(DeadCodeState, Step), CompilerError> {
        match command {
            Command::ConditionalStart {
                variable,
                expected_truth,
            } => match state.variables.lookup(variable).copied() {
                None => {
                    state.conditionals.push(OpenConditional {
                        kept_end: true,
                        scope_depth: state.variables.open_scopes(),
                    });
                    state.variables.open_scope(ScopeKind::Branch);
                    output.write(command.to_owned())?;
                }
                Some(truth) if truth == *expected_truth => {
                    pass_log!("Condition on ", Bright variable, " always passes");
                    state.conditionals.push(OpenConditional {
                        kept_end: false,
                        scope_depth: state.variables.open_scopes(),
                    });
                }
                Some(_) => {
                    pass_log!("Condition on ", Bright variable, " never passes");
                    return Ok((state, Step::IgnoreRange));
                }
            },

            Command::ConditionalEnd => match state.conditionals.pop() {
                Some(OpenConditional { kept_end: true, .. }) => {
                    if let Err(open) = state.variables.close_scope(ScopeKind::Branch) {
                        return_compiler_error!(
                            mismatched_end_message(command, open),
                            {
                                CompilationStage => "Dead Code Removal",
                                CommandKind => "Conditional",
                            }
                        )
                    }
                    output.write(Command::ConditionalEnd)?;
                }
                Some(OpenConditional { kept_end: false, scope_depth }) => {
                    if state.variables.open_scopes() != scope_depth {
                        return_compiler_error!(
                            "Found the end of a conditional while a block inside it was still open",
                            {
                                CompilationStage => "Dead Code Removal",
                                CommandKind => "Conditional",
                            }
                        )
                    }
                }
                None => {
                    return_compiler_error!(
                        "Found the end of a conditional that was never started",
                        {
                            CompilationStage => "Dead Code Removal",
                            CommandKind => "Conditional",
                        }
                    )
                }
            },

            Command::VariableBindingStart {
                variable,
                expression,
            } => {
                state.variables.bind(variable, expression.literal_truth());
                output.write(command.to_owned())?;
            }

            Command::VariableBindingGlobal {
                variable,
                expression,
            } => {
                state
                    .variables
                    .assign_global(variable, expression.literal_truth());
                output.write(command.to_owned())?;
            }

            Command::VariableBindingEnd => {
                if state.variables.unbind().is_none() {
                    return_compiler_error!(
                        "Found the end of a variable binding that was never started",
                        {
                            CompilationStage => "Dead Code Removal",
                            CommandKind => "VariableBinding",
                        }
                    )
                }
                output.write(Command::VariableBindingEnd)?;
            }

            Command::LoopStart { .. } => {
                state.variables.enter_loop(command, upcoming);
                output.write(command.to_owned())?;
            }

            Command::ProcedureStart { parameters, .. } => {
                state.variables.enter_procedure(parameters);
                output.write(command.to_owned())?;
            }

            Command::LoopEnd | Command::ProcedureEnd => {
                let closed = match ScopeKind::closed_by(command) {
                    Some(kind) => state.variables.close_scope(kind),
                    None => Err(None),
                };
                if let Err(open) = closed {
                    return_compiler_error!(
                        mismatched_end_message(command, open),
                        { CompilationStage => "Dead Code Removal" }
                    )
                }
                output.write(command.to_owned())?;
            }

            Command::ProcedureCall { .. }
            | Command::OutputVariable { .. }
            | Command::OutText { .. } => {
                output.write(command.to_owned())?;
            }
        }

        Ok((state, Step::Continue))
    }

    fn finish(&self, state: DeadCodeState) -> Result<(), CompilerError> {
        if !state.conditionals.is_empty() {
            return_compiler_error!(
                format!(
                    "The command stream ended with {} conditional(s) still open",
                    state.conditionals.len()
                ),
                {
                    CompilationStage => "Dead Code Removal",
                    CommandKind => "Conditional",
                }
            )
        }

        Ok(())
    }
}

impl StreamTransformer for DeadCodeRemoval {
    fn name(&self) -> &'static str {
        "dead_code_removal"
    }

    fn transform(&self, input: &[Command], output: &mut CommandStream) -> Result<(), CompilerError> {
        replay(self, input, output)
    }
}

#[cfg(test)]
#[path = "tests/dead_code_removal_tests.rs"]
mod dead_code_removal_tests;
