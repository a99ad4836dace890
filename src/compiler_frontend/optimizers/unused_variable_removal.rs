//! Removes bindings nobody reads.
//!
//! Dead code removal often leaves these behind: once a conditional is gone,
//! the variable its test was bound to has no reader left.
//! The binding's body is kept, only its Start and End are dropped.

use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::CommandStream;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::stream_transformer::StreamTransformer;
use crate::{pass_log, return_compiler_error};

pub struct UnusedVariableRemoval;

impl StreamTransformer for UnusedVariableRemoval {
    fn name(&self) -> &'static str {
        "unused_variable_removal"
    }

    fn transform(&self, input: &[Command], output: &mut CommandStream) -> Result<(), CompilerError> {
        let binding_ends = match_binding_ends(input)?;
        let mut dropped = vec![false; input.len()];

        for (start, end) in binding_ends {
            let Command::VariableBindingStart { variable, .. } = &input[start] else {
                continue;
            };

            let is_read = input[start + 1..end]
                .iter()
                .any(|command| command.read_variables().contains(&variable.as_str()));

            if !is_read {
                pass_log!("Removing unused variable ", Bright variable);
                dropped[start] = true;
                dropped[end] = true;
            }
        }

        for (command, is_dropped) in input.iter().zip(dropped) {
            if !is_dropped {
                output.write(command.to_owned())?;
            }
        }

        Ok(())
    }
}

/// Pairs the index of every VariableBindingStart with the index of its End
fn match_binding_ends(input: &[Command]) -> Result<Vec<(usize, usize)>, CompilerError> {
    let mut open_bindings = Vec::new();
    let mut pairs = Vec::new();

    for (index, command) in input.iter().enumerate() {
        match command {
            Command::VariableBindingStart { .. } => open_bindings.push(index),
            Command::VariableBindingEnd => match open_bindings.pop() {
                Some(start) => pairs.push((start, index)),
                None => {
                    return_compiler_error!(
                        "Found the end of a variable binding that was never started",
                        {
                            CompilationStage => "Unused Variable Removal",
                            CommandKind => "VariableBinding",
                        }
                    )
                }
            },
            _ => {}
        }
    }

    if !open_bindings.is_empty() {
        return_compiler_error!(
            format!(
                "The command stream ended with {} variable binding(s) still open",
                open_bindings.len()
            ),
            {
                CompilationStage => "Unused Variable Removal",
                CommandKind => "VariableBinding",
            }
        )
    }

    Ok(pairs)
}
