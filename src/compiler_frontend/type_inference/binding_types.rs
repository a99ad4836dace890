//! The type of every variable a command stream binds, in stream order.
//! A code generator uses these to declare its variables with a static type where one is known.

use crate::compiler_frontend::commands::command_nodes::{Command, CommandKind};
use crate::compiler_frontend::optimizers::stateful_replay::block_body;
use crate::compiler_frontend::type_inference::type_inference::infer_types;
use crate::compiler_frontend::type_inference::types::Type;
use crate::compiler_frontend::type_inference::variable_analyzer::{
    ScopedVariableAnalyzer, VariableScope,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingType {
    pub variable: String,

    #[serde(rename = "type")]
    pub binding_type: Type,
    pub scope: VariableScope,
}

pub fn annotate_bindings(commands: &[Command]) -> Vec<BindingType> {
    let mut analyzer = ScopedVariableAnalyzer::new();
    let mut bindings = Vec::new();

    for (index, command) in commands.iter().enumerate() {
        match command {
            Command::VariableBindingStart {
                variable,
                expression,
            } => {
                let binding_type = infer_types(expression, &analyzer).root_type();
                analyzer.begin_variable(variable, binding_type);
                bindings.push(BindingType {
                    variable: variable.to_owned(),
                    binding_type,
                    scope: VariableScope::Local,
                });
            }

            Command::VariableBindingGlobal {
                variable,
                expression,
            } => {
                let binding_type = infer_types(expression, &analyzer).root_type();
                analyzer.declare_global(variable, binding_type);
                bindings.push(BindingType {
                    variable: variable.to_owned(),
                    binding_type,
                    scope: VariableScope::Global,
                });
            }

            Command::VariableBindingEnd => {
                analyzer.end_variable();
            }

            Command::LoopStart {
                item_variable,
                index_variable,
                ..
            } => {
                // From the second iteration on, the body reads what its own globals left behind
                for body_command in block_body(CommandKind::Loop, &commands[index + 1..]) {
                    if let Command::VariableBindingGlobal { variable, .. } = body_command {
                        analyzer.forget_variable(variable);
                    }
                }

                analyzer.begin_variable(item_variable, Type::Unknown);
                analyzer.begin_variable(index_variable, Type::Unknown);
            }

            Command::LoopEnd => {
                analyzer.end_variable();
                analyzer.end_variable();
            }

            Command::ProcedureStart { parameters, .. } => analyzer.enter_procedure(parameters),
            Command::ProcedureEnd => {
                analyzer.exit_procedure();
            }

            Command::ConditionalStart { .. }
            | Command::ConditionalEnd
            | Command::ProcedureCall { .. }
            | Command::OutputVariable { .. }
            | Command::OutText { .. } => {}
        }
    }

    bindings
}

#[cfg(test)]
#[path = "tests/binding_types_tests.rs"]
mod binding_types_tests;
