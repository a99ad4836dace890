//! # Commands
//!
//! The flat instruction set a compiled template is lowered into.
//! Block structure is expressed through paired Start/End commands rather than nesting,
//! so passes can stream over a template without building a tree.
//!
//! Every Start has exactly one matching End of the same kind, and pairs of the same kind
//! nest like brackets. Pairs of different kinds must also nest properly inside each other.

use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Runs the body only when the truth of `variable` equals `expected_truth`
    ConditionalStart {
        variable: String,
        expected_truth: bool,
    },
    ConditionalEnd,

    /// Binds `variable` until the matching VariableBindingEnd
    VariableBindingStart {
        variable: String,
        expression: ExpressionNode,
    },
    VariableBindingEnd,

    /// Assigns a variable that stays visible for the rest of the enclosing procedure
    VariableBindingGlobal {
        variable: String,
        expression: ExpressionNode,
    },

    LoopStart {
        list_variable: String,
        item_variable: String,
        index_variable: String,
    },
    LoopEnd,

    /// A `data-sly-template` definition. Its body only runs when called.
    ProcedureStart {
        name: String,
        parameters: Vec<String>,
    },
    ProcedureEnd,
    ProcedureCall {
        template_variable: String,
        arguments_variable: String,
    },

    OutputVariable {
        variable: String,
    },
    OutText {
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Conditional,
    VariableBinding,
    Loop,
    Procedure,
    Output,
}

impl CommandKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            CommandKind::Conditional => "Conditional",
            CommandKind::VariableBinding => "VariableBinding",
            CommandKind::Loop => "Loop",
            CommandKind::Procedure => "Procedure",
            CommandKind::Output => "Output",
        }
    }
}

/// Where a command sits in the block structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
    Leaf,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ConditionalStart { .. } | Command::ConditionalEnd => CommandKind::Conditional,
            Command::VariableBindingStart { .. }
            | Command::VariableBindingEnd
            | Command::VariableBindingGlobal { .. } => CommandKind::VariableBinding,
            Command::LoopStart { .. } | Command::LoopEnd => CommandKind::Loop,
            Command::ProcedureStart { .. }
            | Command::ProcedureEnd
            | Command::ProcedureCall { .. } => CommandKind::Procedure,
            Command::OutputVariable { .. } | Command::OutText { .. } => CommandKind::Output,
        }
    }

    pub fn boundary(&self) -> Boundary {
        match self {
            Command::ConditionalStart { .. }
            | Command::VariableBindingStart { .. }
            | Command::LoopStart { .. }
            | Command::ProcedureStart { .. } => Boundary::Start,

            Command::ConditionalEnd
            | Command::VariableBindingEnd
            | Command::LoopEnd
            | Command::ProcedureEnd => Boundary::End,

            Command::VariableBindingGlobal { .. }
            | Command::ProcedureCall { .. }
            | Command::OutputVariable { .. }
            | Command::OutText { .. } => Boundary::Leaf,
        }
    }

    /// The expression a binding command evaluates, if this is one
    pub fn expression(&self) -> Option<&ExpressionNode> {
        match self {
            Command::VariableBindingStart { expression, .. }
            | Command::VariableBindingGlobal { expression, .. } => Some(expression),
            _ => None,
        }
    }

    /// Every variable this command reads, including the ones inside a binding's expression
    pub fn read_variables(&self) -> Vec<&str> {
        match self {
            Command::VariableBindingStart { expression, .. }
            | Command::VariableBindingGlobal { expression, .. } => {
                expression.referenced_identifiers()
            }
            Command::ConditionalStart { variable, .. } | Command::OutputVariable { variable } => {
                vec![variable.as_str()]
            }
            Command::LoopStart { list_variable, .. } => vec![list_variable.as_str()],
            Command::ProcedureCall {
                template_variable,
                arguments_variable,
            } => vec![template_variable.as_str(), arguments_variable.as_str()],
            Command::ConditionalEnd
            | Command::VariableBindingEnd
            | Command::LoopEnd
            | Command::ProcedureStart { .. }
            | Command::ProcedureEnd
            | Command::OutText { .. } => Vec::new(),
        }
    }

    // Shorthands, mostly for building streams by hand in passes and tests

    pub fn bind(variable: impl Into<String>, expression: ExpressionNode) -> Self {
        Command::VariableBindingStart {
            variable: variable.into(),
            expression,
        }
    }

    pub fn global(variable: impl Into<String>, expression: ExpressionNode) -> Self {
        Command::VariableBindingGlobal {
            variable: variable.into(),
            expression,
        }
    }

    pub fn test(variable: impl Into<String>, expected_truth: bool) -> Self {
        Command::ConditionalStart {
            variable: variable.into(),
            expected_truth,
        }
    }

    pub fn loop_over(
        list_variable: impl Into<String>,
        item_variable: impl Into<String>,
        index_variable: impl Into<String>,
    ) -> Self {
        Command::LoopStart {
            list_variable: list_variable.into(),
            item_variable: item_variable.into(),
            index_variable: index_variable.into(),
        }
    }

    pub fn output(variable: impl Into<String>) -> Self {
        Command::OutputVariable {
            variable: variable.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Command::OutText { text: text.into() }
    }
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod command_tests;
