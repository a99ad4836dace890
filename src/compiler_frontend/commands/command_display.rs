//! Command Display
//!
//! Renders commands one per line for dev logging and the CLI,
//! with the body of each block indented under its Start.

use crate::compiler_frontend::commands::command_nodes::{Boundary, Command};
use crate::compiler_frontend::commands::command_visitor::CommandVisitor;
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use std::fmt::{Display, Formatter, Result as FmtResult, Write as _};

const INDENT: &str = "  ";

struct CommandPrinter;

impl CommandVisitor for CommandPrinter {
    type Output = String;

    fn visit_conditional_start(&mut self, variable: &str, expected_truth: bool) -> String {
        if expected_truth {
            format!("if {variable}")
        } else {
            format!("if !{variable}")
        }
    }

    fn visit_conditional_end(&mut self) -> String {
        String::from("end if")
    }

    fn visit_variable_binding_start(&mut self, variable: &str, expression: &ExpressionNode) -> String {
        format!("let {variable} = {expression}")
    }

    fn visit_variable_binding_end(&mut self) -> String {
        String::from("end let")
    }

    fn visit_variable_binding_global(
        &mut self,
        variable: &str,
        expression: &ExpressionNode,
    ) -> String {
        format!("global {variable} = {expression}")
    }

    fn visit_loop_start(
        &mut self,
        list_variable: &str,
        item_variable: &str,
        index_variable: &str,
    ) -> String {
        format!("for {item_variable}, {index_variable} in {list_variable}")
    }

    fn visit_loop_end(&mut self) -> String {
        String::from("end for")
    }

    fn visit_procedure_start(&mut self, name: &str, parameters: &[String]) -> String {
        format!("template {name}({})", parameters.join(", "))
    }

    fn visit_procedure_end(&mut self) -> String {
        String::from("end template")
    }

    fn visit_procedure_call(&mut self, template_variable: &str, arguments_variable: &str) -> String {
        format!("call {template_variable}({arguments_variable})")
    }

    fn visit_output_variable(&mut self, variable: &str) -> String {
        format!("out {variable}")
    }

    fn visit_out_text(&mut self, text: &str) -> String {
        format!("text {text:?}")
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.accept(&mut CommandPrinter))
    }
}

/// The whole stream as an indented listing
pub fn display_commands(commands: &[Command]) -> String {
    let mut listing = String::new();
    let mut depth = 0usize;

    for command in commands {
        if command.boundary() == Boundary::End {
            depth = depth.saturating_sub(1);
        }

        let _ = writeln!(listing, "{}{}", INDENT.repeat(depth), command);

        if command.boundary() == Boundary::Start {
            depth += 1;
        }
    }

    listing
}
