//! # Constant Folding
//!
//! Evaluates the parts of binding expressions that only depend on literals,
//! and substitutes variables that are bound to a literal at that point in the stream.
//!
//! ## Supported Operations
//!
//! - **Arithmetic**: `+ - *` on integers (unless they overflow) and on mixed numbers,
//!   `/` always gives a double, `idiv` and `%` on integers
//! - **Logic**: `!`, and `&&`/`||` with their value semantics:
//!   `a && b` is `a` when `a` is falsy, otherwise `b`
//! - **Comparison**: equality between literals of the same type, relational operators on numbers
//! - **Ternary** with a literal condition picks its branch
//!
//! Division or remainder by zero is left for the runtime to deal with.
//! Anything that can't be reduced is rebuilt unchanged around its folded children.

use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::CommandStream;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::expressions::expression_nodes::{
    BinaryOperator, ExpressionNode, Number, UnaryOperator,
};
use crate::compiler_frontend::expressions::node_visitor::NodeVisitor;
use crate::compiler_frontend::optimizers::stateful_replay::{StatefulPass, Step, replay};
use crate::compiler_frontend::optimizers::stream_transformer::StreamTransformer;
use crate::compiler_frontend::optimizers::variable_tracker::{
    ScopeKind, VariableTracker, mismatched_end_message,
};
use crate::{pass_log, return_compiler_error};

pub struct ConstantFolding;

pub struct FoldingState {
    // Literal value of each variable bound to one
    variables: VariableTracker<ExpressionNode>,
}

impl StatefulPass for ConstantFolding {
    type State = FoldingState;

    fn initial_state(&self) -> FoldingState {
        FoldingState {
            variables: VariableTracker::new(),
        }
    }

    fn step(
        &self,
        mut state: FoldingState,
        command: &Command,
        upcoming: &[Command],
        output: &mut CommandStream,
    ) -> Result<(FoldingState, Step), CompilerError> {
        match command {
            Command::VariableBindingStart {
                variable,
                expression,
            } => {
                let folded = fold_expression(expression, &state.variables);
                state.variables.bind(variable, known_literal(&folded));
                output.write(Command::bind(variable, folded))?;
            }

            Command::VariableBindingGlobal {
                variable,
                expression,
            } => {
                let folded = fold_expression(expression, &state.variables);
                state
                    .variables
                    .assign_global(variable, known_literal(&folded));
                output.write(Command::global(variable, folded))?;
            }

            Command::VariableBindingEnd => {
                if state.variables.unbind().is_none() {
                    return_compiler_error!(
                        "Found the end of a variable binding that was never started",
                        {
                            CompilationStage => "Constant Folding",
                            CommandKind => "VariableBinding",
                        }
                    )
                }
                output.write(Command::VariableBindingEnd)?;
            }

            // The body may not run, whatever it assigns is uncertain afterwards
            Command::ConditionalStart { .. } => {
                state.variables.open_scope(ScopeKind::Branch);
                output.write(command.to_owned())?;
            }

            Command::LoopStart { .. } => {
                state.variables.enter_loop(command, upcoming);
                output.write(command.to_owned())?;
            }

            Command::ProcedureStart { parameters, .. } => {
                state.variables.enter_procedure(parameters);
                output.write(command.to_owned())?;
            }

            Command::ConditionalEnd | Command::LoopEnd | Command::ProcedureEnd => {
                let closed = match ScopeKind::closed_by(command) {
                    Some(kind) => state.variables.close_scope(kind),
                    None => Err(None),
                };
                if let Err(open) = closed {
                    return_compiler_error!(
                        mismatched_end_message(command, open),
                        { CompilationStage => "Constant Folding" }
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

    fn finish(&self, state: FoldingState) -> Result<(), CompilerError> {
        let open_scopes = state.variables.open_scopes();
        if open_scopes > 0 {
            return_compiler_error!(
                format!("The command stream ended with {open_scopes} block(s) still open"),
                { CompilationStage => "Constant Folding" }
            )
        }

        Ok(())
    }
}

impl StreamTransformer for ConstantFolding {
    fn name(&self) -> &'static str {
        "constant_folding"
    }

    fn transform(&self, input: &[Command], output: &mut CommandStream) -> Result<(), CompilerError> {
        replay(self, input, output)
    }
}

fn known_literal(node: &ExpressionNode) -> Option<ExpressionNode> {
    node.is_literal().then(|| node.to_owned())
}

/// Folds one expression against the literal values currently in scope
pub fn fold_expression(
    expression: &ExpressionNode,
    variables: &VariableTracker<ExpressionNode>,
) -> ExpressionNode {
    let folded = expression.accept(&mut ConstantFolder { variables });

    if folded != *expression {
        pass_log!("Folded ", { expression.to_string() }, " into ", Bright { folded.to_string() });
    }

    folded
}

struct ConstantFolder<'a> {
    variables: &'a VariableTracker<ExpressionNode>,
}

impl NodeVisitor for ConstantFolder<'_> {
    type Output = ExpressionNode;

    fn visit_string_constant(&mut self, node: &ExpressionNode, _: &str) -> ExpressionNode {
        node.to_owned()
    }

    fn visit_numeric_constant(&mut self, node: &ExpressionNode, _: Number) -> ExpressionNode {
        node.to_owned()
    }

    fn visit_boolean_constant(&mut self, node: &ExpressionNode, _: bool) -> ExpressionNode {
        node.to_owned()
    }

    fn visit_null_literal(&mut self, node: &ExpressionNode) -> ExpressionNode {
        node.to_owned()
    }

    fn visit_identifier(&mut self, node: &ExpressionNode, name: &str) -> ExpressionNode {
        match self.variables.lookup(name) {
            Some(literal) => literal.to_owned(),
            None => node.to_owned(),
        }
    }

    fn visit_property_access(
        &mut self,
        _: &ExpressionNode,
        target: &ExpressionNode,
        property: &ExpressionNode,
    ) -> ExpressionNode {
        ExpressionNode::property_access(target.accept(self), property.accept(self))
    }

    fn visit_binary_operation(
        &mut self,
        _: &ExpressionNode,
        operator: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> ExpressionNode {
        let left = left.accept(self);
        let right = right.accept(self);

        match evaluate_operator(operator, &left, &right) {
            Some(result) => result,
            None => ExpressionNode::binary(operator, left, right),
        }
    }

    fn visit_unary_operation(
        &mut self,
        _: &ExpressionNode,
        operator: UnaryOperator,
        target: &ExpressionNode,
    ) -> ExpressionNode {
        let target = target.accept(self);

        let result = match (operator, &target) {
            (UnaryOperator::Not, literal) if literal.is_literal() => {
                literal.literal_truth().map(|truth| ExpressionNode::boolean(!truth))
            }
            (UnaryOperator::IsWhiteSpace, ExpressionNode::StringConstant(text)) => {
                Some(ExpressionNode::boolean(text.trim().is_empty()))
            }
            (UnaryOperator::Length, ExpressionNode::ArrayLiteral(items)) => {
                Some(ExpressionNode::long(items.len() as i64))
            }
            _ => None,
        };

        result.unwrap_or_else(|| ExpressionNode::unary(operator, target))
    }

    fn visit_ternary_operator(
        &mut self,
        _: &ExpressionNode,
        condition: &ExpressionNode,
        then_branch: &ExpressionNode,
        else_branch: &ExpressionNode,
    ) -> ExpressionNode {
        let condition = condition.accept(self);

        match condition.literal_truth() {
            Some(true) => then_branch.accept(self),
            Some(false) => else_branch.accept(self),
            None => ExpressionNode::ternary(
                condition,
                then_branch.accept(self),
                else_branch.accept(self),
            ),
        }
    }

    fn visit_runtime_call(
        &mut self,
        _: &ExpressionNode,
        function_name: &str,
        arguments: &[ExpressionNode],
    ) -> ExpressionNode {
        let arguments = arguments.iter().map(|argument| argument.accept(self)).collect();
        ExpressionNode::runtime_call(function_name, arguments)
    }

    fn visit_map_literal(
        &mut self,
        _: &ExpressionNode,
        entries: &[(String, ExpressionNode)],
    ) -> ExpressionNode {
        ExpressionNode::MapLiteral(
            entries
                .iter()
                .map(|(key, value)| (key.to_owned(), value.accept(self)))
                .collect(),
        )
    }

    fn visit_array_literal(&mut self, _: &ExpressionNode, items: &[ExpressionNode]) -> ExpressionNode {
        ExpressionNode::ArrayLiteral(items.iter().map(|item| item.accept(self)).collect())
    }
}

/// Evaluates a binary operation on already folded operands.
/// Returns None when the result can only be known at render time.
pub fn evaluate_operator(
    operator: BinaryOperator,
    left: &ExpressionNode,
    right: &ExpressionNode,
) -> Option<ExpressionNode> {
    // Short circuiting only needs the left side
    match operator {
        BinaryOperator::And => {
            return match left.literal_truth()? {
                false => Some(left.to_owned()),
                true => Some(right.to_owned()),
            };
        }
        BinaryOperator::Or => {
            return match left.literal_truth()? {
                true => Some(left.to_owned()),
                false => Some(right.to_owned()),
            };
        }
        _ => {}
    }

    let result = match (left, right) {
        (ExpressionNode::NumericConstant(lhs), ExpressionNode::NumericConstant(rhs)) => {
            evaluate_numbers(operator, *lhs, *rhs)?
        }

        (ExpressionNode::StringConstant(lhs), ExpressionNode::StringConstant(rhs)) => {
            match operator {
                BinaryOperator::Concatenate => ExpressionNode::string(format!("{lhs}{rhs}")),
                BinaryOperator::Eq | BinaryOperator::StrictEq => ExpressionNode::boolean(lhs == rhs),
                BinaryOperator::Neq | BinaryOperator::StrictNeq => {
                    ExpressionNode::boolean(lhs != rhs)
                }
                _ => return None,
            }
        }

        (ExpressionNode::BooleanConstant(lhs), ExpressionNode::BooleanConstant(rhs)) => {
            match operator {
                BinaryOperator::Eq | BinaryOperator::StrictEq => ExpressionNode::boolean(lhs == rhs),
                BinaryOperator::Neq | BinaryOperator::StrictNeq => {
                    ExpressionNode::boolean(lhs != rhs)
                }
                _ => return None,
            }
        }

        (ExpressionNode::NullLiteral, ExpressionNode::NullLiteral) => match operator {
            BinaryOperator::Eq | BinaryOperator::StrictEq => ExpressionNode::boolean(true),
            BinaryOperator::Neq | BinaryOperator::StrictNeq => ExpressionNode::boolean(false),
            _ => return None,
        },

        // Null against any other literal is never equal
        (ExpressionNode::NullLiteral, other) | (other, ExpressionNode::NullLiteral)
            if other.is_literal() =>
        {
            match operator {
                BinaryOperator::Eq | BinaryOperator::StrictEq => ExpressionNode::boolean(false),
                BinaryOperator::Neq | BinaryOperator::StrictNeq => ExpressionNode::boolean(true),
                _ => return None,
            }
        }

        _ => return None,
    };

    Some(result)
}

fn evaluate_numbers(operator: BinaryOperator, lhs: Number, rhs: Number) -> Option<ExpressionNode> {
    // Integer operations
    if let (Number::Long(lhs_val), Number::Long(rhs_val)) = (lhs, rhs) {
        let integer = match operator {
            BinaryOperator::Add => lhs_val.checked_add(rhs_val),
            BinaryOperator::Sub => lhs_val.checked_sub(rhs_val),
            BinaryOperator::Mul => lhs_val.checked_mul(rhs_val),
            BinaryOperator::IDiv => lhs_val.checked_div(rhs_val),
            BinaryOperator::Rem => lhs_val.checked_rem(rhs_val),
            _ => None,
        };

        if let Some(value) = integer {
            return Some(ExpressionNode::long(value));
        }

        // Integer overflow or division by zero
        if operator.is_arithmetic() && operator != BinaryOperator::Div {
            return None;
        }
    }

    let lhs_val = lhs.as_f64();
    let rhs_val = rhs.as_f64();

    let result = match operator {
        BinaryOperator::Add => ExpressionNode::double(lhs_val + rhs_val),
        BinaryOperator::Sub => ExpressionNode::double(lhs_val - rhs_val),
        BinaryOperator::Mul => ExpressionNode::double(lhs_val * rhs_val),
        BinaryOperator::Div => {
            if rhs_val == 0.0 {
                return None;
            }
            ExpressionNode::double(lhs_val / rhs_val)
        }

        BinaryOperator::Eq | BinaryOperator::StrictEq => ExpressionNode::boolean(lhs_val == rhs_val),
        BinaryOperator::Neq | BinaryOperator::StrictNeq => {
            ExpressionNode::boolean(lhs_val != rhs_val)
        }
        BinaryOperator::Lt => ExpressionNode::boolean(lhs_val < rhs_val),
        BinaryOperator::Leq => ExpressionNode::boolean(lhs_val <= rhs_val),
        BinaryOperator::Gt => ExpressionNode::boolean(lhs_val > rhs_val),
        BinaryOperator::Geq => ExpressionNode::boolean(lhs_val >= rhs_val),

        // idiv and % on fractional numbers are left to the runtime's rounding rules
        _ => return None,
    };

    Some(result)
}

#[cfg(test)]
#[path = "tests/constant_folding_tests.rs"]
mod constant_folding_tests;
