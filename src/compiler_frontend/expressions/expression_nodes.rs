//! # Expression Nodes
//!
//! The immutable tree every HTL expression is parsed into.
//! Nodes are plain values: transformations (filters, constant folding) always build new trees
//! and structurally equal trees compare equal.

use serde::{Deserialize, Serialize};

/// A numeric literal keeps whether it was written as an integral or a fractional number,
/// since type inference and folding treat the two differently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Long(i64),
    Double(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Long(value) => value as f64,
            Number::Double(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    And,
    Or,
    Concatenate,
    Lt,
    Leq,
    Gt,
    Geq,
    Eq,
    Neq,
    StrictEq,
    StrictNeq,
    Add,
    Sub,
    Mul,
    IDiv,
    Rem,
    Div,
    In,
}

impl BinaryOperator {
    pub fn to_str(&self) -> &'static str {
        match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Concatenate => "concat",
            BinaryOperator::Lt => "<",
            BinaryOperator::Leq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Geq => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::Neq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNeq => "!==",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::IDiv => "idiv",
            BinaryOperator::Rem => "%",
            BinaryOperator::Div => "/",
            BinaryOperator::In => "in",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Sub
                | BinaryOperator::Mul
                | BinaryOperator::IDiv
                | BinaryOperator::Rem
                | BinaryOperator::Div
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    IsWhiteSpace,
    Length,
}

impl UnaryOperator {
    pub fn to_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::IsWhiteSpace => "isWhiteSpace",
            UnaryOperator::Length => "length",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionNode {
    StringConstant(String),
    NumericConstant(Number),
    BooleanConstant(bool),
    NullLiteral,
    Identifier(String),
    PropertyAccess {
        target: Box<ExpressionNode>,
        property: Box<ExpressionNode>,
    },
    BinaryOperation {
        operator: BinaryOperator,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
    UnaryOperation {
        operator: UnaryOperator,
        target: Box<ExpressionNode>,
    },
    TernaryOperator {
        condition: Box<ExpressionNode>,
        then_branch: Box<ExpressionNode>,
        else_branch: Box<ExpressionNode>,
    },
    RuntimeCall {
        function_name: String,
        arguments: Vec<ExpressionNode>,
    },
    // Entries keep the order they were written in
    MapLiteral(Vec<(String, ExpressionNode)>),
    ArrayLiteral(Vec<ExpressionNode>),
}

impl ExpressionNode {
    pub fn string(value: impl Into<String>) -> Self {
        ExpressionNode::StringConstant(value.into())
    }

    pub fn long(value: i64) -> Self {
        ExpressionNode::NumericConstant(Number::Long(value))
    }

    pub fn double(value: f64) -> Self {
        ExpressionNode::NumericConstant(Number::Double(value))
    }

    pub fn boolean(value: bool) -> Self {
        ExpressionNode::BooleanConstant(value)
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        ExpressionNode::Identifier(name.into())
    }

    pub fn property_access(target: ExpressionNode, property: ExpressionNode) -> Self {
        ExpressionNode::PropertyAccess {
            target: Box::new(target),
            property: Box::new(property),
        }
    }

    pub fn binary(operator: BinaryOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::BinaryOperation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: UnaryOperator, target: ExpressionNode) -> Self {
        ExpressionNode::UnaryOperation {
            operator,
            target: Box::new(target),
        }
    }

    pub fn ternary(
        condition: ExpressionNode,
        then_branch: ExpressionNode,
        else_branch: ExpressionNode,
    ) -> Self {
        ExpressionNode::TernaryOperator {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn runtime_call(function_name: impl Into<String>, arguments: Vec<ExpressionNode>) -> Self {
        ExpressionNode::RuntimeCall {
            function_name: function_name.into(),
            arguments,
        }
    }

    /// String, numeric, boolean and null constants.
    /// Map and array literals are not constants even when all their entries are.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExpressionNode::StringConstant(_)
                | ExpressionNode::NumericConstant(_)
                | ExpressionNode::BooleanConstant(_)
                | ExpressionNode::NullLiteral
        )
    }

    /// Truth value of a literal node under the runtime's boolean coercion.
    /// Returns None for anything that isn't a literal, the value is only known at render time.
    ///
    /// - null is false
    /// - numbers are false only when equal to zero
    /// - strings are trimmed: empty is false, "true"/"false" in any casing parse to that boolean,
    ///   any other text is true
    pub fn literal_truth(&self) -> Option<bool> {
        match self {
            ExpressionNode::NullLiteral => Some(false),
            ExpressionNode::BooleanConstant(value) => Some(*value),
            ExpressionNode::NumericConstant(number) => Some(number.as_f64() != 0.0),
            ExpressionNode::StringConstant(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Some(false)
                } else if trimmed.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    Some(true)
                }
            }
            _ => None,
        }
    }

    /// Every variable name read by this tree, in evaluation order.
    pub fn referenced_identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            ExpressionNode::Identifier(name) => names.push(name),
            ExpressionNode::PropertyAccess { target, property } => {
                target.collect_identifiers(names);
                property.collect_identifiers(names);
            }
            ExpressionNode::BinaryOperation { left, right, .. } => {
                left.collect_identifiers(names);
                right.collect_identifiers(names);
            }
            ExpressionNode::UnaryOperation { target, .. } => target.collect_identifiers(names),
            ExpressionNode::TernaryOperator {
                condition,
                then_branch,
                else_branch,
            } => {
                condition.collect_identifiers(names);
                then_branch.collect_identifiers(names);
                else_branch.collect_identifiers(names);
            }
            ExpressionNode::RuntimeCall { arguments, .. }
            | ExpressionNode::ArrayLiteral(arguments) => {
                for argument in arguments {
                    argument.collect_identifiers(names);
                }
            }
            ExpressionNode::MapLiteral(entries) => {
                for (_, value) in entries {
                    value.collect_identifiers(names);
                }
            }
            ExpressionNode::StringConstant(_)
            | ExpressionNode::NumericConstant(_)
            | ExpressionNode::BooleanConstant(_)
            | ExpressionNode::NullLiteral => {}
        }
    }

    /// Number of nodes in this tree, including itself.
    pub fn node_count(&self) -> usize {
        1 + match self {
            ExpressionNode::PropertyAccess { target, property } => {
                target.node_count() + property.node_count()
            }
            ExpressionNode::BinaryOperation { left, right, .. } => {
                left.node_count() + right.node_count()
            }
            ExpressionNode::UnaryOperation { target, .. } => target.node_count(),
            ExpressionNode::TernaryOperator {
                condition,
                then_branch,
                else_branch,
            } => condition.node_count() + then_branch.node_count() + else_branch.node_count(),
            ExpressionNode::RuntimeCall { arguments, .. }
            | ExpressionNode::ArrayLiteral(arguments) => {
                arguments.iter().map(ExpressionNode::node_count).sum()
            }
            ExpressionNode::MapLiteral(entries) => {
                entries.iter().map(|(_, value)| value.node_count()).sum()
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
#[path = "tests/expression_tests.rs"]
mod expression_tests;
