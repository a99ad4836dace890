//! Result types of the HTL operators, given the types of their operands.

use crate::compiler_frontend::expressions::expression_nodes::{BinaryOperator, UnaryOperator};
use crate::compiler_frontend::type_inference::types::Type;

pub fn unary_type(operator: UnaryOperator, _target: Type) -> Type {
    match operator {
        UnaryOperator::Not | UnaryOperator::IsWhiteSpace => Type::Boolean,
        UnaryOperator::Length => Type::Long,
    }
}

pub fn binary_type(operator: BinaryOperator, left: Type, right: Type) -> Type {
    match operator {
        BinaryOperator::Lt
        | BinaryOperator::Leq
        | BinaryOperator::Gt
        | BinaryOperator::Geq
        | BinaryOperator::Eq
        | BinaryOperator::Neq
        | BinaryOperator::StrictEq
        | BinaryOperator::StrictNeq
        | BinaryOperator::In => Type::Boolean,

        BinaryOperator::Concatenate => Type::String,

        // `a || b` evaluates to one of its operands
        BinaryOperator::And | BinaryOperator::Or => {
            if left == right {
                left
            } else {
                Type::Unknown
            }
        }

        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
            match (left, right) {
                (Type::Long, Type::Long) => Type::Long,
                (lhs, rhs) if lhs.is_numeric() && rhs.is_numeric() => Type::Double,
                _ => Type::Unknown,
            }
        }

        BinaryOperator::Div => numeric_result(left, right, Type::Double),
        BinaryOperator::IDiv | BinaryOperator::Rem => numeric_result(left, right, Type::Long),
    }
}

fn numeric_result(left: Type, right: Type, result: Type) -> Type {
    if left.is_numeric() && right.is_numeric() {
        result
    } else {
        Type::Unknown
    }
}

#[cfg(test)]
#[path = "tests/type_rules_tests.rs"]
mod type_rules_tests;
