use crate::compiler_frontend::expressions::expression::{Expression, ExpressionContext};
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::filters::filter_chain::Filter;
use crate::compiler_frontend::filters::runtime_functions::{JOIN, JOIN_OPTION};

/// `${list @ join=', '}` becomes `join(list, ', ')`
pub struct JoinFilter;

impl Filter for JoinFilter {
    fn name(&self) -> &'static str {
        "join"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, expression: Expression, _context: ExpressionContext) -> Expression {
        if !expression.contains_option(JOIN_OPTION) {
            return expression;
        }

        let (expression, separator) = expression.remove_option(JOIN_OPTION);
        let Some(separator) = separator else {
            return expression;
        };

        expression.map_root(|root| ExpressionNode::runtime_call(JOIN, vec![root, separator]))
    }
}
