use crate::compiler_frontend::expressions::expression::{
    Expression, ExpressionContext, MarkupContext,
};
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::filters::filter_chain::Filter;
use crate::compiler_frontend::filters::runtime_functions::{CONTEXT_OPTION, XSS};

/// Wraps the expression in an escaping call for its markup context.
/// `${title @ context='attribute'}` becomes `xss(title, 'attribute')`.
///
/// Always the last filter, escaping has to see the final value.
/// The `unsafe` context only drops the option.
pub struct XssFilter;

impl Filter for XssFilter {
    fn name(&self) -> &'static str {
        "xss"
    }

    fn priority(&self) -> i32 {
        110
    }

    fn apply(&self, expression: Expression, _context: ExpressionContext) -> Expression {
        if !expression.contains_option(CONTEXT_OPTION) {
            return expression;
        }

        let (expression, markup_context) = expression.remove_option(CONTEXT_OPTION);
        let Some(markup_context) = markup_context else {
            return expression;
        };

        if let ExpressionNode::StringConstant(name) = &markup_context {
            if MarkupContext::from_name(name) == Some(MarkupContext::Unsafe) {
                return expression;
            }
        }

        expression.map_root(|root| ExpressionNode::runtime_call(XSS, vec![root, markup_context]))
    }
}
