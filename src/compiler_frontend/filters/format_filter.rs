use crate::compiler_frontend::expressions::expression::{Expression, ExpressionContext};
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::filters::filter_chain::Filter;
use crate::compiler_frontend::filters::runtime_functions::{
    FORMAT, FORMAT_OPTION, I18N_OPTION, LOCALE_OPTION, TIMEZONE_OPTION, TYPE_OPTION,
};

/// `${'Page {0} of {1}' @ format=[current, total]}` becomes
/// `format('Page {0} of {1}', {format: [current, total]})`.
///
/// Date and number formatting options travel in the same map.
/// `locale` is left alone while an `i18n` option is still pending, it belongs to the translation.
pub struct FormatFilter;

impl Filter for FormatFilter {
    fn name(&self) -> &'static str {
        "format"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, expression: Expression, _context: ExpressionContext) -> Expression {
        if !expression.contains_option(FORMAT_OPTION) {
            return expression;
        }

        let mut expression = expression;
        let consumed: &[&str] = if expression.contains_option(I18N_OPTION) {
            &[FORMAT_OPTION, TYPE_OPTION, TIMEZONE_OPTION]
        } else {
            &[FORMAT_OPTION, TYPE_OPTION, TIMEZONE_OPTION, LOCALE_OPTION]
        };

        let format_options = expression.take_options(consumed);
        expression.map_root(|root| {
            ExpressionNode::runtime_call(
                FORMAT,
                vec![root, ExpressionNode::MapLiteral(format_options)],
            )
        })
    }
}
