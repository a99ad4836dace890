use crate::compiler_frontend::expressions::expression::{Expression, ExpressionContext};
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::filters::filter_chain::Filter;
use crate::compiler_frontend::filters::runtime_functions::{
    BASENAME_OPTION, HINT_OPTION, I18N, I18N_OPTION, LOCALE_OPTION,
};

/// `${'Hello' @ i18n, locale='de'}` becomes `i18n('Hello', {locale: 'de'})`.
/// Runs before format so format placeholders are filled into the translated text.
pub struct I18nFilter;

impl Filter for I18nFilter {
    fn name(&self) -> &'static str {
        "i18n"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn apply(&self, expression: Expression, _context: ExpressionContext) -> Expression {
        if !expression.contains_option(I18N_OPTION) {
            return expression;
        }

        let mut expression = expression;
        expression.take_options(&[I18N_OPTION]);
        let translation_options =
            expression.take_options(&[LOCALE_OPTION, HINT_OPTION, BASENAME_OPTION]);

        expression.map_root(|root| {
            ExpressionNode::runtime_call(
                I18N,
                vec![root, ExpressionNode::MapLiteral(translation_options)],
            )
        })
    }
}
