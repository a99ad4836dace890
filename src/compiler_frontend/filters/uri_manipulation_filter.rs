use crate::compiler_frontend::expressions::expression::{Expression, ExpressionContext};
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::filters::filter_chain::Filter;
use crate::compiler_frontend::filters::runtime_functions::URI_MANIPULATION;

pub const URI_OPTIONS: [&str; 16] = [
    "scheme",
    "domain",
    "path",
    "appendPath",
    "prependPath",
    "selectors",
    "addSelectors",
    "removeSelectors",
    "extension",
    "suffix",
    "prependSuffix",
    "appendSuffix",
    "fragment",
    "query",
    "addQuery",
    "removeQuery",
];

/// Collects every URI option into one map:
/// `${link @ extension='html', fragment='top'}` becomes
/// `uriManipulation(link, {extension: 'html', fragment: 'top'})`.
pub struct UriManipulationFilter;

impl UriManipulationFilter {
    // These plugins take identifiers or resource paths, not URIs to rewrite
    fn applies_in(context: ExpressionContext) -> bool {
        !matches!(
            context,
            ExpressionContext::PluginUse
                | ExpressionContext::PluginTemplate
                | ExpressionContext::PluginCall
                | ExpressionContext::PluginResource
        )
    }
}

impl Filter for UriManipulationFilter {
    fn name(&self) -> &'static str {
        "uriManipulation"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, expression: Expression, context: ExpressionContext) -> Expression {
        let has_uri_option = URI_OPTIONS
            .iter()
            .any(|option| expression.contains_option(option));

        if !has_uri_option || !UriManipulationFilter::applies_in(context) {
            return expression;
        }

        let mut expression = expression;
        let uri_options = expression.take_options(&URI_OPTIONS);
        expression.map_root(|root| {
            ExpressionNode::runtime_call(
                URI_MANIPULATION,
                vec![root, ExpressionNode::MapLiteral(uri_options)],
            )
        })
    }
}
