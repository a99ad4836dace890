//! # Filter Chain
//!
//! Filters rewrite an expression before it is compiled into commands.
//! Each filter looks for its own option (`join`, `format`, `context`, ...) and, when present,
//! wraps the root in a runtime call that applies the option at render time.
//!
//! The chain runs every filter exactly once in ascending priority order.
//! Filters with the same priority run in the order they were registered.

use crate::compiler_frontend::expressions::expression::{Expression, ExpressionContext};
use crate::compiler_frontend::filters::format_filter::FormatFilter;
use crate::compiler_frontend::filters::i18n_filter::I18nFilter;
use crate::compiler_frontend::filters::join_filter::JoinFilter;
use crate::compiler_frontend::filters::uri_manipulation_filter::UriManipulationFilter;
use crate::compiler_frontend::filters::xss_filter::XssFilter;
use crate::filter_log;
use crate::projects::settings::FilterSettings;

pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower runs first
    fn priority(&self) -> i32;

    /// Must return the input unchanged when the expression doesn't carry this filter's option
    fn apply(&self, expression: Expression, context: ExpressionContext) -> Expression;
}

struct RegisteredFilter {
    filter: Box<dyn Filter>,
    priority: i32,
}

pub struct FilterChain {
    filters: Vec<RegisteredFilter>,
}

impl FilterChain {
    pub fn new() -> Self {
        FilterChain {
            filters: Vec::new(),
        }
    }

    /// The filters every HTL runtime ships with
    pub fn with_default_filters() -> Self {
        let mut chain = FilterChain::new();
        chain.register(Box::new(I18nFilter));
        chain.register(Box::new(FormatFilter));
        chain.register(Box::new(JoinFilter));
        chain.register(Box::new(UriManipulationFilter));
        chain.register(Box::new(XssFilter));
        chain
    }

    /// Default filters with the priorities and disabled list from the config applied
    pub fn from_settings(settings: &FilterSettings) -> Self {
        let mut chain = FilterChain::new();
        for filter in FilterChain::with_default_filters().filters {
            let name = filter.filter.name();
            if settings.disabled.iter().any(|disabled| disabled == name) {
                continue;
            }

            match settings.priorities.get(name) {
                Some(priority) => chain.register_with_priority(filter.filter, *priority),
                None => chain.register(filter.filter),
            }
        }

        chain
    }

    pub fn register(&mut self, filter: Box<dyn Filter>) {
        let priority = filter.priority();
        self.register_with_priority(filter, priority);
    }

    pub fn register_with_priority(&mut self, filter: Box<dyn Filter>, priority: i32) {
        self.filters.push(RegisteredFilter { filter, priority });

        // Stable, so registration order breaks ties
        self.filters.sort_by_key(|registered| registered.priority);
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters
            .iter()
            .map(|registered| registered.filter.name())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn apply(&self, expression: Expression, context: ExpressionContext) -> Expression {
        let mut expression = expression;
        for registered in &self.filters {
            expression = registered.filter.apply(expression, context);
            filter_log!("After ", { registered.filter.name() }, ": ", { expression.to_string() });
        }

        expression
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        FilterChain::with_default_filters()
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod filter_tests;
