//! Template Events
//!
//! What the markup parser hands to the compiler: a flat sequence of text, expressions to output,
//! and start/end markers for the block plugins (`data-sly-test`, `data-sly-list`, ...).
//! The parser itself lives outside this crate, events arrive as JSON or are built directly.

use crate::compiler_frontend::expressions::expression::{
    Expression, ExpressionContext, MarkupContext,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEM_VARIABLE: &str = "item";
pub const DEFAULT_INDEX_VARIABLE: &str = "itemList";

fn default_item_variable() -> String {
    String::from(DEFAULT_ITEM_VARIABLE)
}

fn default_index_variable() -> String {
    String::from(DEFAULT_INDEX_VARIABLE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TemplateEvent {
    /// Static markup, written out as is
    Text { text: String },

    /// `${...}` in text or in an attribute value
    Output {
        expression: Expression,

        // Escaping context the markup parser chose for this position
        #[serde(default)]
        markup_context: MarkupContext,

        #[serde(default)]
        context: ExpressionContext,
    },

    /// `data-sly-test`, optionally storing the result in a named variable
    TestStart {
        expression: Expression,

        #[serde(default)]
        variable: Option<String>,
    },
    TestEnd,

    /// `data-sly-list`
    ListStart {
        expression: Expression,

        #[serde(default = "default_item_variable")]
        item_variable: String,

        #[serde(default = "default_index_variable")]
        index_variable: String,
    },
    ListEnd,

    /// `data-sly-set`
    SetVariable { name: String, expression: Expression },

    /// `data-sly-template`
    TemplateStart {
        name: String,

        #[serde(default)]
        parameters: Vec<String>,
    },
    TemplateEnd,

    /// `data-sly-call`
    Call {
        template: Expression,
        arguments: Expression,
    },

    Warning {
        message: String,

        #[serde(default)]
        code: String,
    },
}

impl TemplateEvent {
    pub fn text(text: impl Into<String>) -> Self {
        TemplateEvent::Text { text: text.into() }
    }

    pub fn output(expression: impl Into<Expression>, markup_context: MarkupContext) -> Self {
        TemplateEvent::Output {
            expression: expression.into(),
            markup_context,
            context: ExpressionContext::Text,
        }
    }

    /// Variable names the template author chose, the symbol generator must never reuse them
    pub fn declared_variables(&self) -> Vec<&str> {
        match self {
            TemplateEvent::TestStart {
                variable: Some(variable),
                ..
            } => vec![variable.as_str()],
            TemplateEvent::ListStart {
                item_variable,
                index_variable,
                ..
            } => vec![item_variable.as_str(), index_variable.as_str()],
            TemplateEvent::SetVariable { name, .. } => vec![name.as_str()],
            TemplateEvent::TemplateStart { name, parameters } => {
                let mut names = vec![name.as_str()];
                names.extend(parameters.iter().map(String::as_str));
                names
            }
            _ => Vec::new(),
        }
    }

    /// Every expression carried by this event, paired with where it appears
    pub fn expressions(&self) -> Vec<(&Expression, ExpressionContext)> {
        match self {
            TemplateEvent::Output {
                expression,
                context,
                ..
            } => vec![(expression, *context)],
            TemplateEvent::TestStart { expression, .. } => {
                vec![(expression, ExpressionContext::PluginTest)]
            }
            TemplateEvent::ListStart { expression, .. } => {
                vec![(expression, ExpressionContext::PluginList)]
            }
            TemplateEvent::SetVariable { expression, .. } => {
                vec![(expression, ExpressionContext::PluginSet)]
            }
            TemplateEvent::Call {
                template,
                arguments,
            } => vec![
                (template, ExpressionContext::PluginCall),
                (arguments, ExpressionContext::PluginCall),
            ],
            _ => Vec::new(),
        }
    }
}
