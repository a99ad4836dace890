use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A parsed HTL expression: the root node plus its options.
///
/// `${item @ join=', '}` has the root `item` and a `join` option holding `', '`.
/// Filters consume options as they rewrite the root, so an expression that has been through the
/// whole filter chain is usually left with no options at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub root: ExpressionNode,

    #[serde(default)]
    pub options: FxHashMap<String, ExpressionNode>,

    // The text the parser read this expression from, only used in warnings
    #[serde(default)]
    pub raw_text: String,
}

impl Expression {
    pub fn new(root: ExpressionNode) -> Self {
        Expression {
            root,
            options: FxHashMap::default(),
            raw_text: String::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: ExpressionNode) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    pub fn contains_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn get_option(&self, name: &str) -> Option<&ExpressionNode> {
        self.options.get(name)
    }

    /// Same options, new root
    pub fn with_node(self, root: ExpressionNode) -> Self {
        Expression { root, ..self }
    }

    /// Builds a new root from the current one, keeping the options
    pub fn map_root(self, build: impl FnOnce(ExpressionNode) -> ExpressionNode) -> Self {
        let Expression {
            root,
            options,
            raw_text,
        } = self;

        Expression {
            root: build(root),
            options,
            raw_text,
        }
    }

    /// Same root, with the named options dropped
    pub fn without_options(mut self, names: &[&str]) -> Self {
        for name in names {
            self.options.remove(*name);
        }
        self
    }

    /// Takes an option out of the expression, returning the expression without it
    pub fn remove_option(mut self, name: &str) -> (Self, Option<ExpressionNode>) {
        let removed = self.options.remove(name);
        (self, removed)
    }

    /// Removes all the given options that are present,
    /// returning the removed ones in the order they were asked for
    pub fn take_options(&mut self, names: &[&str]) -> Vec<(String, ExpressionNode)> {
        names
            .iter()
            .filter_map(|name| {
                self.options
                    .remove(*name)
                    .map(|value| (name.to_string(), value))
            })
            .collect()
    }
}

impl From<ExpressionNode> for Expression {
    fn from(root: ExpressionNode) -> Self {
        Expression::new(root)
    }
}

/// Where an expression was found in the template.
/// Some filters only make sense in some places, URI manipulation does nothing for a `data-sly-use`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpressionContext {
    #[default]
    Text,
    Attribute,
    PluginTest,
    PluginList,
    PluginRepeat,
    PluginUse,
    PluginTemplate,
    PluginCall,
    PluginResource,
    PluginInclude,
    PluginSet,
    PluginUnwrap,
    PluginElement,
    PluginText,
    PluginAttribute,
}

/// The XSS escaping contexts the runtime understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkupContext {
    #[default]
    Html,
    Text,
    ElementName,
    AttributeName,
    Attribute,
    Uri,
    ScriptToken,
    ScriptString,
    ScriptComment,
    ScriptRegExp,
    StyleToken,
    StyleString,
    StyleComment,
    Comment,
    Number,
    Unsafe,
}

impl MarkupContext {
    pub fn name(&self) -> &'static str {
        match self {
            MarkupContext::Html => "html",
            MarkupContext::Text => "text",
            MarkupContext::ElementName => "elementName",
            MarkupContext::AttributeName => "attributeName",
            MarkupContext::Attribute => "attribute",
            MarkupContext::Uri => "uri",
            MarkupContext::ScriptToken => "scriptToken",
            MarkupContext::ScriptString => "scriptString",
            MarkupContext::ScriptComment => "scriptComment",
            MarkupContext::ScriptRegExp => "scriptRegExp",
            MarkupContext::StyleToken => "styleToken",
            MarkupContext::StyleString => "styleString",
            MarkupContext::StyleComment => "styleComment",
            MarkupContext::Comment => "comment",
            MarkupContext::Number => "number",
            MarkupContext::Unsafe => "unsafe",
        }
    }

    pub fn from_name(name: &str) -> Option<MarkupContext> {
        let context = match name {
            "html" => MarkupContext::Html,
            "text" => MarkupContext::Text,
            "elementName" => MarkupContext::ElementName,
            "attributeName" => MarkupContext::AttributeName,
            "attribute" => MarkupContext::Attribute,
            "uri" => MarkupContext::Uri,
            "scriptToken" => MarkupContext::ScriptToken,
            "scriptString" => MarkupContext::ScriptString,
            "scriptComment" => MarkupContext::ScriptComment,
            "scriptRegExp" => MarkupContext::ScriptRegExp,
            "styleToken" => MarkupContext::StyleToken,
            "styleString" => MarkupContext::StyleString,
            "styleComment" => MarkupContext::StyleComment,
            "comment" => MarkupContext::Comment,
            "number" => MarkupContext::Number,
            "unsafe" => MarkupContext::Unsafe,
            _ => return None,
        };

        Some(context)
    }
}
