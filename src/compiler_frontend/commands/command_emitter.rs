//! # Command Emitter
//!
//! Lowers the markup parser's template events into commands.
//!
//! Every expression goes through the filter chain first, then gets bound to a generated variable
//! so the commands themselves only ever refer to variables by name:
//!
//! ```text
//! ${title @ context='html'}   ->   let var_0 = xss(title, 'html')
//!                                  out var_0
//!                                  end let
//! ```
//!
//! Block events (test, list, template) push the End commands they will need onto a stack,
//! the matching end event pops and writes them. This keeps the output balanced by construction
//! as long as the events themselves are.

use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::{CommandStream, StreamWarning};
use crate::compiler_frontend::commands::symbol_generator::SymbolGenerator;
use crate::compiler_frontend::commands::template_events::TemplateEvent;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::compiler_warnings::WarningKind;
use crate::compiler_frontend::expressions::expression::{
    Expression, ExpressionContext, MarkupContext,
};
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::filters::filter_chain::FilterChain;
use crate::compiler_frontend::filters::runtime_functions::CONTEXT_OPTION;
use crate::{command_log, return_template_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Test,
    List,
    Template,
}

impl BlockKind {
    fn plugin_name(&self) -> &'static str {
        match self {
            BlockKind::Test => "data-sly-test",
            BlockKind::List => "data-sly-list",
            BlockKind::Template => "data-sly-template",
        }
    }
}

struct OpenBlock {
    kind: BlockKind,

    // Written in order when the block closes
    closing: Vec<Command>,
}

pub struct CommandEmitter<'a> {
    filters: &'a FilterChain,
    symbols: SymbolGenerator,
    open_blocks: Vec<OpenBlock>,
}

impl<'a> CommandEmitter<'a> {
    pub fn new(filters: &'a FilterChain) -> Self {
        CommandEmitter {
            filters,
            symbols: SymbolGenerator::new(),
            open_blocks: Vec::new(),
        }
    }

    /// Reserves every variable name the template declares or reads,
    /// so no generated name can shadow one of them.
    pub fn reserve_variables(&mut self, events: &[TemplateEvent]) {
        for event in events {
            for name in event.declared_variables() {
                self.symbols.reserve(name);
            }

            for (expression, _) in event.expressions() {
                for name in expression.root.referenced_identifiers() {
                    self.symbols.reserve(name);
                }
                for option in expression.options.values() {
                    for name in option.referenced_identifiers() {
                        self.symbols.reserve(name);
                    }
                }
            }
        }
    }

    pub fn emit(
        &mut self,
        event: TemplateEvent,
        stream: &mut CommandStream,
    ) -> Result<(), CompilerError> {
        match event {
            TemplateEvent::Text { text } => {
                if !text.is_empty() {
                    stream.write(Command::text(text))?;
                }
            }

            TemplateEvent::Output {
                expression,
                markup_context,
                context,
            } => {
                if let Some(warning) = missing_context_warning(&expression, markup_context) {
                    stream.warn(warning)?;
                }

                let expression = with_default_context(expression, markup_context);
                let root = self.filter(expression, context);
                let variable = self.symbols.next();

                stream.write(Command::bind(&variable, root))?;
                stream.write(Command::output(variable))?;
                stream.write(Command::VariableBindingEnd)?;
            }

            TemplateEvent::TestStart {
                expression,
                variable,
            } => {
                let root = self.filter(expression, ExpressionContext::PluginTest);

                // A named test result stays readable after the block, like data-sly-set
                let closing = match variable {
                    Some(variable) => {
                        stream.write(Command::global(&variable, root))?;
                        stream.write(Command::test(variable, true))?;
                        vec![Command::ConditionalEnd]
                    }
                    None => {
                        let variable = self.symbols.next();
                        stream.write(Command::bind(&variable, root))?;
                        stream.write(Command::test(variable, true))?;
                        vec![Command::ConditionalEnd, Command::VariableBindingEnd]
                    }
                };

                self.open(BlockKind::Test, closing);
            }

            TemplateEvent::ListStart {
                expression,
                item_variable,
                index_variable,
            } => {
                let root = self.filter(expression, ExpressionContext::PluginList);
                let collection = self.symbols.next_with_hint("collection");

                // Empty collections skip the whole block, including its wrapper markup
                stream.write(Command::bind(&collection, root))?;
                stream.write(Command::test(&collection, true))?;
                stream.write(Command::loop_over(
                    collection,
                    item_variable,
                    index_variable,
                ))?;

                self.open(
                    BlockKind::List,
                    vec![
                        Command::LoopEnd,
                        Command::ConditionalEnd,
                        Command::VariableBindingEnd,
                    ],
                );
            }

            TemplateEvent::SetVariable { name, expression } => {
                let root = self.filter(expression, ExpressionContext::PluginSet);
                stream.write(Command::global(name, root))?;
            }

            TemplateEvent::TemplateStart { name, parameters } => {
                if self.is_open(BlockKind::Template) {
                    return_template_error!(
                        format!("Template '{name}' is defined inside another template"),
                        {
                            CompilationStage => "Command Emission",
                            PrimarySuggestion => "Move the data-sly-template element out of the enclosing template",
                        }
                    )
                }

                stream.write(Command::ProcedureStart { name, parameters })?;
                self.open(BlockKind::Template, vec![Command::ProcedureEnd]);
            }

            TemplateEvent::Call {
                template,
                arguments,
            } => {
                let template = self.filter(template, ExpressionContext::PluginCall);
                let arguments = self.filter(arguments, ExpressionContext::PluginCall);
                let template_variable = self.symbols.next_with_hint("template");
                let arguments_variable = self.symbols.next_with_hint("arguments");

                stream.write(Command::bind(&template_variable, template))?;
                stream.write(Command::bind(&arguments_variable, arguments))?;
                stream.write(Command::ProcedureCall {
                    template_variable,
                    arguments_variable,
                })?;
                stream.write(Command::VariableBindingEnd)?;
                stream.write(Command::VariableBindingEnd)?;
            }

            TemplateEvent::Warning { message, code } => {
                stream.warn(StreamWarning::new(message, code))?;
            }

            TemplateEvent::TestEnd => self.close(BlockKind::Test, stream)?,
            TemplateEvent::ListEnd => self.close(BlockKind::List, stream)?,
            TemplateEvent::TemplateEnd => self.close(BlockKind::Template, stream)?,
        }

        Ok(())
    }

    /// Checks that every block was closed, then closes the stream
    pub fn finish(self, stream: &mut CommandStream) -> Result<(), CompilerError> {
        if let Some(block) = self.open_blocks.last() {
            return_template_error!(
                format!(
                    "The template ended while a {} block was still open",
                    block.kind.plugin_name()
                ),
                { CompilationStage => "Command Emission" }
            )
        }

        stream.close();
        Ok(())
    }

    fn filter(&self, expression: Expression, context: ExpressionContext) -> ExpressionNode {
        command_log!(Dark Cyan "filtering ", { expression.to_string() });
        self.filters.apply(expression, context).root
    }

    fn open(&mut self, kind: BlockKind, closing: Vec<Command>) {
        self.open_blocks.push(OpenBlock { kind, closing });
    }

    fn is_open(&self, kind: BlockKind) -> bool {
        self.open_blocks.iter().any(|block| block.kind == kind)
    }

    fn close(&mut self, kind: BlockKind, stream: &mut CommandStream) -> Result<(), CompilerError> {
        let block = match self.open_blocks.pop() {
            Some(block) if block.kind == kind => block,
            Some(block) => {
                return_template_error!(
                    format!(
                        "Found the end of a {} block while a {} block was still open",
                        kind.plugin_name(),
                        block.kind.plugin_name()
                    ),
                    { CompilationStage => "Command Emission" }
                )
            }
            None => {
                return_template_error!(
                    format!(
                        "Found the end of a {} block that was never started",
                        kind.plugin_name()
                    ),
                    { CompilationStage => "Command Emission" }
                )
            }
        };

        for command in block.closing {
            stream.write(command)?;
        }

        Ok(())
    }
}

/// Emits the commands for a whole template and closes the stream
pub fn emit_template(
    filters: &FilterChain,
    events: Vec<TemplateEvent>,
    stream: &mut CommandStream,
) -> Result<(), CompilerError> {
    let mut emitter = CommandEmitter::new(filters);
    emitter.reserve_variables(&events);

    for event in events {
        emitter.emit(event, stream)?;
    }

    emitter.finish(stream)
}

// The markup parser picks a context from the position of the expression,
// an explicit `context` option always wins
fn with_default_context(expression: Expression, markup_context: MarkupContext) -> Expression {
    if expression.contains_option(CONTEXT_OPTION) {
        return expression;
    }

    expression.with_option(
        CONTEXT_OPTION,
        ExpressionNode::string(markup_context.name()),
    )
}

// Inside scripts and styles the guessed context is rarely what the author meant
fn missing_context_warning(
    expression: &Expression,
    markup_context: MarkupContext,
) -> Option<StreamWarning> {
    let needs_explicit_context = matches!(
        markup_context,
        MarkupContext::ScriptToken
            | MarkupContext::ScriptString
            | MarkupContext::ScriptComment
            | MarkupContext::ScriptRegExp
            | MarkupContext::StyleToken
            | MarkupContext::StyleString
            | MarkupContext::StyleComment
    );

    if !needs_explicit_context || expression.contains_option(CONTEXT_OPTION) {
        return None;
    }

    let warning = StreamWarning::new(
        format!(
            "Expression inside a script or style block has no explicit context, using '{}'",
            markup_context.name()
        ),
        expression.raw_text.as_str(),
    );

    Some(warning.with_kind(WarningKind::MissingContext))
}

#[cfg(test)]
#[path = "tests/command_emitter_tests.rs"]
mod command_emitter_tests;
