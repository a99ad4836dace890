pub mod expressions {
    pub mod expression;
    pub mod expression_display;
    pub mod expression_nodes;
    pub mod node_visitor;
}

pub mod filters {
    pub mod filter_chain;
    pub mod format_filter;
    pub mod i18n_filter;
    pub mod join_filter;
    pub mod runtime_functions;
    pub mod uri_manipulation_filter;
    pub mod xss_filter;
}

pub mod commands {
    pub mod command_display;
    pub mod command_emitter;
    pub mod command_nodes;
    pub mod command_stream;
    pub mod command_visitor;
    pub mod symbol_generator;
    pub mod template_events;
}

pub mod optimizers {
    pub mod coalescing_writes;
    pub mod constant_folding;
    pub mod dead_code_removal;
    pub mod stateful_replay;
    pub mod stream_transformer;
    pub mod unused_variable_removal;
    pub mod variable_tracker;
}

pub mod type_inference {
    pub mod binding_types;
    pub mod type_inference;
    pub mod type_rules;
    pub mod types;
    pub mod variable_analyzer;
}

pub mod source_identifier {
    pub mod identifier_escaping;
    pub mod source_identifier;
}

pub mod compiler_messages {
    pub mod compiler_dev_logging;
    pub mod compiler_errors;
    pub mod compiler_warnings;
    pub mod display_messages;
}
pub use compiler_messages::compiler_errors;
pub use compiler_messages::compiler_warnings;
pub use compiler_messages::display_messages;

use crate::compiler_frontend::commands::command_emitter::emit_template;
use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::{CommandStream, StreamWarning};
use crate::compiler_frontend::commands::template_events::TemplateEvent;
use crate::compiler_frontend::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use crate::compiler_frontend::filters::filter_chain::FilterChain;
use crate::compiler_frontend::optimizers::stream_transformer::OptimizationPipeline;
use crate::compiler_frontend::source_identifier::source_identifier::{
    ClassIdentity, SourceIdentifier,
};
use crate::compiler_frontend::type_inference::binding_types::{BindingType, annotate_bindings};
use crate::projects::settings::Config;
use crate::timer_log;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Flags change the behavior of the front end pipeline.
/// For the built-in CLI these are added as cli flags.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Flag {
    DisableOptimizations,
    DisableWarnings,
    DisableTimers,
}

/// One template as the markup parser hands it over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSource {
    pub script_path: String,
    pub events: Vec<TemplateEvent>,
}

/// Everything a code generator needs to write out one template's class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationUnit {
    pub script_path: String,
    pub class_identity: ClassIdentity,
    pub commands: Vec<Command>,
    pub bindings: Vec<BindingType>,
    pub warnings: Vec<StreamWarning>,
}

impl CompilationUnit {
    pub fn compiler_warnings(&self) -> Vec<CompilerWarning> {
        self.warnings
            .iter()
            .map(StreamWarning::to_compiler_warning)
            .collect()
    }
}

pub struct CompilerFrontend {
    filters: FilterChain,
    optimizations: OptimizationPipeline,
    source_identifier: SourceIdentifier,
    flags: Vec<Flag>,
}

impl CompilerFrontend {
    pub fn new(config: &Config, flags: &[Flag]) -> Result<Self, CompilerError> {
        config.validate()?;

        let optimizations = if flags.contains(&Flag::DisableOptimizations) {
            OptimizationPipeline::new()
        } else {
            OptimizationPipeline::from_settings(&config.optimizations)?
        };

        Ok(CompilerFrontend {
            filters: FilterChain::from_settings(&config.filters),
            optimizations,
            source_identifier: SourceIdentifier::from_config(config),
            flags: flags.to_vec(),
        })
    }

    pub fn source_identifier(&self) -> &SourceIdentifier {
        &self.source_identifier
    }

    /// -----------------------------
    /// COMMAND EMISSION
    /// -----------------------------
    /// Filters every expression and lowers the parser events into a closed command stream.
    pub fn emit_commands(&self, events: Vec<TemplateEvent>) -> Result<CommandStream, CompilerError> {
        let mut stream = CommandStream::new();
        emit_template(&self.filters, events, &mut stream)?;
        Ok(stream)
    }

    /// -----------------------------
    /// OPTIMIZATION
    /// -----------------------------
    pub fn optimize(&self, emitted: &CommandStream) -> Result<CommandStream, CompilerError> {
        let mut optimized = CommandStream::new();
        self.optimizations.run(emitted, &mut optimized)?;
        Ok(optimized)
    }

    /// Runs every stage for one template
    pub fn compile(&self, source: TemplateSource) -> Result<CompilationUnit, CompilerMessages> {
        let _time = Instant::now();
        let script_path = source.script_path;
        let in_script = |e: CompilerError| CompilerMessages::from_error(e.with_script_path(&script_path));

        let class_identity = self
            .source_identifier
            .for_script(&script_path)
            .map_err(in_script)?;

        let emitted = self.emit_commands(source.events).map_err(in_script)?;
        let optimized = self.optimize(&emitted).map_err(in_script)?;

        let (commands, mut warnings) = optimized.into_parts();
        let bindings = annotate_bindings(&commands);

        if self.flags.contains(&Flag::DisableWarnings) {
            warnings.clear();
        }

        if !self.flags.contains(&Flag::DisableTimers) {
            timer_log!(_time, "Compiled template in: ");
        }

        Ok(CompilationUnit {
            script_path,
            class_identity,
            commands,
            bindings,
            warnings,
        })
    }

    /// Compiles independent templates in parallel, results are in input order
    pub fn compile_units(
        &self,
        sources: Vec<TemplateSource>,
    ) -> Vec<Result<CompilationUnit, CompilerMessages>> {
        sources
            .into_par_iter()
            .map(|source| self.compile(source))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/frontend_tests.rs"]
mod frontend_tests;
