//! # Optimization Pipeline
//!
//! Every optimization is a transformer from one command sequence into a new stream.
//! The pipeline runs them in order, each one reading what the previous one wrote,
//! and the last one writes straight into the caller's stream so its handlers see the final result.

use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::CommandStream;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::coalescing_writes::CoalescingWrites;
use crate::compiler_frontend::optimizers::constant_folding::ConstantFolding;
use crate::compiler_frontend::optimizers::dead_code_removal::DeadCodeRemoval;
use crate::compiler_frontend::optimizers::unused_variable_removal::UnusedVariableRemoval;
use crate::projects::settings::OptimizationSettings;
use crate::{pass_log, timer_log};
use std::time::Instant;

pub trait StreamTransformer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Writes the transformed version of `input` into `output`.
    /// Must not close `output`, the caller decides when production is over.
    fn transform(&self, input: &[Command], output: &mut CommandStream) -> Result<(), CompilerError>;
}

/// Looks up a built-in pass by the name used in the config
pub fn pass_by_name(name: &str) -> Option<Box<dyn StreamTransformer>> {
    let pass: Box<dyn StreamTransformer> = match name {
        "constant_folding" => Box::new(ConstantFolding),
        "dead_code_removal" => Box::new(DeadCodeRemoval),
        "unused_variable_removal" => Box::new(UnusedVariableRemoval),
        "coalescing_writes" => Box::new(CoalescingWrites),
        _ => return None,
    };

    Some(pass)
}

pub const DEFAULT_PASSES: [&str; 4] = [
    "constant_folding",
    "dead_code_removal",
    "unused_variable_removal",
    "coalescing_writes",
];

pub struct OptimizationPipeline {
    passes: Vec<Box<dyn StreamTransformer>>,
}

impl OptimizationPipeline {
    pub fn new() -> Self {
        OptimizationPipeline { passes: Vec::new() }
    }

    pub fn with_default_passes() -> Self {
        let mut pipeline = OptimizationPipeline::new();
        for name in DEFAULT_PASSES {
            if let Some(pass) = pass_by_name(name) {
                pipeline.add(pass);
            }
        }

        pipeline
    }

    pub fn from_settings(settings: &OptimizationSettings) -> Result<Self, CompilerError> {
        let mut pipeline = OptimizationPipeline::new();
        if !settings.enabled {
            return Ok(pipeline);
        }

        for name in &settings.passes {
            match pass_by_name(name) {
                Some(pass) => pipeline.add(pass),
                None => {
                    return Err(CompilerError::new_config_error(
                        format!(
                            "Unknown optimization pass '{name}'. Available passes are: {}",
                            DEFAULT_PASSES.join(", ")
                        ),
                        "optimizations.passes",
                    ));
                }
            }
        }

        Ok(pipeline)
    }

    pub fn add(&mut self, pass: Box<dyn StreamTransformer>) {
        self.passes.push(pass);
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Runs every pass over the input, writing the final commands and the input's warnings
    /// to `output`, then closes it.
    pub fn run(&self, input: &CommandStream, output: &mut CommandStream) -> Result<(), CompilerError> {
        for warning in input.warnings() {
            output.warn(warning.to_owned())?;
        }

        let Some((last, earlier)) = self.passes.split_last() else {
            for command in input.commands() {
                output.write(command.to_owned())?;
            }
            output.close();
            return Ok(());
        };

        let mut current = input.commands().to_vec();
        for pass in earlier {
            let _time = Instant::now();
            let mut next = CommandStream::new();
            pass.transform(&current, &mut next)?;

            pass_log!(Green { pass.name() }, ": ", { current.len() }, " -> ", { next.len() }, " commands");
            timer_log!(_time, "Pass finished in: ");

            current = next.into_parts().0;
        }

        let _time = Instant::now();
        last.transform(&current, output)?;
        pass_log!(Green { last.name() }, ": ", { current.len() }, " -> ", { output.len() }, " commands");
        timer_log!(_time, "Pass finished in: ");

        output.close();
        Ok(())
    }
}

impl Default for OptimizationPipeline {
    fn default() -> Self {
        OptimizationPipeline::with_default_passes()
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod pipeline_tests;
