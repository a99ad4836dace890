//! # Variable Analysis
//!
//! Type inference doesn't know where variables come from, it asks a `VariableAnalyzer`.
//! A name without a descriptor is resolved dynamically at render time (request attributes,
//! bindings provided by the script engine) and infers as Unknown.

use crate::compiler_frontend::type_inference::types::Type;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableScope {
    /// Bound until the matching end of its binding
    Local,

    /// Visible for the rest of the template or procedure it was assigned in
    Global,

    /// A procedure parameter
    Parameter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub var_type: Type,
    pub scope: VariableScope,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<String>, var_type: Type, scope: VariableScope) -> Self {
        VariableDescriptor {
            name: name.into(),
            var_type,
            scope,
        }
    }
}

pub trait VariableAnalyzer {
    fn descriptor(&self, name: &str) -> Option<&VariableDescriptor>;
}

/// A fixed table of descriptors, for callers that know every variable's type up front
#[derive(Debug, Clone, Default)]
pub struct MapVariableAnalyzer {
    descriptors: FxHashMap<String, VariableDescriptor>,
}

impl MapVariableAnalyzer {
    pub fn new() -> Self {
        MapVariableAnalyzer::default()
    }

    pub fn with_variable(mut self, name: &str, var_type: Type) -> Self {
        self.insert(VariableDescriptor::new(name, var_type, VariableScope::Global));
        self
    }

    pub fn insert(&mut self, descriptor: VariableDescriptor) {
        self.descriptors.insert(descriptor.name.to_owned(), descriptor);
    }
}

impl VariableAnalyzer for MapVariableAnalyzer {
    fn descriptor(&self, name: &str) -> Option<&VariableDescriptor> {
        self.descriptors.get(name)
    }
}

#[derive(Debug, Clone, Default)]
struct Frame {
    locals: Vec<VariableDescriptor>,
    globals: FxHashMap<String, VariableDescriptor>,
}

/// Follows the variables declared by a command stream as it is walked.
/// Each procedure gets its own frame that can't see the enclosing one.
#[derive(Debug, Clone)]
pub struct ScopedVariableAnalyzer {
    frames: Vec<Frame>,
}

impl ScopedVariableAnalyzer {
    pub fn new() -> Self {
        ScopedVariableAnalyzer {
            frames: vec![Frame::default()],
        }
    }

    pub fn begin_variable(&mut self, name: &str, var_type: Type) {
        self.current_frame()
            .locals
            .push(VariableDescriptor::new(name, var_type, VariableScope::Local));
    }

    /// Ends the most recent local variable, returning its descriptor
    pub fn end_variable(&mut self) -> Option<VariableDescriptor> {
        self.current_frame().locals.pop()
    }

    /// A global assigned twice with different types can be either at any later point
    pub fn declare_global(&mut self, name: &str, var_type: Type) {
        let globals = &mut self.current_frame().globals;
        match globals.get_mut(name) {
            Some(existing) if existing.var_type != var_type => existing.var_type = Type::Unknown,
            Some(_) => {}
            None => {
                globals.insert(
                    name.to_owned(),
                    VariableDescriptor::new(name, var_type, VariableScope::Global),
                );
            }
        }
    }

    /// Makes every visible variable with this name Unknown,
    /// for a global that a loop body reassigns before the next iteration reads it
    pub fn forget_variable(&mut self, name: &str) {
        let frame = self.current_frame();
        for local in frame.locals.iter_mut().filter(|local| local.name == name) {
            local.var_type = Type::Unknown;
        }

        self.declare_global(name, Type::Unknown);
    }

    pub fn enter_procedure(&mut self, parameters: &[String]) {
        let mut frame = Frame::default();
        for parameter in parameters {
            frame.locals.push(VariableDescriptor::new(
                parameter.as_str(),
                Type::Unknown,
                VariableScope::Parameter,
            ));
        }
        self.frames.push(frame);
    }

    /// Returns false when there was no procedure to leave
    pub fn exit_procedure(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    fn current_frame(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for ScopedVariableAnalyzer {
    fn default() -> Self {
        ScopedVariableAnalyzer::new()
    }
}

impl VariableAnalyzer for ScopedVariableAnalyzer {
    fn descriptor(&self, name: &str) -> Option<&VariableDescriptor> {
        let frame = self.frames.last()?;

        frame
            .locals
            .iter()
            .rev()
            .find(|descriptor| descriptor.name == name)
            .or_else(|| frame.globals.get(name))
    }
}

#[cfg(test)]
#[path = "tests/variable_analyzer_tests.rs"]
mod variable_analyzer_tests;
