//! # Variable Tracker
//!
//! What a pass knows about each variable at the current point of a command stream.
//! The value is `None` when the variable exists but its value is only known at render time.
//!
//! Scoping follows the code a generator writes for the stream:
//! - `VariableBindingStart` binds until the next `VariableBindingEnd` in the same scope
//! - globals stay visible until the enclosing procedure ends
//! - a loop or a conditional with an unknown outcome may not run its body,
//!   so globals assigned inside one are unknown once it closes
//! - a procedure body can't see anything declared outside it

use crate::compiler_frontend::commands::command_nodes::{Command, CommandKind};
use crate::compiler_frontend::optimizers::stateful_replay::block_body;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Branch,
    Loop,
    Procedure,
}

impl ScopeKind {
    /// The scope a block end command closes
    pub fn closed_by(command: &Command) -> Option<ScopeKind> {
        match command {
            Command::ConditionalEnd => Some(ScopeKind::Branch),
            Command::LoopEnd => Some(ScopeKind::Loop),
            Command::ProcedureEnd => Some(ScopeKind::Procedure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Branch => "conditional",
            ScopeKind::Loop => "loop",
            ScopeKind::Procedure => "procedure",
        }
    }
}

/// The message for a block end that doesn't close the innermost open block
pub fn mismatched_end_message(command: &Command, open: Option<ScopeKind>) -> String {
    match open {
        Some(kind) => format!("Found '{command}' while a {} block was still open", kind.as_str()),
        None => format!("Found '{command}' without a matching start"),
    }
}

#[derive(Debug, Clone)]
enum Entry<T> {
    Binding { name: String, value: Option<T> },
    Global { name: String, value: Option<T> },
    Scope(ScopeKind),
}

#[derive(Debug, Clone)]
pub struct VariableTracker<T> {
    entries: Vec<Entry<T>>,
}

impl<T: Clone> VariableTracker<T> {
    pub fn new() -> Self {
        VariableTracker {
            entries: Vec::new(),
        }
    }

    pub fn bind(&mut self, name: &str, value: Option<T>) {
        self.entries.push(Entry::Binding {
            name: name.to_owned(),
            value,
        });
    }

    /// Releases the most recent binding of the current scope, returning its name.
    /// None means the stream closed a binding it never opened.
    pub fn unbind(&mut self) -> Option<String> {
        let scope_start = self.current_scope_start();
        let position = self.entries[scope_start..]
            .iter()
            .rposition(|entry| matches!(entry, Entry::Binding { .. }))?;
        let index = scope_start + position;

        match self.entries.remove(index) {
            Entry::Binding { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn assign_global(&mut self, name: &str, value: Option<T>) {
        let scope_start = self.current_scope_start();
        let mut has_global = false;

        for entry in self.entries[scope_start..].iter_mut() {
            match entry {
                Entry::Binding {
                    name: existing,
                    value: current,
                } if existing == name => *current = value.clone(),
                Entry::Global {
                    name: existing,
                    value: current,
                } if existing == name => {
                    *current = value.clone();
                    has_global = true;
                }
                _ => {}
            }
        }

        if !has_global {
            self.entries.push(Entry::Global {
                name: name.to_owned(),
                value,
            });
        }
    }

    /// Marks every visible variable with this name as unknown
    pub fn forget(&mut self, name: &str) {
        for entry in self.entries.iter_mut().rev() {
            match entry {
                Entry::Scope(ScopeKind::Procedure) => return,
                Entry::Binding {
                    name: existing,
                    value,
                }
                | Entry::Global {
                    name: existing,
                    value,
                } if existing == name => *value = None,
                _ => {}
            }
        }
    }

    pub fn open_scope(&mut self, kind: ScopeKind) {
        self.entries.push(Entry::Scope(kind));
    }

    /// Drops everything declared in the innermost scope, which must be of the expected kind.
    /// On a mismatch nothing is dropped and the error holds the kind that is actually open,
    /// or None when no scope is open at all.
    pub fn close_scope(&mut self, expected: ScopeKind) -> Result<(), Option<ScopeKind>> {
        let marker = self
            .entries
            .iter()
            .rposition(|entry| matches!(entry, Entry::Scope(_)))
            .ok_or(None)?;

        let kind = match self.entries[marker] {
            Entry::Scope(kind) => kind,
            _ => return Err(None),
        };
        if kind != expected {
            return Err(Some(kind));
        }

        let mut assigned_globals = Vec::new();
        for entry in self.entries.drain(marker..) {
            if let Entry::Global { name, .. } = entry {
                assigned_globals.push(name);
            }
        }

        // The body might not have run, so neither value can be relied on
        if kind != ScopeKind::Procedure {
            for name in assigned_globals {
                self.forget(&name);
            }
        }

        Ok(())
    }

    /// The known value of a variable.
    /// None if it's unknown, not visible or hidden behind a procedure boundary.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        for entry in self.entries.iter().rev() {
            match entry {
                Entry::Scope(ScopeKind::Procedure) => return None,
                Entry::Binding {
                    name: existing,
                    value,
                }
                | Entry::Global {
                    name: existing,
                    value,
                } if existing == name => return value.as_ref(),
                _ => {}
            }
        }

        None
    }

    pub fn open_scopes(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Scope(_)))
            .count()
    }

    /// Opens a loop scope for `LoopStart`.
    /// Globals assigned anywhere in the body can change between iterations,
    /// so they are forgotten before the first one.
    pub fn enter_loop(&mut self, command: &Command, upcoming: &[Command]) {
        for body_command in block_body(CommandKind::Loop, upcoming) {
            if let Command::VariableBindingGlobal { variable, .. } = body_command {
                self.forget(variable);
            }
        }

        self.open_scope(ScopeKind::Loop);
        if let Command::LoopStart {
            item_variable,
            index_variable,
            ..
        } = command
        {
            self.bind(item_variable, None);
            self.bind(index_variable, None);
        }
    }

    /// Opens an isolated scope for `ProcedureStart` with every parameter unknown
    pub fn enter_procedure(&mut self, parameters: &[String]) {
        self.open_scope(ScopeKind::Procedure);
        for parameter in parameters {
            self.bind(parameter, None);
        }
    }

    fn current_scope_start(&self) -> usize {
        self.entries
            .iter()
            .rposition(|entry| matches!(entry, Entry::Scope(_)))
            .map_or(0, |marker| marker + 1)
    }
}

impl<T: Clone> Default for VariableTracker<T> {
    fn default() -> Self {
        VariableTracker::new()
    }
}

#[cfg(test)]
#[path = "tests/variable_tracker_tests.rs"]
mod variable_tracker_tests;
