use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use std::collections::HashMap;
use std::fmt;

// The final set of errors and warnings emitted while compiling one template
#[derive(Debug, Default)]
pub struct CompilerMessages {
    pub errors: Vec<CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

impl CompilerMessages {
    pub fn new() -> Self {
        CompilerMessages {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_error(error: CompilerError) -> Self {
        CompilerMessages {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<CompilerWarning>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub enum ErrorMetaDataKey {
    CompilationStage,
    CommandKind,

    // Optional suggestions
    PrimarySuggestion,

    // Config information
    ConfigKey,
}

#[derive(Debug, Clone)]
pub struct CompilerError {
    pub msg: String,

    // The logical script path of the template being compiled, when known.
    // Errors raised deep inside a pass don't know it, the front end attaches it afterwards.
    pub script_path: Option<String>,
    pub error_type: ErrorType,

    // For more structured and detailed error messages
    pub metadata: HashMap<ErrorMetaDataKey, &'static str>,
}

impl CompilerError {
    pub fn new(msg: impl Into<String>, error_type: ErrorType) -> CompilerError {
        CompilerError {
            msg: msg.into(),
            script_path: None,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_script_path(mut self, script_path: impl Into<String>) -> Self {
        self.script_path = Some(script_path.into());
        self
    }

    pub fn new_metadata_entry(&mut self, key: ErrorMetaDataKey, value: &'static str) {
        self.metadata.insert(key, value);
    }

    /// Create a template structure error (unbalanced or malformed parser events)
    pub fn new_template_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, ErrorType::Template)
    }

    /// Create a config error with the offending key
    pub fn new_config_error(msg: impl Into<String>, key: &'static str) -> Self {
        let mut error = CompilerError::new(msg, ErrorType::Config);
        error.new_metadata_entry(ErrorMetaDataKey::ConfigKey, key);
        error
    }

    /// Create a file system error for a path on disk
    pub fn file_error(path: &std::path::Path, msg: impl Into<String>) -> Self {
        CompilerError {
            msg: msg.into(),
            script_path: Some(path.to_string_lossy().to_string()),
            error_type: ErrorType::File,
            metadata: HashMap::new(),
        }
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.script_path {
            Some(path) => write!(
                f,
                "{} in {}: {}",
                error_type_to_str(&self.error_type),
                path,
                self.msg
            ),
            None => write!(f, "{}: {}", error_type_to_str(&self.error_type), self.msg),
        }
    }
}

impl std::error::Error for CompilerError {}

// Adds more information to the CompilerError
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrorType {
    Template,
    Rule,
    File,
    Config,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Compiler => "Compiler Bug",
        ErrorType::Template => "Template Structure Error",
        ErrorType::Config => "Malformed Config",
        ErrorType::File => "File Error",
        ErrorType::Rule => "Rule Violation",
    }
}

/// Returns a new CompilerError for malformed template structure.
///
/// These come from parser events that don't nest properly,
/// e.g. an end marker without a start or a template that ends with open blocks.
///
/// Usage:
/// `return_template_error!("message", { CompilationStage => "Command Emission" })`;
#[macro_export]
macro_rules! return_template_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            script_path: None,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Template,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value); )*
                map
            },
        })
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            script_path: None,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Template,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for rule violations.
///
/// Usage:
/// `return_rule_error!("Script paths must be absolute", { PrimarySuggestion => "Start the path with '/'" })`;
#[macro_export]
macro_rules! return_rule_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            script_path: None,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Rule,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value); )*
                map
            },
        })
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            script_path: None,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Rule,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for broken internal invariants.
///
/// A pass that finds an End command without its Start is looking at a stream
/// the producer should never have written, so this is always a compiler bug.
///
/// Usage:
/// `return_compiler_error!("Conditional end without start", { CompilationStage => "Dead Code Removal" })`;
#[macro_export]
macro_rules! return_compiler_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            script_path: None,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Compiler,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value); )*
                map
            },
        })
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            script_path: None,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Compiler,
            metadata: std::collections::HashMap::new(),
        })
    };
}
