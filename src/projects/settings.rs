//! Project configuration, read from a `sightly.toml` next to the templates.
//! Every key is optional, missing keys keep their defaults.
//!
//! ```toml
//! namespace = "htl_generated"
//! java_source_suffix = ".java"
//!
//! [filters]
//! disabled = ["uriManipulation"]
//!
//! [filters.priorities]
//! join = 95
//!
//! [optimizations]
//! enabled = true
//! passes = ["constant_folding", "dead_code_removal"]
//! ```

use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::stream_transformer::DEFAULT_PASSES;
use crate::compiler_frontend::source_identifier::source_identifier::validate_namespace;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "sightly.toml";
pub const DEFAULT_NAMESPACE: &str = "htl_generated";
pub const DEFAULT_JAVA_SOURCE_SUFFIX: &str = ".java";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package prefix for classes generated from templates
    pub namespace: String,

    /// Script paths ending in this are Java sources rather than templates
    pub java_source_suffix: String,

    pub filters: FilterSettings,
    pub optimizations: OptimizationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Names of built-in filters that should not run
    pub disabled: Vec<String>,

    /// Overrides for the priority of built-in filters, by name
    pub priorities: FxHashMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    pub enabled: bool,
    pub passes: Vec<String>,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        OptimizationSettings {
            enabled: true,
            passes: DEFAULT_PASSES.iter().map(|pass| pass.to_string()).collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            namespace: String::from(DEFAULT_NAMESPACE),
            java_source_suffix: String::from(DEFAULT_JAVA_SOURCE_SUFFIX),
            filters: FilterSettings::default(),
            optimizations: OptimizationSettings::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, CompilerError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return Err(CompilerError::file_error(
                    path,
                    format!("Couldn't read the config file: {e}"),
                ));
            }
        };

        Config::from_toml_str(&content)
    }

    /// Loads the config file in `dir` if there is one, otherwise the defaults
    pub fn discover(dir: &Path) -> Result<Config, CompilerError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Config::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Config, CompilerError> {
        let config: Config = match toml::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                return Err(CompilerError::new_config_error(
                    format!("Invalid {CONFIG_FILE_NAME}: {e}"),
                    CONFIG_FILE_NAME,
                ));
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompilerError> {
        if let Err(msg) = validate_namespace(&self.namespace) {
            return Err(CompilerError::new_config_error(msg, "namespace"));
        }

        if self.java_source_suffix.len() < 2 || !self.java_source_suffix.starts_with('.') {
            return Err(CompilerError::new_config_error(
                format!(
                    "'{}' is not a file suffix, it should look like '{DEFAULT_JAVA_SOURCE_SUFFIX}'",
                    self.java_source_suffix
                ),
                "java_source_suffix",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod settings_tests;
