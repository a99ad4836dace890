//! # Source Identifier
//!
//! Derives the Java class a template compiles to from its script path, and back.
//!
//! ```text
//! /apps/my-site/page.html   <->  htl_generated.apps.my__002d__site.page__002e__html
//! /apps/site/Model.java     <->  apps.site.Model
//! ```
//!
//! Generated classes live under the configured namespace.
//! Paths ending in the Java source suffix are already classes, so they keep their own package.
//! The namespace contains a segment that no escaped path segment can be equal to,
//! which keeps the two kinds apart on the way back.

use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::source_identifier::identifier_escaping::{
    escape_identifier, is_java_identifier, unescape_identifier,
};
use crate::{identifier_log, return_rule_error};
use crate::projects::settings::{Config, DEFAULT_JAVA_SOURCE_SUFFIX, DEFAULT_NAMESPACE};
use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassIdentity {
    pub package_name: String,
    pub simple_class_name: String,
    pub fully_qualified_name: String,
}

/// Owns its cache, so separate compilers never share results.
/// Lookups can run from several threads at once.
#[derive(Debug)]
pub struct SourceIdentifier {
    namespace: String,
    java_source_suffix: String,
    cache: DashMap<String, ClassIdentity>,
}

impl SourceIdentifier {
    pub fn new(namespace: impl Into<String>, java_source_suffix: impl Into<String>) -> Self {
        SourceIdentifier {
            namespace: namespace.into(),
            java_source_suffix: java_source_suffix.into(),
            cache: DashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        SourceIdentifier::new(&config.namespace, &config.java_source_suffix)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn for_script(&self, script_path: &str) -> Result<ClassIdentity, CompilerError> {
        if let Some(cached) = self.cache.get(script_path) {
            return Ok(cached.value().to_owned());
        }

        let identity = self
            .identify(script_path)
            .map_err(|e| e.with_script_path(script_path))?;
        identifier_log!("Identified ", Bright script_path, " as ", Green { identity.fully_qualified_name.as_str() });

        // Another thread may have got here first, both computed the same value
        let entry = self.cache.entry(script_path.to_owned()).or_insert(identity);
        Ok(entry.value().to_owned())
    }

    /// The script path a class was generated from.
    /// None for names this identifier could not have produced.
    pub fn script_path_for(&self, fully_qualified_name: &str) -> Option<String> {
        let generated_prefix = format!("{}.", self.namespace);

        match fully_qualified_name.strip_prefix(&generated_prefix) {
            Some(generated) => Some(format!("/{}", unescape_segments(generated)?)),
            None => Some(format!(
                "/{}{}",
                unescape_segments(fully_qualified_name)?,
                self.java_source_suffix
            )),
        }
    }

    fn identify(&self, script_path: &str) -> Result<ClassIdentity, CompilerError> {
        let java_path = script_path.strip_suffix(self.java_source_suffix.as_str());
        let is_java_source = java_path.is_some();
        let path = java_path.unwrap_or(script_path);

        let Some(segments) = path_segments(path) else {
            return_rule_error!(
                format!("'{script_path}' is not a valid script path"),
                { PrimarySuggestion => "Script paths start with '/' and have a name between every '/'" }
            )
        };

        let mut escaped: Vec<String> = segments.iter().map(|segment| escape_identifier(segment)).collect();
        let simple_class_name = escaped.pop().unwrap_or_default();

        if !is_java_source {
            escaped.insert(0, self.namespace.to_owned());
        }

        let package_name = escaped.join(".");
        let fully_qualified_name = if package_name.is_empty() {
            simple_class_name.to_owned()
        } else {
            format!("{package_name}.{simple_class_name}")
        };

        Ok(ClassIdentity {
            package_name,
            simple_class_name,
            fully_qualified_name,
        })
    }
}

impl Default for SourceIdentifier {
    fn default() -> Self {
        SourceIdentifier::new(DEFAULT_NAMESPACE, DEFAULT_JAVA_SOURCE_SUFFIX)
    }
}

/// The segments of an absolute path with no empty segments, or None
fn path_segments(path: &str) -> Option<Vec<&str>> {
    let relative = path.strip_prefix('/')?;
    let segments: Vec<&str> = relative.split('/').collect();

    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    Some(segments)
}

fn unescape_segments(dotted_name: &str) -> Option<String> {
    let segments = dotted_name
        .split('.')
        .map(unescape_identifier)
        .collect::<Option<Vec<String>>>()?;

    Some(segments.join("/"))
}

/// A namespace must be a valid package name with at least one segment that
/// unescaping rejects, otherwise a Java source could end up with the same name.
pub fn validate_namespace(namespace: &str) -> Result<(), String> {
    if namespace.is_empty() {
        return Err(String::from("The namespace can't be empty"));
    }

    if let Some(segment) = namespace.split('.').find(|segment| !is_java_identifier(segment)) {
        return Err(format!(
            "'{segment}' in namespace '{namespace}' is not a valid Java identifier"
        ));
    }

    let is_distinct = namespace
        .split('.')
        .any(|segment| unescape_identifier(segment).is_none());

    if !is_distinct {
        return Err(format!(
            "Namespace '{namespace}' could also be the package of a Java source. \
            Add a '_' to one of its segments, like the default '{DEFAULT_NAMESPACE}'"
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/source_identifier_tests.rs"]
mod source_identifier_tests;
