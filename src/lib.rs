//! # Sightly
//!
//! The front end of an HTL (Sightly) template compiler.
//! Parsed template events go in, an optimized command stream with binding types and
//! a deterministic class identity comes out, ready for a code generator.

pub mod compiler_frontend;
pub mod projects;

pub use compiler_frontend::{CompilationUnit, CompilerFrontend, Flag, TemplateSource};
pub use projects::settings::Config;
