/// # Project level concerns around the compiler front end
/// The config file a project keeps next to its templates, and the CLI that drives a compile.

// The basic compiler CLI
pub mod cli;

pub mod settings;
