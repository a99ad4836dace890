//! Prints the messages of one compile for a person at a terminal.

use crate::compiler_frontend::compiler_errors::{
    CompilerError, CompilerMessages, ErrorMetaDataKey, ErrorType, error_type_to_str,
};
use crate::compiler_frontend::compiler_warnings::print_formatted_warning;
use saying::say;

pub fn print_compiler_messages(messages: CompilerMessages) {
    let error_count = messages.errors.len();
    let warning_count = messages.warnings.len();

    for error in messages.errors {
        print_formatted_error(error);
    }

    for warning in messages.warnings {
        print_formatted_warning(warning);
    }

    if error_count > 0 {
        say!(Red Bold "\n", error_count, " error(s)", Reset ", ", warning_count, " warning(s)");
    }
}

pub fn print_formatted_error(error: CompilerError) {
    let heading = error_type_to_str(&error.error_type);

    match (&error.error_type, &error.script_path) {
        // File errors keep the path on disk in `script_path`
        (ErrorType::File, Some(path)) => {
            say!(Yellow "\n", heading, ": ", Dark Magenta path);
        }
        (_, Some(script)) => {
            say!(Red "\n", heading, Reset " in ", Dark Magenta script);
        }
        (_, None) => {
            say!(Red "\n", heading);
        }
    }

    if error.error_type == ErrorType::Compiler {
        say!(Dark Yellow "This is a bug in the template compiler, not in the template");
    }

    say!(error.msg);

    if let Some(stage) = error.metadata.get(&ErrorMetaDataKey::CompilationStage) {
        say!(Bright Black "  during ", stage);
    }

    if let Some(kind) = error.metadata.get(&ErrorMetaDataKey::CommandKind) {
        say!(Bright Black "  in a ", kind, " block");
    }

    if let Some(key) = error.metadata.get(&ErrorMetaDataKey::ConfigKey) {
        say!(Bright Black "  config key: ", Yellow key);
    }

    if let Some(suggestion) = error.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Green "  hint: ", suggestion);
    }
}
