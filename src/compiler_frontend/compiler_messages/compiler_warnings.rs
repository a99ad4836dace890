use saying::say;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
pub struct CompilerWarning {
    pub msg: String,

    // The raw template text the warning is about, if the parser gave us any
    pub code: String,
    pub warning_kind: WarningKind,
}

impl CompilerWarning {
    pub fn new(msg: &str, code: &str, warning_kind: WarningKind) -> CompilerWarning {
        CompilerWarning {
            msg: msg.to_owned(),
            code: code.to_owned(),
            warning_kind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WarningKind {
    // Forwarded from the markup parser through the command stream
    #[default]
    Template,

    // An expression inside a script or style block without an explicit `context` option
    MissingContext,
}

pub fn print_formatted_warning(w: CompilerWarning) {
    say!(Yellow "WARNING: ");
    match w.warning_kind {
        WarningKind::Template => {
            say!(w.msg);
        }
        WarningKind::MissingContext => {
            say!("Missing explicit context: ", w.msg);
        }
    }

    if !w.code.is_empty() {
        say!(Dark Magenta w.code);
    }
}
