use serde::{Deserialize, Serialize};
use std::fmt;

/// The static types an expression can be inferred to have.
/// Unknown is a normal result, the value's type is then only known at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    String,
    Boolean,
    Long,
    Double,
    Map,
    #[default]
    Unknown,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Long | Type::Double)
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Type::String => "string",
            Type::Boolean => "boolean",
            Type::Long => "long",
            Type::Double => "double",
            Type::Map => "map",
            Type::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
