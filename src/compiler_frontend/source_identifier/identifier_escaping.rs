//! # Identifier Escaping
//!
//! Turns any non-empty string into a valid Java identifier and back.
//!
//! Every character that can't stay as it is becomes an 8 character token `__hhhh__`:
//! two underscores, the UTF-16 code unit as 4 lowercase hex digits, two underscores.
//! Characters outside the basic plane become two tokens, one per surrogate.
//!
//! A character is escaped when it is:
//! - anything other than an ASCII letter, digit or `$`
//! - `_`, so an underscore in the output always belongs to a token
//! - a digit at the start of the identifier
//! - the first character of a reserved word
//!
//! Unescaping only accepts exactly what escaping produces.

pub const ESCAPE_TOKEN_LENGTH: usize = 8;

pub const JAVA_RESERVED_WORDS: [&str; 58] = [
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
    // Restricted identifiers, which can't name a type
    "var",
    "record",
    "yield",
    "sealed",
    "permits",
];

pub fn is_reserved_word(word: &str) -> bool {
    JAVA_RESERVED_WORDS.contains(&word)
}

pub fn escape_identifier(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    let is_reserved = is_reserved_word(name);

    for (index, ch) in name.chars().enumerate() {
        let keeps_character = (ch.is_ascii_alphanumeric() || ch == '$')
            && !(index == 0 && (ch.is_ascii_digit() || is_reserved));

        if keeps_character {
            escaped.push(ch);
            continue;
        }

        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("__{unit:04x}__"));
        }
    }

    escaped
}

/// The original name for an escaped identifier.
/// None when `escaped` could not have been produced by `escape_identifier`.
pub fn unescape_identifier(escaped: &str) -> Option<String> {
    if escaped.is_empty() || !escaped.is_ascii() {
        return None;
    }

    let bytes = escaped.as_bytes();
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'_' {
            units.push(u16::from(bytes[index]));
            index += 1;
            continue;
        }

        let token = escaped.get(index..index + ESCAPE_TOKEN_LENGTH)?;
        units.push(decode_token(token)?);
        index += ESCAPE_TOKEN_LENGTH;
    }

    let name = String::from_utf16(&units).ok()?;

    // Rejects tokens for characters that never get escaped, and characters that always do
    if escape_identifier(&name) != escaped {
        return None;
    }

    Some(name)
}

fn decode_token(token: &str) -> Option<u16> {
    let hex = token.strip_prefix("__")?.strip_suffix("__")?;

    let is_lowercase_hex = hex
        .bytes()
        .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));

    if hex.len() != 4 || !is_lowercase_hex {
        return None;
    }

    u16::from_str_radix(hex, 16).ok()
}

/// Whether `name` can be used as a Java identifier as it is
pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    let starts_correctly = first.is_ascii_alphabetic() || first == '_' || first == '$';
    starts_correctly
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
        && !is_reserved_word(name)
}

#[cfg(test)]
#[path = "tests/identifier_escaping_tests.rs"]
mod identifier_escaping_tests;
