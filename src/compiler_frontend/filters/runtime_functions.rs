// Names of the runtime extensions generated code calls through RuntimeCall nodes.
// Argument counts are checked by the extensions themselves when the template renders.
pub const JOIN: &str = "join";
pub const FORMAT: &str = "format";
pub const I18N: &str = "i18n";
pub const URI_MANIPULATION: &str = "uriManipulation";
pub const XSS: &str = "xss";

// Option names
pub const JOIN_OPTION: &str = "join";
pub const FORMAT_OPTION: &str = "format";
pub const I18N_OPTION: &str = "i18n";
pub const CONTEXT_OPTION: &str = "context";
pub const LOCALE_OPTION: &str = "locale";
pub const HINT_OPTION: &str = "hint";
pub const BASENAME_OPTION: &str = "basename";
pub const TIMEZONE_OPTION: &str = "timezone";
pub const TYPE_OPTION: &str = "type";
