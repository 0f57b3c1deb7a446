//! Decoder configuration.

/// Knobs controlling how liberally [`super::JsonDecoder`] scans.
///
/// Grounded on the teacher crate's `ParserOptions`, trimmed to the one knob
/// the distilled grammar actually needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// When `true`, also treats the Unicode `White_Space` characters the
    /// strict RFC 7159 grammar excludes (e.g. U+00A0, U+2028) as
    /// insignificant whitespace between tokens.
    pub allow_unicode_whitespace: bool,
}

impl JsonOptions {
    /// The strict RFC 7159 grammar (the default): no extra whitespace chars.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_unicode_whitespace: false,
        }
    }
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self::strict()
    }
}
