//! Encoder configuration.

/// Knobs controlling how [`super::BintokenEncoder`] chooses tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BintokenOptions {
    /// When `true` (the default), integers and lengths are emitted using
    /// the narrowest tag (or the inline-int byte) that can hold the value.
    /// When `false`, integers are always emitted as `Int64` and lengths
    /// always as the tag's full declared width, which trades size for a
    /// fixed, predictable frame layout.
    pub narrow_integers: bool,
}

impl BintokenOptions {
    /// Emits the narrowest tag that can hold each value (the default).
    #[must_use]
    pub fn narrow() -> Self {
        Self {
            narrow_integers: true,
        }
    }

    /// Always emits `Int64` integers and full-width lengths.
    #[must_use]
    pub fn wide() -> Self {
        Self {
            narrow_integers: false,
        }
    }
}

impl Default for BintokenOptions {
    fn default() -> Self {
        Self::narrow()
    }
}
