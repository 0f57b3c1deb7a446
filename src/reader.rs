//! [`Reader`]: a tree-aware layer over any [`Decoder`], tracking container
//! nesting and object key/value alternation so callers don't have to.
//!
//! Grounded on the teacher crate's `parser` state machine (which layers the
//! same kind of scope stack and key/value alternation over its own
//! lower-level scanner to produce structured events) — generalized here over
//! four container kinds instead of JSON's two (`array`/`object`), since a
//! bintoken stream can also carry `record` and `assoc_array` scopes.

use alloc::vec::Vec;

use crate::decoder::{DecodeValue, Decoder};
use crate::error::{Error, Result, SyntaxErrorKind};
use crate::token::{Code, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Array,
    Object,
    Record,
    AssocArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Value,
    Any,
}

#[derive(Debug, Clone)]
struct Frame {
    kind: ScopeKind,
    expect: Expect,
}

fn scope_kind_for_begin(code: Code) -> ScopeKind {
    match code {
        Code::BeginArray => ScopeKind::Array,
        Code::BeginObject => ScopeKind::Object,
        Code::BeginRecord => ScopeKind::Record,
        Code::BeginAssocArray => ScopeKind::AssocArray,
        _ => unreachable!("scope_kind_for_begin called on a non-begin-scope code"),
    }
}

fn closer_matches(closer: Code, kind: ScopeKind) -> bool {
    matches!(
        (closer, kind),
        (Code::EndArray, ScopeKind::Array)
            | (Code::EndObject, ScopeKind::Object)
            | (Code::EndRecord, ScopeKind::Record)
            | (Code::EndAssocArray, ScopeKind::AssocArray)
    )
}

/// The code a mismatched closer is reported as. Array/object mismatches get
/// their own named code; record/assoc_array mismatches fall back to the
/// generic structural-violation code since the taxonomy has no dedicated
/// "unbalanced" variant for them (see the crate's design notes).
fn unbalanced_code_for(closer: Code) -> Code {
    match closer {
        Code::EndArray => Code::ErrorUnbalancedEndArray,
        Code::EndObject => Code::ErrorUnbalancedEndObject,
        _ => Code::ErrorUnexpectedToken,
    }
}

fn expected_end_code_for(kind: ScopeKind) -> Code {
    match kind {
        ScopeKind::Array => Code::ErrorExpectedEndArray,
        ScopeKind::Object => Code::ErrorExpectedEndObject,
        ScopeKind::Record => Code::ErrorExpectedEndRecord,
        ScopeKind::AssocArray => Code::ErrorExpectedEndAssocArray,
    }
}

/// Maps a reader-level sticky [`Code`] back to the [`Error`] it represents.
/// Covers both the structural codes [`Reader`] itself can set and the
/// lexical codes a wrapped decoder can be sticky on, so [`Reader::value`]
/// has one place to turn any sticky code into a typed failure.
fn error_for_sticky_code(code: Code) -> Error {
    match code {
        Code::ErrorInvalidKey => Error::InvalidKey,
        Code::ErrorInvalidValue => Error::InvalidValue,
        Code::ErrorUnbalancedEndArray => Error::UnbalancedEndArray,
        Code::ErrorUnbalancedEndObject => Error::UnbalancedEndObject,
        Code::ErrorExpectedEndArray => Error::ExpectedEndArray,
        Code::ErrorExpectedEndObject => Error::ExpectedEndObject,
        Code::ErrorExpectedEndRecord => Error::ExpectedEndRecord,
        Code::ErrorExpectedEndAssocArray => Error::ExpectedEndAssocArray,
        Code::ErrorUnexpectedToken => Error::UnexpectedToken,
        Code::ErrorIncompatibleType => Error::IncompatibleType,
        other => SyntaxErrorKind::from_code(other).map_or(Error::UnexpectedToken, Error::Sticky),
    }
}

/// A tree-aware cursor over a token stream.
///
/// Wraps a [`Decoder`] and maintains a stack of open container scopes, so
/// `level()`, key/value alternation inside objects, and begin/end balancing
/// are tracked once here instead of by every caller. `level()` counts only
/// *fully entered* scopes: it increments once the token after a `Begin*` is
/// surfaced, and decrements before an `End*` token is surfaced, so a caller
/// printing indentation sees the same level for a container's opening and
/// closing brackets.
///
/// Once [`Reader::code`] reports an error — whether raised by the
/// underlying decoder or by the reader's own structural checks — the reader
/// is sticky: [`Reader::next`] returns `false` forever after.
pub struct Reader<D> {
    decoder: D,
    stack: Vec<Frame>,
    sticky: Option<Code>,
}

impl<'src, D: Decoder<'src>> Reader<D> {
    /// Wraps `decoder`, validating its already-current token as the
    /// reader's first surfaced position.
    pub fn new(decoder: D) -> Self {
        let mut reader = Self {
            decoder,
            stack: Vec::new(),
            sticky: None,
        };
        reader.skip_separators();
        reader.validate_current();
        reader
    }

    /// Advances the wrapped decoder past any run of `NameSeparator`/
    /// `ValueSeparator` tokens. Separators carry no information `Reader`'s
    /// key/value alternation tracking doesn't already derive from scope
    /// state, so they are never surfaced as a user-visible position.
    fn skip_separators(&mut self) {
        while matches!(
            self.decoder.code(),
            Code::NameSeparator | Code::ValueSeparator
        ) {
            self.decoder.advance();
        }
    }

    /// The exact code of the current token, or the reader's own sticky
    /// structural-error code if one has been raised.
    #[must_use]
    pub fn code(&self) -> Code {
        self.sticky.unwrap_or_else(|| self.decoder.code())
    }

    /// The [`Symbol`] class of the current token.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.code().symbol()
    }

    /// The raw source slice backing the current token.
    #[must_use]
    pub fn literal(&self) -> &'src [u8] {
        self.decoder.literal()
    }

    /// Current scope depth. See the type-level docs for the exact
    /// increment/decrement timing.
    #[must_use]
    pub fn level(&self) -> usize {
        self.stack.len()
    }

    /// Converts the current token into `T`, or `Error::Sticky`/the mapped
    /// structural error if the reader is stuck.
    pub fn value<T: DecodeValue<D>>(&self) -> Result<T> {
        if let Some(code) = self.sticky {
            return Err(error_for_sticky_code(code));
        }
        let code = self.decoder.code();
        if code.is_error() {
            return Err(error_for_sticky_code(code));
        }
        T::decode_value(&self.decoder)
    }

    /// Applies the bookkeeping a token leaving "current" status triggers:
    /// a `Begin*` token pushes its scope now, so that `level()` only
    /// reflects the new depth once the reader has moved past it.
    fn apply_departure(&mut self) {
        let code = self.decoder.code();
        if code.is_begin_scope() {
            let kind = scope_kind_for_begin(code);
            let expect = match kind {
                ScopeKind::Object | ScopeKind::AssocArray => Expect::Key,
                ScopeKind::Array | ScopeKind::Record => Expect::Any,
            };
            self.stack.push(Frame { kind, expect });
        }
    }

    /// Validates the decoder's current token against open-scope state,
    /// setting `self.sticky` (and popping/flipping alternation as needed)
    /// when the position is structurally illegal. Returns `false` when the
    /// reader should be considered stuck or cleanly finished.
    fn validate_current(&mut self) -> bool {
        let code = self.decoder.code();
        if code.is_error() {
            return false;
        }

        if code == Code::End {
            if let Some(frame) = self.stack.last() {
                self.sticky = Some(expected_end_code_for(frame.kind));
                return false;
            }
            return false;
        }

        if code.is_end_scope() {
            return match self.stack.last() {
                None => {
                    self.sticky = Some(unbalanced_code_for(code));
                    false
                }
                Some(frame) if !closer_matches(code, frame.kind) => {
                    self.sticky = Some(unbalanced_code_for(code));
                    false
                }
                Some(frame)
                    if matches!(frame.kind, ScopeKind::Object | ScopeKind::AssocArray)
                        && frame.expect == Expect::Value =>
                {
                    self.sticky = Some(Code::ErrorInvalidValue);
                    false
                }
                Some(_) => {
                    self.stack.pop();
                    true
                }
            };
        }

        if let Some(frame) = self.stack.last_mut() {
            if matches!(frame.kind, ScopeKind::Object | ScopeKind::AssocArray) {
                match frame.expect {
                    Expect::Key => {
                        if code != Code::String {
                            self.sticky = Some(Code::ErrorInvalidKey);
                            return false;
                        }
                        frame.expect = Expect::Value;
                    }
                    Expect::Value => frame.expect = Expect::Key,
                    Expect::Any => unreachable!("object/assoc_array frames never use Any"),
                }
            }
        }
        true
    }

    /// Advances to the next structural position. Returns `true` if a token
    /// remains current, `false` at clean end of input or once the reader
    /// (or the wrapped decoder) is sticky on an error.
    pub fn next(&mut self) -> bool {
        if self.sticky.is_some() {
            return false;
        }
        if self.decoder.code().is_error() || self.decoder.code() == Code::End {
            return false;
        }
        self.apply_departure();
        self.decoder.advance();
        self.skip_separators();
        self.validate_current()
    }
}

impl<'src, D: Decoder<'src> + Clone> Reader<D> {
    /// Advances only if the next token's code is exactly `expected`; on a
    /// mismatch the reader is left positioned exactly where it was and
    /// `Err(Error::UnexpectedToken)` is returned instead of going sticky.
    pub fn next_expect(&mut self, expected: Code) -> Result<bool> {
        if let Some(code) = self.sticky {
            return Err(error_for_sticky_code(code));
        }
        if self.decoder.code().is_error() {
            return Err(error_for_sticky_code(self.decoder.code()));
        }
        let mut probe = Reader {
            decoder: self.decoder.clone(),
            stack: self.stack.clone(),
            sticky: None,
        };
        let advanced = probe.next();
        if probe.code() != expected {
            return Err(Error::UnexpectedToken);
        }
        *self = probe;
        Ok(advanced)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;
    use crate::json::{JsonDecoder, JsonOptions};

    fn reader(input: &str) -> Reader<JsonDecoder<'_>> {
        Reader::new(JsonDecoder::new(input, JsonOptions::default()))
    }

    #[test]
    fn level_increments_after_begin_and_decrements_before_end() {
        let mut r = reader("[1]");
        assert_eq!(r.level(), 0);
        assert_eq!(r.code(), Code::BeginArray);
        assert!(r.next());
        assert_eq!(r.level(), 1);
        assert_eq!(r.code(), Code::Integer);
        assert!(r.next());
        assert_eq!(r.code(), Code::EndArray);
        assert_eq!(r.level(), 0);
    }

    #[test]
    fn reads_nested_array_tracking_level() {
        let mut r = reader("[1,[2,3],4]");
        let mut levels = alloc::vec::Vec::new();
        loop {
            levels.push((r.code(), r.level()));
            if !r.next() {
                break;
            }
        }
        assert_eq!(levels[0], (Code::BeginArray, 0));
        // first token after BeginArray is at level 1
        assert!(levels.iter().any(|&(c, l)| c == Code::Integer && l == 1));
    }

    #[test]
    fn object_enforces_string_keys() {
        let mut r = reader(r#"{"a":1}"#);
        assert_eq!(r.code(), Code::BeginObject);
        assert!(r.next());
        assert_eq!(r.code(), Code::String);
        assert!(r.next());
        // the `:` between key and value is never surfaced as its own position
        assert_eq!(r.code(), Code::Integer);
        assert!(r.next());
        assert_eq!(r.code(), Code::EndObject);
        assert!(!r.next());
        assert_eq!(r.code(), Code::End);
    }

    #[test]
    fn separators_are_never_surfaced_across_multiple_elements() {
        let mut r = reader(r#"{"a":1,"b":2}"#);
        let mut codes = alloc::vec::Vec::new();
        loop {
            codes.push(r.code());
            if !r.next() {
                break;
            }
        }
        assert!(!codes.contains(&Code::NameSeparator));
        assert!(!codes.contains(&Code::ValueSeparator));
        assert_eq!(
            codes,
            alloc::vec![
                Code::BeginObject,
                Code::String,
                Code::Integer,
                Code::String,
                Code::Integer,
                Code::EndObject,
            ]
        );
    }

    #[test]
    fn non_string_key_is_invalid_key() {
        let mut r = reader(r#"{1:2}"#);
        assert!(!r.next());
        assert_eq!(r.code(), Code::ErrorInvalidKey);
        assert!(!r.next());
    }

    #[test]
    fn unbalanced_close_reports_unbalanced_end_array() {
        let mut r = reader(r#"{"a":1]"#);
        assert!(r.next()); // -> String "a"
        assert!(r.next()); // -> Integer 1, skipping the `:`
        assert!(!r.next()); // -> the stray `]`
        assert_eq!(r.code(), Code::ErrorUnbalancedEndArray);
    }

    #[test]
    fn truncated_input_with_open_scope_reports_expected_end_array() {
        let mut r = reader("[1,2");
        assert!(r.next()); // -> 1
        assert!(r.next()); // -> 2, skipping the `,`
        assert!(!r.next()); // truncated before a closer
        assert_eq!(r.code(), Code::ErrorExpectedEndArray);
    }

    #[test]
    fn value_returns_sticky_error_for_lexical_failures() {
        let mut r = reader("[1e]");
        assert!(!r.next());
        assert_eq!(r.code(), Code::ErrorUnexpectedToken);
        assert_eq!(
            r.value::<i64>(),
            Err(Error::Sticky(SyntaxErrorKind::UnexpectedToken))
        );
    }

    #[test]
    fn next_expect_matches_without_side_effects_on_mismatch() {
        let mut r = reader("[1,2]");
        assert!(r.next_expect(Code::Integer).unwrap());
        assert_eq!(r.code(), Code::Integer);
        let before = r.level();
        assert_eq!(r.next_expect(Code::String), Err(Error::UnexpectedToken));
        assert_eq!(r.code(), Code::Integer);
        assert_eq!(r.level(), before);
    }

    #[test]
    fn decodes_scalar_value_through_value() {
        let mut r = reader(r#""hi""#);
        assert_eq!(r.value::<String>(), Ok(String::from("hi")));
        assert!(!r.next());
    }
}
