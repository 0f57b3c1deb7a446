//! A token-at-a-time JSON scanner implementing [`Decoder`].
//!
//! Grounded on the teacher crate's hand-rolled scanner (`parser/scanner`):
//! no lexer-generator, a single forward cursor over the source `&str`, and
//! whitespace/number/string scanning kept as separate small state machines
//! rather than one combined automaton. Differs from the teacher in scope —
//! this scans one token per call instead of driving a whole streaming
//! parse — and in surrogate handling, per the crate's escape module.

use alloc::{string::String, vec::Vec};

use super::escape::{push_code_unit, UnicodeEscapeBuffer};
use super::options::JsonOptions;
use crate::decoder::{DecodeInt, DecodeValue, Decoder};
use crate::error::{Error, Result, SyntaxErrorKind};
use crate::token::Code;

/// Scans a `&str` into a sequence of JSON tokens.
///
/// Constructing a decoder reads the first token eagerly, matching every
/// other decoder in the crate: `code()`/`literal()` always describe a
/// concrete token, never an unstarted one.
#[derive(Debug, Clone)]
pub struct JsonDecoder<'src> {
    input: &'src str,
    pos: usize,
    start: usize,
    end: usize,
    code: Code,
    sticky: Option<SyntaxErrorKind>,
    options: JsonOptions,
}

impl<'src> JsonDecoder<'src> {
    /// Wraps `input`, scanning its first token eagerly under `options`.
    #[must_use]
    pub fn new(input: &'src str, options: JsonOptions) -> Self {
        let mut decoder = Self {
            input,
            pos: 0,
            start: 0,
            end: 0,
            code: Code::End,
            sticky: None,
            options,
        };
        decoder.scan();
        decoder
    }

    /// Wraps `input` with [`JsonOptions::default`].
    #[must_use]
    pub fn with_defaults(input: &'src str) -> Self {
        Self::new(input, JsonOptions::default())
    }

    /// Byte offset into `input` just past the current token.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn bytes(&self) -> &'src [u8] {
        self.input.as_bytes()
    }

    fn set(&mut self, start: usize, end: usize, code: Code) {
        self.start = start;
        self.end = end;
        self.code = code;
    }

    /// Marks the decoder sticky on the byte range `[start, self.pos)`.
    /// Callers update `self.pos` to the failure point before calling this.
    fn fail(&mut self, start: usize, kind: SyntaxErrorKind) {
        self.start = start;
        self.end = self.pos;
        self.sticky = Some(kind);
        self.code = kind.code();
    }

    /// Marks a clean truncation (`Code::End`) on the byte range
    /// `[start, self.pos)`. Not sticky in the error sense: re-scanning from
    /// EOF naturally yields `End` again.
    fn end(&mut self, start: usize) {
        self.set(start, self.pos, Code::End);
    }

    fn is_json_whitespace(ch: char) -> bool {
        matches!(ch, ' ' | '\t' | '\n' | '\r')
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.input[self.pos..].chars().next() {
                Some(ch)
                    if Self::is_json_whitespace(ch)
                        || (self.options.allow_unicode_whitespace && ch.is_whitespace()) =>
                {
                    self.pos += ch.len_utf8();
                }
                _ => break,
            }
        }
    }

    fn scan(&mut self) {
        if self.sticky.is_some() {
            return;
        }
        self.skip_whitespace();
        let start = self.pos;
        let Some(&b) = self.bytes().get(start) else {
            self.set(start, start, Code::End);
            return;
        };
        match b {
            b'n' => self.scan_keyword(start, "null", Code::Null),
            b't' => self.scan_keyword(start, "true", Code::True),
            b'f' => self.scan_keyword(start, "false", Code::False),
            b'"' => self.scan_string(start),
            b'-' | b'0'..=b'9' => self.scan_number(start),
            b'[' => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::BeginArray);
            }
            b']' => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::EndArray);
            }
            b'{' => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::BeginObject);
            }
            b'}' => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::EndObject);
            }
            b':' => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::NameSeparator);
            }
            b',' => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::ValueSeparator);
            }
            _ => self.fail(start, SyntaxErrorKind::UnexpectedToken),
        }
    }

    /// Scans the maximal run of ASCII letters starting at `start` and
    /// compares it to `word`. An exact match emits `code`; a run that is a
    /// strict, EOF-terminated prefix of `word` is a truncation (`End`, the
    /// input may simply not have arrived yet); anything else is malformed
    /// and consumes through the run's end as `ErrorUnexpectedToken`.
    fn scan_keyword(&mut self, start: usize, word: &str, code: Code) {
        let bytes = self.bytes();
        let mut pos = start;
        while matches!(bytes.get(pos), Some(b) if b.is_ascii_alphabetic()) {
            pos += 1;
        }
        let run = &bytes[start..pos];
        if run == word.as_bytes() {
            self.pos = pos;
            self.set(start, pos, code);
            return;
        }
        if pos == bytes.len() && word.as_bytes().starts_with(run) {
            self.pos = pos;
            self.end(start);
            return;
        }
        self.pos = pos;
        self.fail(start, SyntaxErrorKind::UnexpectedToken);
    }

    /// EOF before the closing quote (or mid-escape) is a truncation (`End`);
    /// a disallowed byte while more input is present is malformed
    /// (`ErrorUnexpectedToken`).
    fn scan_string(&mut self, start: usize) {
        let bytes = self.bytes();
        let mut pos = start + 1;
        loop {
            let Some(&b) = bytes.get(pos) else {
                self.pos = pos;
                self.end(start);
                return;
            };
            match b {
                b'"' => {
                    pos += 1;
                    self.pos = pos;
                    self.set(start, pos, Code::String);
                    return;
                }
                b'\\' => {
                    pos += 1;
                    let Some(&esc) = bytes.get(pos) else {
                        self.pos = pos;
                        self.end(start);
                        return;
                    };
                    match esc {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => pos += 1,
                        b'u' => {
                            pos += 1;
                            for _ in 0..4 {
                                match bytes.get(pos) {
                                    Some(h) if h.is_ascii_hexdigit() => pos += 1,
                                    Some(_) => {
                                        self.pos = pos;
                                        self.fail(start, SyntaxErrorKind::UnexpectedToken);
                                        return;
                                    }
                                    None => {
                                        self.pos = pos;
                                        self.end(start);
                                        return;
                                    }
                                }
                            }
                        }
                        _ => {
                            self.pos = pos;
                            self.fail(start, SyntaxErrorKind::UnexpectedToken);
                            return;
                        }
                    }
                }
                0x00..=0x1F => {
                    self.pos = pos;
                    self.fail(start, SyntaxErrorKind::UnexpectedToken);
                    return;
                }
                _ => pos += 1,
            }
        }
    }

    /// A required digit run that ends exactly at EOF is a truncation
    /// (`End`); one that ends on a present, non-digit byte is malformed
    /// (`ErrorUnexpectedToken`).
    fn scan_number(&mut self, start: usize) {
        let bytes = self.bytes();
        let mut pos = start;
        if bytes.get(pos) == Some(&b'-') {
            pos += 1;
        }
        match bytes.get(pos) {
            None => {
                self.pos = pos;
                self.end(start);
                return;
            }
            Some(b'0') => pos += 1,
            Some(b'1'..=b'9') => {
                pos += 1;
                while matches!(bytes.get(pos), Some(b'0'..=b'9')) {
                    pos += 1;
                }
            }
            Some(_) => {
                self.pos = pos;
                self.fail(start, SyntaxErrorKind::UnexpectedToken);
                return;
            }
        }
        let mut is_float = false;
        if bytes.get(pos) == Some(&b'.') {
            is_float = true;
            pos += 1;
            let digits_start = pos;
            while matches!(bytes.get(pos), Some(b'0'..=b'9')) {
                pos += 1;
            }
            if pos == digits_start {
                self.pos = pos;
                if pos == bytes.len() {
                    self.end(start);
                } else {
                    self.fail(start, SyntaxErrorKind::UnexpectedToken);
                }
                return;
            }
        }
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            is_float = true;
            pos += 1;
            if matches!(bytes.get(pos), Some(b'+' | b'-')) {
                pos += 1;
            }
            let digits_start = pos;
            while matches!(bytes.get(pos), Some(b'0'..=b'9')) {
                pos += 1;
            }
            if pos == digits_start {
                self.pos = pos;
                if pos == bytes.len() {
                    self.end(start);
                } else {
                    self.fail(start, SyntaxErrorKind::UnexpectedToken);
                }
                return;
            }
        }
        self.pos = pos;
        self.set(start, pos, if is_float { Code::Floating } else { Code::Integer });
    }
}

impl<'src> Decoder<'src> for JsonDecoder<'src> {
    fn code(&self) -> Code {
        self.code
    }

    fn literal(&self) -> &'src [u8] {
        &self.input.as_bytes()[self.start..self.end]
    }

    fn advance(&mut self) {
        self.scan();
    }
}

/// Unescapes a `Code::String` literal (quotes included) into raw bytes.
///
/// Assumes the literal was produced by [`JsonDecoder::scan_string`], which
/// already validated escape syntax; an escape this function doesn't
/// recognize is therefore a bug in the scanner, not a possible user input.
pub(crate) fn unescape(literal: &[u8]) -> Vec<u8> {
    let inner = &literal[1..literal.len() - 1];
    let mut out = Vec::with_capacity(inner.len());
    let mut hex = UnicodeEscapeBuffer::new();
    let mut i = 0;
    while i < inner.len() {
        let b = inner[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        i += 1;
        match inner[i] {
            b'"' => out.push(b'"'),
            b'\\' => out.push(b'\\'),
            b'/' => out.push(b'/'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'u' => {
                hex.reset();
                for _ in 0..4 {
                    i += 1;
                    if let Some(code) = hex.feed(inner[i]) {
                        push_code_unit(&mut out, code);
                    }
                }
            }
            other => unreachable!("scanner validated escape set, got {other:#x}"),
        }
        i += 1;
    }
    out
}

fn decode_integer<T: DecodeInt>(code: Code, literal: &[u8]) -> Result<T> {
    if code != Code::Integer {
        return Err(Error::IncompatibleType);
    }
    let negative = literal.first() == Some(&b'-');
    let digits = if negative { &literal[1..] } else { literal };
    let mut acc: i128 = 0;
    for &b in digits {
        acc = acc.checked_mul(10).ok_or(Error::Overflow)?;
        acc = acc
            .checked_add(i128::from(b - b'0'))
            .ok_or(Error::Overflow)?;
    }
    if negative {
        acc = -acc;
    }
    if negative && !T::SIGNED {
        return Err(Error::InvalidValue);
    }
    T::from_i128(acc).ok_or(Error::Overflow)
}

impl<'src, T: DecodeInt> DecodeValue<JsonDecoder<'src>> for T {
    fn decode_value(decoder: &JsonDecoder<'src>) -> Result<Self> {
        decode_integer(decoder.code(), decoder.literal())
    }
}

impl<'src> DecodeValue<JsonDecoder<'src>> for f64 {
    fn decode_value(decoder: &JsonDecoder<'src>) -> Result<Self> {
        if decoder.code() != Code::Floating {
            return Err(Error::IncompatibleType);
        }
        let text = core::str::from_utf8(decoder.literal())
            .expect("JSON source is valid UTF-8 by construction");
        text.parse().map_err(|_| Error::Overflow)
    }
}

impl<'src> DecodeValue<JsonDecoder<'src>> for f32 {
    fn decode_value(decoder: &JsonDecoder<'src>) -> Result<Self> {
        f64::decode_value(decoder).map(|v| v as f32)
    }
}

impl<'src> DecodeValue<JsonDecoder<'src>> for bool {
    fn decode_value(decoder: &JsonDecoder<'src>) -> Result<Self> {
        match decoder.code() {
            Code::True => Ok(true),
            Code::False => Ok(false),
            _ => Err(Error::IncompatibleType),
        }
    }
}

impl<'src> DecodeValue<JsonDecoder<'src>> for String {
    fn decode_value(decoder: &JsonDecoder<'src>) -> Result<Self> {
        if decoder.code() != Code::String {
            return Err(Error::IncompatibleType);
        }
        String::from_utf8(unescape(decoder.literal())).map_err(|_| Error::IncompatibleType)
    }
}

impl<'src> DecodeValue<JsonDecoder<'src>> for bstr::BString {
    fn decode_value(decoder: &JsonDecoder<'src>) -> Result<Self> {
        if decoder.code() != Code::String {
            return Err(Error::IncompatibleType);
        }
        Ok(bstr::BString::from(unescape(decoder.literal())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(input: &str) -> Vec<Code> {
        let mut decoder = JsonDecoder::with_defaults(input);
        let mut out = Vec::new();
        loop {
            out.push(decoder.code());
            if decoder.code() == Code::End || decoder.code().is_error() {
                break;
            }
            decoder.advance();
        }
        out
    }

    #[test]
    fn scans_array_of_scalars() {
        assert_eq!(
            codes(r#"[null, true, false, 1, -2.5, "hi"]"#),
            alloc::vec![
                Code::BeginArray,
                Code::Null,
                Code::ValueSeparator,
                Code::True,
                Code::ValueSeparator,
                Code::False,
                Code::ValueSeparator,
                Code::Integer,
                Code::ValueSeparator,
                Code::Floating,
                Code::ValueSeparator,
                Code::String,
                Code::EndArray,
                Code::End,
            ]
        );
    }

    #[test]
    fn truncated_exponent_ends_cleanly_rather_than_floating() {
        assert_eq!(codes("1e"), alloc::vec![Code::End]);
    }

    #[test]
    fn exponent_followed_by_more_input_is_unexpected_token() {
        assert_eq!(codes("1e]"), alloc::vec![Code::ErrorUnexpectedToken]);
    }

    #[test]
    fn unterminated_string_ends_cleanly_as_truncation() {
        assert_eq!(codes(r#""abc"#), alloc::vec![Code::End]);
    }

    #[test]
    fn decodes_integer_into_every_width() {
        let decoder = JsonDecoder::with_defaults("-42");
        assert_eq!(i8::decode_value(&decoder), Ok(-42));
        assert_eq!(i64::decode_value(&decoder), Ok(-42));
        assert_eq!(u8::decode_value(&decoder), Err(Error::InvalidValue));
    }

    #[test]
    fn decodes_escaped_string() {
        let decoder = JsonDecoder::with_defaults(r#""a\n€b""#);
        let s = String::decode_value(&decoder).unwrap();
        assert_eq!(s, "a\n\u{20AC}b");
    }

    #[test]
    fn unicode_whitespace_only_skipped_when_enabled() {
        let input = "\u{00A0}1";
        assert_eq!(
            codes(input),
            alloc::vec![Code::ErrorUnexpectedToken]
        );
        let mut decoder = JsonDecoder::new(
            input,
            JsonOptions {
                allow_unicode_whitespace: true,
            },
        );
        assert_eq!(decoder.code(), Code::Integer);
        decoder.advance();
        assert_eq!(decoder.code(), Code::End);
    }
}
