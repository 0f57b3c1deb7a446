//! A token-at-a-time bintoken scanner implementing [`Decoder`].
//!
//! Grounded on the same one-token-per-call shape as
//! [`crate::json::JsonDecoder`], but generic over a [`CodeTable`] so the
//! same scanning logic serves both the bintoken and transenc code spaces
//! (see [`super::codes`]).

use core::marker::PhantomData;

use alloc::vec::Vec;

use super::codes::CodeTable;
use crate::decoder::{DecodeInt, DecodeValue, Decoder};
use crate::error::{Error, Result, SyntaxErrorKind};
use crate::token::Code;

enum Payload<'src> {
    End,
    Data(&'src [u8]),
}

/// Scans a byte slice into bintoken (or transenc, via `C`) tokens.
#[derive(Debug, Clone)]
pub struct BintokenDecoder<'src, C: CodeTable> {
    input: &'src [u8],
    pos: usize,
    start: usize,
    end: usize,
    code: Code,
    sticky: Option<SyntaxErrorKind>,
    _table: PhantomData<C>,
}

impl<'src, C: CodeTable> BintokenDecoder<'src, C> {
    /// Wraps `input`, scanning its first token eagerly.
    #[must_use]
    pub fn new(input: &'src [u8]) -> Self {
        let mut decoder = Self {
            input,
            pos: 0,
            start: 0,
            end: 0,
            code: Code::End,
            sticky: None,
            _table: PhantomData,
        };
        decoder.scan();
        decoder
    }

    /// Byte offset into `input` just past the current token.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn set(&mut self, start: usize, end: usize, code: Code) {
        self.start = start;
        self.end = end;
        self.code = code;
    }

    fn fail(&mut self, start: usize, kind: SyntaxErrorKind) {
        self.start = start;
        self.end = self.pos;
        self.sticky = Some(kind);
        self.code = kind.code();
    }

    fn end(&mut self, start: usize) {
        self.start = start;
        self.end = start;
        self.code = Code::End;
    }

    /// Reads exactly `width` bytes from the cursor. `Payload::End` means
    /// zero bytes remained (a clean truncation); a caller that gets `Err`
    /// has hit a frame that started but wasn't fully available.
    fn read_payload(&mut self, width: usize) -> core::result::Result<Payload<'src>, ()> {
        let avail = self.input.len() - self.pos;
        if avail == 0 {
            return Ok(Payload::End);
        }
        if avail < width {
            return Err(());
        }
        let slice = &self.input[self.pos..self.pos + width];
        self.pos += width;
        Ok(Payload::Data(slice))
    }

    fn read_length(bytes: &[u8]) -> u64 {
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        u64::from_le_bytes(buf)
    }

    fn scan_fixed(&mut self, start: usize, width: usize, code: Code) {
        match self.read_payload(width) {
            Ok(Payload::End) => self.end(start),
            Ok(Payload::Data(slice)) => {
                debug_assert_eq!(slice.len(), width);
                self.start = self.pos - width;
                self.end = self.pos;
                self.code = code;
            }
            Err(()) => self.fail(start, SyntaxErrorKind::UnexpectedToken),
        }
    }

    fn scan_string(&mut self, start: usize, prefix_width: usize, code: Code) {
        let length = match self.read_payload(prefix_width) {
            Ok(Payload::End) => {
                self.end(start);
                return;
            }
            Ok(Payload::Data(slice)) => Self::read_length(slice),
            Err(()) => {
                self.fail(start, SyntaxErrorKind::UnexpectedToken);
                return;
            }
        };
        self.scan_counted_payload(start, length, code);
    }

    fn scan_compact_array(&mut self, start: usize, prefix_width: usize, code: Code) {
        let element_width = compact_array_element_width(code);
        let length = match self.read_payload(prefix_width) {
            Ok(Payload::End) => {
                self.end(start);
                return;
            }
            Ok(Payload::Data(slice)) => Self::read_length(slice),
            Err(()) => {
                self.fail(start, SyntaxErrorKind::UnexpectedToken);
                return;
            }
        };
        if length % element_width as u64 != 0 {
            self.fail(start, SyntaxErrorKind::UnexpectedToken);
            return;
        }
        self.scan_counted_payload(start, length, code);
    }

    fn scan_counted_payload(&mut self, start: usize, length: u64, code: Code) {
        let avail = (self.input.len() - self.pos) as u64;
        if length > avail {
            self.fail(start, SyntaxErrorKind::Overflow);
            return;
        }
        let length = length as usize;
        let payload_start = self.pos;
        self.pos += length;
        self.start = payload_start;
        self.end = self.pos;
        self.code = code;
    }

    fn scan(&mut self) {
        if self.sticky.is_some() {
            return;
        }
        let start = self.pos;
        let Some(&tag) = self.input.get(start) else {
            self.end(start);
            return;
        };
        match C::code_for_tag(tag) {
            None => {
                self.pos = start + 1;
                self.set(start, self.pos, Code::Int8);
            }
            Some(code) => {
                self.pos = start + 1;
                match code {
                    Code::Null | Code::True | Code::False => self.set(start, self.pos, code),
                    Code::BeginRecord
                    | Code::EndRecord
                    | Code::BeginArray
                    | Code::EndArray
                    | Code::BeginAssocArray
                    | Code::EndAssocArray => self.set(start, self.pos, code),
                    Code::Int8 => self.scan_fixed(start, 1, code),
                    Code::Int16 => self.scan_fixed(start, 2, code),
                    Code::Int32 => self.scan_fixed(start, 4, code),
                    Code::Int64 => self.scan_fixed(start, 8, code),
                    Code::Float32 => self.scan_fixed(start, 4, code),
                    Code::Float64 => self.scan_fixed(start, 8, code),
                    Code::String8 => self.scan_string(start, 1, code),
                    Code::String16 => self.scan_string(start, 2, code),
                    Code::String32 => self.scan_string(start, 4, code),
                    Code::String64 => self.scan_string(start, 8, code),
                    _ if is_array8(code) => self.scan_compact_array(start, 1, code),
                    _ if is_array16(code) => self.scan_compact_array(start, 2, code),
                    _ if is_array32(code) => self.scan_compact_array(start, 4, code),
                    _ if is_array64(code) => self.scan_compact_array(start, 8, code),
                    _ => self.fail(start, SyntaxErrorKind::UnknownToken),
                }
            }
        }
    }
}

fn is_array8(code: Code) -> bool {
    matches!(
        code,
        Code::Array8Int8
            | Code::Array8Int16
            | Code::Array8Int32
            | Code::Array8Int64
            | Code::Array8Float32
            | Code::Array8Float64
    )
}

fn is_array16(code: Code) -> bool {
    matches!(
        code,
        Code::Array16Int8
            | Code::Array16Int16
            | Code::Array16Int32
            | Code::Array16Int64
            | Code::Array16Float32
            | Code::Array16Float64
    )
}

fn is_array32(code: Code) -> bool {
    matches!(
        code,
        Code::Array32Int8
            | Code::Array32Int16
            | Code::Array32Int32
            | Code::Array32Int64
            | Code::Array32Float32
            | Code::Array32Float64
    )
}

fn is_array64(code: Code) -> bool {
    matches!(
        code,
        Code::Array64Int8
            | Code::Array64Int16
            | Code::Array64Int32
            | Code::Array64Int64
            | Code::Array64Float32
            | Code::Array64Float64
    )
}

fn compact_array_element_width(code: Code) -> usize {
    match code {
        Code::Array8Int8 | Code::Array16Int8 | Code::Array32Int8 | Code::Array64Int8 => 1,
        Code::Array8Int16 | Code::Array16Int16 | Code::Array32Int16 | Code::Array64Int16 => 2,
        Code::Array8Int32
        | Code::Array16Int32
        | Code::Array32Int32
        | Code::Array64Int32
        | Code::Array8Float32
        | Code::Array16Float32
        | Code::Array32Float32
        | Code::Array64Float32 => 4,
        Code::Array8Int64
        | Code::Array16Int64
        | Code::Array32Int64
        | Code::Array64Int64
        | Code::Array8Float64
        | Code::Array16Float64
        | Code::Array32Float64
        | Code::Array64Float64 => 8,
        _ => unreachable!("not a compact array code"),
    }
}

impl<'src, C: CodeTable> Decoder<'src> for BintokenDecoder<'src, C> {
    fn code(&self) -> Code {
        self.code
    }

    fn literal(&self) -> &'src [u8] {
        &self.input[self.start..self.end]
    }

    fn advance(&mut self) {
        self.scan();
    }
}

fn decode_integer<T: DecodeInt>(code: Code, literal: &[u8]) -> Result<T> {
    let value: i128 = match code {
        Code::Int8 => i128::from(literal[0] as i8),
        Code::Int16 => {
            i128::from(i16::from_le_bytes([literal[0], literal[1]]))
        }
        Code::Int32 => {
            let mut b = [0u8; 4];
            b.copy_from_slice(literal);
            i128::from(i32::from_le_bytes(b))
        }
        Code::Int64 => {
            let mut b = [0u8; 8];
            b.copy_from_slice(literal);
            i128::from(i64::from_le_bytes(b))
        }
        _ => return Err(Error::IncompatibleType),
    };
    if value < 0 && !T::SIGNED {
        return Err(Error::InvalidValue);
    }
    T::from_i128(value).ok_or(Error::Overflow)
}

impl<'src, C: CodeTable, T: DecodeInt> DecodeValue<BintokenDecoder<'src, C>> for T {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        decode_integer(decoder.code(), decoder.literal())
    }
}

impl<'src, C: CodeTable> DecodeValue<BintokenDecoder<'src, C>> for f32 {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        if decoder.code() != Code::Float32 {
            return Err(Error::IncompatibleType);
        }
        let mut b = [0u8; 4];
        b.copy_from_slice(decoder.literal());
        Ok(f32::from_le_bytes(b))
    }
}

impl<'src, C: CodeTable> DecodeValue<BintokenDecoder<'src, C>> for f64 {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        if decoder.code() != Code::Float64 {
            return Err(Error::IncompatibleType);
        }
        let mut b = [0u8; 8];
        b.copy_from_slice(decoder.literal());
        Ok(f64::from_le_bytes(b))
    }
}

impl<'src, C: CodeTable> DecodeValue<BintokenDecoder<'src, C>> for bool {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        match decoder.code() {
            Code::True => Ok(true),
            Code::False => Ok(false),
            _ => Err(Error::IncompatibleType),
        }
    }
}

fn is_string_code(code: Code) -> bool {
    matches!(
        code,
        Code::String8 | Code::String16 | Code::String32 | Code::String64
    )
}

impl<'src, C: CodeTable> DecodeValue<BintokenDecoder<'src, C>> for alloc::string::String {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        if !is_string_code(decoder.code()) {
            return Err(Error::IncompatibleType);
        }
        alloc::string::String::from_utf8(decoder.literal().to_vec())
            .map_err(|_| Error::IncompatibleType)
    }
}

impl<'src, C: CodeTable> DecodeValue<BintokenDecoder<'src, C>> for bstr::BString {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        if !is_string_code(decoder.code()) {
            return Err(Error::IncompatibleType);
        }
        Ok(bstr::BString::from(decoder.literal().to_vec()))
    }
}

/// A scalar type decodable as the element of a bintoken compact array.
pub trait CompactElem: Sized + Copy {
    const WIDTH: usize;

    fn codes() -> [Code; 4];
    fn from_le_bytes(bytes: &[u8]) -> Self;
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_compact_elem_int {
    ($t:ty, $width:literal, [$a8:ident, $a16:ident, $a32:ident, $a64:ident]) => {
        impl CompactElem for $t {
            const WIDTH: usize = $width;

            fn codes() -> [Code; 4] {
                [Code::$a8, Code::$a16, Code::$a32, Code::$a64]
            }

            fn from_le_bytes(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $width];
                buf.copy_from_slice(bytes);
                <$t>::from_le_bytes(buf)
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_compact_elem_int!(i8, 1, [Array8Int8, Array16Int8, Array32Int8, Array64Int8]);
impl_compact_elem_int!(
    i16,
    2,
    [Array8Int16, Array16Int16, Array32Int16, Array64Int16]
);
impl_compact_elem_int!(
    i32,
    4,
    [Array8Int32, Array16Int32, Array32Int32, Array64Int32]
);
impl_compact_elem_int!(
    i64,
    8,
    [Array8Int64, Array16Int64, Array32Int64, Array64Int64]
);
impl_compact_elem_int!(
    f32,
    4,
    [
        Array8Float32,
        Array16Float32,
        Array32Float32,
        Array64Float32
    ]
);
impl_compact_elem_int!(
    f64,
    8,
    [
        Array8Float64,
        Array16Float64,
        Array32Float64,
        Array64Float64
    ]
);

impl<'src, C: CodeTable, T: CompactElem, const N: usize> DecodeValue<BintokenDecoder<'src, C>>
    for [T; N]
{
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        if !T::codes().contains(&decoder.code()) {
            return Err(Error::IncompatibleType);
        }
        let literal = decoder.literal();
        if literal.len() != N * T::WIDTH {
            return Err(Error::IncompatibleType);
        }
        Ok(core::array::from_fn(|i| {
            T::from_le_bytes(&literal[i * T::WIDTH..(i + 1) * T::WIDTH])
        }))
    }
}

impl<'src, C: CodeTable, T: CompactElem> DecodeValue<BintokenDecoder<'src, C>> for Vec<T> {
    fn decode_value(decoder: &BintokenDecoder<'src, C>) -> Result<Self> {
        if !T::codes().contains(&decoder.code()) {
            return Err(Error::IncompatibleType);
        }
        let literal = decoder.literal();
        Ok(literal
            .chunks_exact(T::WIDTH)
            .map(T::from_le_bytes)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::codes::BintokenCodes;
    use super::*;

    type D<'a> = BintokenDecoder<'a, BintokenCodes>;

    fn codes(input: &[u8]) -> Vec<Code> {
        let mut decoder = D::new(input);
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
    fn scans_array_of_bools() {
        let input = [0x91, 0x80, 0x81, 0x80, 0x81, 0x92];
        assert_eq!(
            codes(&input),
            alloc::vec![
                Code::BeginArray,
                Code::False,
                Code::True,
                Code::False,
                Code::True,
                Code::EndArray,
                Code::End,
            ]
        );
    }

    #[test]
    fn inline_int_covers_full_positive_range_and_minus_one() {
        let mut decoder = D::new(&[0x00]);
        assert_eq!(i8::decode_value(&decoder), Ok(0));
        let mut decoder = D::new(&[0x7F]);
        assert_eq!(i8::decode_value(&decoder), Ok(127));
        decoder = D::new(&[0xFF]);
        assert_eq!(i8::decode_value(&decoder), Ok(-1));
    }

    #[test]
    fn truncated_int32_payload_is_unexpected_token() {
        let input = [0x85, 0x01, 0x02];
        assert_eq!(codes(&input), alloc::vec![Code::ErrorUnexpectedToken]);
    }

    #[test]
    fn truncated_immediately_after_tag_is_end() {
        let input = [0x85];
        assert_eq!(codes(&input), alloc::vec![Code::End]);
    }

    #[test]
    fn decodes_compact_array_into_fixed_size_target() {
        let input = [
            0x94, 8, 0x01, 0x11, 0x02, 0x12, 0x03, 0x13, 0x04, 0x14,
        ];
        let decoder = D::new(&input);
        let values: [i16; 4] = DecodeValue::decode_value(&decoder).unwrap();
        assert_eq!(values, [0x1101, 0x1202, 0x1303, 0x1404]);
        assert_eq!(
            <[i16; 3] as DecodeValue<D<'_>>>::decode_value(&decoder),
            Err(Error::IncompatibleType)
        );
        assert_eq!(
            <[i16; 5] as DecodeValue<D<'_>>>::decode_value(&decoder),
            Err(Error::IncompatibleType)
        );
    }

    #[test]
    fn length_exceeding_remaining_input_is_overflow() {
        let input = [0x89, 0xFF];
        assert_eq!(codes(&input), alloc::vec![Code::ErrorOverflow]);
    }

    #[test]
    fn decodes_record_with_string_and_int16() {
        let input = [
            0x8D, 0x89, 3, b'A', b'B', b'C', 0x84, 0x7F, 0x00, 0x8E,
        ];
        assert_eq!(
            codes(&input),
            alloc::vec![
                Code::BeginRecord,
                Code::String8,
                Code::Int16,
                Code::EndRecord,
                Code::End,
            ]
        );
    }
}
