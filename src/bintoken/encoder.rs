//! Renders tokens as bintoken bytes.
//!
//! Grounded on the reference `bintoken::writer`'s scope-validating, tag-then-
//! payload emission shape, generalized over a [`CodeTable`] for the same
//! reason [`super::BintokenDecoder`] is.

use alloc::vec::Vec;
use core::marker::PhantomData;

use super::codes::CodeTable;
use super::decoder::CompactElem;
use super::options::BintokenOptions;
use crate::buffer::Buffer;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::token::Code;

/// Writes tokens as bintoken (or transenc, via `C`) bytes.
#[derive(Debug, Clone, Copy)]
pub struct BintokenEncoder<C: CodeTable = super::codes::BintokenCodes> {
    options: BintokenOptions,
    _table: PhantomData<C>,
}

impl<C: CodeTable> BintokenEncoder<C> {
    /// Builds an encoder governed by `options`.
    #[must_use]
    pub fn new(options: BintokenOptions) -> Self {
        Self {
            options,
            _table: PhantomData,
        }
    }

    fn tag(code: Code) -> u8 {
        C::tag_for_code(code).unwrap_or_else(|| panic!("{code:?} has no wire tag"))
    }

    fn write_tag<B: Buffer>(&self, buf: &mut B, code: Code) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(Self::tag(code));
        Ok(())
    }

    fn write_inline_or_tagged<B: Buffer>(&self, buf: &mut B, value: i64) -> Result<()> {
        if self.options.narrow_integers {
            if (0..=0x7F).contains(&value) {
                if !buf.grow(1) {
                    return Err(Error::BufferFull);
                }
                buf.write_byte(value as u8);
                return Ok(());
            }
            if (-85..=-1).contains(&value) {
                if !buf.grow(1) {
                    return Err(Error::BufferFull);
                }
                buf.write_byte(value as i8 as u8);
                return Ok(());
            }
            if let Ok(v) = i8::try_from(value) {
                self.write_tag(buf, Code::Int8)?;
                if !buf.grow(1) {
                    return Err(Error::BufferFull);
                }
                buf.write_byte(v as u8);
                return Ok(());
            }
            if let Ok(v) = i16::try_from(value) {
                self.write_tag(buf, Code::Int16)?;
                if !buf.grow(2) {
                    return Err(Error::BufferFull);
                }
                buf.write_bytes(&v.to_le_bytes());
                return Ok(());
            }
            if let Ok(v) = i32::try_from(value) {
                self.write_tag(buf, Code::Int32)?;
                if !buf.grow(4) {
                    return Err(Error::BufferFull);
                }
                buf.write_bytes(&v.to_le_bytes());
                return Ok(());
            }
        }
        self.write_tag(buf, Code::Int64)?;
        if !buf.grow(8) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(&value.to_le_bytes());
        Ok(())
    }

    /// Writes a homogeneous compact array: the narrowest length-prefix
    /// width (`Array8`/`16`/`32`/`64`) whose range covers the payload's
    /// byte length, followed by that many little-endian element bytes.
    pub fn write_compact_array<B: Buffer, T: CompactElem>(
        &mut self,
        buf: &mut B,
        values: &[T],
    ) -> Result<()> {
        let byte_len = values.len() * T::WIDTH;
        let codes = T::codes();
        let (code, prefix_width): (Code, usize) = if byte_len <= u8::MAX as usize {
            (codes[0], 1)
        } else if byte_len <= u16::MAX as usize {
            (codes[1], 2)
        } else if byte_len <= u32::MAX as usize {
            (codes[2], 4)
        } else {
            (codes[3], 8)
        };
        self.write_tag(buf, code)?;
        if !buf.grow(prefix_width + byte_len) {
            return Err(Error::BufferFull);
        }
        let len_bytes = (byte_len as u64).to_le_bytes();
        buf.write_bytes(&len_bytes[..prefix_width]);
        let mut payload = Vec::with_capacity(byte_len);
        for &v in values {
            v.write_le(&mut payload);
        }
        buf.write_bytes(&payload);
        Ok(())
    }
}

impl<C: CodeTable> Default for BintokenEncoder<C> {
    fn default() -> Self {
        Self::new(BintokenOptions::default())
    }
}

impl<B: Buffer, C: CodeTable> Encoder<B> for BintokenEncoder<C> {
    fn write_null(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::Null)
    }

    fn write_bool(&mut self, buf: &mut B, value: bool) -> Result<()> {
        self.write_tag(buf, if value { Code::True } else { Code::False })
    }

    fn write_i64(&mut self, buf: &mut B, value: i64) -> Result<()> {
        self.write_inline_or_tagged(buf, value)
    }

    fn write_u64(&mut self, buf: &mut B, value: u64) -> Result<()> {
        let value = i64::try_from(value).map_err(|_| Error::Overflow)?;
        self.write_inline_or_tagged(buf, value)
    }

    fn write_f64(&mut self, buf: &mut B, value: f64) -> Result<()> {
        self.write_tag(buf, Code::Float64)?;
        if !buf.grow(8) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(&value.to_le_bytes());
        Ok(())
    }

    fn write_str(&mut self, buf: &mut B, value: &str) -> Result<()> {
        self.write_bytes(buf, value.as_bytes())
    }

    fn write_bytes(&mut self, buf: &mut B, value: &[u8]) -> Result<()> {
        let len = value.len();
        let (code, prefix_width): (Code, usize) = if len <= u8::MAX as usize {
            (Code::String8, 1)
        } else if len <= u16::MAX as usize {
            (Code::String16, 2)
        } else if len <= u32::MAX as usize {
            (Code::String32, 4)
        } else {
            (Code::String64, 8)
        };
        self.write_tag(buf, code)?;
        if !buf.grow(prefix_width + len) {
            return Err(Error::BufferFull);
        }
        let len_bytes = (len as u64).to_le_bytes();
        buf.write_bytes(&len_bytes[..prefix_width]);
        buf.write_bytes(value);
        Ok(())
    }

    fn begin_array(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::BeginArray)
    }

    fn end_array(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::EndArray)
    }

    fn begin_object(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::BeginAssocArray)
    }

    fn end_object(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::EndAssocArray)
    }

    fn begin_record(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::BeginRecord)
    }

    fn end_record(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::EndRecord)
    }

    fn begin_assoc_array(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::BeginAssocArray)
    }

    fn end_assoc_array(&mut self, buf: &mut B) -> Result<()> {
        self.write_tag(buf, Code::EndAssocArray)
    }

    fn name_separator(&mut self, _buf: &mut B) -> Result<()> {
        Ok(())
    }

    fn value_separator(&mut self, _buf: &mut B) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::super::codes::BintokenCodes;
    use super::*;

    type E = BintokenEncoder<BintokenCodes>;

    #[test]
    fn narrow_mode_inlines_small_positive_and_negative_ints() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = E::default();
        enc.write_i64(&mut buf, 42).unwrap();
        enc.write_i64(&mut buf, -1).unwrap();
        assert_eq!(buf, [42, 0xFF]);
    }

    #[test]
    fn narrow_mode_falls_back_to_int8_for_reserved_byte_conflicts() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = E::default();
        enc.write_i64(&mut buf, -100).unwrap();
        assert_eq!(buf, [0x83, (-100i8) as u8]);
    }

    #[test]
    fn wide_mode_always_emits_int64() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = E::new(BintokenOptions::wide());
        enc.write_i64(&mut buf, 1).unwrap();
        assert_eq!(buf.len(), 9);
        assert_eq!(buf[0], 0x86);
    }

    #[test]
    fn writes_narrowest_string_tag() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = E::default();
        enc.write_str(&mut buf, "abc").unwrap();
        assert_eq!(buf, [0x89, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn writes_compact_array_round_trip() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = E::default();
        enc.write_compact_array(&mut buf, &[0x1101i16, 0x1202, 0x1303, 0x1404])
            .unwrap();
        assert_eq!(
            buf,
            [0x94, 8, 0x01, 0x11, 0x02, 0x12, 0x03, 0x13, 0x04, 0x14]
        );
    }
}
