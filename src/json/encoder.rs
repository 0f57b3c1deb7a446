//! Renders tokens as JSON text.
//!
//! Grounded on the teacher crate's `value.rs`, which writes a `Value` tree
//! out through the same escape-then-copy strategy used here: control bytes
//! and the two characters JSON syntax reserves (`"`, `\`) go out as a short
//! escape, everything else (including multi-byte UTF-8 sequences) is copied
//! through unchanged, since a `&str` input is valid UTF-8 by construction.

use alloc::format;

use crate::buffer::Buffer;
use crate::encoder::Encoder;
use crate::error::{Error, Result};

/// Writes tokens as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    _private: (),
}

impl JsonEncoder {
    /// Builds an encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn write_escaped_string<B: Buffer>(buf: &mut B, value: &str) -> Result<()> {
    if !buf.grow(value.len() + 2) {
        return Err(Error::BufferFull);
    }
    buf.write_byte(b'"');
    for &b in value.as_bytes() {
        match b {
            b'"' => buf.write_bytes(b"\\\""),
            b'\\' => buf.write_bytes(b"\\\\"),
            0x08 => buf.write_bytes(b"\\b"),
            0x0C => buf.write_bytes(b"\\f"),
            b'\n' => buf.write_bytes(b"\\n"),
            b'\r' => buf.write_bytes(b"\\r"),
            b'\t' => buf.write_bytes(b"\\t"),
            0x00..=0x1F => {
                let escape = format!("\\u{b:04x}");
                buf.write_bytes(escape.as_bytes());
            }
            _ => buf.write_byte(b),
        }
    }
    buf.write_byte(b'"');
    Ok(())
}

impl<B: Buffer> Encoder<B> for JsonEncoder {
    fn write_null(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(4) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(b"null");
        Ok(())
    }

    fn write_bool(&mut self, buf: &mut B, value: bool) -> Result<()> {
        let text: &[u8] = if value { b"true" } else { b"false" };
        if !buf.grow(text.len()) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(text);
        Ok(())
    }

    fn write_i64(&mut self, buf: &mut B, value: i64) -> Result<()> {
        let text = format!("{value}");
        if !buf.grow(text.len()) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(text.as_bytes());
        Ok(())
    }

    fn write_u64(&mut self, buf: &mut B, value: u64) -> Result<()> {
        let text = format!("{value}");
        if !buf.grow(text.len()) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(text.as_bytes());
        Ok(())
    }

    fn write_f64(&mut self, buf: &mut B, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidValue);
        }
        let text = format!("{value}");
        if !buf.grow(text.len()) {
            return Err(Error::BufferFull);
        }
        buf.write_bytes(text.as_bytes());
        Ok(())
    }

    fn write_str(&mut self, buf: &mut B, value: &str) -> Result<()> {
        write_escaped_string(buf, value)
    }

    fn write_bytes(&mut self, buf: &mut B, value: &[u8]) -> Result<()> {
        let text = core::str::from_utf8(value).map_err(|_| Error::InvalidValue)?;
        write_escaped_string(buf, text)
    }

    fn begin_array(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(b'[');
        Ok(())
    }

    fn end_array(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(b']');
        Ok(())
    }

    fn begin_object(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(b'{');
        Ok(())
    }

    fn end_object(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(b'}');
        Ok(())
    }

    fn begin_record(&mut self, buf: &mut B) -> Result<()> {
        self.begin_object(buf)
    }

    fn end_record(&mut self, buf: &mut B) -> Result<()> {
        self.end_object(buf)
    }

    fn begin_assoc_array(&mut self, buf: &mut B) -> Result<()> {
        self.begin_object(buf)
    }

    fn end_assoc_array(&mut self, buf: &mut B) -> Result<()> {
        self.end_object(buf)
    }

    fn name_separator(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(b':');
        Ok(())
    }

    fn value_separator(&mut self, buf: &mut B) -> Result<()> {
        if !buf.grow(1) {
            return Err(Error::BufferFull);
        }
        buf.write_byte(b',');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;

    #[test]
    fn escapes_control_and_reserved_characters() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = JsonEncoder::new();
        enc.write_str(&mut buf, "a\"\\\n\x01b").unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\"a\\\"\\\\\\n\\u0001b\""
        );
    }

    #[test]
    fn rejects_non_finite_floats() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = JsonEncoder::new();
        assert_eq!(
            enc.write_f64(&mut buf, f64::NAN),
            Err(Error::InvalidValue)
        );
    }

    #[test]
    fn renders_scalars() {
        let mut buf = String::new();
        let mut enc = JsonEncoder::new();
        enc.write_null(&mut buf).unwrap();
        enc.value_separator(&mut buf).unwrap();
        enc.write_bool(&mut buf, true).unwrap();
        enc.value_separator(&mut buf).unwrap();
        enc.write_i64(&mut buf, -7).unwrap();
        assert_eq!(buf, "null,true,-7");
    }
}
