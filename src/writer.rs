//! [`Writer`]: a tree-aware layer over any [`Encoder`], inserting the right
//! separators and catching structural misuse before it reaches the wire.
//!
//! Grounded on the same teacher `parser`/event-builder shape [`crate::reader`]
//! is, run in reverse: instead of validating a stream of tokens that already
//! exists, it validates a stream of calls as they arrive and only then
//! forwards them to the wrapped [`Encoder`].

use alloc::vec::Vec;

use crate::buffer::Buffer;
use crate::encoder::Encoder;
use crate::error::{Error, Result};

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
    emitted_any: bool,
}

/// A tree-aware cursor over a token sink.
///
/// Wraps an [`Encoder`] and a [`Buffer`], tracking the same four container
/// kinds [`crate::reader::Reader`] does so that separators
/// (`name_separator`/`value_separator`) are inserted automatically and a
/// structurally illegal call — a non-string key, a mismatched `end_*` —
/// fails before any bytes for that call are written.
pub struct Writer<E, B> {
    encoder: E,
    buffer: B,
    stack: Vec<Frame>,
}

impl<B: Buffer, E: Encoder<B>> Writer<E, B> {
    /// Wraps `encoder`/`buffer` in a fresh writer with no scopes open.
    pub fn new(encoder: E, buffer: B) -> Self {
        Self {
            encoder,
            buffer,
            stack: Vec::new(),
        }
    }

    /// The buffer written so far.
    #[must_use]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Consumes the writer, discarding any open-scope check `finish` would
    /// have performed.
    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// The number of scopes currently open.
    #[must_use]
    pub fn level(&self) -> usize {
        self.stack.len()
    }

    /// `true` if the current slot is a key position inside an object/
    /// assoc_array scope.
    fn expects_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(frame)
                if matches!(frame.kind, ScopeKind::Object | ScopeKind::AssocArray)
                    && frame.expect == Expect::Key
        )
    }

    /// Writes whichever separator belongs before the next item, given
    /// whether that item is occupying a key slot.
    fn write_separator(&mut self, is_key: bool) -> Result<()> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        match frame.kind {
            ScopeKind::Object | ScopeKind::AssocArray => {
                if is_key {
                    if frame.emitted_any {
                        self.encoder.value_separator(&mut self.buffer)?;
                    }
                } else {
                    self.encoder.name_separator(&mut self.buffer)?;
                }
            }
            ScopeKind::Array | ScopeKind::Record => {
                if frame.emitted_any {
                    self.encoder.value_separator(&mut self.buffer)?;
                }
            }
        }
        Ok(())
    }

    /// Advances the alternation/emitted-count bookkeeping for the frame a
    /// just-written item belongs to.
    fn advance_slot(&mut self, was_key: bool) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        match frame.kind {
            ScopeKind::Object | ScopeKind::AssocArray => {
                if was_key {
                    frame.expect = Expect::Value;
                } else {
                    frame.expect = Expect::Key;
                    frame.emitted_any = true;
                }
            }
            ScopeKind::Array | ScopeKind::Record => {
                frame.emitted_any = true;
            }
        }
    }

    /// Writes a scalar that can never legally occupy a key slot (every
    /// scalar but a string).
    fn write_scalar(
        &mut self,
        write: impl FnOnce(&mut E, &mut B) -> Result<()>,
    ) -> Result<()> {
        if self.expects_key() {
            return Err(Error::InvalidKey);
        }
        self.write_separator(false)?;
        write(&mut self.encoder, &mut self.buffer)?;
        self.advance_slot(false);
        Ok(())
    }

    /// Writes a `null` value.
    pub fn value_null(&mut self) -> Result<()> {
        self.write_scalar(|e, b| e.write_null(b))
    }

    /// Writes a boolean value.
    pub fn value_bool(&mut self, value: bool) -> Result<()> {
        self.write_scalar(|e, b| e.write_bool(b, value))
    }

    /// Writes a signed integer value.
    pub fn value_i64(&mut self, value: i64) -> Result<()> {
        self.write_scalar(|e, b| e.write_i64(b, value))
    }

    /// Writes an unsigned integer value.
    pub fn value_u64(&mut self, value: u64) -> Result<()> {
        self.write_scalar(|e, b| e.write_u64(b, value))
    }

    /// Writes a floating-point value.
    pub fn value_f64(&mut self, value: f64) -> Result<()> {
        self.write_scalar(|e, b| e.write_f64(b, value))
    }

    /// Writes a string. Unlike the other scalar writers, a string may
    /// legally occupy a key slot.
    pub fn value_str(&mut self, value: &str) -> Result<()> {
        let is_key = self.expects_key();
        self.write_separator(is_key)?;
        self.encoder.write_str(&mut self.buffer, value)?;
        self.advance_slot(is_key);
        Ok(())
    }

    /// Writes a raw byte string. Never legal as a key — a key must be a
    /// string the caller already knows is valid UTF-8.
    pub fn value_bytes(&mut self, value: &[u8]) -> Result<()> {
        if self.expects_key() {
            return Err(Error::InvalidKey);
        }
        self.write_separator(false)?;
        self.encoder.write_bytes(&mut self.buffer, value)?;
        self.advance_slot(false);
        Ok(())
    }

    fn begin_scope(&mut self, kind: ScopeKind) -> Result<()> {
        if self.expects_key() {
            return Err(Error::InvalidKey);
        }
        self.write_separator(false)?;
        match kind {
            ScopeKind::Array => self.encoder.begin_array(&mut self.buffer)?,
            ScopeKind::Object => self.encoder.begin_object(&mut self.buffer)?,
            ScopeKind::Record => self.encoder.begin_record(&mut self.buffer)?,
            ScopeKind::AssocArray => self.encoder.begin_assoc_array(&mut self.buffer)?,
        }
        self.advance_slot(false);
        let expect = match kind {
            ScopeKind::Object | ScopeKind::AssocArray => Expect::Key,
            ScopeKind::Array | ScopeKind::Record => Expect::Any,
        };
        self.stack.push(Frame {
            kind,
            expect,
            emitted_any: false,
        });
        Ok(())
    }

    fn end_scope(&mut self, kind: ScopeKind) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.kind == kind => {}
            _ => return Err(Error::UnexpectedToken),
        }
        self.stack.pop();
        match kind {
            ScopeKind::Array => self.encoder.end_array(&mut self.buffer)?,
            ScopeKind::Object => self.encoder.end_object(&mut self.buffer)?,
            ScopeKind::Record => self.encoder.end_record(&mut self.buffer)?,
            ScopeKind::AssocArray => self.encoder.end_assoc_array(&mut self.buffer)?,
        }
        self.advance_slot(false);
        Ok(())
    }

    /// Opens an array scope.
    pub fn begin_array(&mut self) -> Result<()> {
        self.begin_scope(ScopeKind::Array)
    }

    /// Closes the innermost array scope.
    pub fn end_array(&mut self) -> Result<()> {
        self.end_scope(ScopeKind::Array)
    }

    /// Opens an object scope; the next value written must occupy a key slot.
    pub fn begin_object(&mut self) -> Result<()> {
        self.begin_scope(ScopeKind::Object)
    }

    /// Closes the innermost object scope.
    pub fn end_object(&mut self) -> Result<()> {
        self.end_scope(ScopeKind::Object)
    }

    /// Opens a record scope.
    pub fn begin_record(&mut self) -> Result<()> {
        self.begin_scope(ScopeKind::Record)
    }

    /// Closes the innermost record scope.
    pub fn end_record(&mut self) -> Result<()> {
        self.end_scope(ScopeKind::Record)
    }

    /// Opens an assoc_array scope; the next value written must occupy a key
    /// slot.
    pub fn begin_assoc_array(&mut self) -> Result<()> {
        self.begin_scope(ScopeKind::AssocArray)
    }

    /// Closes the innermost assoc_array scope.
    pub fn end_assoc_array(&mut self) -> Result<()> {
        self.end_scope(ScopeKind::AssocArray)
    }

    /// Consumes the writer, failing if any scope was left open.
    pub fn finish(self) -> Result<B> {
        if !self.stack.is_empty() {
            return Err(Error::UnexpectedToken);
        }
        Ok(self.buffer)
    }
}

impl<B: Buffer, C: crate::bintoken::CodeTable> Writer<crate::bintoken::BintokenEncoder<C>, B> {
    /// Writes a homogeneous compact array, a bintoken-specific extension
    /// with no JSON equivalent (see
    /// [`crate::bintoken::BintokenEncoder::write_compact_array`]).
    pub fn value_compact_array<T: crate::bintoken::CompactElem>(
        &mut self,
        values: &[T],
    ) -> Result<()> {
        if self.expects_key() {
            return Err(Error::InvalidKey);
        }
        self.write_separator(false)?;
        self.encoder.write_compact_array(&mut self.buffer, values)?;
        self.advance_slot(false);
        Ok(())
    }
}
