//! Pluggable write sinks for encoders.
//!
//! Mirrors the reference design's `buffer` capability set — `grow`,
//! `write_byte`, `write_bytes` — the way the teacher crate's own `Buffer`
//! abstracts over its three internal representations, except here the
//! abstraction faces outward (a `Buffer` is a write sink for an encoder, not
//! a read-side ring of unconsumed input).
#![allow(clippy::inline_always)]

use alloc::{string::String, vec::Vec};

/// A growable write sink. Adapters exist for a fixed-capacity byte array, a
/// `Vec<u8>`, a `String` (used directly by the JSON encoder, which only ever
/// writes valid UTF-8), and, behind the `std` feature, any
/// [`std::io::Write`].
///
/// `grow` is advisory: encoders call it before writing a multi-byte payload
/// so that a buffer with a hard capacity ceiling (e.g. [`FixedBuffer`]) can
/// refuse before any bytes are written, keeping `Writer`'s "no partial
/// tokens" guarantee (see the crate's concurrency & resource model notes).
pub trait Buffer {
    /// Reserve room for `delta` additional bytes. Returns `false` if the
    /// buffer cannot be extended; callers must not write after a `false`.
    fn grow(&mut self, delta: usize) -> bool;

    /// Appends a single byte. Only called after a successful `grow`.
    fn write_byte(&mut self, byte: u8);

    /// Appends a byte slice. Only called after a successful `grow`.
    fn write_bytes(&mut self, bytes: &[u8]);
}

impl Buffer for Vec<u8> {
    #[inline(always)]
    fn grow(&mut self, delta: usize) -> bool {
        self.reserve(delta);
        true
    }

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl Buffer for String {
    #[inline(always)]
    fn grow(&mut self, delta: usize) -> bool {
        self.reserve(delta);
        true
    }

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) {
        debug_assert!(byte.is_ascii(), "String buffer requires ASCII bytes");
        self.push(byte as char);
    }

    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.push_str(core::str::from_utf8(bytes).expect("String buffer requires valid UTF-8"));
    }
}

/// A write sink backed by a caller-provided, fixed-capacity byte array.
///
/// `grow` refuses once the remaining capacity can't fit the requested
/// delta, matching the reference design's note that a fixed-capacity
/// adapter is the one that can actually fail.
#[derive(Debug)]
pub struct FixedBuffer<'a> {
    data: &'a mut [u8],
    len: usize,
}

impl<'a> FixedBuffer<'a> {
    /// Wraps `data` as an empty buffer with capacity `data.len()`.
    #[must_use]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, len: 0 }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl Buffer for FixedBuffer<'_> {
    fn grow(&mut self, delta: usize) -> bool {
        self.len + delta <= self.data.len()
    }

    fn write_byte(&mut self, byte: u8) {
        self.data[self.len] = byte;
        self.len += 1;
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }
}

#[cfg(feature = "std")]
mod io_adapter {
    use std::io::Write;

    use super::Buffer;

    /// Adapts any [`std::io::Write`] into a [`Buffer`]. `grow` always
    /// succeeds — a stream has no fixed capacity to reject up front — and a
    /// failed `write_all` is swallowed into a no-op, matching the trait's
    /// infallible signature; callers that need I/O error detail should use
    /// the underlying writer directly rather than through this adapter.
    pub struct IoBuffer<W: Write> {
        inner: W,
    }

    impl<W: Write> IoBuffer<W> {
        /// Wraps `inner` as a [`Buffer`].
        pub fn new(inner: W) -> Self {
            Self { inner }
        }

        /// Unwraps the underlying writer.
        pub fn into_inner(self) -> W {
            self.inner
        }
    }

    impl<W: Write> Buffer for IoBuffer<W> {
        fn grow(&mut self, _delta: usize) -> bool {
            true
        }

        fn write_byte(&mut self, byte: u8) {
            let _ = self.inner.write_all(&[byte]);
        }

        fn write_bytes(&mut self, bytes: &[u8]) {
            let _ = self.inner.write_all(bytes);
        }
    }
}

#[cfg(feature = "std")]
pub use io_adapter::IoBuffer;

#[cfg(test)]
mod tests {
    use super::{Buffer, FixedBuffer};

    #[test]
    fn vec_buffer_grows_unconditionally() {
        let mut buf: alloc::vec::Vec<u8> = alloc::vec::Vec::new();
        assert!(buf.grow(1024));
        buf.write_bytes(b"hello");
        buf.write_byte(b'!');
        assert_eq!(buf, b"hello!");
    }

    #[test]
    fn string_buffer_round_trips_ascii() {
        let mut buf = alloc::string::String::new();
        assert!(buf.grow(4));
        buf.write_bytes(b"abc");
        buf.write_byte(b'd');
        assert_eq!(buf, "abcd");
    }

    #[test]
    fn fixed_buffer_refuses_past_capacity() {
        let mut backing = [0u8; 4];
        let mut buf = FixedBuffer::new(&mut backing);
        assert!(buf.grow(4));
        buf.write_bytes(b"abcd");
        assert!(!buf.grow(1));
        assert_eq!(buf.as_slice(), b"abcd");
    }
}
