//! The shared encoder contract implemented by [`crate::json::JsonEncoder`]
//! and [`crate::bintoken::BintokenEncoder`].

use crate::buffer::Buffer;
use crate::error::Result;

/// Writes one token at a time into a [`Buffer`].
///
/// Each method corresponds to exactly one [`crate::token::Code`] (or, for
/// the `*_separator` methods, a structural no-op on formats that don't need
/// one). A format that has no concept of a given token — e.g. JSON has no
/// distinct "record" syntax — still implements the method, rendering it the
/// way that format represents the closest concept (JSON renders both
/// `Record` and `AssocArray` as a plain object).
pub trait Encoder<B: Buffer> {
    /// Writes a `null` scalar.
    fn write_null(&mut self, buf: &mut B) -> Result<()>;
    /// Writes a boolean scalar.
    fn write_bool(&mut self, buf: &mut B, value: bool) -> Result<()>;
    /// Writes a signed integer scalar.
    fn write_i64(&mut self, buf: &mut B, value: i64) -> Result<()>;
    /// Writes an unsigned integer scalar.
    fn write_u64(&mut self, buf: &mut B, value: u64) -> Result<()>;
    /// Writes a floating-point scalar.
    fn write_f64(&mut self, buf: &mut B, value: f64) -> Result<()>;
    /// Writes a UTF-8 string scalar.
    fn write_str(&mut self, buf: &mut B, value: &str) -> Result<()>;
    /// Writes a raw byte-string scalar.
    fn write_bytes(&mut self, buf: &mut B, value: &[u8]) -> Result<()>;

    /// Opens an array scope.
    fn begin_array(&mut self, buf: &mut B) -> Result<()>;
    /// Closes the innermost array scope.
    fn end_array(&mut self, buf: &mut B) -> Result<()>;
    /// Opens an object scope (string keys, heterogeneous values).
    fn begin_object(&mut self, buf: &mut B) -> Result<()>;
    /// Closes the innermost object scope.
    fn end_object(&mut self, buf: &mut B) -> Result<()>;
    /// Opens a record scope (fixed, ordered fields).
    fn begin_record(&mut self, buf: &mut B) -> Result<()>;
    /// Closes the innermost record scope.
    fn end_record(&mut self, buf: &mut B) -> Result<()>;
    /// Opens an associative-array scope (non-string keys allowed).
    fn begin_assoc_array(&mut self, buf: &mut B) -> Result<()>;
    /// Closes the innermost associative-array scope.
    fn end_assoc_array(&mut self, buf: &mut B) -> Result<()>;

    /// Between a key and its value. A no-op for formats with no textual
    /// separator (bintoken).
    fn name_separator(&mut self, buf: &mut B) -> Result<()>;
    /// Between two elements of the same scope. A no-op for formats with no
    /// textual separator (bintoken).
    fn value_separator(&mut self, buf: &mut B) -> Result<()>;
}
