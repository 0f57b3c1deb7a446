//! Incremental, token-oriented codecs for JSON (RFC 7159) and a compact
//! binary tagged format (bintoken), sharing one token taxonomy, one
//! tree-aware reader/writer layer, and one polymorphic value type.
//!
//! - [`token`] — the `Code`/`Symbol`/`Category` taxonomy every decoder,
//!   encoder, reader and writer in this crate speaks.
//! - [`decoder`]/[`encoder`] — the pull/push traits a format plugs into.
//! - [`json`] and [`bintoken`] — the two concrete formats. `bintoken` is
//!   generic over `bintoken::CodeTable`, which is also how the transenc
//!   code space (referenced, not separately implemented, by the design this
//!   crate follows) gets its own decoder/encoder without a second scanner.
//! - [`reader`]/[`writer`] — scope-tracking layers over any decoder/encoder.
//! - [`variable`] — `Variable`, an owned tree wide enough to hold anything
//!   either format can carry.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod bintoken;
pub mod buffer;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod reader;
pub mod token;
pub mod variable;
pub mod writer;

pub use buffer::Buffer;
pub use decoder::{DecodeInt, DecodeValue, Decoder};
pub use encoder::Encoder;
pub use error::{Error, Result, SyntaxErrorKind};
pub use reader::Reader;
pub use token::{Category, Code, Symbol};
pub use variable::{FromVariable, OrderedMap, Variable, Visitor, VisitorMut};
pub use writer::Writer;
