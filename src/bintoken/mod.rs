//! The compact binary tagged format (bintoken), plus the transenc code
//! table sharing the same decoder/encoder machinery.

mod codes;
mod decoder;
mod encoder;
mod options;

pub use codes::{BintokenCodes, CodeTable, TransencCodes};
pub use decoder::{BintokenDecoder, CompactElem};
pub use encoder::BintokenEncoder;
pub use options::BintokenOptions;

/// A decoder over the transenc code space, reusing the bintoken scanner
/// generalized over [`CodeTable`].
pub type TransencDecoder<'src> = BintokenDecoder<'src, TransencCodes>;

/// An encoder over the transenc code space.
pub type TransencEncoder = BintokenEncoder<TransencCodes>;
