//! The shared decoder contract implemented by [`crate::json::JsonDecoder`]
//! and [`crate::bintoken::BintokenDecoder`], plus the `value::<T>()`
//! conversion machinery layered over it.

use crate::token::Code;

/// A token-at-a-time scanner over an already-materialized input slice.
///
/// Implementors pre-read one token at construction time and advance exactly
/// one token per [`Decoder::advance`] call. Once [`Decoder::code`] reports an
/// error code the decoder is sticky: further `advance` calls are no-ops.
pub trait Decoder<'src> {
    /// The exact code of the current token.
    fn code(&self) -> Code;

    /// The raw source slice backing the current token. Borrowed from the
    /// original input for as long as `'src` is alive.
    fn literal(&self) -> &'src [u8];

    /// Advances to the next token. A no-op once `code()` is an error code.
    fn advance(&mut self);
}

/// Converts the current token of a decoder `D` into `Self`.
///
/// One `impl` exists per `(D, Self)` pair that is a legal conversion (e.g.
/// `i64` from a JSON decoder's `Integer` token, or from a bintoken decoder's
/// `Int8`/`Int16`/`Int32`/`Int64` token). A conversion that doesn't apply to
/// the decoder's current code returns [`crate::error::Error::IncompatibleType`].
pub trait DecodeValue<D>: Sized {
    /// Converts the decoder's current token into `Self`.
    fn decode_value(decoder: &D) -> crate::error::Result<Self>;
}

/// Implemented by every fixed-width integer type `tokenwire` can decode
/// into. Centralizes the checked, range-preserving conversion from the
/// wide accumulator (`i128`) used while scanning digits or little-endian
/// payload bytes, replacing the reference implementation's
/// post-multiplication overflow check (see the crate's design notes).
pub trait DecodeInt: Sized + Copy {
    /// `true` if the type can represent negative values.
    const SIGNED: bool;
    /// Narrows a wide accumulator to `Self`, failing on overflow.
    fn from_i128(v: i128) -> Option<Self>;
}

macro_rules! impl_decode_int {
    ($($t:ty => $signed:expr),+ $(,)?) => {
        $(
            impl DecodeInt for $t {
                const SIGNED: bool = $signed;
                fn from_i128(v: i128) -> Option<Self> {
                    <$t>::try_from(v).ok()
                }
            }
        )+
    };
}

impl_decode_int!(
    i8 => true, i16 => true, i32 => true, i64 => true,
    u8 => false, u16 => false, u32 => false, u64 => false,
);
