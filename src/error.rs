//! Error types shared by every decoder, encoder, reader and writer.
//!
//! Mirrors the teacher crate's split between a narrow syntax error (what
//! went wrong lexically) and a wrapping error that carries position
//! information, except here one top-level [`Error`] also folds in the
//! structural errors raised by [`crate::reader::Reader`] and
//! [`crate::writer::Writer`], since both families share the same
//! [`crate::token::Code`] space.

use thiserror::Error;

use crate::token::Code;

/// Everything that can go wrong decoding, reading, encoding or writing a
/// token stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unexpected token")]
    UnexpectedToken,

    #[error("object key must be a string")]
    InvalidKey,

    #[error("value not legal in this position")]
    InvalidValue,

    #[error("requested type is incompatible with the current token")]
    IncompatibleType,

    #[error("numeric conversion or length check overflowed the target range")]
    Overflow,

    #[error("length prefix decoded to a negative value")]
    NegativeLength,

    #[error("`end_array` does not match the innermost open scope")]
    UnbalancedEndArray,

    #[error("`end_object` does not match the innermost open scope")]
    UnbalancedEndObject,

    #[error("input ended with an array still open")]
    ExpectedEndArray,

    #[error("input ended with an object still open")]
    ExpectedEndObject,

    #[error("input ended with a record still open")]
    ExpectedEndRecord,

    #[error("input ended with an assoc_array still open")]
    ExpectedEndAssocArray,

    #[error("unrecognized token code byte")]
    UnknownToken,

    #[error("buffer could not grow to accept the pending write")]
    BufferFull,

    #[error("decoder is in a sticky error state: {0}")]
    Sticky(SyntaxErrorKind),
}

/// The lexical error a decoder is stuck on, carried by [`Error::Sticky`].
///
/// Kept distinct from [`Error`] so that a reader can report it as a
/// [`Code`] without re-deriving which `Error*` code it maps to; see
/// [`SyntaxErrorKind::code`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("numeric conversion overflowed")]
    Overflow,
    #[error("length prefix decoded to a negative value")]
    NegativeLength,
    #[error("unrecognized token code byte")]
    UnknownToken,
}

impl SyntaxErrorKind {
    /// The [`Code`] a sticky decoder reports while stuck on this error.
    #[must_use]
    pub fn code(self) -> Code {
        match self {
            SyntaxErrorKind::UnexpectedToken => Code::ErrorUnexpectedToken,
            SyntaxErrorKind::Overflow => Code::ErrorOverflow,
            SyntaxErrorKind::NegativeLength => Code::ErrorNegativeLength,
            SyntaxErrorKind::UnknownToken => Code::ErrorUnknownToken,
        }
    }

    /// The inverse of [`SyntaxErrorKind::code`]: recovers the lexical error
    /// kind a sticky decoder's `Error*` code represents, or `None` for a
    /// code this crate's decoders never raise as a lexical failure (e.g. the
    /// structural codes [`crate::reader::Reader`] raises on its own).
    #[must_use]
    pub fn from_code(code: Code) -> Option<Self> {
        match code {
            Code::ErrorUnexpectedToken => Some(Self::UnexpectedToken),
            Code::ErrorOverflow => Some(Self::Overflow),
            Code::ErrorNegativeLength => Some(Self::NegativeLength),
            Code::ErrorUnknownToken => Some(Self::UnknownToken),
            _ => None,
        }
    }
}

impl Error {
    /// Maps a structural/value error back to the [`Code`] a sticky reader or
    /// decoder would report for it, per the "errors are carried in band"
    /// propagation policy.
    #[must_use]
    pub fn as_code(&self) -> Code {
        match self {
            Error::UnexpectedToken => Code::ErrorUnexpectedToken,
            Error::InvalidKey => Code::ErrorInvalidKey,
            Error::InvalidValue => Code::ErrorInvalidValue,
            Error::IncompatibleType => Code::ErrorIncompatibleType,
            Error::Overflow => Code::ErrorOverflow,
            Error::NegativeLength => Code::ErrorNegativeLength,
            Error::UnbalancedEndArray => Code::ErrorUnbalancedEndArray,
            Error::UnbalancedEndObject => Code::ErrorUnbalancedEndObject,
            Error::ExpectedEndArray => Code::ErrorExpectedEndArray,
            Error::ExpectedEndObject => Code::ErrorExpectedEndObject,
            Error::ExpectedEndRecord => Code::ErrorExpectedEndRecord,
            Error::ExpectedEndAssocArray => Code::ErrorExpectedEndAssocArray,
            Error::UnknownToken => Code::ErrorUnknownToken,
            Error::BufferFull => Code::ErrorUnexpectedToken,
            Error::Sticky(kind) => kind.code(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
