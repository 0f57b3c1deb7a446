//! The token taxonomy shared by every decoder, encoder, reader and writer.
//!
//! A [`Code`] is the exact identity of one token, including every error
//! condition a decoder can land in. [`Symbol`] and [`Category`] are coarser
//! projections of [`Code`] used by callers that only care about the broad
//! shape of the current token (is it data? structural? a terminal status?).

/// The exact identity of a token produced by a decoder.
///
/// Error conditions are themselves codes: a decoder that hits malformed
/// input transitions `code()` to the matching `Error*` variant and becomes
/// sticky (see the `decoder` modules for the exact sticky-error contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Code {
    // -- null / keyword --
    Null,
    True,
    False,

    // -- numbers --
    /// A JSON integer literal (no `.` or exponent).
    Integer,
    /// A JSON floating-point literal (`.` and/or exponent present).
    Floating,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,

    // -- strings --
    /// A JSON string literal, quotes included in the literal slice.
    String,
    String8,
    String16,
    String32,
    String64,

    // -- structural --
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    BeginRecord,
    EndRecord,
    BeginAssocArray,
    EndAssocArray,
    NameSeparator,
    ValueSeparator,

    // -- compact arrays (bintoken) --
    Array8Int8,
    Array8Int16,
    Array8Int32,
    Array8Int64,
    Array8Float32,
    Array8Float64,
    Array16Int8,
    Array16Int16,
    Array16Int32,
    Array16Int64,
    Array16Float32,
    Array16Float64,
    Array32Int8,
    Array32Int16,
    Array32Int32,
    Array32Int64,
    Array32Float32,
    Array32Float64,
    Array64Int8,
    Array64Int16,
    Array64Int32,
    Array64Int64,
    Array64Float32,
    Array64Float64,

    // -- status --
    /// Input exhausted cleanly at a token boundary.
    End,
    ErrorUnexpectedToken,
    ErrorInvalidKey,
    ErrorInvalidValue,
    ErrorIncompatibleType,
    ErrorOverflow,
    ErrorNegativeLength,
    ErrorUnbalancedEndArray,
    ErrorUnbalancedEndObject,
    ErrorExpectedEndArray,
    ErrorExpectedEndObject,
    ErrorExpectedEndRecord,
    ErrorExpectedEndAssocArray,
    ErrorUnknownToken,
}

/// Coarse dispatch category of a [`Code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Data,
    Structural,
    Status,
}

/// Coarse symbol classification of a [`Code`], one step finer than
/// [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Data,
    Separator,
    BeginScope,
    EndScope,
    End,
    Error,
}

impl Code {
    /// `true` if this code is one of the `Error*` variants.
    #[must_use]
    pub fn is_error(self) -> bool {
        self.symbol() == Symbol::Error
    }

    /// `true` if this code opens a scope (`Begin*`).
    #[must_use]
    pub fn is_begin_scope(self) -> bool {
        self.symbol() == Symbol::BeginScope
    }

    /// `true` if this code closes a scope (`End*`).
    #[must_use]
    pub fn is_end_scope(self) -> bool {
        self.symbol() == Symbol::EndScope
    }

    /// `true` if this code carries a convertible scalar/string literal.
    #[must_use]
    pub fn is_data(self) -> bool {
        self.category() == Category::Data
    }

    /// The coarse [`Category`] this code falls under.
    #[must_use]
    pub fn category(self) -> Category {
        use Code::{
            Array16Float32, Array16Float64, Array16Int16, Array16Int32, Array16Int64,
            Array16Int8, Array32Float32, Array32Float64, Array32Int16, Array32Int32,
            Array32Int64, Array32Int8, Array64Float32, Array64Float64, Array64Int16,
            Array64Int32, Array64Int64, Array64Int8, Array8Float32, Array8Float64, Array8Int16,
            Array8Int32, Array8Int64, Array8Int8, BeginArray, BeginAssocArray, BeginObject,
            BeginRecord, End, EndArray, EndAssocArray, EndObject, EndRecord, ErrorExpectedEndArray,
            ErrorExpectedEndAssocArray, ErrorExpectedEndObject, ErrorExpectedEndRecord,
            ErrorIncompatibleType, ErrorInvalidKey, ErrorInvalidValue, ErrorNegativeLength,
            ErrorOverflow, ErrorUnbalancedEndArray, ErrorUnbalancedEndObject, ErrorUnexpectedToken,
            ErrorUnknownToken, False, Float32, Float64, Floating, Int16, Int32, Int64, Int8,
            Integer, NameSeparator, Null, String, String16, String32, String64, String8, True,
            ValueSeparator,
        };
        match self {
            Null | True | False | Integer | Floating | Int8 | Int16 | Int32 | Int64 | Float32
            | Float64 | String | String8 | String16 | String32 | String64 | Array8Int8
            | Array8Int16 | Array8Int32 | Array8Int64 | Array8Float32 | Array8Float64
            | Array16Int8 | Array16Int16 | Array16Int32 | Array16Int64 | Array16Float32
            | Array16Float64 | Array32Int8 | Array32Int16 | Array32Int32 | Array32Int64
            | Array32Float32 | Array32Float64 | Array64Int8 | Array64Int16 | Array64Int32
            | Array64Int64 | Array64Float32 | Array64Float64 => Category::Data,

            BeginArray | EndArray | BeginObject | EndObject | BeginRecord | EndRecord
            | BeginAssocArray | EndAssocArray | NameSeparator | ValueSeparator => {
                Category::Structural
            }

            End
            | ErrorUnexpectedToken
            | ErrorInvalidKey
            | ErrorInvalidValue
            | ErrorIncompatibleType
            | ErrorOverflow
            | ErrorNegativeLength
            | ErrorUnbalancedEndArray
            | ErrorUnbalancedEndObject
            | ErrorExpectedEndArray
            | ErrorExpectedEndObject
            | ErrorExpectedEndRecord
            | ErrorExpectedEndAssocArray
            | ErrorUnknownToken => Category::Status,
        }
    }

    /// The finer [`Symbol`] classification this code falls under.
    #[must_use]
    pub fn symbol(self) -> Symbol {
        match self.category() {
            Category::Data => Symbol::Data,
            Category::Structural => match self {
                Code::NameSeparator | Code::ValueSeparator => Symbol::Separator,
                Code::BeginArray | Code::BeginObject | Code::BeginRecord | Code::BeginAssocArray => {
                    Symbol::BeginScope
                }
                Code::EndArray | Code::EndObject | Code::EndRecord | Code::EndAssocArray => {
                    Symbol::EndScope
                }
                _ => unreachable!("structural code not covered above"),
            },
            Category::Status => {
                if self == Code::End {
                    Symbol::End
                } else {
                    Symbol::Error
                }
            }
        }
    }
}
