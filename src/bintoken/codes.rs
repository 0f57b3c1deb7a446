//! Wire tag-byte assignment, expressed as a [`CodeTable`] trait so the
//! bintoken decoder/encoder can be generic over which code space a byte
//! stream uses.
//!
//! `BintokenCodes` is the one concrete table implemented here. `TransencCodes`
//! is kept alongside it, sharing the same assignment, as the seam the design
//! docs anticipate for a textual sibling format that reuses bintoken's code
//! space rather than inventing its own — see the crate's design notes for
//! why this resolves the spec's transenc open question as a generic
//! parameter instead of a second decoder type.

use crate::token::Code;

/// Maps wire tag bytes to/from [`Code`].
///
/// A tag byte absent from both directions of the table is an *inline
/// integer* byte: [`CodeTable::code_for_tag`] returns `None` for it, and the
/// decoder falls back to interpreting the byte itself as a signed 8-bit
/// value.
pub trait CodeTable {
    /// The reserved code a tag byte denotes, or `None` if the byte is an
    /// inline small integer rather than a reserved code.
    fn code_for_tag(tag: u8) -> Option<Code>;

    /// The tag byte a reserved [`Code`] is written as. `None` for codes this
    /// table doesn't support on the wire (e.g. JSON-only separators, or
    /// status/error codes, which never appear in a byte stream).
    fn tag_for_code(code: Code) -> Option<u8>;
}

macro_rules! code_table {
    ($(#[$doc:meta])* $name:ident, [$($tag:literal => $code:ident),+ $(,)?]) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl CodeTable for $name {
            fn code_for_tag(tag: u8) -> Option<Code> {
                match tag {
                    $($tag => Some(Code::$code),)+
                    _ => None,
                }
            }

            fn tag_for_code(code: Code) -> Option<u8> {
                match code {
                    $(Code::$code => Some($tag),)+
                    _ => None,
                }
            }
        }
    };
}

code_table!(
    /// The tag-byte assignment this crate's own `bintoken` format uses.
    BintokenCodes, [
    0x80 => False,
    0x81 => True,
    0x82 => Null,
    0x83 => Int8,
    0x84 => Int16,
    0x85 => Int32,
    0x86 => Int64,
    0x87 => Float32,
    0x88 => Float64,
    0x89 => String8,
    0x8A => String16,
    0x8B => String32,
    0x8C => String64,
    0x8D => BeginRecord,
    0x8E => EndRecord,
    0x8F => BeginAssocArray,
    0x90 => EndAssocArray,
    0x91 => BeginArray,
    0x92 => EndArray,
    0x93 => Array8Int8,
    0x94 => Array8Int16,
    0x95 => Array8Int32,
    0x96 => Array8Int64,
    0x97 => Array8Float32,
    0x98 => Array8Float64,
    0x99 => Array16Int8,
    0x9A => Array16Int16,
    0x9B => Array16Int32,
    0x9C => Array16Int64,
    0x9D => Array16Float32,
    0x9E => Array16Float64,
    0x9F => Array32Int8,
    0xA0 => Array32Int16,
    0xA1 => Array32Int32,
    0xA2 => Array32Int64,
    0xA3 => Array32Float32,
    0xA4 => Array32Float64,
    0xA5 => Array64Int8,
    0xA6 => Array64Int16,
    0xA7 => Array64Int32,
    0xA8 => Array64Int64,
    0xA9 => Array64Float32,
    0xAA => Array64Float64,
]);

code_table!(
    /// The tag-byte assignment shared with the transenc code space.
    TransencCodes, [
    0x80 => False,
    0x81 => True,
    0x82 => Null,
    0x83 => Int8,
    0x84 => Int16,
    0x85 => Int32,
    0x86 => Int64,
    0x87 => Float32,
    0x88 => Float64,
    0x89 => String8,
    0x8A => String16,
    0x8B => String32,
    0x8C => String64,
    0x8D => BeginRecord,
    0x8E => EndRecord,
    0x8F => BeginAssocArray,
    0x90 => EndAssocArray,
    0x91 => BeginArray,
    0x92 => EndArray,
    0x93 => Array8Int8,
    0x94 => Array8Int16,
    0x95 => Array8Int32,
    0x96 => Array8Int64,
    0x97 => Array8Float32,
    0x98 => Array8Float64,
    0x99 => Array16Int8,
    0x9A => Array16Int16,
    0x9B => Array16Int32,
    0x9C => Array16Int64,
    0x9D => Array16Float32,
    0x9E => Array16Float64,
    0x9F => Array32Int8,
    0xA0 => Array32Int16,
    0xA1 => Array32Int32,
    0xA2 => Array32Int64,
    0xA3 => Array32Float32,
    0xA4 => Array32Float64,
    0xA5 => Array64Int8,
    0xA6 => Array64Int16,
    0xA7 => Array64Int32,
    0xA8 => Array64Int64,
    0xA9 => Array64Float32,
    0xAA => Array64Float64,
]);

/// The lowest tag byte reserved by [`BintokenCodes`]/[`TransencCodes`]. Any
/// byte below this (and any byte above the highest reserved tag) is an
/// inline signed-8-bit integer.
pub const FIRST_RESERVED_TAG: u8 = 0x80;
/// The highest tag byte reserved by [`BintokenCodes`]/[`TransencCodes`].
pub const LAST_RESERVED_TAG: u8 = 0xAA;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_reserved_tag() {
        for tag in FIRST_RESERVED_TAG..=LAST_RESERVED_TAG {
            let code = BintokenCodes::code_for_tag(tag).unwrap_or_else(|| {
                panic!("tag {tag:#x} in reserved range must map to a code")
            });
            assert_eq!(BintokenCodes::tag_for_code(code), Some(tag));
        }
    }

    #[test]
    fn byte_outside_reserved_range_is_inline_int() {
        assert_eq!(BintokenCodes::code_for_tag(0x00), None);
        assert_eq!(BintokenCodes::code_for_tag(0x7F), None);
        assert_eq!(BintokenCodes::code_for_tag(0xFF), None);
        assert_eq!(BintokenCodes::code_for_tag(0xAB), None);
    }
}
