//! Cross-module property and end-to-end tests, run against the public API
//! the way an external crate would use it.
//!
//! Grounded on the teacher crate's `tests/` quickcheck property style
//! (`src/tests/property_partition.rs`), adapted to this crate's token/reader/
//! writer/variable surface instead of the teacher's streaming `ParseEvent`s.

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use tokenwire::bintoken::{BintokenCodes, BintokenDecoder};
use tokenwire::json::{JsonDecoder, JsonEncoder, JsonOptions};
use tokenwire::{Code, Error, OrderedMap, Reader, Variable, Writer};

/// Copies one reader position onto a writer, driving both through the same
/// code. Used by the round-trip property: it never builds an intermediate
/// `Variable` tree, matching the "structural-preserving traversal that
/// copies each token" the round-trip invariant calls for.
fn copy_token<'src, D, E, B>(reader: &Reader<D>, writer: &mut Writer<E, B>) -> tokenwire::Result<()>
where
    D: tokenwire::Decoder<'src>,
    E: tokenwire::Encoder<B>,
    B: tokenwire::Buffer,
{
    match reader.code() {
        Code::Null => writer.value_null(),
        Code::True => writer.value_bool(true),
        Code::False => writer.value_bool(false),
        Code::Integer => writer.value_i64(reader.value::<i64>()?),
        Code::Floating => writer.value_f64(reader.value::<f64>()?),
        Code::String => writer.value_str(&reader.value::<String>()?),
        Code::BeginArray => writer.begin_array(),
        Code::EndArray => writer.end_array(),
        Code::BeginObject => writer.begin_object(),
        Code::EndObject => writer.end_object(),
        other => panic!("copy_token called on an unsupported code: {other:?}"),
    }
}

fn round_trip_json(input: &str) -> bool {
    let mut reader = Reader::new(JsonDecoder::new(input, JsonOptions::default()));
    if reader.code().is_error() {
        return true;
    }
    let mut writer = Writer::new(JsonEncoder::new(), String::new());
    loop {
        if copy_token(&reader, &mut writer).is_err() {
            return true;
        }
        if !reader.next() {
            break;
        }
    }
    if reader.code() != Code::End {
        return true;
    }
    let Ok(out) = writer.finish() else {
        return true;
    };
    // re-parse both sides into a loose structural shape and compare, since
    // whitespace/number formatting are explicitly not preserved byte-exact.
    serde_json::from_str::<serde_json::Value>(input).ok()
        == serde_json::from_str::<serde_json::Value>(&out).ok()
}

#[test]
fn json_round_trip_quickcheck() {
    #[derive(Debug, Clone)]
    struct SimpleJson(String);

    // Kept to a plain alphabet so the generated text never needs a JSON
    // escape; the escaping logic itself is exercised separately by
    // `json::decoder`'s and `json::escape`'s own unit tests.
    const ALPHABET: &[char] = &[
        'a', 'b', 'c', 'd', 'e', 'A', 'B', 'C', '0', '1', '2', ' ', '_',
    ];

    fn gen_string_literal(g: &mut Gen) -> String {
        let len = usize::arbitrary(g) % 6;
        let body: String = (0..len)
            .map(|_| ALPHABET[usize::arbitrary(g) % ALPHABET.len()])
            .collect();
        format!("\"{body}\"")
    }

    fn gen_value(g: &mut Gen, depth: u8) -> String {
        if depth == 0 {
            match u8::arbitrary(g) % 4 {
                0 => "null".into(),
                1 => "true".into(),
                2 => i32::arbitrary(g).to_string(),
                _ => gen_string_literal(g),
            }
        } else {
            match u8::arbitrary(g) % 6 {
                0 => "null".into(),
                1 => "false".into(),
                2 => i32::arbitrary(g).to_string(),
                3 => gen_string_literal(g),
                4 => {
                    let len = usize::arbitrary(g) % 4;
                    let items: Vec<String> =
                        (0..len).map(|_| gen_value(g, depth - 1)).collect();
                    format!("[{}]", items.join(","))
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let items: Vec<String> = (0..len)
                        .map(|i| format!("\"k{i}\":{}", gen_value(g, depth - 1)))
                        .collect();
                    format!("{{{}}}", items.join(","))
                }
            }
        }
    }

    impl Arbitrary for SimpleJson {
        fn arbitrary(g: &mut Gen) -> Self {
            SimpleJson(gen_value(g, 3))
        }
    }

    fn prop(doc: SimpleJson) -> bool {
        round_trip_json(&doc.0)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(SimpleJson) -> bool);
}

#[test]
fn reader_always_terminates_on_arbitrary_text() {
    fn prop(input: String) -> TestResult {
        let mut reader = Reader::new(JsonDecoder::new(&input, JsonOptions::default()));
        let mut steps = 0usize;
        // A real decoder has no more tokens than bytes of input; bail out
        // well past that if `next()` somehow never reaches a terminal code.
        let budget = input.len() * 4 + 16;
        loop {
            if reader.code() == Code::End || reader.code().is_error() {
                return TestResult::from_bool(true);
            }
            if steps > budget {
                return TestResult::from_bool(false);
            }
            if !reader.next() {
                return TestResult::from_bool(
                    reader.code() == Code::End || reader.code().is_error(),
                );
            }
            steps += 1;
        }
    }

    QuickCheck::new()
        .tests(2_000)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn integer_value_matches_range_or_reports_overflow() {
    fn prop(value: i64) -> bool {
        let text = value.to_string();
        let reader = Reader::new(JsonDecoder::new(&text, JsonOptions::default()));
        assert_eq!(reader.code(), Code::Integer);
        match reader.value::<i32>() {
            Ok(decoded) => i64::from(decoded) == value,
            Err(Error::Overflow) => i32::try_from(value).is_err(),
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(2_000)
        .quickcheck(prop as fn(i64) -> bool);
}

#[test]
fn level_returns_to_zero_at_matching_outermost_close() {
    fn prop(depth: u8) -> bool {
        let depth = usize::from(depth % 12);
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let mut reader = Reader::new(JsonDecoder::new(&text, JsonOptions::default()));
        let mut saw_nonnegative = true;
        loop {
            // `level()` is a `usize`, so it's non-negative by construction;
            // the check here is that it never panics/wraps past zero.
            let _ = reader.level();
            if !reader.next() {
                break;
            }
        }
        saw_nonnegative &= reader.level() == 0;
        saw_nonnegative
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8) -> bool);
}

#[test]
fn visitor_dispatches_to_the_matching_tag_for_any_generated_variable() {
    #[derive(Debug, Clone)]
    struct AnyScalar(Variable);

    impl Arbitrary for AnyScalar {
        fn arbitrary(g: &mut Gen) -> Self {
            let v = match u8::arbitrary(g) % 16 {
                0 => Variable::Null,
                1 => Variable::Bool(bool::arbitrary(g)),
                2 => Variable::I8(i8::arbitrary(g)),
                3 => Variable::U8(u8::arbitrary(g)),
                4 => Variable::I16(i16::arbitrary(g)),
                5 => Variable::U16(u16::arbitrary(g)),
                6 => Variable::I32(i32::arbitrary(g)),
                7 => Variable::U32(u32::arbitrary(g)),
                8 => Variable::I64(i64::arbitrary(g)),
                9 => Variable::U64(u64::arbitrary(g)),
                10 => Variable::F32(f32::arbitrary(g)),
                11 => Variable::F64(f64::arbitrary(g)),
                12 => Variable::F64Ext(f64::arbitrary(g)),
                13 => Variable::Str(String::arbitrary(g)),
                14 => Variable::Array(vec![Variable::Null]),
                _ => Variable::Map(OrderedMap::new()),
            };
            AnyScalar(v)
        }
    }

    struct Tag;
    impl tokenwire::Visitor for Tag {
        type Output = &'static str;
        fn visit_null(&mut self) -> &'static str {
            "null"
        }
        fn visit_bool(&mut self, _: bool) -> &'static str {
            "bool"
        }
        fn visit_i8(&mut self, _: i8) -> &'static str {
            "i8"
        }
        fn visit_u8(&mut self, _: u8) -> &'static str {
            "u8"
        }
        fn visit_i16(&mut self, _: i16) -> &'static str {
            "i16"
        }
        fn visit_u16(&mut self, _: u16) -> &'static str {
            "u16"
        }
        fn visit_i32(&mut self, _: i32) -> &'static str {
            "i32"
        }
        fn visit_u32(&mut self, _: u32) -> &'static str {
            "u32"
        }
        fn visit_i64(&mut self, _: i64) -> &'static str {
            "i64"
        }
        fn visit_u64(&mut self, _: u64) -> &'static str {
            "u64"
        }
        fn visit_f32(&mut self, _: f32) -> &'static str {
            "f32"
        }
        fn visit_f64(&mut self, _: f64) -> &'static str {
            "f64"
        }
        fn visit_f64_ext(&mut self, _: f64) -> &'static str {
            "f64_ext"
        }
        fn visit_str(&mut self, _: &str) -> &'static str {
            "str"
        }
        fn visit_array(&mut self, _: &[Variable]) -> &'static str {
            "array"
        }
        fn visit_map(&mut self, _: &OrderedMap) -> &'static str {
            "map"
        }
    }

    fn expected_tag(v: &Variable) -> &'static str {
        match v {
            Variable::Null => "null",
            Variable::Bool(_) => "bool",
            Variable::I8(_) => "i8",
            Variable::U8(_) => "u8",
            Variable::I16(_) => "i16",
            Variable::U16(_) => "u16",
            Variable::I32(_) => "i32",
            Variable::U32(_) => "u32",
            Variable::I64(_) => "i64",
            Variable::U64(_) => "u64",
            Variable::F32(_) => "f32",
            Variable::F64(_) => "f64",
            Variable::F64Ext(_) => "f64_ext",
            Variable::Str(_) => "str",
            Variable::Array(_) => "array",
            Variable::Map(_) => "map",
        }
    }

    fn prop(scalar: AnyScalar) -> bool {
        scalar.0.visit(&mut Tag) == expected_tag(&scalar.0)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(AnyScalar) -> bool);
}

// -- concrete end-to-end scenarios --

#[test]
fn json_array_of_literals_round_trips() {
    assert!(round_trip_json("[false,true,null]"));
    let mut reader = Reader::new(JsonDecoder::new("[false,true,null]", JsonOptions::default()));
    let mut codes = vec![reader.code()];
    while reader.next() {
        codes.push(reader.code());
    }
    assert_eq!(
        codes,
        vec![
            Code::BeginArray,
            Code::False,
            Code::True,
            Code::Null,
            Code::EndArray,
        ]
    );
}

#[test]
fn json_object_keys_and_values_decode_through_reader_value() {
    let input = r#"{"name":"ABC","age":127}"#;
    let mut reader = Reader::new(JsonDecoder::new(input, JsonOptions::default()));
    assert_eq!(reader.code(), Code::BeginObject);
    assert!(reader.next());
    assert_eq!(reader.code(), Code::String);
    assert_eq!(reader.value::<String>().unwrap(), "name");
    assert!(reader.next());
    assert_eq!(reader.code(), Code::String);
    assert_eq!(reader.value::<String>().unwrap(), "ABC");
    assert!(reader.next());
    assert_eq!(reader.code(), Code::String);
    assert_eq!(reader.value::<String>().unwrap(), "age");
    assert!(reader.next());
    assert_eq!(reader.code(), Code::Integer);
    assert_eq!(reader.value::<i64>().unwrap(), 127);
    assert!(reader.next());
    assert_eq!(reader.code(), Code::EndObject);
}

#[test]
fn truncated_number_ends_cleanly_rather_than_floating() {
    let mut reader = Reader::new(JsonDecoder::new("[1e]", JsonOptions::default()));
    assert!(reader.next());
    assert_ne!(reader.code(), Code::Floating);
}

#[test]
fn bintoken_flat_bool_array_decodes() {
    let bytes = [0x91u8, 0x80, 0x81, 0x80, 0x81, 0x92];
    let mut reader = Reader::new(BintokenDecoder::<BintokenCodes>::new(&bytes));
    assert_eq!(reader.code(), Code::BeginArray);
    let mut values = Vec::new();
    while reader.next() && reader.code() != Code::EndArray {
        values.push(reader.value::<bool>().unwrap());
    }
    assert_eq!(values, vec![false, true, false, true]);
}

#[test]
fn bintoken_compact_array_into_fixed_size_slice() {
    let bytes = [
        0x94u8, 8, 0x01, 0x11, 0x02, 0x12, 0x03, 0x13, 0x04, 0x14,
    ];
    let reader = Reader::new(BintokenDecoder::<BintokenCodes>::new(&bytes));
    let values: [i16; 4] = reader.value().unwrap();
    assert_eq!(values, [0x1101, 0x1202, 0x1303, 0x1404]);
    assert_eq!(
        reader.value::<[i16; 3]>(),
        Err(Error::IncompatibleType)
    );
    assert_eq!(
        reader.value::<[i16; 5]>(),
        Err(Error::IncompatibleType)
    );
}

#[test]
fn bintoken_record_decodes_as_pair() {
    let bytes = [
        0x8Du8, 0x89, 3, b'A', b'B', b'C', 0x84, 0x7F, 0x00, 0x8E,
    ];
    let mut reader = Reader::new(BintokenDecoder::<BintokenCodes>::new(&bytes));
    assert_eq!(reader.code(), Code::BeginRecord);
    assert!(reader.next());
    let name = reader.value::<String>().unwrap();
    assert!(reader.next());
    let age = reader.value::<i64>().unwrap();
    assert_eq!((name.as_str(), age), ("ABC", 127));
    assert!(reader.next());
    assert_eq!(reader.code(), Code::EndRecord);

    let truncated = &bytes[..bytes.len() - 1];
    let mut reader = Reader::new(BintokenDecoder::<BintokenCodes>::new(truncated));
    assert!(reader.next());
    assert!(reader.next());
    assert!(!reader.next());
    assert_eq!(reader.code(), Code::ErrorExpectedEndRecord);
}
