use std::collections::BTreeMap;

use mystwire_protocol::{PacketReader, PacketWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
    Map(Vec<(i32, i32)>),
}

fn boundary_i32() -> impl Strategy<Value = i32> {
    prop_oneof![Just(0), Just(i32::MIN), Just(i32::MAX), Just(-1), any::<i32>()]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<i8>().prop_map(Op::I8),
        prop_oneof![Just(0u16), Just(u16::MAX), any::<u16>()].prop_map(Op::U16),
        prop_oneof![Just(i16::MIN), Just(i16::MAX), any::<i16>()].prop_map(Op::I16),
        prop_oneof![Just(0u32), Just(u32::MAX), any::<u32>()].prop_map(Op::U32),
        boundary_i32().prop_map(Op::I32),
        prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>()].prop_map(Op::U64),
        prop_oneof![Just(i64::MIN), Just(i64::MAX), any::<i64>()].prop_map(Op::I64),
        any::<f32>().prop_map(Op::F32),
        any::<f64>().prop_map(Op::F64),
        any::<bool>().prop_map(Op::Bool),
        ".{0,40}".prop_map(Op::Str),
        prop::collection::vec((boundary_i32(), boundary_i32()), 0..16).prop_map(Op::Map),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = PacketWriter::new();

        for op in &ops {
            match op {
                Op::U8(v) => { writer.write_u8(*v); }
                Op::I8(v) => { writer.write_i8(*v); }
                Op::U16(v) => { writer.write_u16(*v); }
                Op::I16(v) => { writer.write_i16(*v); }
                Op::U32(v) => { writer.write_u32(*v); }
                Op::I32(v) => { writer.write_i32(*v); }
                Op::U64(v) => { writer.write_u64(*v); }
                Op::I64(v) => { writer.write_i64(*v); }
                Op::F32(v) => { writer.write_f32(*v); }
                Op::F64(v) => { writer.write_f64(*v); }
                Op::Bool(v) => { writer.write_bool(*v); }
                Op::Str(v) => { writer.write_str(v); }
                Op::Map(v) => { writer.write_map(v.iter().copied()); }
            }
        }

        let bytes = writer.into_bytes();
        let mut reader = PacketReader::new(&bytes);

        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(reader.read_u8(), *v),
                Op::I8(v) => prop_assert_eq!(reader.read_i8(), *v),
                Op::U16(v) => prop_assert_eq!(reader.read_u16(), *v),
                Op::I16(v) => prop_assert_eq!(reader.read_i16(), *v),
                Op::U32(v) => prop_assert_eq!(reader.read_u32(), *v),
                Op::I32(v) => prop_assert_eq!(reader.read_i32(), *v),
                Op::U64(v) => prop_assert_eq!(reader.read_u64(), *v),
                Op::I64(v) => prop_assert_eq!(reader.read_i64(), *v),
                // Bit comparison so NaN payloads count as equal.
                Op::F32(v) => prop_assert_eq!(reader.read_f32().to_bits(), v.to_bits()),
                Op::F64(v) => prop_assert_eq!(reader.read_f64().to_bits(), v.to_bits()),
                Op::Bool(v) => prop_assert_eq!(reader.read_bool(), *v),
                Op::Str(v) => prop_assert_eq!(&reader.read_string(), v),
                Op::Map(v) => {
                    let expected: BTreeMap<i32, i32> = v.iter().copied().collect();
                    prop_assert_eq!(reader.read_map(), expected);
                }
            }
        }
        prop_assert!(reader.is_exhausted());
    }

    #[test]
    fn prop_truncation_never_panics_and_zeroes_tail(
        values in prop::collection::vec(any::<i32>(), 1..32),
        cut_seed in any::<usize>(),
    ) {
        let mut writer = PacketWriter::new();
        for v in &values {
            writer.write_i32(*v);
        }
        let bytes = writer.into_bytes();
        let cut = cut_seed % bytes.len();
        let mut reader = PacketReader::new(&bytes[..cut]);

        let whole = cut / 4;
        for (i, v) in values.iter().enumerate() {
            let got = reader.read_i32();
            if i < whole {
                prop_assert_eq!(got, *v);
            } else {
                prop_assert_eq!(got, 0);
            }
        }
        prop_assert!(reader.is_exhausted());
        prop_assert_eq!(reader.read_string(), "");
    }
}
