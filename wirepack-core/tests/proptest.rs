//! Property-based tests using proptest

use proptest::prelude::*;
use wirepack_core::{types::unpack_layout, Field, PackError, Packer};

fn arb_field() -> impl Strategy<Value = Field> {
    prop_oneof![
        any::<i8>().prop_map(Field::Int8),
        any::<i16>().prop_map(Field::Int16),
        any::<i32>().prop_map(Field::Int32),
        any::<i64>().prop_map(Field::Int64),
        any::<u8>().prop_map(Field::Uint8),
        any::<u16>().prop_map(Field::Uint16),
        any::<u32>().prop_map(Field::Uint32),
        any::<u64>().prop_map(Field::Uint64),
        // NaN != NaN; bit-exactness of NaN is covered by prop_float_bits_round_trip
        any::<f32>().prop_filter("not NaN", |v| !v.is_nan()).prop_map(Field::Float32),
        any::<f64>().prop_filter("not NaN", |v| !v.is_nan()).prop_map(Field::Float64),
        ".*".prop_map(Field::String),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(|v| Field::Binary(v.into())),
    ]
}

proptest! {
    #[test]
    fn prop_fields_round_trip(
        fields in prop::collection::vec(arb_field(), 0..32),
        capacity in 1usize..64
    ) {
        let mut packer = Packer::with_capacity(capacity);
        packer.push_fields(&fields).unwrap();

        let layout: Vec<_> = fields.iter().map(Field::kind).collect();
        let decoded = packer.pop_layout(&layout).unwrap();

        prop_assert_eq!(decoded, fields);
        prop_assert_eq!(packer.remaining(), 0);
    }

    #[test]
    fn prop_float_bits_round_trip(a in any::<u32>(), b in any::<u64>()) {
        let mut packer = Packer::new();
        packer.push_f32(f32::from_bits(a)).unwrap();
        packer.push_f64(f64::from_bits(b)).unwrap();

        prop_assert_eq!(packer.pop_f32().unwrap().to_bits(), a);
        prop_assert_eq!(packer.pop_f64().unwrap().to_bits(), b);
    }

    #[test]
    fn prop_wire_order_is_big_endian(v in any::<i64>()) {
        let mut packer = Packer::new();
        packer.push_i64(v).unwrap();
        prop_assert_eq!(packer.as_bytes(), &v.to_be_bytes()[..]);
    }

    #[test]
    fn prop_latin1_round_trip(text in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut packer = Packer::builder().charset("LATIN1").build().unwrap();
        packer.push_string(&text).unwrap();
        prop_assert_eq!(packer.pop_string().unwrap(), text);
    }

    #[test]
    fn prop_growth_keeps_prefix(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 1..20),
        capacity in 1usize..16
    ) {
        let mut packer = Packer::with_capacity(capacity);
        let mut expected = Vec::new();

        for chunk in &chunks {
            packer.push_raw(chunk).unwrap();
            expected.extend_from_slice(chunk);
            prop_assert_eq!(packer.as_bytes(), expected.as_slice());
        }
        prop_assert!(packer.capacity() >= expected.len());
    }

    #[test]
    fn prop_peek_is_idempotent(data in prop::collection::vec(any::<u8>(), 0..256), peeks in 1usize..5) {
        let mut packer = Packer::new();
        packer.push_binary(&data).unwrap();

        for _ in 0..peeks {
            prop_assert_eq!(packer.pop_binary_into(None).unwrap(), data.len());
            prop_assert_eq!(packer.read_position(), 0);
        }
        let popped = packer.pop_binary().unwrap();
        prop_assert_eq!(popped.as_slice(), data.as_slice());
    }

    #[test]
    fn prop_truncation_consumes_whole_field(
        text in "[a-z]{0,64}",
        cap in 1usize..80
    ) {
        let mut packer = Packer::new();
        packer.push_str(&text).unwrap();
        packer.push_u8(0xAB).unwrap();

        let mut dest = vec![0xFFu8; cap];
        let written = packer.pop_string_into(Some(&mut dest[..])).unwrap();

        prop_assert_eq!(written, text.len().min(cap - 1));
        prop_assert_eq!(&dest[..written], &text.as_bytes()[..written]);
        prop_assert_eq!(dest[written], 0);
        prop_assert_eq!(packer.pop_u8().unwrap(), 0xAB);
    }

    #[test]
    fn prop_bound_region_never_grows(
        len in 1usize..64,
        extra in prop::collection::vec(any::<u8>(), 1..32)
    ) {
        let mut region: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let original = region.clone();
        {
            let mut packer = Packer::bound(&mut region).unwrap();
            let result = packer.push_raw(&extra);
            prop_assert!(matches!(result, Err(PackError::Logic(_))));
        }
        prop_assert_eq!(region, original);
    }

    #[test]
    fn prop_unpack_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..512),
        layout in prop::collection::vec(
            prop::sample::select(wirepack_core::FieldKind::ALL.to_vec()),
            0..16
        )
    ) {
        // Should either succeed or return an error, never panic
        let _ = unpack_layout(&data, &layout);
    }
}
