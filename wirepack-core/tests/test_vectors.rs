//! Byte-exact wire vectors
//!
//! Each vector pins the encoding of one field kind. Any implementation of
//! the format, on any host, must produce and accept exactly these bytes.

use wirepack_core::{Blob, PackError, Packer};

fn packed(build: impl FnOnce(&mut Packer<'_>)) -> Vec<u8> {
    let mut packer = Packer::new();
    build(&mut packer);
    packer.as_bytes().to_vec()
}

/// 1. Signed integers, big-endian two's complement
#[test]
fn vector_signed_integers() {
    let bytes = packed(|p| {
        p.push_i8(-2).unwrap();
        p.push_i16(0x1234).unwrap();
        p.push_i32(-1).unwrap();
        p.push_i64(0x0102_0304_0506_0708).unwrap();
    });

    assert_eq!(hex::encode(bytes), "fe1234ffffffff0102030405060708");
}

/// 2. Unsigned integers share the signed encoding
#[test]
fn vector_unsigned_integers() {
    let bytes = packed(|p| {
        p.push_u8(0xFE).unwrap();
        p.push_u16(0x1234).unwrap();
        p.push_u32(u32::MAX).unwrap();
        p.push_u64(0x0102_0304_0506_0708).unwrap();
    });

    let signed = packed(|p| {
        p.push_i8(-2).unwrap();
        p.push_i16(0x1234).unwrap();
        p.push_i32(-1).unwrap();
        p.push_i64(0x0102_0304_0506_0708).unwrap();
    });

    assert_eq!(bytes, signed);
}

/// 3. IEEE-754 floats in big-endian order
#[test]
fn vector_floats() {
    let bytes = packed(|p| {
        p.push_f32(1.0).unwrap();
        p.push_f64(-2.0).unwrap();
    });

    assert_eq!(hex::encode(bytes), "3f800000c000000000000000");
}

/// 4. String: int32 length + UTF-8
#[test]
fn vector_string() {
    let bytes = packed(|p| p.push_str("é!").unwrap());
    assert_eq!(hex::encode(bytes), "00000003c3a921");
}

/// 5. Latin-1 caller text is re-encoded before the length is taken
#[test]
fn vector_string_latin1() {
    let mut packer = Packer::builder().charset("ISO-8859-1").build().unwrap();
    packer.push_string(&[0xE9, b'!']).unwrap();
    assert_eq!(hex::encode(packer.as_bytes()), "00000003c3a921");
}

/// 6. Binary: int32 length + raw bytes
#[test]
fn vector_binary() {
    let bytes = packed(|p| p.push_binary(&[0x00, 0xFF]).unwrap());
    assert_eq!(hex::encode(bytes), "0000000200ff");
}

/// 7. Empty string and empty binary are a bare zero prefix
#[test]
fn vector_empty_fields() {
    let bytes = packed(|p| {
        p.push_str("").unwrap();
        p.push_binary(&[]).unwrap();
    });
    assert_eq!(bytes, vec![0u8; 8]);
}

/// 8. Raw: no prefix
#[test]
fn vector_raw() {
    let bytes = packed(|p| p.push_raw(b"\x01\x02\x03").unwrap());
    assert_eq!(bytes, vec![1, 2, 3]);
}

/// 9. The reference message: int32(300), string("ab"), int8(-1)
#[test]
fn vector_reference_message() {
    let bytes = packed(|p| {
        p.push_i32(300).unwrap();
        p.push_str("ab").unwrap();
        p.push_i8(-1).unwrap();
    });
    assert_eq!(hex::encode(&bytes), "0000012c000000026162ff");

    let mut wire = bytes;
    let mut packer = Packer::bound(&mut wire).unwrap();
    assert_eq!(packer.pop_i32().unwrap(), 300);
    assert_eq!(packer.pop_str().unwrap(), "ab");
    assert_eq!(packer.pop_i8().unwrap(), -1);
}

/// 10. Decoding foreign bytes
#[test]
fn vector_decode_foreign() {
    let mut wire = hex::decode("000000050102030405beef").unwrap();
    let mut packer = Packer::bound(&mut wire).unwrap();

    assert_eq!(packer.pop_binary().unwrap(), Blob::from_slice(&[1, 2, 3, 4, 5]));
    assert_eq!(packer.pop_u16().unwrap(), 0xBEEF);
}

/// 11. A prefix claiming more bytes than present
#[test]
fn vector_truncated_field() {
    let mut wire = hex::decode("0000000a6162").unwrap();
    let mut packer = Packer::bound(&mut wire).unwrap();

    assert_eq!(packer.pop_string_into(None).unwrap(), 10);
    assert_eq!(
        packer.pop_string().unwrap_err(),
        PackError::OutOfRange {
            needed: 14,
            available: 6
        }
    );
    assert_eq!(packer.read_position(), 0);
}
