//! Typed field layer on top of the packer

use crate::blob::Blob;
use crate::error::PackError;
use crate::packer::Packer;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Trait for types that can be written to and read from a packer
pub trait Packable {
    /// Push this value
    fn pack(&self, packer: &mut Packer<'_>) -> Result<(), PackError>;

    /// Pop a value of this type
    fn unpack(packer: &mut Packer<'_>) -> Result<Self, PackError>
    where
        Self: Sized;
}

macro_rules! impl_packable_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Packable for $ty {
            fn pack(&self, packer: &mut Packer<'_>) -> Result<(), PackError> {
                packer.push_scalar(*self)
            }

            fn unpack(packer: &mut Packer<'_>) -> Result<Self, PackError> {
                packer.pop_scalar()
            }
        }
    )*};
}

impl_packable_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Packable for String {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<(), PackError> {
        packer.push_str(self)
    }

    fn unpack(packer: &mut Packer<'_>) -> Result<Self, PackError> {
        packer.pop_str()
    }
}

impl Packable for Vec<u8> {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<(), PackError> {
        packer.push_binary(self)
    }

    fn unpack(packer: &mut Packer<'_>) -> Result<Self, PackError> {
        packer.pop_binary().map(Blob::into_vec)
    }
}

impl Packable for Blob {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<(), PackError> {
        packer.push_binary(self)
    }

    fn unpack(packer: &mut Packer<'_>) -> Result<Self, PackError> {
        packer.pop_binary()
    }
}

/// Kind of a field, as named in layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `u8`
    Uint8,
    /// `u16`
    Uint16,
    /// `u32`
    Uint32,
    /// `u64`
    Uint64,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// Length-prefixed text
    String,
    /// Length-prefixed bytes
    Binary,
}

impl FieldKind {
    /// Every kind, in declaration order
    pub const ALL: [FieldKind; 12] = [
        FieldKind::Int8,
        FieldKind::Int16,
        FieldKind::Int32,
        FieldKind::Int64,
        FieldKind::Uint8,
        FieldKind::Uint16,
        FieldKind::Uint32,
        FieldKind::Uint64,
        FieldKind::Float32,
        FieldKind::Float64,
        FieldKind::String,
        FieldKind::Binary,
    ];

    /// Layout name
    pub const fn name(&self) -> &'static str {
        match self {
            FieldKind::Int8 => "int8",
            FieldKind::Int16 => "int16",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint8 => "uint8",
            FieldKind::Uint16 => "uint16",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint64 => "uint64",
            FieldKind::Float32 => "float32",
            FieldKind::Float64 => "float64",
            FieldKind::String => "string",
            FieldKind::Binary => "binary",
        }
    }

    /// Encoded size for fixed-width kinds, `None` for prefixed ones
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldKind::Int8 | FieldKind::Uint8 => Some(1),
            FieldKind::Int16 | FieldKind::Uint16 => Some(2),
            FieldKind::Int32 | FieldKind::Uint32 | FieldKind::Float32 => Some(4),
            FieldKind::Int64 | FieldKind::Uint64 | FieldKind::Float64 => Some(8),
            FieldKind::String | FieldKind::Binary => None,
        }
    }

    /// Parse a comma-separated layout such as `int32,string,int8`
    pub fn parse_layout(layout: &str) -> Result<Vec<FieldKind>, PackError> {
        layout
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| PackError::InvalidArgument(format!("unknown field kind: {:?}", s)))
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Field {
    /// `i8` value
    Int8(i8),
    /// `i16` value
    Int16(i16),
    /// `i32` value
    Int32(i32),
    /// `i64` value
    Int64(i64),
    /// `u8` value
    Uint8(u8),
    /// `u16` value
    Uint16(u16),
    /// `u32` value
    Uint32(u32),
    /// `u64` value
    Uint64(u64),
    /// `f32` value
    Float32(#[serde(with = "float_text")] f32),
    /// `f64` value
    Float64(#[serde(with = "float_text")] f64),
    /// Text value
    String(String),
    /// Binary value
    Binary(Blob),
}

/// Serde form for float fields
///
/// Finite values are plain numbers. NaN and the infinities have no JSON
/// number form, so they are written as the strings `"NaN"`, `"inf"` and
/// `"-inf"`. NaN payload bits are not kept.
mod float_text {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) trait Float: Copy {
        const NAN: Self;
        const INFINITY: Self;
        const NEG_INFINITY: Self;

        fn from_f64(v: f64) -> Self;
        fn to_f64(self) -> f64;
        fn serialize_number<S: Serializer>(self, serializer: S) -> Result<S::Ok, S::Error>;
    }

    impl Float for f32 {
        const NAN: Self = f32::NAN;
        const INFINITY: Self = f32::INFINITY;
        const NEG_INFINITY: Self = f32::NEG_INFINITY;

        fn from_f64(v: f64) -> Self {
            v as f32
        }

        fn to_f64(self) -> f64 {
            f64::from(self)
        }

        fn serialize_number<S: Serializer>(self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_f32(self)
        }
    }

    impl Float for f64 {
        const NAN: Self = f64::NAN;
        const INFINITY: Self = f64::INFINITY;
        const NEG_INFINITY: Self = f64::NEG_INFINITY;

        fn from_f64(v: f64) -> Self {
            v
        }

        fn to_f64(self) -> f64 {
            self
        }

        fn serialize_number<S: Serializer>(self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_f64(self)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(super) fn serialize<T: Float, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let v = value.to_f64();
        if v.is_nan() {
            serializer.serialize_str("NaN")
        } else if v == f64::INFINITY {
            serializer.serialize_str("inf")
        } else if v == f64::NEG_INFINITY {
            serializer.serialize_str("-inf")
        } else {
            value.serialize_number(serializer)
        }
    }

    pub(super) fn deserialize<'de, T: Float, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<T, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(T::from_f64(v)),
            Repr::Text(text) => match text.to_ascii_lowercase().as_str() {
                "nan" => Ok(T::NAN),
                "inf" | "+inf" | "infinity" => Ok(T::INFINITY),
                "-inf" | "-infinity" => Ok(T::NEG_INFINITY),
                _ => Err(D::Error::custom(format!("invalid float: {:?}", text))),
            },
        }
    }
}

impl Field {
    /// The kind of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Int8(_) => FieldKind::Int8,
            Field::Int16(_) => FieldKind::Int16,
            Field::Int32(_) => FieldKind::Int32,
            Field::Int64(_) => FieldKind::Int64,
            Field::Uint8(_) => FieldKind::Uint8,
            Field::Uint16(_) => FieldKind::Uint16,
            Field::Uint32(_) => FieldKind::Uint32,
            Field::Uint64(_) => FieldKind::Uint64,
            Field::Float32(_) => FieldKind::Float32,
            Field::Float64(_) => FieldKind::Float64,
            Field::String(_) => FieldKind::String,
            Field::Binary(_) => FieldKind::Binary,
        }
    }
}

impl Packer<'_> {
    /// Push any [`Packable`] value
    pub fn push<T: Packable>(&mut self, value: &T) -> Result<(), PackError> {
        value.pack(self)
    }

    /// Pop any [`Packable`] value
    pub fn pop<T: Packable>(&mut self) -> Result<T, PackError> {
        T::unpack(self)
    }

    /// Push a typed field
    pub fn push_field(&mut self, field: &Field) -> Result<(), PackError> {
        match field {
            Field::Int8(v) => self.push_i8(*v),
            Field::Int16(v) => self.push_i16(*v),
            Field::Int32(v) => self.push_i32(*v),
            Field::Int64(v) => self.push_i64(*v),
            Field::Uint8(v) => self.push_u8(*v),
            Field::Uint16(v) => self.push_u16(*v),
            Field::Uint32(v) => self.push_u32(*v),
            Field::Uint64(v) => self.push_u64(*v),
            Field::Float32(v) => self.push_f32(*v),
            Field::Float64(v) => self.push_f64(*v),
            Field::String(v) => self.push_str(v),
            Field::Binary(v) => self.push_binary(v),
        }
    }

    /// Pop a field of the given kind
    pub fn pop_field(&mut self, kind: FieldKind) -> Result<Field, PackError> {
        Ok(match kind {
            FieldKind::Int8 => Field::Int8(self.pop_i8()?),
            FieldKind::Int16 => Field::Int16(self.pop_i16()?),
            FieldKind::Int32 => Field::Int32(self.pop_i32()?),
            FieldKind::Int64 => Field::Int64(self.pop_i64()?),
            FieldKind::Uint8 => Field::Uint8(self.pop_u8()?),
            FieldKind::Uint16 => Field::Uint16(self.pop_u16()?),
            FieldKind::Uint32 => Field::Uint32(self.pop_u32()?),
            FieldKind::Uint64 => Field::Uint64(self.pop_u64()?),
            FieldKind::Float32 => Field::Float32(self.pop_f32()?),
            FieldKind::Float64 => Field::Float64(self.pop_f64()?),
            FieldKind::String => Field::String(self.pop_str()?),
            FieldKind::Binary => Field::Binary(self.pop_binary()?),
        })
    }

    /// Push fields in order
    ///
    /// Stops at the first failure; fields already pushed stay pushed.
    pub fn push_fields(&mut self, fields: &[Field]) -> Result<(), PackError> {
        fields.iter().try_for_each(|field| self.push_field(field))
    }

    /// Pop one field per entry of `layout`
    ///
    /// On failure the read cursor returns to where it was before the call.
    pub fn pop_layout(&mut self, layout: &[FieldKind]) -> Result<Vec<Field>, PackError> {
        let start = self.read_position();
        let result = layout
            .iter()
            .map(|&kind| self.pop_field(kind))
            .collect::<Result<Vec<_>, _>>();

        if result.is_err() {
            self.pop_reset(start)?;
        }
        result
    }
}

/// Decode `bytes` as a sequence of fields laid out as `layout`
///
/// Strings are expected to be UTF-8.
pub fn unpack_layout(bytes: &[u8], layout: &[FieldKind]) -> Result<Vec<Field>, PackError> {
    let mut packer = Packer::with_capacity(bytes.len().max(1));
    packer.push_raw(bytes)?;
    packer.pop_layout(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_push_pop() {
        let mut packer = Packer::new();
        packer.push(&7u16).unwrap();
        packer.push(&String::from("name")).unwrap();
        packer.push(&vec![1u8, 2, 3]).unwrap();
        packer.push(&Blob::from_slice(b"xy")).unwrap();

        assert_eq!(packer.pop::<u16>().unwrap(), 7);
        assert_eq!(packer.pop::<String>().unwrap(), "name");
        assert_eq!(packer.pop::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
        assert_eq!(packer.pop::<Blob>().unwrap().as_slice(), b"xy");
    }

    #[test]
    fn test_field_round_trip() {
        let fields = vec![
            Field::Int32(300),
            Field::String("ab".into()),
            Field::Int8(-1),
            Field::Float64(2.5),
            Field::Binary(Blob::from_slice(&[0xDE, 0xAD])),
        ];

        let mut packer = Packer::new();
        packer.push_fields(&fields).unwrap();

        let layout: Vec<_> = fields.iter().map(Field::kind).collect();
        assert_eq!(packer.pop_layout(&layout).unwrap(), fields);
    }

    #[test]
    fn test_float_json_forms() {
        let json = serde_json::to_string(&Field::Float32(1.5)).unwrap();
        assert_eq!(json, r#"{"type":"float32","value":1.5}"#);

        let json = serde_json::to_string(&Field::Float64(f64::NEG_INFINITY)).unwrap();
        assert_eq!(json, r#"{"type":"float64","value":"-inf"}"#);

        let json = serde_json::to_string(&Field::Float32(f32::NAN)).unwrap();
        assert_eq!(json, r#"{"type":"float32","value":"NaN"}"#);
        match serde_json::from_str(&json).unwrap() {
            Field::Float32(v) => assert!(v.is_nan()),
            other => panic!("unexpected field {:?}", other),
        }

        let field: Field = serde_json::from_str(r#"{"type":"float64","value":3}"#).unwrap();
        assert_eq!(field, Field::Float64(3.0));
        assert!(serde_json::from_str::<Field>(r#"{"type":"float64","value":"big"}"#).is_err());
        assert!(serde_json::from_str::<Field>(r#"{"type":"float64","value":null}"#).is_err());
    }

    #[test]
    fn test_parse_layout() {
        let layout = FieldKind::parse_layout("int32, String ,int8,").unwrap();
        assert_eq!(
            layout,
            vec![FieldKind::Int32, FieldKind::String, FieldKind::Int8]
        );

        assert!(matches!(
            FieldKind::parse_layout("int32,int128"),
            Err(PackError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.to_string().parse::<FieldKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_pop_layout_rewinds_on_failure() {
        let mut packer = Packer::new();
        packer.push_i32(1).unwrap();
        packer.push_i8(2).unwrap();

        let result = packer.pop_layout(&[FieldKind::Int32, FieldKind::Int32]);
        assert!(matches!(result, Err(PackError::OutOfRange { .. })));
        assert_eq!(packer.read_position(), 0);
    }

    #[test]
    fn test_unpack_layout() {
        let bytes = [0, 0, 1, 44, 0, 0, 0, 2, b'a', b'b', 0xFF];
        let fields =
            unpack_layout(&bytes, &[FieldKind::Int32, FieldKind::String, FieldKind::Int8])
                .unwrap();
        assert_eq!(
            fields,
            vec![Field::Int32(300), Field::String("ab".into()), Field::Int8(-1)]
        );

        assert!(unpack_layout(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(FieldKind::Uint16.fixed_width(), Some(2));
        assert_eq!(FieldKind::Float64.fixed_width(), Some(8));
        assert_eq!(FieldKind::Binary.fixed_width(), None);
    }
}
