//! Serde `Deserializer` over [`ExtValue`]

use serde::de::value::{Error as DeError, MapDeserializer, SeqDeserializer};
use serde::de::{self, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use super::ExtValue;

impl<'de> de::Deserializer<'de> for ExtValue {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self {
            ExtValue::Null => visitor.visit_unit(),
            ExtValue::Bool(b) => visitor.visit_bool(b),
            ExtValue::Int(i) => visitor.visit_i64(i),
            ExtValue::UInt(u) => visitor.visit_u64(u),
            ExtValue::Float(f) => visitor.visit_f64(f),
            ExtValue::String(s) => visitor.visit_string(s),
            ExtValue::Array(items) => {
                let mut seq: SeqDeserializer<_, DeError> = SeqDeserializer::new(items.into_iter());
                let out = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(out)
            }
            ExtValue::Object(entries) => {
                let mut map: MapDeserializer<'de, _, DeError> =
                    MapDeserializer::new(entries.into_iter());
                let out = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(out)
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self {
            ExtValue::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    /// Only unit variants spelled as strings are produced by the backend
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self {
            ExtValue::String(variant) => visitor.visit_enum(
                <String as IntoDeserializer<'de, DeError>>::into_deserializer(variant),
            ),
            other => Err(de::Error::invalid_type(
                other.unexpected(),
                &"a string enum variant",
            )),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, DeError> for ExtValue {
    type Deserializer = ExtValue;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}
