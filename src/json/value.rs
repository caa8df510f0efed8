//! Extended JSON value tree

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed extended JSON value
///
/// Unlike `serde_json::Value`, floats may be non-finite.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<ExtValue>),
    Object(BTreeMap<String, ExtValue>),
}

impl ExtValue {
    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtValue::Int(i) => Some(*i as f64),
            ExtValue::UInt(u) => Some(*u as f64),
            ExtValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ExtValue::Null)
    }

    /// Look up a key when the value is an object
    pub fn get(&self, key: &str) -> Option<&ExtValue> {
        match self {
            ExtValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub(crate) fn unexpected(&self) -> Unexpected<'_> {
        match self {
            ExtValue::Null => Unexpected::Unit,
            ExtValue::Bool(b) => Unexpected::Bool(*b),
            ExtValue::Int(i) => Unexpected::Signed(*i),
            ExtValue::UInt(u) => Unexpected::Unsigned(*u),
            ExtValue::Float(f) => Unexpected::Float(*f),
            ExtValue::String(s) => Unexpected::Str(s),
            ExtValue::Array(_) => Unexpected::Seq,
            ExtValue::Object(_) => Unexpected::Map,
        }
    }
}

impl fmt::Display for ExtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtValue::Null => write!(f, "null"),
            ExtValue::Bool(b) => write!(f, "{}", b),
            ExtValue::Int(i) => write!(f, "{}", i),
            ExtValue::UInt(u) => write!(f, "{}", u),
            ExtValue::Float(v) if v.is_nan() => write!(f, "NaN"),
            ExtValue::Float(v) if v.is_infinite() => {
                write!(f, "{}Infinity", if *v < 0.0 { "-" } else { "" })
            }
            ExtValue::Float(v) => write!(f, "{}", v),
            ExtValue::String(s) => write_json_str(f, s),
            ExtValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ExtValue::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_json_str(f, key)?;
                    write!(f, ": {}", item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Quote and escape `s` as a JSON string literal
fn write_json_str(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

impl Serialize for ExtValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtValue::Null => serializer.serialize_unit(),
            ExtValue::Bool(b) => serializer.serialize_bool(*b),
            ExtValue::Int(i) => serializer.serialize_i64(*i),
            ExtValue::UInt(u) => serializer.serialize_u64(*u),
            ExtValue::Float(f) => serializer.serialize_f64(*f),
            ExtValue::String(s) => serializer.serialize_str(s),
            ExtValue::Array(items) => items.serialize(serializer),
            ExtValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ExtValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExtValueVisitor)
    }
}

struct ExtValueVisitor;

impl<'de> Visitor<'de> for ExtValueVisitor {
    type Value = ExtValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any extended JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<ExtValue, E> {
        Ok(ExtValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<ExtValue, E> {
        Ok(ExtValue::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<ExtValue, E> {
        Ok(ExtValue::UInt(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<ExtValue, E> {
        Ok(ExtValue::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<ExtValue, E> {
        Ok(ExtValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<ExtValue, E> {
        Ok(ExtValue::String(v))
    }

    fn visit_unit<E>(self) -> Result<ExtValue, E> {
        Ok(ExtValue::Null)
    }

    fn visit_none<E>(self) -> Result<ExtValue, E> {
        Ok(ExtValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ExtValue, D::Error> {
        ExtValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ExtValue, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ExtValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ExtValue, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, item)) = map.next_entry::<String, ExtValue>()? {
            entries.insert(key, item);
        }
        Ok(ExtValue::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_non_finite() {
        let value = ExtValue::Array(vec![
            ExtValue::Float(f64::NEG_INFINITY),
            ExtValue::Float(f64::NAN),
            ExtValue::String("x".to_string()),
        ]);
        assert_eq!(value.to_string(), r#"[-Infinity, NaN, "x"]"#);
    }

    #[test]
    fn test_display_uses_json_escapes() {
        let mut map = BTreeMap::new();
        map.insert("a\"b".to_string(), ExtValue::String("esc\u{1b}\n".to_string()));
        let value = ExtValue::Object(map);

        let text = value.to_string();
        assert_eq!(text, r#"{"a\"b": "esc\u001b\n"}"#);
        assert_eq!(crate::json::parse(&text).unwrap(), value);
    }

    #[test]
    fn test_deserialize_from_serde_json() {
        let value: ExtValue = serde_json::from_str(r#"{"a": [1, 2.5, null]}"#).unwrap();
        let ExtValue::Array(items) = value.get("a").unwrap() else {
            panic!("expected array");
        };
        assert_eq!(items[0], ExtValue::UInt(1));
        assert_eq!(items[1].as_f64(), Some(2.5));
        assert!(items[2].is_null());
    }

    #[test]
    fn test_serialize_non_finite_as_null() {
        let text = serde_json::to_string(&ExtValue::Float(f64::INFINITY)).unwrap();
        assert_eq!(text, "null");
    }
}
