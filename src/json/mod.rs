//! Extended JSON
//!
//! The servequery backend serializes metric values with Python's `json` module,
//! which emits the bare tokens `NaN`, `Infinity` and `-Infinity` for
//! non-finite floats. Standard JSON decoders reject those documents, so
//! dashboard and series bodies are decoded here instead.
//!
//! Decoding is two-staged: [`parse`] turns the text into an [`ExtValue`] tree
//! and [`from_value`] drives any `serde::Deserialize` type from that tree.
//! Nesting is capped at 128 containers, as in serde_json.
//!
//! ```rust
//! use servequery_ui::json;
//!
//! let values: Vec<f64> = json::from_str("[1.5, Infinity, -Infinity]").unwrap();
//! assert!(values[1].is_infinite() && values[1] > 0.0);
//! ```

mod de;
mod parser;
mod value;

pub use value::ExtValue;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while decoding extended JSON
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtJsonError {
    /// The text is not valid extended JSON
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A complete value was parsed but more input follows
    #[error("Unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    /// The document parsed but does not match the target type
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Parse extended JSON text into a value tree
pub fn parse(input: &str) -> Result<ExtValue, ExtJsonError> {
    parser::parse_document(input)
}

/// Parse extended JSON text straight into a typed value
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, ExtJsonError> {
    from_value(parse(input)?)
}

/// Deserialize a typed value from an already parsed tree
pub fn from_value<T: DeserializeOwned>(value: ExtValue) -> Result<T, ExtJsonError> {
    T::deserialize(value).map_err(|e| ExtJsonError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        value: f64,
        #[serde(default)]
        count: Option<u32>,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        extra: BTreeMap<String, ExtValue>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Kind {
        Line,
        Bar,
        #[serde(other)]
        Other,
    }

    #[test]
    fn test_from_str_infinity_field() {
        let sample: Sample = from_str(r#"{"name": "max", "value": Infinity}"#).unwrap();
        assert_eq!(sample.name, "max");
        assert!(sample.value.is_infinite());
        assert!(sample.value.is_sign_positive());
        assert!(sample.count.is_none());
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_from_str_negative_infinity_and_nan() {
        let values: Vec<f64> = from_str("[-Infinity, NaN, 2]").unwrap();
        assert!(values[0].is_infinite() && values[0].is_sign_negative());
        assert!(values[1].is_nan());
        assert_eq!(values[2], 2.0);
    }

    #[test]
    fn test_untyped_map_keeps_non_finite() {
        let sample: Sample = from_str(
            r#"{"name": "x", "value": 1, "count": 3, "tags": ["a"], "extra": {"threshold": -Infinity, "label": "t"}}"#,
        )
        .unwrap();
        assert_eq!(sample.count, Some(3));
        assert_eq!(sample.tags, vec!["a".to_string()]);
        let threshold = sample.extra["threshold"].as_f64().unwrap();
        assert!(threshold.is_infinite() && threshold.is_sign_negative());
        assert_eq!(sample.extra["label"].as_str(), Some("t"));
    }

    #[test]
    fn test_enum_with_fallback_variant() {
        let kinds: Vec<Kind> = from_str(r#"["line", "bar", "histogram"]"#).unwrap();
        assert_eq!(kinds, vec![Kind::Line, Kind::Bar, Kind::Other]);
    }

    #[test]
    fn test_null_into_option() {
        let value: Option<f64> = from_str("null").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_integer_field_rejects_float() {
        let err = from_str::<u32>("1.5").unwrap_err();
        assert!(matches!(err, ExtJsonError::Decode(_)));
    }

    #[test]
    fn test_syntax_error_reports_offset() {
        let err = parse(r#"{"a": }"#).unwrap_err();
        assert!(matches!(err, ExtJsonError::Syntax { .. }));
    }

    #[test]
    fn test_trailing_input() {
        let err = parse("[1, 2] 3").unwrap_err();
        assert_eq!(err, ExtJsonError::TrailingInput { offset: 7 });
    }
}
