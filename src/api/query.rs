//! Search parameters

use std::fmt;

/// Ordered URL search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping earlier ones with the same key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encoded `k=v&...` form, without the leading `?`
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string; a leading `?` is ignored
    ///
    /// Pairs that do not decode as UTF-8 are kept verbatim.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let pairs = input
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k), decode_component(v))
            })
            .collect();
        Self(pairs)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Decode one `application/x-www-form-urlencoded` component
pub(crate) fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_escapes_json() {
        let query = Query::new().with("body", r#"{"a": [1]}"#);
        assert_eq!(query.encode(), "body=%7B%22a%22%3A%20%5B1%5D%7D");
    }

    #[test]
    fn test_parse_decodes_pairs() {
        let query = Query::parse("?tab=all&body=%7B%22a%22%7D&flag&name=a+b");
        assert_eq!(query.get("tab"), Some("all"));
        assert_eq!(query.get("body"), Some(r#"{"a"}"#));
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("name"), Some("a b"));
        assert_eq!(query.get("missing"), None);
    }

    #[test]
    fn test_encode_then_parse_keeps_order() {
        let query: Query = vec![("b", "2"), ("a", "1 & 2")].into_iter().collect();
        let parsed = Query::parse(&query.encode());
        let pairs: Vec<_> = parsed.iter().collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "1 & 2")]);
    }
}
