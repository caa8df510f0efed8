//! Extended JSON Parser
//!
//! Standard JSON grammar plus the bare tokens `NaN`, `Infinity` and
//! `-Infinity` in value position.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while1, take_while_m_n},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize, value},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

use super::{ExtJsonError, ExtValue};

/// Deepest array/object nesting accepted, same as serde_json
pub(crate) const MAX_DEPTH: usize = 128;

/// Parse a complete document, allowing surrounding whitespace only
pub(crate) fn parse_document(input: &str) -> Result<ExtValue, ExtJsonError> {
    match delimited(multispace0, |i| parse_value(i, 0), multispace0)(input) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rest, _)) => Err(ExtJsonError::TrailingInput {
            offset: input.len() - rest.len(),
        }),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExtJsonError::Syntax {
            offset: input.len() - e.input.len(),
            message: match e.code {
                ErrorKind::TooLarge => "recursion limit exceeded".to_string(),
                code => format!("unexpected input ({:?})", code),
            },
        }),
        Err(nom::Err::Incomplete(_)) => Err(ExtJsonError::Syntax {
            offset: input.len(),
            message: "unexpected end of input".to_string(),
        }),
    }
}

/// Parse any value nested `depth` containers deep
fn parse_value(input: &str, depth: usize) -> IResult<&str, ExtValue> {
    alt((
        value(ExtValue::Null, tag("null")),
        value(ExtValue::Bool(true), tag("true")),
        value(ExtValue::Bool(false), tag("false")),
        parse_non_finite,
        parse_number,
        map(parse_string, ExtValue::String),
        |i| parse_array(i, depth),
        |i| parse_object(i, depth),
    ))(input)
}

/// Parse `NaN`, `Infinity` or `-Infinity`
///
/// Must run before [`parse_number`] so that `-Infinity` is not rejected
/// after the minus sign.
fn parse_non_finite(input: &str) -> IResult<&str, ExtValue> {
    alt((
        value(ExtValue::Float(f64::NAN), tag("NaN")),
        value(ExtValue::Float(f64::INFINITY), tag("Infinity")),
        value(ExtValue::Float(f64::NEG_INFINITY), tag("-Infinity")),
    ))(input)
}

/// Parse a number, keeping integers without fraction or exponent exact
fn parse_number(input: &str) -> IResult<&str, ExtValue> {
    let (rest, text) = recognize(tuple((
        opt(char('-')),
        alt((tag("0"), recognize(pair(one_of("123456789"), digit0)))),
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    let is_float = text.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(i) = text.parse::<i64>() {
            return Ok((rest, ExtValue::Int(i)));
        }
        if let Ok(u) = text.parse::<u64>() {
            return Ok((rest, ExtValue::UInt(u)));
        }
    }

    match text.parse::<f64>() {
        Ok(f) => Ok((rest, ExtValue::Float(f))),
        Err(_) => Err(fail(input, ErrorKind::Float)),
    }
}

/// Parse a double-quoted string with JSON escapes
fn parse_string(input: &str) -> IResult<&str, String> {
    let unescaped = take_while1(|c: char| c != '"' && c != '\\' && c >= ' ');
    let escape = alt((
        value('"', char('"')),
        value('\\', char('\\')),
        value('/', char('/')),
        value('\u{08}', char('b')),
        value('\u{0C}', char('f')),
        value('\n', char('n')),
        value('\r', char('r')),
        value('\t', char('t')),
        preceded(char('u'), parse_unicode_escape),
    ));

    delimited(
        char('"'),
        map(
            opt(escaped_transform(unescaped, '\\', escape)),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

/// Parse `XXXX` (and a trailing low surrogate when needed)
fn parse_unicode_escape(input: &str) -> IResult<&str, char> {
    let (rest, high) = parse_hex4(input)?;

    let (rest, code) = if (0xD800..0xDC00).contains(&high) {
        let (rest, low) = preceded(tag("\\u"), parse_hex4)(rest)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(fail(input, ErrorKind::Escaped));
        }
        (rest, 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    } else {
        (rest, high)
    };

    match char::from_u32(code) {
        Some(c) => Ok((rest, c)),
        None => Err(fail(input, ErrorKind::Escaped)),
    }
}

fn parse_hex4(input: &str) -> IResult<&str, u32> {
    map_res(
        take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u32::from_str_radix(hex, 16),
    )(input)
}

/// Open a container, failing hard once nesting passes [`MAX_DEPTH`]
fn open(input: &str, delimiter: char, depth: usize) -> IResult<&str, ()> {
    let (rest, _) = pair(char(delimiter), multispace0)(input)?;
    if depth >= MAX_DEPTH {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    Ok((rest, ()))
}

/// Parse `[value, ...]`
fn parse_array(input: &str, depth: usize) -> IResult<&str, ExtValue> {
    map(
        delimited(
            |i| open(i, '[', depth),
            separated_list0(delimited(multispace0, char(','), multispace0), |i| {
                parse_value(i, depth + 1)
            }),
            pair(multispace0, char(']')),
        ),
        ExtValue::Array,
    )(input)
}

/// Parse `{"key": value, ...}`
fn parse_object(input: &str, depth: usize) -> IResult<&str, ExtValue> {
    map(
        delimited(
            |i| open(i, '{', depth),
            separated_list0(
                delimited(multispace0, char(','), multispace0),
                separated_pair(
                    parse_string,
                    delimited(multispace0, char(':'), multispace0),
                    |i| parse_value(i, depth + 1),
                ),
            ),
            pair(multispace0, char('}')),
        ),
        |entries| ExtValue::Object(entries.into_iter().collect()),
    )(input)
}

fn fail(input: &str, kind: ErrorKind) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_document("null").unwrap(), ExtValue::Null);
        assert_eq!(parse_document(" true ").unwrap(), ExtValue::Bool(true));
        assert_eq!(parse_document("-12").unwrap(), ExtValue::Int(-12));
        assert_eq!(parse_document("18446744073709551615").unwrap(), ExtValue::UInt(u64::MAX));
        assert_eq!(parse_document("2.5e2").unwrap(), ExtValue::Float(250.0));
    }

    #[test]
    fn test_parse_non_finite_tokens() {
        let parsed = parse_document("[NaN, Infinity, -Infinity, -1]").unwrap();
        let ExtValue::Array(items) = parsed else {
            panic!("expected array");
        };
        assert!(matches!(items[0], ExtValue::Float(f) if f.is_nan()));
        assert_eq!(items[1], ExtValue::Float(f64::INFINITY));
        assert_eq!(items[2], ExtValue::Float(f64::NEG_INFINITY));
        assert_eq!(items[3], ExtValue::Int(-1));
    }

    #[test]
    fn test_non_finite_inside_string_is_text() {
        let parsed = parse_document(r#""Infinity""#).unwrap();
        assert_eq!(parsed, ExtValue::String("Infinity".to_string()));
    }

    #[test]
    fn test_parse_string_escapes() {
        let parsed = parse_document(r#""a\"b\\c\né😀""#).unwrap();
        assert_eq!(parsed, ExtValue::String("a\"b\\c\né😀".to_string()));
    }

    #[test]
    fn test_parse_nested_object() {
        let parsed = parse_document(r#"{ "a" : [ 1 , { "b" : null } ], "c": {} }"#).unwrap();
        assert_eq!(parsed.get("c"), Some(&ExtValue::Object(Default::default())));
        let ExtValue::Array(items) = parsed.get("a").unwrap() else {
            panic!("expected array");
        };
        assert_eq!(items[0], ExtValue::Int(1));
        assert!(items[1].get("b").unwrap().is_null());
    }

    #[test]
    fn test_reject_unterminated_string() {
        assert!(matches!(
            parse_document(r#""abc"#),
            Err(ExtJsonError::Syntax { .. })
        ));
    }

    #[test]
    fn test_reject_lone_low_surrogate() {
        assert!(parse_document(r#""\udc00""#).is_err());
    }

    #[test]
    fn test_parse_empty_string_and_control_char() {
        assert_eq!(parse_document(r#""""#).unwrap(), ExtValue::String(String::new()));
        assert!(parse_document("\"a\u{1}b\"").is_err());
    }

    #[test]
    fn test_reject_leading_zero() {
        assert!(parse_document("01").is_err());
        assert!(parse_document("[-01]").is_err());
        assert_eq!(parse_document("0.5").unwrap(), ExtValue::Float(0.5));
        assert_eq!(parse_document("-0").unwrap(), ExtValue::Int(0));
    }

    #[test]
    fn test_nesting_at_limit() {
        let text = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_document(&text).is_ok());
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let text = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
        let err = parse_document(&text).unwrap_err();
        assert_eq!(
            err,
            ExtJsonError::Syntax {
                offset: MAX_DEPTH,
                message: "recursion limit exceeded".to_string(),
            }
        );

        let objects = format!("{}1{}", r#"{"a":"#.repeat(MAX_DEPTH + 1), "}".repeat(MAX_DEPTH + 1));
        assert!(matches!(
            parse_document(&objects),
            Err(ExtJsonError::Syntax { message, .. }) if message == "recursion limit exceeded"
        ));
    }

    #[test]
    fn test_reject_bare_word() {
        assert!(parse_document("Inf").is_err());
    }
}
