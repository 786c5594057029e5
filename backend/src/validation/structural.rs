use std::num::IntErrorKind;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::Item;

// ── Field-error descriptors ───────────────────────────────────────────────────

/// One step of an error location: an object key or a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Offset(usize),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(offset: usize) -> Self {
        LocSegment::Offset(offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    StringType,
    IntType,
    IntFromFloat,
    IntParsingSize,
    IntParsing,
    ModelType,
    JsonInvalid { error: String },
    BodyUnreadable,
}

impl FieldErrorKind {
    /// Stable machine-readable code, emitted as the descriptor's `type`.
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::StringType => "string_type",
            FieldErrorKind::IntType => "int_type",
            FieldErrorKind::IntFromFloat => "int_from_float",
            FieldErrorKind::IntParsingSize => "int_parsing_size",
            FieldErrorKind::IntParsing => "int_parsing",
            FieldErrorKind::ModelType => "model_attributes_type",
            FieldErrorKind::JsonInvalid { .. } => "json_invalid",
            FieldErrorKind::BodyUnreadable => "body_unreadable",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "Field required",
            FieldErrorKind::StringType => "Input should be a valid string",
            FieldErrorKind::IntType => "Input should be a valid integer",
            FieldErrorKind::IntFromFloat => {
                "Input should be a valid integer, got a number with a fractional part"
            }
            FieldErrorKind::IntParsingSize => {
                "Unable to parse input string as an integer, exceeded maximum size"
            }
            FieldErrorKind::IntParsing => {
                "Input should be a valid integer, unable to parse string as an integer"
            }
            FieldErrorKind::ModelType => {
                "Input should be a valid dictionary or object to extract fields from"
            }
            FieldErrorKind::JsonInvalid { .. } => "JSON decode error",
            FieldErrorKind::BodyUnreadable => "Request body could not be read",
        }
    }
}

/// A single structural failure: what went wrong, where, and with which input.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub loc: Vec<LocSegment>,
    pub input: Option<Value>,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, loc: Vec<LocSegment>) -> Self {
        Self {
            kind,
            loc,
            input: None,
        }
    }

    pub fn in_body(kind: FieldErrorKind, field: &str) -> Self {
        Self::new(kind, vec!["body".into(), field.into()])
    }

    pub fn in_path(kind: FieldErrorKind, param: &str) -> Self {
        Self::new(kind, vec!["path".into(), param.into()])
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }
}

#[derive(Serialize)]
struct Descriptor<'a> {
    #[serde(rename = "type")]
    code: &'static str,
    loc: &'a [LocSegment],
    msg: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ctx: Option<Value>,
}

impl Serialize for FieldError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = match &self.kind {
            FieldErrorKind::JsonInvalid { error } => Some(json!({ "error": error })),
            _ => None,
        };
        Descriptor {
            code: self.kind.code(),
            loc: &self.loc,
            msg: self.kind.message(),
            input: self.input.as_ref(),
            ctx,
        }
        .serialize(serializer)
    }
}

// ── Body decoding ─────────────────────────────────────────────────────────────

/// Parses a raw request body as JSON.
///
/// An empty body reports `body` as missing; malformed JSON reports the byte
/// offset where parsing stopped.
pub fn parse_body(bytes: &[u8]) -> Result<Value, FieldError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FieldError::new(FieldErrorKind::Missing, vec!["body".into()]));
    }

    serde_json::from_slice(bytes).map_err(|e| {
        let offset = byte_offset(bytes, e.line(), e.column());
        FieldError::new(
            FieldErrorKind::JsonInvalid {
                error: e.to_string(),
            },
            vec!["body".into(), offset.into()],
        )
    })
}

fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = bytes
        .split(|&b| b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    (line_start + column.saturating_sub(1)).min(bytes.len())
}

/// Typed decoding of a JSON payload that reports every failing field.
pub trait FromPayload: Sized {
    fn from_payload(value: &Value) -> Result<Self, Vec<FieldError>>;
}

impl FromPayload for Item {
    fn from_payload(value: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = value.as_object() else {
            return Err(vec![FieldError::new(
                FieldErrorKind::ModelType,
                vec!["body".into()],
            )
            .with_input(value.clone())]);
        };

        let mut errors = Vec::new();
        let name = string_field(object, "name", &mut errors);
        let quantity = integer_field(object, "quantity", &mut errors);

        match (name, quantity) {
            (Some(name), Some(quantity)) if errors.is_empty() => Ok(Item::new(name, quantity)),
            _ => Err(errors),
        }
    }
}

fn required<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Value> {
    let value = object.get(field);
    if value.is_none() {
        errors.push(
            FieldError::in_body(FieldErrorKind::Missing, field)
                .with_input(Value::Object(object.clone())),
        );
    }
    value
}

fn string_field(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match required(object, field, errors)? {
        Value::String(s) => Some(s.clone()),
        other => {
            errors.push(
                FieldError::in_body(FieldErrorKind::StringType, field).with_input(other.clone()),
            );
            None
        }
    }
}

fn integer_field(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let value = required(object, field, errors)?;
    match as_integer(value) {
        Ok(i) => Some(i),
        Err(kind) => {
            errors.push(FieldError::in_body(kind, field).with_input(value.clone()));
            None
        }
    }
}

/// Accepts JSON integers in i64 range, floats without a fractional part and
/// strings holding a base-10 integer.
fn as_integer(value: &Value) -> Result<i64, FieldErrorKind> {
    let n = match value {
        Value::Number(n) => n,
        Value::String(s) => return integer_from_str(s),
        _ => return Err(FieldErrorKind::IntType),
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(FieldErrorKind::IntParsingSize);
    }
    match n.as_f64() {
        Some(f) if f.fract() != 0.0 => Err(FieldErrorKind::IntFromFloat),
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(FieldErrorKind::IntParsingSize),
    }
}

fn integer_from_str(s: &str) -> Result<i64, FieldErrorKind> {
    s.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => FieldErrorKind::IntParsingSize,
        _ => FieldErrorKind::IntParsing,
    })
}

// ── Path parameters ───────────────────────────────────────────────────────────

/// Parses a signed integer path parameter.
///
/// Integer literals too large for i64 saturate instead of failing, so they
/// fall out of any index range rather than reading as malformed input.
pub fn parse_path_integer(param: &str, raw: &str) -> Result<i64, FieldError> {
    match raw.parse::<i64>() {
        Ok(i) => Ok(i),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(FieldError::in_path(FieldErrorKind::IntParsing, param)
                .with_input(Value::String(raw.to_string()))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.kind.code()).collect()
    }

    #[test]
    fn decodes_valid_item_and_ignores_extra_fields() {
        let value = json!({ "name": "Apples", "quantity": 3, "colour": "red" });
        assert_eq!(Item::from_payload(&value).unwrap(), Item::new("Apples", 3));
    }

    #[test]
    fn missing_name_is_reported_against_the_field() {
        let errors = Item::from_payload(&json!({ "quantity": 3 })).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, FieldErrorKind::Missing);
        assert_eq!(errors[0].loc, vec![LocSegment::from("body"), "name".into()]);
    }

    #[test]
    fn both_fields_missing_are_listed_in_declaration_order() {
        let errors = Item::from_payload(&json!({})).unwrap_err();
        assert_eq!(codes(&errors), vec!["missing", "missing"]);
        assert_eq!(errors[0].loc[1], LocSegment::from("name"));
        assert_eq!(errors[1].loc[1], LocSegment::from("quantity"));
    }

    #[test]
    fn wrong_types_collect_every_failure() {
        let errors = Item::from_payload(&json!({ "name": 123, "quantity": "abc" })).unwrap_err();
        assert_eq!(codes(&errors), vec!["string_type", "int_parsing"]);
        assert_eq!(errors[0].input, Some(json!(123)));
        assert_eq!(errors[1].input, Some(json!("abc")));
    }

    #[test]
    fn quantity_rejects_null_bool_and_fractions() {
        for (quantity, code) in [
            (json!(null), "int_type"),
            (json!(true), "int_type"),
            (json!([1]), "int_type"),
            (json!(2.5), "int_from_float"),
            (json!(18446744073709551615u64), "int_parsing_size"),
        ] {
            let errors =
                Item::from_payload(&json!({ "name": "Apples", "quantity": quantity })).unwrap_err();
            assert_eq!(codes(&errors), vec![code], "quantity = {quantity}");
        }
    }

    #[test]
    fn quantity_accepts_numeric_strings() {
        for (quantity, expected) in [(json!("5"), 5), (json!(" 12 "), 12), (json!("-3"), -3)] {
            let item =
                Item::from_payload(&json!({ "name": "Apples", "quantity": quantity })).unwrap();
            assert_eq!(item.quantity, expected);
        }
    }

    #[test]
    fn quantity_rejects_non_numeric_and_oversized_strings() {
        for (quantity, code) in [
            (json!("abc"), "int_parsing"),
            (json!(""), "int_parsing"),
            (json!("2.5"), "int_parsing"),
            (json!("99999999999999999999"), "int_parsing_size"),
        ] {
            let errors =
                Item::from_payload(&json!({ "name": "Apples", "quantity": quantity })).unwrap_err();
            assert_eq!(codes(&errors), vec![code], "quantity = {quantity}");
            assert_eq!(errors[0].input, Some(quantity));
        }
    }

    #[test]
    fn quantity_accepts_integral_float() {
        let item = Item::from_payload(&json!({ "name": "Apples", "quantity": 4.0 })).unwrap();
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn non_object_payload_is_a_model_error() {
        let errors = Item::from_payload(&json!(["Apples", 3])).unwrap_err();
        assert_eq!(codes(&errors), vec!["model_attributes_type"]);
        assert_eq!(errors[0].loc, vec![LocSegment::from("body")]);
    }

    #[test]
    fn empty_body_is_missing() {
        let err = parse_body(b"  ").unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::Missing);
        assert_eq!(err.loc, vec![LocSegment::from("body")]);
    }

    #[test]
    fn malformed_json_reports_offset_and_parser_message() {
        let err = parse_body(b"{\"name\": \"Apples\",\n  oops}").unwrap_err();
        assert_eq!(err.kind.code(), "json_invalid");
        assert_eq!(err.loc[0], LocSegment::from("body"));
        assert!(matches!(err.loc[1], LocSegment::Offset(offset) if offset > 18));

        let rendered = serde_json::to_value(&err).unwrap();
        assert_eq!(rendered["msg"], "JSON decode error");
        assert!(rendered["ctx"]["error"].as_str().unwrap().contains("line 2"));
    }

    #[test]
    fn descriptor_shape() {
        let err = FieldError::in_body(FieldErrorKind::StringType, "name").with_input(json!(123));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "type": "string_type",
                "loc": ["body", "name"],
                "msg": "Input should be a valid string",
                "input": 123,
            })
        );
    }

    #[test]
    fn path_integer_parsing() {
        assert_eq!(parse_path_integer("index", "0").unwrap(), 0);
        assert_eq!(parse_path_integer("index", "-1").unwrap(), -1);
        assert_eq!(
            parse_path_integer("index", "99999999999999999999").unwrap(),
            i64::MAX
        );
        assert_eq!(
            parse_path_integer("index", "-99999999999999999999").unwrap(),
            i64::MIN
        );

        let err = parse_path_integer("index", "abc").unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::IntParsing);
        assert_eq!(err.loc, vec![LocSegment::from("path"), "index".into()]);
        assert_eq!(err.input, Some(json!("abc")));
    }
}
