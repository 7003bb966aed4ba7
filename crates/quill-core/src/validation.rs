// crates/quill-core/src/validation.rs
//
// Input schemas: decode raw JSON into typed, defaulted procedure inputs.
//
// Decoding never short-circuits on the first problem. Every field is read,
// every violation is recorded, and the caller gets the full list back in a
// single ValidationError. Nothing in here touches a store.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::ids::{parse_canonical_uuid, PostId, UserId};

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent.
    Missing,
    /// The field has the wrong JSON type.
    TypeMismatch { expected: String, found: String },
    /// String shorter than `min` characters.
    TooShort { min: usize },
    /// String longer than `max` characters.
    TooLong { max: usize },
    /// Number below `min`.
    TooSmall { min: u64 },
    /// Number above `max`.
    TooLarge { max: u64 },
    /// Number has a fractional part.
    NotAnInteger,
    /// String is not a canonical hyphenated UUID.
    InvalidUuid,
    /// String is not a plausible email address.
    InvalidEmail,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "required field is missing"),
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ViolationKind::TooShort { min } => {
                write!(f, "must contain at least {} character(s)", min)
            }
            ViolationKind::TooLong { max } => {
                write!(f, "must contain at most {} character(s)", max)
            }
            ViolationKind::TooSmall { min } => write!(f, "must be greater than or equal to {}", min),
            ViolationKind::TooLarge { max } => write!(f, "must be less than or equal to {}", max),
            ViolationKind::NotAnInteger => write!(f, "must be an integer"),
            ViolationKind::InvalidUuid => write!(f, "must be a UUID"),
            ViolationKind::InvalidEmail => write!(f, "must be an email address"),
        }
    }
}

/// One rejected field. An empty `path` refers to the input as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "input: {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// Every violation found while decoding one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Whether a violation was recorded for the given field path.
    pub fn has_violation(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// An input contract: decode raw JSON into `Self` or report every violation.
pub trait Schema: Sized {
    fn decode(raw: &Value) -> Result<Self, ValidationError>;
}

/// Character-count bounds for a string field.
#[derive(Debug, Clone, Copy)]
pub struct Length {
    pub min: usize,
    pub max: Option<usize>,
}

impl Length {
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }
}

/// JSON type name used in type-mismatch messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(expected: &str, found: &Value) -> ViolationKind {
    ViolationKind::TypeMismatch {
        expected: expected.to_string(),
        found: json_type_name(found).to_string(),
    }
}

fn check_string(value: &Value, bounds: Length) -> Result<String, ViolationKind> {
    let s = value.as_str().ok_or_else(|| type_mismatch("string", value))?;
    let len = s.chars().count();
    if len < bounds.min {
        return Err(ViolationKind::TooShort { min: bounds.min });
    }
    if let Some(max) = bounds.max {
        if len > max {
            return Err(ViolationKind::TooLong { max });
        }
    }
    Ok(s.to_string())
}

fn check_uuid(value: &Value) -> Result<Uuid, ViolationKind> {
    let s = value.as_str().ok_or_else(|| type_mismatch("string", value))?;
    parse_canonical_uuid(s).ok_or(ViolationKind::InvalidUuid)
}

fn check_positive_int(value: &Value, max: Option<u64>) -> Result<u64, ViolationKind> {
    let n = match value {
        Value::Number(n) => n,
        other => return Err(type_mismatch("number", other)),
    };

    let parsed = if let Some(u) = n.as_u64() {
        u
    } else if n.as_i64().is_some() {
        // Negative integer.
        return Err(ViolationKind::TooSmall { min: 1 });
    } else {
        let f = n.as_f64().unwrap_or(f64::NAN);
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(ViolationKind::NotAnInteger);
        }
        if f < 1.0 {
            return Err(ViolationKind::TooSmall { min: 1 });
        }
        // 2^64: the first value `as u64` would clamp.
        if f >= 18_446_744_073_709_551_616.0 {
            return Err(ViolationKind::TooLarge {
                max: max.unwrap_or(u64::MAX),
            });
        }
        f as u64
    };

    if parsed < 1 {
        return Err(ViolationKind::TooSmall { min: 1 });
    }
    if let Some(max) = max {
        if parsed > max {
            return Err(ViolationKind::TooLarge { max });
        }
    }
    Ok(parsed)
}

fn check_email(value: &Value) -> Result<String, ViolationKind> {
    let s = check_string(value, Length::between(3, 254))?;
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(s),
        _ => Err(ViolationKind::InvalidEmail),
    }
}

/// Field-by-field reader over a JSON object that accumulates violations.
///
/// Each accessor returns `None` when the field is invalid (or, for optional
/// fields, absent). Callers collect all fields first and then call
/// [`ObjectReader::finish`].
pub struct ObjectReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    violations: Vec<Violation>,
}

impl<'a> ObjectReader<'a> {
    /// Start reading `raw`. A non-object input yields a single root violation
    /// and every later accessor returns `None`.
    pub fn new(raw: &'a Value) -> Self {
        match raw {
            Value::Object(map) => Self {
                fields: Some(map),
                violations: Vec::new(),
            },
            other => Self {
                fields: None,
                violations: vec![Violation::new("", type_mismatch("object", other))],
            },
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.fields.and_then(|map| map.get(name))
    }

    fn record<T>(&mut self, name: &str, result: Result<T, ViolationKind>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(kind) => {
                self.violations.push(Violation::new(name, kind));
                None
            }
        }
    }

    fn required(&mut self, name: &str) -> Option<&'a Value> {
        let fields = self.fields?;
        match fields.get(name) {
            Some(v) => Some(v),
            None => {
                self.violations.push(Violation::new(name, ViolationKind::Missing));
                None
            }
        }
    }

    pub fn required_string(&mut self, name: &str, bounds: Length) -> Option<String> {
        let value = self.required(name)?;
        self.record(name, check_string(value, bounds))
    }

    pub fn optional_string(&mut self, name: &str, bounds: Length) -> Option<String> {
        let value = self.lookup(name)?;
        self.record(name, check_string(value, bounds))
    }

    pub fn optional_bool(&mut self, name: &str) -> Option<bool> {
        let value = self.lookup(name)?;
        let result = value.as_bool().ok_or_else(|| type_mismatch("boolean", value));
        self.record(name, result)
    }

    pub fn required_uuid(&mut self, name: &str) -> Option<Uuid> {
        let value = self.required(name)?;
        self.record(name, check_uuid(value))
    }

    pub fn optional_positive_int(&mut self, name: &str, max: Option<u64>) -> Option<u64> {
        let value = self.lookup(name)?;
        self.record(name, check_positive_int(value, max))
    }

    pub fn required_email(&mut self, name: &str) -> Option<String> {
        let value = self.required(name)?;
        self.record(name, check_email(value))
    }

    /// All violations recorded so far. Empty means every field decoded.
    pub fn finish(self) -> Vec<Violation> {
        self.violations
    }
}

/// Decode a bare JSON string holding a canonical UUID.
pub fn decode_uuid_string(raw: &Value) -> Result<Uuid, ValidationError> {
    check_uuid(raw).map_err(|kind| ValidationError::new(vec![Violation::new("", kind)]))
}

impl Schema for PostId {
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_uuid_string(raw).map(PostId::from_uuid)
    }
}

impl Schema for UserId {
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_uuid_string(raw).map(UserId::from_uuid)
    }
}
