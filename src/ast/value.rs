use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Literal values carried by literal expressions and pin defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Number(f64),
    Bool(bool),
    String(String),
    Null,
}

// Manual implementation to handle f64
impl Eq for LiteralValue {}

// Manual implementation to handle f64 by hashing its bits
impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::Number(n) => n.to_bits().hash(state),
            LiteralValue::Bool(b) => b.hash(state),
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Null => {} // Null has no data to hash
        }
    }
}

impl LiteralValue {
    /// Interprets an open property-bag value as a literal.
    pub fn from_json(value: &serde_json::Value) -> Self {
        if let Some(n) = value.as_f64() {
            LiteralValue::Number(n)
        } else if let Some(b) = value.as_bool() {
            LiteralValue::Bool(b)
        } else if let Some(s) = value.as_str() {
            LiteralValue::String(s.to_string())
        } else {
            LiteralValue::Null
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            LiteralValue::Number(n) => serde_json::json!(n),
            LiteralValue::Bool(b) => serde_json::json!(b),
            LiteralValue::String(s) => serde_json::json!(s),
            LiteralValue::Null => serde_json::Value::Null,
        }
    }

    /// Name of the literal's data type, used when no explicit type
    /// annotation is present.
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralValue::Number(_) => "number",
            LiteralValue::Bool(_) => "boolean",
            LiteralValue::String(_) => "string",
            LiteralValue::Null => "null",
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            LiteralValue::Bool(b) => write!(f, "{}", b),
            LiteralValue::String(s) => write!(f, "\"{}\"", s),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}
