//! Single-record inference input

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell of an inference record.
///
/// Deserializes from plain JSON scalars: `null`, booleans, integers, floats
/// and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// A single employee row: column name to value.
pub type Record = HashMap<String, Scalar>;

impl Scalar {
    /// Coerce to the string form used for categorical lookups.
    ///
    /// Returns `None` for `Null`.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Coerce to a numeric model input.
    ///
    /// `Ok(None)` means the value is null and the caller should fall back to
    /// the default.
    pub fn as_numeric(&self) -> Result<Option<f64>, String> {
        let value = match self {
            Scalar::Null => return Ok(None),
            Scalar::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Scalar::Int(n) => *n as f64,
            Scalar::Float(f) => *f,
            Scalar::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a valid number", s))?,
        };

        if !value.is_finite() {
            return Err(format!("{} is not a finite number", value));
        }
        Ok(Some(value))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}
