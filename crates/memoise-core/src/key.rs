//! Dynamic argument keys.
//!
//! Generic callers key the cache by their own `Eq + Hash` argument type. When
//! arguments arrive untyped (JSON from the CLI, mixed-type variadic calls)
//! they are normalised into [`ArgKey`] first.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{MemoError, MemoResult};

/// A single argument usable as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    Null,
    Bool(bool),
    Int(i64),
    /// Only for values above `i64::MAX`.
    UInt(u64),
    /// Bit pattern of a finite, non-integral float.
    Float(u64),
    Str(String),
}

impl ArgKey {
    /// Convert one JSON value. `position` is only used for error reporting.
    pub fn from_json(position: usize, value: &Value) -> MemoResult<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::String(s) => Ok(Self::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else {
                    let f = n.as_f64().ok_or(MemoError::NonFiniteKey { position })?;
                    Self::from_f64(position, f)
                }
            }
            Value::Array(_) => Err(MemoError::UnhashableArgument {
                position,
                kind: "array".into(),
            }),
            Value::Object(_) => Err(MemoError::UnhashableArgument {
                position,
                kind: "object".into(),
            }),
        }
    }

    /// Convert a float. Integral values collapse onto `Int` (or `UInt` above
    /// `i64::MAX`) so `2.0` and `2` share a cache entry, and `-0.0` equals `0.0`.
    pub fn from_f64(position: usize, f: f64) -> MemoResult<Self> {
        if f.is_nan() {
            return Err(MemoError::NonFiniteKey { position });
        }
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Ok(Self::Int(f as i64));
        }
        if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
            return Ok(Self::UInt(f as u64));
        }
        Ok(Self::Float(f.to_bits()))
    }

    /// Convert a whole argument list, failing on the first unusable argument.
    pub fn from_json_args(values: &[Value]) -> MemoResult<Vec<Self>> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Self::from_json(i, v))
            .collect()
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            Self::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::UInt(u) => Value::from(*u),
            Self::Float(bits) => Value::from(f64::from_bits(*bits)),
            Self::Str(s) => Value::String(s.clone()),
        }
    }
}

impl Serialize for ArgKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::UInt(u) => write!(f, "{}", u),
            Self::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Self::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for ArgKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ArgKey {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ArgKey {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ArgKey {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_convert() {
        let args = ArgKey::from_json_args(&[json!(1), json!("a"), json!(true), json!(null)]).unwrap();
        assert_eq!(
            args,
            vec![
                ArgKey::Int(1),
                ArgKey::Str("a".into()),
                ArgKey::Bool(true),
                ArgKey::Null
            ]
        );
    }

    #[test]
    fn test_integral_float_matches_int() {
        assert_eq!(ArgKey::from_json(0, &json!(2.0)).unwrap(), ArgKey::Int(2));
        assert_eq!(ArgKey::from_f64(0, -0.0).unwrap(), ArgKey::Int(0));
        assert!(matches!(
            ArgKey::from_json(0, &json!(2.5)).unwrap(),
            ArgKey::Float(_)
        ));
        assert_eq!(
            ArgKey::from_json(0, &json!(1e19)).unwrap(),
            ArgKey::from_json(0, &json!(10_000_000_000_000_000_000u64)).unwrap()
        );
        assert_eq!(
            ArgKey::from_f64(0, 9_223_372_036_854_775_808.0).unwrap(),
            ArgKey::UInt(1 << 63)
        );
    }

    #[test]
    fn test_large_unsigned_kept_distinct() {
        let big = ArgKey::from_json(0, &json!(u64::MAX)).unwrap();
        assert_eq!(big, ArgKey::UInt(u64::MAX));
        assert_eq!(big.to_json(), json!(u64::MAX));
    }

    #[test]
    fn test_containers_rejected_with_position() {
        let err = ArgKey::from_json_args(&[json!(1), json!([1, 2])]).unwrap_err();
        match err {
            MemoError::UnhashableArgument { position, kind } => {
                assert_eq!(position, 1);
                assert_eq!(kind, "array");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = ArgKey::from_json(3, &json!({"a": 1})).unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_nan_rejected() {
        let err = ArgKey::from_f64(4, f64::NAN).unwrap_err();
        assert!(matches!(err, MemoError::NonFiniteKey { position: 4 }));
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(ArgKey::from("x").to_string(), "\"x\"");
        assert_eq!(ArgKey::Int(-3).to_string(), "-3");
    }
}
