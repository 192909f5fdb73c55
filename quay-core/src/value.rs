use crate::{Result, invalid_argument};
use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use std::borrow::Cow;

/// Dynamically typed scalar moved between Rust code, rendered SQL and returned rows.
///
/// Values written into statements go through [`crate::SqlWriter::write_value`], values read back from
/// a driver land in [`crate::RowLabeled`]. Text-protocol drivers return most columns as bytes, the
/// `as_*` accessors decode both the typed and the textual representation.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Varchar(String),
    Blob(Box<[u8]>),
    /// Serialized to JSON text and escaped as a string.
    Json(serde_json::Value),
    /// `LAST_INSERT_ID()`, written verbatim.
    LastInsertId,
    /// Session variable reference (`@name`), written verbatim. Built by [`Value::variable`].
    Variable(VariableName),
}

/// Validated session variable name, only [`Value::variable`] can make one.
///
/// ```compile_fail
/// use quay_core::{Value, VariableName};
/// let value = Value::Variable(VariableName("@a; DROP TABLE t".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableName(Cow<'static, str>);

impl VariableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Value {
    /// Session variable reference, the name must start with `@`.
    pub fn variable(name: impl Into<Cow<'static, str>>) -> Result<Value> {
        let name = name.into();
        if !name.starts_with('@')
            || name.len() < 2
            || !name[1..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
        {
            invalid_argument!("`{}` is not a session variable name", name);
        }
        Ok(Value::Variable(VariableName(name)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(v) => Some(v),
            Value::Blob(v) => std::str::from_utf8(v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Boolean(v) => Some(*v as u64),
            Value::Int64(v) => u64::try_from(*v).ok(),
            Value::UInt64(v) => Some(*v),
            Value::Float64(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64 => {
                Some(*v as u64)
            }
            Value::Varchar(..) | Value::Blob(..) => {
                let text = self.as_str()?.trim().as_bytes();
                match u64::from_radix_10_checked(text) {
                    (Some(v), used) if used == text.len() && used > 0 => Some(v),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Boolean(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::Float64(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            Value::Varchar(..) | Value::Blob(..) => {
                let text = self.as_str()?.trim().as_bytes();
                match i64::from_radix_10_signed_checked(text) {
                    (Some(v), used) if used == text.len() && used > 0 => Some(v),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::UInt64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Varchar(..) | Value::Blob(..) => {
                fast_float::parse::<f64, _>(self.as_str()?.trim()).ok()
            }
            _ => None,
        }
    }
}

macro_rules! impl_from_value {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_value!(Int64, i64, i8, i16, i32, i64);
impl_from_value!(UInt64, u64, u8, u16, u32, u64, usize);
impl_from_value!(Float64, f64, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Varchar(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Varchar(value.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value.into())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.into())
    }
}

impl From<Box<[u8]>> for Value {
    fn from(value: Box<[u8]>) -> Self {
        Value::Blob(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
