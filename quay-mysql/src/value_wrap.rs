use quay_core::Value;
use std::fmt::Write;

/// Decodes the values sent by the server. The text protocol delivers almost everything as bytes, the
/// typed variants only show up for binary results.
pub(crate) struct ValueWrap(pub(crate) Value);

impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = mysql_async::FromValueError;
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(ValueWrap(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => Value::Blob(v.into()),
            mysql_async::Value::Int(v) => Value::Int64(v),
            mysql_async::Value::UInt(v) => Value::UInt64(v),
            mysql_async::Value::Float(v) => Value::Float64(v.into()),
            mysql_async::Value::Double(v) => Value::Float64(v),
            mysql_async::Value::Date(year, month, day, hour, minute, second, micro) => {
                let mut out = format!("{:04}-{:02}-{:02}", year, month, day);
                if (hour, minute, second, micro) != (0, 0, 0, 0) {
                    let _ = write!(out, " {:02}:{:02}:{:02}", hour, minute, second);
                    if micro != 0 {
                        let _ = write!(out, ".{:06}", micro);
                    }
                }
                Value::Varchar(out)
            }
            mysql_async::Value::Time(negative, days, hours, minutes, seconds, micro) => {
                let hours = days as u64 * 24 + hours as u64;
                let mut out = String::new();
                if negative {
                    out.push('-');
                }
                let _ = write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds);
                if micro != 0 {
                    let _ = write!(out, ".{:06}", micro);
                }
                Value::Varchar(out)
            }
        }))
    }
}
