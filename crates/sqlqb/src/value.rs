//! Bound parameter values and raw SQL fragments.
//!
//! [`Value`] is the tagged union carried through the builder for every bound
//! position: SET values, VALUES cells, condition right-hand sides, LIMIT and
//! OFFSET. At render time every non-raw value becomes one placeholder and one
//! entry in the ordered parameter list; [`Value::Raw`] is inlined verbatim
//! into the SQL text instead and never reaches the parameter list.

use bytes::BytesMut;
use chrono::{DateTime, Utc};
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A value bound to a statement parameter, or an opaque raw SQL fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Integer (encoded at the width the statement expects)
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Timestamp with time zone
    Timestamp(DateTime<Utc>),
    /// UUID
    Uuid(uuid::Uuid),
    /// JSON document
    Json(serde_json::Value),
    /// Ordered list, consumed by the IN / NOT IN operators
    List(Vec<Value>),
    /// Opaque raw SQL, inlined verbatim wherever a value position accepts it.
    ///
    /// Never parameterized, never escaped. The caller is responsible for its
    /// injection safety.
    Raw(String),
}

impl Value {
    /// Wrap an already-safe SQL fragment to be inlined without binding.
    pub fn raw(sql: impl Into<String>) -> Self {
        Value::Raw(sql.into())
    }

    /// Build a list value for IN / NOT IN from anything convertible.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Whether this value is an opaque raw fragment.
    pub fn is_raw(&self) -> bool {
        matches!(self, Value::Raw(_))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            // Adapt to the width the prepared statement declares.
            Value::Int(v) => match *ty {
                Type::INT2 => (*v as i16).to_sql(ty, out),
                Type::INT4 => (*v as i32).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Text(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
            Value::List(_) => Err("list values bind element-wise through IN".into()),
            Value::Raw(_) => Err("raw fragments are inlined, not bound".into()),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Variants are dynamic; each delegated encoding checks its own type.
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from(5i32), Value::Int(5));
        assert_eq!(Value::from(5i64), Value::Int(5));
        assert_eq!(Value::from("x"), Value::Text("x".to_string()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(Option::<i64>::None), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
    }

    #[test]
    fn list_conversion() {
        assert_eq!(
            Value::from(vec![1i64, 2, 3]),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn raw_is_flagged() {
        assert!(Value::raw("now()").is_raw());
        assert!(!Value::from(1i64).is_raw());
    }
}
