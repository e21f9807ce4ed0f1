//! Row mapping.
//!
//! Returned rows are plain `tokio_postgres::Row`s; [`FromRow`] maps them
//! into user types.

use crate::error::{QbError, QbResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Map a database row into `Self`.
///
/// ```
/// use sqlqb::{FromRow, QbResult};
/// use tokio_postgres::Row;
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &Row) -> QbResult<Self> {
///         Ok(User {
///             id: sqlqb::row::get(row, "id")?,
///             name: sqlqb::row::get(row, "name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> QbResult<Self>;
}

/// Fetch one column by name, mapping failures to a decode error.
pub fn get<'a, T>(row: &'a Row, column: &str) -> QbResult<T>
where
    T: FromSql<'a>,
{
    row.try_get(column)
        .map_err(|e| QbError::decode(column, e.to_string()))
}

/// Fetch one column by index, mapping failures to a decode error.
pub fn get_idx<'a, T>(row: &'a Row, idx: usize) -> QbResult<T>
where
    T: FromSql<'a>,
{
    row.try_get(idx)
        .map_err(|e| QbError::decode(idx.to_string(), e.to_string()))
}
