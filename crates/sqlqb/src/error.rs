//! Error types for sqlqb

use crate::parts::StatementType;
use thiserror::Error;

/// Result type alias for sqlqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum QbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// The active dialect declares no part order for the statement type
    #[error("Dialect '{dialect}' does not support {statement} statements")]
    UnsupportedStatement {
        dialect: &'static str,
        statement: StatementType,
    },

    /// A condition operand has the wrong shape (e.g. non-list IN operand)
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl QbError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an invalid-operand error
    pub fn invalid_operand(message: impl Into<String>) -> Self {
        Self::InvalidOperand(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is an unsupported-statement error
    pub fn is_unsupported_statement(&self) -> bool {
        matches!(self, Self::UnsupportedStatement { .. })
    }

    /// Check if this is an invalid-operand error
    pub fn is_invalid_operand(&self) -> bool {
        matches!(self, Self::InvalidOperand(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for QbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
