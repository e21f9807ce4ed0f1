//! Transaction passthrough.
//!
//! A [`Transaction`] implements [`Executor`], so any builder chain runs
//! unchanged inside one. Dropping it without calling [`Transaction::commit`]
//! rolls back.

use crate::client::{ExecResult, Executor, run_statement};
use crate::error::QbResult;
use crate::value::Value;

/// An open database transaction.
pub struct Transaction<'a> {
    inner: tokio_postgres::Transaction<'a>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(inner: tokio_postgres::Transaction<'a>) -> Self {
        Self { inner }
    }

    /// Commit the transaction.
    pub async fn commit(self) -> QbResult<()> {
        self.inner.commit().await?;
        Ok(())
    }

    /// Roll the transaction back explicitly.
    pub async fn rollback(self) -> QbResult<()> {
        self.inner.rollback().await?;
        Ok(())
    }
}

impl Executor for Transaction<'_> {
    async fn execute(&self, sql: &str, params: &[Value]) -> QbResult<ExecResult> {
        run_statement(&self.inner, sql, params).await
    }
}
