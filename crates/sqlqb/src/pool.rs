//! Connection pool utilities

use crate::client::{ExecResult, Executor, run_statement};
use crate::error::{QbError, QbResult};
use crate::value::Value;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a database URL.
///
/// Uses `NoTls` and small defaults, suitable for local/dev.
pub fn create_pool(database_url: &str) -> QbResult<Pool> {
    create_pool_with_config(database_url, 16)
}

/// Create a connection pool with a custom maximum size.
pub fn create_pool_with_config(database_url: &str, max_size: usize) -> QbResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| QbError::connection(e.to_string()))?;

    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| QbError::Pool(e.to_string()))
}

impl Executor for deadpool_postgres::Client {
    async fn execute(&self, sql: &str, params: &[Value]) -> QbResult<ExecResult> {
        let client: &tokio_postgres::Client = self;
        run_statement(client, sql, params).await
    }
}
