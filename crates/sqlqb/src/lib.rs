//! # sqlqb
//!
//! A dialect-aware SQL statement builder for Rust.
//!
//! ## Features
//!
//! - **One accumulator, four verbs**: a single fluent [`Builder`] collects
//!   clause parts; calling `insert`/`delete`/`update`/`select` picks the
//!   statement shape
//! - **Pluggable grammar**: per-clause rendering rules live in a lookup
//!   table; a dialect copies the base table and overrides only the entries
//!   whose syntax differs
//! - **Placeholder discipline**: the ordered parameter list always matches
//!   the left-to-right placeholder order of the rendered SQL
//! - **Raw fragments**: [`Value::raw`] inlines already-safe SQL verbatim,
//!   never parameterized
//! - **Thin execution layer**: an [`Executor`] seam over tokio-postgres,
//!   with transactions and (optionally) pooled connections
//!
//! ## Building statements
//!
//! ```
//! use sqlqb::{Builder, Direction, Op};
//!
//! let (sql, params) = Builder::postgres()
//!     .select(["id", "username"])
//!     .from(["users"])
//!     .filter("status", Op::Eq, "active")
//!     .order_by("created_at", Direction::Desc)
//!     .limit(20)
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, username FROM users WHERE status = $1 \
//!      ORDER BY created_at DESC LIMIT $2"
//! );
//! assert_eq!(params.len(), 2);
//! ```
//!
//! ## Executing them
//!
//! ```ignore
//! use sqlqb::{Builder, Connection, Op};
//!
//! let conn = Connection::connect("postgres://app@localhost/app").await?;
//!
//! let result = Builder::postgres()
//!     .insert("users")
//!     .values([("username", "alice")])
//!     .returning(["id"])
//!     .execute(&conn)
//!     .await?;
//! ```

pub mod builder;
pub mod client;
pub mod cond;
pub mod config;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod parts;
pub mod row;
pub mod transaction;
pub mod value;

pub use builder::Builder;
pub use client::{Connection, ExecResult, Executor};
pub use cond::{Cond, Connector, Direction, Join, JoinKind, OnExpr, Op};
pub use config::ConnectConfig;
pub use dialect::{Dialect, PartOrders};
pub use error::{QbError, QbResult};
pub use grammar::{Fragment, Grammar, PlaceholderStyle, Placeholders};
pub use parts::{ConflictAction, Part, StatementType, ValueRow};
pub use row::FromRow;
pub use transaction::Transaction;
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
