//! Querent - a fluent SQL query builder with named bindings, pagination
//! links and an optional query log.
//!
//! A [`QueryBuilder`] borrows one [`Connection`], collects clauses through
//! chained calls and runs them with a terminal call (`get`, `first`,
//! `paginate`, `insert`, `update`, `delete`). Every terminal call resets the
//! builder, so it can be reused for the next statement.

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod log;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod operator;
pub mod paginator;
pub mod sql;
pub mod statement;
pub mod value;

// Re-export main types
pub use builder::{
    Condition, IntoColumns, IntoCondition, IntoFields, IntoSortDirection, JoinType, QueryBuilder,
    QueryState, SortDirection,
};
pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use executor::{Connection, Executed, Executor, Outcome};
pub use log::{LogEntry, MemoryQueryLog, QueryLog, TracingQueryLog};
#[cfg(feature = "mysql")]
pub use mysql::MySqlConnection;
pub use operator::{op, IntoOperator, Operator};
pub use paginator::{LinkStyle, Paginated, Pagination, PaginationOptions, Paginator};
pub use value::{Bindings, Row, Value};

/// Create a new query builder for the given table
pub fn table<'c, C: Connection>(connection: &'c C, name: &str) -> QueryBuilder<'c, C> {
    let mut builder = QueryBuilder::new(connection);
    builder.table(name);
    builder
}
