//! Statement execution and the connection interface

use std::future::Future;
use std::time::{Duration, Instant};

use crate::builder::state::QueryState;
use crate::paginator::{Pagination, Paginator};
use crate::statement::{FetchMode, Statement, StatementKind};
use crate::{sql, Bindings, Error, Result, Row};

/// Count query issued after a paginated select
pub const FOUND_ROWS_SQL: &str = "SELECT FOUND_ROWS()";

/// What a write statement reports back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: u64,
    /// Identifier generated by the last insert on this session, 0 if none
    pub last_insert_id: u64,
}

/// A database session able to run parameterized statements.
///
/// SQL uses named `:name` placeholders resolved from `bindings`. Preparing,
/// binding and reading the last insert id happen inside these calls.
pub trait Connection: Send + Sync {
    /// Run a statement that returns no rows (INSERT, UPDATE, DELETE)
    fn execute(&self, sql: &str, bindings: &Bindings) -> impl Future<Output = Result<Executed>> + Send;

    /// Run a query and return every row
    fn fetch_all(&self, sql: &str, bindings: &Bindings) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Run a query and return its first row, if any
    fn fetch_optional(
        &self,
        sql: &str,
        bindings: &Bindings,
    ) -> impl Future<Output = Result<Option<Row>>> + Send;

    /// Run a `SQL_CALC_FOUND_ROWS` select, then [`FOUND_ROWS_SQL`] on the same
    /// session with no other statement in between.
    ///
    /// Returns the rows and the count the select would have matched without LIMIT.
    fn fetch_page(
        &self,
        sql: &str,
        bindings: &Bindings,
    ) -> impl Future<Output = Result<(Vec<Row>, u64)>> + Send;
}

/// Result of one executed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Inserted {
        id: u64,
        rows_affected: u64,
        sql: String,
        duration: Duration,
    },
    Written {
        rows_affected: u64,
        sql: String,
        duration: Duration,
    },
    Selected {
        rows: Vec<Row>,
        pagination: Option<Pagination>,
        sql: String,
        duration: Duration,
    },
}

impl Outcome {
    /// The statement as sent, placeholders included
    pub fn sql(&self) -> &str {
        match self {
            Outcome::Inserted { sql, .. } | Outcome::Written { sql, .. } | Outcome::Selected { sql, .. } => sql,
        }
    }

    /// Time spent in the database call
    pub fn duration(&self) -> Duration {
        match self {
            Outcome::Inserted { duration, .. }
            | Outcome::Written { duration, .. }
            | Outcome::Selected { duration, .. } => *duration,
        }
    }

    pub fn rows_affected(&self) -> u64 {
        match self {
            Outcome::Inserted { rows_affected, .. } | Outcome::Written { rows_affected, .. } => *rows_affected,
            Outcome::Selected { rows, .. } => rows.len() as u64,
        }
    }

    /// Generated id of an insert, 0 for anything else
    pub fn inserted_id(&self) -> u64 {
        match self {
            Outcome::Inserted { id, .. } => *id,
            _ => 0,
        }
    }

    pub fn into_selected(self) -> Result<(Vec<Row>, Option<Pagination>)> {
        match self {
            Outcome::Selected { rows, pagination, .. } => Ok((rows, pagination)),
            other => Err(Error::execution(format!(
                "Expected rows from a select, got the result of: {}",
                other.sql()
            ))),
        }
    }
}

/// Validates, assembles and runs statements against a connection
pub struct Executor<'c, C> {
    connection: &'c C,
}

impl<'c, C: Connection> Executor<'c, C> {
    pub fn new(connection: &'c C) -> Self {
        Self { connection }
    }

    /// Run `statement` for the given state.
    ///
    /// A chain error deferred in the state is reported before anything else.
    pub async fn execute<S>(&self, statement: &S, state: &QueryState) -> Result<Outcome>
    where
        S: Statement + ?Sized,
    {
        if let Some(message) = &state.argument_error {
            return Err(Error::argument(message.clone()));
        }

        let lead = statement.handle(state)?;
        if state.is_paginated() && state.limit == 0 {
            return Err(Error::configuration("Pagination requires a limit greater than zero"));
        }
        let sql = sql::assemble(&lead.sql, state);

        let started = Instant::now();
        let outcome = match lead.kind {
            StatementKind::Select(fetch) => {
                let (rows, found) = match (fetch, state.is_paginated()) {
                    (_, true) => {
                        let (rows, found) = self.connection.fetch_page(&sql, &state.bindings).await?;
                        (rows, Some(found))
                    }
                    (FetchMode::All, false) => {
                        (self.connection.fetch_all(&sql, &state.bindings).await?, None)
                    }
                    (FetchMode::One, false) => {
                        let row = self.connection.fetch_optional(&sql, &state.bindings).await?;
                        (row.into_iter().collect(), None)
                    }
                };
                let duration = started.elapsed();
                let pagination = found.and_then(|found| paginate(state, found));

                Outcome::Selected {
                    rows,
                    pagination,
                    sql,
                    duration,
                }
            }
            StatementKind::Insert => {
                let executed = self.connection.execute(&sql, &state.bindings).await?;
                Outcome::Inserted {
                    id: executed.last_insert_id,
                    rows_affected: executed.rows_affected,
                    sql,
                    duration: started.elapsed(),
                }
            }
            StatementKind::Update | StatementKind::Delete => {
                let executed = self.connection.execute(&sql, &state.bindings).await?;
                Outcome::Written {
                    rows_affected: executed.rows_affected,
                    sql,
                    duration: started.elapsed(),
                }
            }
        };

        tracing::debug!(
            target: "querent::sql",
            kind = ?lead.kind,
            sql = %outcome.sql(),
            bind_count = state.bindings.len(),
            rows = outcome.rows_affected(),
            elapsed_ms = outcome.duration().as_secs_f64() * 1000.0,
        );

        Ok(outcome)
    }
}

fn paginate(state: &QueryState, found: u64) -> Option<Pagination> {
    let options = state.pagination.as_ref()?;
    let total_pages = found.div_ceil(state.limit);

    tracing::debug!(
        target: "querent::sql",
        sql = FOUND_ROWS_SQL,
        found,
        total_pages,
    );

    let pagination = Paginator::new(
        total_pages,
        options.per_page,
        options.resolved_current_page(),
        options.path.clone(),
    )
    .query_string(options.query_string.clone())
    .style(options.style.clone())
    .handle();

    Some(pagination)
}
