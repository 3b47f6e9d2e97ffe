//! Statement validators.
//!
//! Each statement kind checks that the accumulated state makes sense for it
//! and renders the leading part of the SQL (`SELECT ... FROM t`,
//! `INSERT INTO t ...`, ...). The clauses that follow are added by
//! [`crate::sql::assemble`].

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

use crate::builder::state::QueryState;
use crate::Result;

/// How many rows a SELECT should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    All,
    One,
}

/// The kind of statement a validator produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select(FetchMode),
    Insert,
    Update,
    Delete,
}

/// The leading SQL fragment plus what the executor needs to know to run it
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub sql: String,
    pub kind: StatementKind,
}

/// A statement validator
pub trait Statement {
    /// Validate `state` for this statement kind and render its lead fragment
    fn handle(&self, state: &QueryState) -> Result<Lead>;
}

pub(crate) fn has_projection(state: &QueryState) -> bool {
    state
        .select
        .as_deref()
        .is_some_and(|fields| !fields.trim().is_empty())
}
