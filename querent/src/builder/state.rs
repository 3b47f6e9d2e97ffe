//! The accumulated state of one builder chain

use super::common::{JoinClause, JoinType};
use crate::paginator::PaginationOptions;
use crate::Bindings;

/// Everything a chain has collected so far.
///
/// Filter fragments only ever reference placeholders; the raw values live in
/// `bindings`. A terminal call takes the whole state out of the builder and
/// leaves `QueryState::default()` behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub table: String,
    pub select: Option<String>,
    pub distinct: bool,
    /// Ask the server to remember the unlimited row count (set by `paginate`)
    pub calc_found_rows: bool,
    pub joins: Vec<JoinClause>,
    pub wheres: Vec<String>,
    pub or_wheres: Vec<String>,
    pub bindings: Bindings,
    pub group_by: Vec<String>,
    pub having: Option<String>,
    pub order_by: Vec<String>,
    /// 0 means no LIMIT
    pub limit: u64,
    /// 0 means no OFFSET
    pub offset: u64,
    /// `Some` while pagination is active
    pub pagination: Option<PaginationOptions>,
    /// Column name and its placeholder, in call order
    pub insert: Vec<(String, String)>,
    /// Rendered `column = :column` assignments
    pub update: Vec<String>,
    /// First malformed chain call, reported by the next terminal call
    pub argument_error: Option<String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins of one kind, in the order they were added
    pub fn joins_of(&self, join_type: JoinType) -> impl Iterator<Item = &JoinClause> {
        self.joins
            .iter()
            .filter(move |join| join.join_type == join_type)
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }

    /// Remember the first chain error only; later ones are usually fallout
    pub(crate) fn defer_error(&mut self, error: crate::Error) {
        if self.argument_error.is_none() {
            let message = match error {
                crate::Error::Argument { message } => message,
                other => other.to_string(),
            };
            self.argument_error = Some(message);
        }
    }
}
