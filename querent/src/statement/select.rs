//! SELECT statement validator

use super::{has_projection, FetchMode, Lead, Statement, StatementKind};
use crate::builder::state::QueryState;
use crate::{Error, Result};

/// Validates and renders `SELECT [DISTINCT] <fields> FROM <table>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Select {
    pub fetch: FetchMode,
}

impl Select {
    /// Fetch every matching row
    pub fn all() -> Self {
        Self {
            fetch: FetchMode::All,
        }
    }

    /// Fetch at most one row
    pub fn one() -> Self {
        Self {
            fetch: FetchMode::One,
        }
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::all()
    }
}

impl Statement for Select {
    fn handle(&self, state: &QueryState) -> Result<Lead> {
        let fields = match state.select.as_deref() {
            Some(fields) if has_projection(state) => fields,
            _ => return Err(Error::configuration("The select method has not been defined")),
        };

        let mut sql = String::from("SELECT");
        if state.distinct {
            sql.push_str(" DISTINCT");
        }
        if state.calc_found_rows {
            sql.push_str(" SQL_CALC_FOUND_ROWS");
        }
        sql.push(' ');
        sql.push_str(fields);
        sql.push_str(" FROM ");
        sql.push_str(&state.table);

        Ok(Lead {
            sql,
            kind: StatementKind::Select(self.fetch),
        })
    }
}
