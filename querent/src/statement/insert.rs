//! INSERT statement validator

use super::{has_projection, Lead, Statement, StatementKind};
use crate::builder::state::QueryState;
use crate::{Error, Result};

/// Validates and renders `INSERT INTO <table> (<cols>) VALUES (<placeholders>)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insert;

impl Statement for Insert {
    fn handle(&self, state: &QueryState) -> Result<Lead> {
        if has_projection(state) {
            return Err(Error::configuration(
                "The selection method must not be called together with the insert method",
            ));
        }

        if state.insert.is_empty() {
            return Err(Error::configuration("The insert method has not been defined"));
        }

        let columns: Vec<&str> = state.insert.iter().map(|(column, _)| column.as_str()).collect();
        let placeholders: Vec<&str> = state
            .insert
            .iter()
            .map(|(_, placeholder)| placeholder.as_str())
            .collect();

        Ok(Lead {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                state.table,
                columns.join(", "),
                placeholders.join(", ")
            ),
            kind: StatementKind::Insert,
        })
    }
}
