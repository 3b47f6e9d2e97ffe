//! UPDATE statement validator

use super::{has_projection, Lead, Statement, StatementKind};
use crate::builder::state::QueryState;
use crate::{Error, Result};

/// Validates and renders `UPDATE <table> SET <assignments>`.
///
/// Without a WHERE filter the update is refused unless
/// `without_restrictions` is set, so a forgotten filter never rewrites the
/// whole table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Update {
    pub without_restrictions: bool,
}

impl Update {
    pub fn new(without_restrictions: bool) -> Self {
        Self {
            without_restrictions,
        }
    }
}

impl Statement for Update {
    fn handle(&self, state: &QueryState) -> Result<Lead> {
        if has_projection(state) {
            return Err(Error::configuration(
                "The selection method must not be called together with the update method",
            ));
        }

        if state.update.is_empty() {
            return Err(Error::configuration("The update method has not been defined"));
        }

        if state.wheres.is_empty() && !self.without_restrictions {
            return Err(Error::configuration("The where method has not been defined"));
        }

        Ok(Lead {
            sql: format!("UPDATE {} SET {}", state.table, state.update.join(", ")),
            kind: StatementKind::Update,
        })
    }
}
