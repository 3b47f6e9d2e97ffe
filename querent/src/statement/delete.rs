//! DELETE statement validator

use super::{has_projection, Lead, Statement, StatementKind};
use crate::builder::state::QueryState;
use crate::{Error, Result};

/// Validates and renders `DELETE FROM <table>`.
///
/// Refuses to run without a WHERE filter unless `without_restrictions` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delete {
    pub without_restrictions: bool,
}

impl Delete {
    pub fn new(without_restrictions: bool) -> Self {
        Self {
            without_restrictions,
        }
    }
}

impl Statement for Delete {
    fn handle(&self, state: &QueryState) -> Result<Lead> {
        if has_projection(state) {
            return Err(Error::configuration(
                "The selection method must not be called together with the delete method",
            ));
        }

        if state.wheres.is_empty() && !self.without_restrictions {
            return Err(Error::configuration("The where method has not been defined"));
        }

        Ok(Lead {
            sql: format!("DELETE FROM {}", state.table),
            kind: StatementKind::Delete,
        })
    }
}
