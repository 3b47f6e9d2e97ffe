//! SQL assembly: a statement lead followed by every clause in a fixed order

pub mod clauses;

use crate::builder::state::QueryState;

/// Append all clauses of `state` to `lead`.
///
/// The order never depends on the order of the chain calls: joins (inner,
/// left, right), WHERE, OR, GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.
pub fn assemble(lead: &str, state: &QueryState) -> String {
    let mut sql = String::from(lead);

    sql.push_str(&clauses::inner_join(state));
    sql.push_str(&clauses::left_join(state));
    sql.push_str(&clauses::right_join(state));
    sql.push_str(&clauses::where_clause(state));
    sql.push_str(&clauses::or_where(state));
    sql.push_str(&clauses::group_by(state));
    sql.push_str(&clauses::having(state));
    sql.push_str(&clauses::order_by(state));
    sql.push_str(&clauses::limit(state));
    sql.push_str(&clauses::offset(state));

    sql
}
