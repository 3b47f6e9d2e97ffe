//! One renderer per clause kind.
//!
//! Every renderer returns the empty string when its clause has nothing to say,
//! and otherwise a fragment that starts with a space so the assembler can
//! simply concatenate.

use crate::builder::common::JoinType;
use crate::builder::state::QueryState;

fn joins(state: &QueryState, join_type: JoinType) -> String {
    let rendered: Vec<String> = state
        .joins_of(join_type)
        .map(|join| {
            format!(
                "{} {} ON {} {} {}",
                join.join_type, join.table, join.left_key, join.operator, join.right_key
            )
        })
        .collect();

    if rendered.is_empty() {
        return String::new();
    }
    format!(" {}", rendered.join(" "))
}

pub fn inner_join(state: &QueryState) -> String {
    joins(state, JoinType::Inner)
}

pub fn left_join(state: &QueryState) -> String {
    joins(state, JoinType::Left)
}

pub fn right_join(state: &QueryState) -> String {
    joins(state, JoinType::Right)
}

pub fn where_clause(state: &QueryState) -> String {
    if state.wheres.is_empty() {
        return String::new();
    }
    format!(" WHERE {}", state.wheres.join(" AND "))
}

/// Rendered as its own top-level clause after WHERE, never parenthesized
pub fn or_where(state: &QueryState) -> String {
    if state.or_wheres.is_empty() {
        return String::new();
    }
    format!(" OR {}", state.or_wheres.join(" OR "))
}

pub fn group_by(state: &QueryState) -> String {
    if state.group_by.is_empty() {
        return String::new();
    }
    format!(" GROUP BY {}", state.group_by.join(", "))
}

pub fn having(state: &QueryState) -> String {
    match state.having.as_deref() {
        Some(expression) if !expression.is_empty() => format!(" HAVING {}", expression),
        _ => String::new(),
    }
}

pub fn order_by(state: &QueryState) -> String {
    if state.order_by.is_empty() {
        return String::new();
    }
    format!(" ORDER BY {}", state.order_by.join(", "))
}

pub fn limit(state: &QueryState) -> String {
    if state.limit == 0 {
        return String::new();
    }
    format!(" LIMIT {}", state.limit)
}

pub fn offset(state: &QueryState) -> String {
    if state.offset == 0 {
        return String::new();
    }
    format!(" OFFSET {}", state.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::common::JoinClause;

    fn join(join_type: JoinType, table: &str, left: &str, right: &str) -> JoinClause {
        JoinClause {
            join_type,
            table: table.to_string(),
            left_key: left.to_string(),
            operator: "=".to_string(),
            right_key: right.to_string(),
        }
    }

    #[test]
    fn test_empty_state_renders_nothing() {
        let state = QueryState::new();
        for rendered in [
            inner_join(&state),
            left_join(&state),
            right_join(&state),
            where_clause(&state),
            or_where(&state),
            group_by(&state),
            having(&state),
            order_by(&state),
            limit(&state),
            offset(&state),
        ] {
            assert_eq!(rendered, "");
        }
    }

    #[test]
    fn test_joins_render_per_kind() {
        let mut state = QueryState::new();
        state.joins.push(join(JoinType::Inner, "user", "user.id", "activity.user_id"));
        state.joins.push(join(JoinType::Left, "team", "team.id", "user.team_id"));
        state.joins.push(join(JoinType::Inner, "role", "role.id", "user.role_id"));

        assert_eq!(
            inner_join(&state),
            " INNER JOIN user ON user.id = activity.user_id INNER JOIN role ON role.id = user.role_id"
        );
        assert_eq!(left_join(&state), " LEFT JOIN team ON team.id = user.team_id");
        assert_eq!(right_join(&state), "");
    }

    #[test]
    fn test_where_and_or_where() {
        let mut state = QueryState::new();
        state.wheres = vec!["id = :id_a".to_string(), "age > :age_b".to_string()];
        state.or_wheres = vec!["role = :role_c".to_string(), "vip = :vip_d".to_string()];

        assert_eq!(where_clause(&state), " WHERE id = :id_a AND age > :age_b");
        assert_eq!(or_where(&state), " OR role = :role_c OR vip = :vip_d");
    }

    #[test]
    fn test_grouping_and_ordering() {
        let mut state = QueryState::new();
        state.group_by = vec!["team_id".to_string(), "role".to_string()];
        state.having = Some("COUNT(*) > 1".to_string());
        state.order_by = vec!["name ASC".to_string(), "id DESC".to_string()];
        state.limit = 10;
        state.offset = 20;

        assert_eq!(group_by(&state), " GROUP BY team_id, role");
        assert_eq!(having(&state), " HAVING COUNT(*) > 1");
        assert_eq!(order_by(&state), " ORDER BY name ASC, id DESC");
        assert_eq!(limit(&state), " LIMIT 10");
        assert_eq!(offset(&state), " OFFSET 20");
    }

    #[test]
    fn test_empty_having_is_ignored() {
        let mut state = QueryState::new();
        state.having = Some(String::new());
        assert_eq!(having(&state), "");
    }
}
