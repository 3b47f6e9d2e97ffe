//! The fluent query builder.
//!
//! Chain methods record fragments into a [`QueryState`]; terminal methods
//! (`get`, `first`, `paginate`, `insert`, `insert_get_id`, `update`, `delete`
//! and their unrestricted variants) take that state out of the builder, run
//! it and leave a fresh state behind whether or not the statement succeeded.

pub mod common;
pub mod state;

pub use common::{
    placeholder_name, Condition, IntoColumns, IntoCondition, IntoFields, IntoSortDirection,
    JoinClause, JoinType, SortDirection,
};
pub use state::QueryState;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::executor::{Connection, Executor, Outcome};
use crate::log::{LogEntry, QueryLog};
use crate::paginator::{Paginated, Pagination, PaginationOptions};
use crate::statement::{Delete, Insert, Select, Statement, Update};
use crate::{Error, Result, Row, Value};

/// Builds and runs one statement at a time against a borrowed connection.
///
/// # Examples
/// ```no_run
/// # async fn demo<C: querent::Connection>(conn: &C) -> querent::Result<()> {
/// use querent::{op, QueryBuilder, Row};
///
/// let mut query = QueryBuilder::new(conn);
/// let adults: Option<Vec<Row>> = query
///     .table("users")
///     .select(("id", "name"))
///     .where_(("age", op::GTE, 18))
///     .order_by("name", "asc")
///     .get()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct QueryBuilder<'c, C> {
    connection: &'c C,
    state: QueryState,
    query_log: Option<Arc<dyn QueryLog>>,
    pagination: Option<Pagination>,
}

impl<'c, C: Connection> QueryBuilder<'c, C> {
    pub fn new(connection: &'c C) -> Self {
        Self {
            connection,
            state: QueryState::default(),
            query_log: None,
            pagination: None,
        }
    }

    /// Record every executed statement into `log`
    pub fn with_query_log(mut self, log: Arc<dyn QueryLog>) -> Self {
        self.query_log = Some(log);
        self
    }

    /// What the chain has collected so far
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Pagination of the most recent `get`, if it was paginated
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.state.table = name.into();
        self
    }

    pub fn select(&mut self, columns: impl IntoColumns) -> &mut Self {
        self.state.select = Some(columns.into_columns().join(", "));
        self
    }

    /// `SELECT *`
    pub fn select_all(&mut self) -> &mut Self {
        self.select("*")
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.state.distinct = true;
        self
    }

    /// Alias of [`inner_join`](Self::inner_join)
    pub fn join(&mut self, table: &str, left_key: &str, operator: &str, right_key: &str) -> &mut Self {
        self.inner_join(table, left_key, operator, right_key)
    }

    pub fn inner_join(&mut self, table: &str, left_key: &str, operator: &str, right_key: &str) -> &mut Self {
        self.push_join(JoinType::Inner, table, left_key, operator, right_key)
    }

    pub fn left_join(&mut self, table: &str, left_key: &str, operator: &str, right_key: &str) -> &mut Self {
        self.push_join(JoinType::Left, table, left_key, operator, right_key)
    }

    pub fn right_join(&mut self, table: &str, left_key: &str, operator: &str, right_key: &str) -> &mut Self {
        self.push_join(JoinType::Right, table, left_key, operator, right_key)
    }

    /// Add a filter joined with AND.
    ///
    /// Every call binds its value under a fresh name, so filtering the same
    /// field twice never collides. A malformed condition is reported by the
    /// next terminal call.
    pub fn where_(&mut self, condition: impl IntoCondition) -> &mut Self {
        match condition.into_condition() {
            Ok(condition) => {
                let fragment = self.bind_condition(condition);
                self.state.wheres.push(fragment);
            }
            Err(error) => self.state.defer_error(error),
        }
        self
    }

    /// Add a filter joined with OR.
    ///
    /// The OR group is appended after the AND group without parentheses:
    /// `a AND b OR c` reads as `(a AND b) OR c`.
    pub fn or_where(&mut self, condition: impl IntoCondition) -> &mut Self {
        match condition.into_condition() {
            Ok(condition) => {
                let fragment = self.bind_condition(condition);
                self.state.or_wheres.push(fragment);
            }
            Err(error) => self.state.defer_error(error),
        }
        self
    }

    pub fn group_by(&mut self, field: impl Into<String>) -> &mut Self {
        self.state.group_by.push(field.into());
        self
    }

    /// Raw HAVING expression, inserted as is. Replaces any previous one.
    pub fn having(&mut self, expression: impl Into<String>) -> &mut Self {
        self.state.having = Some(expression.into());
        self
    }

    pub fn order_by(&mut self, field: impl Into<String>, direction: impl IntoSortDirection) -> &mut Self {
        match direction.into_sort_direction() {
            Ok(direction) => self
                .state
                .order_by
                .push(format!("{} {}", field.into(), direction)),
            Err(error) => self.state.defer_error(error),
        }
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.state.limit = limit;
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.state.offset = offset;
        self
    }

    /// Fetch every matching row, or `None` when nothing matched
    pub async fn get<T: DeserializeOwned>(&mut self) -> Result<Option<Vec<T>>> {
        self.pagination = None;
        let outcome = self.run(Select::all()).await?;
        let (rows, pagination) = outcome.into_selected()?;
        self.pagination = pagination;
        decode_rows(rows)
    }

    /// Fetch the first matching row
    pub async fn first<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let outcome = self.run(Select::one()).await?;
        let (rows, _) = outcome.into_selected()?;
        rows.into_iter()
            .next()
            .map(|row| serde_json::from_value(serde_json::Value::Object(row)))
            .transpose()
            .map_err(Error::from)
    }

    /// Fetch one page of rows plus its pagination.
    ///
    /// `limit` is the page size unless `limit()` was already called. The page
    /// comes from the options, then the `page` query parameter, then 1.
    pub async fn paginate<T: DeserializeOwned>(
        &mut self,
        limit: u64,
        options: PaginationOptions,
    ) -> Result<Paginated<T>> {
        if self.state.limit == 0 {
            self.state.limit = limit;
        }
        let limit = self.state.limit;

        let current_page = options.resolved_current_page();
        let Some(offset) = (current_page - 1).checked_mul(limit) else {
            self.reset();
            return Err(Error::configuration(format!(
                "Page {} is out of range for {} rows per page",
                current_page, limit
            )));
        };
        self.state.calc_found_rows = true;
        self.state.offset = offset;
        self.state.pagination = Some(PaginationOptions {
            current_page: Some(current_page),
            ..options
        });

        let rows = self.get::<T>().await?;
        let pagination = self
            .pagination
            .clone()
            .ok_or_else(|| Error::execution("Paginated select returned no pagination"))?;

        Ok(Paginated { rows, pagination })
    }

    /// Insert one row. Returns `true` once the statement ran.
    pub async fn insert(&mut self, fields: impl IntoFields) -> Result<bool> {
        self.bind_insert(fields);
        self.run(Insert).await?;
        Ok(true)
    }

    /// Insert one row and return the generated id
    pub async fn insert_get_id(&mut self, fields: impl IntoFields) -> Result<u64> {
        self.bind_insert(fields);
        let outcome = self.run(Insert).await?;
        Ok(outcome.inserted_id())
    }

    /// Update the rows matched by `where_`. Refuses to run without a filter.
    pub async fn update(&mut self, fields: impl IntoFields) -> Result<bool> {
        self.bind_update(fields);
        self.run(Update::new(false)).await?;
        Ok(true)
    }

    /// Update every row of the table when no filter is set
    pub async fn update_without_restrictions(&mut self, fields: impl IntoFields) -> Result<bool> {
        self.bind_update(fields);
        self.run(Update::new(true)).await?;
        Ok(true)
    }

    /// Delete the rows matched by `where_`. Refuses to run without a filter.
    pub async fn delete(&mut self) -> Result<bool> {
        self.run(Delete::new(false)).await?;
        Ok(true)
    }

    pub async fn delete_without_restrictions(&mut self) -> Result<bool> {
        self.run(Delete::new(true)).await?;
        Ok(true)
    }

    async fn run<S: Statement>(&mut self, statement: S) -> Result<Outcome> {
        let state = self.reset();
        let outcome = Executor::new(self.connection)
            .execute(&statement, &state)
            .await?;
        self.log(&outcome, &state);
        Ok(outcome)
    }

    fn reset(&mut self) -> QueryState {
        std::mem::take(&mut self.state)
    }

    fn log(&self, outcome: &Outcome, state: &QueryState) {
        if let Some(log) = &self.query_log {
            if log.is_enabled() {
                log.record(LogEntry::new(outcome.sql(), &state.bindings, outcome.duration()));
            }
        }
    }

    fn push_join(
        &mut self,
        join_type: JoinType,
        table: &str,
        left_key: &str,
        operator: &str,
        right_key: &str,
    ) -> &mut Self {
        self.state.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            left_key: left_key.to_string(),
            operator: operator.to_string(),
            right_key: right_key.to_string(),
        });
        self
    }

    fn bind_condition(&mut self, condition: Condition) -> String {
        let name = format!(
            "{}_{}",
            placeholder_name(&condition.field),
            Uuid::new_v4().simple()
        );
        let fragment = format!("{} {} :{}", condition.field, condition.operator, name);
        self.state.bindings.insert(name, condition.value);
        fragment
    }

    fn bind_insert(&mut self, fields: impl IntoFields) {
        for (column, value) in fields.into_fields() {
            if let Some(name) = self.bind_column(&column, value) {
                self.state.insert.push((column, format!(":{}", name)));
            }
        }
    }

    fn bind_update(&mut self, fields: impl IntoFields) {
        for (column, value) in fields.into_fields() {
            if let Some(name) = self.bind_column(&column, value) {
                self.state.update.push(format!("{} = :{}", column, name));
            }
        }
    }

    /// Bind a payload column under its own name. Two columns that map to the
    /// same name defer an argument error instead of sharing one value.
    fn bind_column(&mut self, column: &str, value: Value) -> Option<String> {
        let name = placeholder_name(column);
        if self.state.bindings.get(&name).is_some() {
            self.state.defer_error(Error::argument(format!(
                "Column '{}' binds as :{}, which another column already uses",
                column, name
            )));
            return None;
        }
        self.state.bindings.insert(name.clone(), value);
        Some(name)
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Option<Vec<T>>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let decoded = rows
        .into_iter()
        .map(|row| serde_json::from_value(serde_json::Value::Object(row)))
        .collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(Some(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::MockConnection;
    use crate::log::MemoryQueryLog;
    use crate::{op, Value};
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Deserialize)]
    struct User {
        id: i64,
        name: String,
    }

    fn users() -> MockConnection {
        MockConnection::new().with_rows(vec![
            json!({"id": 1, "name": "John"}),
            json!({"id": 2, "name": "Jane"}),
        ])
    }

    fn assert_reset<C: Connection>(builder: &QueryBuilder<'_, C>) {
        assert_eq!(builder.state(), &QueryState::default());
    }

    #[tokio::test]
    async fn test_get_decodes_rows() {
        let conn = users();
        let mut query = QueryBuilder::new(&conn);

        let rows: Vec<User> = query
            .table("users")
            .select(("id", "name"))
            .get()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], User { id: 2, name: "Jane".to_string() });
        assert_eq!(conn.last_sql().unwrap(), "SELECT id, name FROM users");
        assert!(query.pagination().is_none());
        assert_reset(&query);
    }

    #[tokio::test]
    async fn test_get_without_rows_is_none() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        let rows: Option<Vec<Row>> = query.table("users").select_all().get().await.unwrap();
        assert!(rows.is_none());
    }

    #[tokio::test]
    async fn test_first_returns_one_row() {
        let conn = users();
        let mut query = QueryBuilder::new(&conn);

        let user: Option<User> = query
            .table("users")
            .select_all()
            .where_(("id", 1))
            .first()
            .await
            .unwrap();
        assert_eq!(user.unwrap().name, "John");

        let none: Option<User> = QueryBuilder::new(&MockConnection::new())
            .table("users")
            .select_all()
            .first()
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_clause_order_ignores_call_order() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        query
            .offset(20)
            .limit(10)
            .order_by("u.name", "desc")
            .having("COUNT(o.id) > 1")
            .group_by("u.id")
            .or_where(("u.vip", 1))
            .where_(("u.active", 1))
            .right_join("teams t", "t.id", "=", "u.team_id")
            .left_join("orders o", "o.user_id", "=", "u.id")
            .join("roles r", "r.id", "=", "u.role_id")
            .select(("u.id", "COUNT(o.id) AS orders"))
            .distinct()
            .table("users u");

        let _: Option<Vec<Row>> = query.get().await.unwrap();
        let sql = conn.last_sql().unwrap();

        let expected_order = [
            "SELECT DISTINCT u.id, COUNT(o.id) AS orders FROM users u",
            " INNER JOIN roles r ON r.id = u.role_id",
            " LEFT JOIN orders o ON o.user_id = u.id",
            " RIGHT JOIN teams t ON t.id = u.team_id",
            " WHERE u.active = :u_active_",
            " OR u.vip = :u_vip_",
            " GROUP BY u.id",
            " HAVING COUNT(o.id) > 1",
            " ORDER BY u.name DESC",
            " LIMIT 10",
            " OFFSET 20",
        ];
        let mut cursor = 0;
        for part in expected_order {
            let found = sql[cursor..]
                .find(part)
                .unwrap_or_else(|| panic!("`{}` missing or out of order in `{}`", part, sql));
            cursor += found + part.len();
        }
    }

    #[tokio::test]
    async fn test_same_field_twice_binds_two_names() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);
        query.table("users").select_all().where_(("id", 1)).where_(("id", 2));

        let wheres = query.state().wheres.clone();
        assert_eq!(wheres.len(), 2);
        assert_ne!(wheres[0], wheres[1]);
        assert!(wheres.iter().all(|w| w.starts_with("id = :id_")));
        assert_eq!(query.state().bindings.len(), 2);

        let _: Option<Vec<Row>> = query.get().await.unwrap();
        let (sql, bindings) = conn.calls().pop().unwrap();
        assert!(sql.contains(&format!(" WHERE {} AND {}", wheres[0], wheres[1])));

        let mut values: Vec<&Value> = bindings.iter().map(|(_, v)| v).collect();
        values.sort_by_key(|v| v.to_sql_literal());
        assert_eq!(values, vec![&Value::from(1), &Value::from(2)]);
    }

    #[tokio::test]
    async fn test_dotted_field_gets_valid_placeholder() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);
        query.where_(("users.id", op::GT, 5));

        let fragment = &query.state().wheres[0];
        assert!(fragment.starts_with("users.id > :users_id_"));
        let name = fragment.trim_start_matches("users.id > :");
        assert_eq!(query.state().bindings.get(name), Some(&Value::from(5)));
    }

    #[tokio::test]
    async fn test_writes_refuse_a_selection() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        let err = query
            .table("users")
            .select_all()
            .insert(vec![("name", "John")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_reset(&query);

        let err = query
            .table("users")
            .select_all()
            .where_(("id", 1))
            .update(vec![("name", "John")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_reset(&query);

        let err = query
            .table("users")
            .select_all()
            .where_(("id", 1))
            .delete()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_reset(&query);

        assert!(conn.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_need_a_filter() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        let err = query.table("users").update([("active", 0)]).await.unwrap_err();
        assert!(err.to_string().contains("The where method has not been defined"));
        assert_reset(&query);

        let err = query.table("users").delete().await.unwrap_err();
        assert!(err.to_string().contains("The where method has not been defined"));
        assert!(conn.calls().is_empty());

        assert!(query
            .table("users")
            .update_without_restrictions([("active", 0)])
            .await
            .unwrap());
        assert_eq!(conn.last_sql().unwrap(), "UPDATE users SET active = :active");

        assert!(query.table("users").delete_without_restrictions().await.unwrap());
        assert_eq!(conn.last_sql().unwrap(), "DELETE FROM users");
    }

    #[tokio::test]
    async fn test_insert_binds_columns() {
        let conn = MockConnection::new().with_insert_id(7);
        let mut query = QueryBuilder::new(&conn);

        let mut fields = BTreeMap::new();
        fields.insert("email", Value::from("john@example.com"));
        fields.insert("name", Value::from("John"));

        let id = query.table("users").insert_get_id(fields).await.unwrap();
        assert_eq!(id, 7);

        let (sql, bindings) = conn.calls().pop().unwrap();
        assert_eq!(sql, "INSERT INTO users (email, name) VALUES (:email, :name)");
        assert_eq!(bindings.get("name"), Some(&Value::from("John")));
        assert_reset(&query);

        assert!(query.table("users").insert(vec![("name", "Jane")]).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_with_filter() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        query
            .table("users")
            .where_(("id", 3))
            .update(vec![("name", Value::from("Jim")), ("age", Value::from(40))])
            .await
            .unwrap();

        let (sql, bindings) = conn.calls().pop().unwrap();
        assert!(sql.starts_with("UPDATE users SET name = :name, age = :age WHERE id = :id_"));
        assert_eq!(bindings.len(), 3);
    }

    #[tokio::test]
    async fn test_state_resets_after_execution_failure() {
        let conn = MockConnection::failing();
        let mut query = QueryBuilder::new(&conn);

        let result: Result<Option<Vec<Row>>> = query
            .table("users")
            .select_all()
            .where_(("id", 1))
            .limit(3)
            .get()
            .await;
        assert!(matches!(result, Err(Error::Execution(_))));
        assert_reset(&query);
    }

    #[tokio::test]
    async fn test_deferred_argument_error() {
        let conn = users();
        let mut query = QueryBuilder::new(&conn);

        let args = vec![Value::from("id")];
        let err = query
            .table("users")
            .select_all()
            .where_(Condition::from_args(&args))
            .get::<Row>()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Argument { .. }));
        assert!(err.to_string().contains("between 2 and 3"));
        assert_reset(&query);
        assert!(conn.calls().is_empty());

        // The next chain starts clean
        let rows: Option<Vec<Row>> = query.table("users").select_all().get().await.unwrap();
        assert_eq!(rows.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_sort_direction_is_deferred() {
        let conn = users();
        let mut query = QueryBuilder::new(&conn);

        let err = query
            .table("users")
            .select_all()
            .order_by("name", "upwards")
            .first::<Row>()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Argument { .. }));
    }

    #[tokio::test]
    async fn test_paginate_offset_and_links() {
        let conn = users().with_found_rows(11);
        let mut query = QueryBuilder::new(&conn);

        let page: Paginated<User> = query
            .table("users")
            .select_all()
            .paginate(
                2,
                PaginationOptions::new().path("/users").per_page(2).current_page(3),
            )
            .await
            .unwrap();

        assert_eq!(page.rows.unwrap().len(), 2);
        assert_eq!(page.pagination.total, 6);
        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.pagination.next_page_url.as_deref(), Some("/users?page=4"));
        assert_eq!(query.pagination(), Some(&page.pagination));

        let calls = conn.calls();
        assert_eq!(
            calls[0].0,
            "SELECT SQL_CALC_FOUND_ROWS * FROM users LIMIT 2 OFFSET 4"
        );
        assert_reset(&query);

        // A later plain get clears the pagination
        let _: Option<Vec<Row>> = query.table("users").select_all().get().await.unwrap();
        assert!(query.pagination().is_none());
    }

    #[tokio::test]
    async fn test_paginate_keeps_explicit_limit() {
        let conn = users().with_found_rows(30);
        let mut query = QueryBuilder::new(&conn);

        let page: Paginated<Row> = query
            .table("users")
            .select_all()
            .limit(10)
            .paginate(2, PaginationOptions::new().query_string("sort=name&page=2"))
            .await
            .unwrap();

        assert_eq!(
            conn.calls()[0].0,
            "SELECT SQL_CALC_FOUND_ROWS * FROM users LIMIT 10 OFFSET 10"
        );
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(
            page.pagination.last_page_url.as_deref(),
            Some("?sort=name&page=3")
        );
    }

    #[tokio::test]
    async fn test_paginate_zero_limit_fails() {
        let conn = users();
        let mut query = QueryBuilder::new(&conn);

        let err = query
            .table("users")
            .select_all()
            .paginate::<Row>(0, PaginationOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_reset(&query);
    }

    #[tokio::test]
    async fn test_paginate_huge_page_is_rejected() {
        let conn = users().with_found_rows(11);
        let mut query = QueryBuilder::new(&conn);

        let err = query
            .table("users")
            .select_all()
            .paginate::<Row>(2, PaginationOptions::new().query_string("page=18446744073709551615"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("out of range"));
        assert_reset(&query);
        assert!(conn.calls().is_empty());
    }

    #[tokio::test]
    async fn test_colliding_payload_columns_are_rejected() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        let err = query
            .table("users")
            .where_(("id", 1))
            .update(vec![("first-name", "a"), ("first_name", "b")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Argument { .. }));
        assert!(err.to_string().contains("first_name"));
        assert_reset(&query);

        let err = query
            .table("users")
            .insert(vec![("a.b", 1), ("a_b", 2)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Argument { .. }));
        assert!(conn.calls().is_empty());
    }

    #[tokio::test]
    async fn test_digit_leading_column_binds() {
        let conn = MockConnection::new();
        let mut query = QueryBuilder::new(&conn);

        query.table("users").insert(vec![("2fa_enabled", 1)]).await.unwrap();

        let (sql, bindings) = conn.calls().pop().unwrap();
        assert_eq!(sql, "INSERT INTO users (2fa_enabled) VALUES (:_2fa_enabled)");
        assert_eq!(bindings.get("_2fa_enabled"), Some(&Value::from(1)));
    }

    #[tokio::test]
    async fn test_query_log_records_when_enabled() {
        let conn = users();
        let log = Arc::new(MemoryQueryLog::new());
        let mut query = QueryBuilder::new(&conn).with_query_log(log.clone());

        let _: Option<Vec<Row>> = query.table("users").select_all().get().await.unwrap();
        assert!(log.is_empty());

        log.enable();
        let _: Option<Row> = query
            .table("users")
            .select_all()
            .where_(("name", "o'neil"))
            .first()
            .await
            .unwrap();

        let entries = log.take();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].time >= 0.0);
        assert!(entries[0].query.contains("WHERE name = :name_"));
        assert!(entries[0]
            .query_with_bindings
            .ends_with("WHERE name = 'o''neil'"));
        assert!(log.take().is_empty());

        // Taking disables the log again
        let _: Option<Vec<Row>> = query.table("users").select_all().get().await.unwrap();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_failed_statements_are_not_logged() {
        let conn = MockConnection::new();
        let log = Arc::new(MemoryQueryLog::new());
        log.enable();
        let mut query = QueryBuilder::new(&conn).with_query_log(log.clone());

        assert!(query.table("users").delete().await.is_err());
        assert!(log.take().is_empty());
    }
}
