//! MySQL backend on top of a single sqlx connection

use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection as _, MySql, Row as _, TypeInfo, ValueRef};
use tokio::sync::Mutex;

use crate::config::ConnectionConfig;
use crate::executor::{Connection, Executed, FOUND_ROWS_SQL};
use crate::{Bindings, Error, Result, Row, Value};

/// One MySQL session shared by every builder that borrows it.
///
/// Each call holds an async mutex for its whole round trip. A paginated select
/// and its `FOUND_ROWS()` query run under the same guard, and the last insert
/// id is read from the insert's own result.
pub struct MySqlConnection {
    inner: Mutex<sqlx::MySqlConnection>,
}

impl MySqlConnection {
    /// Connect using a [`ConnectionConfig`]
    pub async fn open(config: &ConnectionConfig) -> Result<Self> {
        tracing::debug!(target: "querent::connection", url = %config.url(), "opening connection");

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password);

        let connection = sqlx::MySqlConnection::connect_with(&options)
            .await
            .map_err(Error::connection)?;

        Ok(Self::from_connection(connection))
    }

    pub async fn open_with(
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let config = ConnectionConfig::new(database)
            .host(host)
            .port(port)
            .credentials(username, password);
        Self::open(&config).await
    }

    /// Wrap an already established sqlx connection
    pub fn from_connection(connection: sqlx::MySqlConnection) -> Self {
        Self {
            inner: Mutex::new(connection),
        }
    }

    pub async fn close(self) -> Result<()> {
        self.inner.into_inner().close().await?;
        Ok(())
    }
}

impl Connection for MySqlConnection {
    async fn execute(&self, sql: &str, bindings: &Bindings) -> Result<Executed> {
        let (sql, values) = positional(sql, bindings)?;
        let mut connection = self.inner.lock().await;

        let result = bind_values(sqlx::query(&sql), &values)
            .execute(&mut *connection)
            .await?;

        Ok(Executed {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    async fn fetch_all(&self, sql: &str, bindings: &Bindings) -> Result<Vec<Row>> {
        let (sql, values) = positional(sql, bindings)?;
        let mut connection = self.inner.lock().await;

        let rows = bind_values(sqlx::query(&sql), &values)
            .fetch_all(&mut *connection)
            .await?;

        rows.iter().map(row_to_json).collect()
    }

    async fn fetch_optional(&self, sql: &str, bindings: &Bindings) -> Result<Option<Row>> {
        let (sql, values) = positional(sql, bindings)?;
        let mut connection = self.inner.lock().await;

        let row = bind_values(sqlx::query(&sql), &values)
            .fetch_optional(&mut *connection)
            .await?;

        row.as_ref().map(row_to_json).transpose()
    }

    async fn fetch_page(&self, sql: &str, bindings: &Bindings) -> Result<(Vec<Row>, u64)> {
        let (sql, values) = positional(sql, bindings)?;
        let mut connection = self.inner.lock().await;

        let rows = bind_values(sqlx::query(&sql), &values)
            .fetch_all(&mut *connection)
            .await?;
        let count = sqlx::query(FOUND_ROWS_SQL).fetch_one(&mut *connection).await?;
        drop(connection);

        let found = match count.try_get::<u64, _>(0) {
            Ok(found) => found,
            Err(_) => count.try_get::<i64, _>(0)?.max(0) as u64,
        };
        let rows = rows.iter().map(row_to_json).collect::<Result<Vec<_>>>()?;
        Ok((rows, found))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrite `:name` placeholders to `?` and list their values in textual order.
///
/// Text inside quotes or backticks is copied untouched. A placeholder with no
/// bound value is an execution error.
pub(crate) fn positional(sql: &str, bindings: &Bindings) -> Result<(String, Vec<Value>)> {
    let mut rewritten = String::with_capacity(sql.len());
    let mut values = Vec::with_capacity(bindings.len());
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            rewritten.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    rewritten.push(escaped);
                }
            } else if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                rewritten.push(c);
            }
            ':' if chars.peek().copied().is_some_and(is_name_start) => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_name_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }

                let value = bindings.get(&name).ok_or_else(|| {
                    Error::execution(format!("No value bound to placeholder :{}", name))
                })?;
                values.push(value.clone());
                rewritten.push('?');
            }
            _ => rewritten.push(c),
        }
    }

    Ok((rewritten, values))
}

fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::I32(i) => query.bind(*i),
            Value::I64(i) => query.bind(*i),
            Value::U64(u) => query.bind(*u),
            Value::F64(f) => query.bind(*f),
            Value::String(s) => query.bind(s.as_str()),
            Value::Bytes(b) => query.bind(b.as_slice()),
        };
    }
    query
}

fn row_to_json(row: &MySqlRow) -> Result<Row> {
    let mut map = Row::new();
    for column in row.columns() {
        let index = column.ordinal();
        let value = if row.try_get_raw(index)?.is_null() {
            serde_json::Value::Null
        } else {
            decode_column(row, index, column.type_info().name())?
        };
        map.insert(column.name().to_string(), value);
    }
    Ok(map)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<serde_json::Value> {
    let value = match type_name {
        "BOOLEAN" => serde_json::Value::from(row.try_get::<bool, _>(index)?),
        name if name.ends_with("UNSIGNED") => serde_json::Value::from(row.try_get::<u64, _>(index)?),
        "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" => {
            serde_json::Value::from(row.try_get::<i64, _>(index)?)
        }
        "FLOAT" => serde_json::Value::from(row.try_get::<f32, _>(index)? as f64),
        "DOUBLE" => serde_json::Value::from(row.try_get::<f64, _>(index)?),
        "JSON" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            serde_json::from_slice(&bytes)?
        }
        #[cfg(feature = "datetime-support")]
        "DATETIME" | "TIMESTAMP" => serde_json::Value::from(
            row.try_get::<chrono::NaiveDateTime, _>(index)?
                .format("%Y-%m-%d %H:%M:%S%.f")
                .to_string(),
        ),
        #[cfg(feature = "datetime-support")]
        "DATE" => serde_json::Value::from(
            row.try_get::<chrono::NaiveDate, _>(index)?
                .format("%Y-%m-%d")
                .to_string(),
        ),
        // DECIMAL, text and binary columns
        _ => match row.try_get::<String, _>(index) {
            Ok(text) => serde_json::Value::from(text),
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
                serde_json::Value::from(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(value)
}
