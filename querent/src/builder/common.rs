//! Common types and traits shared by the builder chain methods

use std::collections::{BTreeMap, HashMap};

use crate::{Error, IntoOperator, Operator, Result, Value};

/// A single `field operator value` filter, before it is rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    /// Equality filter
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::EQ,
            value: value.into(),
        }
    }

    /// Filter with an explicit operator
    pub fn with_operator(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Build a condition from a loosely typed argument list.
    ///
    /// Two arguments are `field, value`; three are `field, operator, value`.
    /// Field and operator must be strings.
    ///
    /// # Examples
    /// ```
    /// use querent::{Condition, Value};
    ///
    /// let args = vec![Value::from("age"), Value::from(">="), Value::from(18)];
    /// let condition = Condition::from_args(&args).unwrap();
    /// assert_eq!(condition.operator.as_str(), ">=");
    ///
    /// assert!(Condition::from_args(&[Value::from("age")]).is_err());
    /// ```
    pub fn from_args(args: &[Value]) -> Result<Self> {
        let (field, operator, value) = match args {
            [field, value] => (field, None, value),
            [field, operator, value] => (field, Some(operator), value),
            _ => {
                return Err(Error::argument(
                    "The number of arguments must be between 2 and 3",
                ))
            }
        };

        let field = match field {
            Value::String(field) => field.clone(),
            other => {
                return Err(Error::argument(format!(
                    "The field name must be a string, got {:?}",
                    other
                )))
            }
        };

        let operator = match operator {
            None => Operator::EQ,
            Some(Value::String(op)) => Operator::parse(op)?,
            Some(other) => {
                return Err(Error::argument(format!(
                    "The operator must be a string, got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            field,
            operator,
            value: value.clone(),
        })
    }
}

/// Trait for conditions that can be used in WHERE clauses
pub trait IntoCondition {
    fn into_condition(self) -> Result<Condition>;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Result<Condition> {
        Ok(self)
    }
}

impl IntoCondition for Result<Condition> {
    fn into_condition(self) -> Result<Condition> {
        self
    }
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> Result<Condition> {
        Ok(Condition::new(self.0, self.1))
    }
}

// Explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> Result<Condition> {
        let operator = self.1.into_operator()?;
        Ok(Condition::with_operator(self.0, operator, self.2))
    }
}

/// Turn a field name into a valid bind parameter name.
///
/// Anything other than ASCII alphanumerics and `_` becomes `_`, so `users.id`
/// binds as `users_id`. A name that would start with a digit gets a leading
/// `_`, since `:2fa` is not read as a placeholder.
pub fn placeholder_name(field: &str) -> String {
    let name: String = field
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
        }
    }
}

/// A JOIN with its single ON comparison
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub left_key: String,
    pub operator: String,
    pub right_key: String,
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// Trait for values accepted as an ORDER BY direction
pub trait IntoSortDirection {
    fn into_sort_direction(self) -> Result<SortDirection>;
}

impl IntoSortDirection for SortDirection {
    fn into_sort_direction(self) -> Result<SortDirection> {
        Ok(self)
    }
}

impl IntoSortDirection for &str {
    fn into_sort_direction(self) -> Result<SortDirection> {
        match self.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(Error::argument(format!(
                "Unknown sort direction '{}', expected ASC or DESC",
                other
            ))),
        }
    }
}

/// Trait for projections accepted by `select`
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

/// Trait for column/value payloads of `insert` and `update`
pub trait IntoFields {
    fn into_fields(self) -> Vec<(String, Value)>;
}

impl<K, V> IntoFields for Vec<(K, V)>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V, const N: usize> IntoFields for [(K, V); N]
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

// HashMap iteration order is unspecified, so the column order is too
impl<K, V> IntoFields for HashMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V> IntoFields for BTreeMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}
