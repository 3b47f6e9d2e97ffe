//! SQL comparison operators used by `where_` / `or_where`

use std::borrow::Cow;
use std::fmt::{self, Display};

use crate::{Error, Result};

/// A comparison operator placed between a field and its bind placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(Cow<'static, str>);

impl Operator {
    pub const EQ: Self = Operator(Cow::Borrowed("="));
    pub const NEQ: Self = Operator(Cow::Borrowed("!="));
    pub const LT_GT: Self = Operator(Cow::Borrowed("<>"));
    pub const GT: Self = Operator(Cow::Borrowed(">"));
    pub const LT: Self = Operator(Cow::Borrowed("<"));
    pub const GTE: Self = Operator(Cow::Borrowed(">="));
    pub const LTE: Self = Operator(Cow::Borrowed("<="));
    pub const NULL_SAFE_EQ: Self = Operator(Cow::Borrowed("<=>"));
    pub const LIKE: Self = Operator(Cow::Borrowed("LIKE"));
    pub const NOT_LIKE: Self = Operator(Cow::Borrowed("NOT LIKE"));

    /// Create a custom operator for dialect-specific comparisons.
    ///
    /// The text is placed into the SQL as is and may be built at runtime.
    ///
    /// # Examples
    /// ```
    /// use querent::Operator;
    ///
    /// let regexp = Operator::custom("REGEXP");
    /// assert_eq!(regexp.as_str(), "REGEXP");
    ///
    /// let negated = Operator::custom(format!("NOT {}", regexp));
    /// assert_eq!(negated.as_str(), "NOT REGEXP");
    /// ```
    pub fn custom(op: impl Into<Cow<'static, str>>) -> Self {
        Operator(op.into())
    }

    /// Parse one of the known operator spellings, ignoring case and extra spaces
    pub fn parse(op: &str) -> Result<Self> {
        let normalized = op.split_whitespace().collect::<Vec<_>>().join(" ");
        let parsed = match normalized.to_ascii_uppercase().as_str() {
            "=" => Operator::EQ,
            "!=" => Operator::NEQ,
            "<>" => Operator::LT_GT,
            ">" => Operator::GT,
            "<" => Operator::LT,
            ">=" => Operator::GTE,
            "<=" => Operator::LTE,
            "<=>" => Operator::NULL_SAFE_EQ,
            "LIKE" => Operator::LIKE,
            "NOT LIKE" => Operator::NOT_LIKE,
            _ => {
                return Err(Error::argument(format!(
                    "Unknown operator '{}'. Use Operator::custom for dialect-specific operators",
                    normalized
                )))
            }
        };
        Ok(parsed)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Result<Operator>;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Result<Operator> {
        Ok(self)
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> Result<Operator> {
        Operator::parse(self)
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> Result<Operator> {
        Operator::parse(&self)
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const NEQ: Operator = Operator::NEQ;
    pub const LT_GT: Operator = Operator::LT_GT;
    pub const GT: Operator = Operator::GT;
    pub const LT: Operator = Operator::LT;
    pub const GTE: Operator = Operator::GTE;
    pub const LTE: Operator = Operator::LTE;
    pub const NULL_SAFE_EQ: Operator = Operator::NULL_SAFE_EQ;
    pub const LIKE: Operator = Operator::LIKE;
    pub const NOT_LIKE: Operator = Operator::NOT_LIKE;
}
