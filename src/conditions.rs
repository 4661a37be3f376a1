//! Immutable condition values criteria hand to a [`QueryBuilder`](crate::QueryBuilder).
//!
//! Only two invariants are enforced here: a `None` value may only be compared with
//! [`Operator::Equal`] or [`Operator::NotEqual`] (they become `IS NULL` / `IS NOT NULL`),
//! and a where-in list never contains `None`.

use std::fmt;
use std::str::FromStr;

use crate::errors::QueryFilterError;

/// Comparison operators for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// LIKE pattern matching
    Like,
    /// NOT LIKE pattern matching
    NotLike,
}

impl Operator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Like => "like",
            Self::NotLike => "not like",
        }
    }

    /// Whether the operator can be compared against a `None` value.
    #[must_use]
    pub fn accepts_null(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn check_nullable(operator: Operator, value: Option<&String>) -> Result<(), QueryFilterError> {
    if value.is_none() && !operator.accepts_null() {
        return Err(QueryFilterError::InvalidOperatorForNull { operator });
    }
    Ok(())
}

/// A predicate AND-joined into its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereCondition {
    column: String,
    operator: Operator,
    value: Option<String>,
}

impl WhereCondition {
    /// # Errors
    ///
    /// Returns [`QueryFilterError::InvalidOperatorForNull`] when `value` is `None`
    /// and `operator` is neither equal nor not equal.
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: Option<String>,
    ) -> Result<Self, QueryFilterError> {
        check_nullable(operator, value.as_ref())?;
        Ok(Self {
            column: column.into(),
            operator,
            value,
        })
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A predicate OR-joined with the predicates before it in the same group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrWhereCondition {
    column: String,
    operator: Operator,
    value: Option<String>,
}

impl OrWhereCondition {
    /// # Errors
    ///
    /// Same invariant as [`WhereCondition::new`].
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: Option<String>,
    ) -> Result<Self, QueryFilterError> {
        check_nullable(operator, value.as_ref())?;
        Ok(Self {
            column: column.into(),
            operator,
            value,
        })
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// One member of a where group, tagged with how it joins the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereClause {
    And(WhereCondition),
    Or(OrWhereCondition),
}

impl WhereClause {
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::And(condition) => condition.column(),
            Self::Or(condition) => condition.column(),
        }
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        match self {
            Self::And(condition) => condition.operator(),
            Self::Or(condition) => condition.operator(),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::And(condition) => condition.value(),
            Self::Or(condition) => condition.value(),
        }
    }

    #[must_use]
    pub fn is_or(&self) -> bool {
        matches!(self, Self::Or(_))
    }
}

impl From<WhereCondition> for WhereClause {
    fn from(condition: WhereCondition) -> Self {
        Self::And(condition)
    }
}

impl From<OrWhereCondition> for WhereClause {
    fn from(condition: OrWhereCondition) -> Self {
        Self::Or(condition)
    }
}

/// Set membership: `column IN (values...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereInCondition {
    column: String,
    values: Vec<String>,
}

impl WhereInCondition {
    /// # Errors
    ///
    /// Returns [`QueryFilterError::NullInWhereIn`] if any member is `None`.
    pub fn new<I>(column: impl Into<String>, values: I) -> Result<Self, QueryFilterError>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let column = column.into();
        let values = values
            .into_iter()
            .collect::<Option<Vec<String>>>()
            .ok_or_else(|| QueryFilterError::NullInWhereIn {
                column: column.clone(),
            })?;
        Ok(Self { column, values })
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Ascending)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Descending)
        } else {
            Err(QueryFilterError::invalid_value(
                "SortDirection",
                format!("Unknown sort direction [{s}], expected [asc] or [desc]."),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCondition {
    column: String,
    direction: SortDirection,
}

impl SortCondition {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}
