use crate::builder::QueryBuilder;
use crate::conditions::{Operator, WhereCondition};
use crate::criteria::FilterValue;
use crate::errors::QueryFilterError;

/// Inclusive range: `column >= begin AND column <= end`.
///
/// Nothing is applied unless both bounds are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetweenFilter {
    name: String,
    column: String,
    begin: Option<String>,
    end: Option<String>,
}

impl BetweenFilter {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            begin: None,
            end: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.begin = Some(begin.into());
        self.end = Some(end.into());
        self
    }

    #[must_use]
    pub fn for_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Bind `[begin, end]`.
    ///
    /// # Errors
    ///
    /// Anything but a two element list is a validation error.
    pub fn set_value(&mut self, value: FilterValue) -> Result<(), QueryFilterError> {
        match value {
            FilterValue::List(values) if values.len() == 2 => {
                let mut values = values.into_iter();
                self.begin = values.next().flatten();
                self.end = values.next().flatten();
                Ok(())
            }
            _ => Err(QueryFilterError::invalid_value(
                &self.name,
                "Value for BetweenFilter has to be a list with two values.",
            )),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn range(&self) -> (Option<&str>, Option<&str>) {
        (self.begin.as_deref(), self.end.as_deref())
    }

    /// # Errors
    ///
    /// Propagates builder errors.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        let (Some(begin), Some(end)) = (&self.begin, &self.end) else {
            return Ok(());
        };

        builder.where_conditions(vec![
            WhereCondition::new(&self.column, Operator::GreaterThanOrEqual, Some(begin.clone()))?
                .into(),
            WhereCondition::new(&self.column, Operator::LessThanOrEqual, Some(end.clone()))?.into(),
        ])
    }
}
