use crate::builder::QueryBuilder;
use crate::conditions::{Operator, WhereCondition, WhereInCondition};
use crate::criteria::FilterValue;
use crate::errors::QueryFilterError;

/// Matches a column exactly against one or more values.
///
/// Several non-null values become a single `IN` list. A single value, or any list that
/// contains `None`, becomes one equality predicate per entry so that `None` can turn
/// into `IS NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactFilter {
    name: String,
    column: String,
    value: Option<FilterValue>,
}

impl ExactFilter {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<FilterValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Filter on `column` instead of the column named like the filter.
    #[must_use]
    pub fn for_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn set_value(&mut self, value: FilterValue) {
        self.value = Some(value);
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
    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    /// # Errors
    ///
    /// Propagates builder errors.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        let Some(value) = &self.value else {
            return Ok(());
        };

        let values = value.to_list();

        if values.len() > 1 && values.iter().all(Option::is_some) {
            return builder.where_in(WhereInCondition::new(&self.column, values)?);
        }

        for value in values {
            let condition = WhereCondition::new(&self.column, Operator::Equal, value)?;
            builder.where_conditions(vec![condition.into()])?;
        }

        Ok(())
    }
}
