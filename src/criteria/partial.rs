use crate::builder::QueryBuilder;
use crate::conditions::{Operator, OrWhereCondition, WhereClause, WhereCondition};
use crate::criteria::FilterValue;
use crate::errors::QueryFilterError;

/// Shared `LIKE` logic of the partial filters; `pattern` wraps each value.
fn apply_like(
    builder: &mut dyn QueryBuilder,
    column: &str,
    value: Option<&FilterValue>,
    pattern: fn(&str) -> String,
) -> Result<(), QueryFilterError> {
    match value {
        None => Ok(()),
        Some(FilterValue::Single(value)) if value.is_empty() => Ok(()),
        Some(FilterValue::Single(value)) => {
            let condition = WhereCondition::new(column, Operator::Like, Some(pattern(value)))?;
            builder.where_conditions(vec![condition.into()])
        }
        Some(FilterValue::List(values)) => {
            let group = values
                .iter()
                .flatten()
                .filter(|value| !value.is_empty())
                .map(|value| {
                    OrWhereCondition::new(column, Operator::Like, Some(pattern(value)))
                        .map(WhereClause::from)
                })
                .collect::<Result<Vec<_>, _>>()?;

            if group.is_empty() {
                return Ok(());
            }
            builder.where_conditions(group)
        }
    }
}

macro_rules! partial_filter {
    ($(#[$meta:meta])* $name:ident, $pattern:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            name: String,
            column: String,
            value: Option<FilterValue>,
        }

        impl $name {
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

            /// Wrap a raw value into its `LIKE` pattern.
            #[must_use]
            pub fn prepare_value(value: &str) -> String {
                ($pattern)(value)
            }

            /// # Errors
            ///
            /// Propagates builder errors.
            pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
                apply_like(builder, &self.column, self.value.as_ref(), Self::prepare_value)
            }
        }
    };
}

partial_filter!(
    /// Substring match: `column LIKE '%value%'`.
    ///
    /// A list of values becomes one OR-group, empty and `None` entries dropped.
    PartialFilter,
    |value: &str| format!("%{value}%")
);

partial_filter!(
    /// Prefix match: `column LIKE 'value%'`.
    LeftStrictPartialFilter,
    |value: &str| format!("{value}%")
);
