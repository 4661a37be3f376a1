use std::fmt;
use std::sync::Arc;

use crate::builder::QueryBuilder;
use crate::criteria::FilterValue;
use crate::errors::QueryFilterError;

/// Signature of a [`CallbackFilter`] body: `(builder, column, value)`.
pub type FilterCallback = Arc<
    dyn Fn(&mut dyn QueryBuilder, &str, Option<&FilterValue>) -> Result<(), QueryFilterError>
        + Send
        + Sync,
>;

/// Escape hatch: hands the builder, the effective column and the bound value to a
/// user function, which is fully responsible for touching the builder.
#[derive(Clone)]
pub struct CallbackFilter {
    name: String,
    column: String,
    value: Option<FilterValue>,
    callback: FilterCallback,
}

impl CallbackFilter {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut dyn QueryBuilder, &str, Option<&FilterValue>) -> Result<(), QueryFilterError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            value: None,
            callback: Arc::new(callback),
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
    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        (self.callback)(builder, &self.column, self.value.as_ref())
    }
}

impl fmt::Debug for CallbackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackFilter")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Two callback filters are equal when they share the same callback and state.
impl PartialEq for CallbackFilter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.column == other.column
            && self.value == other.value
            && Arc::ptr_eq(&self.callback, &other.callback)
    }
}
