use std::borrow::Cow;

use crate::builder::QueryBuilder;
use crate::errors::QueryFilterError;

/// A column clients may project with the `fields` parameter.
///
/// An aliased field is keyed as `name-as-alias`, so the same column can be allowed
/// several times under different aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowField {
    name: String,
    alias: Option<String>,
}

impl AllowField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match &self.alias {
            None => Cow::Borrowed(&self.name),
            Some(alias) => Cow::Owned(format!("{}-as-{alias}", self.name)),
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// # Errors
    ///
    /// Fails when the builder does not support projections.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        let column = match &self.alias {
            None => self.name.clone(),
            Some(alias) => format!("{} as {alias}", self.name),
        };
        builder.select(&[column])
    }
}

impl From<&str> for AllowField {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AllowField {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
