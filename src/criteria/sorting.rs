use crate::builder::QueryBuilder;
use crate::conditions::SortDirection;
use crate::errors::QueryFilterError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    name: String,
    column: String,
    direction: SortDirection,
}

impl Sorting {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sort on `column` instead of the column named like the sorting.
    #[must_use]
    pub fn for_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn set_direction(&mut self, direction: SortDirection) {
        self.direction = direction;
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
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// # Errors
    ///
    /// Propagates builder errors.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        if self.column.is_empty() {
            return Ok(());
        }
        builder.sort(&self.column, self.direction)
    }
}

impl From<&str> for Sorting {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Sorting {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
