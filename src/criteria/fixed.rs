use crate::builder::QueryBuilder;
use crate::conditions::{OrWhereCondition, SortCondition, WhereClause, WhereCondition};
use crate::criteria::FilterValue;
use crate::errors::QueryFilterError;

/// A condition stored in a [`FixedFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedCondition {
    Where(WhereClause),
    Sort(SortCondition),
}

impl From<WhereCondition> for FixedCondition {
    fn from(condition: WhereCondition) -> Self {
        Self::Where(condition.into())
    }
}

impl From<OrWhereCondition> for FixedCondition {
    fn from(condition: OrWhereCondition) -> Self {
        Self::Where(condition.into())
    }
}

impl From<WhereClause> for FixedCondition {
    fn from(clause: WhereClause) -> Self {
        Self::Where(clause)
    }
}

impl From<SortCondition> for FixedCondition {
    fn from(condition: SortCondition) -> Self {
        Self::Sort(condition)
    }
}

/// A bundle of pre-built conditions that ignores request input.
///
/// All where conditions are applied as one group (keeping their AND/OR tags), then
/// every sort condition in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedFilter {
    name: String,
    conditions: Vec<FixedCondition>,
}

impl FixedFilter {
    pub fn new<I, C>(name: impl Into<String>, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<FixedCondition>,
    {
        Self {
            name: name.into(),
            conditions: conditions.into_iter().map(Into::into).collect(),
        }
    }

    /// Fixed filters ignore runtime input.
    pub fn set_value(&mut self, _value: FilterValue) {}

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn conditions(&self) -> &[FixedCondition] {
        &self.conditions
    }

    /// # Errors
    ///
    /// Propagates builder errors.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        let group: Vec<WhereClause> = self
            .conditions
            .iter()
            .filter_map(|condition| match condition {
                FixedCondition::Where(clause) => Some(clause.clone()),
                FixedCondition::Sort(_) => None,
            })
            .collect();

        if !group.is_empty() {
            builder.where_conditions(group)?;
        }

        for condition in &self.conditions {
            if let FixedCondition::Sort(sort) = condition {
                builder.sort(sort.column(), sort.direction())?;
            }
        }

        Ok(())
    }
}
