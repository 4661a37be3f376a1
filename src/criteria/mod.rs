//! # Criteria
//!
//! A criterion is a named unit of filtering, sorting or projection logic that knows how
//! to apply itself onto a [`QueryBuilder`]. The set of variants is closed:
//!
//! | Variant                   | Kind         | Emits                                  |
//! |---------------------------|--------------|----------------------------------------|
//! | [`ExactFilter`]           | filter       | `=` per value, or one `IN` list        |
//! | [`PartialFilter`]         | filter       | `LIKE '%v%'` (OR-group for lists)      |
//! | [`LeftStrictPartialFilter`] | filter     | `LIKE 'v%'` (OR-group for lists)       |
//! | [`BetweenFilter`]         | filter       | `>= begin AND <= end`                  |
//! | [`FixedFilter`]           | filter       | pre-built conditions, ignores input    |
//! | [`CallbackFilter`]        | filter       | whatever the callback does             |
//! | [`AllowField`]            | field        | `select`                               |
//! | [`Sorting`]               | sorting      | `sort`                                 |
//!
//! Names are unique per kind inside a [`CriteriaCollection`](crate::CriteriaCollection).

use std::borrow::Cow;
use std::fmt;

use crate::builder::QueryBuilder;
use crate::conditions::SortDirection;
use crate::errors::QueryFilterError;

mod between;
mod callback;
mod exact;
mod field;
mod fixed;
mod partial;
mod sorting;

pub use between::BetweenFilter;
pub use callback::{CallbackFilter, FilterCallback};
pub use exact::ExactFilter;
pub use field::AllowField;
pub use fixed::{FixedCondition, FixedFilter};
pub use partial::{LeftStrictPartialFilter, PartialFilter};
pub use sorting::Sorting;

/// Which namespace a criterion lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriteriaKind {
    Filter,
    Sorting,
    AllowField,
}

impl CriteriaKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Filter => "Filter",
            Self::Sorting => "Sorting",
            Self::AllowField => "AllowField",
        }
    }

    pub(crate) fn requested_label(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Sorting => "sorting",
            Self::AllowField => "field",
        }
    }

    pub(crate) fn allowed_label(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Sorting => "sort",
            Self::AllowField => "field",
        }
    }
}

impl fmt::Display for CriteriaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runtime value bound to a filter: one string, or a list whose members may be `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    List(Vec<Option<String>>),
}

impl FilterValue {
    /// The value as a list, a single string becoming a one-element list.
    #[must_use]
    pub fn to_list(&self) -> Vec<Option<String>> {
        match self {
            Self::Single(value) => vec![Some(value.clone())],
            Self::List(values) => values.clone(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<Option<String>>> for FilterValue {
    fn from(values: Vec<Option<String>>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<Option<&str>>> for FilterValue {
    fn from(values: Vec<Option<&str>>) -> Self {
        Self::List(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Exact(ExactFilter),
    Partial(PartialFilter),
    LeftStrictPartial(LeftStrictPartialFilter),
    Between(BetweenFilter),
    Fixed(FixedFilter),
    Callback(CallbackFilter),
    AllowField(AllowField),
    Sorting(Sorting),
}

impl Criteria {
    /// The key the criterion is stored under. Aliased fields render as `name-as-alias`.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Exact(filter) => Cow::Borrowed(filter.name()),
            Self::Partial(filter) => Cow::Borrowed(filter.name()),
            Self::LeftStrictPartial(filter) => Cow::Borrowed(filter.name()),
            Self::Between(filter) => Cow::Borrowed(filter.name()),
            Self::Fixed(filter) => Cow::Borrowed(filter.name()),
            Self::Callback(filter) => Cow::Borrowed(filter.name()),
            Self::AllowField(field) => field.name(),
            Self::Sorting(sorting) => Cow::Borrowed(sorting.name()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CriteriaKind {
        match self {
            Self::AllowField(_) => CriteriaKind::AllowField,
            Self::Sorting(_) => CriteriaKind::Sorting,
            _ => CriteriaKind::Filter,
        }
    }

    #[must_use]
    pub fn is_filter(&self) -> bool {
        self.kind() == CriteriaKind::Filter
    }

    /// Bind a runtime value to a filter.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when the criterion is not a filter, or when the
    /// filter rejects the value's shape (see [`BetweenFilter::set_value`]).
    pub fn set_value(&mut self, value: FilterValue) -> Result<(), QueryFilterError> {
        match self {
            Self::Exact(filter) => filter.set_value(value),
            Self::Partial(filter) => filter.set_value(value),
            Self::LeftStrictPartial(filter) => filter.set_value(value),
            Self::Between(filter) => return filter.set_value(value),
            Self::Fixed(filter) => filter.set_value(value),
            Self::Callback(filter) => filter.set_value(value),
            Self::AllowField(_) | Self::Sorting(_) => {
                return Err(QueryFilterError::invalid_value(
                    self.name(),
                    format!("{} [{}] does not take a value.", self.kind(), self.name()),
                ));
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Fails with a validation error when the criterion is not a sorting.
    pub fn set_sort_direction(&mut self, direction: SortDirection) -> Result<(), QueryFilterError> {
        match self {
            Self::Sorting(sorting) => {
                sorting.set_direction(direction);
                Ok(())
            }
            _ => Err(QueryFilterError::invalid_value(
                self.name(),
                format!("{} [{}] has no sort direction.", self.kind(), self.name()),
            )),
        }
    }

    /// # Errors
    ///
    /// Propagates whatever the builder or a callback reports.
    pub fn apply(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        match self {
            Self::Exact(filter) => filter.apply(builder),
            Self::Partial(filter) => filter.apply(builder),
            Self::LeftStrictPartial(filter) => filter.apply(builder),
            Self::Between(filter) => filter.apply(builder),
            Self::Fixed(filter) => filter.apply(builder),
            Self::Callback(filter) => filter.apply(builder),
            Self::AllowField(field) => field.apply(builder),
            Self::Sorting(sorting) => sorting.apply(builder),
        }
    }
}

macro_rules! impl_from_criteria {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Criteria {
                fn from(criteria: $ty) -> Self {
                    Self::$variant(criteria)
                }
            }
        )+
    };
}

impl_from_criteria! {
    Exact => ExactFilter,
    Partial => PartialFilter,
    LeftStrictPartial => LeftStrictPartialFilter,
    Between => BetweenFilter,
    Fixed => FixedFilter,
    Callback => CallbackFilter,
    AllowField => AllowField,
    Sorting => Sorting,
}
