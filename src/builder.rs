//! The adapter contract criteria apply themselves onto.
//!
//! A [`QueryBuilder`] is a thin translator from the condition model in
//! [`conditions`](crate::conditions) to the native calls of some backend. Criteria only
//! ever talk to this trait, so the same allow-list works for sea-query statements, test
//! doubles, or any other consumer of structured predicates.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use crate::conditions::{SortDirection, WhereClause, WhereInCondition};
use crate::errors::QueryFilterError;

pub trait QueryBuilder {
    /// Add one parenthesised group of conditions, AND-ed to whatever the builder
    /// already holds.
    ///
    /// Inside the group conditions are folded left to right: [`WhereClause::And`]
    /// members AND into the running expression, [`WhereClause::Or`] members OR into
    /// it. The first member always starts the group, whatever its tag.
    ///
    /// # Errors
    ///
    /// Adapters may reject conditions their backend cannot express.
    fn where_conditions(&mut self, conditions: Vec<WhereClause>) -> Result<(), QueryFilterError>;

    /// # Errors
    ///
    /// Adapters may reject conditions their backend cannot express.
    fn where_in(&mut self, condition: WhereInCondition) -> Result<(), QueryFilterError>;

    /// # Errors
    ///
    /// Adapters may reject columns their backend cannot sort on.
    fn sort(&mut self, column: &str, direction: SortDirection) -> Result<(), QueryFilterError>;

    /// Add projected columns. Entries may be `"column"` or `"column as alias"`.
    ///
    /// Only needed when field criteria are used; the default rejects the call.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless the adapter supports projections.
    fn select(&mut self, columns: &[String]) -> Result<(), QueryFilterError> {
        Err(QueryFilterError::configuration(format!(
            "Adapter does not support selecting fields [{}]",
            columns.join(", ")
        )))
    }

    /// The wrapped backend builder, for callbacks that need calls this contract
    /// does not cover. Downcast it to the concrete type.
    fn inner_mut(&mut self) -> &mut dyn Any;
}

impl<B: QueryBuilder + ?Sized> QueryBuilder for &mut B {
    fn where_conditions(&mut self, conditions: Vec<WhereClause>) -> Result<(), QueryFilterError> {
        (**self).where_conditions(conditions)
    }

    fn where_in(&mut self, condition: WhereInCondition) -> Result<(), QueryFilterError> {
        (**self).where_in(condition)
    }

    fn sort(&mut self, column: &str, direction: SortDirection) -> Result<(), QueryFilterError> {
        (**self).sort(column, direction)
    }

    fn select(&mut self, columns: &[String]) -> Result<(), QueryFilterError> {
        (**self).select(columns)
    }

    fn inner_mut(&mut self) -> &mut dyn Any {
        (**self).inner_mut()
    }
}

/// A backend builder that knows how to wrap itself in a [`QueryBuilder`].
pub trait Adaptable: Any {
    fn query_builder(&mut self) -> Box<dyn QueryBuilder + '_>;
}

/// Wraps a `T` in the adapter that translates criteria calls for it.
pub type AdaptFn<T> = for<'a> fn(&'a mut T) -> Box<dyn QueryBuilder + 'a>;

trait ErasedAdapter: Send + Sync {
    fn adapt<'a>(&self, target: &'a mut dyn Any) -> Option<Box<dyn QueryBuilder + 'a>>;
}

struct FnAdapter<T> {
    adapt: AdaptFn<T>,
}

impl<T: Any> ErasedAdapter for FnAdapter<T> {
    fn adapt<'a>(&self, target: &'a mut dyn Any) -> Option<Box<dyn QueryBuilder + 'a>> {
        target.downcast_mut::<T>().map(self.adapt)
    }
}

/// Maps concrete builder types to the adapter that wraps them.
///
/// Lookups happen by [`TypeId`] when a builder is adapted, so registering a type never
/// fails; asking for an unregistered type is a configuration error at use time.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<TypeId, (&'static str, Box<dyn ErasedAdapter>)>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the adapter constructor for `T`.
    pub fn register<T: Any>(&mut self, adapt: AdaptFn<T>) -> &mut Self {
        self.adapters.insert(
            TypeId::of::<T>(),
            (type_name::<T>(), Box::new(FnAdapter { adapt })),
        );
        self
    }

    /// Register a type that implements [`Adaptable`] itself.
    pub fn register_adaptable<T: Adaptable>(&mut self) -> &mut Self {
        self.register::<T>(T::query_builder)
    }

    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.adapters.contains_key(&TypeId::of::<T>())
    }

    /// Wrap `target` in its registered adapter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no adapter is registered for the target's type.
    pub fn adapt<'a>(
        &self,
        target: &'a mut dyn Any,
    ) -> Result<Box<dyn QueryBuilder + 'a>, QueryFilterError> {
        let type_id = (*target).type_id();
        let (_, adapter) = self.adapters.get(&type_id).ok_or_else(|| {
            QueryFilterError::configuration(format!(
                "Could not find adapter for builder type. Registered types are [{}]",
                self.registered_types().join(", ")
            ))
        })?;

        adapter.adapt(target).ok_or_else(|| {
            QueryFilterError::configuration("Registered adapter does not match the builder type")
        })
    }

    fn registered_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.adapters.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
