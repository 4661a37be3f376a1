//! Name-keyed registry of criteria.
//!
//! A [`CriteriaCollection`] keeps one insertion-ordered map per [`CriteriaKind`], so a
//! filter, a sorting and a field may share a name. Iteration and
//! [`apply_on`](CriteriaCollection::apply_on) visit fields, then filters, then sorts,
//! each in insertion order.
//!
//! Criteria are stored behind [`Arc`]: cloning or merging a collection copies the maps
//! but shares the criteria themselves.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::builder::QueryBuilder;
use crate::criteria::{AllowField, Criteria, CriteriaKind, Sorting};
use crate::errors::QueryFilterError;

type Entries = IndexMap<String, Arc<Criteria>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaCollection {
    fields: Entries,
    filters: Entries,
    sorts: Entries,
}

impl CriteriaCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a criterion under its name, replacing any criterion of the same kind and
    /// name.
    pub fn add(&mut self, criteria: impl Into<Criteria>) -> &mut Self {
        self.add_shared(Arc::new(criteria.into()))
    }

    /// Like [`add`](Self::add), keeping the identity of an already shared criterion.
    pub fn add_shared(&mut self, criteria: Arc<Criteria>) -> &mut Self {
        let name = criteria.name().into_owned();
        self.entries_mut(criteria.kind()).insert(name, criteria);
        self
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.has_allow_field(name) || self.has_filter(name) || self.has_sorting(name)
    }

    #[must_use]
    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    #[must_use]
    pub fn has_sorting(&self, name: &str) -> bool {
        self.sorts.contains_key(name)
    }

    #[must_use]
    pub fn has_allow_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// First criterion named `name`, looking at fields, then filters, then sorts.
    ///
    /// # Errors
    ///
    /// Returns [`QueryFilterError::NotFound`] if no criterion has that name.
    pub fn get(&self, name: &str) -> Result<&Criteria, QueryFilterError> {
        [&self.fields, &self.filters, &self.sorts]
            .into_iter()
            .find_map(|entries| entries.get(name))
            .map(AsRef::as_ref)
            .ok_or_else(|| not_found(name, None))
    }

    /// # Errors
    ///
    /// Returns [`QueryFilterError::NotFound`] if there is no filter with that name.
    pub fn get_filter(&self, name: &str) -> Result<&Criteria, QueryFilterError> {
        self.get_shared(CriteriaKind::Filter, name)
            .map(AsRef::as_ref)
            .ok_or_else(|| not_found(name, Some(CriteriaKind::Filter)))
    }

    /// # Errors
    ///
    /// Returns [`QueryFilterError::NotFound`] if there is no sorting with that name.
    pub fn get_sorting(&self, name: &str) -> Result<&Sorting, QueryFilterError> {
        match self.get_shared(CriteriaKind::Sorting, name).map(AsRef::as_ref) {
            Some(Criteria::Sorting(sorting)) => Ok(sorting),
            _ => Err(not_found(name, Some(CriteriaKind::Sorting))),
        }
    }

    /// # Errors
    ///
    /// Returns [`QueryFilterError::NotFound`] if there is no field with that name.
    pub fn get_allow_field(&self, name: &str) -> Result<&AllowField, QueryFilterError> {
        match self.get_shared(CriteriaKind::AllowField, name).map(AsRef::as_ref) {
            Some(Criteria::AllowField(field)) => Ok(field),
            _ => Err(not_found(name, Some(CriteriaKind::AllowField))),
        }
    }

    /// The shared handle stored for `kind` and `name`.
    #[must_use]
    pub fn get_shared(&self, kind: CriteriaKind, name: &str) -> Option<&Arc<Criteria>> {
        self.entries(kind).get(name)
    }

    #[must_use]
    pub fn only_filters(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn only_sorts(&self) -> Self {
        Self {
            sorts: self.sorts.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn only_allow_fields(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            ..Self::default()
        }
    }

    /// A new collection with the entries of `others` added on top of `self`, in order.
    /// Later collections win on a name collision; the first position of a name is kept.
    #[must_use]
    pub fn merge<'a, I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a CriteriaCollection>,
    {
        let mut merged = self.clone();
        for other in others {
            for criteria in other.iter_shared() {
                merged.add_shared(Arc::clone(criteria));
            }
        }
        merged
    }

    /// Names stored for one kind, in insertion order.
    #[must_use]
    pub fn names(&self, kind: CriteriaKind) -> Vec<String> {
        self.entries(kind).keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criteria> {
        self.iter_shared().map(AsRef::as_ref)
    }

    fn iter_shared(&self) -> impl Iterator<Item = &Arc<Criteria>> {
        self.fields
            .values()
            .chain(self.filters.values())
            .chain(self.sorts.values())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.filters.len() + self.sorts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every criterion onto `builder`: fields, then filters, then sorts.
    ///
    /// # Errors
    ///
    /// Stops at the first criterion that fails and returns its error.
    pub fn apply_on(&self, builder: &mut dyn QueryBuilder) -> Result<(), QueryFilterError> {
        for criteria in self.iter() {
            tracing::trace!(name = %criteria.name(), kind = %criteria.kind(), "Applying criteria");
            criteria.apply(builder)?;
        }
        Ok(())
    }

    fn entries(&self, kind: CriteriaKind) -> &Entries {
        match kind {
            CriteriaKind::AllowField => &self.fields,
            CriteriaKind::Filter => &self.filters,
            CriteriaKind::Sorting => &self.sorts,
        }
    }

    fn entries_mut(&mut self, kind: CriteriaKind) -> &mut Entries {
        match kind {
            CriteriaKind::AllowField => &mut self.fields,
            CriteriaKind::Filter => &mut self.filters,
            CriteriaKind::Sorting => &mut self.sorts,
        }
    }
}

fn not_found(name: &str, expected: Option<CriteriaKind>) -> QueryFilterError {
    QueryFilterError::NotFound {
        name: name.to_string(),
        expected,
    }
}

impl<C: Into<Criteria>> FromIterator<C> for CriteriaCollection {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut collection = Self::new();
        for criteria in iter {
            collection.add(criteria);
        }
        collection
    }
}

impl<C: Into<Criteria>> Extend<C> for CriteriaCollection {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        for criteria in iter {
            self.add(criteria);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{ExactFilter, PartialFilter};

    fn sample() -> CriteriaCollection {
        CriteriaCollection::from_iter([
            Criteria::from(ExactFilter::new("name")),
            Criteria::from(Sorting::new("name")),
            Criteria::from(AllowField::new("name")),
            Criteria::from(PartialFilter::new("street")),
        ])
    }

    #[test]
    fn test_kinds_share_names() {
        let collection = sample();
        assert_eq!(collection.len(), 4);
        assert!(collection.has_filter("name"));
        assert!(collection.has_sorting("name"));
        assert!(collection.has_allow_field("name"));
        assert!(!collection.has_sorting("street"));
        assert!(collection.has("street"));
        assert!(!collection.has("age"));
    }

    #[test]
    fn test_typed_getters() {
        let collection = sample();
        assert!(matches!(collection.get_filter("street"), Ok(Criteria::Partial(_))));
        assert_eq!(collection.get_sorting("name").unwrap().name(), "name");
        assert_eq!(collection.get_allow_field("name").unwrap().column(), "name");
        assert!(matches!(collection.get("name"), Ok(Criteria::AllowField(_))));

        let err = collection.get_sorting("street").unwrap_err();
        assert_eq!(err.to_string(), "Sorting [street] is not found.");
        let err = collection.get("age").unwrap_err();
        assert_eq!(err.to_string(), "Criteria [age] is not found.");
    }

    #[test]
    fn test_add_overwrites_same_name() {
        let mut collection = CriteriaCollection::new();
        collection.add(ExactFilter::new("name"));
        collection.add(PartialFilter::new("name"));

        assert_eq!(collection.len(), 1);
        assert!(matches!(collection.get_filter("name"), Ok(Criteria::Partial(_))));
    }

    #[test]
    fn test_only_views_are_non_destructive() {
        let collection = sample();

        assert_eq!(collection.only_filters().names(CriteriaKind::Filter), ["name", "street"]);
        assert!(collection.only_filters().names(CriteriaKind::Sorting).is_empty());
        assert_eq!(collection.only_sorts().len(), 1);
        assert_eq!(collection.only_allow_fields().len(), 1);
        assert_eq!(collection.len(), 4);
    }

    #[test]
    fn test_iteration_groups_kinds() {
        let mut collection = CriteriaCollection::new();
        collection.add(Sorting::new("b"));
        collection.add(ExactFilter::new("z"));
        collection.add(AllowField::new("f"));
        collection.add(ExactFilter::new("a"));

        let order: Vec<String> = collection.iter().map(|c| c.name().into_owned()).collect();
        assert_eq!(order, ["f", "z", "a", "b"]);
    }

    #[test]
    fn test_merge_later_wins_and_shares_criteria() {
        let first = CriteriaCollection::from_iter([ExactFilter::new("a"), ExactFilter::new("b")]);
        let second =
            CriteriaCollection::from_iter([PartialFilter::new("b")].map(Criteria::from));

        let merged = first.merge([&second]);

        assert_eq!(merged.names(CriteriaKind::Filter), ["a", "b"]);
        assert!(matches!(merged.get_filter("b"), Ok(Criteria::Partial(_))));
        assert!(Arc::ptr_eq(
            merged.get_shared(CriteriaKind::Filter, "a").unwrap(),
            first.get_shared(CriteriaKind::Filter, "a").unwrap(),
        ));

        // the source collections are untouched
        assert!(matches!(first.get_filter("b"), Ok(Criteria::Exact(_))));
    }
}
