//! The request-facing entry point.
//!
//! A [`QueryFilter`] holds two collections: default criteria that are always applied,
//! and the allow-list the request may pick from. Per request it parses the query input
//! against the allow-list, merges the result with the defaults, and applies everything
//! onto a builder.
//!
//! ```rust,ignore
//! let mut users = QueryFilter::new();
//! users
//!     .add_default_criteria([BetweenFilter::new("created_at").with_range("2020-01-01", "2020-01-31")])
//!     .allow_filters(["name"])
//!     .allow_sorts(["street"])
//!     .allow_fields(["name", "email"]);
//!
//! let mut select = Query::select().from(Alias::new("users")).to_owned();
//! users.apply_to(&mut select, Some(QueryBag::from_url("filter[name]=nils&sort=-street")))?;
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::builder::Adaptable;
use crate::collection::CriteriaCollection;
use crate::criteria::{AllowField, Criteria, Sorting};
use crate::errors::QueryFilterError;
use crate::parser::ForbiddenPolicy;
use crate::query::QueryBag;
use crate::settings::Settings;

/// Cloning copies both collections, so a clone can be extended per request without
/// affecting the original. Settings are shared.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    settings: Arc<Settings>,
    skip_forbidden_criteria: Option<bool>,
    defaults: CriteriaCollection,
    allowed: CriteriaCollection,
}

impl QueryFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: impl Into<Arc<Settings>>) -> Self {
        Self {
            settings: settings.into(),
            ..Self::default()
        }
    }

    /// Criteria applied on every request, without any allow-list check.
    pub fn add_default_criteria<I, C>(&mut self, criteria: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Criteria>,
    {
        self.defaults.extend(criteria);
        self
    }

    /// Allow filters by name, built with the settings' [`DefaultFilter`](crate::DefaultFilter).
    pub fn allow_filters<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let default_filter = self.settings.default_filter();
        for name in names {
            self.allowed.add(default_filter.build(name.as_ref()));
        }
        self
    }

    pub fn allow_sorts<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.allowed.add(Sorting::new(name.as_ref()));
        }
        self
    }

    pub fn allow_fields<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.allowed.add(AllowField::new(name.as_ref()));
        }
        self
    }

    /// Allow configured criteria instances. Each lands in the allow-list of its kind.
    pub fn allow<I, C>(&mut self, criteria: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Criteria>,
    {
        self.allowed.extend(criteria);
        self
    }

    /// Override the settings' forbidden-criteria policy for this filter.
    pub fn skip_forbidden_criteria(&mut self, skip: bool) -> &mut Self {
        self.skip_forbidden_criteria = Some(skip);
        self
    }

    fn forbidden_policy(&self) -> ForbiddenPolicy {
        self.skip_forbidden_criteria
            .unwrap_or_else(|| self.settings.skips_forbidden_criteria())
            .into()
    }

    /// Parse `query` (or the ambient query when `None`) and merge it with the defaults.
    ///
    /// # Errors
    ///
    /// Propagates parser errors: malformed input, forbidden criteria, invalid values.
    pub fn criteria(&self, query: Option<QueryBag>) -> Result<CriteriaCollection, QueryFilterError> {
        let query = query.unwrap_or_else(|| self.settings.ambient_query());
        let parsed = self
            .settings
            .parser()
            .parse(&query, &self.allowed, self.forbidden_policy())?;

        Ok(self.defaults.merge([&parsed]))
    }

    /// Apply the request's criteria onto any builder type registered in the settings'
    /// adapter registry.
    ///
    /// # Errors
    ///
    /// Fails like [`criteria`](Self::criteria), with a configuration error when no
    /// adapter is registered for the target type, or with whatever a criterion reports.
    pub fn apply_on(&self, target: &mut dyn Any, query: Option<QueryBag>) -> Result<(), QueryFilterError> {
        let criteria = self.criteria(query)?;
        let mut builder = self.settings.adapters().adapt(target)?;
        criteria.apply_on(builder.as_mut())
    }

    /// Like [`apply_on`](Self::apply_on) for builders that adapt themselves.
    ///
    /// # Errors
    ///
    /// Fails like [`criteria`](Self::criteria) or with whatever a criterion reports.
    pub fn apply_to<T: Adaptable>(&self, target: &mut T, query: Option<QueryBag>) -> Result<(), QueryFilterError> {
        let criteria = self.criteria(query)?;
        criteria.apply_on(target.query_builder().as_mut())
    }

    #[must_use]
    pub fn allowed_criteria(&self) -> &CriteriaCollection {
        &self.allowed
    }

    #[must_use]
    pub fn default_criteria(&self) -> &CriteriaCollection {
        &self.defaults
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CriteriaKind, ExactFilter};
    use crate::settings::DefaultFilter;

    #[test]
    fn test_allow_by_name_uses_default_filter() {
        let mut filter = QueryFilter::new();
        filter.allow_filters(["name"]);
        assert!(matches!(filter.allowed_criteria().get_filter("name"), Ok(Criteria::Partial(_))));

        let mut filter =
            QueryFilter::with_settings(Settings::new().with_default_filter(DefaultFilter::Exact));
        filter.allow_filters(vec!["name".to_string()]);
        assert!(matches!(filter.allowed_criteria().get_filter("name"), Ok(Criteria::Exact(_))));
    }

    #[test]
    fn test_clone_does_not_share_registries() {
        let mut base = QueryFilter::new();
        base.allow_sorts(["name"]);

        let mut clone = base.clone();
        clone.allow_sorts(["street"]).add_default_criteria([ExactFilter::new("active").with_value("1")]);

        assert_eq!(base.allowed_criteria().names(CriteriaKind::Sorting), ["name"]);
        assert!(base.default_criteria().is_empty());
        assert_eq!(clone.allowed_criteria().len(), 2);
    }

    #[test]
    fn test_skip_override_wins_over_settings() {
        let mut filter = QueryFilter::new();
        filter.allow_filters(["name"]);
        assert!(filter.criteria(Some(QueryBag::from_url("filter[age]=1"))).is_err());

        filter.skip_forbidden_criteria(true);
        let criteria = filter.criteria(Some(QueryBag::from_url("filter[age]=1"))).unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_defaults_are_kept_when_nothing_requested() {
        let mut filter = QueryFilter::new();
        filter
            .add_default_criteria([Sorting::new("created_at")])
            .allow_sorts(["created_at"]);

        let criteria = filter.criteria(None).unwrap();
        assert_eq!(criteria.names(CriteriaKind::Sorting), ["created_at"]);
    }
}
