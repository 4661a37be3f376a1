//! Turning a [`QueryBag`] into criteria, checked against an allow-list.
//!
//! [`SimpleQueryParser`] understands three top-level keys (names configurable through
//! [`ParserConfig`]):
//!
//! - `filter[<name>]=<value>`: filter values, a delimited value becomes a list
//! - `sort=<name>,-<name>`: sort order, a leading `-` sorts descending
//! - `fields=<name>,<name>`: selected fields
//!
//! Every requested name must be on the allow-list. What happens otherwise is decided
//! by the [`ForbiddenPolicy`] passed to [`QueryParser::parse`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::collection::CriteriaCollection;
use crate::conditions::SortDirection;
use crate::criteria::{CriteriaKind, FilterValue};
use crate::errors::QueryFilterError;
use crate::query::QueryBag;
use crate::settings::ParserConfig;

/// What to do with a requested criterion that is not allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForbiddenPolicy {
    /// Fail the whole parse with [`QueryFilterError::Forbidden`].
    #[default]
    Reject,
    /// Drop the entry and keep going.
    Skip,
}

impl From<bool> for ForbiddenPolicy {
    /// `true` means skip.
    fn from(skip: bool) -> Self {
        if skip { Self::Skip } else { Self::Reject }
    }
}

pub trait QueryParser: fmt::Debug + Send + Sync {
    /// Parse `query` into criteria bound to their runtime values.
    ///
    /// The returned criteria are copies of the entries in `allowed`; the allow-list
    /// itself is left untouched.
    ///
    /// # Errors
    ///
    /// Fails on malformed input, on forbidden names under [`ForbiddenPolicy::Reject`],
    /// and when a filter rejects its value.
    fn parse(
        &self,
        query: &QueryBag,
        allowed: &CriteriaCollection,
        policy: ForbiddenPolicy,
    ) -> Result<CriteriaCollection, QueryFilterError>;
}

#[derive(Debug, Clone, Default)]
pub struct SimpleQueryParser {
    config: ParserConfig,
}

impl SimpleQueryParser {
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: ParserConfig) -> Result<Self, QueryFilterError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn parse_filters(
        &self,
        query: &QueryBag,
        allowed: &CriteriaCollection,
        policy: ForbiddenPolicy,
    ) -> Result<CriteriaCollection, QueryFilterError> {
        let mut parsed = CriteriaCollection::new();

        let entries = match query.get(&self.config.filter_keyword) {
            None | Some(Value::Null) => return Ok(parsed),
            Some(Value::Object(entries)) => entries,
            Some(Value::Array(items)) if items.is_empty() => return Ok(parsed),
            Some(_) => {
                return Err(QueryFilterError::malformed(format!(
                    "[{}] has to map filter names to values",
                    self.config.filter_keyword
                )));
            }
        };

        for (name, raw) in entries {
            // integer keys come from list syntax like `filter[]=` or `filter[0]=`
            if !name.is_empty() && name.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(QueryFilterError::malformed(format!(
                    "filter name [{name}] has to be a string"
                )));
            }

            let Some(definition) = allowed.get_shared(CriteriaKind::Filter, name) else {
                forbidden(CriteriaKind::Filter, name, allowed, policy)?;
                continue;
            };

            let Value::String(raw) = raw else {
                return Err(QueryFilterError::malformed(format!(
                    "value of filter [{name}] has to be a string"
                )));
            };

            let value = self.tokenize(raw);
            if is_blank(&value) {
                tracing::debug!(name = %name, "Skipping filter without value");
                continue;
            }

            let mut filter = Arc::clone(definition);
            Arc::make_mut(&mut filter).set_value(value)?;
            parsed.add_shared(filter);
        }

        Ok(parsed)
    }

    fn parse_sorts(
        &self,
        query: &QueryBag,
        allowed: &CriteriaCollection,
        policy: ForbiddenPolicy,
    ) -> Result<CriteriaCollection, QueryFilterError> {
        let mut parsed = CriteriaCollection::new();

        for token in self.tokens(query, &self.config.sort_keyword)? {
            let (name, direction) = match token.strip_prefix('-') {
                Some(name) => (name, SortDirection::Descending),
                None => (token.as_str(), SortDirection::Ascending),
            };

            let Some(definition) = allowed.get_shared(CriteriaKind::Sorting, name) else {
                forbidden(CriteriaKind::Sorting, name, allowed, policy)?;
                continue;
            };

            let mut sorting = Arc::clone(definition);
            Arc::make_mut(&mut sorting).set_sort_direction(direction)?;
            parsed.add_shared(sorting);
        }

        Ok(parsed)
    }

    fn parse_fields(
        &self,
        query: &QueryBag,
        allowed: &CriteriaCollection,
        policy: ForbiddenPolicy,
    ) -> Result<CriteriaCollection, QueryFilterError> {
        let mut parsed = CriteriaCollection::new();

        for name in self.tokens(query, &self.config.fields_keyword)? {
            match allowed.get_shared(CriteriaKind::AllowField, &name) {
                Some(field) => {
                    parsed.add_shared(Arc::clone(field));
                }
                None => forbidden(CriteriaKind::AllowField, &name, allowed, policy)?,
            }
        }

        Ok(parsed)
    }

    /// Non-empty tokens of the scalar under `key`.
    fn tokens(&self, query: &QueryBag, key: &str) -> Result<Vec<String>, QueryFilterError> {
        let tokens = match self.tokenize(&query.get_string(key)?) {
            FilterValue::Single(token) => vec![token],
            FilterValue::List(tokens) => tokens.into_iter().flatten().collect(),
        };
        Ok(tokens.into_iter().filter(|token| !token.is_empty()).collect())
    }

    /// A raw value without the delimiter is trimmed and kept as a scalar. Otherwise it
    /// is split, every piece trimmed, and empty pieces dropped.
    fn tokenize(&self, raw: &str) -> FilterValue {
        if !raw.contains(self.config.delimiter.as_str()) {
            return FilterValue::Single(raw.trim().to_string());
        }

        FilterValue::List(
            raw.split(self.config.delimiter.as_str())
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(|piece| Some(piece.to_string()))
                .collect(),
        )
    }
}

impl QueryParser for SimpleQueryParser {
    fn parse(
        &self,
        query: &QueryBag,
        allowed: &CriteriaCollection,
        policy: ForbiddenPolicy,
    ) -> Result<CriteriaCollection, QueryFilterError> {
        let filters = self.parse_filters(query, allowed, policy)?;
        let sorts = self.parse_sorts(query, allowed, policy)?;
        let fields = self.parse_fields(query, allowed, policy)?;

        Ok(filters.merge([&sorts, &fields]))
    }
}

fn is_blank(value: &FilterValue) -> bool {
    match value {
        FilterValue::Single(value) => value.is_empty(),
        FilterValue::List(values) => values.is_empty(),
    }
}

fn forbidden(
    kind: CriteriaKind,
    name: &str,
    allowed: &CriteriaCollection,
    policy: ForbiddenPolicy,
) -> Result<(), QueryFilterError> {
    match policy {
        ForbiddenPolicy::Skip => {
            tracing::debug!(name = %name, kind = %kind, "Skipping forbidden criteria");
            Ok(())
        }
        ForbiddenPolicy::Reject => Err(QueryFilterError::Forbidden {
            kind,
            name: name.to_string(),
            allowed: allowed.names(kind),
        }),
    }
}
