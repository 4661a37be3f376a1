//! Configuration for the [`QueryFilter`](crate::QueryFilter) façade and the parser.
//!
//! [`ParserConfig`] is plain data and can live in an application's own config file:
//!
//! ```toml
//! [query_filter]
//! filter_keyword = "filter"
//! sort_keyword = "sort"
//! fields_keyword = "fields"
//! delimiter = ","
//! skip_forbidden_criteria = false
//! ```
//!
//! [`Settings`] adds the runtime pieces: the parser, the adapter registry, the filter
//! used for names allowed without an instance, and an optional ambient query source.

use std::fmt;
use std::sync::Arc;

use sea_orm::sea_query::SelectStatement;
use serde::{Deserialize, Serialize};

use crate::builder::AdapterRegistry;
use crate::criteria::{Criteria, ExactFilter, LeftStrictPartialFilter, PartialFilter};
use crate::errors::QueryFilterError;
use crate::parser::{QueryParser, SimpleQueryParser};
use crate::query::{QueryBag, QuerySource};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Top-level key holding the `name => value` filter map.
    #[serde(default = "default_filter_keyword")]
    pub filter_keyword: String,

    #[serde(default = "default_sort_keyword")]
    pub sort_keyword: String,

    #[serde(default = "default_fields_keyword")]
    pub fields_keyword: String,

    /// Separator for list values, e.g. `sort=-name,street`.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Drop unknown criteria instead of rejecting the request.
    #[serde(default)]
    pub skip_forbidden_criteria: bool,
}

fn default_filter_keyword() -> String {
    "filter".to_string()
}

fn default_sort_keyword() -> String {
    "sort".to_string()
}

fn default_fields_keyword() -> String {
    "fields".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            filter_keyword: default_filter_keyword(),
            sort_keyword: default_sort_keyword(),
            fields_keyword: default_fields_keyword(),
            delimiter: default_delimiter(),
            skip_forbidden_criteria: false,
        }
    }
}

impl ParserConfig {
    /// # Errors
    ///
    /// Returns a configuration error if the delimiter or any keyword is empty.
    pub fn validate(&self) -> Result<(), QueryFilterError> {
        if self.delimiter.is_empty() {
            return Err(QueryFilterError::configuration(
                "Parser delimiter must not be empty",
            ));
        }

        for (setting, keyword) in [
            ("filter_keyword", &self.filter_keyword),
            ("sort_keyword", &self.sort_keyword),
            ("fields_keyword", &self.fields_keyword),
        ] {
            if keyword.is_empty() {
                return Err(QueryFilterError::configuration(format!(
                    "Parser setting [{setting}] must not be empty"
                )));
            }
        }

        Ok(())
    }
}

/// Filter built for names passed to [`QueryFilter::allow_filters`](crate::QueryFilter::allow_filters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFilter {
    Exact,
    #[default]
    Partial,
    LeftStrictPartial,
}

impl DefaultFilter {
    #[must_use]
    pub fn build(self, name: &str) -> Criteria {
        match self {
            Self::Exact => ExactFilter::new(name).into(),
            Self::Partial => PartialFilter::new(name).into(),
            Self::LeftStrictPartial => LeftStrictPartialFilter::new(name).into(),
        }
    }
}

pub struct Settings {
    skip_forbidden_criteria: bool,
    parser: Arc<dyn QueryParser>,
    default_filter: DefaultFilter,
    adapters: AdapterRegistry,
    query_source: Option<Arc<dyn QuerySource>>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut adapters = AdapterRegistry::new();
        adapters.register_adaptable::<SelectStatement>();

        Self {
            skip_forbidden_criteria: false,
            parser: Arc::new(SimpleQueryParser::default()),
            default_filter: DefaultFilter::default(),
            adapters,
            query_source: None,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings using a [`SimpleQueryParser`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn from_config(config: ParserConfig) -> Result<Self, QueryFilterError> {
        let skip_forbidden_criteria = config.skip_forbidden_criteria;
        Ok(Self {
            skip_forbidden_criteria,
            parser: Arc::new(SimpleQueryParser::new(config)?),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn skip_forbidden_criteria(mut self, skip: bool) -> Self {
        self.skip_forbidden_criteria = skip;
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: impl QueryParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    #[must_use]
    pub fn with_default_filter(mut self, default_filter: DefaultFilter) -> Self {
        self.default_filter = default_filter;
        self
    }

    /// Where the query input comes from when none is given explicitly.
    #[must_use]
    pub fn with_query_source(mut self, source: impl QuerySource + 'static) -> Self {
        self.query_source = Some(Arc::new(source));
        self
    }

    #[must_use]
    pub fn with_adapters(mut self, adapters: AdapterRegistry) -> Self {
        self.adapters = adapters;
        self
    }

    pub fn adapters_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.adapters
    }

    #[must_use]
    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    #[must_use]
    pub fn parser(&self) -> &dyn QueryParser {
        self.parser.as_ref()
    }

    #[must_use]
    pub fn default_filter(&self) -> DefaultFilter {
        self.default_filter
    }

    #[must_use]
    pub fn skips_forbidden_criteria(&self) -> bool {
        self.skip_forbidden_criteria
    }

    /// The ambient query input, or an empty bag without a source.
    #[must_use]
    pub fn ambient_query(&self) -> QueryBag {
        self.query_source
            .as_ref()
            .map(|source| source.query())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("skip_forbidden_criteria", &self.skip_forbidden_criteria)
            .field("parser", &self.parser)
            .field("default_filter", &self.default_filter)
            .field("adapters", &self.adapters)
            .field("query_source", &self.query_source.is_some())
            .finish()
    }
}
