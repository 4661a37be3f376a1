//! Turn untrusted query strings into validated filter, sort and field criteria, and
//! apply them onto a query builder.
//!
//! ```rust,ignore
//! use queryfilter::{QueryBag, QueryFilter};
//! use sea_orm::sea_query::{Alias, Query, SqliteQueryBuilder};
//!
//! let mut users = QueryFilter::new();
//! users.allow_filters(["name"]).allow_sorts(["street"]);
//!
//! let mut select = Query::select().column(Alias::new("id")).from(Alias::new("users")).to_owned();
//! users.apply_to(&mut select, Some(QueryBag::from_url("filter[name]=nils&sort=-street")))?;
//!
//! // SELECT "id" FROM "users" WHERE "name" LIKE '%nils%' ORDER BY "street" DESC
//! println!("{}", select.to_string(SqliteQueryBuilder));
//! ```

pub mod adapters;
pub mod builder;
pub mod collection;
pub mod conditions;
pub mod criteria;
pub mod errors;
pub mod filter;
pub mod parser;
pub mod query;
pub mod settings;

pub use adapters::SeaQueryAdapter;
pub use builder::{AdaptFn, Adaptable, AdapterRegistry, QueryBuilder};
pub use collection::CriteriaCollection;
pub use conditions::{
    Operator, OrWhereCondition, SortCondition, SortDirection, WhereClause, WhereCondition,
    WhereInCondition,
};
pub use criteria::{
    AllowField, BetweenFilter, CallbackFilter, Criteria, CriteriaKind, ExactFilter, FilterCallback,
    FilterValue, FixedCondition, FixedFilter, LeftStrictPartialFilter, PartialFilter, Sorting,
};
pub use errors::{ErrorKind, QueryFilterError};
pub use filter::QueryFilter;
pub use parser::{ForbiddenPolicy, QueryParser, SimpleQueryParser};
pub use query::{QueryBag, QuerySource};
pub use settings::{DefaultFilter, ParserConfig, Settings};
