//! Concrete [`QueryBuilder`](crate::QueryBuilder) implementations.

mod sea_query;

pub use self::sea_query::SeaQueryAdapter;
