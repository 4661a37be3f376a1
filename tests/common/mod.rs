#![allow(dead_code)]

use std::any::Any;
use std::sync::{Arc, Mutex};

use axum::{Router, extract::State, routing::get};
use queryfilter::{
    Adaptable, CriteriaCollection, CriteriaKind, ForbiddenPolicy, QueryBag, QueryBuilder,
    QueryFilter, QueryFilterError, QueryParser, SortDirection, WhereClause, WhereInCondition,
};
use sea_orm::sea_query::{Alias, Query, SqliteQueryBuilder};

pub mod user_entity;

/// One call received by a [`RecordingBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Where(Vec<WhereClause>),
    WhereIn(WhereInCondition),
    Sort(String, SortDirection),
    Select(Vec<String>),
}

/// Records every builder call in order.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    pub calls: Vec<Call>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All where-clauses, flattened across groups.
    pub fn conditions(&self) -> Vec<&WhereClause> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Where(group) => Some(group),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn where_ins(&self) -> Vec<&WhereInCondition> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::WhereIn(condition) => Some(condition),
                _ => None,
            })
            .collect()
    }

    pub fn sorts(&self) -> Vec<(&str, SortDirection)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Sort(column, direction) => Some((column.as_str(), *direction)),
                _ => None,
            })
            .collect()
    }
}

impl QueryBuilder for RecordingBuilder {
    fn where_conditions(&mut self, conditions: Vec<WhereClause>) -> Result<(), QueryFilterError> {
        self.calls.push(Call::Where(conditions));
        Ok(())
    }

    fn where_in(&mut self, condition: WhereInCondition) -> Result<(), QueryFilterError> {
        self.calls.push(Call::WhereIn(condition));
        Ok(())
    }

    fn sort(&mut self, column: &str, direction: SortDirection) -> Result<(), QueryFilterError> {
        self.calls.push(Call::Sort(column.to_string(), direction));
        Ok(())
    }

    fn select(&mut self, columns: &[String]) -> Result<(), QueryFilterError> {
        self.calls.push(Call::Select(columns.to_vec()));
        Ok(())
    }

    fn inner_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Adaptable for RecordingBuilder {
    fn query_builder(&mut self) -> Box<dyn QueryBuilder + '_> {
        Box::new(self)
    }
}

/// What the façade handed to the parser.
#[derive(Debug, Clone)]
pub struct ParseCall {
    pub query: QueryBag,
    pub allowed_filters: Vec<String>,
    pub allowed_sorts: Vec<String>,
    pub policy: ForbiddenPolicy,
}

/// Captures parse calls and answers with a fixed collection.
#[derive(Debug, Clone, Default)]
pub struct RecordingParser {
    pub calls: Arc<Mutex<Vec<ParseCall>>>,
    pub result: CriteriaCollection,
}

impl RecordingParser {
    pub fn returning(result: CriteriaCollection) -> Self {
        Self {
            result,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ParseCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl QueryParser for RecordingParser {
    fn parse(
        &self,
        query: &QueryBag,
        allowed: &CriteriaCollection,
        policy: ForbiddenPolicy,
    ) -> Result<CriteriaCollection, QueryFilterError> {
        self.calls.lock().unwrap().push(ParseCall {
            query: query.clone(),
            allowed_filters: allowed.names(CriteriaKind::Filter),
            allowed_sorts: allowed.names(CriteriaKind::Sorting),
            policy,
        });
        Ok(self.result.clone())
    }
}

async fn list_users(
    State(users): State<QueryFilter>,
    query: QueryBag,
) -> Result<String, QueryFilterError> {
    let mut select = Query::select()
        .column(Alias::new("id"))
        .from(Alias::new("users"))
        .to_owned();
    users.apply_to(&mut select, Some(query))?;
    Ok(select.to_string(SqliteQueryBuilder))
}

/// `GET /api/v1/users` answering with the SQL the request's criteria produce.
pub fn setup_test_app(users: QueryFilter) -> Router {
    let api = Router::new()
        .route("/users", get(list_users))
        .with_state(users);

    Router::new().nest("/api/v1", api)
}
