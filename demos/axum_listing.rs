//! Filtering a user listing from the request's query string.
//!
//! ```bash
//! cargo run --example axum_listing
//! ```
//!
//! The handler answers with the SQL the query string produces instead of running it,
//! so the example needs no database.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::get,
};
use queryfilter::{
    BetweenFilter, CallbackFilter, FilterValue, Operator, QueryBag, QueryFilter, QueryFilterError,
    WhereCondition,
};
use sea_orm::sea_query::{Alias, Query, SqliteQueryBuilder};
use tower::ServiceExt;

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

fn users_filter() -> QueryFilter {
    // `filter[adult]=1` keeps users of age
    let adult = CallbackFilter::new("adult", |builder, _, value| {
        if value != Some(&FilterValue::from("1")) {
            return Ok(());
        }
        let condition =
            WhereCondition::new("age", Operator::GreaterThanOrEqual, Some("18".to_string()))?;
        builder.where_conditions(vec![condition.into()])
    });

    let mut users = QueryFilter::new();
    users
        .add_default_criteria([
            BetweenFilter::new("created_at").with_range("2020-01-01", "2020-12-31")
        ])
        .allow_filters(["name", "email"])
        .allow([adult])
        .allow_sorts(["name", "created_at"])
        .allow_fields(["name", "email"]);
    users
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let app = Router::new()
        .route("/users", get(list_users))
        .with_state(users_filter());

    for uri in [
        "/users",
        "/users?filter%5Bname%5D=nils&sort=-created_at",
        "/users?filter%5Bemail%5D=%40example.com,%40example.org&fields=name,email",
        "/users?filter%5Badult%5D=1&sort=name",
        "/users?filter%5Bpassword%5D=secret",
    ] {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;
        let status: StatusCode = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        println!("GET {uri}\n  {status} {}\n", String::from_utf8_lossy(&body));
    }

    Ok(())
}
