//! # Error Handling
//!
//! Every failure the crate can produce is a [`QueryFilterError`]. The variants are
//! grouped into a coarse [`ErrorKind`] so callers can decide how to react without
//! matching every site:
//!
//! - **Condition**: a condition was built with a value its operator cannot take
//! - **Validation**: a criterion was given a runtime value of the wrong shape
//! - **`MalformedInput`**: the raw query input does not have the expected shape
//! - **`ForbiddenCriteria`**: the request asked for a filter, sort or field that is not allowed
//! - **`CriteriaNotFound`**: a lookup by name on a collection failed
//! - **Configuration**: settings or adapter registry misuse
//!
//! ## Usage in request handlers
//!
//! Malformed and forbidden input is the client's fault. The error implements axum's
//! `IntoResponse`, so handlers can simply propagate it with `?`:
//!
//! ```rust,ignore
//! async fn list(query: QueryBag) -> Result<String, QueryFilterError> {
//!     let mut select = Query::select().from(Alias::new("users")).to_owned();
//!     filters.apply_to(&mut select, Some(query))?;
//!     Ok(select.to_string(SqliteQueryBuilder))
//! }
//! ```
//!
//! Server-side defects (configuration and condition errors) are logged through
//! `tracing` and answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::conditions::Operator;
use crate::criteria::CriteriaKind;

/// Coarse classification of a [`QueryFilterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Condition,
    Validation,
    MalformedInput,
    ForbiddenCriteria,
    CriteriaNotFound,
    Configuration,
}

#[derive(Debug, thiserror::Error)]
pub enum QueryFilterError {
    /// A `None` value paired with an operator other than equal / not equal.
    #[error("Invalid operator [{operator}] on nullable value.")]
    InvalidOperatorForNull { operator: Operator },

    /// A where-in condition received a `None` member.
    #[error("Where-in condition on [{column}] contains a null value.")]
    NullInWhereIn { column: String },

    /// A criterion rejected the shape of its runtime value.
    #[error("{message}")]
    InvalidValue { criteria: String, message: String },

    /// The raw query input could not be interpreted.
    #[error("Could not parse query string: {reason}")]
    MalformedInput { reason: String },

    /// The request referenced a criterion that is not on the allow-list.
    #[error(
        "Requested {} [{name}] is not allowed. Allowed {}(s) are [{}]",
        .kind.requested_label(),
        .kind.allowed_label(),
        .allowed.join(" , ")
    )]
    Forbidden {
        kind: CriteriaKind,
        name: String,
        allowed: Vec<String>,
    },

    /// A collection lookup failed, either because the name is absent or
    /// because the stored criterion has another kind.
    #[error("{} [{name}] is not found.", .expected.map_or("Criteria", CriteriaKind::label))]
    NotFound {
        name: String,
        expected: Option<CriteriaKind>,
    },

    /// Settings or adapter registry misuse.
    #[error("{0}")]
    Configuration(String),
}

impl QueryFilterError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_value(criteria: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            criteria: criteria.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOperatorForNull { .. } | Self::NullInWhereIn { .. } => ErrorKind::Condition,
            Self::InvalidValue { .. } => ErrorKind::Validation,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Forbidden { .. } => ErrorKind::ForbiddenCriteria,
            Self::NotFound { .. } => ErrorKind::CriteriaNotFound,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// HTTP status a request handler should answer with.
    ///
    /// Everything the client can cause through the query string maps to
    /// `400 Bad Request`; condition and configuration errors are defects in the
    /// server's own setup and map to `500`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation
            | ErrorKind::MalformedInput
            | ErrorKind::ForbiddenCriteria
            | ErrorKind::CriteriaNotFound => StatusCode::BAD_REQUEST,
            ErrorKind::Condition | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to clients. Server-side errors are replaced by a generic text.
    fn user_message(&self) -> String {
        if self.status_code().is_server_error() {
            "An internal error occurred while filtering the query".to_string()
        } else {
            self.to_string()
        }
    }

    fn log(&self) {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, kind = ?self.kind(), "Query filter misconfigured");
        } else {
            tracing::debug!(error = %self, kind = ?self.kind(), "Rejected query input");
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for QueryFilterError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}
