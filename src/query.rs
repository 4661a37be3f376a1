//! Raw query input.
//!
//! A [`QueryBag`] is the nested, string-keyed map the parser reads from. It is usually
//! decoded from a URL query string, where bracket keys build the nesting:
//!
//! ```text
//! filter[name]=nils&filter[age]=20&sort=-street&fields=name,email
//! ```
//!
//! becomes
//!
//! ```json
//! { "filter": { "name": "nils", "age": "20" }, "sort": "-street", "fields": "name,email" }
//! ```

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde_json::{Map, Value};

use crate::errors::QueryFilterError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBag {
    values: Map<String, Value>,
}

impl QueryBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a full URL or a bare query string.
    ///
    /// Keys like `a[b][c]` build nested objects and `a[]` appends to an array. Text
    /// after the last closing bracket is ignored, and a later scalar overwrites an
    /// earlier one under the same key. Keys nested deeper than 64 levels are dropped.
    #[must_use]
    pub fn from_url(input: &str) -> Self {
        let query = input.split_once('?').map_or(input, |(_, query)| query);
        let query = query.split_once('#').map_or(query, |(query, _)| query);

        let mut values = Map::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let Some((root, path)) = split_key(&key) else {
                tracing::debug!(key = %key, "Dropping query key nested too deeply");
                continue;
            };
            if root.is_empty() {
                continue;
            }
            let slot = values.entry(root.to_string()).or_insert(Value::Null);
            assign(slot, &path, value.into_owned());
        }

        Self { values }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The scalar under `key` as a string. Numbers and booleans are stringified, a
    /// missing key or `null` reads as `""`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryFilterError::MalformedInput`] if the value is an array or object.
    pub fn get_string(&self, key: &str) -> Result<String, QueryFilterError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(value) => scalar_to_string(value).ok_or_else(|| {
                QueryFilterError::malformed(format!("value of [{key}] has to be a string"))
            }),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Strings, numbers and booleans as text; `None` for null, arrays and objects.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Bracket levels a key may nest.
const MAX_NESTING: usize = 64;

/// Split `a[b][]` into `("a", ["b", ""])`. A key with an unclosed bracket is taken
/// literally; `None` if the key nests deeper than [`MAX_NESTING`].
fn split_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let Some(open) = key.find('[') else {
        return Some((key, Vec::new()));
    };

    let mut path = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        if path.len() == MAX_NESTING {
            return None;
        }
        path.push(&inner[..close]);
        rest = &inner[close + 1..];
    }

    if path.is_empty() {
        Some((key, path))
    } else {
        Some((&key[..open], path))
    }
}

fn assign(mut slot: &mut Value, path: &[&str], value: String) {
    for segment in path {
        let Some(next) = descend(slot, segment) else {
            return;
        };
        slot = next;
    }
    *slot = Value::String(value);
}

/// The child of `slot` for one path segment; an empty segment appends.
fn descend<'a>(slot: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    if segment.is_empty() {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        let items = slot.as_array_mut()?;
        items.push(Value::Null);
        items.last_mut()
    } else {
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        Some(slot.as_object_mut()?.entry(segment).or_insert(Value::Null))
    }
}

impl From<Map<String, Value>> for QueryBag {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl TryFrom<Value> for QueryBag {
    type Error = QueryFilterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(QueryFilterError::malformed(format!(
                "query input has to be an object, got [{other}]"
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for QueryBag
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.uri.query().map(Self::from_url).unwrap_or_default())
    }
}

/// Supplies the query input when none is passed explicitly, for example the current
/// request's parameters held in a task-local.
pub trait QuerySource: Send + Sync {
    fn query(&self) -> QueryBag;
}

impl<F> QuerySource for F
where
    F: Fn() -> QueryBag + Send + Sync,
{
    fn query(&self) -> QueryBag {
        self()
    }
}
