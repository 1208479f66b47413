use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Authentication required by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    None,
    ApiKey,
    Signed,
}

impl SecurityLevel {
    pub const fn requires_api_key(self) -> bool {
        matches!(self, Self::ApiKey | Self::Signed)
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::ApiKey => write!(f, "API-KEY"),
            Self::Signed => write!(f, "SIGNED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Insertion-ordered query parameters
///
/// The serialized form is the canonical string: it is both what gets signed
/// and what goes on the wire, so parameter order is preserved exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a parameter, replacing an existing value in place so its position is kept
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    /// Append a parameter only when the key is not present yet. Returns whether it was added.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl ToString) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.params.push((key, value.to_string()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to `key=value&key=value`, form-url-encoded, in insertion order
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

/// Query argument accepted by endpoint methods
///
/// `Primary` is the bare-string shorthand (`trades("BTCUSDT")`), normalized to
/// `{primary_key: value}` for endpoints that declare a primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Primary(String),
    Params(Query),
}

impl Default for QueryInput {
    fn default() -> Self {
        Self::Params(Query::new())
    }
}

impl From<&str> for QueryInput {
    fn from(value: &str) -> Self {
        Self::Primary(value.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(value: String) -> Self {
        Self::Primary(value)
    }
}

impl From<Query> for QueryInput {
    fn from(query: Query) -> Self {
        Self::Params(query)
    }
}

impl From<Option<Query>> for QueryInput {
    fn from(query: Option<Query>) -> Self {
        Self::Params(query.unwrap_or_default())
    }
}

/// Parameter a bare string is coerced into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    Symbol,
    Asset,
    ListenKey,
}

impl PrimaryKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Asset => "asset",
            Self::ListenKey => "listenKey",
        }
    }
}

/// Response body: parsed JSON, or the raw text when the body is not JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Raw(String),
}

impl Payload {
    /// Parse a response body, falling back to the raw text
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).map_or_else(|_| Self::Raw(body.to_string()), Self::Json)
    }

    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Raw(text) => f.write_str(text),
        }
    }
}
