//! JSON query encoding for list calls.
//!
//! Each query is a JSON object sent as one repeated `queries[]` parameter,
//! e.g. `{"method":"equal","attribute":"category","values":["desktop"]}`.

use std::fmt::{self, Display, Formatter};

use serde_json::{Map, Value, json};

/// Attribute holding the system creation timestamp.
pub const CREATED_AT: &str = "$createdAt";

/// One list-call query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    method: &'static str,
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    /// `attribute == value`.
    #[must_use]
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.to_string()),
            values: vec![value.into()],
        }
    }

    /// Sort descending by `attribute`.
    #[must_use]
    pub fn order_desc(attribute: &str) -> Self {
        Self {
            method: "orderDesc",
            attribute: Some(attribute.to_string()),
            values: Vec::new(),
        }
    }

    /// Sort ascending by `attribute`.
    #[must_use]
    pub fn order_asc(attribute: &str) -> Self {
        Self {
            method: "orderAsc",
            attribute: Some(attribute.to_string()),
            values: Vec::new(),
        }
    }

    /// Cap the number of returned documents.
    #[must_use]
    pub fn limit(count: u32) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![json!(count)],
        }
    }

    /// Newest first by creation time.
    #[must_use]
    pub fn newest_first() -> Self {
        Self::order_desc(CREATED_AT)
    }

    /// Query method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// Target attribute, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Operand values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// JSON object form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("method".into(), Value::from(self.method));
        if let Some(attribute) = &self.attribute {
            object.insert("attribute".into(), Value::from(attribute.as_str()));
        }
        if !self.values.is_empty() {
            object.insert("values".into(), Value::Array(self.values.clone()));
        }
        Value::Object(object)
    }

    /// Parse the JSON object form back into a query.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let method = match value.get("method")?.as_str()? {
            "equal" => "equal",
            "orderDesc" => "orderDesc",
            "orderAsc" => "orderAsc",
            "limit" => "limit",
            _ => return None,
        };
        Some(Self {
            method,
            attribute: value
                .get("attribute")
                .and_then(Value::as_str)
                .map(str::to_string),
            values: value
                .get("values")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// `(key, value)` pairs for a query string.
#[must_use]
pub fn encode_queries(queries: &[Query]) -> Vec<(&'static str, String)> {
    queries
        .iter()
        .map(|query| ("queries[]", query.to_string()))
        .collect()
}
