//! Query values on the authoring side
//!
//! [`QueryValue`] is what callers build queries from. Besides plain data
//! it can hold two things plain data cannot: a live [`Pattern`] and a
//! [`NodeRef`]. [`QueryValue::to_boundary`] turns it into plain JSON for
//! the trip into the document context.

use std::collections::BTreeMap;

use findwhere_dom::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{Pattern, QueryError};

/// Handle to a node living in the document context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    subtype: NodeSubtype,
    id: NodeId,
}

/// Discriminating tag carried by every node reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeSubtype {
    Node,
}

impl NodeRef {
    pub fn new(id: NodeId) -> Self {
        Self { subtype: NodeSubtype::Node, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self::new(id)
    }
}

/// Authoring-side query value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<QueryValue>),
    Object(BTreeMap<String, QueryValue>),
    /// Live pattern; becomes `[source, flags]` on the wire
    Pattern(Pattern),
    /// Node handle; only valid as a query root
    Node(NodeRef),
}

impl QueryValue {
    /// Build an object from key/value pairs
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<QueryValue>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Set `key` on an object value; other values are returned unchanged
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        if let Self::Object(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Pattern(_) => "pattern",
            Self::Node(_) => "node",
        }
    }

    /// Convert into boundary-safe JSON
    ///
    /// Patterns become `[source, flags]` at any depth. Node references
    /// cannot be nested inside a query and are rejected.
    pub fn to_boundary(&self) -> Result<Value, QueryError> {
        self.to_boundary_at("$")
    }

    pub(crate) fn to_boundary_at(&self, path: &str) -> Result<Value, QueryError> {
        Ok(match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| item.to_boundary_at(&format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| Ok((key.clone(), value.to_boundary_at(&format!("{path}.{key}"))?)))
                    .collect::<Result<_, QueryError>>()?,
            ),
            Self::Pattern(pattern) => pattern.to_descriptor().to_value(),
            Self::Node(_) => return Err(QueryError::NotTransportable { path: path.to_string() }),
        })
    }
}

/// Plain JSON back into a query value
///
/// An object tagged `"subtype": "node"` with a valid id is read as a
/// [`NodeRef`]; everything else stays plain data, including
/// `[source, flags]` pairs.
impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                if map.get("subtype").and_then(Value::as_str) == Some("node") {
                    if let Ok(node) = serde_json::from_value::<NodeRef>(Value::Object(map.clone())) {
                        return Self::Node(node);
                    }
                }
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl From<Pattern> for QueryValue {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<NodeRef> for QueryValue {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
