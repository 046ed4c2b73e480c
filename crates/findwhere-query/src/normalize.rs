//! Query normalization
//!
//! Reshapes the loose ways a query can be written into a [`FindRequest`]:
//! an optional root plus a list of boundary-safe steps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{NodeRef, QueryError, QueryValue};

/// A normalized query, ready to cross the context boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindRequest {
    /// Scope of the first step; the document when absent
    pub root: Option<NodeRef>,
    pub queries: Vec<Value>,
}

/// Normalize a query
///
/// With one argument, `root_or_queries` is the query. With two, it is the
/// root (a node or null) and `queries` is the query. The query may be a
/// single step or a list of steps; a node in first position of the list
/// replaces the root.
pub fn normalize(root_or_queries: QueryValue, queries: Option<QueryValue>) -> Result<FindRequest, QueryError> {
    let (root, queries) = match queries {
        Some(queries) => (root_or_queries, queries),
        None => (QueryValue::Null, root_or_queries),
    };

    let mut root = match root {
        QueryValue::Null => None,
        QueryValue::Node(node) => Some(node),
        other => return Err(QueryError::InvalidRoot(other.kind())),
    };

    let mut steps = match queries {
        QueryValue::Array(steps) => steps,
        single => vec![single],
    };

    if let Some(QueryValue::Node(node)) = steps.first() {
        root = Some(*node);
        steps.remove(0);
    }

    let queries = steps
        .iter()
        .enumerate()
        .map(|(i, step)| step.to_boundary_at(&format!("$[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::trace!(?root, steps = queries.len(), "normalized query");
    Ok(FindRequest { root, queries })
}

/// Clause argument of [`find_where`]
#[derive(Debug, Clone, PartialEq)]
pub enum WhereArg {
    /// Exact text
    Text(String),
    Clause(QueryValue),
}

impl From<&str> for WhereArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for WhereArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<QueryValue> for WhereArg {
    fn from(value: QueryValue) -> Self {
        match value {
            QueryValue::String(text) => Self::Text(text),
            clause => Self::Clause(clause),
        }
    }
}

impl From<WhereArg> for QueryValue {
    fn from(arg: WhereArg) -> Self {
        match arg {
            WhereArg::Text(text) => QueryValue::object([("is", text)]),
            WhereArg::Clause(clause) => clause,
        }
    }
}

/// Build the single-step query `[{ "$": selector, "where": clause }]`
///
/// Plain text becomes an exact-text clause.
pub fn find_where(
    root: Option<NodeRef>,
    selector: &str,
    where_: impl Into<WhereArg>,
) -> Result<FindRequest, QueryError> {
    let step = QueryValue::object([("$", QueryValue::from(selector))])
        .with("where", QueryValue::from(where_.into()));
    normalize(root.into(), Some(QueryValue::Array(vec![step])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;
    use findwhere_dom::NodeId;
    use serde_json::json;

    fn node(raw: u32) -> NodeRef {
        NodeRef::new(NodeId::new(raw))
    }

    #[test]
    fn test_single_step_is_wrapped() {
        let request = normalize(QueryValue::from("h1"), None).unwrap();
        assert_eq!(request, FindRequest { root: None, queries: vec![json!("h1")] });
    }

    #[test]
    fn test_explicit_root() {
        let request = normalize(node(3).into(), Some(QueryValue::from(vec!["ul", "li"]))).unwrap();
        assert_eq!(request.root, Some(node(3)));
        assert_eq!(request.queries, vec![json!("ul"), json!("li")]);
    }

    #[test]
    fn test_null_root_with_queries() {
        let request = normalize(QueryValue::Null, Some(QueryValue::from("p"))).unwrap();
        assert_eq!(request.root, None);
    }

    #[test]
    fn test_leading_node_becomes_root() {
        let queries = QueryValue::Array(vec![node(5).into(), QueryValue::from("span")]);
        let request = normalize(queries, None).unwrap();
        assert_eq!(request.root, Some(node(5)));
        assert_eq!(request.queries, vec![json!("span")]);
    }

    #[test]
    fn test_invalid_root() {
        let result = normalize(QueryValue::from(true), Some(QueryValue::from("p")));
        assert!(matches!(result, Err(QueryError::InvalidRoot("boolean"))));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let query = QueryValue::Array(vec![
            node(2).into(),
            QueryValue::from("div"),
            QueryValue::object([("$", QueryValue::from("h1"))])
                .with("matches", Pattern::new("^Hello", "i").unwrap())
                .with(
                    "and",
                    vec![
                        QueryValue::object([("regex", Pattern::new("w.rld", "").unwrap())]),
                        QueryValue::object([("not", true)]),
                    ],
                ),
        ]);

        let once = normalize(query, None).unwrap();
        let replayed = QueryValue::from(serde_json::to_value(&once.queries).unwrap());
        let twice = normalize(once.root.into(), Some(replayed)).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.queries[1]["matches"], json!(["^Hello", "i"]));
        assert_eq!(once.queries[1]["and"][0]["regex"], json!(["w.rld", ""]));
    }

    #[test]
    fn test_find_where_wraps_text() {
        let request = find_where(None, "h1", "Hello").unwrap();
        assert_eq!(request.queries, vec![json!({"$": "h1", "where": {"is": "Hello"}})]);
    }

    #[test]
    fn test_find_where_keeps_clause() {
        let clause = QueryValue::object([("contains", "world")]);
        let request = find_where(Some(node(1)), "h1", clause).unwrap();
        assert_eq!(request.root, Some(node(1)));
        assert_eq!(request.queries, vec![json!({"$": "h1", "where": {"contains": "world"}})]);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = find_where(None, "h1", QueryValue::object([("contains", "world")])).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"root": null, "queries": [{"$": "h1", "where": {"contains": "world"}}]})
        );
    }
}
