//! Clauses and steps
//!
//! Raw clause objects accept several spellings for each predicate. They
//! are canonicalized once, before evaluation, into a [`Clause`]:
//!
//! | field      | read from, first wins                                  |
//! |------------|--------------------------------------------------------|
//! | `is`       | `is` if non-null, else `equals`                         |
//! | `contains` | first truthy of `contains`, `includes`                  |
//! | `matches`  | first truthy of `matches`, `match`, `regex`             |
//! | `not`      | truthiness of `not` if non-null, else `exists == false` |
//! | `is_empty` | `isEmpty` if non-null, else `empty`                     |
//!
//! A truthy `is_empty` sets `is` to `""` when `is` is still unset. `is`
//! compares strictly: a non-string value never equals any text, while
//! `contains` reads numbers and booleans by their text form.
//! When `and` or `or` is present the direct predicates and the clause's
//! own `$` are ignored; only `not` still applies. `and` wins over `or`.

use findwhere_css::{SelectorList, query_selector};
use findwhere_dom::{DomTree, NodeId};
use serde_json::{Map, Value};

use crate::{Pattern, PatternDescriptor, QueryError};

const SELECTOR_KEY: &str = "$";
const DIRECT_KEYS: &[&str] = &[
    "is", "equals", "contains", "includes", "matches", "match", "regex", "isEmpty", "empty",
];

/// Canonical text predicate
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clause {
    /// Evaluate text predicates on the first matching descendant instead
    pub target: Option<SelectorList>,
    pub is: Option<String>,
    /// `is` was given a non-string value, so no text can equal it
    pub is_unsatisfiable: bool,
    pub contains: Option<String>,
    pub matches: Option<Pattern>,
    pub not: bool,
    pub composition: Option<Composition>,
}

/// Boolean composition of sub-clauses
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    And(Vec<Clause>),
    Or(Vec<Clause>),
}

impl Clause {
    /// Canonicalize a raw clause value
    ///
    /// A string is shorthand for `{ "is": string }` and null for the
    /// empty clause.
    pub fn canonicalize(raw: &Value) -> Result<Self, QueryError> {
        match raw {
            Value::Null => Ok(Self::default()),
            Value::String(text) => Ok(Self {
                is: Some(text.clone()),
                ..Self::default()
            }),
            Value::Object(map) => Self::from_map(map, false),
            other => Err(QueryError::InvalidClause {
                key: "where".to_string(),
                reason: format!("expected an object, got {}", json_kind(other)),
            }),
        }
    }

    /// Canonicalize a clause object
    ///
    /// With `skip_selector`, `$` is left out; a step object used as its
    /// own clause must not reuse its candidate selector as a target.
    pub fn from_map(map: &Map<String, Value>, skip_selector: bool) -> Result<Self, QueryError> {
        let first_set = |keys: &[&'static str]| {
            keys.iter()
                .find_map(|&key| map.get(key).filter(|v| !v.is_null()).map(|v| (key, v)))
        };
        let first_truthy = |keys: &[&'static str]| {
            keys.iter()
                .find_map(|&key| map.get(key).filter(|v| truthy(v)).map(|v| (key, v)))
        };

        let is_empty = first_set(&["isEmpty", "empty"]).is_some_and(|(_, v)| truthy(v));
        let (is, is_unsatisfiable) = match first_set(&["is", "equals"]) {
            Some((_, Value::String(text))) => (Some(text.clone()), false),
            Some((key, other)) => {
                tracing::debug!(key, kind = json_kind(other), "non-string exact text never matches");
                (None, true)
            }
            None => (is_empty.then(String::new), false),
        };

        let contains = first_truthy(&["contains", "includes"])
            .map(|(key, v)| text_value(key, v))
            .transpose()?;

        let matches = first_truthy(&["matches", "match", "regex"])
            .map(|(key, v)| Pattern::from_descriptor(&PatternDescriptor::from_value(key, v)?))
            .transpose()?;

        let not = match map.get("not").filter(|v| !v.is_null()) {
            Some(value) => truthy(value),
            None => map.get("exists") == Some(&Value::Bool(false)),
        };

        let target = if skip_selector {
            None
        } else {
            match map.get(SELECTOR_KEY) {
                None | Some(Value::Null) => None,
                Some(Value::String(text)) if text.is_empty() => None,
                Some(Value::String(text)) => Some(parse_selector(text)?),
                Some(other) => {
                    return Err(QueryError::InvalidClause {
                        key: SELECTOR_KEY.to_string(),
                        reason: format!("expected a selector string, got {}", json_kind(other)),
                    });
                }
            }
        };

        let composition = match (first_truthy(&["and"]), first_truthy(&["or"])) {
            (Some((key, value)), or) => {
                if or.is_some() {
                    tracing::debug!("clause has both `and` and `or`; ignoring `or`");
                }
                Some(Composition::And(sub_clauses(key, value)?))
            }
            (None, Some((key, value))) => Some(Composition::Or(sub_clauses(key, value)?)),
            (None, None) => None,
        };

        if composition.is_some() {
            let ignored: Vec<&str> = DIRECT_KEYS
                .iter()
                .copied()
                .chain((!skip_selector).then_some(SELECTOR_KEY))
                .filter(|key| map.contains_key(*key))
                .collect();
            if !ignored.is_empty() {
                tracing::debug!(?ignored, "clause mixes and/or with direct predicates; ignoring them");
            }
            return Ok(Self {
                not,
                composition,
                ..Self::default()
            });
        }

        Ok(Self {
            target,
            is,
            is_unsatisfiable,
            contains,
            matches,
            not,
            composition: None,
        })
    }

    /// Check whether `element` satisfies this clause
    pub fn holds(&self, tree: &DomTree, element: NodeId) -> bool {
        let result = match &self.composition {
            Some(Composition::And(clauses)) => clauses.iter().all(|c| c.holds(tree, element)),
            Some(Composition::Or(clauses)) => clauses.iter().any(|c| c.holds(tree, element)),
            None => self.text_matches(tree, element),
        };
        result != self.not
    }

    fn text_matches(&self, tree: &DomTree, element: NodeId) -> bool {
        if self.is_unsatisfiable {
            return false;
        }
        let target = match &self.target {
            Some(selector) => match query_selector(tree, element, selector) {
                Some(target) => target,
                None => return false,
            },
            None => element,
        };

        // An element without text reads as ""
        let text = tree.first_text(target);
        self.is
            .as_deref()
            .is_none_or(|expected| text.unwrap_or("") == expected)
            && self
                .contains
                .as_deref()
                .is_none_or(|needle| text.is_some_and(|t| t.contains(needle)))
            && self
                .matches
                .as_ref()
                .is_none_or(|pattern| text.is_some_and(|t| pattern.is_match(t)))
    }
}

/// One stage of a query: candidates from `selector`, filtered by `clause`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Candidate selector; without one the current scope is the only candidate
    pub selector: Option<SelectorList>,
    pub clause: Clause,
}

impl Step {
    /// Read a step from its wire form
    ///
    /// A string is a bare selector. An object carries its clause under
    /// `where`, or inline next to `$`.
    pub fn parse(raw: &Value) -> Result<Self, QueryError> {
        match raw {
            Value::String(text) => Ok(Self {
                selector: (!text.is_empty()).then(|| parse_selector(text)).transpose()?,
                clause: Clause::default(),
            }),
            Value::Object(map) => {
                let selector = match map.get(SELECTOR_KEY) {
                    None | Some(Value::Null) => None,
                    Some(Value::String(text)) if text.is_empty() => None,
                    Some(Value::String(text)) => Some(parse_selector(text)?),
                    Some(other) => {
                        return Err(QueryError::InvalidStep(format!(
                            "`$` must be a selector string, got {}",
                            json_kind(other)
                        )));
                    }
                };
                let clause = match map.get("where").filter(|v| truthy(v)) {
                    Some(clause) => Clause::canonicalize(clause)?,
                    None => Clause::from_map(map, true)?,
                };
                Ok(Self { selector, clause })
            }
            other => Err(QueryError::InvalidStep(format!(
                "expected a selector or an object, got {}",
                json_kind(other)
            ))),
        }
    }

    /// First candidate under `scope` that satisfies the clause
    pub fn select(&self, tree: &DomTree, scope: NodeId) -> Option<NodeId> {
        match &self.selector {
            Some(selector) => findwhere_css::select(tree, scope, selector)
                .find(|&candidate| self.clause.holds(tree, candidate)),
            None => Some(scope).filter(|&candidate| self.clause.holds(tree, candidate)),
        }
    }
}

fn parse_selector(text: &str) -> Result<SelectorList, QueryError> {
    SelectorList::parse(text).map_err(|error| QueryError::Selector {
        selector: text.to_string(),
        error,
    })
}

fn sub_clauses(key: &str, value: &Value) -> Result<Vec<Clause>, QueryError> {
    match value {
        Value::Array(items) => items.iter().map(Clause::canonicalize).collect(),
        other => Err(QueryError::InvalidClause {
            key: key.to_string(),
            reason: format!("expected an array of clauses, got {}", json_kind(other)),
        }),
    }
}

/// `contains` needle; scalars are read by their text form
fn text_value(key: &str, value: &Value) -> Result<String, QueryError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(QueryError::InvalidClause {
            key: key.to_string(),
            reason: format!("expected text, got {}", json_kind(other)),
        }),
    }
}

/// Truthiness as the query language defines it: null, false, 0 and ""
/// are false, everything else is true
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
