//! Query evaluation
//!
//! Runs inside the document context. Each step narrows the scope to its
//! first satisfying candidate; a step with no such candidate ends the
//! whole query with no match. Earlier steps are never revisited.

use findwhere_dom::{Document, NodeId};
use serde_json::Value;

use crate::{NodeRef, QueryError, Step};

/// Evaluate normalized `queries` against `document`
///
/// Scope starts at `root`, or the document node when `root` is absent.
pub fn evaluate(document: &Document, root: Option<NodeRef>, queries: &[Value]) -> Result<Option<NodeId>, QueryError> {
    let tree = document.tree();
    let steps = queries.iter().map(Step::parse).collect::<Result<Vec<_>, _>>()?;

    let mut scope = match root {
        Some(node) if tree.contains(node.id()) => node.id(),
        Some(node) => return Err(QueryError::UnknownNode(node.id())),
        None => document.root(),
    };
    tracing::debug!(?scope, steps = steps.len(), "evaluating query");

    for (index, step) in steps.iter().enumerate() {
        match step.select(tree, scope) {
            Some(found) => {
                tracing::trace!(step = index, ?found, "step matched");
                scope = found;
            }
            None => {
                tracing::debug!(step = index, ?scope, "no candidate matched");
                return Ok(None);
            }
        }
    }

    Ok(Some(scope))
}
