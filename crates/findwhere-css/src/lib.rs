//! findwhere CSS Selectors
//!
//! Selector parsing and matching with `querySelector` /
//! `querySelectorAll` semantics: results are descendants of a scope
//! node, in document order, while combinators may look at ancestors
//! outside the scope.

mod parser;
mod selectors;

pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};

use findwhere_dom::{DomTree, NodeId};

/// Lazily yield descendants of `scope` matching `selectors`, in document order
pub fn select<'a>(
    tree: &'a DomTree,
    scope: NodeId,
    selectors: &'a SelectorList,
) -> impl Iterator<Item = NodeId> + 'a {
    tree.descendants(scope)
        .filter(move |&id| selectors.matches(tree, id, scope))
}

/// All descendants of `scope` matching `selectors`, in document order
pub fn query_selector_all(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
    let matched: Vec<NodeId> = select(tree, scope, selectors).collect();
    tracing::trace!(?scope, count = matched.len(), "query_selector_all");
    matched
}

/// First descendant of `scope` matching `selectors`
pub fn query_selector(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    select(tree, scope, selectors).next()
}

/// Selector syntax error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Invalid selector at {line}:{column}: {message}")]
    Syntax { line: u32, column: u32, message: String },

    #[error("Unsupported selector: {0}")]
    Unsupported(&'static str),
}
