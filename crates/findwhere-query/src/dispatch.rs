//! Dispatch across the context boundary
//!
//! [`Dispatch`] is the one operation a host provides: run the evaluator
//! inside the document context with a normalized request and hand back a
//! node reference. [`Find`] is the caller-facing surface on top of it.

use findwhere_dom::Document;

use crate::{FindRequest, NodeRef, QueryError, QueryValue, WhereArg, evaluate, find_where, normalize};

/// Host collaborator that evaluates a request inside the document context
///
/// Transport failures are returned as-is; the caller sees them unmodified
/// and nothing is retried.
#[allow(async_fn_in_trait)]
pub trait Dispatch {
    async fn dispatch(&self, request: FindRequest) -> Result<Option<NodeRef>, QueryError>;
}

/// Element-finding surface, available on every [`Dispatch`] host
#[allow(async_fn_in_trait)]
pub trait Find: Dispatch {
    /// Find the first element matching `queries`, searching the whole document
    async fn find(&self, queries: impl Into<QueryValue>) -> Result<Option<NodeRef>, QueryError> {
        self.dispatch(normalize(queries.into(), None)?).await
    }

    /// Find the first element matching `queries` below `root`
    async fn find_in(&self, root: NodeRef, queries: impl Into<QueryValue>) -> Result<Option<NodeRef>, QueryError> {
        self.dispatch(normalize(root.into(), Some(queries.into()))?).await
    }

    /// Find the first `selector` match satisfying `where_`; text means exact text
    async fn find_where(&self, selector: &str, where_: impl Into<WhereArg>) -> Result<Option<NodeRef>, QueryError> {
        self.dispatch(find_where(None, selector, where_)?).await
    }

    async fn find_where_in(
        &self,
        root: NodeRef,
        selector: &str,
        where_: impl Into<WhereArg>,
    ) -> Result<Option<NodeRef>, QueryError> {
        self.dispatch(find_where(Some(root), selector, where_)?).await
    }
}

impl<D: Dispatch> Find for D {}

/// In-process document context
///
/// Requests go through a JSON round trip before evaluation, so only data
/// that survives a real boundary reaches the evaluator.
#[derive(Debug)]
pub struct LocalContext {
    document: Document,
}

impl LocalContext {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dispatch for LocalContext {
    async fn dispatch(&self, request: FindRequest) -> Result<Option<NodeRef>, QueryError> {
        let wire = serde_json::to_string(&request)?;
        tracing::trace!(bytes = wire.len(), "request crossing context boundary");

        let request: FindRequest = serde_json::from_str(&wire)?;
        let found = evaluate(&self.document, request.root, &request.queries)?;
        Ok(found.map(NodeRef::new))
    }
}
