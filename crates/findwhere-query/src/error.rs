//! Query errors
//!
//! A query that finds nothing is not an error; these cover queries that
//! cannot be built, transported or evaluated at all.

use findwhere_css::SelectorError;
use findwhere_dom::NodeId;

/// Query error
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid selector `{selector}`: {error}")]
    Selector {
        selector: String,
        #[source]
        error: SelectorError,
    },

    #[error("Invalid pattern /{pattern}/{flags}: {message}")]
    InvalidPattern {
        pattern: String,
        flags: String,
        message: String,
    },

    #[error("Invalid value for clause key `{key}`: {reason}")]
    InvalidClause { key: String, reason: String },

    #[error("Invalid query step: {0}")]
    InvalidStep(String),

    #[error("Root must be a node reference, got {0}")]
    InvalidRoot(&'static str),

    #[error("Value at {path} cannot cross the context boundary")]
    NotTransportable { path: String },

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Transport error: {0}")]
    Transport(#[from] serde_json::Error),
}
