//! findwhere Query
//!
//! Element-finding queries that combine a structural selector with text
//! predicates. A query is authored as a [`QueryValue`], normalized into a
//! boundary-safe [`FindRequest`], and evaluated against a document by a
//! [`Dispatch`] host.
//!
//! # Example
//! ```rust,ignore
//! use findwhere_query::{Find, LocalContext, Pattern, QueryValue};
//!
//! let page = LocalContext::new(findwhere_html::parse("<h1>Hello, world</h1>")?);
//! let heading = page.find_where("h1", "Hello, world").await?;
//! let greeting = page
//!     .find(QueryValue::object([("$", "h1")]).with("matches", Pattern::new("^hello", "i")?))
//!     .await?;
//! ```

mod clause;
mod dispatch;
mod error;
mod evaluate;
mod normalize;
mod pattern;
mod value;

pub use clause::{Clause, Composition, Step};
pub use dispatch::{Dispatch, Find, LocalContext};
pub use error::QueryError;
pub use evaluate::evaluate;
pub use normalize::{FindRequest, WhereArg, find_where, normalize};
pub use pattern::{Pattern, PatternDescriptor};
pub use value::{NodeRef, QueryValue};
