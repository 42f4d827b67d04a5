//! Raw parsing of OData relative URIs and query option text.
//!
//! This layer is model-free: it turns option text into a borrowed AST
//! (identifiers are `&str` slices into the input) and leaves name resolution
//! and typing to the binder in [`crate::query_model`].

pub mod ast;
mod common;
mod errors;
mod expression;
mod order_by_clause;
mod query_options;
mod resource_path;
mod select_clause;

pub use errors::ODataParseError;
pub use expression::parse_filter_expression;
pub use order_by_clause::parse_order_by_clause;
pub use query_options::{parse_relative_uri, ODataUri};
pub use select_clause::{parse_expand_clause, parse_select_clause};
