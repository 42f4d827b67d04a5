//! Bound query model: the raw parser output resolved against an [`EdmModel`].
//!
//! Binding resolves property names (through base-type chains and
//! entity-typed properties), types constants and inserts conversion wrappers
//! where a literal needs promotion to the property's primitive kind. The
//! result is the owned AST the SQL generator consumes.
//!
//! [`EdmModel`]: crate::edm_model::EdmModel

pub mod ast;
mod binder;
mod uri_parser;

pub use ast::{FilterNode, ODataQuery, OrderByClause, SelectClause, SelectItem};
pub use uri_parser::ODataUriParser;
