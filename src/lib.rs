//! odatasql - OData query options compiled to document-store SQL
//!
//! This crate provides a read-only OData query surface over a document
//! collection through:
//! - An entity model built from caller-supplied type descriptions
//! - Parsing of relative resource paths and `$select`/`$filter`/`$orderby`/
//!   `$top`/`$skip` query options against that model
//! - SQL generation with positional `@pN` parameters
//!
//! The typical flow is model -> URI parser -> query definition:
//!
//! ```
//! use odatasql::edm_model::{EdmModelBuilder, ScalarKind, TypeDescription};
//!
//! let person = TypeDescription::build("Tests", "Person")
//!     .property("Id", ScalarKind::Guid)
//!     .property("LastName", ScalarKind::String)
//!     .finish();
//!
//! let model = EdmModelBuilder::new()
//!     .add_keyed_entity_type(&person, "Id", "persons")
//!     .build()
//!     .unwrap();
//!
//! let query = model
//!     .create_uri_parser("/persons?$filter=LastName eq 'Doe'")
//!     .unwrap()
//!     .create_query_definition()
//!     .unwrap();
//!
//! assert_eq!(query.query_text, "SELECT * FROM c WHERE c.LastName = @p0");
//! ```

use thiserror::Error;

pub mod edm_model;
pub mod odata_parser;
pub mod query_generator;
pub mod query_model;
pub mod store;

pub use edm_model::{EdmModel, EdmModelBuilder, EdmModelError, PropertyNamingPolicy};
pub use odata_parser::ODataParseError;
pub use query_generator::{QueryDefinition, QueryGeneratorError, QueryParameter};
pub use query_model::ODataUriParser;

/// Crate-level error covering every stage from URI parsing to SQL generation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] EdmModelError),
    #[error(transparent)]
    Parse(#[from] ODataParseError),
    #[error(transparent)]
    Generator(#[from] QueryGeneratorError),
}
