//! The store-driver boundary.
//!
//! The crate compiles queries; executing them belongs to a driver for the
//! target document store. `$top` and `$skip` never enter the query text and
//! travel here instead.

use serde::{Deserialize, Serialize};

use crate::query_generator::QueryDefinition;
use crate::query_model::ODataQuery;

/// Paging options applied at execution time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOptions {
    pub top: Option<u64>,
    pub skip: Option<u64>,
}

impl ExecutionOptions {
    pub fn from_query(query: &ODataQuery) -> Self {
        Self {
            top: query.top,
            skip: query.skip,
        }
    }
}

/// Executes compiled queries against a document collection.
///
/// The returned iterator is finite and forward-only; re-iterating requires a
/// fresh execution.
pub trait DocumentStore {
    type Document;
    type Error;

    #[allow(clippy::type_complexity)]
    fn execute_query(
        &self,
        query: &QueryDefinition,
        options: &ExecutionOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<Self::Document, Self::Error>> + '_>, Self::Error>;
}
