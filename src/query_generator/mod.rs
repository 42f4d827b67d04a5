//! SQL generation for bound OData queries.
//!
//! Walks the bound query model and emits a single parameterized query of the
//! shape `SELECT ... FROM c [WHERE ...] [ORDER BY ...]` with positional
//! `@pN` parameters allocated in left-to-right visitation order. `$top` and
//! `$skip` are deliberately not part of the text; they travel in
//! [`ExecutionOptions`](crate::store::ExecutionOptions) at the store boundary.

mod errors;
mod query_builder;
mod to_sql;

pub use errors::QueryGeneratorError;
pub use query_builder::{
    ParameterValue, QueryDefinition, QueryDefinitionBuilder, QueryParameter, COLLECTION_ALIAS,
};

use log::debug;

use crate::query_model::ODataQuery;

/// Compile a bound query into its final query definition, appending
/// select, filter and order-by in that fixed order.
pub fn create_query_definition(query: &ODataQuery) -> Result<QueryDefinition, QueryGeneratorError> {
    let mut builder = QueryDefinitionBuilder::new();
    builder.append_select(query.select.as_ref())?;
    builder.append_filter(query.filter.as_ref())?;
    builder.append_order_by(query.order_by.as_ref())?;
    let definition = builder.build();
    debug!("generated query: {}", definition.query_text);
    Ok(definition)
}
