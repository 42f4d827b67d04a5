use log::debug;

use crate::edm_model::{EdmModel, EntityType};
use crate::odata_parser::{
    parse_expand_clause, parse_filter_expression, parse_order_by_clause, parse_relative_uri,
    parse_select_clause, ODataParseError, ODataUri,
};
use crate::query_generator::{self, QueryDefinition};

use super::ast::{FilterNode, ODataQuery, OrderByClause, SelectClause};
use super::binder::Binder;

/// Parses the query options of one relative OData URI against a model.
///
/// Construction resolves the resource path to an entity set; each
/// `parse_*` method parses and binds one option on demand. The parser holds
/// no mutable state, so repeated calls return equal results.
#[derive(Debug)]
pub struct ODataUriParser<'m> {
    model: &'m EdmModel,
    entity_type: &'m EntityType,
    uri: ODataUri,
}

impl<'m> ODataUriParser<'m> {
    pub fn new(model: &'m EdmModel, relative_uri: &str) -> Result<Self, ODataParseError> {
        let uri = parse_relative_uri(relative_uri)?;
        let entity_type =
            model
                .find_entity_set(&uri.entity_set)
                .ok_or_else(|| ODataParseError::UnknownEntitySet {
                    entity_set: uri.entity_set.clone(),
                })?;
        debug!(
            "parsing uri against entity set `{}` of type `{}`",
            uri.entity_set,
            entity_type.qualified_name()
        );
        Ok(Self {
            model,
            entity_type,
            uri,
        })
    }

    /// The entity type exposed by the addressed entity set.
    pub fn entity_type(&self) -> &EntityType {
        self.entity_type
    }

    pub fn entity_set(&self) -> &str {
        &self.uri.entity_set
    }

    /// Parse and bind `$select` and `$expand`. `None` when neither was given.
    pub fn parse_select_and_expand(&self) -> Result<Option<SelectClause>, ODataParseError> {
        if self.uri.select.is_none() && self.uri.expand.is_none() {
            return Ok(None);
        }
        let select = self
            .uri
            .select
            .as_deref()
            .map(parse_select_clause)
            .transpose()?;
        let expand = self
            .uri
            .expand
            .as_deref()
            .map(parse_expand_clause)
            .transpose()?;
        self.binder()
            .bind_select(select.as_deref(), expand.as_deref())
            .map(Some)
    }

    /// Parse and bind `$filter`. `None` when absent or empty.
    pub fn parse_filter(&self) -> Result<Option<FilterNode>, ODataParseError> {
        let Some(filter) = self.uri.filter.as_deref() else {
            return Ok(None);
        };
        let raw = parse_filter_expression(filter)?;
        self.binder().bind_filter(&raw).map(Some)
    }

    /// Parse and bind `$orderby` into its then-by chain. `None` when absent.
    pub fn parse_order_by(&self) -> Result<Option<OrderByClause>, ODataParseError> {
        let Some(order_by) = self.uri.order_by.as_deref() else {
            return Ok(None);
        };
        let raw = parse_order_by_clause(order_by)?;
        self.binder().bind_order_by(&raw)
    }

    /// The `$top` option. Execution-time paging, never part of query text.
    pub fn top(&self) -> Option<u64> {
        self.uri.top
    }

    /// The `$skip` option. Execution-time paging, never part of query text.
    pub fn skip(&self) -> Option<u64> {
        self.uri.skip
    }

    /// The `$count` option, when supplied.
    pub fn count(&self) -> Option<bool> {
        self.uri.count
    }

    /// Parse and bind every supported query option.
    pub fn parse_query(&self) -> Result<ODataQuery, ODataParseError> {
        Ok(ODataQuery {
            entity_set: self.uri.entity_set.clone(),
            entity_type: self.entity_type.qualified_name(),
            select: self.parse_select_and_expand()?,
            filter: self.parse_filter()?,
            order_by: self.parse_order_by()?,
            top: self.uri.top,
            skip: self.uri.skip,
            count: self.uri.count,
        })
    }

    /// Parse every option and compile it into a parameterized query
    /// definition in one step.
    pub fn create_query_definition(&self) -> Result<QueryDefinition, crate::Error> {
        let query = self.parse_query()?;
        Ok(query_generator::create_query_definition(&query)?)
    }

    fn binder(&self) -> Binder<'m> {
        Binder::new(self.model, self.entity_type)
    }
}
