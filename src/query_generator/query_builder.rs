use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::odata_parser::ast::{Literal, OrderByDirection};
use crate::query_model::{FilterNode, OrderByClause, SelectClause, SelectItem};

use super::errors::QueryGeneratorError;
use super::to_sql::FilterFragment;

/// Alias of the document collection in generated text.
pub const COLLECTION_ALIAS: &str = "c";

/// A parameter value ready for driver-side binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    DateTime(DateTime<FixedOffset>),
    Guid(Uuid),
}

impl From<&Literal> for ParameterValue {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => ParameterValue::Null,
            Literal::Boolean(value) => ParameterValue::Bool(*value),
            Literal::Integer(value) => ParameterValue::Int(*value),
            Literal::Double(value) => ParameterValue::Double(*value),
            Literal::String(value) => ParameterValue::String(value.clone()),
            // Date-only values bind as midnight UTC date-times; the store
            // compares full date-times only.
            Literal::Date(date) => {
                ParameterValue::DateTime(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
            }
            Literal::DateTimeOffset(value) => ParameterValue::DateTime(*value),
            Literal::Duration(value) => ParameterValue::String(value.clone()),
            Literal::Guid(value) => ParameterValue::Guid(*value),
        }
    }
}

/// One positional parameter of a compiled query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    pub value: ParameterValue,
}

/// The compiled query: text plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub query_text: String,
    pub parameters: Vec<QueryParameter>,
}

/// Incrementally builds a [`QueryDefinition`].
///
/// Each append stages its fragment and commits only on success, so a failed
/// append leaves no partial text or parameters behind.
#[derive(Debug, Default)]
pub struct QueryDefinitionBuilder {
    query_text: String,
    parameters: Vec<QueryParameter>,
}

impl QueryDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    /// Append the `SELECT ... FROM c` head.
    ///
    /// No clause, or a clause that keeps everything selected, emits
    /// `SELECT *`; expand items ride along untouched. Only a narrowing
    /// select requires every item to be a simple property path.
    pub fn append_select(
        &mut self,
        select: Option<&SelectClause>,
    ) -> Result<&mut Self, QueryGeneratorError> {
        let all_selected = select.map_or(true, |clause| clause.all_selected);
        if !all_selected {
            if let Some(item) = select
                .into_iter()
                .flat_map(|clause| clause.items.iter())
                .find(|item| !matches!(item, SelectItem::Path(_)))
            {
                let described = match item {
                    SelectItem::Expand { path } => format!("expand `{}`", path.join(".")),
                    SelectItem::Path(_) => unreachable!(),
                };
                return Err(QueryGeneratorError::UnsupportedSelectShape { item: described });
            }
        }

        self.query_text.push_str("SELECT");
        if all_selected {
            self.query_text.push_str(" *");
        } else if let Some(clause) = select {
            let paths: Vec<String> = clause.selected_paths().collect();
            self.query_text.push(' ');
            self.query_text.push_str(COLLECTION_ALIAS);
            self.query_text.push('.');
            self.query_text
                .push_str(&paths.join(&format!(",{COLLECTION_ALIAS}.")));
        }
        self.query_text.push_str(" FROM ");
        self.query_text.push_str(COLLECTION_ALIAS);
        Ok(self)
    }

    /// Append the `WHERE` clause for a filter tree, or nothing when absent.
    pub fn append_filter(
        &mut self,
        filter: Option<&FilterNode>,
    ) -> Result<&mut Self, QueryGeneratorError> {
        let Some(node) = filter else {
            return Ok(self);
        };
        let mut fragment = FilterFragment::new(self.parameters.len());
        fragment.append_node(node)?;
        self.query_text.push_str(" WHERE ");
        self.query_text.push_str(&fragment.text);
        self.parameters.extend(fragment.parameters);
        Ok(self)
    }

    /// Append the `ORDER BY` clause in chain order, or nothing when absent.
    pub fn append_order_by(
        &mut self,
        order_by: Option<&OrderByClause>,
    ) -> Result<&mut Self, QueryGeneratorError> {
        let Some(chain) = order_by else {
            return Ok(self);
        };
        self.query_text.push_str(" ORDER BY");
        for (index, item) in chain.iter().enumerate() {
            self.query_text
                .push_str(if index > 0 { "," } else { " " });
            self.query_text.push_str(COLLECTION_ALIAS);
            self.query_text.push('.');
            self.query_text.push_str(&item.property);
            if item.direction == OrderByDirection::Descending {
                self.query_text.push_str(" desc");
            }
        }
        Ok(self)
    }

    pub fn build(self) -> QueryDefinition {
        QueryDefinition {
            query_text: self.query_text,
            parameters: self.parameters,
        }
    }
}
