use serde::{Deserialize, Serialize};

use crate::edm_model::PrimitiveKind;
use crate::odata_parser::ast::{BinaryOperator, Literal, OrderByDirection};

/// A bound `$filter` expression node.
///
/// The closed set of variants is exactly what the upstream grammar can
/// produce; the SQL generator matches exhaustively and rejects the variants
/// it does not compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterNode {
    BinaryOperator {
        operator: BinaryOperator,
        left: Box<FilterNode>,
        right: Box<FilterNode>,
    },
    /// Post-policy property name; nested access renders dotted (`manager.lastName`).
    PropertyAccess { property: String },
    Constant {
        value: Literal,
        /// EDM kind tag of the constant; `None` for `null`.
        edm_type: Option<PrimitiveKind>,
    },
    /// Transparent type promotion wrapper around the inner node.
    Convert { source: Box<FilterNode> },
    /// Parsed canonical function application. Not compilable.
    FunctionCall {
        name: String,
        arguments: Vec<FilterNode>,
    },
}

impl FilterNode {
    /// Whether this node is a logical OR application. Drives the
    /// right-operand parenthesization rule during SQL generation.
    pub fn is_logical_or(&self) -> bool {
        matches!(
            self,
            FilterNode::BinaryOperator {
                operator: BinaryOperator::Or,
                ..
            }
        )
    }

    /// Short description of the node shape, for error messages.
    pub fn describe(&self) -> String {
        match self {
            FilterNode::BinaryOperator { operator, .. } => format!("binary `{operator}`"),
            FilterNode::PropertyAccess { property } => format!("property access `{property}`"),
            FilterNode::Constant { .. } => "constant".to_string(),
            FilterNode::Convert { .. } => "conversion".to_string(),
            FilterNode::FunctionCall { name, .. } => format!("function call `{name}`"),
        }
    }
}

/// One bound `$select`/`$expand` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    /// Simple property path, post-policy segment names.
    Path(Vec<String>),
    /// Expand item; recognized but not compilable into query text.
    Expand { path: Vec<String> },
}

/// The bound select-and-expand clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectClause {
    /// True when no `$select` was given or it contained `*`.
    pub all_selected: bool,
    pub items: Vec<SelectItem>,
}

impl SelectClause {
    /// Dotted render of each simple path item, in clause order.
    pub fn selected_paths(&self) -> impl Iterator<Item = String> + '_ {
        self.items.iter().filter_map(|item| match item {
            SelectItem::Path(segments) => Some(segments.join(".")),
            SelectItem::Expand { .. } => None,
        })
    }
}

/// One bound `$orderby` sort key, chained to its then-by successor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByClause {
    /// Post-policy property name, dotted for nested access.
    pub property: String,
    pub direction: OrderByDirection,
    pub then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    /// Flatten the then-by chain into clause order, primary key first.
    pub fn iter(&self) -> OrderByIter<'_> {
        OrderByIter { next: Some(self) }
    }
}

pub struct OrderByIter<'a> {
    next: Option<&'a OrderByClause>,
}

impl<'a> Iterator for OrderByIter<'a> {
    type Item = &'a OrderByClause;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.then_by.as_deref();
        Some(current)
    }
}

/// Everything parsed and bound from one relative OData URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ODataQuery {
    pub entity_set: String,
    /// Qualified name of the entity type the set exposes.
    pub entity_type: String,
    pub select: Option<SelectClause>,
    pub filter: Option<FilterNode>,
    pub order_by: Option<OrderByClause>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
}
