use crate::odata_parser::ast::BinaryOperator;
use crate::query_model::FilterNode;

use super::errors::QueryGeneratorError;
use super::query_builder::{ParameterValue, QueryParameter, COLLECTION_ALIAS};

/// Staged rendering of one filter tree. Text and parameters only move into
/// the query builder once the whole tree has rendered.
#[derive(Debug)]
pub(super) struct FilterFragment {
    pub(super) text: String,
    pub(super) parameters: Vec<QueryParameter>,
    /// Number of parameters already committed on the builder; placeholder
    /// numbering continues from here.
    base: usize,
}

impl FilterFragment {
    pub(super) fn new(base: usize) -> Self {
        Self {
            text: String::new(),
            parameters: Vec::new(),
            base,
        }
    }

    pub(super) fn append_node(&mut self, node: &FilterNode) -> Result<(), QueryGeneratorError> {
        match node {
            FilterNode::BinaryOperator {
                operator,
                left,
                right,
            } => self.append_binary(*operator, left, right),
            // Conversion wrappers are transparent.
            FilterNode::Convert { source } => self.append_node(source),
            FilterNode::PropertyAccess { property } => {
                self.text.push_str(COLLECTION_ALIAS);
                self.text.push('.');
                self.text.push_str(property);
                Ok(())
            }
            FilterNode::Constant { value, .. } => {
                let name = format!("@p{}", self.base + self.parameters.len());
                self.text.push(' ');
                self.text.push_str(&name);
                self.parameters.push(QueryParameter {
                    name,
                    value: ParameterValue::from(value),
                });
                Ok(())
            }
            FilterNode::FunctionCall { .. } => Err(QueryGeneratorError::UnsupportedFilterNode {
                node: node.describe(),
            }),
        }
    }

    fn append_binary(
        &mut self,
        operator: BinaryOperator,
        left: &FilterNode,
        right: &FilterNode,
    ) -> Result<(), QueryGeneratorError> {
        match operator {
            BinaryOperator::And => {
                // An OR on the right would otherwise bind the wrong way
                // around; left operands already rendered in precedence order.
                self.append_node(left)?;
                self.text.push_str(" and ");
                let parenthesize = right.is_logical_or();
                if parenthesize {
                    self.text.push('(');
                }
                self.append_node(right)?;
                if parenthesize {
                    self.text.push(')');
                }
                Ok(())
            }
            BinaryOperator::Or => {
                self.append_node(left)?;
                self.text.push_str(" or ");
                self.append_node(right)
            }
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Gt
            | BinaryOperator::Ge
            | BinaryOperator::Lt
            | BinaryOperator::Le => {
                self.append_node(left)?;
                self.text.push_str(match operator {
                    BinaryOperator::Eq => " =",
                    BinaryOperator::Ne => " !=",
                    BinaryOperator::Gt => " >",
                    BinaryOperator::Ge => " >=",
                    BinaryOperator::Lt => " <",
                    BinaryOperator::Le => " <=",
                    _ => unreachable!(),
                });
                self.append_node(right)
            }
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Mod => Err(QueryGeneratorError::UnsupportedOperator {
                operator: operator.to_string(),
            }),
        }
    }
}
