use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryGeneratorError {
    #[error("Only simple property path items are supported in $select (found {item})")]
    UnsupportedSelectShape { item: String },
    #[error("Unsupported filter node: {node}")]
    UnsupportedFilterNode { node: String },
    #[error("Unsupported operator `{operator}` in filter expression")]
    UnsupportedOperator { operator: String },
}
