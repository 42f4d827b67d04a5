use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EdmModelError {
    #[error("Base type chain of `{type_name}` contains a cycle")]
    BaseTypeCycle { type_name: String },
}
