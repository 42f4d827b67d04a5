use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ODataParseError {
    #[error("Only relative resource references are supported: `{uri}`")]
    InvalidRelativeReference { uri: String },
    #[error("Unknown entity set `{entity_set}`")]
    UnknownEntitySet { entity_set: String },
    #[error("Unknown property `{property}` on entity type `{entity_type}`")]
    UnknownProperty {
        property: String,
        entity_type: String,
    },
    #[error("Property path `{path}` traverses a non-entity property")]
    InvalidPropertyPath { path: String },
    #[error("Invalid value for {option}: `{value}`")]
    InvalidOptionValue { option: &'static str, value: String },
    #[error("Syntax error in {option} near `{rest}`")]
    Syntax { option: &'static str, rest: String },
    #[error("Invalid percent-encoding in `{text}`")]
    InvalidPercentEncoding { text: String },
}
