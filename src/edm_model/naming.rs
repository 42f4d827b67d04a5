use serde::{Deserialize, Serialize};

/// Deterministic transform applied to property names everywhere they surface
/// in the built model and in generated query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyNamingPolicy {
    /// Property names pass through unchanged.
    #[default]
    Identity,
    /// Lowercase the first character only, leave the rest unchanged.
    CamelCase,
}

impl PropertyNamingPolicy {
    /// Apply this policy to a property name. Empty names pass through as-is.
    pub fn apply(&self, name: &str) -> String {
        match self {
            PropertyNamingPolicy::Identity => name.to_string(),
            PropertyNamingPolicy::CamelCase => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}
