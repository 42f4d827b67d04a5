use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::primitive::PrimitiveKind;
use crate::odata_parser::ODataParseError;
use crate::query_model::ODataUriParser;

/// Resolved type of a model property. Exactly one arm applies; descriptors
/// that fit neither arm never make it into the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdmPropertyType {
    Primitive(PrimitiveKind),
    /// Qualified name of another entity type in the same model.
    Entity(String),
}

/// A property on a built entity type. The name has already passed through the
/// configured naming policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmProperty {
    pub name: String,
    pub property_type: EdmPropertyType,
    pub nullable: bool,
}

/// One entity type in the built model.
///
/// Base links are by qualified name rather than by reference, so the model
/// needs no ownership cycles even for self-referential property types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    pub namespace: String,
    pub name: String,
    /// Qualified name of the base entity type, when the base is registered.
    pub base_type: Option<String>,
    /// Declared properties only; inherited properties live on the ancestor.
    pub properties: Vec<EdmProperty>,
    /// Key property names, post naming policy.
    pub keys: Vec<String>,
}

impl EntityType {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Look up a property declared directly on this type.
    pub fn declared_property(&self, name: &str) -> Option<&EdmProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// The immutable result of an [`EdmModelBuilder::build`](super::EdmModelBuilder::build)
/// call. Safe for concurrent read-only use by any number of parsers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdmModel {
    /// Entity types keyed by qualified name.
    pub(crate) entity_types: BTreeMap<String, EntityType>,
    /// Entity set name to qualified entity type name.
    pub(crate) entity_sets: BTreeMap<String, String>,
}

impl EdmModel {
    pub fn find_entity_type(&self, qualified_name: &str) -> Option<&EntityType> {
        self.entity_types.get(qualified_name)
    }

    /// Resolve an entity set name to the entity type it contains.
    pub fn find_entity_set(&self, set_name: &str) -> Option<&EntityType> {
        self.entity_sets
            .get(set_name)
            .and_then(|qualified| self.entity_types.get(qualified))
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.entity_types.values()
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = (&str, &EntityType)> {
        self.entity_sets
            .iter()
            .filter_map(|(set, qualified)| self.entity_types.get(qualified).map(|t| (set.as_str(), t)))
    }

    /// Look up a property by name, climbing the base type chain.
    pub fn resolve_property<'a>(
        &'a self,
        entity_type: &'a EntityType,
        name: &str,
    ) -> Option<&'a EdmProperty> {
        let mut current = Some(entity_type);
        while let Some(ty) = current {
            if let Some(property) = ty.declared_property(name) {
                return Some(property);
            }
            current = ty
                .base_type
                .as_deref()
                .and_then(|qualified| self.find_entity_type(qualified));
        }
        None
    }

    /// Create a URI parser for a relative OData resource path and query string
    /// evaluated against this model.
    pub fn create_uri_parser<'m>(
        &'m self,
        relative_uri: &str,
    ) -> Result<ODataUriParser<'m>, ODataParseError> {
        ODataUriParser::new(self, relative_uri)
    }
}
