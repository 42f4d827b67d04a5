use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use super::descriptor::{PropertyDescriptor, PropertyType, TypeDescription};
use super::errors::EdmModelError;
use super::model::{EdmModel, EdmProperty, EdmPropertyType, EntityType};
use super::naming::PropertyNamingPolicy;
use super::primitive::primitive_kind;

/// Options controlling a model build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdmModelBuilderOptions {
    pub naming_policy: PropertyNamingPolicy,
}

/// Accumulates entity type registrations and produces an [`EdmModel`].
///
/// A builder instance is mutable registration state and is not meant for
/// concurrent use; the model it builds is immutable and freely shareable.
#[derive(Debug, Default)]
pub struct EdmModelBuilder {
    options: EdmModelBuilderOptions,
    /// Registration order is preserved; build output is order independent.
    entity_types: Vec<Arc<TypeDescription>>,
    /// Qualified type name to entity set name. Last write wins.
    entity_sets: HashMap<String, String>,
    /// Qualified type name to key property names. Repeated registrations
    /// accumulate into a composite key.
    entity_keys: HashMap<String, Vec<String>>,
}

impl EdmModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EdmModelBuilderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Register a type for inclusion in the model. Registering the same type
    /// twice is a no-op.
    pub fn add_entity_type(mut self, ty: &Arc<TypeDescription>) -> Self {
        if !self.is_registered(ty) {
            self.entity_types.push(Arc::clone(ty));
        }
        self
    }

    /// Register a type together with its key property and entity set name.
    pub fn add_keyed_entity_type(
        self,
        ty: &Arc<TypeDescription>,
        key_property: &str,
        entity_set: &str,
    ) -> Self {
        self.add_entity_type(ty)
            .add_entity_key(ty, key_property)
            .add_entity_set(ty, entity_set)
    }

    /// Append a key property for the given type. Calling this repeatedly
    /// builds a composite key.
    pub fn add_entity_key(mut self, ty: &Arc<TypeDescription>, property_name: &str) -> Self {
        self.entity_keys
            .entry(ty.qualified_name())
            .or_default()
            .push(property_name.to_string());
        self
    }

    /// Name the entity set that exposes the given type. Last write wins.
    pub fn add_entity_set(mut self, ty: &Arc<TypeDescription>, name: &str) -> Self {
        self.entity_sets.insert(ty.qualified_name(), name.to_string());
        self
    }

    /// Build the model.
    ///
    /// Total for well-formed descriptions: a property whose complex type is
    /// not registered is dropped, and a key property name that resolves to
    /// nothing is skipped. The only failure is a base type chain cycle,
    /// which plain `Arc` descriptions cannot form but is checked defensively.
    pub fn build(self) -> Result<EdmModel, EdmModelError> {
        let mut entity_types = BTreeMap::new();

        for ty in &self.entity_types {
            self.check_base_chain(ty)?;
            self.build_entity_type(&mut entity_types, ty);
        }

        let entity_sets = self
            .entity_sets
            .iter()
            .filter(|(qualified, _)| entity_types.contains_key(qualified.as_str()))
            .map(|(qualified, set)| (set.clone(), qualified.clone()))
            .collect();

        let model = EdmModel {
            entity_types,
            entity_sets,
        };
        debug!(
            "built edm model with {} entity types",
            model.entity_types.len()
        );
        Ok(model)
    }

    /// Build one entity type, resolving its registered base first. Memoized
    /// on the output map so shared base types are built exactly once.
    fn build_entity_type(&self, built: &mut BTreeMap<String, EntityType>, ty: &Arc<TypeDescription>) {
        let qualified = ty.qualified_name();
        if built.contains_key(&qualified) {
            return;
        }

        let registered_base = ty.base_type().filter(|base| self.is_registered(base));
        if let Some(base) = registered_base {
            self.build_entity_type(built, base);
        }

        // With a registered base in the model, inherited properties already
        // live on the base entity type; only declared ones are added here.
        let descriptors: Vec<&PropertyDescriptor> = if registered_base.is_some() {
            ty.declared_properties().iter().collect()
        } else {
            ty.all_properties()
        };

        let properties: Vec<EdmProperty> = descriptors
            .iter()
            .filter_map(|descriptor| self.build_property(descriptor))
            .collect();

        // Key names resolve against the full property chain, not just the
        // declared slice; unresolved names are skipped.
        let all_properties = ty.all_properties();
        let keys = self
            .entity_keys
            .get(&qualified)
            .map(|names| {
                names
                    .iter()
                    .filter(|name| all_properties.iter().any(|d| d.name == **name))
                    .map(|name| self.options.naming_policy.apply(name))
                    .collect()
            })
            .unwrap_or_default();

        built.insert(
            qualified,
            EntityType {
                namespace: ty.namespace().to_string(),
                name: ty.name().to_string(),
                base_type: registered_base.map(|base| base.qualified_name()),
                properties,
                keys,
            },
        );
    }

    fn build_property(&self, descriptor: &PropertyDescriptor) -> Option<EdmProperty> {
        let property_type = match &descriptor.property_type {
            PropertyType::Scalar(scalar) => EdmPropertyType::Primitive(primitive_kind(*scalar)),
            PropertyType::Complex(target) if self.is_registered(target) => {
                EdmPropertyType::Entity(target.qualified_name())
            }
            // Unrecognized property types are dropped, not an error.
            PropertyType::Complex(_) => return None,
        };
        Some(EdmProperty {
            name: self.options.naming_policy.apply(&descriptor.name),
            property_type,
            nullable: descriptor.nullable,
        })
    }

    fn is_registered(&self, ty: &Arc<TypeDescription>) -> bool {
        let qualified = ty.qualified_name();
        self.entity_types
            .iter()
            .any(|registered| registered.qualified_name() == qualified)
    }

    fn check_base_chain(&self, ty: &Arc<TypeDescription>) -> Result<(), EdmModelError> {
        let mut seen = HashSet::new();
        seen.insert(ty.qualified_name());
        let mut current = ty.base_type();
        while let Some(base) = current {
            if !seen.insert(base.qualified_name()) {
                return Err(EdmModelError::BaseTypeCycle {
                    type_name: ty.qualified_name(),
                });
            }
            current = base.base_type();
        }
        Ok(())
    }
}
