use std::sync::Arc;

use super::primitive::ScalarKind;

/// Declared type of a single property.
#[derive(Debug, Clone)]
pub enum PropertyType {
    Scalar(ScalarKind),
    /// Reference to another structural type. Only surfaces in the built model
    /// when the referenced type is itself registered; otherwise the property
    /// is dropped.
    Complex(Arc<TypeDescription>),
}

/// A single property declared directly on a [`TypeDescription`].
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: PropertyType,
    pub nullable: bool,
}

/// Caller-supplied structural description of an entity shape.
///
/// Descriptions are immutable once finished and shared via `Arc`, so a base
/// type can be referenced by any number of derived descriptions. Identity is
/// the qualified `namespace.Name` pair.
#[derive(Debug)]
pub struct TypeDescription {
    namespace: String,
    name: String,
    base_type: Option<Arc<TypeDescription>>,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescription {
    /// Start describing a type in the given namespace.
    pub fn build(namespace: impl Into<String>, name: impl Into<String>) -> TypeDescriptionBuilder {
        TypeDescriptionBuilder {
            namespace: namespace.into(),
            name: name.into(),
            base_type: None,
            properties: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn base_type(&self) -> Option<&Arc<TypeDescription>> {
        self.base_type.as_ref()
    }

    /// Properties declared directly on this type, excluding inherited ones.
    pub fn declared_properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Declared properties followed by every ancestor's declared properties.
    pub fn all_properties(&self) -> Vec<&PropertyDescriptor> {
        let mut properties: Vec<&PropertyDescriptor> = self.properties.iter().collect();
        let mut current = self.base_type.as_deref();
        while let Some(base) = current {
            properties.extend(base.properties.iter());
            current = base.base_type.as_deref();
        }
        properties
    }
}

/// Fluent construction of a [`TypeDescription`].
#[derive(Debug)]
pub struct TypeDescriptionBuilder {
    namespace: String,
    name: String,
    base_type: Option<Arc<TypeDescription>>,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptionBuilder {
    pub fn base(mut self, base_type: &Arc<TypeDescription>) -> Self {
        self.base_type = Some(Arc::clone(base_type));
        self
    }

    pub fn property(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.push(name.into(), PropertyType::Scalar(kind), false)
    }

    pub fn nullable_property(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.push(name.into(), PropertyType::Scalar(kind), true)
    }

    pub fn complex_property(self, name: impl Into<String>, ty: &Arc<TypeDescription>) -> Self {
        self.push(name.into(), PropertyType::Complex(Arc::clone(ty)), false)
    }

    pub fn nullable_complex_property(
        self,
        name: impl Into<String>,
        ty: &Arc<TypeDescription>,
    ) -> Self {
        self.push(name.into(), PropertyType::Complex(Arc::clone(ty)), true)
    }

    pub fn finish(self) -> Arc<TypeDescription> {
        Arc::new(TypeDescription {
            namespace: self.namespace,
            name: self.name,
            base_type: self.base_type,
            properties: self.properties,
        })
    }

    fn push(mut self, name: String, property_type: PropertyType, nullable: bool) -> Self {
        self.properties.push(PropertyDescriptor {
            name,
            property_type,
            nullable,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_joins_namespace_and_name() {
        let ty = TypeDescription::build("Tests", "Person").finish();
        assert_eq!(ty.qualified_name(), "Tests.Person");
    }

    #[test]
    fn all_properties_walks_the_base_chain() {
        let base = TypeDescription::build("Tests", "Person")
            .property("Id", ScalarKind::Guid)
            .finish();
        let derived = TypeDescription::build("Tests", "Employee")
            .base(&base)
            .property("EmployeeNumber", ScalarKind::I32)
            .finish();

        let names: Vec<&str> = derived.all_properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["EmployeeNumber", "Id"]);
        assert_eq!(derived.declared_properties().len(), 1);
    }
}
