//! Entity model built from caller-supplied type descriptions.
//!
//! Callers describe their document shapes with [`TypeDescription`]s and
//! register them on an [`EdmModelBuilder`]. The build resolves the
//! inheritance graph, applies the configured property naming policy and
//! produces an immutable [`EdmModel`] used as the context for URI parsing.

mod builder;
mod descriptor;
mod errors;
mod model;
mod naming;
mod primitive;

pub use builder::{EdmModelBuilder, EdmModelBuilderOptions};
pub use descriptor::{PropertyDescriptor, PropertyType, TypeDescription, TypeDescriptionBuilder};
pub use errors::EdmModelError;
pub use model::{EdmModel, EdmProperty, EdmPropertyType, EntityType};
pub use naming::PropertyNamingPolicy;
pub use primitive::{primitive_kind, PrimitiveKind, ScalarKind};
