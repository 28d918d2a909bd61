//! Component A: the semantic model (spec §4.A).

pub mod provider;
pub mod types;

pub use provider::{FixtureModel, SemanticModelProvider, GENERATOR_MARKERS};
pub use types::{
    AnnotationRef, AnnotationValue, Constructor, Field, JavaType, Method, Modifier, Parameter,
    TypeForm, TypeRef,
};
