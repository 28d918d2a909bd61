//! Normalized, read-only semantic model (spec §3, §4.A). This is the shape
//! a source-language front-end hands to the engine; the front-end itself is
//! an external collaborator, out of scope here.

use crate::error::SourceLocation;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeForm {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
    Sealed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Array(Vec<AnnotationValue>),
}

/// An annotation reference: qualified annotation type name plus its value map.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRef {
    pub qualified_name: String,
    pub values: BTreeMap<String, AnnotationValue>,
}

impl AnnotationRef {
    pub fn marker(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            values: BTreeMap::new(),
        }
    }
}

/// A raw qualified type reference with generic arguments and array shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub qualified_name: String,
    pub type_arguments: Vec<TypeRef>,
    pub is_array: bool,
    pub array_dimensions: u32,
}

const OPTIONAL_LIKE: &[&str] = &["java.util.Optional", "java.util.OptionalInt", "java.util.OptionalLong"];
const COLLECTION_LIKE: &[&str] = &[
    "java.util.List",
    "java.util.Set",
    "java.util.Collection",
    "java.util.Queue",
    "java.util.Deque",
    "java.util.stream.Stream",
];
const MAP_LIKE: &[&str] = &["java.util.Map", "java.util.SortedMap", "java.util.concurrent.ConcurrentMap"];

impl TypeRef {
    pub fn simple(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_arguments: Vec::new(),
            is_array: false,
            array_dimensions: 0,
        }
    }

    pub fn generic(qualified_name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_arguments: args,
            is_array: false,
            array_dimensions: 0,
        }
    }

    pub fn is_void(&self) -> bool {
        self.qualified_name == "void" || self.qualified_name == "java.lang.Void"
    }

    pub fn is_optional_like(&self) -> bool {
        OPTIONAL_LIKE.contains(&self.qualified_name.as_str())
    }

    pub fn is_collection_like(&self) -> bool {
        COLLECTION_LIKE.contains(&self.qualified_name.as_str())
    }

    pub fn is_map_like(&self) -> bool {
        MAP_LIKE.contains(&self.qualified_name.as_str())
    }

    /// Unwraps a single-argument optional-like or collection-like reference
    /// to its element type. Returns `None` for map-like (two arguments) or
    /// plain references.
    pub fn unwrap_single(&self) -> Option<&TypeRef> {
        if (self.is_optional_like() || self.is_collection_like()) && self.type_arguments.len() == 1 {
            Some(&self.type_arguments[0])
        } else {
            None
        }
    }

    /// Follows `unwrap_single` until it reaches a non-wrapper type, returning
    /// that type's qualified name. Used by criteria matching against nested
    /// wrappers like `Optional<List<OrderId>>`.
    pub fn innermost_qualified_name(&self) -> &str {
        let mut current = self;
        while let Some(inner) = current.unwrap_single() {
            current = inner;
        }
        &current.qualified_name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub annotations: Vec<AnnotationRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
}

impl Field {
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    /// Cached cyclomatic complexity supplied by the front-end. Absent for
    /// abstract methods, which have no body to count decision points in.
    pub complexity: Option<u32>,
}

impl Method {
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
}

/// One declared type or interface, as streamed by a [`super::provider::SemanticModelProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct JavaType {
    pub qualified_name: String,
    pub simple_name: String,
    pub package: String,
    pub form: TypeForm,
    pub modifiers: Vec<Modifier>,
    pub supertype: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub annotations: Vec<AnnotationRef>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
    pub location: Option<SourceLocation>,
    pub documentation: Option<String>,
}

impl JavaType {
    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotations.iter().any(|a| a.qualified_name == qualified_name)
    }

    pub fn implements(&self, qualified_name: &str) -> bool {
        self.interfaces.iter().any(|i| i.qualified_name == qualified_name)
    }

    pub fn is_immutable(&self) -> bool {
        self.form == TypeForm::Record || (!self.fields.is_empty() && self.fields.iter().all(Field::is_final))
    }
}
