//! Structural predicates shared by multiple domain and port criteria. Kept
//! separate from the criteria themselves so e.g. `contained-entity` and
//! `embedded-value-object` agree on what "identity field" and "aggregate-like"
//! mean without duplicating the logic.

use crate::graph::{GraphQuery, TypeNode};
use crate::model::TypeForm;

/// A field is identity-shaped when its name matches the common identity
/// naming convention or its declared type's simple name ends in `Id`.
pub fn has_identity_field(query: &GraphQuery, type_qualified_name: &str) -> bool {
    query
        .graph()
        .fields_of(type_qualified_name)
        .iter()
        .any(|f| is_identity_named(&f.name) || f.type_ref.as_ref().map(is_identity_type_ref).unwrap_or(false))
}

fn is_identity_named(field_name: &str) -> bool {
    matches!(field_name, "id" | "identifier") || field_name.ends_with("Id")
}

fn is_identity_type_ref(type_ref: &crate::model::TypeRef) -> bool {
    simple_name_of(&type_ref.qualified_name).ends_with("Id")
}

pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name.rsplit('.').next().unwrap_or(qualified_name)
}

/// All declared fields are `final` and there is at least one — mirrors
/// `JavaType::is_immutable` but operates on the already-built `TypeNode`
/// (records are immutable by construction regardless of field count).
pub fn is_immutable(query: &GraphQuery, type_node: &TypeNode) -> bool {
    if type_node.form == TypeForm::Record {
        return true;
    }
    let fields = query.graph().fields_of(&type_node.qualified_name);
    !fields.is_empty() && fields.iter().all(|f| f.is_final())
}

/// A setter (`setX(value)`, one parameter, void return) exists among the
/// type's methods — used by both the enum of `VALUE_OBJECT` criteria and the
/// `value-object-immutability` audit rule.
pub fn has_setter(query: &GraphQuery, type_qualified_name: &str) -> bool {
    query.graph().methods_of(type_qualified_name).iter().any(|m| {
        m.name.starts_with("set")
            && m.name.len() > 3
            && m.parameters.len() == 1
            && m.type_ref.as_ref().map(|t| t.is_void()).unwrap_or(true)
    })
}

/// A type "looks like" an aggregate: it owns an identity field and is a
/// class or record (not an interface/enum/annotation). Several criteria
/// (`contained-entity`, `signature-based-gateway`, `signature-based-driven`)
/// need this without waiting for the domain pass to actually classify it.
pub fn is_aggregate_like(query: &GraphQuery, type_node: &TypeNode) -> bool {
    matches!(type_node.form, TypeForm::Class | TypeForm::Record) && has_identity_field(query, &type_node.qualified_name)
}

/// Does any field of `owner` reference `referenced` directly, or through a
/// collection-like/optional-like wrapper? Used to find "types owned or
/// referenced by an aggregate" (contained-entity, embedded-value-object,
/// domain-record-value-object, aggregate-consistency audit rule).
pub fn is_referenced_via_field(query: &GraphQuery, owner: &str, referenced: &str) -> bool {
    query.graph().fields_of(owner).iter().any(|f| {
        f.type_ref
            .as_ref()
            .map(|t| t.innermost_qualified_name() == referenced)
            .unwrap_or(false)
    })
}

/// Every in-scope type that references `referenced` via a field, in
/// ascending qualified-name order — the inverse of `is_referenced_via_field`,
/// used by criteria that need "who points at me" rather than "what do I
/// point at".
pub fn referencing_owners(query: &GraphQuery, referenced: &str) -> Vec<String> {
    let mut out: Vec<String> = query
        .graph()
        .types()
        .filter(|t| is_referenced_via_field(query, &t.qualified_name, referenced))
        .map(|t| t.qualified_name.clone())
        .collect();
    out.sort();
    out
}
