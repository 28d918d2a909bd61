//! Canonical marker annotations and interfaces the explicit criteria look
//! for. Named after the jMolecules DDD/hexagonal annotation library, which
//! is the closest thing to a de facto standard vocabulary for this —
//! `implements-jmolecules-interface` in spec §4.F is named directly after it.

pub const AGGREGATE_ROOT_MARKER: &str = "org.jmolecules.ddd.annotation.AggregateRoot";
pub const ENTITY_MARKER: &str = "org.jmolecules.ddd.annotation.Entity";
pub const VALUE_OBJECT_MARKER: &str = "org.jmolecules.ddd.annotation.ValueObject";
pub const IDENTITY_MARKER: &str = "org.jmolecules.ddd.annotation.Identity";
pub const DOMAIN_EVENT_MARKER: &str = "org.jmolecules.event.annotation.DomainEvent";
pub const EXTERNALIZED_EVENT_MARKER: &str = "org.jmolecules.event.annotation.Externalized";
pub const SERVICE_MARKER: &str = "org.jmolecules.ddd.annotation.Service";

pub const REPOSITORY_MARKER: &str = "org.jmolecules.ddd.annotation.Repository";
pub const PRIMARY_PORT_MARKER: &str = "org.jmolecules.architecture.hexagonal.PrimaryPort";
pub const SECONDARY_PORT_MARKER: &str = "org.jmolecules.architecture.hexagonal.SecondaryPort";

/// `(interface qualified name, domain kind it denotes)` — the marker
/// *interfaces* that `implements-jmolecules-interface` recognizes, as
/// distinct from the marker *annotations* above.
pub const JMOLECULES_DOMAIN_INTERFACES: &[(&str, &str)] = &[
    ("org.jmolecules.ddd.types.AggregateRoot", "AGGREGATE_ROOT"),
    ("org.jmolecules.ddd.types.Entity", "ENTITY"),
    ("org.jmolecules.ddd.types.Identifier", "IDENTIFIER"),
    ("org.jmolecules.ddd.types.ValueObject", "VALUE_OBJECT"),
    ("org.jmolecules.ddd.types.Service", "DOMAIN_SERVICE"),
];
