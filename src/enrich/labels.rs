//! The fixed vocabulary of behavioral labels the built-in enricher attaches
//! (spec §4.G). Third-party enrichers are free to invent their own label
//! strings — this enum only names the ones this crate produces itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum SemanticLabel {
    FactoryMethod,
    InvariantValidator,
    CollectionManager,
    LifecycleMethod,
    Getter,
    Setter,
    CommandHandler,
    EventHandler,
    ImmutableType,
    SideEffectFree,
    EventPublisher,
}

impl SemanticLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticLabel::FactoryMethod => "FACTORY_METHOD",
            SemanticLabel::InvariantValidator => "INVARIANT_VALIDATOR",
            SemanticLabel::CollectionManager => "COLLECTION_MANAGER",
            SemanticLabel::LifecycleMethod => "LIFECYCLE_METHOD",
            SemanticLabel::Getter => "GETTER",
            SemanticLabel::Setter => "SETTER",
            SemanticLabel::CommandHandler => "COMMAND_HANDLER",
            SemanticLabel::EventHandler => "EVENT_HANDLER",
            SemanticLabel::ImmutableType => "IMMUTABLE_TYPE",
            SemanticLabel::SideEffectFree => "SIDE_EFFECT_FREE",
            SemanticLabel::EventPublisher => "EVENT_PUBLISHER",
        }
    }
}

impl std::fmt::Display for SemanticLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
