//! Component I: the layer classifier (spec §4.I). Three passes per type,
//! first match wins; within a pass, category order is fixed
//! presentation → application → infrastructure → domain.

use crate::graph::TypeNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Layer {
    Presentation,
    Application,
    Infrastructure,
    Domain,
    Unknown,
}

const PRESENTATION_ANNOTATIONS: &[&str] = &[
    "org.springframework.web.bind.annotation.RestController",
    "org.springframework.web.bind.annotation.Controller",
    "javax.ws.rs.Path",
    "jakarta.ws.rs.Path",
];
const APPLICATION_ANNOTATIONS: &[&str] = &["org.springframework.stereotype.Service", "org.jmolecules.ddd.annotation.Service"];
const INFRASTRUCTURE_ANNOTATIONS: &[&str] = &[
    "org.springframework.stereotype.Repository",
    "javax.persistence.Entity",
    "jakarta.persistence.Entity",
    "org.jmolecules.ddd.annotation.Repository",
];

const PRESENTATION_PACKAGES: &[&str] = &[".web.", ".rest.", ".controller.", ".presentation.", ".api.in."];
const APPLICATION_PACKAGES: &[&str] = &[".application.", ".usecase.", ".service."];
const INFRASTRUCTURE_PACKAGES: &[&str] = &[".infrastructure.", ".infra.", ".persistence.", ".adapter.", ".adapters."];
const DOMAIN_PACKAGES: &[&str] = &[".domain.", ".model."];

const PRESENTATION_SUFFIXES: &[&str] = &["Controller", "Resolver", "Resource"];
const APPLICATION_SUFFIXES: &[&str] = &["Service", "UseCase", "Handler"];
const INFRASTRUCTURE_SUFFIXES: &[&str] = &["Repository", "Adapter", "Gateway", "Dao"];

pub struct LayerClassifier;

impl LayerClassifier {
    pub fn classify(type_node: &TypeNode) -> Layer {
        if let Some(layer) = Self::by_annotation(type_node) {
            return layer;
        }
        if let Some(layer) = Self::by_package(type_node) {
            return layer;
        }
        if let Some(layer) = Self::by_suffix(type_node) {
            return layer;
        }
        Layer::Unknown
    }

    fn by_annotation(type_node: &TypeNode) -> Option<Layer> {
        if PRESENTATION_ANNOTATIONS.iter().any(|a| type_node.has_annotation(a)) {
            return Some(Layer::Presentation);
        }
        if APPLICATION_ANNOTATIONS.iter().any(|a| type_node.has_annotation(a)) {
            return Some(Layer::Application);
        }
        if INFRASTRUCTURE_ANNOTATIONS.iter().any(|a| type_node.has_annotation(a)) {
            return Some(Layer::Infrastructure);
        }
        None
    }

    fn by_package(type_node: &TypeNode) -> Option<Layer> {
        let bounded = format!(".{}.", type_node.package.to_lowercase());
        if PRESENTATION_PACKAGES.iter().any(|p| bounded.contains(p)) {
            return Some(Layer::Presentation);
        }
        if APPLICATION_PACKAGES.iter().any(|p| bounded.contains(p)) {
            return Some(Layer::Application);
        }
        if INFRASTRUCTURE_PACKAGES.iter().any(|p| bounded.contains(p)) {
            return Some(Layer::Infrastructure);
        }
        if DOMAIN_PACKAGES.iter().any(|p| bounded.contains(p)) {
            return Some(Layer::Domain);
        }
        None
    }

    fn by_suffix(type_node: &TypeNode) -> Option<Layer> {
        if PRESENTATION_SUFFIXES.iter().any(|s| type_node.simple_name.ends_with(s)) {
            return Some(Layer::Presentation);
        }
        if APPLICATION_SUFFIXES.iter().any(|s| type_node.simple_name.ends_with(s)) {
            return Some(Layer::Application);
        }
        if INFRASTRUCTURE_SUFFIXES.iter().any(|s| type_node.simple_name.ends_with(s)) {
            return Some(Layer::Infrastructure);
        }
        None
    }
}
