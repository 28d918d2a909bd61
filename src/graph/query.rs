//! Read-only query handle passed to criteria (spec §4.E). Wraps the sealed
//! graph plus, during the domain pass, the already-decided port
//! classifications — several domain criteria (flexible-application-service,
//! flexible-saga, flexible-inbound-only, flexible-outbound-only) key off
//! which ports a class depends on or implements.

use super::edge::EdgeKind;
use super::node::NodeId;
use super::ApplicationGraph;
use crate::criteria::{PortDirection, PortKind};
use std::collections::BTreeMap;

/// The subset of a port's classification criteria need to know: its kind
/// and direction, keyed by the port interface's qualified name.
#[derive(Debug, Clone, Copy)]
pub struct PortInfo {
    pub kind: PortKind,
    pub direction: PortDirection,
}

pub struct GraphQuery<'a> {
    graph: &'a ApplicationGraph,
    ports: Option<&'a BTreeMap<String, PortInfo>>,
}

impl<'a> GraphQuery<'a> {
    pub fn new(graph: &'a ApplicationGraph) -> Self {
        Self { graph, ports: None }
    }

    pub fn with_ports(graph: &'a ApplicationGraph, ports: &'a BTreeMap<String, PortInfo>) -> Self {
        Self {
            graph,
            ports: Some(ports),
        }
    }

    pub fn graph(&self) -> &'a ApplicationGraph {
        self.graph
    }

    pub fn port_info(&self, interface_qualified_name: &str) -> Option<PortInfo> {
        self.ports.and_then(|p| p.get(interface_qualified_name)).copied()
    }

    /// Interfaces directly implemented by `type_qualified_name`.
    pub fn implemented_interfaces(&self, type_qualified_name: &str) -> Vec<String> {
        self.graph
            .outgoing(&NodeId::for_type(type_qualified_name), Some(EdgeKind::Implements))
            .into_iter()
            .map(|e| e.to.qualified.clone())
            .collect()
    }

    /// Distinct interface types referenced by a field or constructor
    /// parameter of `type_qualified_name` — the structural shape of an
    /// injected dependency.
    pub fn injected_interface_dependencies(&self, type_qualified_name: &str) -> Vec<String> {
        let mut out = std::collections::BTreeSet::new();
        for e in self.graph.outgoing(&NodeId::for_type(type_qualified_name), Some(EdgeKind::DependsOn)) {
            out.insert(e.to.qualified.clone());
        }
        out.into_iter().collect()
    }

    pub fn driving_ports_implemented(&self, type_qualified_name: &str) -> Vec<String> {
        self.implemented_interfaces(type_qualified_name)
            .into_iter()
            .filter(|i| {
                self.port_info(i)
                    .map(|p| p.direction == PortDirection::Driving)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn driven_ports_depended_on(&self, type_qualified_name: &str) -> Vec<String> {
        self.injected_interface_dependencies(type_qualified_name)
            .into_iter()
            .filter(|i| {
                self.port_info(i)
                    .map(|p| p.direction == PortDirection::Driven)
                    .unwrap_or(false)
            })
            .collect()
    }
}
