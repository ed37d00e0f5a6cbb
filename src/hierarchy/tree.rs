use crate::error::{PuppeteerError, Result};
use crate::hierarchy::classify::InteractiveRegistry;
use crate::hierarchy::element::{ElementNode, extract_box};
use crate::hierarchy::element_map::ElementMap;
use crate::hierarchy::name::resolve_name;
use crate::hierarchy::node::Snapshot;

/// A parsed hierarchy dump together with its indexed interactive elements
#[derive(Debug, Clone)]
pub struct UiTree {
    /// Full node tree as read from the dump
    pub snapshot: Snapshot,

    /// Interactive elements in traversal order
    pub elements: ElementMap,
}

impl UiTree {
    /// Parse a hierarchy dump and index its interactive elements
    pub fn parse(xml: &str, registry: &InteractiveRegistry) -> Result<Self> {
        let snapshot = Snapshot::parse(xml)?;
        Ok(Self::from_snapshot(snapshot, registry))
    }

    /// Index interactive elements of an already parsed snapshot
    pub fn from_snapshot(snapshot: Snapshot, registry: &InteractiveRegistry) -> Self {
        let elements = build_element_map(&snapshot, registry);
        Self { snapshot, elements }
    }

    /// Get element by index
    pub fn get(&self, index: usize) -> Option<&ElementNode> {
        self.elements.get(index)
    }

    /// Count every node in the dump
    pub fn count_nodes(&self) -> usize {
        self.snapshot.count_nodes()
    }

    /// Count interactive elements
    pub fn count_interactive(&self) -> usize {
        self.elements.len()
    }

    /// Convert the element list to JSON
    pub fn to_json(&self) -> Result<String> {
        self.elements
            .to_json()
            .map_err(|e| PuppeteerError::ParseFailed(format!("Failed to serialize elements to JSON: {}", e)))
    }
}

/// Parse a hierarchy dump and return only its interactive elements
pub fn extract_elements(xml: &str, registry: &InteractiveRegistry) -> Result<ElementMap> {
    Ok(UiTree::parse(xml, registry)?.elements)
}

fn build_element_map(snapshot: &Snapshot, registry: &InteractiveRegistry) -> ElementMap {
    let mut elements = ElementMap::new();

    for node in snapshot.nodes() {
        if !registry.is_interactive(node) {
            continue;
        }

        let bounds = match extract_box(node) {
            Ok(bounds) => bounds,
            Err(e) => {
                log::debug!("Skipping {}: {}", node.class_name, e);
                continue;
            }
        };

        let name = resolve_name(node);
        if name.is_empty() {
            log::debug!("Skipping unnamed {} at {:?}", node.class_name, bounds);
            continue;
        }

        elements.register(ElementNode::new(
            name,
            node.class_name.clone(),
            bounds,
            node.clickable,
            node.focusable,
        ));
    }

    log::debug!(
        "Indexed {} interactive elements out of {} nodes",
        elements.len(),
        snapshot.count_nodes()
    );
    elements
}
