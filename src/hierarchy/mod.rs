//! Accessibility hierarchy extraction
//!
//! This module turns a uiautomator hierarchy dump into an indexed list of
//! interactive elements. It includes:
//! - RawNode / Snapshot: typed view of the XML dump
//! - InteractiveRegistry: rules for which nodes a user can act on
//! - resolve_name: display names for elements
//! - BoundingBox / Point / ElementNode: element geometry and output records
//! - ElementMap: ordered mapping of indices to elements
//! - UiTree: the full parse → classify → index pipeline

pub mod classify;
pub mod element;
pub mod element_map;
pub mod name;
pub mod node;
pub mod tree;

pub use classify::{DEFAULT_INTERACTIVE_CLASSES, InteractiveRegistry};
pub use element::{BoundingBox, ElementNode, ElementRecord, Point, extract_box};
pub use element_map::ElementMap;
pub use name::resolve_name;
pub use node::{RawNode, Snapshot};
pub use tree::{UiTree, extract_elements};
