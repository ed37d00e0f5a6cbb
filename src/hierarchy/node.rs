use crate::error::Result;
use roxmltree::Node;

/// Tag used by uiautomator for every view in the dump
const NODE_TAG: &str = "node";

/// A view record read from an accessibility hierarchy dump
///
/// Every attribute the extraction pipeline cares about is typed here; absent or
/// empty string attributes are `None` so callers never have to guess between
/// "missing" and "blank".
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    /// Fully qualified widget class (e.g. "android.widget.Button")
    pub class_name: String,

    /// Raw bounds attribute in `[x1,y1][x2,y2]` form
    pub bounds: Option<String>,

    /// Visible text of the view
    pub text: Option<String>,

    /// Accessibility content description
    pub content_desc: Option<String>,

    pub clickable: bool,
    pub focusable: bool,

    /// `visible-to-user`; dumps that omit the attribute are treated as visible
    pub visible: bool,

    pub enabled: bool,

    /// Child views in document order
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a visible, enabled, non-interactive node of the given class
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            bounds: None,
            text: None,
            content_desc: None,
            clickable: false,
            focusable: false,
            visible: true,
            enabled: true,
            children: Vec::new(),
        }
    }

    /// Builder method: set bounds string
    pub fn with_bounds(mut self, bounds: impl Into<String>) -> Self {
        self.bounds = Some(bounds.into());
        self
    }

    /// Builder method: set text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: set content description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.content_desc = Some(desc.into());
        self
    }

    /// Builder method: set clickable flag
    pub fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Builder method: set focusable flag
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Builder method: set visibility
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder method: set enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = children;
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: RawNode) {
        self.children.push(child);
    }

    /// Whether the node is shown to the user and accepts input
    pub fn is_actionable(&self) -> bool {
        self.visible && self.enabled
    }

    /// Last dot-separated segment of the class name
    pub fn short_class_name(&self) -> &str {
        self.class_name.rsplit('.').next().unwrap_or(&self.class_name)
    }

    fn from_xml(node: Node<'_, '_>) -> Self {
        let children = node
            .children()
            .filter(|c| c.is_element() && c.has_tag_name(NODE_TAG))
            .map(RawNode::from_xml)
            .collect();

        Self {
            class_name: node.attribute("class").unwrap_or_default().to_string(),
            bounds: string_attr(node, "bounds"),
            text: string_attr(node, "text"),
            content_desc: string_attr(node, "content-desc"),
            clickable: bool_attr(node, "clickable", false),
            focusable: bool_attr(node, "focusable", false),
            visible: bool_attr(node, "visible-to-user", true),
            enabled: bool_attr(node, "enabled", true),
            children,
        }
    }
}

fn string_attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn bool_attr(node: Node<'_, '_>, name: &str, default: bool) -> bool {
    match node.attribute(name) {
        Some(value) => value.trim().eq_ignore_ascii_case("true"),
        None => default,
    }
}

/// A parsed hierarchy dump
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Top-level views (usually one per window)
    pub roots: Vec<RawNode>,
}

impl Snapshot {
    /// Create a snapshot from already-built nodes
    pub fn new(roots: Vec<RawNode>) -> Self {
        Self { roots }
    }

    /// Parse a uiautomator XML dump
    ///
    /// A document that is not well-formed XML is rejected as a whole. Attribute
    /// problems on individual nodes are left for later stages to deal with.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        let roots = if root.has_tag_name(NODE_TAG) {
            vec![RawNode::from_xml(root)]
        } else {
            let mut roots = Vec::new();
            collect_roots(root, &mut roots);
            roots
        };

        Ok(Self { roots })
    }

    /// Visible and enabled nodes in pre-order (document order)
    pub fn nodes(&self) -> impl Iterator<Item = &RawNode> {
        let mut stack: Vec<&RawNode> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
        .filter(|node| node.is_actionable())
    }

    /// Count every node in the dump, including hidden and disabled ones
    pub fn count_nodes(&self) -> usize {
        self.roots.iter().map(count_recursive).sum()
    }
}

fn collect_roots(element: Node<'_, '_>, roots: &mut Vec<RawNode>) {
    for child in element.children().filter(|c| c.is_element()) {
        if child.has_tag_name(NODE_TAG) {
            roots.push(RawNode::from_xml(child));
        } else {
            collect_roots(child, roots);
        }
    }
}

fn count_recursive(node: &RawNode) -> usize {
    1 + node.children.iter().map(count_recursive).sum::<usize>()
}
