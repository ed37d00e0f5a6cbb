use crate::hierarchy::node::RawNode;

/// Joins the labels of several text children
pub const LABEL_SEPARATOR: &str = " ";

/// Name used when even the class name is empty
const UNNAMED: &str = "View";

/// Derive a display name for a node. Never returns an empty string.
///
/// Priority: text of immediate text-label children, own content description,
/// own text, then the short class name.
pub fn resolve_name(node: &RawNode) -> String {
    let from_children = child_label_text(node);
    if !from_children.is_empty() {
        return from_children;
    }

    if let Some(desc) = non_blank(node.content_desc.as_deref()) {
        return desc.to_string();
    }

    if let Some(text) = non_blank(node.text.as_deref()) {
        return text.to_string();
    }

    match node.short_class_name().trim() {
        "" => UNNAMED.to_string(),
        short => short.to_string(),
    }
}

/// TextView subclasses that hold user input rather than a label
const TEXT_ENTRY_SUFFIXES: &[&str] = &["EditText", "AutoCompleteTextView"];

/// Whether a class renders a plain text label
fn is_text_label(class_name: &str) -> bool {
    class_name.rsplit('.').next().is_some_and(|short| {
        short.ends_with("TextView") && !TEXT_ENTRY_SUFFIXES.iter().any(|entry| short.ends_with(entry))
    })
}

fn child_label_text(node: &RawNode) -> String {
    node.children
        .iter()
        .filter(|child| is_text_label(&child.class_name))
        .filter_map(|child| {
            non_blank(child.text.as_deref()).or_else(|| non_blank(child.content_desc.as_deref()))
        })
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
