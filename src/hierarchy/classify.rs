//! Interactivity rules for hierarchy nodes.
//!
//! A node is interactive when it is focusable, clickable, or its class appears
//! in an [`InteractiveRegistry`]. The registry is plain data so new toolkits
//! can be supported by configuration alone.

use crate::error::{PuppeteerError, Result};
use crate::hierarchy::node::RawNode;
use std::collections::HashSet;
use std::path::Path;

/// Widget classes treated as interactive out of the box
pub const DEFAULT_INTERACTIVE_CLASSES: &[&str] = &[
    // Buttons
    "android.widget.Button",
    "android.widget.ImageButton",
    "android.widget.ToggleButton",
    "android.widget.CompoundButton",
    "com.google.android.material.button.MaterialButton",
    "com.google.android.material.floatingactionbutton.FloatingActionButton",
    // Text entry
    "android.widget.EditText",
    "android.widget.AutoCompleteTextView",
    "android.widget.MultiAutoCompleteTextView",
    // Checkable and selectable controls
    "android.widget.CheckBox",
    "android.widget.CheckedTextView",
    "android.widget.RadioButton",
    "android.widget.Switch",
    "androidx.appcompat.widget.SwitchCompat",
    "android.widget.Spinner",
    "android.widget.SeekBar",
    "android.widget.RatingBar",
    // Lists, grids and scroll containers
    "android.widget.ListView",
    "android.widget.GridView",
    "android.widget.ScrollView",
    "android.widget.HorizontalScrollView",
    "androidx.core.widget.NestedScrollView",
    "androidx.recyclerview.widget.RecyclerView",
    // Pagers
    "androidx.viewpager.widget.ViewPager",
    "androidx.viewpager2.widget.ViewPager2",
];

/// Set of class names considered interactive regardless of node flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveRegistry {
    classes: HashSet<String>,
}

impl InteractiveRegistry {
    /// Create an empty registry (only node flags decide interactivity)
    pub fn empty() -> Self {
        Self {
            classes: HashSet::new(),
        }
    }

    /// Registry seeded with [`DEFAULT_INTERACTIVE_CLASSES`]
    pub fn android_defaults() -> Self {
        Self::from_classes(DEFAULT_INTERACTIVE_CLASSES.iter().copied())
    }

    /// Build a registry from arbitrary class names
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON array of class names
    pub fn from_json_str(json: &str) -> Result<Self> {
        let classes: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_classes(classes))
    }

    /// Load a JSON array of class names from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PuppeteerError::ConfigInvalid(format!("Failed to read registry {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Builder method: add more classes
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend(classes);
        self
    }

    /// Add classes to the registry
    pub fn extend<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
    }

    /// Check if a class name is registered
    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains(class_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Decide whether a node is something a user can act on
    pub fn is_interactive(&self, node: &RawNode) -> bool {
        node.focusable || node.clickable || self.contains(&node.class_name)
    }
}

impl Default for InteractiveRegistry {
    fn default() -> Self {
        Self::android_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_make_node_interactive() {
        let registry = InteractiveRegistry::empty();

        let plain = RawNode::new("android.view.View");
        assert!(!registry.is_interactive(&plain));
        assert!(registry.is_interactive(&plain.clone().with_clickable(true)));
        assert!(registry.is_interactive(&plain.with_focusable(true)));
    }

    #[test]
    fn test_registry_class_is_interactive() {
        let registry = InteractiveRegistry::default();
        assert!(registry.is_interactive(&RawNode::new("android.widget.EditText")));
        assert!(registry.is_interactive(&RawNode::new("androidx.recyclerview.widget.RecyclerView")));
    }

    #[test]
    fn test_text_alone_is_not_interactive() {
        let registry = InteractiveRegistry::default();
        let label = RawNode::new("android.widget.TextView").with_text("Welcome back");
        assert!(!registry.is_interactive(&label));
    }

    #[test]
    fn test_registry_is_configurable() {
        let registry = InteractiveRegistry::empty().with_classes(["com.example.FancyKnob"]);
        assert!(registry.is_interactive(&RawNode::new("com.example.FancyKnob")));
        assert!(!registry.is_interactive(&RawNode::new("android.widget.Button")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_load_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["org.toolkit.Tap", "org.toolkit.Slider"]"#).unwrap();

        let registry = InteractiveRegistry::load(file.path()).unwrap();
        assert!(registry.contains("org.toolkit.Tap"));
        assert!(registry.contains("org.toolkit.Slider"));
        assert_eq!(registry.len(), 2);

        assert!(matches!(
            InteractiveRegistry::from_json_str("{\"not\": \"a list\"}"),
            Err(PuppeteerError::ConfigInvalid(_))
        ));
    }
}
