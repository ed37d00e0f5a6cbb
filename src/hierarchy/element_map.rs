use crate::hierarchy::element::{ElementNode, ElementRecord, Point};
use indexmap::IndexMap;

/// Ordered map of element indices to extracted elements
///
/// Indices are handed out sequentially from 0 in registration order and are
/// never reassigned, so they can be used as on-screen labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMap {
    /// Map from index to element
    map: IndexMap<usize, ElementNode>,

    /// Next available index
    next_index: usize,
}

impl ElementMap {
    /// Create a new empty ElementMap
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
            next_index: 0,
        }
    }

    /// Register a new element and return its assigned index
    pub fn register(&mut self, element: ElementNode) -> usize {
        let index = self.next_index;
        self.map.insert(index, element);
        self.next_index += 1;
        index
    }

    /// Get element by index
    pub fn get(&self, index: usize) -> Option<&ElementNode> {
        self.map.get(&index)
    }

    /// Check if index exists
    pub fn contains(&self, index: usize) -> bool {
        self.map.contains_key(&index)
    }

    /// Get the number of registered elements
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all (index, element) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ElementNode)> {
        self.map.iter().map(|(idx, el)| (*idx, el))
    }

    /// Get all indices
    pub fn indices(&self) -> impl Iterator<Item = &usize> {
        self.map.keys()
    }

    /// Get all elements
    pub fn elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.map.values()
    }

    /// Find the first element with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.map
            .iter()
            .find(|(_, el)| el.name() == name)
            .map(|(idx, _)| *idx)
    }

    /// Find the innermost element covering a screen point
    ///
    /// Nested containers all contain the point; the one with the smallest area
    /// is the most specific target. Ties go to the later (deeper) element.
    pub fn find_at(&self, point: Point) -> Option<usize> {
        self.map
            .iter()
            .filter(|(_, el)| el.bounds().contains(point))
            .min_by(|(ia, a), (ib, b)| a.bounds().area().cmp(&b.bounds().area()).then(ib.cmp(ia)))
            .map(|(idx, _)| *idx)
    }

    /// Serializable records in index order
    pub fn to_records(&self) -> Vec<ElementRecord> {
        self.iter()
            .map(|(idx, el)| ElementRecord::from_element(idx, el))
            .collect()
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_records())
    }
}
