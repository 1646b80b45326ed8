//! Per-element nodal field data used for contour display.

use febview_core::{FebviewError, Result};

/// A scalar field stored per element node.
///
/// Each element carries a tag; a positive tag marks the element as having
/// valid data. Values are indexed by the element's local node number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    tags: Vec<i32>,
    values: Vec<Vec<f64>>,
}

impl MeshData {
    /// Creates a field for `element_count` elements with no data assigned.
    #[must_use]
    pub fn new(element_count: usize) -> Self {
        Self {
            tags: vec![0; element_count],
            values: vec![Vec::new(); element_count],
        }
    }

    /// Number of elements the field covers.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.tags.len()
    }

    /// Assigns the nodal values of one element and marks it as valid.
    pub fn set_element_values(&mut self, element: usize, values: Vec<f64>) -> Result<()> {
        let count = self.tags.len();
        let slot = self
            .values
            .get_mut(element)
            .ok_or(FebviewError::ElementIndexOutOfRange {
                index: element,
                count,
            })?;
        *slot = values;
        self.tags[element] = 1;
        Ok(())
    }

    /// Removes the data of one element.
    pub fn clear_element(&mut self, element: usize) {
        if let Some(tag) = self.tags.get_mut(element) {
            *tag = 0;
            self.values[element].clear();
        }
    }

    /// Data tag of an element. Positive means the element has data.
    #[must_use]
    pub fn tag(&self, element: usize) -> i32 {
        self.tags.get(element).copied().unwrap_or(0)
    }

    /// Value at local node `node` of `element`, or zero if absent.
    #[must_use]
    pub fn element_value(&self, element: usize, node: usize) -> f64 {
        self.values
            .get(element)
            .and_then(|v| v.get(node))
            .copied()
            .unwrap_or(0.0)
    }

    /// Range of all values on tagged elements, or `None` if there are none.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.tags
            .iter()
            .zip(&self.values)
            .filter(|(tag, _)| **tag > 0)
            .flat_map(|(_, values)| values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}
