use crate::core::grid::{Axis, GridCoord, GridDimensions};
use std::collections::HashMap;

/// Key identifying one lattice edge by its lower endpoint and direction.
///
/// Every cell that touches the edge computes the same key.
#[inline]
pub fn edge_key(dims: &GridDimensions, base: GridCoord, axis: Axis) -> usize {
    3 * dims.linear_index(base) + axis.index()
}

/// Vertex ids already emitted for crossed lattice edges during one extraction.
#[derive(Debug, Clone)]
pub struct EdgeVertexCache<Id> {
    data: HashMap<usize, Id>,
    hits: usize,
}

impl<Id> Default for EdgeVertexCache<Id> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
            hits: 0,
        }
    }
}

impl<Id: Copy> EdgeVertexCache<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an edge, counting the lookup as a hit when present.
    pub fn get(&mut self, key: usize) -> Option<Id> {
        let id = self.data.get(&key).copied();
        if id.is_some() {
            self.hits += 1;
        }
        id
    }

    pub fn insert(&mut self, key: usize, id: Id) {
        self.data.insert(key, id);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}
