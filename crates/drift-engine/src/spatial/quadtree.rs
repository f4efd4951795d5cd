//! Region quadtree over axis-aligned boxes.
//!
//! The root owns every item in one map; nodes live in an arena and only
//! hold item keys. An item is stored in the deepest node whose cell fully
//! contains its box, so items straddling a split line stay in the parent.
//! Nodes are never merged back: `clear()` is the way to shrink the tree.

use std::collections::HashMap;
use std::hash::Hash;

use crate::core::rect::Rect;

/// Something the quadtree can index.
pub trait SpatialItem {
    type Key: Copy + Eq + Hash;

    /// Stable, unique key. Inserting a second item with the same key
    /// replaces the first.
    fn key(&self) -> Self::Key;

    /// Box used for placement and queries.
    fn rect(&self) -> Rect;
}

/// Items a node holds before it splits.
pub const DEFAULT_MAX_ITEMS: usize = 10;
/// Deepest level a split may create (the root is level 0).
pub const DEFAULT_MAX_LEVELS: u32 = 5;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node<K> {
    bounds: Rect,
    level: u32,
    children: Option<[usize; 4]>,
    keys: Vec<K>,
}

impl<K> Node<K> {
    fn new(bounds: Rect, level: u32) -> Self {
        Self {
            bounds,
            level,
            children: None,
            keys: Vec::new(),
        }
    }
}

pub struct QuadTree<T: SpatialItem> {
    nodes: Vec<Node<T::Key>>,
    /// key → (item, index of the node holding the key)
    items: HashMap<T::Key, (T, usize)>,
    max_items: usize,
    max_levels: u32,
    snapshot: Vec<T>,
    dirty: bool,
}

impl<T: SpatialItem + Clone> QuadTree<T> {
    /// Panics if `bounds` has no area or `max_items` is zero.
    pub fn new(bounds: Rect, max_items: usize, max_levels: u32) -> Self {
        assert!(
            bounds.width() > 0.0 && bounds.height() > 0.0,
            "quadtree bounds must have positive area, got {:?}",
            bounds
        );
        assert!(max_items > 0, "quadtree max_items must be at least 1");
        Self {
            nodes: vec![Node::new(bounds, 0)],
            items: HashMap::new(),
            max_items,
            max_levels,
            snapshot: Vec::new(),
            dirty: false,
        }
    }

    pub fn with_defaults(bounds: Rect) -> Self {
        Self::new(bounds, DEFAULT_MAX_ITEMS, DEFAULT_MAX_LEVELS)
    }

    pub fn bounds(&self) -> Rect {
        self.nodes[ROOT].bounds
    }

    /// Number of items stored.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.items.contains_key(&key)
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level reached by any node (the root is level 0).
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }

    /// Insert an item, replacing any item with the same key.
    /// Items outside the root bounds are kept at the root.
    pub fn insert(&mut self, item: T) {
        let key = item.key();
        if self.items.contains_key(&key) {
            self.remove_key(key);
        }
        let rect = item.rect();
        self.items.insert(key, (item, ROOT));
        self.place(ROOT, key, rect);
        self.dirty = true;
    }

    /// Remove the item with the same key as `item`.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        self.remove_key(item.key())
    }

    pub fn remove_key(&mut self, key: T::Key) -> Option<T> {
        let (item, node) = self.items.remove(&key)?;
        self.nodes[node].keys.retain(|k| *k != key);
        self.dirty = true;
        Some(item)
    }

    /// Candidate items that may overlap `item`'s box: everything stored in a
    /// node whose cell touches the box. Not an exact test, callers filter
    /// the result. The queried item itself is included if it is stored.
    pub fn retrieve(&self, item: &T) -> Vec<T> {
        self.retrieve_rect(&item.rect())
    }

    pub fn retrieve_rect(&self, rect: &Rect) -> Vec<T> {
        let mut keys = Vec::new();
        self.collect(ROOT, rect, &mut keys);
        keys.into_iter()
            .filter_map(|k| self.items.get(&k).map(|(item, _)| item.clone()))
            .collect()
    }

    /// Every stored item. The list is rebuilt only after the tree changed.
    pub fn items(&mut self) -> &[T] {
        if self.dirty {
            self.snapshot = self.items.values().map(|(item, _)| item.clone()).collect();
            self.dirty = false;
        }
        &self.snapshot
    }

    /// Drop every item and all child nodes, keeping the root bounds.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.children = None;
        root.keys.clear();
        self.items.clear();
        self.dirty = true;
    }

    // -- private helpers --

    fn place(&mut self, node: usize, key: T::Key, rect: Rect) {
        if let Some(children) = self.nodes[node].children {
            if let Some(q) = self.quadrant_of(node, &rect) {
                self.place(children[q], key, rect);
                return;
            }
        }

        self.nodes[node].keys.push(key);
        if let Some(entry) = self.items.get_mut(&key) {
            entry.1 = node;
        }

        let n = &self.nodes[node];
        if n.children.is_none() && n.keys.len() > self.max_items && n.level < self.max_levels {
            self.split(node);
            self.redistribute(node);
        }
    }

    /// Index of the child cell that fully contains `rect`, if any.
    fn quadrant_of(&self, node: usize, rect: &Rect) -> Option<usize> {
        let children = self.nodes[node].children?;
        children
            .iter()
            .position(|&c| self.nodes[c].bounds.contains_rect(rect))
    }

    fn split(&mut self, node: usize) {
        let level = self.nodes[node].level + 1;
        let quads = self.nodes[node].bounds.quadrants();
        let first = self.nodes.len();
        for bounds in quads {
            self.nodes.push(Node::new(bounds, level));
        }
        self.nodes[node].children = Some([first, first + 1, first + 2, first + 3]);
        log::debug!("quadtree: split node {} into level {}", node, level);
    }

    /// Push this node's keys down into the children that fully contain them.
    fn redistribute(&mut self, node: usize) {
        let keys = std::mem::take(&mut self.nodes[node].keys);
        for key in keys {
            let Some(rect) = self.items.get(&key).map(|(item, _)| item.rect()) else {
                continue;
            };
            self.place(node, key, rect);
        }
    }

    fn collect(&self, node: usize, rect: &Rect, out: &mut Vec<T::Key>) {
        let n = &self.nodes[node];
        out.extend_from_slice(&n.keys);
        if let Some(children) = n.children {
            for c in children {
                if self.nodes[c].bounds.overlaps(rect) {
                    self.collect(c, rect, out);
                }
            }
        }
    }
}
