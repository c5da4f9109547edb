use std::ops::{Index, IndexMut};

/// Handle to a node in a [`Tree`].
///
/// Handle `0` is reserved for the sentinel, so every other handle `id` owns
/// `links[id]` in the tree and `entries[id - 1]` in the map that wraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct NodeId(usize);

impl NodeId {
    /// The shared "no child / no parent" marker.
    pub(super) const NIL: NodeId = NodeId(0);
    
    #[inline]
    pub(super) fn is_nil(self) -> bool {
        self == Self::NIL
    }
    
    /// Index of this node's `(key, value)` pair. The sentinel has no entry.
    #[inline]
    pub(super) fn slot(self) -> usize {
        debug_assert!(!self.is_nil(), "the sentinel has no entry");
        self.0 - 1
    }
    
    /// Position of this node in the arena, sentinel included.
    #[inline]
    pub(super) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Links {
    pub parent: NodeId,
    pub left: NodeId,
    pub right: NodeId,
    pub color: Color,
}

impl Links {
    const SENTINEL: Links = Links {
        parent: NodeId::NIL,
        left: NodeId::NIL,
        right: NodeId::NIL,
        color: Color::Black,
    };
    
    /// A freshly inserted node: red, with both children pointing at the sentinel.
    fn leaf(parent: NodeId) -> Self {
        Links { parent, color: Color::Red, ..Self::SENTINEL }
    }
}

/// The shape of a red-black tree: colors and parent/child relations, but no keys or values.
///
/// Keeping this separate from the entries means none of the rebalancing code is generic.
#[derive(Debug, Clone)]
pub(super) struct Tree {
    links: Vec<Links>,
    pub root: NodeId,
}

impl Tree {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        let mut links = Vec::with_capacity(capacity.saturating_add(1));
        links.push(Links::SENTINEL);
        Self { links, root: NodeId::NIL }
    }
    
    /// Number of live (non-sentinel) nodes.
    pub(super) fn node_count(&self) -> usize {
        self.links.len() - 1
    }
    
    pub(super) fn reserve(&mut self, additional: usize) {
        self.links.reserve(additional);
    }
    
    /// Allocates a red leaf under `parent`. The caller is responsible for hooking it into
    /// `parent`'s left or right slot (or making it the root).
    pub(super) fn push_leaf(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.links.len());
        self.links.push(Links::leaf(parent));
        id
    }
    
    pub(super) fn minimum(&self, mut id: NodeId) -> NodeId {
        while !self[id].left.is_nil() {
            id = self[id].left;
        }
        id
    }
    
    pub(super) fn maximum(&self, mut id: NodeId) -> NodeId {
        while !self[id].right.is_nil() {
            id = self[id].right;
        }
        id
    }
    
    pub(super) fn clear(&mut self) {
        self.links.truncate(1);
        self.links[0] = Links::SENTINEL;
        self.root = NodeId::NIL;
    }
    
    /// Frees the slot of `z`, which must already be unlinked from the tree.
    ///
    /// The last node in the arena is moved into `z`'s handle (mirroring `Vec::swap_remove`),
    /// so whoever holds data indexed by handle has to `swap_remove` at `z.slot()` too.
    pub(super) fn release(&mut self, z: NodeId) {
        debug_assert!(!z.is_nil());
        let last = NodeId(self.links.len() - 1);
        
        if z != last {
            let moved = self[last];
            
            if moved.parent.is_nil() {
                self.root = z;
            } else if self[moved.parent].left == last {
                self[moved.parent].left = z;
            } else {
                self[moved.parent].right = z;
            }
            
            if !moved.left.is_nil() { self[moved.left].parent = z }
            if !moved.right.is_nil() { self[moved.right].parent = z }
        }
        
        self.links.swap_remove(z.0);
    }
}

impl Index<NodeId> for Tree {
    type Output = Links;
    
    #[inline]
    fn index(&self, id: NodeId) -> &Links {
        &self.links[id.0]
    }
}

impl IndexMut<NodeId> for Tree {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.links[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn sentinel_is_black_and_uncounted() {
        let tree = Tree::with_capacity(4);
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree[NodeId::NIL].color, Color::Black);
        assert!(tree.root.is_nil());
    }
    
    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn huge_capacity_is_left_to_vec() {
        let _ = Tree::with_capacity(usize::MAX);
    }
    
    #[test]
    fn release_relinks_the_moved_node() {
        // 1 is the root, 2 is its left child and 3 is its right child
        let mut tree = Tree::with_capacity(3);
        let root = tree.push_leaf(NodeId::NIL);
        tree.root = root;
        let left = tree.push_leaf(root);
        tree[root].left = left;
        let right = tree.push_leaf(root);
        tree[root].right = right;
        
        // unlink the left child by hand, then free its slot
        tree[root].left = NodeId::NIL;
        tree.release(left);
        
        assert_eq!(tree.node_count(), 2);
        // the former right child now lives at the freed handle
        assert_eq!(tree[root].right, left);
        assert_eq!(tree[left].parent, root);
    }
    
    #[test]
    fn release_moves_the_root() {
        let mut tree = Tree::with_capacity(2);
        let first = tree.push_leaf(NodeId::NIL);
        let second = tree.push_leaf(NodeId::NIL);
        // make `second` the root with `first` detached
        tree.root = second;
        tree.release(first);
        
        assert_eq!(tree.root, first);
        assert_eq!(tree.node_count(), 1);
    }
}
