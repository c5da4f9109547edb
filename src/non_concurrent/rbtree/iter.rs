use std::iter::FusedIterator;

use super::node::{NodeId, Tree};

/// Ascending in-order iterator over the entries of an [`RBTreeMap`](super::RBTreeMap).
///
/// Created by [`RBTreeMap::in_order`](super::RBTreeMap::in_order). The walk is iterative: it
/// keeps the path of not-yet-visited ancestors on an explicit stack, which never grows past the
/// height of the tree (`2*log₂(n+1)`). Dropping the iterator early is fine and costs nothing.
pub struct Iter<'a, K, V> {
    tree: &'a Tree,
    entries: &'a [(K, V)],
    stack: Vec<NodeId>,
    current: NodeId,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(tree: &'a Tree, entries: &'a [(K, V)]) -> Self {
        Self {
            tree,
            entries,
            stack: Vec::new(),
            current: tree.root,
            remaining: entries.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    
    fn next(&mut self) -> Option<Self::Item> {
        while !self.current.is_nil() {
            self.stack.push(self.current);
            self.current = self.tree[self.current].left;
        }
        
        let node = self.stack.pop()?;
        self.current = self.tree[node].right;
        self.remaining -= 1;
        
        let (key, value) = &self.entries[node.slot()];
        Some((key, value))
    }
    
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

// once the stack is empty and `current` is the sentinel, `next` keeps returning `None`
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            entries: self.entries,
            stack: self.stack.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}
