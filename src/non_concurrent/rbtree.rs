//! An ordered map backed by a red-black tree.
//!
//! Nodes live in an arena and refer to each other by `NodeId` handle, so the parent/child
//! graph has no ownership cycles. Handle `0` is the black sentinel, which stands in for every
//! missing child and for the root's parent.

use std::fmt::{self, Debug};
use std::mem;

mod balance;
mod iter;
mod node;
mod validate;


pub use iter::Iter;
pub use validate::InvariantViolation;

use node::{NodeId, Tree};

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTreeMap with `n` entries has height at most `2*log₂(n+1)`

/// The ordering used by [`RBTreeMap::new`].
pub type NaturalOrder<K> = fn(&K, &K) -> bool;

fn natural_less<K: Ord>(a: &K, b: &K) -> bool {
    a < b
}

/// A sorted map with worst-case `O(log n)` insert, remove, lookup and bound queries.
///
/// Keys are ordered by the strict-weak-ordering predicate `less`, which defaults to [`Ord`].
///
/// # Duplicate keys
///
/// Whether a key is *already present* is decided by the key's own [`PartialEq`], not by `less`.
/// The two only disagree when `less` treats keys as equivalent that `==` does not (say, a
/// case-insensitive ordering over `String`s). In that case both keys get stored, next to each
/// other in iteration order, and lookups find whichever one the descent meets first.
///
/// The map has no internal synchronization; the borrow checker already keeps you from mutating
/// it while an [`Iter`] is alive.
#[derive(Clone)]
pub struct RBTreeMap<K, V, F = NaturalOrder<K>> {
    tree: Tree,
    // `entries[id.slot()]` belongs to the node `id`
    entries: Vec<(K, V)>,
    less: F,
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Creates an empty map ordered by `K`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_ordering(capacity, natural_less::<K> as NaturalOrder<K>)
    }
}

impl<K: Ord, V> Default for RBTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F> RBTreeMap<K, V, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// Creates an empty map ordered by `less(a, b)`, which should return whether `a` comes
    /// strictly before `b`.
    pub fn with_ordering(less: F) -> Self {
        Self::with_capacity_and_ordering(0, less)
    }
    
    pub fn with_capacity_and_ordering(capacity: usize, less: F) -> Self {
        Self {
            tree: Tree::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            less,
        }
    }
}

impl<K, V, F> RBTreeMap<K, V, F> {
    /// The number of entries in the map. `O(1)`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    
    /// Iterates over the entries in ascending key order.
    ///
    /// Each call starts a fresh walk over the current contents.
    pub fn in_order(&self) -> Iter<'_, K, V> {
        Iter::new(&self.tree, &self.entries)
    }
    
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.in_order().map(|(k, _)| k)
    }
    
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.in_order().map(|(_, v)| v)
    }
    
    /// The entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        if self.tree.root.is_nil() { return None }
        Some(self.entry(self.tree.minimum(self.tree.root)))
    }
    
    /// The entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        if self.tree.root.is_nil() { return None }
        Some(self.entry(self.tree.maximum(self.tree.root)))
    }
    
    pub fn clear(&mut self) {
        debug!("clearing red-black tree with {} entries", self.len());
        self.tree.clear();
        self.entries.clear();
    }
    
    #[inline]
    fn key(&self, id: NodeId) -> &K {
        &self.entries[id.slot()].0
    }
    
    #[inline]
    fn entry(&self, id: NodeId) -> (&K, &V) {
        let (key, value) = &self.entries[id.slot()];
        (key, value)
    }
}

impl<K, V, F> RBTreeMap<K, V, F>
where
    K: PartialEq,
    F: Fn(&K, &K) -> bool,
{
    /// Finds the node holding `key`, or the sentinel.
    fn search(&self, key: &K) -> NodeId {
        let mut current = self.tree.root;
        while !current.is_nil() {
            let here = self.key(current);
            if key == here { return current }
            current = if (self.less)(key, here) {
                self.tree[current].left
            } else {
                self.tree[current].right
            };
        }
        NodeId::NIL
    }
    
    /// Inserts `value` under `key`.
    ///
    /// If the key was already present its value is overwritten in place and the old one is
    /// returned; the shape of the tree does not change.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = NodeId::NIL;
        let mut current = self.tree.root;
        let mut goes_left = false;
        
        while !current.is_nil() {
            parent = current;
            let (here, slot) = &mut self.entries[current.slot()];
            if key == *here {
                return Some(mem::replace(slot, value))
            }
            goes_left = (self.less)(&key, &*here);
            current = if goes_left {
                self.tree[current].left
            } else {
                self.tree[current].right
            };
        }
        
        let id = self.tree.push_leaf(parent);
        self.entries.push((key, value));
        debug_assert_eq!(self.entries.len(), self.tree.node_count());
        
        if parent.is_nil() {
            self.tree.root = id;
        } else if goes_left {
            self.tree[parent].left = id;
        } else {
            self.tree[parent].right = id;
        }
        
        self.tree.fix_insert(id);
        None
    }
    
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }
    
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let id = self.search(key);
        if id.is_nil() { return None }
        Some(self.entry(id))
    }
    
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.search(key);
        if id.is_nil() { return None }
        Some(&mut self.entries[id.slot()].1)
    }
    
    pub fn contains_key(&self, key: &K) -> bool {
        !self.search(key).is_nil()
    }
    
    /// Removes `key` from the map, returning its value. Does nothing if the key is absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }
    
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let z = self.search(key);
        if z.is_nil() { return None }
        
        // both of these move the last node into `z`'s handle
        self.tree.remove(z);
        let entry = self.entries.swap_remove(z.slot());
        debug_assert_eq!(self.entries.len(), self.tree.node_count());
        
        Some(entry)
    }
}

impl<K, V, F> RBTreeMap<K, V, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// The entry with the smallest key that is not ordered before `key` (i.e. `>= key`).
    pub fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        let mut result = NodeId::NIL;
        let mut current = self.tree.root;
        
        while !current.is_nil() {
            if !(self.less)(self.key(current), key) {
                result = current;
                current = self.tree[current].left;
            } else {
                current = self.tree[current].right;
            }
        }
        
        if result.is_nil() { return None }
        Some(self.entry(result))
    }
    
    /// The entry with the smallest key strictly after `key` (i.e. `> key`).
    pub fn upper_bound(&self, key: &K) -> Option<(&K, &V)> {
        let mut result = NodeId::NIL;
        let mut current = self.tree.root;
        
        while !current.is_nil() {
            if (self.less)(key, self.key(current)) {
                result = current;
                current = self.tree[current].left;
            } else {
                current = self.tree[current].right;
            }
        }
        
        if result.is_nil() { return None }
        Some(self.entry(result))
    }
}

impl<K: Debug, V: Debug, F> Debug for RBTreeMap<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}

impl<'a, K, V, F> IntoIterator for &'a RBTreeMap<K, V, F> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    
    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, F> Extend<(K, V)> for RBTreeMap<K, V, F>
where
    K: PartialEq,
    F: Fn(&K, &K) -> bool,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.tree.reserve(lower);
        self.entries.reserve(lower);
        
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
