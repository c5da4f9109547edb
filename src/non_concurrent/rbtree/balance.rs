//! Rotations and the two fixup procedures.
//!
//! Everything here works on the sentinel technique: `NodeId::NIL` is a real (black) slot in
//! the arena, so reading the color or parent of a missing child never needs a branch. The delete
//! fixup also *writes* the sentinel's parent, which is why the sentinel needs a slot at all.

use super::node::{Color, NodeId, Tree};

impl Tree {
    /// ```text
    ///     x               y
    ///    / \             / \
    ///   a   y    =>     x   c
    ///      / \         / \
    ///     b   c       a   b
    /// ```
    pub(super) fn rotate_left(&mut self, x: NodeId) {
        let y = self[x].right;
        debug_assert!(!y.is_nil(), "rotate_left needs a right child");
        trace!("rotating left at {x:?}");
        
        let b = self[y].left;
        self[x].right = b;
        if !b.is_nil() { self[b].parent = x }
        
        let parent = self[x].parent;
        self[y].parent = parent;
        if parent.is_nil() {
            self.root = y;
        } else if x == self[parent].left {
            self[parent].left = y;
        } else {
            self[parent].right = y;
        }
        
        self[y].left = x;
        self[x].parent = y;
    }
    
    /// Mirror image of [`Tree::rotate_left`].
    pub(super) fn rotate_right(&mut self, y: NodeId) {
        let x = self[y].left;
        debug_assert!(!x.is_nil(), "rotate_right needs a left child");
        trace!("rotating right at {y:?}");
        
        let b = self[x].right;
        self[y].left = b;
        if !b.is_nil() { self[b].parent = y }
        
        let parent = self[y].parent;
        self[x].parent = parent;
        if parent.is_nil() {
            self.root = x;
        } else if y == self[parent].left {
            self[parent].left = x;
        } else {
            self[parent].right = x;
        }
        
        self[x].right = y;
        self[y].parent = x;
    }
    
    /// Puts `v` where `u` used to hang. `v` may be the sentinel, whose parent gets set anyway
    /// (the delete fixup reads it back).
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self[u].parent;
        if parent.is_nil() {
            self.root = v;
        } else if u == self[parent].left {
            self[parent].left = v;
        } else {
            self[parent].right = v;
        }
        self[v].parent = parent;
    }
    
    /// Restores the red-black properties after `z` was attached as a red leaf.
    pub(super) fn fix_insert(&mut self, mut z: NodeId) {
        while self[self[z].parent].color == Color::Red {
            let parent = self[z].parent;
            // a red parent is never the root, so the grandparent is a real node
            let grandparent = self[parent].parent;
            
            if parent == self[grandparent].left {
                let uncle = self[grandparent].right;
                if self[uncle].color == Color::Red {
                    trace!("insert fixup: red uncle at {z:?}, recoloring");
                    self[parent].color = Color::Black;
                    self[uncle].color = Color::Black;
                    self[grandparent].color = Color::Red;
                    z = grandparent;
                    continue
                }
                if z == self[parent].right {
                    trace!("insert fixup: inner child at {z:?}");
                    z = parent;
                    self.rotate_left(z);
                }
                trace!("insert fixup: outer child at {z:?}");
                let parent = self[z].parent;
                let grandparent = self[parent].parent;
                self[parent].color = Color::Black;
                self[grandparent].color = Color::Red;
                self.rotate_right(grandparent);
            } else {
                let uncle = self[grandparent].left;
                if self[uncle].color == Color::Red {
                    trace!("insert fixup: red uncle at {z:?}, recoloring");
                    self[parent].color = Color::Black;
                    self[uncle].color = Color::Black;
                    self[grandparent].color = Color::Red;
                    z = grandparent;
                    continue
                }
                if z == self[parent].left {
                    trace!("insert fixup: inner child at {z:?}");
                    z = parent;
                    self.rotate_right(z);
                }
                trace!("insert fixup: outer child at {z:?}");
                let parent = self[z].parent;
                let grandparent = self[parent].parent;
                self[parent].color = Color::Black;
                self[grandparent].color = Color::Red;
                self.rotate_left(grandparent);
            }
        }
        
        let root = self.root;
        self[root].color = Color::Black;
    }
    
    /// Unlinks `z` from the tree, rebalances, and frees its slot (see [`Tree::release`]).
    pub(super) fn remove(&mut self, z: NodeId) {
        debug_assert!(!z.is_nil());
        
        // `y` is the node that physically leaves its position; `x` is whatever takes its place
        let mut y = z;
        let mut removed_color = self[y].color;
        let x;
        
        if self[z].left.is_nil() {
            x = self[z].right;
            self.transplant(z, x);
        } else if self[z].right.is_nil() {
            x = self[z].left;
            self.transplant(z, x);
        } else {
            y = self.minimum(self[z].right);
            removed_color = self[y].color;
            x = self[y].right;
            
            if self[y].parent == z {
                // `x` may be the sentinel, the fixup still needs to find its way up
                self[x].parent = y;
            } else {
                self.transplant(y, x);
                let right = self[z].right;
                self[y].right = right;
                self[right].parent = y;
            }
            
            self.transplant(z, y);
            let left = self[z].left;
            self[y].left = left;
            self[left].parent = y;
            self[y].color = self[z].color;
        }
        
        if removed_color == Color::Black {
            self.fix_delete(x);
        }
        
        self.release(z);
    }
    
    /// Pushes the "extra black" left behind by a removal up the tree until it can be absorbed.
    fn fix_delete(&mut self, mut x: NodeId) {
        while x != self.root && self[x].color == Color::Black {
            let parent = self[x].parent;
            
            if x == self[parent].left {
                let mut sibling = self[parent].right;
                if self[sibling].color == Color::Red {
                    trace!("delete fixup: red sibling at {x:?}");
                    self[sibling].color = Color::Black;
                    self[parent].color = Color::Red;
                    self.rotate_left(parent);
                    sibling = self[parent].right;
                }
                
                let (near, far) = (self[sibling].left, self[sibling].right);
                if self[near].color == Color::Black && self[far].color == Color::Black {
                    trace!("delete fixup: black nephews at {x:?}, moving up");
                    self[sibling].color = Color::Red;
                    x = parent;
                    continue
                }
                
                if self[far].color == Color::Black {
                    trace!("delete fixup: red near nephew at {x:?}");
                    self[near].color = Color::Black;
                    self[sibling].color = Color::Red;
                    self.rotate_right(sibling);
                    sibling = self[parent].right;
                }
                
                trace!("delete fixup: red far nephew at {x:?}");
                self[sibling].color = self[parent].color;
                self[parent].color = Color::Black;
                let far = self[sibling].right;
                self[far].color = Color::Black;
                self.rotate_left(parent);
                x = self.root;
            } else {
                let mut sibling = self[parent].left;
                if self[sibling].color == Color::Red {
                    trace!("delete fixup: red sibling at {x:?}");
                    self[sibling].color = Color::Black;
                    self[parent].color = Color::Red;
                    self.rotate_right(parent);
                    sibling = self[parent].left;
                }
                
                let (near, far) = (self[sibling].right, self[sibling].left);
                if self[near].color == Color::Black && self[far].color == Color::Black {
                    trace!("delete fixup: black nephews at {x:?}, moving up");
                    self[sibling].color = Color::Red;
                    x = parent;
                    continue
                }
                
                if self[far].color == Color::Black {
                    trace!("delete fixup: red near nephew at {x:?}");
                    self[near].color = Color::Black;
                    self[sibling].color = Color::Red;
                    self.rotate_left(sibling);
                    sibling = self[parent].left;
                }
                
                trace!("delete fixup: red far nephew at {x:?}");
                self[sibling].color = self[parent].color;
                self[parent].color = Color::Black;
                let far = self[sibling].left;
                self[far].color = Color::Black;
                self.rotate_right(parent);
                x = self.root;
            }
        }
        
        self[x].color = Color::Black;
    }
}
