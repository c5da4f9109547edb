use std::mem;

use thiserror::Error;

use super::RBTreeMap;
use super::node::{Color, NodeId, Tree};

/// The first structural problem found by [`RBTreeMap::validate`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("the sentinel node is not black")]
    SentinelNotBlack,
    #[error("the root node is not black")]
    RootNotBlack,
    #[error("the root node has a parent")]
    RootHasParent,
    #[error("a child does not point back at its parent")]
    BrokenParentLink,
    #[error("a node is reachable from the root along more than one path")]
    NodeRevisited,
    #[error("a red node has a red child")]
    RedRedEdge,
    #[error("black heights differ between siblings ({left} on the left, {right} on the right)")]
    BlackHeightMismatch { left: usize, right: usize },
    #[error("in-order keys are not strictly ascending at position {position}")]
    OutOfOrder { position: usize },
    #[error("the map reports {len} entries but {reachable} nodes are reachable from the root")]
    SizeMismatch { len: usize, reachable: usize },
}

impl<K, V, F> RBTreeMap<K, V, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// Checks every red-black and ordering invariant of the map.
    ///
    /// This is `O(n)` and meant for tests and debugging; a map only ever built through its
    /// public API always passes.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = self.check_structure().and_then(|()| self.check_order());
        if let Err(violation) = result {
            warn!("red-black tree failed validation: {violation}");
        }
        result
    }
    
    fn check_structure(&self) -> Result<(), InvariantViolation> {
        let tree = &self.tree;
        
        if tree[NodeId::NIL].color != Color::Black {
            return Err(InvariantViolation::SentinelNotBlack)
        }
        if tree.root.is_nil() {
            return match tree.node_count() {
                0 => Ok(()),
                n => Err(InvariantViolation::SizeMismatch { len: n, reachable: 0 }),
            }
        }
        if tree[tree.root].color != Color::Black {
            return Err(InvariantViolation::RootNotBlack)
        }
        if !tree[tree.root].parent.is_nil() {
            return Err(InvariantViolation::RootHasParent)
        }
        
        let reachable = check_subtrees(tree)?;
        
        if reachable != self.entries.len() || reachable != tree.node_count() {
            return Err(InvariantViolation::SizeMismatch { len: self.entries.len(), reachable })
        }
        Ok(())
    }
    
    fn check_order(&self) -> Result<(), InvariantViolation> {
        let mut keys = self.keys();
        let Some(mut prev) = keys.next() else { return Ok(()) };
        
        for (i, key) in keys.enumerate() {
            if !(self.less)(prev, key) {
                return Err(InvariantViolation::OutOfOrder { position: i + 1 })
            }
            prev = key;
        }
        Ok(())
    }
}

/// Checks every parent/child edge below the root and returns how many nodes it reached.
///
/// The walk is a post-order over an explicit stack, so a corrupted (say, degenerate) tree cannot
/// overflow the call stack. Each node is entered at most once, which bounds the work by
/// `node_count()` even when broken links make a subtree reachable twice.
fn check_subtrees(tree: &Tree) -> Result<usize, InvariantViolation> {
    enum Step {
        Enter(NodeId),
        Leave(NodeId),
    }
    
    let contribution = |child: NodeId| usize::from(tree[child].color == Color::Black);
    let mut seen = vec![false; tree.node_count() + 1];
    let mut reachable = 0;
    let mut stack = vec![Step::Enter(tree.root)];
    // black heights of finished subtrees, not counting their own roots
    let mut heights: Vec<usize> = Vec::new();
    
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) if id.is_nil() => heights.push(0),
            Step::Enter(id) => {
                if mem::replace(&mut seen[id.index()], true) {
                    return Err(InvariantViolation::NodeRevisited)
                }
                reachable += 1;
                
                let node = tree[id];
                for child in [node.left, node.right] {
                    if child.is_nil() { continue }
                    if tree[child].parent != id {
                        return Err(InvariantViolation::BrokenParentLink)
                    }
                    if node.color == Color::Red && tree[child].color == Color::Red {
                        return Err(InvariantViolation::RedRedEdge)
                    }
                }
                
                stack.push(Step::Leave(id));
                stack.push(Step::Enter(node.right));
                stack.push(Step::Enter(node.left));
            }
            Step::Leave(id) => {
                let node = tree[id];
                // the left subtree finished first, so its height sits below the right one
                debug_assert!(heights.len() >= 2);
                let right = heights.pop().unwrap_or_default() + contribution(node.right);
                let left = heights.pop().unwrap_or_default() + contribution(node.left);
                
                if left != right {
                    return Err(InvariantViolation::BlackHeightMismatch { left, right })
                }
                heights.push(left);
            }
        }
    }
    
    Ok(reachable)
}
