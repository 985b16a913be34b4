use std::mem;
use tree::Tree;

/// A struct representing an internal node of a sequence treap.
///
/// Aside from the payload and its randomized priority, a node caches the size,
/// height, and minimum value of the subtree rooted at it. The `reversed` flag
/// marks a reversal of the whole subtree that has not been applied yet.
pub struct SequenceNode<T: Ord + Clone> {
    pub value: T,
    pub priority: u32,
    pub min: T,
    pub reversed: bool,
    pub size: usize,
    pub height: usize,
    pub left: Tree<T>,
    pub right: Tree<T>,
}

impl<T: Ord + Clone> SequenceNode<T> {
    pub fn new(value: T, priority: u32) -> Self {
        let min = value.clone();
        SequenceNode {
            value,
            priority,
            min,
            reversed: false,
            size: 1,
            height: 0,
            left: None,
            right: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Applies a pending reversal: the children swap places and each one
    /// inherits a toggled flag of its own. Must be called before the children
    /// of this node are inspected.
    pub fn propagate(&mut self) {
        if self.reversed {
            if let Some(ref mut left_node) = self.left {
                left_node.reversed ^= true;
            }
            if let Some(ref mut right_node) = self.right {
                right_node.reversed ^= true;
            }
            mem::swap(&mut self.left, &mut self.right);
            self.reversed = false;
            self.update();
        }
    }

    /// Recomputes the cached aggregates from the children, whose own caches
    /// must be current. The minimum restarts from `value`, so a child detached
    /// since the last call cannot leave a stale minimum behind.
    pub fn update(&mut self) {
        let SequenceNode {
            ref value,
            ref mut min,
            ref mut size,
            ref mut height,
            ref left,
            ref right,
            ..
        } = *self;
        *size = 1;
        *height = 0;
        *min = value.clone();
        if let Some(ref left_node) = *left {
            *size += left_node.size;
            *height = left_node.height + 1;
            if left_node.min < *min {
                *min = left_node.min.clone();
            }
        }
        if let Some(ref right_node) = *right {
            *size += right_node.size;
            if right_node.height + 1 > *height {
                *height = right_node.height + 1;
            }
            if right_node.min < *min {
                *min = right_node.min.clone();
            }
        }
    }
}
