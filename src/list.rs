use rand::{Rng, SeedableRng, XorShiftRng};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use node::SequenceNode;
use tree;

/// A mutable sequence implemented by an implicit treap with lazy reversal.
///
/// A treap is a tree that satisfies both a binary search tree property and a
/// heap property. In the implicit variant there is no stored key: an element's
/// position in the sequence is determined by the size of the left subtree, so
/// the in-order traversal of the tree is the sequence itself. Priorities are
/// drawn at random when a node is created, which keeps the expected height of
/// the tree logarithmic in the number of elements regardless of the order the
/// sequence was built in.
///
/// On top of the positional structure, every node caches the minimum value of
/// its subtree, and a whole range of positions can be reversed in one
/// operation: the range is cut out with two splits, a pending flag is toggled
/// on its root, and the pieces are merged back. The flag is pushed down
/// lazily, one node at a time, as later operations walk into the range. This
/// makes appending, reversing an arbitrary range, removing the front element,
/// and locating the position of the minimum all run in expected O(log N)
/// time.
///
/// # Examples
/// ```
/// use sequence_treap::SequenceTreap;
///
/// let mut t: SequenceTreap<u32> = vec![4, 2, 1, 3].into_iter().collect();
///
/// assert_eq!(t.size(), 4);
/// assert_eq!(t.min_index(), Some(2));
///
/// t.reverse_range(0, 2);
/// assert_eq!(t.to_vec(), vec![1, 2, 4, 3]);
///
/// assert_eq!(t.pop_front(), Some(1));
/// assert_eq!(t.to_vec(), vec![2, 4, 3]);
/// ```
pub struct SequenceTreap<T: Ord + Clone> {
    tree: tree::Tree<T>,
    rng: XorShiftRng,
}

impl<T: Ord + Clone> SequenceTreap<T> {
    /// Constructs a new, empty `SequenceTreap<T>`.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let t: SequenceTreap<u32> = SequenceTreap::new();
    /// assert_eq!(t.size(), 0);
    /// ```
    pub fn new() -> Self {
        SequenceTreap {
            tree: None,
            rng: XorShiftRng::new_unseeded(),
        }
    }

    /// Constructs an empty `SequenceTreap<T>` whose priorities are drawn from
    /// a generator seeded with `seed`, so the tree shape is reproducible
    /// across runs. The seed must not be all zeroes.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let mut t = SequenceTreap::with_seed([1, 2, 3, 4]);
    /// t.push_back(1);
    /// t.push_back(2);
    /// assert_eq!(t.to_vec(), vec![1, 2]);
    /// ```
    pub fn with_seed(seed: [u32; 4]) -> Self {
        SequenceTreap {
            tree: None,
            rng: SeedableRng::from_seed(seed),
        }
    }

    /// Appends a value to the end of the sequence by merging in a fresh
    /// single-node treap.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let mut t = SequenceTreap::new();
    /// t.push_back(1);
    /// t.push_back(2);
    /// assert_eq!(t.to_vec(), vec![1, 2]);
    /// ```
    pub fn push_back(&mut self, value: T) {
        let &mut SequenceTreap { ref mut tree, ref mut rng } = self;
        let new_node = SequenceNode::new(value, rng.next_u32());
        tree::merge(tree, Some(Box::new(new_node)));
    }

    /// Reverses the closed range of positions `from..=to` in one treap
    /// operation; the reversal is applied lazily below the range's root.
    /// Both bounds are 0-based and must satisfy `from <= to < self.size()`.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let mut t: SequenceTreap<u32> = (1..5).collect();
    /// t.reverse_range(1, 3);
    /// assert_eq!(t.to_vec(), vec![1, 4, 3, 2]);
    /// ```
    pub fn reverse_range(&mut self, from: usize, to: usize) {
        assert!(from <= to && to < self.size());
        let &mut SequenceTreap { ref mut tree, .. } = self;
        tree::reverse(tree, from, to);
    }

    /// Removes the first element of the sequence and returns it, or `None` if
    /// the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let mut t: SequenceTreap<u32> = (1..3).collect();
    /// assert_eq!(t.pop_front(), Some(1));
    /// assert_eq!(t.pop_front(), Some(2));
    /// assert_eq!(t.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        let &mut SequenceTreap { ref mut tree, .. } = self;
        tree::pop_front(tree)
    }

    /// Returns the position of the smallest value in the sequence, or `None`
    /// if the sequence is empty. The walk follows the cached subtree
    /// minimums and resolves pending reversals on its way down, which is why
    /// it needs mutable access. When the smallest value occurs more than
    /// once, one of its positions is returned.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let mut t: SequenceTreap<u32> = vec![4, 2, 1, 3].into_iter().collect();
    /// assert_eq!(t.min_index(), Some(2));
    ///
    /// t.reverse_range(0, 3);
    /// assert_eq!(t.min_index(), Some(1));
    /// ```
    pub fn min_index(&mut self) -> Option<usize> {
        let &mut SequenceTreap { ref mut tree, .. } = self;
        tree::find_min(tree, 0)
    }

    /// Returns a reference to the smallest value in the sequence, or `None`
    /// if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let t: SequenceTreap<u32> = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(t.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        let &SequenceTreap { ref tree, .. } = self;
        tree.as_ref().map(|node| &node.min)
    }

    /// Returns a reference to the value at `index`, or `None` if `index` is
    /// past the end of the sequence.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let t: SequenceTreap<u32> = vec![5, 6, 7].into_iter().collect();
    /// assert_eq!(t.get(1), Some(&6));
    /// assert_eq!(t.get(3), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        let &SequenceTreap { ref tree, .. } = self;
        tree::get(tree, index)
    }

    /// Returns the number of elements in the sequence.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let t: SequenceTreap<u32> = (0..10).collect();
    /// assert_eq!(t.size(), 10);
    /// ```
    pub fn size(&self) -> usize {
        let &SequenceTreap { ref tree, .. } = self;
        tree::size(tree)
    }

    /// Returns `true` if the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the height of the underlying tree as a root-to-leaf edge
    /// count; an empty or single-element treap has height 0.
    pub fn height(&self) -> usize {
        let &SequenceTreap { ref tree, .. } = self;
        tree::height(tree)
    }

    /// Copies the sequence into a `Vec` in logical order.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let mut t: SequenceTreap<u32> = (1..6).collect();
    /// t.reverse_range(0, 4);
    /// assert_eq!(t.to_vec(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Returns an iterator that yields the elements in logical order. Pending
    /// reversals are resolved on the fly by walking the children in flipped
    /// order underneath them, so iteration does not modify the tree.
    ///
    /// # Examples
    /// ```
    /// use sequence_treap::SequenceTreap;
    ///
    /// let t: SequenceTreap<u32> = vec![1, 2, 3].into_iter().collect();
    ///
    /// let mut iterator = t.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SequenceTreapIter<T> {
        let &SequenceTreap { ref tree, .. } = self;
        SequenceTreapIter {
            current: tree,
            reversed: false,
            stack: Vec::new(),
        }
    }
}

impl<T: Ord + Clone> IntoIterator for SequenceTreap<T> {
    type Item = T;
    type IntoIter = SequenceTreapIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let SequenceTreap { tree, .. } = self;
        SequenceTreapIntoIter {
            current: tree,
            reversed: false,
            stack: Vec::new(),
        }
    }
}

impl<'a, T: 'a + Ord + Clone> IntoIterator for &'a SequenceTreap<T> {
    type Item = &'a T;
    type IntoIter = SequenceTreapIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord + Clone> FromIterator<T> for SequenceTreap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SequenceTreap::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl<T: Ord + Clone> Default for SequenceTreap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An owning iterator for `SequenceTreap<T>`.
///
/// This iterator traverses the elements of the treap in-order. Each stack
/// entry remembers the reversal flag accumulated on the way down, so subtrees
/// with a pending reversal are walked in flipped order.
pub struct SequenceTreapIntoIter<T: Ord + Clone> {
    current: tree::Tree<T>,
    reversed: bool,
    stack: Vec<(SequenceNode<T>, bool)>,
}

impl<T: Ord + Clone> Iterator for SequenceTreapIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            let flipped = self.reversed ^ node.reversed;
            self.current = if flipped {
                node.right.take()
            } else {
                node.left.take()
            };
            self.reversed = flipped;
            self.stack.push((*node, flipped));
        }
        self.stack.pop().map(|(node, flipped)| {
            let SequenceNode { value, left, right, .. } = node;
            self.current = if flipped { left } else { right };
            self.reversed = flipped;
            value
        })
    }
}

/// An iterator for `SequenceTreap<T>`.
///
/// This iterator traverses the elements of the treap in-order and yields
/// immutable references, resolving pending reversal flags as it descends.
pub struct SequenceTreapIter<'a, T: 'a + Ord + Clone> {
    current: &'a tree::Tree<T>,
    reversed: bool,
    stack: Vec<(&'a SequenceNode<T>, bool)>,
}

impl<'a, T: 'a + Ord + Clone> Iterator for SequenceTreapIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ref node) = *self.current {
            let flipped = self.reversed ^ node.reversed;
            self.current = if flipped { &node.right } else { &node.left };
            self.reversed = flipped;
            self.stack.push((&**node, flipped));
        }
        self.stack.pop().map(|(node, flipped)| {
            self.current = if flipped { &node.left } else { &node.right };
            self.reversed = flipped;
            &node.value
        })
    }
}

impl<T: Ord + Clone + Serialize> Serialize for SequenceTreap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.size()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T: Ord + Clone + Deserialize<'de>> Deserialize<'de> for SequenceTreap<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SeqVisitor<T> {
            marker: PhantomData<T>,
        }

        impl<'de, T: Ord + Clone + Deserialize<'de>> Visitor<'de> for SeqVisitor<T> {
            type Value = SequenceTreap<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut list = SequenceTreap::new();
                while let Some(value) = seq.next_element()? {
                    list.push_back(value);
                }
                Ok(list)
            }
        }

        deserializer.deserialize_seq(SeqVisitor { marker: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceTreap;

    #[test]
    fn test_empty() {
        let mut list: SequenceTreap<u32> = SequenceTreap::new();
        assert_eq!(list.size(), 0);
        assert!(list.is_empty());
        assert_eq!(list.min_index(), None);
        assert_eq!(list.min(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.to_vec(), Vec::new());
    }

    #[test]
    fn test_push_back_keeps_order() {
        let mut list = SequenceTreap::new();
        for value in 0..100 {
            list.push_back(value);
        }
        assert_eq!(list.size(), 100);
        assert_eq!(list.to_vec(), (0..100).collect::<Vec<i32>>());
    }

    #[test]
    fn test_reverse_range() {
        let mut list: SequenceTreap<u32> = (0..8).collect();

        list.reverse_range(2, 5);
        assert_eq!(list.to_vec(), vec![0, 1, 5, 4, 3, 2, 6, 7]);

        list.reverse_range(0, 7);
        assert_eq!(list.to_vec(), vec![7, 6, 2, 3, 4, 5, 1, 0]);
    }

    #[test]
    fn test_reverse_range_single_position() {
        let mut list: SequenceTreap<u32> = (0..4).collect();
        list.reverse_range(2, 2);
        assert_eq!(list.to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reverse_range_twice_restores() {
        let mut list: SequenceTreap<u32> = (0..16).collect();
        list.reverse_range(3, 12);
        list.reverse_range(3, 12);
        assert_eq!(list.to_vec(), (0..16).collect::<Vec<u32>>());
    }

    #[test]
    #[should_panic]
    fn test_reverse_range_out_of_bounds() {
        let mut list: SequenceTreap<u32> = (0..4).collect();
        list.reverse_range(1, 4);
    }

    #[test]
    fn test_min_index_after_reversals() {
        let mut list: SequenceTreap<i32> = vec![4, 2, 1, 3].into_iter().collect();
        assert_eq!(list.min_index(), Some(2));
        assert_eq!(list.min(), Some(&1));

        list.reverse_range(0, 2);
        assert_eq!(list.to_vec(), vec![1, 2, 4, 3]);
        assert_eq!(list.min_index(), Some(0));

        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.min_index(), Some(0));
        assert_eq!(list.min(), Some(&2));
    }

    #[test]
    fn test_get_tracks_pending_reversals() {
        let mut list: SequenceTreap<u32> = (0..10).collect();
        list.reverse_range(0, 9);
        list.reverse_range(2, 6);

        let expected = list.to_vec();
        for (index, value) in expected.iter().enumerate() {
            assert_eq!(list.get(index), Some(value));
        }
        assert_eq!(list.get(10), None);
    }

    #[test]
    fn test_iterators_agree() {
        let mut list: SequenceTreap<u32> = (0..32).collect();
        list.reverse_range(8, 24);

        let expected = list.to_vec();
        assert_eq!(list.iter().cloned().collect::<Vec<u32>>(), expected);
        assert_eq!(list.into_iter().collect::<Vec<u32>>(), expected);
    }

    #[test]
    fn test_seeded_shape_is_reproducible() {
        let mut first = SequenceTreap::with_seed([5, 6, 7, 8]);
        let mut second = SequenceTreap::with_seed([5, 6, 7, 8]);
        for value in 0..1000 {
            first.push_back(value);
            second.push_back(value);
        }
        assert_eq!(first.height(), second.height());
        assert_eq!(first.to_vec(), second.to_vec());
    }

    #[test]
    fn test_height_stays_logarithmic() {
        let mut list = SequenceTreap::with_seed([9, 8, 7, 6]);
        for value in 0..1024 {
            list.push_back(value);
        }
        // Expected height is around 2 * log2(1024) = 20; anything close to
        // the element count would mean the priorities are not doing their job.
        assert!(list.height() < 100);
    }
}
