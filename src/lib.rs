//! A mutable sequence backed by an implicit treap: positions, not stored
//! keys, order the tree, so concatenation, splitting, reversing a range of
//! positions, and locating the minimum all run in expected logarithmic time.
//! Range reversals are recorded as lazy flags and pushed down one node at a
//! time as later operations pass by.

extern crate rand;
extern crate serde;

mod node;
mod tree;
mod list;
pub mod sort;

pub use list::{SequenceTreap, SequenceTreapIntoIter, SequenceTreapIter};
