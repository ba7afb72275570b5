//! An implementation of an immutable k-d tree over flat, kd-sorted arrays.
//!
//! The tree is implicit: [`KdTreeBuilder`] sorts the coordinate and id
//! arrays in place so that the middle item of any range splits that range on
//! the axis for its depth, with the axis rotating each level. Ranges of at
//! most `node_size` items are left as leaf buckets and scanned linearly by
//! queries.

#![warn(missing_docs)]

mod builder;
mod index;
mod search;

pub use builder::{KdTreeBuilder, DEFAULT_NODE_SIZE, DEFAULT_NUM_DIMS};
pub use index::KdTree;
pub use search::Nearest;

pub(crate) use search::sq_dist;
