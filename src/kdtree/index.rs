use crate::r#type::IndexableNum;

/// An immutable index over a set of k-dimensional points.
///
/// Usually created via [`KdTreeBuilder`][crate::kdtree::KdTreeBuilder]. The
/// coordinate and id arrays are kd-sorted: the middle item of any range
/// splits that range on the axis for its depth, and ranges of at most
/// `node_size` items are leaf buckets in arbitrary order. Once built the
/// index never changes, so concurrent queries need no synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree<N: IndexableNum> {
    pub(crate) coords: Vec<N>,
    pub(crate) ids: Vec<u32>,
    pub(crate) num_items: usize,
    pub(crate) num_dims: usize,
    pub(crate) node_size: usize,
}

impl<N: IndexableNum> KdTree<N> {
    /// The number of indexed points.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The dimensionality of the indexed points.
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    /// The leaf bucket size of this tree.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// The kd-sorted coordinate array, `num_dims` values per point.
    pub fn coords(&self) -> &[N] {
        &self.coords
    }

    /// The kd-sorted insertion indices of the points.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Coordinates of the point stored in the given kd-sorted slot.
    #[inline]
    pub(crate) fn point(&self, slot: usize) -> &[N] {
        &self.coords[self.num_dims * slot..self.num_dims * (slot + 1)]
    }
}
