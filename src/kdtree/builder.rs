use std::cmp;

use crate::kdtree::KdTree;
use crate::r#type::IndexableNum;

/// Number of items at or below which a range is left as a leaf bucket and
/// scanned linearly by queries.
pub const DEFAULT_NODE_SIZE: usize = 64;

/// Dimensionality used by [`KdTreeBuilder::new`]; points are 2-D in the
/// primary use case.
pub const DEFAULT_NUM_DIMS: usize = 2;

/// A builder to create a [`KdTree`].
///
/// Points are appended with [`add`][Self::add] and kd-sorted once by
/// [`finish`][Self::finish]. The builder assumes pre-validated points: every
/// added point must have exactly the dimensionality the builder was created
/// with (see [`validate_points`][crate::validate::validate_points] for the
/// caller-facing check).
pub struct KdTreeBuilder<N: IndexableNum> {
    coords: Vec<N>,
    ids: Vec<u32>,

    num_items: usize,
    num_dims: usize,
    node_size: usize,

    pos: usize,
}

impl<N: IndexableNum> KdTreeBuilder<N> {
    /// Create a new builder for 2-D points with the default node size.
    pub fn new(num_items: usize) -> Self {
        Self::new_with_node_size(num_items, DEFAULT_NODE_SIZE)
    }

    /// Create a new builder for 2-D points with the provided node size.
    pub fn new_with_node_size(num_items: usize, node_size: usize) -> Self {
        Self::new_with_dims(num_items, DEFAULT_NUM_DIMS, node_size)
    }

    /// Create a new builder for `num_dims`-dimensional points with the
    /// provided node size.
    pub fn new_with_dims(num_items: usize, num_dims: usize, node_size: usize) -> Self {
        assert!((2..=65535).contains(&node_size));
        assert!(num_dims >= 1);
        assert!(num_items <= u32::MAX as usize);

        Self {
            coords: vec![N::zero(); num_items * num_dims],
            ids: vec![0; num_items],
            num_items,
            num_dims,
            node_size,
            pos: 0,
        }
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, point: &[N]) -> usize {
        assert_eq!(
            point.len(),
            self.num_dims,
            "Point has {} coordinates when expected {}.",
            point.len(),
            self.num_dims
        );

        let index = self.pos / self.num_dims;
        self.ids[index] = index as u32;
        for &coord in point {
            self.coords[self.pos] = coord;
            self.pos += 1;
        }

        index
    }

    /// Consume this builder, performing the k-d sort and returning a
    /// [`KdTree`] ready for queries.
    pub fn finish(mut self) -> KdTree<N> {
        assert_eq!(
            self.pos / self.num_dims,
            self.num_items,
            "Added {} items when expected {}.",
            self.pos / self.num_dims,
            self.num_items
        );

        // kd-sort both arrays for efficient search
        if self.num_items > 0 {
            sort(
                &mut self.ids,
                &mut self.coords,
                self.num_dims,
                self.node_size,
                0,
                self.num_items - 1,
                0,
            );
        }

        KdTree {
            coords: self.coords,
            ids: self.ids,
            num_items: self.num_items,
            num_dims: self.num_dims,
            node_size: self.node_size,
        }
    }
}

fn sort<N: IndexableNum>(
    ids: &mut [u32],
    coords: &mut [N],
    num_dims: usize,
    node_size: usize,
    left: usize,
    right: usize,
    axis: usize,
) {
    if right - left <= node_size {
        return;
    }

    // middle index
    let m = (left + right) >> 1;

    // sort ids and coords around the middle index so that the halves lie
    // on either side of the splitting value (axes taking turns by depth)
    select(ids, coords, num_dims, m, left, right, axis);

    // recursively kd-sort first half and second half on the next axis
    let next_axis = (axis + 1) % num_dims;
    sort(ids, coords, num_dims, node_size, left, m - 1, next_axis);
    sort(ids, coords, num_dims, node_size, m + 1, right, next_axis);
}

/// Custom Floyd-Rivest selection algorithm: sort ids and coords so that
/// [left..k-1] items are smaller than the k-th item (on the given axis)
#[inline]
fn select<N: IndexableNum>(
    ids: &mut [u32],
    coords: &mut [N],
    num_dims: usize,
    k: usize,
    mut left: usize,
    mut right: usize,
    axis: usize,
) {
    while right > left {
        if right - left > 600 {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = f64::ln(n);
            let s = 0.5 * f64::exp((2.0 * z) / 3.0);
            let sd = 0.5
                * f64::sqrt((z * s * (n - s)) / n)
                * (if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 });
            let new_left = cmp::max(left, f64::floor(k as f64 - (m * s) / n + sd) as usize);
            let new_right = cmp::min(
                right,
                f64::floor(k as f64 + ((n - m) * s) / n + sd) as usize,
            );
            select(ids, coords, num_dims, k, new_left, new_right, axis);
        }

        let t = coords[num_dims * k + axis];
        let mut i = left;
        let mut j = right;

        swap_item(ids, coords, num_dims, left, k);
        if coords[num_dims * right + axis] > t {
            swap_item(ids, coords, num_dims, left, right);
        }

        while i < j {
            swap_item(ids, coords, num_dims, i, j);
            i += 1;
            j -= 1;
            while coords[num_dims * i + axis] < t {
                i += 1;
            }
            while coords[num_dims * j + axis] > t {
                j -= 1;
            }
        }

        if coords[num_dims * left + axis] == t {
            swap_item(ids, coords, num_dims, left, j);
        } else {
            j += 1;
            swap_item(ids, coords, num_dims, j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

#[inline]
fn swap_item<N: IndexableNum>(
    ids: &mut [u32],
    coords: &mut [N],
    num_dims: usize,
    i: usize,
    j: usize,
) {
    ids.swap(i, j);
    for axis in 0..num_dims {
        coords.swap(num_dims * i + axis, num_dims * j + axis);
    }
}
