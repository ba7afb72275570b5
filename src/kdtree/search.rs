use geo_traits::CoordTrait;
use tinyvec::TinyVec;

use crate::error::{PointIndexError, Result};
use crate::kdtree::KdTree;
use crate::r#type::IndexableNum;

/// The result of a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a, N: IndexableNum> {
    /// Insertion index of the matched point.
    pub index: u32,
    /// Coordinates of the matched point.
    pub point: &'a [N],
    /// Squared Euclidean distance between the query and the matched point.
    pub sq_dist: N,
}

/// Best candidate found so far during a nearest-neighbor descent.
#[derive(Clone, Copy)]
struct Candidate<N: IndexableNum> {
    slot: usize,
    sq_dist: N,
}

impl<N: IndexableNum> KdTree<N> {
    /// Search the index for the point nearest to `query`.
    ///
    /// Descends the partition depth-first, exploring the half on the query's
    /// side of the splitting value first, and visits the other half only
    /// while its splitting-axis distance could still beat the best candidate
    /// found so far. Ranks by squared Euclidean distance; when several
    /// points are equidistant, whichever the traversal reaches first wins.
    ///
    /// Errors with [`EmptyIndex`][PointIndexError::EmptyIndex] if the index
    /// has no points, and [`InvalidInput`][PointIndexError::InvalidInput] if
    /// the query dimensionality disagrees with the indexed points.
    pub fn nearest(&self, query: &[N]) -> Result<Nearest<'_, N>> {
        if self.num_items == 0 {
            return Err(PointIndexError::EmptyIndex);
        }
        if query.len() != self.num_dims {
            return Err(PointIndexError::InvalidInput(format!(
                "Query has {} coordinates when expected {}.",
                query.len(),
                self.num_dims
            )));
        }

        let mut best: Option<Candidate<N>> = None;
        self.nearest_in(query, 0, self.num_items - 1, 0, &mut best);

        let best = best.expect("a non-empty index always yields a candidate");
        Ok(Nearest {
            index: self.ids[best.slot],
            point: self.point(best.slot),
            sq_dist: best.sq_dist,
        })
    }

    /// Search the index for the point nearest to a 2-D coordinate.
    ///
    /// Convenience over [`nearest`][Self::nearest] for coordinate types
    /// implementing [`CoordTrait`].
    pub fn nearest_coord(&self, coord: &impl CoordTrait<T = N>) -> Result<Nearest<'_, N>> {
        self.nearest(&[coord.x(), coord.y()])
    }

    fn nearest_in(
        &self,
        query: &[N],
        left: usize,
        right: usize,
        axis: usize,
        best: &mut Option<Candidate<N>>,
    ) {
        // if we reached "tree node", search linearly
        if right - left <= self.node_size {
            for slot in left..=right {
                update_best(best, slot, sq_dist(query, self.point(slot)));
            }
            return;
        }

        // otherwise visit the middle item, then its halves
        let m = (left + right) >> 1;
        update_best(best, m, sq_dist(query, self.point(m)));

        let pivot = self.coords[self.num_dims * m + axis];
        let next_axis = (axis + 1) % self.num_dims;

        // |query[axis] - pivot| is a lower bound on the distance to anything
        // in the half on the other side of the splitting value, so that half
        // can be skipped once the best candidate is closer than the bound
        let (axis_dist, query_is_left) = abs_diff(query[axis], pivot);
        let (near, far) = if query_is_left {
            ((left, m - 1), (m + 1, right))
        } else {
            ((m + 1, right), (left, m - 1))
        };

        self.nearest_in(query, near.0, near.1, next_axis, best);
        if best.map_or(true, |b| axis_dist * axis_dist < b.sq_dist) {
            self.nearest_in(query, far.0, far.1, next_axis, best);
        }
    }

    /// Search the index for items within a given radius of a query point.
    ///
    /// The radius comparison uses the squared metric (`sq_dist <= r * r`),
    /// so points exactly `r` away are included.
    ///
    /// Returns insertion indices of found items; an empty index yields an
    /// empty result.
    pub fn within(&self, query: &[N], r: N) -> Result<Vec<u32>> {
        if query.len() != self.num_dims {
            return Err(PointIndexError::InvalidInput(format!(
                "Query has {} coordinates when expected {}.",
                query.len(),
                self.num_dims
            )));
        }

        let mut result: Vec<u32> = vec![];
        if self.num_items == 0 {
            return Ok(result);
        }

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[usize; 33]> = TinyVec::new();
        stack.push(0);
        stack.push(self.num_items - 1);
        stack.push(0);

        let r2 = r * r;

        // search for items within the radius in the kd-sorted arrays
        while !stack.is_empty() {
            let axis = stack.pop().unwrap_or(0);
            let right = stack.pop().unwrap_or(0);
            let left = stack.pop().unwrap_or(0);

            // if we reached "tree node", search linearly
            if right - left <= self.node_size {
                for slot in left..=right {
                    if sq_dist(query, self.point(slot)) <= r2 {
                        result.push(self.ids[slot]);
                    }
                }
                continue;
            }

            // otherwise find the middle index
            let m = (left + right) >> 1;

            // include the middle item if it's in range
            if sq_dist(query, self.point(m)) <= r2 {
                result.push(self.ids[m]);
            }

            let pivot = self.coords[self.num_dims * m + axis];
            let next_axis = (axis + 1) % self.num_dims;
            let (axis_dist, query_is_left) = abs_diff(query[axis], pivot);

            // queue search in halves the query ball reaches
            if query_is_left || axis_dist <= r {
                stack.push(left);
                stack.push(m - 1);
                stack.push(next_axis);
            }
            if !query_is_left || axis_dist <= r {
                stack.push(m + 1);
                stack.push(right);
                stack.push(next_axis);
            }
        }

        Ok(result)
    }

    /// Search the index for items within a given radius of a 2-D coordinate.
    pub fn within_coord(&self, coord: &impl CoordTrait<T = N>, r: N) -> Result<Vec<u32>> {
        self.within(&[coord.x(), coord.y()], r)
    }

    /// Search the index for items inside an axis-aligned bounding box.
    ///
    /// `min` and `max` are the per-axis lower and upper corners, both
    /// inclusive. Returns insertion indices of found items.
    pub fn range(&self, min: &[N], max: &[N]) -> Result<Vec<u32>> {
        if min.len() != self.num_dims || max.len() != self.num_dims {
            return Err(PointIndexError::InvalidInput(format!(
                "Box corners have {} and {} coordinates when expected {}.",
                min.len(),
                max.len(),
                self.num_dims
            )));
        }

        let mut result: Vec<u32> = vec![];
        if self.num_items == 0 {
            return Ok(result);
        }

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[usize; 33]> = TinyVec::new();
        stack.push(0);
        stack.push(self.num_items - 1);
        stack.push(0);

        // search for items inside the box in the kd-sorted arrays
        while !stack.is_empty() {
            let axis = stack.pop().unwrap_or(0);
            let right = stack.pop().unwrap_or(0);
            let left = stack.pop().unwrap_or(0);

            // if we reached "tree node", search linearly
            if right - left <= self.node_size {
                for slot in left..=right {
                    if in_box(self.point(slot), min, max) {
                        result.push(self.ids[slot]);
                    }
                }
                continue;
            }

            // otherwise find the middle index
            let m = (left + right) >> 1;

            // include the middle item if it's in range
            if in_box(self.point(m), min, max) {
                result.push(self.ids[m]);
            }

            let pivot = self.coords[self.num_dims * m + axis];
            let next_axis = (axis + 1) % self.num_dims;

            // queue search in halves that intersect the box
            if min[axis] <= pivot {
                stack.push(left);
                stack.push(m - 1);
                stack.push(next_axis);
            }
            if max[axis] >= pivot {
                stack.push(m + 1);
                stack.push(right);
                stack.push(next_axis);
            }
        }

        Ok(result)
    }
}

#[inline]
fn update_best<N: IndexableNum>(best: &mut Option<Candidate<N>>, slot: usize, sq_dist: N) {
    if best.map_or(true, |b| sq_dist < b.sq_dist) {
        *best = Some(Candidate { slot, sq_dist });
    }
}

/// Squared Euclidean distance between two points of equal dimensionality.
///
/// All ranking in this crate uses this metric; the square root is never
/// taken, which preserves nearest-neighbor order at lower cost.
#[inline]
pub(crate) fn sq_dist<N: IndexableNum>(a: &[N], b: &[N]) -> N {
    debug_assert_eq!(a.len(), b.len());

    let mut acc = N::zero();
    for (&av, &bv) in a.iter().zip(b.iter()) {
        let (d, _) = abs_diff(av, bv);
        acc = acc + d * d;
    }
    acc
}

/// Absolute difference of two coordinates, without a signed subtraction so
/// unsigned coordinate types cannot underflow. The flag reports whether `a`
/// sorts at or below `b`.
#[inline]
fn abs_diff<N: IndexableNum>(a: N, b: N) -> (N, bool) {
    if a <= b {
        (b - a, true)
    } else {
        (a - b, false)
    }
}

/// Whether every coordinate of `point` lies inside the closed box.
#[inline]
fn in_box<N: IndexableNum>(point: &[N], min: &[N], max: &[N]) -> bool {
    point
        .iter()
        .zip(min.iter().zip(max.iter()))
        .all(|(&c, (&lo, &hi))| c >= lo && c <= hi)
}
