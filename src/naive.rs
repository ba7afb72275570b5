//! Exhaustive linear-scan nearest neighbor.
//!
//! The correctness baseline for the tree index: a plain scan over every
//! candidate point, keeping the minimum squared distance. The index never
//! calls into this; tests and benchmarks use it as the reference answer.

use crate::error::{PointIndexError, Result};
use crate::kdtree::sq_dist;
use crate::r#type::IndexableNum;

/// Return the point in `haystack` closest to `query` by exhaustive scan.
///
/// Distances are squared Euclidean, matching the tree index, so both paths
/// rank candidates identically. Ties resolve to the earliest point in the
/// collection.
///
/// Errors with [`EmptyIndex`][PointIndexError::EmptyIndex] on an empty
/// haystack and [`InvalidInput`][PointIndexError::InvalidInput] on a
/// dimensionality mismatch.
pub fn find_nearest<'a, N: IndexableNum>(
    query: &[N],
    haystack: &'a [impl AsRef<[N]>],
) -> Result<&'a [N]> {
    if haystack.is_empty() {
        return Err(PointIndexError::EmptyIndex);
    }

    let mut min_dist: Option<N> = None;
    let mut min_point: Option<&[N]> = None;

    for point in haystack {
        let point = point.as_ref();
        if point.len() != query.len() {
            return Err(PointIndexError::InvalidInput(format!(
                "Point has {} coordinates when expected {}.",
                point.len(),
                query.len()
            )));
        }

        let dist = sq_dist(query, point);
        if min_dist.map_or(true, |min| dist < min) {
            min_dist = Some(dist);
            min_point = Some(point);
        }
    }

    Ok(min_point.expect("non-empty haystack always yields a minimum"))
}

#[cfg(test)]
mod test {
    use super::find_nearest;
    use crate::PointIndexError;

    #[test]
    fn scans_to_the_minimum() {
        let points: Vec<[f64; 2]> = vec![[1., 2.], [1., 0.], [10., 5.], [-1000., 20.]];
        assert_eq!(find_nearest(&[0., 0.], &points).unwrap(), &[1., 0.]);
        assert_eq!(find_nearest(&[-2000., 0.], &points).unwrap(), &[-1000., 20.]);
    }

    #[test]
    fn ties_resolve_to_the_earliest_point() {
        let points: Vec<[f64; 2]> = vec![[1., 0.], [-1., 0.]];
        assert_eq!(find_nearest(&[0., 0.], &points).unwrap(), &[1., 0.]);
    }

    #[test]
    fn empty_haystack_is_an_error() {
        let points: Vec<[f64; 2]> = vec![];
        assert!(matches!(
            find_nearest(&[0., 0.], &points),
            Err(PointIndexError::EmptyIndex)
        ));
    }

    #[test]
    fn mismatched_dimensionality_is_an_error() {
        let points: Vec<[f64; 2]> = vec![[1., 2.]];
        assert!(matches!(
            find_nearest(&[0., 0., 0.], &points),
            Err(PointIndexError::InvalidInput(_))
        ));
    }
}
