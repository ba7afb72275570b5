//! Validation of caller-supplied point collections.
//!
//! The index core assumes dimensionally-consistent, finite coordinates.
//! These functions are the single boundary where that contract is checked;
//! they return a typed result instead of panicking, so malformed data
//! surfaces to the caller before any index work happens.

use crate::error::{PointIndexError, Result};
use crate::r#type::IndexableNum;

/// Validate a candidate point collection before it is indexed.
///
/// Every point must be a non-empty, fixed-length run of finite numeric
/// coordinates, with the same dimensionality across the whole collection.
/// Returns that shared dimensionality, or `None` for an empty collection
/// (an empty collection is a valid way to build an empty index).
pub fn validate_points<N: IndexableNum>(points: &[impl AsRef<[N]>]) -> Result<Option<usize>> {
    let Some(first) = points.first() else {
        return Ok(None);
    };

    let num_dims = first.as_ref().len();
    if num_dims == 0 {
        return Err(PointIndexError::InvalidInput(
            "Points must have at least one coordinate.".to_string(),
        ));
    }

    for (item, point) in points.iter().enumerate() {
        let point = point.as_ref();
        if point.len() != num_dims {
            return Err(PointIndexError::InvalidInput(format!(
                "Point {} has {} coordinates when expected {}.",
                item,
                point.len(),
                num_dims
            )));
        }
        if let Some(axis) = first_non_finite(point) {
            return Err(PointIndexError::InvalidInput(format!(
                "Point {} has a non-finite coordinate on axis {}.",
                item, axis
            )));
        }
    }

    Ok(Some(num_dims))
}

/// Validate a single query point against the dimensionality of an index.
pub fn validate_query<N: IndexableNum>(query: &[N], num_dims: usize) -> Result<()> {
    if query.len() != num_dims {
        return Err(PointIndexError::InvalidInput(format!(
            "Query has {} coordinates when expected {}.",
            query.len(),
            num_dims
        )));
    }
    if let Some(axis) = first_non_finite(query) {
        return Err(PointIndexError::InvalidInput(format!(
            "Query has a non-finite coordinate on axis {}.",
            axis
        )));
    }
    Ok(())
}

/// The axis of the first coordinate that is NaN or infinite, if any.
/// Integer coordinates are always finite.
fn first_non_finite<N: IndexableNum>(point: &[N]) -> Option<usize> {
    point
        .iter()
        .position(|c| !c.to_f64().is_some_and(f64::is_finite))
}
