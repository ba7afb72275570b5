use std::str::FromStr;

use crate::error::{PointIndexError, Result};
use crate::kdtree::{KdTree, KdTreeBuilder, Nearest, DEFAULT_NODE_SIZE, DEFAULT_NUM_DIMS};
use crate::r#type::IndexableNum;
use crate::validate::{validate_points, validate_query};

/// The index structure backing a [`NearestNeighborIndex`].
///
/// Selected once at construction; queries never re-inspect a method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    /// Balanced k-d partition with pruned depth-first search.
    KdTree,
}

impl FromStr for IndexMethod {
    type Err = PointIndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kdtree" => Ok(IndexMethod::KdTree),
            other => Err(PointIndexError::InvalidInput(format!(
                "Unknown index method \"{}\".",
                other
            ))),
        }
    }
}

/// A validated, immutable nearest-neighbor index over a point set.
///
/// Build once from the full point collection, then issue any number of
/// independent searches. The index never changes after construction and
/// holds no interior mutability, so concurrent searches need no
/// coordination.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestNeighborIndex<N: IndexableNum> {
    variant: IndexVariant<N>,
}

/// One implementation per index method.
#[derive(Debug, Clone, PartialEq)]
enum IndexVariant<N: IndexableNum> {
    KdTree(KdTree<N>),
}

impl<N: IndexableNum> NearestNeighborIndex<N> {
    /// Build an index over `points` with the default method.
    ///
    /// The collection is validated first: every point must have the same
    /// nonzero number of finite coordinates. An empty collection builds a
    /// valid empty index whose searches fail with
    /// [`EmptyIndex`][PointIndexError::EmptyIndex].
    pub fn build_index(points: &[impl AsRef<[N]>]) -> Result<Self> {
        Self::build_index_with_method(points, IndexMethod::KdTree)
    }

    /// Build an index over `points` with an explicit method.
    pub fn build_index_with_method(
        points: &[impl AsRef<[N]>],
        method: IndexMethod,
    ) -> Result<Self> {
        let num_dims = validate_points(points)?.unwrap_or(DEFAULT_NUM_DIMS);

        match method {
            IndexMethod::KdTree => {
                let mut builder =
                    KdTreeBuilder::new_with_dims(points.len(), num_dims, DEFAULT_NODE_SIZE);
                for point in points {
                    builder.add(point.as_ref());
                }
                Ok(Self {
                    variant: IndexVariant::KdTree(builder.finish()),
                })
            }
        }
    }

    /// The method backing this index.
    pub fn method(&self) -> IndexMethod {
        match &self.variant {
            IndexVariant::KdTree(_) => IndexMethod::KdTree,
        }
    }

    /// The number of indexed points.
    pub fn len(&self) -> usize {
        match &self.variant {
            IndexVariant::KdTree(tree) => tree.num_items(),
        }
    }

    /// Whether the index contains no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The dimensionality of the indexed points.
    pub fn num_dims(&self) -> usize {
        match &self.variant {
            IndexVariant::KdTree(tree) => tree.num_dims(),
        }
    }

    /// Search for the indexed point nearest to `query`, returning its
    /// coordinates.
    pub fn search_index(&self, query: &[N]) -> Result<&[N]> {
        Ok(self.nearest(query)?.point)
    }

    /// Search for the indexed point nearest to `query`, returning the full
    /// match record (insertion index, coordinates, squared distance).
    pub fn nearest(&self, query: &[N]) -> Result<Nearest<'_, N>> {
        match &self.variant {
            IndexVariant::KdTree(tree) => {
                if tree.num_items() == 0 {
                    return Err(PointIndexError::EmptyIndex);
                }
                validate_query(query, tree.num_dims())?;
                tree.nearest(query)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{IndexMethod, NearestNeighborIndex};
    use crate::PointIndexError;

    fn test_points() -> Vec<[f64; 2]> {
        vec![
            [1., 2.],
            [1., 0.],
            [10., 5.],
            [-1000., 20.],
            [3.14159, 42.],
            [42., 3.14159],
        ]
    }

    #[test]
    fn finds_nearest_points() {
        let index = NearestNeighborIndex::build_index(&test_points()).unwrap();

        assert_eq!(index.search_index(&[0., 0.]).unwrap(), &[1., 0.]);
        assert_eq!(index.search_index(&[-2000., 0.]).unwrap(), &[-1000., 20.]);
        assert_eq!(index.search_index(&[40., 3.]).unwrap(), &[42., 3.14159]);
    }

    #[test]
    fn nearest_reports_index_and_distance() {
        let index = NearestNeighborIndex::build_index(&test_points()).unwrap();

        let nearest = index.nearest(&[0., 0.]).unwrap();
        assert_eq!(nearest.index, 1);
        assert_eq!(nearest.point, &[1., 0.]);
        assert_eq!(nearest.sq_dist, 1.);
    }

    #[test]
    fn parses_method_names() {
        assert_eq!("kdtree".parse::<IndexMethod>().unwrap(), IndexMethod::KdTree);

        for unknown in ["hash", "grid", "rtree", ""] {
            assert!(matches!(
                unknown.parse::<IndexMethod>(),
                Err(PointIndexError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn reports_method_and_size() {
        let index = NearestNeighborIndex::build_index(&test_points()).unwrap();
        assert_eq!(index.method(), IndexMethod::KdTree);
        assert_eq!(index.len(), 6);
        assert_eq!(index.num_dims(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn empty_index_builds_but_cannot_be_searched() {
        let points: Vec<[f64; 2]> = vec![];
        let index = NearestNeighborIndex::build_index(&points).unwrap();

        assert!(index.is_empty());
        assert!(matches!(
            index.search_index(&[0., 0.]),
            Err(PointIndexError::EmptyIndex)
        ));
    }

    #[test]
    fn rejects_malformed_collections() {
        let ragged: Vec<Vec<f64>> = vec![vec![1., 2.], vec![3.]];
        assert!(matches!(
            NearestNeighborIndex::build_index(&ragged),
            Err(PointIndexError::InvalidInput(_))
        ));

        let non_finite: Vec<[f64; 2]> = vec![[1., f64::NAN]];
        assert!(matches!(
            NearestNeighborIndex::build_index(&non_finite),
            Err(PointIndexError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_malformed_queries() {
        let index = NearestNeighborIndex::build_index(&test_points()).unwrap();

        assert!(matches!(
            index.search_index(&[0., 0., 0.]),
            Err(PointIndexError::InvalidInput(_))
        ));
        assert!(matches!(
            index.search_index(&[f64::NAN, 0.]),
            Err(PointIndexError::InvalidInput(_))
        ));
    }

    #[test]
    fn works_with_f32_coordinates() {
        let points: Vec<[f32; 2]> = vec![[1., 2.], [1., 0.], [10., 5.]];
        let index = NearestNeighborIndex::build_index(&points).unwrap();
        assert_eq!(index.search_index(&[0., 0.]).unwrap(), &[1., 0.]);
    }
}
