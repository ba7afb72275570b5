#![doc = include_str!("../README.md")]

mod error;
mod index;
pub mod kdtree;
pub mod naive;
mod r#type;
pub mod validate;

pub use error::{PointIndexError, Result};
pub use index::{IndexMethod, NearestNeighborIndex};
pub use r#type::IndexableNum;
