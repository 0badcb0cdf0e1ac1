//! Column-bucket spatial index.
//!
//! Divides the world into vertical columns keyed by `(x >> shift, z >> shift)`
//! so a point query only looks at regions that touch the point's column.
//! Query results are identical to a brute-force scan over every region.

pub mod column;
pub mod index;

pub use column::ColumnKey;
pub use index::ColumnIndex;
