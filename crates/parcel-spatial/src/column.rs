//! Column keys.

use parcel_core::{BlockBox, BlockPos};

/// Identifier of a vertical world column. With the default shift of 4 this
/// is a chunk column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    pub x: i32,
    pub z: i32,
}

impl ColumnKey {
    /// Create a column key.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column containing `pos`.
    #[must_use]
    pub const fn of(pos: BlockPos, shift: u8) -> Self {
        let (x, z) = pos.column(shift);
        Self { x, z }
    }

    /// Every column a box touches, row by row.
    pub fn covering(bounds: &BlockBox, shift: u8) -> impl Iterator<Item = Self> + use<> {
        let ((x0, z0), (x1, z1)) = bounds.column_span(shift);
        (z0..=z1).flat_map(move |z| (x0..=x1).map(move |x| Self { x, z }))
    }
}
