//! Block coordinates and axis-aligned boxes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An integer block position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Create a new position
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub const fn delta(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Translate by `(dx, dy, dz)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Mirror through the origin.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Column coordinates `(cx, cz)` for a column width of `1 << shift` blocks.
    ///
    /// Arithmetic shift rounds toward negative infinity, so `-1` lands in
    /// column `-1` rather than `0`.
    #[must_use]
    pub const fn column(self, shift: u8) -> (i32, i32) {
        (self.x >> shift, self.z >> shift)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Unnormalized corners as they appear in a document.
#[derive(Deserialize)]
struct Corners {
    min: BlockPos,
    max: BlockPos,
}

impl From<Corners> for BlockBox {
    fn from(corners: Corners) -> Self {
        Self::new(corners.min, corners.max)
    }
}

/// An inclusive axis-aligned box of blocks.
///
/// `min <= max` holds on every axis; [`BlockBox::new`] swaps components given
/// out of order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Corners")]
pub struct BlockBox {
    min: BlockPos,
    max: BlockPos,
}

impl BlockBox {
    /// Degenerate box at the origin. Used as a "no box" sentinel and never
    /// registered.
    pub const EMPTY: Self = Self {
        min: BlockPos::ORIGIN,
        max: BlockPos::ORIGIN,
    };

    /// Create a box from two arbitrary corners.
    #[must_use]
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A single-block box.
    #[must_use]
    pub const fn at(pos: BlockPos) -> Self {
        Self { min: pos, max: pos }
    }

    /// Lowest corner.
    #[must_use]
    pub const fn min(&self) -> BlockPos {
        self.min
    }

    /// Highest corner, inclusive.
    #[must_use]
    pub const fn max(&self) -> BlockPos {
        self.max
    }

    /// `max - min` on every axis.
    #[must_use]
    pub const fn size(&self) -> BlockPos {
        self.max.delta(self.min)
    }

    /// Number of blocks inside the box, counting both faces.
    #[must_use]
    pub fn volume(&self) -> u64 {
        let size = self.size();
        let edge = |d: i32| u64::from(d.unsigned_abs()) + 1;
        edge(size.x) * edge(size.y) * edge(size.z)
    }

    /// True for [`BlockBox::EMPTY`], which is never stored in a registry.
    #[must_use]
    pub fn is_empty_sentinel(&self) -> bool {
        *self == Self::EMPTY
    }

    /// True iff `pos` lies within `[min, max]` on every axis.
    #[must_use]
    pub const fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    /// True iff `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains_box(&self, other: &Self) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// True iff the boxes share at least one block.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Translate the whole box.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            min: self.min.offset(dx, dy, dz),
            max: self.max.offset(dx, dy, dz),
        }
    }

    /// Grow (or shrink, for negative `amount`) every face by `amount` blocks.
    #[must_use]
    pub fn expand(&self, amount: i32) -> Self {
        Self::new(
            self.min.offset(-amount, -amount, -amount),
            self.max.offset(amount, amount, amount),
        )
    }

    /// Inclusive column range `((min_cx, min_cz), (max_cx, max_cz))` covered
    /// by this box.
    #[must_use]
    pub const fn column_span(&self, shift: u8) -> ((i32, i32), (i32, i32)) {
        (self.min.column(shift), self.max.column(shift))
    }

    /// Number of columns the box touches.
    #[must_use]
    pub const fn column_count(&self, shift: u8) -> u64 {
        let ((x0, z0), (x1, z1)) = self.column_span(shift);
        ((x1 - x0) as u64 + 1) * ((z1 - z0) as u64 + 1)
    }
}

impl Default for BlockBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for BlockBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}
