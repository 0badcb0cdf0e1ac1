//! The shape shared by everything a region store can hold.

use uuid::Uuid;

use crate::BlockBox;

/// A uniquely identified box of world space.
pub trait Region: Clone {
    /// Stable identity, fixed at creation.
    fn id(&self) -> Uuid;

    /// The protected volume.
    fn bounds(&self) -> BlockBox;

    /// Owning player, if the region has one.
    fn owner_id(&self) -> Option<Uuid> {
        None
    }

    /// Ordering key for "least significant region wins": smaller volume
    /// first, then id.
    fn significance(&self) -> (u64, Uuid) {
        (self.bounds().volume(), self.id())
    }
}
