//! Generic region storage: id map plus column index.

use hashbrown::HashMap;
use parcel_core::{BlockBox, BlockPos, Region, Uuid};
use parcel_spatial::ColumnIndex;

use crate::config::{OverlapPolicy, RegistryConfig};
use crate::error::{InsertError, InsertResult};

/// Regions keyed by id and indexed by column.
///
/// The id map is the source of truth; the column index mirrors every region's
/// current box. Both are updated together in every mutating method so a
/// reader holding `&self` never sees one without the other.
#[derive(Debug)]
pub struct RegionStore<R> {
    regions: HashMap<Uuid, R>,
    index: ColumnIndex,
    policy: OverlapPolicy,
}

impl<R: Region> RegionStore<R> {
    /// Create an empty store.
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            regions: HashMap::new(),
            index: ColumnIndex::new(config.column_shift, config.max_indexed_columns),
            policy: config.overlap_policy,
        }
    }

    /// Overlap policy applied to new placements.
    #[must_use]
    pub const fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Add a region, replacing any region with the same id.
    ///
    /// Returns the replaced region. Under [`OverlapPolicy::RejectForeign`]
    /// the insert fails if the box overlaps a region with a different owner;
    /// the error names the most significant (smallest) blocker.
    pub fn insert(&mut self, region: R) -> InsertResult<Option<R>> {
        self.check_placement(&region)?;

        let id = region.id();
        self.index.insert(id, region.bounds());
        let previous = self.regions.insert(id, region);

        if previous.is_some() {
            tracing::debug!("Replaced region {id}");
        } else {
            tracing::debug!("Inserted region {id}");
        }
        Ok(previous)
    }

    /// Remove and return a region. Absence is not an error.
    pub fn remove(&mut self, id: Uuid) -> Option<R> {
        let region = self.regions.remove(&id)?;
        self.index.remove(id);
        tracing::debug!("Removed region {id}");
        Some(region)
    }

    /// Mutate a region in place.
    ///
    /// The column index follows box changes. If the new box is rejected by
    /// the overlap policy the region is restored and the error returned.
    /// `Ok(None)` means no region has this id.
    pub fn modify<T>(&mut self, id: Uuid, f: impl FnOnce(&mut R) -> T) -> InsertResult<Option<T>> {
        let Some(region) = self.regions.get_mut(&id) else {
            return Ok(None);
        };

        let before = region.clone();
        let out = f(region);
        debug_assert_eq!(region.id(), id, "region id changed during modify");

        let bounds = region.bounds();
        let moved = bounds != before.bounds();
        if !moved && region.owner_id() == before.owner_id() {
            return Ok(Some(out));
        }

        // A new owner can turn an accepted overlap into a foreign one
        let updated = region.clone();
        if let Err(e) = self.check_placement(&updated) {
            self.regions.insert(id, before);
            return Err(e);
        }
        if moved {
            self.index.insert(id, bounds);
            tracing::debug!("Moved region {id} to {bounds}");
        }
        Ok(Some(out))
    }

    /// Put back a region that was accepted before, e.g. when loading a save.
    ///
    /// Only the empty box is refused. The overlap policy judges new
    /// placements, not persisted ones, so a save written under
    /// [`OverlapPolicy::AllowNested`] loads whole under any policy.
    pub fn restore(&mut self, region: R) -> InsertResult<Option<R>> {
        let id = region.id();
        let bounds = region.bounds();
        if bounds.is_empty_sentinel() {
            return Err(InsertError::EmptyBox { id });
        }
        self.index.insert(id, bounds);
        Ok(self.regions.insert(id, region))
    }

    fn check_placement(&self, region: &R) -> InsertResult<()> {
        let id = region.id();
        let bounds = region.bounds();
        if bounds.is_empty_sentinel() {
            return Err(InsertError::EmptyBox { id });
        }

        if self.policy == OverlapPolicy::RejectForeign {
            let owner = region.owner_id();
            let blocker = self
                .overlapping(&bounds)
                .filter(|other| other.id() != id && other.owner_id() != owner)
                .min_by_key(|other| other.significance());
            if let Some(blocker) = blocker {
                return Err(InsertError::Conflict {
                    id,
                    with: blocker.id(),
                });
            }
        }
        Ok(())
    }

    /// Look up a region by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&R> {
        self.regions.get(&id)
    }

    #[must_use]
    pub fn contains_id(&self, id: Uuid) -> bool {
        self.regions.contains_key(&id)
    }

    /// Every region whose box contains `pos`, in index order.
    pub fn at(&self, pos: BlockPos) -> impl Iterator<Item = &R> + '_ {
        self.index.at(pos).filter_map(|id| self.regions.get(&id))
    }

    /// Every region whose box intersects `area`.
    pub fn overlapping(&self, area: &BlockBox) -> impl Iterator<Item = &R> + '_ {
        self.index
            .intersecting(area)
            .into_iter()
            .filter_map(|id| self.regions.get(&id))
    }

    /// True iff any region contains `pos`.
    #[must_use]
    pub fn is_covered(&self, pos: BlockPos) -> bool {
        self.index.any_at(pos)
    }

    /// The least significant region containing `pos`: smallest volume, ties
    /// broken by ascending id.
    #[must_use]
    pub fn governing(&self, pos: BlockPos) -> Option<&R> {
        self.at(pos).min_by_key(|r| r.significance())
    }

    /// Regions lying entirely inside `id`'s box, excluding `id` itself and
    /// anything at least as large.
    #[must_use]
    pub fn children_of(&self, id: Uuid) -> Vec<&R> {
        let Some(parent) = self.get(id) else {
            return Vec::new();
        };
        let bounds = parent.bounds();
        let rank = parent.significance();
        let mut children: Vec<_> = self
            .overlapping(&bounds)
            .filter(|r| r.id() != id && bounds.contains_box(&r.bounds()) && r.significance() < rank)
            .collect();
        children.sort_by_key(|r| r.significance());
        children
    }

    /// The smallest region that fully contains `id`'s box and ranks above it.
    #[must_use]
    pub fn parent_of(&self, id: Uuid) -> Option<&R> {
        let child = self.get(id)?;
        let bounds = child.bounds();
        let rank = child.significance();
        self.overlapping(&bounds)
            .filter(|r| r.id() != id && r.bounds().contains_box(&bounds) && r.significance() > rank)
            .min_by_key(|r| r.significance())
    }

    /// All regions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.regions.values()
    }

    /// All regions ordered by id, for stable listings and saves.
    #[must_use]
    pub fn sorted(&self) -> Vec<&R> {
        let mut all: Vec<_> = self.regions.values().collect();
        all.sort_by_key(|r| r.id());
        all
    }

    /// Number of stored regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.index.clear();
    }
}

impl<R: Region> Default for RegionStore<R> {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use parcel_core::{Claim, PlayerRef};

    use super::*;

    fn bx(a: (i32, i32, i32), b: (i32, i32, i32)) -> BlockBox {
        BlockBox::new(BlockPos::new(a.0, a.1, a.2), BlockPos::new(b.0, b.1, b.2))
    }

    fn player() -> PlayerRef {
        PlayerRef::new(Uuid::new_v4(), "player")
    }

    /// Reference answer: scan every region.
    fn brute_force(store: &RegionStore<Claim>, pos: BlockPos) -> Vec<Uuid> {
        let mut ids: Vec<_> = store
            .iter()
            .filter(|c| c.bounds.contains(pos))
            .map(|c| c.id())
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_index_matches_brute_force() {
        let mut store = RegionStore::default();
        let owner = player();
        // Deterministic scatter of boxes of mixed size, some nested, some
        // crossing column borders, some negative
        for i in -6_i32..6 {
            let base = i * 13;
            let size = (i.abs() % 4) * 9 + 1;
            store
                .insert(Claim::new(
                    owner.clone(),
                    bx((base, 0, -base), (base + size, 20, -base + size)),
                ))
                .unwrap();
        }
        store
            .insert(Claim::new(owner, bx((-200, 0, -200), (200, 64, 200))))
            .unwrap();

        for x in (-90..90).step_by(7) {
            for z in (-90..90).step_by(5) {
                for y in [-1, 0, 10, 20, 21] {
                    let pos = BlockPos::new(x, y, z);
                    let mut indexed: Vec<_> = store.at(pos).map(|c| c.id()).collect();
                    indexed.sort();
                    assert_eq!(indexed, brute_force(&store, pos), "at {pos}");
                    assert_eq!(store.is_covered(pos), !indexed.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_insert_same_id_replaces() {
        let mut store = RegionStore::default();
        let claim = Claim::new(player(), bx((0, 0, 0), (9, 9, 9)));
        let id = claim.id();
        assert!(store.insert(claim.clone()).unwrap().is_none());

        let mut moved = claim.clone();
        moved.bounds = bx((100, 0, 100), (109, 9, 109));
        let previous = store.insert(moved).unwrap();

        assert_eq!(previous, Some(claim));
        assert_eq!(store.len(), 1);
        assert!(!store.is_covered(BlockPos::new(5, 5, 5)));
        assert_eq!(store.governing(BlockPos::new(105, 5, 105)).map(|c| c.id()), Some(id));
    }

    #[test]
    fn test_empty_box_rejected() {
        let mut store = RegionStore::default();
        let claim = Claim::new(player(), BlockBox::EMPTY);
        let id = claim.id();
        assert_eq!(store.insert(claim), Err(InsertError::EmptyBox { id }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reject_foreign_overlap() {
        let config = RegistryConfig {
            overlap_policy: OverlapPolicy::RejectForeign,
            ..RegistryConfig::default()
        };
        let mut store = RegionStore::new(&config);
        let alice = player();
        let bob = player();

        let estate = Claim::new(alice.clone(), bx((0, 0, 0), (19, 19, 19)));
        let estate_id = estate.id();
        store.insert(estate).unwrap();

        // Same owner may nest
        store
            .insert(Claim::new(alice, bx((5, 5, 5), (7, 7, 7))))
            .unwrap();

        let intruder = Claim::new(bob.clone(), bx((15, 0, 15), (30, 5, 30)));
        let intruder_id = intruder.id();
        assert_eq!(
            store.insert(intruder),
            Err(InsertError::Conflict {
                id: intruder_id,
                with: estate_id,
            })
        );

        // Disjoint is fine
        store
            .insert(Claim::new(bob, bx((20, 0, 20), (30, 5, 30))))
            .unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_modify_reindexes_and_rolls_back() {
        let config = RegistryConfig {
            overlap_policy: OverlapPolicy::RejectForeign,
            ..RegistryConfig::default()
        };
        let mut store = RegionStore::new(&config);
        let mine = Claim::new(player(), bx((0, 0, 0), (9, 9, 9)));
        let theirs = Claim::new(player(), bx((50, 0, 50), (59, 9, 59)));
        let (mine_id, theirs_id) = (mine.id(), theirs.id());
        store.insert(mine).unwrap();
        store.insert(theirs).unwrap();

        let grown = store.modify(mine_id, |c| c.bounds = c.bounds.expand(5)).unwrap();
        assert_eq!(grown, Some(()));
        assert!(store.is_covered(BlockPos::new(-5, 0, -5)));

        let err = store
            .modify(mine_id, |c| c.bounds = bx((0, 0, 0), (55, 9, 55)))
            .unwrap_err();
        assert_eq!(
            err,
            InsertError::Conflict {
                id: mine_id,
                with: theirs_id,
            }
        );
        assert_eq!(
            store.get(mine_id).map(|c| c.bounds),
            Some(bx((-5, -5, -5), (14, 14, 14)))
        );
        assert!(!store.is_covered(BlockPos::new(30, 0, 30)));

        assert_eq!(store.modify(Uuid::new_v4(), |c| c.name.clear()), Ok(None));
    }

    #[test]
    fn test_owner_change_is_checked() {
        let config = RegistryConfig {
            overlap_policy: OverlapPolicy::RejectForeign,
            ..RegistryConfig::default()
        };
        let mut store = RegionStore::new(&config);
        let alice = player();
        let estate = Claim::new(alice.clone(), bx((0, 0, 0), (19, 19, 19)));
        let shed = Claim::new(alice.clone(), bx((5, 5, 5), (7, 7, 7)));
        let (estate_id, shed_id) = (estate.id(), shed.id());
        store.insert(estate).unwrap();
        store.insert(shed).unwrap();

        let err = store.modify(shed_id, |c| c.owner = player()).unwrap_err();
        assert_eq!(
            err,
            InsertError::Conflict {
                id: shed_id,
                with: estate_id,
            }
        );
        assert_eq!(store.get(shed_id).map(|c| c.owner.id), Some(alice.id));

        // Renaming keeps the owner and needs no placement check
        assert_eq!(store.modify(shed_id, |c| c.name = "shed".into()), Ok(Some(())));
    }

    #[test]
    fn test_restore_ignores_overlap_policy() {
        let config = RegistryConfig {
            overlap_policy: OverlapPolicy::RejectForeign,
            ..RegistryConfig::default()
        };
        let mut store = RegionStore::new(&config);
        let hotel = Claim::new(player(), bx((0, 0, 0), (31, 15, 31)));
        let room = Claim::new(player(), bx((1, 1, 1), (4, 4, 4)));
        let room_id = room.id();
        store.restore(hotel).unwrap();
        assert!(store.insert(room.clone()).is_err());
        assert!(store.restore(room).unwrap().is_none());

        assert_eq!(store.len(), 2);
        assert_eq!(store.governing(BlockPos::new(2, 2, 2)).map(|c| c.id()), Some(room_id));

        let empty = Claim::new(player(), BlockBox::EMPTY);
        let id = empty.id();
        assert_eq!(store.restore(empty), Err(InsertError::EmptyBox { id }));
    }

    #[test]
    fn test_children_and_parent() {
        let mut store = RegionStore::default();
        let hotel = Claim::new(player(), bx((0, 0, 0), (31, 15, 31)));
        let room_a = Claim::new(player(), bx((1, 1, 1), (4, 4, 4)));
        let room_b = Claim::new(player(), bx((10, 1, 10), (14, 4, 14)));
        let outside = Claim::new(player(), bx((30, 0, 30), (40, 4, 40)));
        let ids = [hotel.id(), room_a.id(), room_b.id(), outside.id()];
        for c in [hotel, room_a, room_b, outside] {
            store.insert(c).unwrap();
        }

        let children: Vec<_> = store.children_of(ids[0]).iter().map(|c| c.id()).collect();
        assert_eq!(children, vec![ids[1], ids[2]]);
        assert_eq!(store.parent_of(ids[1]).map(|c| c.id()), Some(ids[0]));
        assert!(store.parent_of(ids[0]).is_none());
        assert!(store.parent_of(ids[3]).is_none());
        assert!(store.children_of(Uuid::new_v4()).is_empty());
    }
}
