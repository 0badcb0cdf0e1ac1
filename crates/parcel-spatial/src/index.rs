//! Column-bucketed region index.

use hashbrown::{HashMap, HashSet};
use parcel_core::{BlockBox, BlockPos, Uuid};
use smallvec::SmallVec;

use crate::ColumnKey;

/// One indexed region: its id and box, stored inline so a point query never
/// leaves the bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    id: Uuid,
    bounds: BlockBox,
}

type Bucket = SmallVec<[Entry; 4]>;

/// Spatial index from world columns to the regions touching them.
///
/// Regions covering more than `max_columns` columns are not bucketed; they
/// live in an overflow list that every query scans. This keeps a single huge
/// region (a server-wide spawn claim, say) from filling thousands of buckets.
#[derive(Debug)]
pub struct ColumnIndex {
    /// Column width is `1 << shift` blocks.
    shift: u8,
    /// Bucketing limit per region.
    max_columns: u64,
    columns: HashMap<ColumnKey, Bucket>,
    overflow: Vec<Entry>,
    /// Box each id was indexed under, needed to find its buckets on removal.
    placed: HashMap<Uuid, BlockBox>,
}

impl ColumnIndex {
    /// Default column shift: 16-block chunk columns.
    pub const DEFAULT_SHIFT: u8 = 4;
    /// Default bucketing limit.
    pub const DEFAULT_MAX_COLUMNS: u64 = 4096;

    /// Create an empty index.
    #[must_use]
    pub fn new(shift: u8, max_columns: u64) -> Self {
        Self {
            shift: shift.min(30),
            max_columns: max_columns.max(1),
            columns: HashMap::new(),
            overflow: Vec::new(),
            placed: HashMap::new(),
        }
    }

    /// Column width as a power of two.
    #[must_use]
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Index a region. An id that is already present is moved to the new box.
    pub fn insert(&mut self, id: Uuid, bounds: BlockBox) {
        self.remove(id);

        let entry = Entry { id, bounds };
        if bounds.column_count(self.shift) > self.max_columns {
            self.overflow.push(entry);
        } else {
            for key in ColumnKey::covering(&bounds, self.shift) {
                self.columns.entry(key).or_default().push(entry);
            }
        }
        self.placed.insert(id, bounds);
    }

    /// Drop a region from the index. Returns `false` if it was not indexed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(bounds) = self.placed.remove(&id) else {
            return false;
        };

        if bounds.column_count(self.shift) > self.max_columns {
            self.overflow.retain(|e| e.id != id);
            return true;
        }

        for key in ColumnKey::covering(&bounds, self.shift) {
            if let Some(bucket) = self.columns.get_mut(&key) {
                bucket.retain(|e| e.id != id);
                if bucket.is_empty() {
                    self.columns.remove(&key);
                }
            }
        }
        true
    }

    /// Ids of every region whose box contains `pos`.
    pub fn at(&self, pos: BlockPos) -> impl Iterator<Item = Uuid> + '_ {
        let bucket = self
            .columns
            .get(&ColumnKey::of(pos, self.shift))
            .map(|b| b.as_slice())
            .unwrap_or_default();

        bucket
            .iter()
            .chain(&self.overflow)
            .filter(move |e| e.bounds.contains(pos))
            .map(|e| e.id)
    }

    /// True iff any indexed region contains `pos`.
    #[must_use]
    pub fn any_at(&self, pos: BlockPos) -> bool {
        self.at(pos).next().is_some()
    }

    /// Ids of every region whose box intersects `area`, each reported once.
    #[must_use]
    pub fn intersecting(&self, area: &BlockBox) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        let mut visit = |e: &Entry| {
            if e.bounds.intersects(area) && seen.insert(e.id) {
                found.push(e.id);
            }
        };

        if area.column_count(self.shift) > self.columns.len() as u64 {
            // Cheaper to walk the buckets we have than the columns we cover
            self.columns.values().flatten().for_each(&mut visit);
        } else {
            for key in ColumnKey::covering(area, self.shift) {
                if let Some(bucket) = self.columns.get(&key) {
                    bucket.iter().for_each(&mut visit);
                }
            }
        }
        self.overflow.iter().for_each(visit);

        found
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Number of non-empty column buckets.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Remove every region.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.overflow.clear();
        self.placed.clear();
    }
}

impl Default for ColumnIndex {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SHIFT, Self::DEFAULT_MAX_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(a: (i32, i32, i32), b: (i32, i32, i32)) -> BlockBox {
        BlockBox::new(BlockPos::new(a.0, a.1, a.2), BlockPos::new(b.0, b.1, b.2))
    }

    #[test]
    fn test_point_query_spans_columns() {
        let mut index = ColumnIndex::default();
        let id = Uuid::new_v4();
        index.insert(id, bx((-20, 0, -20), (40, 10, 40)));

        assert_eq!(index.at(BlockPos::new(-20, 0, -20)).collect::<Vec<_>>(), vec![id]);
        assert_eq!(index.at(BlockPos::new(40, 10, 40)).collect::<Vec<_>>(), vec![id]);
        assert!(index.any_at(BlockPos::new(17, 5, -3)));
        assert!(!index.any_at(BlockPos::new(17, 11, -3)));
        assert!(!index.any_at(BlockPos::new(41, 5, 0)));
    }

    #[test]
    fn test_reinsert_moves_region() {
        let mut index = ColumnIndex::default();
        let id = Uuid::new_v4();
        index.insert(id, bx((0, 0, 0), (5, 5, 5)));
        index.insert(id, bx((100, 0, 100), (105, 5, 105)));

        assert_eq!(index.len(), 1);
        assert!(!index.any_at(BlockPos::new(3, 3, 3)));
        assert!(index.any_at(BlockPos::new(103, 3, 103)));
        assert_eq!(index.column_count(), 1);
    }

    #[test]
    fn test_remove_empties_buckets() {
        let mut index = ColumnIndex::default();
        let id = Uuid::new_v4();
        index.insert(id, bx((0, 0, 0), (47, 5, 47)));
        assert_eq!(index.column_count(), 9);

        assert!(index.remove(id));
        assert!(!index.remove(id));
        assert!(index.is_empty());
        assert_eq!(index.column_count(), 0);
    }

    #[test]
    fn test_oversized_regions_overflow() {
        let mut index = ColumnIndex::new(4, 4);
        let big = Uuid::new_v4();
        let small = Uuid::new_v4();
        index.insert(big, bx((-1000, 0, -1000), (1000, 255, 1000)));
        index.insert(small, bx((0, 0, 0), (3, 3, 3)));

        assert_eq!(index.column_count(), 1);
        let mut here: Vec<_> = index.at(BlockPos::new(1, 1, 1)).collect();
        here.sort();
        let mut expected = vec![big, small];
        expected.sort();
        assert_eq!(here, expected);

        assert!(index.remove(big));
        assert_eq!(index.at(BlockPos::new(500, 1, 500)).count(), 0);
    }

    #[test]
    fn test_intersecting_reports_each_once() {
        let mut index = ColumnIndex::default();
        let wide = Uuid::new_v4();
        let far = Uuid::new_v4();
        index.insert(wide, bx((0, 0, 0), (63, 10, 63)));
        index.insert(far, bx((500, 0, 500), (510, 10, 510)));

        assert_eq!(index.intersecting(&bx((10, 5, 10), (50, 5, 50))), vec![wide]);
        assert!(index.intersecting(&bx((0, 11, 0), (63, 20, 63))).is_empty());

        let mut all = index.intersecting(&bx((-10_000, 0, -10_000), (10_000, 10, 10_000)));
        all.sort();
        let mut expected = vec![wide, far];
        expected.sort();
        assert_eq!(all, expected);
    }
}
