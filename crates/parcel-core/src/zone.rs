//! Zones: unowned regions carrying dimension-wide rules such as PvP.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::{BlockBox, BlockPos, PermissionSet, Region, ZonePermission};

/// A rule region. Shaped like a claim without owner or whitelist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Zone {
    id: Uuid,
    pub name: String,
    pub anchor: BlockPos,
    pub bounds: BlockBox,
    pub permissions: PermissionSet<ZonePermission>,
    /// Creation time in unix milliseconds.
    pub created_at: u64,
}

impl Zone {
    /// Create a zone with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, bounds: BlockBox) -> Self {
        Self::with_id(Uuid::new_v4(), name, bounds, now_millis())
    }

    /// Create a zone with a known id and creation time (used when loading).
    #[must_use]
    pub fn with_id(id: Uuid, name: impl Into<String>, bounds: BlockBox, created_at: u64) -> Self {
        Self {
            id,
            name: name.into(),
            anchor: bounds.min(),
            bounds,
            permissions: PermissionSet::default(),
            created_at,
        }
    }

    /// Enable a rule inside the zone.
    #[must_use]
    pub fn allowing(mut self, permission: ZonePermission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Stable identity, fixed at creation.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the rule is enabled inside the zone.
    #[must_use]
    pub fn has_permission(&self, permission: ZonePermission) -> bool {
        self.permissions.has(permission)
    }
}

impl Region for Zone {
    fn id(&self) -> Uuid {
        self.id
    }

    fn bounds(&self) -> BlockBox {
        self.bounds
    }
}

/// Milliseconds since the unix epoch. A clock before 1970 reads as zero.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
