//! Zone registry: dimension-wide rules such as PvP and mob spawning.

use parcel_core::{BlockPos, PermissionKind, Uuid, Zone, ZonePermission};

use crate::config::{RegistryConfig, ZoneDefaults};
use crate::error::InsertResult;
use crate::store::RegionStore;

/// Every zone of one world.
///
/// A zone's permission bit enables the rule inside it. Outside every zone the
/// configured [`ZoneDefaults`] apply. Nested zones resolve like claims: the
/// smallest wins.
#[derive(Debug)]
pub struct ZoneRegistry {
    zones: RegionStore<Zone>,
    defaults: ZoneDefaults,
}

impl ZoneRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            zones: RegionStore::new(config),
            defaults: config.zone_defaults,
        }
    }

    /// Register a zone. A zone with a known id replaces the stored one.
    pub fn insert(&mut self, zone: Zone) -> InsertResult<Option<Zone>> {
        self.zones.insert(zone)
    }

    /// Put back a previously accepted zone, bypassing the overlap policy.
    pub fn restore(&mut self, zone: Zone) -> InsertResult<Option<Zone>> {
        self.zones.restore(zone)
    }

    /// Delete a zone and return it.
    pub fn remove(&mut self, id: Uuid) -> Option<Zone> {
        self.zones.remove(id)
    }

    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<Zone> {
        self.zones.get(id).cloned()
    }

    /// Every zone containing `pos`.
    #[must_use]
    pub fn find_by_point(&self, pos: BlockPos) -> Vec<Zone> {
        self.zones.at(pos).cloned().collect()
    }

    /// The smallest zone containing `pos`.
    #[must_use]
    pub fn resolve_governing(&self, pos: BlockPos) -> Option<Zone> {
        self.zones.governing(pos).cloned()
    }

    /// Whether the rule is enabled at `pos`.
    #[must_use]
    pub fn allows(&self, pos: BlockPos, permission: ZonePermission) -> bool {
        self.zones
            .governing(pos)
            .map_or_else(|| self.defaults.get(permission), |z| z.has_permission(permission))
    }

    #[must_use]
    pub fn player_pvp_allowed(&self, pos: BlockPos) -> bool {
        self.allows(pos, ZonePermission::PlayerPvp)
    }

    #[must_use]
    pub fn mob_spawn_allowed(&self, pos: BlockPos) -> bool {
        self.allows(pos, ZonePermission::MobSpawn)
    }

    /// Toggle a rule on a zone. Returns `false` if the zone does not exist.
    pub fn set_permission(&mut self, id: Uuid, permission: ZonePermission, value: bool) -> bool {
        self.zones
            .modify(id, |z| z.permissions.set(permission.bit(), value))
            .ok()
            .flatten()
            .is_some()
    }

    /// Snapshot ordered by id.
    #[must_use]
    pub fn all_zones(&self) -> Vec<Zone> {
        self.zones.sorted().into_iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &RegionStore<Zone> {
        &self.zones
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use parcel_core::BlockBox;

    use super::*;

    fn bx(a: (i32, i32, i32), b: (i32, i32, i32)) -> BlockBox {
        BlockBox::new(BlockPos::new(a.0, a.1, a.2), BlockPos::new(b.0, b.1, b.2))
    }

    #[test]
    fn test_defaults_outside_zones() {
        let config = RegistryConfig {
            zone_defaults: ZoneDefaults {
                mob_pvp: true,
                mob_spawn: true,
                player_pvp: false,
            },
            ..RegistryConfig::default()
        };
        let registry = ZoneRegistry::new(&config);
        let pos = BlockPos::new(0, 64, 0);
        assert!(!registry.player_pvp_allowed(pos));
        assert!(registry.mob_spawn_allowed(pos));
    }

    #[test]
    fn test_nested_arena_inside_safe_zone() {
        let mut registry = ZoneRegistry::default();
        let spawn = Zone::new("spawn", bx((-100, 0, -100), (100, 255, 100)));
        let arena =
            Zone::new("arena", bx((10, 60, 10), (30, 80, 30))).allowing(ZonePermission::PlayerPvp);
        let spawn_id = spawn.id();
        registry.insert(spawn).unwrap();
        registry.insert(arena).unwrap();

        assert!(!registry.player_pvp_allowed(BlockPos::new(0, 64, 0)));
        assert!(registry.player_pvp_allowed(BlockPos::new(20, 70, 20)));
        assert!(registry.player_pvp_allowed(BlockPos::new(500, 64, 0)));

        assert!(registry.set_permission(spawn_id, ZonePermission::PlayerPvp, true));
        assert!(registry.player_pvp_allowed(BlockPos::new(0, 64, 0)));
        assert!(!registry.mob_spawn_allowed(BlockPos::new(0, 64, 0)));
        assert!(!registry.set_permission(Uuid::new_v4(), ZonePermission::MobSpawn, true));
    }
}
