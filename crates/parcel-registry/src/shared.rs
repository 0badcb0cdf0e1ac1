//! Thread-safe handle for hosts that deliver world events from several
//! threads.
//!
//! Every mutation takes the write lock for its whole duration, so the id map
//! and the column index change together. Readers share the read lock and see
//! either the state before a mutation or after it, never in between.

use std::sync::Arc;

use parcel_core::{BlockPos, Claim, ClaimPermission, Uuid, Zone, ZonePermission};
use parking_lot::RwLock;

use crate::error::InsertResult;
use crate::world::WorldProtection;

/// Shared, lock-protected [`WorldProtection`].
#[derive(Clone, Debug, Default)]
pub struct SharedProtection {
    inner: Arc<RwLock<WorldProtection>>,
}

impl SharedProtection {
    /// Share an existing world.
    #[must_use]
    pub fn new(world: WorldProtection) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&WorldProtection) -> T) -> T {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock. Everything `f` does is atomic to readers.
    pub fn write<T>(&self, f: impl FnOnce(&mut WorldProtection) -> T) -> T {
        f(&mut self.inner.write())
    }

    /// Swap in a fully built world, e.g. after loading a save, and return the
    /// old one.
    pub fn replace(&self, world: WorldProtection) -> WorldProtection {
        std::mem::replace(&mut *self.inner.write(), world)
    }

    /// See [`crate::ProtectionRegistry::is_protected`].
    #[must_use]
    pub fn is_protected(&self, pos: BlockPos) -> bool {
        self.inner.read().claims.is_protected(pos)
    }

    /// See [`crate::ProtectionRegistry::has_access`].
    #[must_use]
    pub fn has_access(
        &self,
        pos: BlockPos,
        actor: Uuid,
        permission: ClaimPermission,
        open_world: bool,
    ) -> bool {
        self.inner
            .read()
            .claims
            .has_access(pos, actor, permission, open_world)
    }

    /// Access check with the configured open-world default.
    #[must_use]
    pub fn check(&self, pos: BlockPos, actor: Uuid, permission: ClaimPermission) -> bool {
        self.inner.read().claims.check(pos, actor, permission)
    }

    /// Whether the zone rule is enabled at `pos`.
    #[must_use]
    pub fn zone_allows(&self, pos: BlockPos, permission: ZonePermission) -> bool {
        self.inner.read().zones.allows(pos, permission)
    }

    #[must_use]
    pub fn resolve_governing(&self, pos: BlockPos) -> Option<Claim> {
        self.inner.read().claims.resolve_governing(pos)
    }

    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<Claim> {
        self.inner.read().claims.find_by_id(id)
    }

    /// Register a claim under the write lock.
    pub fn insert(&self, claim: Claim) -> InsertResult<Option<Claim>> {
        self.inner.write().claims.insert(claim)
    }

    /// Remove a claim under the write lock.
    pub fn remove(&self, id: Uuid) -> Option<Claim> {
        self.inner.write().claims.remove(id)
    }

    /// Register a zone under the write lock.
    pub fn insert_zone(&self, zone: Zone) -> InsertResult<Option<Zone>> {
        self.inner.write().zones.insert(zone)
    }

    pub fn remove_zone(&self, id: Uuid) -> Option<Zone> {
        self.inner.write().zones.remove(id)
    }

    /// Consistent snapshot of every claim, ordered by id.
    #[must_use]
    pub fn all_claims(&self) -> Vec<Claim> {
        self.inner.read().claims.all_claims()
    }

    /// Consistent snapshot of claims and zones taken under one read lock.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<Claim>, Vec<Zone>) {
        let world = self.inner.read();
        (world.claims.all_claims(), world.zones.all_zones())
    }
}
