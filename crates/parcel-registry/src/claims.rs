//! The protection registry: claims and access checks.

use parcel_core::{BlockBox, BlockPos, Claim, ClaimPermission, PlayerRef, Uuid};

use crate::config::RegistryConfig;
use crate::error::InsertResult;
use crate::store::RegionStore;

/// Every claim of one world.
///
/// Answers "is this position protected" and "may this player do that here".
/// When claims nest, the smallest claim containing a position governs it.
#[derive(Debug)]
pub struct ProtectionRegistry {
    claims: RegionStore<Claim>,
    open_world: bool,
}

impl ProtectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            claims: RegionStore::new(config),
            open_world: config.open_world,
        }
    }

    /// Access answer for unclaimed positions.
    #[must_use]
    pub const fn open_world(&self) -> bool {
        self.open_world
    }

    /// Register a claim. A claim with a known id replaces the stored one.
    pub fn insert(&mut self, claim: Claim) -> InsertResult<Option<Claim>> {
        self.claims.insert(claim)
    }

    /// Put back a previously accepted claim, bypassing the overlap policy.
    /// See [`RegionStore::restore`].
    pub fn restore(&mut self, claim: Claim) -> InsertResult<Option<Claim>> {
        self.claims.restore(claim)
    }

    /// Delete a claim and return it. Absence is not an error.
    pub fn remove(&mut self, id: Uuid) -> Option<Claim> {
        self.claims.remove(id)
    }

    /// Owned copy of a claim.
    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<Claim> {
        self.claims.get(id).cloned()
    }

    /// Borrowing form of [`Self::find_by_id`].
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Claim> {
        self.claims.get(id)
    }

    /// Every claim containing `pos`. Order is unspecified.
    #[must_use]
    pub fn find_by_point(&self, pos: BlockPos) -> Vec<Claim> {
        self.claims.at(pos).cloned().collect()
    }

    /// Every claim intersecting `area`. Order is unspecified.
    #[must_use]
    pub fn find_by_box(&self, area: &BlockBox) -> Vec<Claim> {
        self.claims.overlapping(area).cloned().collect()
    }

    /// Hot path: true iff any claim contains `pos`.
    #[must_use]
    pub fn is_protected(&self, pos: BlockPos) -> bool {
        self.claims.is_covered(pos)
    }

    /// True iff any claim intersects `area`.
    #[must_use]
    pub fn is_area_protected(&self, area: &BlockBox) -> bool {
        self.claims.overlapping(area).next().is_some()
    }

    /// The claim whose rules apply at `pos`: the smallest containing claim,
    /// ties broken by ascending id.
    #[must_use]
    pub fn resolve_governing(&self, pos: BlockPos) -> Option<Claim> {
        self.governing(pos).cloned()
    }

    /// Borrowing form of [`Self::resolve_governing`].
    #[must_use]
    pub fn governing(&self, pos: BlockPos) -> Option<&Claim> {
        self.claims.governing(pos)
    }

    /// Whether `actor` may perform `permission` at `pos`.
    ///
    /// With no claim governing, the answer is `open_world`. Otherwise the
    /// owner and whitelisted players are always allowed, and anyone else is
    /// allowed iff the claim grants `permission` publicly.
    #[must_use]
    pub fn has_access(
        &self,
        pos: BlockPos,
        actor: Uuid,
        permission: ClaimPermission,
        open_world: bool,
    ) -> bool {
        match self.governing(pos) {
            Some(claim) => claim.allows(&actor, permission),
            None => open_world,
        }
    }

    /// [`Self::has_access`] with the configured open-world default.
    #[must_use]
    pub fn check(&self, pos: BlockPos, actor: Uuid, permission: ClaimPermission) -> bool {
        self.has_access(pos, actor, permission, self.open_world)
    }

    /// Snapshot of every claim ordered by id.
    #[must_use]
    pub fn all_claims(&self) -> Vec<Claim> {
        self.claims.sorted().into_iter().cloned().collect()
    }

    /// Claims owned by `owner`, ordered by id.
    #[must_use]
    pub fn claims_owned_by(&self, owner: Uuid) -> Vec<Claim> {
        self.claims
            .sorted()
            .into_iter()
            .filter(|c| c.is_owned() && c.owner.id == owner)
            .cloned()
            .collect()
    }

    /// Claims nested inside `id`, smallest first (rooms of a hotel).
    #[must_use]
    pub fn children_of(&self, id: Uuid) -> Vec<Claim> {
        self.claims.children_of(id).into_iter().cloned().collect()
    }

    /// The smallest claim enclosing `id`.
    #[must_use]
    pub fn parent_of(&self, id: Uuid) -> Option<Claim> {
        self.claims.parent_of(id).cloned()
    }

    /// Mutate a claim in place. See [`RegionStore::modify`].
    pub fn modify<T>(
        &mut self,
        id: Uuid,
        f: impl FnOnce(&mut Claim) -> T,
    ) -> InsertResult<Option<T>> {
        self.claims.modify(id, f)
    }

    /// Grant or revoke a public permission. Returns `false` if the claim does
    /// not exist.
    pub fn set_permission(&mut self, id: Uuid, permission: ClaimPermission, value: bool) -> bool {
        self.modify(id, |c| c.set_permission(permission, value))
            .ok()
            .flatten()
            .is_some()
    }

    /// Returns `false` if the claim does not exist.
    pub fn rename(&mut self, id: Uuid, name: impl Into<String>) -> bool {
        let name = name.into();
        self.modify(id, |c| c.name = name).ok().flatten().is_some()
    }

    /// Trust a player. Returns `Some(false)` if they were already trusted and
    /// `None` if the claim does not exist.
    pub fn whitelist_add(&mut self, id: Uuid, player: PlayerRef) -> Option<bool> {
        self.modify(id, |c| c.whitelist.add(player)).ok().flatten()
    }

    /// Revoke trust. Returns `None` if the claim does not exist.
    pub fn whitelist_remove(&mut self, id: Uuid, player: Uuid) -> Option<bool> {
        self.modify(id, |c| c.whitelist.remove(&player)).ok().flatten()
    }

    /// Move or resize a claim. Returns `Ok(false)` if it does not exist.
    pub fn resize(&mut self, id: Uuid, bounds: BlockBox) -> InsertResult<bool> {
        Ok(self.modify(id, |c| c.bounds = bounds)?.is_some())
    }

    /// Number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Drop every claim.
    pub fn clear(&mut self) {
        self.claims.clear();
    }

    /// Underlying store, for iteration without cloning.
    #[must_use]
    pub const fn store(&self) -> &RegionStore<Claim> {
        &self.claims
    }
}

impl Default for ProtectionRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}
