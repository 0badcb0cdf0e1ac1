//! Claims: owned, permissioned boxes of world space.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BlockBox, BlockPos, ClaimPermission, PermissionKind, PermissionSet, PlayerRef, Region,
    Whitelist,
};

/// Boolean extension attributes of a claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimFlags {
    /// The claim hosts rentable rooms.
    #[serde(default)]
    pub hotel: bool,
    /// The claim is a room inside a hotel.
    #[serde(default)]
    pub room: bool,
}

/// A claimed volume.
///
/// Equality and hashing cover the id, name, owner, whitelist, anchor, bounds
/// and permissions. [`ClaimFlags`] are extension attributes and are not
/// compared.
#[derive(Clone, Debug)]
pub struct Claim {
    id: Uuid,
    /// Display label. Empty means unnamed.
    pub name: String,
    pub owner: PlayerRef,
    pub whitelist: Whitelist,
    /// Reference point inside the claim, e.g. the claim block.
    pub anchor: BlockPos,
    pub bounds: BlockBox,
    pub permissions: PermissionSet<ClaimPermission>,
    pub flags: ClaimFlags,
}

impl Claim {
    /// Create a claim with a fresh id, anchored at the box minimum.
    #[must_use]
    pub fn new(owner: PlayerRef, bounds: BlockBox) -> Self {
        Self::with_id(Uuid::new_v4(), owner, bounds)
    }

    /// Create a claim with a known id (used when loading).
    #[must_use]
    pub fn with_id(id: Uuid, owner: PlayerRef, bounds: BlockBox) -> Self {
        Self {
            id,
            name: String::new(),
            owner,
            whitelist: Whitelist::new(),
            anchor: bounds.min(),
            bounds,
            permissions: PermissionSet::default(),
            flags: ClaimFlags::default(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the reference point.
    #[must_use]
    pub fn anchored_at(mut self, anchor: BlockPos) -> Self {
        self.anchor = anchor;
        self
    }

    /// Open `permission` to everyone.
    #[must_use]
    pub fn granting(mut self, permission: ClaimPermission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Stable identity, fixed at creation.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Whether `permission` is open to everyone.
    #[must_use]
    pub fn has_permission(&self, permission: ClaimPermission) -> bool {
        self.permissions.has(permission)
    }

    /// Grant or revoke a public permission.
    pub fn set_permission(&mut self, permission: ClaimPermission, value: bool) {
        self.permissions.set(permission.bit(), value);
    }

    /// True when the claim has a real owner.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        !self.owner.is_nobody()
    }

    /// Owner or whitelisted. The nobody sentinel is never trusted.
    #[must_use]
    pub fn is_trusted(&self, actor: &Uuid) -> bool {
        if actor.is_nil() {
            return false;
        }
        (self.is_owned() && self.owner.id == *actor) || self.whitelist.contains(actor)
    }

    /// Whether `actor` may perform `permission` inside this claim.
    #[must_use]
    pub fn allows(&self, actor: &Uuid, permission: ClaimPermission) -> bool {
        self.is_trusted(actor) || self.has_permission(permission)
    }
}

impl PartialEq for Claim {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.owner == other.owner
            && self.whitelist == other.whitelist
            && self.anchor == other.anchor
            && self.bounds == other.bounds
            && self.permissions == other.permissions
    }
}

impl Eq for Claim {}

impl Hash for Claim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
        self.owner.hash(state);
        self.whitelist.hash(state);
        self.anchor.hash(state);
        self.bounds.hash(state);
        self.permissions.hash(state);
    }
}

impl Region for Claim {
    fn id(&self) -> Uuid {
        self.id
    }

    fn bounds(&self) -> BlockBox {
        self.bounds
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.is_owned().then_some(self.owner.id)
    }
}
