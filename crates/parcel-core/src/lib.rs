//! Parcel protection primitives.
//!
//! Value types shared by the registry, the persistence codec and the event
//! adapters:
//!
//! - **[`BlockPos`] / [`BlockBox`]**: integer coordinates and inclusive boxes
//! - **[`PermissionSet`]**: fixed-width bitmask over a [`PermissionKind`]
//! - **[`PlayerRef`] / [`Whitelist`]**: player identity, compared by id
//! - **[`Claim`]**: an owned box with a whitelist and public permissions
//! - **[`Zone`]**: an unowned box with dimension-wide rules
//!
//! Both [`Claim`] and [`Zone`] implement [`Region`], which is all a region
//! store needs to index them.

mod claim;
mod permission;
mod player;
mod pos;
mod region;
mod zone;

pub use claim::{Claim, ClaimFlags};
pub use permission::{
    ClaimPermission, PERMISSION_BITS, PermissionKind, PermissionSet, ZonePermission,
};
pub use player::{PlayerRef, Whitelist};
pub use pos::{BlockBox, BlockPos};
pub use region::Region;
pub use uuid::Uuid;
pub use zone::{Zone, now_millis};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlockBox, BlockPos, Claim, ClaimPermission, PermissionKind, PermissionSet, PlayerRef,
        Region, Uuid, Whitelist, Zone, ZonePermission,
    };
}
