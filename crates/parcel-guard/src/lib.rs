//! Event adapters for the parcel protection registry.
//!
//! The host translates its block, combat and spawn events into a
//! [`WorldAction`] and asks a [`Guard`] for a [`Verdict`] before applying
//! them. Claim actions check the governing claim's permissions, combat and
//! spawning check zone rules, pistons may not push into a foreign claim, and
//! explosions spare claimed blocks.
//!
//! ```
//! use parcel_core::{BlockBox, BlockPos, Claim, PlayerRef, Uuid};
//! use parcel_guard::{Guard, WorldAction};
//!
//! let guard = Guard::default();
//! let owner = PlayerRef::new(Uuid::new_v4(), "P1");
//! let bounds = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(9, 9, 9));
//! let claim = Claim::new(owner.clone(), bounds);
//! guard.protection().insert(claim).unwrap();
//!
//! let pos = BlockPos::new(4, 4, 4);
//! assert!(guard.check(&WorldAction::BreakBlock(pos), owner.id).is_allowed());
//! assert!(!guard.check(&WorldAction::BreakBlock(pos), Uuid::new_v4()).is_allowed());
//! ```

mod action;
mod guard;

pub use action::{Footprint, Rule, WorldAction};
pub use guard::{Denial, Guard, Verdict};
