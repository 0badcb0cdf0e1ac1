//! Protection registry.
//!
//! The single source of truth for "is this position claimed, and may this
//! player do that here".
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SharedProtection  (Arc<RwLock<..>>, optional)               │
//! │    WorldProtection                                           │
//! │      ProtectionRegistry ── RegionStore<Claim>                │
//! │      ZoneRegistry       ── RegionStore<Zone>                 │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  RegionStore<R>                                              │
//! │    - id → region map (source of truth)                       │
//! │    - ColumnIndex: (x >> shift, z >> shift) → [(id, box)]     │
//! │    - overlap policy applied on insert/modify                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use parcel_core::{BlockBox, BlockPos, Claim, ClaimPermission, PlayerRef, Uuid};
//! use parcel_registry::ProtectionRegistry;
//!
//! let owner = PlayerRef::new(Uuid::new_v4(), "P1");
//! let mut registry = ProtectionRegistry::default();
//! let bounds = BlockBox::new(BlockPos::new(0, 0, 0), BlockPos::new(9, 9, 9));
//! let claim = Claim::new(owner.clone(), bounds);
//! registry.insert(claim).unwrap();
//!
//! let pos = BlockPos::new(5, 5, 5);
//! assert!(registry.is_protected(pos));
//! assert!(registry.check(pos, owner.id, ClaimPermission::BlockBreak));
//! assert!(!registry.check(pos, Uuid::new_v4(), ClaimPermission::BlockBreak));
//! ```

mod claims;
mod config;
mod error;
mod shared;
mod store;
mod world;
mod zones;

pub use claims::ProtectionRegistry;
pub use config::{OverlapPolicy, RegistryConfig, ZoneDefaults};
pub use error::{ConfigError, InsertError, InsertResult};
pub use shared::SharedProtection;
pub use store::RegionStore;
pub use world::WorldProtection;
pub use zones::ZoneRegistry;
