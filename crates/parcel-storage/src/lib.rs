//! Persistence for parcel registries.
//!
//! Registries are written into a nested key-value document, the same shape a
//! world save stores:
//!
//! ```text
//! root
//! ├── protectionRegistry
//! │   └── claims: [ claim, … ]
//! ├── pvpRegistry
//! │   └── zones:  [ zone, … ]
//! └── transactionRegistry   (opaque, passed through)
//! ```
//!
//! # Usage
//!
//! ```
//! use parcel_registry::{ProtectionRegistry, RegistryConfig};
//! use parcel_storage::DocumentExt;
//!
//! let registry = ProtectionRegistry::new(&RegistryConfig::default());
//! let doc = registry.save_document();
//!
//! let mut restored = ProtectionRegistry::new(&RegistryConfig::default());
//! let report = restored.load_document(&doc);
//! assert!(report.is_clean());
//! ```

mod codec;
mod error;
mod persist;
mod save;

pub use error::{CodecError, CodecResult};
pub use persist::{DocumentExt, LoadReport, PROTECTION_KEY, TRANSACTIONS_KEY, ZONES_KEY};
pub use save::WorldSave;
