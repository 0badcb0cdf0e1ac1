//! World save files.

use std::path::Path;

use parcel_registry::{RegistryConfig, WorldProtection};
use serde_json::Value;

use crate::error::CodecResult;
use crate::persist::{DocumentExt, LoadReport, TRANSACTIONS_KEY};

/// Everything the protection layer persists for one world.
#[derive(Debug, Default)]
pub struct WorldSave {
    pub protection: WorldProtection,
    /// Purchase ledger owned by another system. Carried through unchanged.
    pub transactions: Value,
}

impl WorldSave {
    /// Empty save with the given configuration.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            protection: WorldProtection::new(config),
            transactions: Value::Null,
        }
    }

    /// Decode a root document. Bad entries are skipped and reported.
    #[must_use]
    pub fn from_document(root: &Value, config: RegistryConfig) -> (Self, LoadReport) {
        let mut protection = WorldProtection::new(config);
        let report = protection.load_document(root);
        let transactions = root.get(TRANSACTIONS_KEY).cloned().unwrap_or(Value::Null);
        (
            Self {
                protection,
                transactions,
            },
            report,
        )
    }

    /// Encode as a root document. Output is deterministic for equal state.
    #[must_use]
    pub fn to_document(&self) -> Value {
        let mut root = self.protection.save_document();
        if !self.transactions.is_null() {
            if let Value::Object(map) = &mut root {
                map.insert(TRANSACTIONS_KEY.to_owned(), self.transactions.clone());
            }
        }
        root
    }

    /// Read a save file. A missing file is an empty world.
    ///
    /// Only an unreadable file or invalid JSON is an error; bad entries inside
    /// valid JSON are skipped and listed in the report.
    pub fn read(path: impl AsRef<Path>, config: RegistryConfig) -> CodecResult<(Self, LoadReport)> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No save at {}, starting empty", path.display());
            return Ok((Self::new(config), LoadReport::default()));
        }

        let bytes = std::fs::read(path)?;
        let root: Value = serde_json::from_slice(&bytes)?;
        Ok(Self::from_document(&root, config))
    }

    /// Write the save file atomically: a sibling temp file is written first
    /// and renamed over `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> CodecResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&self.to_document())?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;

        tracing::info!(
            "Saved {} claims and {} zones to {}",
            self.protection.claims.len(),
            self.protection.zones.len(),
            path.display()
        );
        Ok(())
    }
}
