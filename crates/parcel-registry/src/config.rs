//! Registry configuration.

use std::path::Path;

use parcel_core::ZonePermission;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What happens when a new box overlaps an existing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Any overlap is accepted. The smallest region containing a point
    /// governs it, so a room inside a hotel overrides the hotel.
    #[default]
    AllowNested,
    /// Overlap with a region of a different owner is rejected.
    RejectForeign,
}

/// Zone rules that apply outside every zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneDefaults {
    pub mob_pvp: bool,
    pub mob_spawn: bool,
    pub player_pvp: bool,
}

impl ZoneDefaults {
    /// Default for one zone rule.
    #[must_use]
    pub const fn get(&self, permission: ZonePermission) -> bool {
        match permission {
            ZonePermission::MobPvp => self.mob_pvp,
            ZonePermission::MobSpawn => self.mob_spawn,
            ZonePermission::PlayerPvp => self.player_pvp,
        }
    }
}

impl Default for ZoneDefaults {
    fn default() -> Self {
        Self {
            mob_pvp: true,
            mob_spawn: true,
            player_pvp: true,
        }
    }
}

/// Tunables for a world's registries.
///
/// ```json
/// {
///   "overlap_policy": "allow_nested",
///   "open_world": true,
///   "column_shift": 4,
///   "max_indexed_columns": 4096,
///   "zone_defaults": { "player_pvp": false }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub overlap_policy: OverlapPolicy,
    /// Access answer for positions no claim governs.
    pub open_world: bool,
    /// Spatial index column width is `1 << column_shift` blocks.
    pub column_shift: u8,
    /// Regions covering more columns than this are scanned on every query
    /// instead of being bucketed.
    pub max_indexed_columns: u64,
    pub zone_defaults: ZoneDefaults,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::AllowNested,
            open_world: true,
            column_shift: parcel_spatial::ColumnIndex::DEFAULT_SHIFT,
            max_indexed_columns: parcel_spatial::ColumnIndex::DEFAULT_MAX_COLUMNS,
            zone_defaults: ZoneDefaults::default(),
        }
    }
}

impl RegistryConfig {
    /// Parse from JSON. Missing keys take their defaults; unknown keys are
    /// ignored.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No registry config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
