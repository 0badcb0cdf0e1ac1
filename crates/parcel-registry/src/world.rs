//! Per-world protection state.

use crate::claims::ProtectionRegistry;
use crate::config::RegistryConfig;
use crate::zones::ZoneRegistry;

/// The claim and zone registries of one world.
///
/// Created when the world loads and saved/dropped when it unloads. Nothing
/// here is process-global; a server hosting several worlds holds one of
/// these per world.
#[derive(Debug)]
pub struct WorldProtection {
    pub claims: ProtectionRegistry,
    pub zones: ZoneRegistry,
    config: RegistryConfig,
}

impl WorldProtection {
    /// Empty registries built from `config`.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            claims: ProtectionRegistry::new(&config),
            zones: ZoneRegistry::new(&config),
            config,
        }
    }

    /// Configuration the registries were built from.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fresh, empty registries with the same configuration.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self::new(self.config.clone())
    }
}

impl Default for WorldProtection {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
