// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port shared across Ripple tools.

use crate::config::{ConfigError, ConfigService, ConfigStore};
use crate::prefs::RippleConfig;

/// Key the playback settings are stored under.
pub const RIPPLE_CONFIG_KEY: &str = "ripple";

/// Config-facing port for loading/saving playback settings.
pub trait ConfigPort {
    /// Load stored settings; `Ok(None)` when nothing has been saved yet.
    fn load_config(&self) -> Result<Option<RippleConfig>, ConfigError>;
    /// Persist settings.
    fn save_config(&self, config: &RippleConfig) -> Result<(), ConfigError>;
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_config(&self) -> Result<Option<RippleConfig>, ConfigError> {
        let config: Option<RippleConfig> = self.load(RIPPLE_CONFIG_KEY)?;
        if let Some(cfg) = &config {
            cfg.validate()?;
        }
        Ok(config)
    }

    fn save_config(&self, config: &RippleConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.save(RIPPLE_CONFIG_KEY, config)
    }
}
