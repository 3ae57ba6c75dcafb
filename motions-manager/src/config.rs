// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use motions_core::{Frequency, Result, DEFAULT_HERTZ};
use serde::Deserialize;

/// Startup configuration of a [`SensorManager`](crate::SensorManager).
///
/// Missing fields take their default when deserialized:
///
/// ```
/// use motions_manager::ManagerConfig;
///
/// let config: ManagerConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, ManagerConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Rate every sensor and the aggregate start with.
    pub default_frequency_hz: f64,
}

impl ManagerConfig {
    /// The configured startup rate.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidFrequency` if the rate is not positive.
    pub fn default_frequency(&self) -> Result<Frequency> {
        Frequency::from_hertz(self.default_frequency_hz)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_frequency_hz: DEFAULT_HERTZ,
        }
    }
}
