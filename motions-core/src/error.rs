// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for motion sensor operations
//!
//! Every variant of [`MotionError`] is a synchronous precondition failure: it is
//! returned by the call that violated the precondition and is never retried by
//! the manager. Hardware failures that happen after a stream is established are
//! not errors; they end the stream.
//!
//! # Examples
//!
//! ```
//! use motions_core::{MotionError, Result, SensorKind};
//!
//! fn stop(active: bool) -> Result<()> {
//!     if !active {
//!         return Err(MotionError::Inactive(SensorKind::Gyroscope));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(stop(false).unwrap_err().to_string(), "Gyroscope is inactive");
//! ```

use crate::sensor::SensorKind;

/// Root error type for all motion sensor operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    /// The hardware lacks the capability.
    ///
    /// `None` refers to fused delivery of all sensors.
    #[error("{} is unavailable", subject(.0))]
    Unavailable(Option<SensorKind>),

    /// Unsubscribe was requested for a sensor with no active delivery.
    #[error("{0} is inactive")]
    Inactive(SensorKind),

    /// Subscribe was requested while the sensor, or an overlapping
    /// subscription, is already delivering.
    ///
    /// `None` refers to the aggregate subscription.
    #[error("{} is unable to resubscribe", subject(.0))]
    Unresubscribable(Option<SensorKind>),

    /// Aggregate subscription requested while per-sensor rates diverge.
    #[error("Some frequencies are unequal")]
    UnequalFrequencies,

    /// Subscription requested before authorization was granted.
    #[error("Motion access is not authorized")]
    NotAuthorized,

    /// Authorization was already requested once.
    #[error("Authorization status is not changeable")]
    NotChangeable,

    /// A frequency was built from a rate that is not a positive finite number.
    #[error("Invalid frequency: {hertz} Hz")]
    InvalidFrequency {
        /// The rejected rate
        hertz: f64,
    },
}

fn subject(sensor: &Option<SensorKind>) -> String {
    match sensor {
        Some(kind) => kind.to_string(),
        None => "A sensor".to_string(),
    }
}

impl MotionError {
    /// Create an invalid frequency error for the given rate
    #[must_use]
    pub const fn invalid_frequency(hertz: f64) -> Self {
        Self::InvalidFrequency { hertz }
    }

    /// The sensor this error refers to, if any.
    #[must_use]
    pub const fn sensor(&self) -> Option<SensorKind> {
        match self {
            Self::Unavailable(sensor) | Self::Unresubscribable(sensor) => *sensor,
            Self::Inactive(sensor) => Some(*sensor),
            _ => None,
        }
    }

    /// Check if this error can go away once the caller changes the manager state
    ///
    /// Unavailable hardware and a decided authorization cannot be fixed by
    /// another call on the same manager.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Inactive(_) | Self::Unresubscribable(_) | Self::UnequalFrequencies
        )
    }

    /// Check if this error indicates a permanent condition for this manager
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::NotChangeable | Self::InvalidFrequency { .. }
        )
    }
}

/// Specialized Result type for motion sensor operations
///
/// # Examples
///
/// ```
/// use motions_core::Result;
///
/// fn configure() -> Result<u32> {
///     Ok(60)
/// }
/// ```
pub type Result<T> = std::result::Result<T, MotionError>;
