// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sampling rate policy.
//!
//! A [`Frequency`] compares by its sampling interval, so two policies built
//! from different units are equal when they describe the same interval. The
//! rate a policy was built from is kept for reporting.
//!
//! ```
//! use motions_core::Frequency;
//! use std::time::Duration;
//!
//! let from_rate = Frequency::from_hertz(50.0).unwrap();
//! let from_interval = Frequency::from_interval(Duration::from_millis(20)).unwrap();
//!
//! assert_eq!(from_rate, from_interval);
//! assert_eq!(from_rate.hertz(), 50.0);
//! ```

use crate::error::{MotionError, Result};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::time::Duration;

/// Rate used for every sensor until a caller configures another one.
pub const DEFAULT_HERTZ: f64 = 60.0;

/// A positive sampling rate.
#[derive(Debug, Clone, Copy)]
pub struct Frequency {
    interval: Duration,
    hertz: f64,
}

impl Frequency {
    /// Builds a frequency from a rate in hertz.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidFrequency`] when `hertz` is not a positive
    /// finite number or is too high to be represented as a non-zero interval.
    pub fn from_hertz(hertz: f64) -> Result<Self> {
        if !hertz.is_finite() || hertz <= 0.0 {
            return Err(MotionError::invalid_frequency(hertz));
        }

        let interval = Duration::try_from_secs_f64(hertz.recip())
            .map_err(|_| MotionError::invalid_frequency(hertz))?;
        if interval.is_zero() {
            return Err(MotionError::invalid_frequency(hertz));
        }

        Ok(Self { interval, hertz })
    }

    /// Builds a frequency from the interval between two samples.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidFrequency`] for a zero interval.
    pub fn from_interval(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(MotionError::invalid_frequency(f64::INFINITY));
        }

        Ok(Self {
            interval,
            hertz: interval.as_secs_f64().recip(),
        })
    }

    /// The interval between two samples.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// The rate in hertz, as given to the constructor.
    #[must_use]
    pub const fn hertz(&self) -> f64 {
        self.hertz
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs_f64(DEFAULT_HERTZ.recip()),
            hertz: DEFAULT_HERTZ,
        }
    }
}

impl PartialEq for Frequency {
    fn eq(&self, other: &Self) -> bool {
        self.interval == other.interval
    }
}

impl Eq for Frequency {}

impl Hash for Frequency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interval.hash(state);
    }
}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.interval.cmp(&other.interval)
    }
}

impl TryFrom<Duration> for Frequency {
    type Error = MotionError;

    fn try_from(interval: Duration) -> Result<Self> {
        Self::from_interval(interval)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} Hz", self.hertz())
    }
}

/// Returns the common frequency when every item is equal, `None` otherwise.
///
/// An empty iterator has no common frequency.
pub fn common_frequency<I>(frequencies: I) -> Option<Frequency>
where
    I: IntoIterator<Item = Frequency>,
{
    let mut iter = frequencies.into_iter();
    let first = iter.next()?;
    iter.all(|other| other == first).then_some(first)
}
