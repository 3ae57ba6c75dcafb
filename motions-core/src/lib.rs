// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types shared by the motion sensor crates.
//!
//! - [`SensorKind`] identifies a physical sensor.
//! - [`Frequency`] is a sampling rate compared by interval.
//! - [`Sample`], [`MotionData`] and the axis types are the stream payloads.
//! - [`AuthorizationStatus`] is the platform consent state.
//! - [`MotionError`] is the precondition error returned by every operation.
//! - [`CancellationToken`] stops a sample stream from another task.

pub mod authorization;
pub mod cancellation_token;
pub mod error;
pub mod frequency;
pub mod mutex;
pub mod sample;
pub mod sensor;

pub use self::authorization::AuthorizationStatus;
pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::error::{MotionError, Result};
pub use self::frequency::{common_frequency, Frequency, DEFAULT_HERTZ};
pub use self::sample::{Acceleration, MagneticField, MotionData, RotationRate, Sample, Vector3};
pub use self::sensor::SensorKind;
