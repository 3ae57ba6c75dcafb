// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Motions
//!
//! Concurrent, independently configurable subscriptions to the accelerometer,
//! gyroscope and magnetometer of a device, plus their fused feed, delivered as
//! cancellable async streams.
//!
//! ## Overview
//!
//! A [`SensorManager`] sits between callers and a platform driver implementing
//! [`HardwareAdapter`]. It enforces the subscription rules:
//!
//! - each sensor is subscribed at most once at a time,
//! - the fused feed ("aggregate") excludes every individual subscription,
//! - the aggregate only starts when all three sensors share one rate,
//! - motion access is authorized once per manager.
//!
//! Hardware failures end a [`SensorStream`] quietly; precondition violations
//! are reported synchronously as [`MotionError`]s.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use motions::prelude::*;
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! let manager = SensorManager::new(Arc::new(PlatformSensors::open()?));
//! manager.request_authorization().await?;
//!
//! manager.update(SensorKind::Accelerometer, Frequency::from_hertz(100.0)?);
//! let mut acceleration = manager.subscribe_to_accelerometer()?;
//! while let Some(reading) = acceleration.next().await {
//!     println!("{reading}");
//! }
//! ```

// Re-export core types
pub use motions_core::{
    common_frequency, Acceleration, AuthorizationStatus, CancellationToken, Frequency,
    MagneticField, MotionData, MotionError, Result, RotationRate, Sample, SensorKind, Vector3,
    DEFAULT_HERTZ,
};

// Re-export the manager and its seams
pub use motions_manager::{
    Delivery, DeliveryCallback, HardwareAdapter, ManagerConfig, SensorManager, SensorStream,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AuthorizationStatus, Frequency, HardwareAdapter, MotionError, Sample, SensorKind,
        SensorManager, SensorStream,
    };
}
