// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The hardware seam consumed by [`SensorManager`](crate::SensorManager).
//!
//! A platform driver implements [`HardwareAdapter`]; the manager is the only
//! caller and serializes every call. Drivers push readings back through a
//! [`DeliveryCallback`], from whatever thread they deliver on.

use async_trait::async_trait;
use core::time::Duration;
use motions_core::{AuthorizationStatus, MotionData, SensorKind, Vector3};
use std::sync::Arc;

/// One hardware callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    /// A valid reading.
    Sample(T),
    /// The hardware has no more data for this delivery.
    Finished,
    /// The hardware reported an unrecoverable error.
    Failed(String),
}

/// Callback handed to the adapter when a delivery starts.
///
/// Never blocks and never calls back into the manager, so adapters may invoke
/// it from inside `start_delivery` or `stop_delivery`.
pub type DeliveryCallback<T> = Arc<dyn Fn(Delivery<T>) + Send + Sync>;

/// Platform sensor driver.
///
/// Start and stop calls for the same source always alternate: the manager
/// never starts a delivery that is already running and never stops one that
/// is not.
#[async_trait]
pub trait HardwareAdapter: Send + Sync {
    /// Whether the device has this sensor.
    fn is_available(&self, kind: SensorKind) -> bool;

    /// Whether the platform can deliver fused readings of all three sensors.
    fn is_fused_available(&self) -> bool;

    /// Starts delivering readings of `kind` every `interval`.
    fn start_delivery(
        &self,
        kind: SensorKind,
        interval: Duration,
        callback: DeliveryCallback<Vector3>,
    );

    /// Stops the delivery started for `kind`.
    fn stop_delivery(&self, kind: SensorKind);

    /// Changes the interval of a running delivery. Best effort.
    fn set_interval(&self, kind: SensorKind, interval: Duration);

    /// Starts the fused delivery.
    fn start_fused_delivery(&self, interval: Duration, callback: DeliveryCallback<MotionData>);

    /// Stops the fused delivery.
    fn stop_fused_delivery(&self);

    /// Changes the interval of the running fused delivery. Best effort.
    fn set_fused_interval(&self, interval: Duration);

    /// Asks the platform for motion access and waits for the answer.
    ///
    /// Called at most once per manager.
    async fn probe_authorization(&self) -> AuthorizationStatus;
}
