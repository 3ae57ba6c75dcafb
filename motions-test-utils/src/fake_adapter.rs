// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-memory [`HardwareAdapter`] driven by the test.

use async_trait::async_trait;
use core::time::Duration;
use futures::channel::oneshot;
use motions_core::mutex::Mutex;
use motions_core::{AuthorizationStatus, MotionData, SensorKind, Vector3};
use motions_manager::{Delivery, DeliveryCallback, HardwareAdapter};

/// One call the manager made into the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterCall {
    StartDelivery(SensorKind, Duration),
    StopDelivery(SensorKind),
    SetInterval(SensorKind, Duration),
    StartFusedDelivery(Duration),
    StopFusedDelivery,
    SetFusedInterval(Duration),
    ProbeAuthorization,
}

/// Fake sensor driver.
///
/// Every sensor and the fused feed start out available, and the authorization
/// probe answers [`AuthorizationStatus::Authorized`]. The test pushes readings
/// with [`emit`](Self::emit) / [`emit_fused`](Self::emit_fused) and ends
/// deliveries with [`finish`](Self::finish) or [`fail`](Self::fail).
///
/// Panics if the manager starts a delivery that is already running or stops
/// one that is not, so every test also checks the start/stop pairing.
pub struct FakeHardwareAdapter {
    inner: Mutex<Inner>,
}

struct Inner {
    available: [bool; 3],
    fused_available: bool,
    authorization: AuthorizationStatus,
    pending_authorization: Option<oneshot::Receiver<AuthorizationStatus>>,
    deliveries: [Option<DeliveryCallback<Vector3>>; 3],
    fused: Option<DeliveryCallback<MotionData>>,
    calls: Vec<AdapterCall>,
}

impl FakeHardwareAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                available: [true; 3],
                fused_available: true,
                authorization: AuthorizationStatus::Authorized,
                pending_authorization: None,
                deliveries: [None, None, None],
                fused: None,
                calls: Vec::new(),
            }),
        }
    }

    pub fn set_available(&self, kind: SensorKind, available: bool) {
        self.inner.lock().available[kind.index()] = available;
    }

    pub fn set_fused_available(&self, available: bool) {
        self.inner.lock().fused_available = available;
    }

    /// Outcome of the next authorization probe.
    pub fn set_authorization(&self, status: AuthorizationStatus) {
        self.inner.lock().authorization = status;
    }

    /// Makes the next authorization probe wait until the returned sender
    /// answers. Dropping the sender answers `Undetermined`.
    pub fn defer_authorization(&self) -> oneshot::Sender<AuthorizationStatus> {
        let (sender, receiver) = oneshot::channel();
        self.inner.lock().pending_authorization = Some(receiver);
        sender
    }

    /// Delivers a reading to the running delivery of `kind`.
    ///
    /// Returns `false` when no delivery is running.
    pub fn emit(&self, kind: SensorKind, value: Vector3) -> bool {
        self.deliver(kind, Delivery::Sample(value))
    }

    /// Signals the end of data on the delivery of `kind`.
    pub fn finish(&self, kind: SensorKind) -> bool {
        self.deliver(kind, Delivery::Finished)
    }

    /// Reports a hardware failure on the delivery of `kind`.
    pub fn fail(&self, kind: SensorKind, reason: &str) -> bool {
        self.deliver(kind, Delivery::Failed(reason.to_owned()))
    }

    pub fn emit_fused(&self, data: MotionData) -> bool {
        self.deliver_fused(Delivery::Sample(data))
    }

    pub fn finish_fused(&self) -> bool {
        self.deliver_fused(Delivery::Finished)
    }

    pub fn fail_fused(&self, reason: &str) -> bool {
        self.deliver_fused(Delivery::Failed(reason.to_owned()))
    }

    fn deliver(&self, kind: SensorKind, delivery: Delivery<Vector3>) -> bool {
        // Invoke outside the lock, as a real driver thread would.
        let callback = self.inner.lock().deliveries[kind.index()].clone();
        callback.map(|callback| callback(delivery)).is_some()
    }

    fn deliver_fused(&self, delivery: Delivery<MotionData>) -> bool {
        let callback = self.inner.lock().fused.clone();
        callback.map(|callback| callback(delivery)).is_some()
    }

    #[must_use]
    pub fn is_delivering(&self, kind: SensorKind) -> bool {
        self.inner.lock().deliveries[kind.index()].is_some()
    }

    #[must_use]
    pub fn is_fused_delivering(&self) -> bool {
        self.inner.lock().fused.is_some()
    }

    /// Every call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.inner.lock().calls.clone()
    }

    #[must_use]
    pub fn count(&self, call: AdapterCall) -> usize {
        self.inner.lock().calls.iter().filter(|c| **c == call).count()
    }

    #[must_use]
    pub fn stop_count(&self, kind: SensorKind) -> usize {
        self.count(AdapterCall::StopDelivery(kind))
    }

    #[must_use]
    pub fn fused_stop_count(&self) -> usize {
        self.count(AdapterCall::StopFusedDelivery)
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }
}

impl Default for FakeHardwareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HardwareAdapter for FakeHardwareAdapter {
    fn is_available(&self, kind: SensorKind) -> bool {
        self.inner.lock().available[kind.index()]
    }

    fn is_fused_available(&self) -> bool {
        self.inner.lock().fused_available
    }

    fn start_delivery(
        &self,
        kind: SensorKind,
        interval: Duration,
        callback: DeliveryCallback<Vector3>,
    ) {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::StartDelivery(kind, interval));
        let previous = inner.deliveries[kind.index()].replace(callback);
        assert!(previous.is_none(), "{kind} delivery started twice");
    }

    fn stop_delivery(&self, kind: SensorKind) {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::StopDelivery(kind));
        let previous = inner.deliveries[kind.index()].take();
        assert!(previous.is_some(), "{kind} delivery stopped while not running");
    }

    fn set_interval(&self, kind: SensorKind, interval: Duration) {
        self.inner
            .lock()
            .calls
            .push(AdapterCall::SetInterval(kind, interval));
    }

    fn start_fused_delivery(&self, interval: Duration, callback: DeliveryCallback<MotionData>) {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::StartFusedDelivery(interval));
        let previous = inner.fused.replace(callback);
        assert!(previous.is_none(), "fused delivery started twice");
    }

    fn stop_fused_delivery(&self) {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::StopFusedDelivery);
        let previous = inner.fused.take();
        assert!(previous.is_some(), "fused delivery stopped while not running");
    }

    fn set_fused_interval(&self, interval: Duration) {
        self.inner
            .lock()
            .calls
            .push(AdapterCall::SetFusedInterval(interval));
    }

    async fn probe_authorization(&self) -> AuthorizationStatus {
        let (pending, status) = {
            let mut inner = self.inner.lock();
            inner.calls.push(AdapterCall::ProbeAuthorization);
            (inner.pending_authorization.take(), inner.authorization)
        };
        match pending {
            Some(receiver) => receiver.await.unwrap_or(AuthorizationStatus::Undetermined),
            None => status,
        }
    }
}
