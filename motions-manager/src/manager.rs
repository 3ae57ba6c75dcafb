// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::adapter::{Delivery, DeliveryCallback, HardwareAdapter};
use crate::config::ManagerConfig;
use crate::state::{AuthorizationGate, Lease, ManagerState, Target};
use crate::stream::{SensorStream, Subscription};
use core::fmt;
use futures_channel::mpsc::{self, UnboundedSender};
use motions_core::mutex::{Mutex, MutexGuard};
use motions_core::{
    common_frequency, Acceleration, AuthorizationStatus, Frequency, MagneticField, MotionData,
    MotionError, Result, RotationRate, Sample, SensorKind, Vector3,
};
use std::sync::Arc;

/// Latest reading per sensor. Shared with delivery callbacks, which must not
/// hold on to the manager itself.
type LatestSamples = Arc<Mutex<[Option<Sample>; 3]>>;

fn record(latest: &LatestSamples, sample: Sample) {
    latest.lock()[sample.kind().index()] = Some(sample);
}

/// Coordinates subscriptions to the accelerometer, gyroscope, magnetometer
/// and their fused feed.
///
/// Cloning is cheap and every clone shares the same state. Each sensor can be
/// subscribed once at a time, and the fused feed ("aggregate") excludes every
/// individual subscription. Dropping the last handle, or calling
/// [`shutdown`](Self::shutdown), stops all hardware delivery.
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
/// use motions_manager::SensorManager;
/// use motions_core::SensorKind;
///
/// let manager = SensorManager::new(adapter);
/// manager.request_authorization().await?;
///
/// let mut gyroscope = manager.subscribe_to_gyroscope()?;
/// while let Some(rate) = gyroscope.next().await {
///     println!("{rate}");
/// }
/// ```
#[derive(Clone)]
pub struct SensorManager {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    adapter: Arc<dyn HardwareAdapter>,
    state: Mutex<ManagerState>,
    latest: LatestSamples,
}

impl Shared {
    /// Locks the state after reaping finished deliveries.
    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        let mut state = self.state.lock();
        let reaped = state.reap(self.adapter.as_ref());
        if reaped > 0 {
            debug!("Reaped {reaped} ended deliveries");
        }
        state
    }

    /// Hands a lease back from its stream.
    pub(crate) fn release(&self, lease: &Lease) {
        lease.token().cancel();
        let mut state = self.state.lock();
        if let Some(lease) = state.detach(lease.id()) {
            self.stop(&lease);
        }
    }

    /// Stops a lease already removed from the state. Callers hold the lock.
    fn stop(&self, lease: &Lease) {
        lease.token().cancel();
        lease.stop(self.adapter.as_ref());
        match lease.target() {
            Target::Sensor(kind) => debug!("{kind} delivery stopped"),
            Target::Aggregate => debug!("Fused delivery stopped"),
        }
    }

    fn stop_all(&self, state: &mut ManagerState) -> usize {
        let leases = state.take_all();
        for lease in &leases {
            self.stop(lease);
        }
        leases.len()
    }

    fn apply_frequency(&self, state: &mut ManagerState, kind: SensorKind, frequency: Frequency) {
        state.frequencies[kind.index()] = frequency;
        if state.has_individual(kind) {
            self.adapter.set_interval(kind, frequency.interval());
        }

        let Some(common) = common_frequency(state.frequencies) else {
            return;
        };
        if common != state.aggregate_frequency {
            state.aggregate_frequency = common;
            debug!("Aggregate frequency set to {common}");
            if state.is_aggregate_active() {
                self.adapter.set_fused_interval(common.interval());
            }
        }
    }
}

/// Holds the gate in its requesting state while the platform is probed.
///
/// Dropped unsettled, the gate reopens.
struct PendingAuthorization<'a> {
    shared: &'a Shared,
}

impl PendingAuthorization<'_> {
    fn settle(self, status: AuthorizationStatus) {
        self.shared.state.lock().authorization = AuthorizationGate::Decided(status);
    }
}

impl Drop for PendingAuthorization<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if state.authorization == AuthorizationGate::Requesting {
            state.authorization = AuthorizationGate::Undetermined;
            debug!("Authorization request abandoned before the platform answered");
        }
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let leases = self.state.get_mut().take_all();
        if !leases.is_empty() {
            info!("Manager dropped, stopping {} deliveries", leases.len());
        }
        for lease in leases {
            lease.token().cancel();
            lease.stop(self.adapter.as_ref());
        }
    }
}

impl SensorManager {
    /// Creates a manager with every sensor configured at 60 Hz.
    pub fn new(adapter: Arc<dyn HardwareAdapter>) -> Self {
        Self::with_frequency(adapter, Frequency::default())
    }

    /// Creates a manager from a startup configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidFrequency`] if the configured rate is not
    /// a positive number of hertz.
    pub fn with_config(
        adapter: Arc<dyn HardwareAdapter>,
        config: &ManagerConfig,
    ) -> Result<Self> {
        Ok(Self::with_frequency(adapter, config.default_frequency()?))
    }

    fn with_frequency(adapter: Arc<dyn HardwareAdapter>, frequency: Frequency) -> Self {
        Self {
            shared: Arc::new(Shared {
                adapter,
                state: Mutex::new(ManagerState::new(frequency)),
                latest: Arc::new(Mutex::new([None; 3])),
            }),
        }
    }

    /// Asks the platform for motion access. Can only be done once.
    ///
    /// Waits for the platform's answer without a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::NotChangeable`] if authorization was already
    /// decided or a first request is still pending. Dropping a pending
    /// request before the platform answers allows a new one.
    pub async fn request_authorization(&self) -> Result<AuthorizationStatus> {
        let pending = {
            let mut state = self.shared.lock();
            if state.authorization != AuthorizationGate::Undetermined {
                return Err(MotionError::NotChangeable);
            }
            state.authorization = AuthorizationGate::Requesting;
            PendingAuthorization {
                shared: &self.shared,
            }
        };

        let status = self.shared.adapter.probe_authorization().await;
        pending.settle(status);
        info!("Motion authorization resolved as {status}");
        Ok(status)
    }

    #[must_use]
    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.shared.lock().authorization.status()
    }

    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorization_status().is_authorized()
    }

    /// Whether the device has this sensor. Asked from the hardware every time.
    #[must_use]
    pub fn is_available(&self, kind: SensorKind) -> bool {
        self.shared.adapter.is_available(kind)
    }

    /// Whether the fused feed is supported.
    #[must_use]
    pub fn is_all_sensors_available(&self) -> bool {
        self.shared.adapter.is_fused_available()
    }

    /// Whether `kind` is delivering, on its own or through the aggregate.
    #[must_use]
    pub fn is_active(&self, kind: SensorKind) -> bool {
        self.shared.lock().is_sensor_active(kind)
    }

    #[must_use]
    pub fn is_aggregate_active(&self) -> bool {
        self.shared.lock().is_aggregate_active()
    }

    #[must_use]
    pub fn are_any_sensors_active(&self) -> bool {
        self.shared.lock().any_active()
    }

    #[must_use]
    pub fn are_all_sensors_active(&self) -> bool {
        self.shared.lock().all_active()
    }

    /// Configured rate of `kind`.
    #[must_use]
    pub fn frequency(&self, kind: SensorKind) -> Frequency {
        self.shared.lock().frequencies[kind.index()]
    }

    /// Rate the fused feed runs (or will run) at.
    #[must_use]
    pub fn aggregate_frequency(&self) -> Frequency {
        self.shared.lock().aggregate_frequency
    }

    /// Latest reading of `kind`, from its own delivery or the fused feed.
    #[must_use]
    pub fn last_sample(&self, kind: SensorKind) -> Option<Sample> {
        self.shared.latest.lock()[kind.index()]
    }

    /// Starts delivery of `kind` at its configured rate.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`MotionError::Unavailable`] if the device lacks the sensor,
    /// - [`MotionError::NotAuthorized`] before authorization was granted,
    /// - [`MotionError::Unresubscribable`] if the sensor or the aggregate is
    ///   already active.
    pub fn subscribe(&self, kind: SensorKind) -> Result<SensorStream<Sample>> {
        self.subscribe_with(kind, move |raw| Sample::from_raw(kind, raw))
    }

    /// Typed form of [`subscribe`](Self::subscribe) for the accelerometer.
    ///
    /// # Errors
    ///
    /// Same as [`subscribe`](Self::subscribe).
    pub fn subscribe_to_accelerometer(&self) -> Result<SensorStream<Acceleration>> {
        self.subscribe_with(SensorKind::Accelerometer, Acceleration::from)
    }

    /// Typed form of [`subscribe`](Self::subscribe) for the gyroscope.
    ///
    /// # Errors
    ///
    /// Same as [`subscribe`](Self::subscribe).
    pub fn subscribe_to_gyroscope(&self) -> Result<SensorStream<RotationRate>> {
        self.subscribe_with(SensorKind::Gyroscope, RotationRate::from)
    }

    /// Typed form of [`subscribe`](Self::subscribe) for the magnetometer.
    ///
    /// # Errors
    ///
    /// Same as [`subscribe`](Self::subscribe).
    pub fn subscribe_to_magnetometer(&self) -> Result<SensorStream<MagneticField>> {
        self.subscribe_with(SensorKind::Magnetometer, MagneticField::from)
    }

    fn subscribe_with<T, F>(&self, kind: SensorKind, map: F) -> Result<SensorStream<T>>
    where
        T: Send + 'static,
        F: Fn(Vector3) -> T + Send + Sync + 'static,
    {
        let mut state = self.shared.lock();
        if !self.shared.adapter.is_available(kind) {
            return Err(MotionError::Unavailable(Some(kind)));
        }
        if !state.authorization.status().is_authorized() {
            return Err(MotionError::NotAuthorized);
        }
        if state.is_sensor_active(kind) {
            return Err(MotionError::Unresubscribable(Some(kind)));
        }

        let interval = state.frequencies[kind.index()].interval();
        let lease = state.lease(Target::Sensor(kind));
        state.attach(Arc::clone(&lease));

        let (sender, receiver) = mpsc::unbounded();
        let latest = Arc::clone(&self.shared.latest);
        let callback = delivery_callback(Arc::clone(&lease), sender, move |raw: Vector3| {
            record(&latest, Sample::from_raw(kind, raw));
            map(raw)
        });
        self.shared.adapter.start_delivery(kind, interval, callback);
        info!("Subscribed to {kind} every {interval:?}");

        Ok(SensorStream::new(
            receiver,
            Subscription::new(lease, Arc::downgrade(&self.shared)),
        ))
    }

    /// Stops delivery of `kind`.
    ///
    /// While the aggregate is active this stops the whole fused feed, leaving
    /// all three sensors inactive.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Inactive`] if neither `kind` nor the aggregate
    /// is active.
    pub fn unsubscribe(&self, kind: SensorKind) -> Result<()> {
        let mut state = self.shared.lock();
        let lease = state.take(kind).ok_or(MotionError::Inactive(kind))?;
        self.shared.stop(&lease);
        info!("Unsubscribed from {kind}");
        Ok(())
    }

    /// Starts the fused feed of all three sensors.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`MotionError::Unavailable`] (`None`) if fused delivery is unsupported,
    /// - [`MotionError::NotAuthorized`] before authorization was granted,
    /// - [`MotionError::Unresubscribable`] (`None`) if any sensor or the
    ///   aggregate is already active,
    /// - [`MotionError::UnequalFrequencies`] unless all three sensors are
    ///   configured at the same rate.
    pub fn subscribe_to_all_sensors(&self) -> Result<SensorStream<MotionData>> {
        let mut state = self.shared.lock();
        if !self.shared.adapter.is_fused_available() {
            return Err(MotionError::Unavailable(None));
        }
        if !state.authorization.status().is_authorized() {
            return Err(MotionError::NotAuthorized);
        }
        if state.any_active() {
            return Err(MotionError::Unresubscribable(None));
        }
        let frequency =
            common_frequency(state.frequencies).ok_or(MotionError::UnequalFrequencies)?;

        state.aggregate_frequency = frequency;
        let lease = state.lease(Target::Aggregate);
        state.attach(Arc::clone(&lease));

        let (sender, receiver) = mpsc::unbounded();
        let latest = Arc::clone(&self.shared.latest);
        let callback = delivery_callback(Arc::clone(&lease), sender, move |data: MotionData| {
            for kind in SensorKind::ALL {
                record(&latest, data.sample(kind));
            }
            data
        });
        self.shared
            .adapter
            .start_fused_delivery(frequency.interval(), callback);
        info!("Subscribed to all sensors at {frequency}");

        Ok(SensorStream::new(
            receiver,
            Subscription::new(lease, Arc::downgrade(&self.shared)),
        ))
    }

    /// Sets the rate of `kind`, applying it to a running delivery.
    ///
    /// When all three sensors end up at the same rate, the aggregate follows.
    pub fn update(&self, kind: SensorKind, frequency: Frequency) {
        let mut state = self.shared.lock();
        self.shared.apply_frequency(&mut state, kind, frequency);
    }

    /// Sets every sensor and the aggregate to `frequency`.
    pub fn update_all_sensors(&self, frequency: Frequency) {
        let mut state = self.shared.lock();
        for kind in SensorKind::ALL {
            self.shared.apply_frequency(&mut state, kind, frequency);
        }
        debug_assert_eq!(state.aggregate_frequency, frequency);
    }

    /// Stops the aggregate if it is active, otherwise every active sensor.
    pub fn unsubscribe_from_all(&self) {
        let mut state = self.shared.lock();
        let stopped = self.shared.stop_all(&mut state);
        debug!("Unsubscribed from {stopped} deliveries");
    }

    /// Stops every delivery. The manager stays usable afterwards.
    pub fn shutdown(&self) {
        let mut state = self.shared.lock();
        let stopped = self.shared.stop_all(&mut state);
        info!("Sensor manager shut down, {stopped} deliveries stopped");
    }
}

impl fmt::Debug for SensorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        let active: Vec<SensorKind> = SensorKind::ALL
            .into_iter()
            .filter(|kind| state.is_sensor_active(*kind))
            .collect();
        f.debug_struct("SensorManager")
            .field("authorization", &state.authorization.status())
            .field("aggregate", &state.is_aggregate_active())
            .field("active", &active)
            .field("frequencies", &state.frequencies)
            .finish()
    }
}

/// Builds the callback handed to the adapter for one lease.
///
/// Readings go through `on_sample` into the stream's channel. The first end or
/// failure flags the lease and closes the channel; the manager stops the
/// hardware the next time it sees the flag.
fn delivery_callback<U, T>(
    lease: Arc<Lease>,
    sender: UnboundedSender<T>,
    on_sample: impl Fn(U) -> T + Send + Sync + 'static,
) -> DeliveryCallback<U>
where
    U: 'static,
    T: Send + 'static,
{
    Arc::new(move |delivery: Delivery<U>| {
        if !lease.is_live() {
            return;
        }
        match delivery {
            Delivery::Sample(value) => {
                // The receiver may already be gone.
                let _ = sender.unbounded_send(on_sample(value));
            }
            Delivery::Finished => {
                if lease.finish() {
                    debug!("Delivery {} finished", lease.id());
                    sender.close_channel();
                }
            }
            Delivery::Failed(reason) => {
                if lease.finish() {
                    warn!("Delivery {} failed: {reason}", lease.id());
                    sender.close_channel();
                }
            }
        }
    })
}
