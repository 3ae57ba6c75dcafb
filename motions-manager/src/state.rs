// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bookkeeping guarded by the manager's state mutex.
//!
//! A [`Lease`] stored in [`ManagerState`] always has a running hardware
//! delivery behind it. Removing a lease from the state and calling
//! [`Lease::stop`] happen together, under the lock, so every delivery is
//! stopped exactly once no matter which path tears it down.

use crate::adapter::HardwareAdapter;
use core::sync::atomic::{AtomicBool, Ordering};
use motions_core::{AuthorizationStatus, CancellationToken, Frequency, SensorKind};
use std::sync::Arc;

/// What a lease delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Sensor(SensorKind),
    Aggregate,
}

/// Record of one running delivery.
#[derive(Debug)]
pub(crate) struct Lease {
    id: u64,
    target: Target,
    token: CancellationToken,
    finished: AtomicBool,
}

impl Lease {
    fn new(id: u64, target: Target) -> Self {
        Self {
            id,
            target,
            token: CancellationToken::new(),
            finished: AtomicBool::new(false),
        }
    }

    pub(crate) const fn id(&self) -> u64 {
        self.id
    }

    pub(crate) const fn target(&self) -> Target {
        self.target
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Marks the hardware side as done. Returns `true` for the first caller.
    pub(crate) fn finish(&self) -> bool {
        !self.finished.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Whether callbacks should still be forwarded.
    pub(crate) fn is_live(&self) -> bool {
        !self.is_finished() && !self.token.is_cancelled()
    }

    /// Needs reaping: the hardware ended or a consumer cancelled the token.
    fn is_spent(&self) -> bool {
        !self.is_live()
    }

    pub(crate) fn stop(&self, adapter: &dyn HardwareAdapter) {
        match self.target {
            Target::Sensor(kind) => adapter.stop_delivery(kind),
            Target::Aggregate => adapter.stop_fused_delivery(),
        }
    }
}

/// Who owns hardware delivery right now.
///
/// The aggregate holds all three sensors at once, so it can only be entered
/// from an empty `Individual` and leaving it empties every slot.
#[derive(Debug)]
pub(crate) enum Activity {
    Individual([Option<Arc<Lease>>; 3]),
    Aggregate(Arc<Lease>),
}

impl Activity {
    const IDLE: Self = Self::Individual([None, None, None]);
}

/// One-shot authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthorizationGate {
    Undetermined,
    Requesting,
    Decided(AuthorizationStatus),
}

impl AuthorizationGate {
    pub(crate) const fn status(self) -> AuthorizationStatus {
        match self {
            Self::Decided(status) => status,
            Self::Undetermined | Self::Requesting => AuthorizationStatus::Undetermined,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ManagerState {
    pub(crate) activity: Activity,
    pub(crate) frequencies: [Frequency; 3],
    pub(crate) aggregate_frequency: Frequency,
    pub(crate) authorization: AuthorizationGate,
    next_lease: u64,
}

impl ManagerState {
    pub(crate) const fn new(frequency: Frequency) -> Self {
        Self {
            activity: Activity::IDLE,
            frequencies: [frequency; 3],
            aggregate_frequency: frequency,
            authorization: AuthorizationGate::Undetermined,
            next_lease: 0,
        }
    }

    /// Allocates a lease with a fresh id. The caller installs it.
    pub(crate) fn lease(&mut self, target: Target) -> Arc<Lease> {
        self.next_lease += 1;
        Arc::new(Lease::new(self.next_lease, target))
    }

    pub(crate) fn is_sensor_active(&self, kind: SensorKind) -> bool {
        match &self.activity {
            Activity::Individual(leases) => leases[kind.index()].is_some(),
            Activity::Aggregate(_) => true,
        }
    }

    /// Whether `kind` has a delivery of its own (not through the aggregate).
    pub(crate) fn has_individual(&self, kind: SensorKind) -> bool {
        matches!(&self.activity, Activity::Individual(leases) if leases[kind.index()].is_some())
    }

    pub(crate) const fn is_aggregate_active(&self) -> bool {
        matches!(self.activity, Activity::Aggregate(_))
    }

    pub(crate) fn any_active(&self) -> bool {
        match &self.activity {
            Activity::Individual(leases) => leases.iter().any(Option::is_some),
            Activity::Aggregate(_) => true,
        }
    }

    pub(crate) fn all_active(&self) -> bool {
        match &self.activity {
            Activity::Individual(leases) => leases.iter().all(Option::is_some),
            Activity::Aggregate(_) => true,
        }
    }

    /// Installs an individual lease into its (empty) slot.
    pub(crate) fn attach(&mut self, lease: Arc<Lease>) {
        match (lease.target(), &mut self.activity) {
            (Target::Sensor(kind), Activity::Individual(leases)) => {
                debug_assert!(leases[kind.index()].is_none());
                leases[kind.index()] = Some(lease);
            }
            (Target::Aggregate, activity) => {
                debug_assert!(!matches!(activity, Activity::Aggregate(_)));
                *activity = Activity::Aggregate(lease);
            }
            (Target::Sensor(_), Activity::Aggregate(_)) => {
                debug_assert!(false, "sensor lease attached while the aggregate is active");
            }
        }
    }

    /// Removes whatever lease currently covers `kind`: its own, or the
    /// aggregate's.
    pub(crate) fn take(&mut self, kind: SensorKind) -> Option<Arc<Lease>> {
        if let Activity::Individual(leases) = &mut self.activity {
            return leases[kind.index()].take();
        }
        self.take_all().pop()
    }

    /// Removes the lease with this id, if it is still installed.
    pub(crate) fn detach(&mut self, id: u64) -> Option<Arc<Lease>> {
        match &mut self.activity {
            Activity::Individual(leases) => leases
                .iter_mut()
                .find(|slot| matches!(slot, Some(lease) if lease.id() == id))
                .and_then(Option::take),
            Activity::Aggregate(lease) => {
                if lease.id() != id {
                    return None;
                }
                self.take_all().pop()
            }
        }
    }

    /// Empties every slot and returns the leases that were installed.
    pub(crate) fn take_all(&mut self) -> Vec<Arc<Lease>> {
        match core::mem::replace(&mut self.activity, Activity::IDLE) {
            Activity::Individual(leases) => leases.into_iter().flatten().collect(),
            Activity::Aggregate(lease) => vec![lease],
        }
    }

    /// Stops and removes leases whose hardware ended or whose token was
    /// cancelled without the stream noticing yet.
    ///
    /// The tokens of finished leases are left alone so their streams still
    /// yield what was buffered before the end.
    pub(crate) fn reap(&mut self, adapter: &dyn HardwareAdapter) -> usize {
        let mut reaped = 0;
        match &mut self.activity {
            Activity::Individual(leases) => {
                for slot in leases.iter_mut() {
                    if matches!(slot, Some(lease) if lease.is_spent()) {
                        if let Some(lease) = slot.take() {
                            lease.stop(adapter);
                            reaped += 1;
                        }
                    }
                }
            }
            Activity::Aggregate(lease) => {
                if lease.is_spent() {
                    lease.stop(adapter);
                    self.activity = Activity::IDLE;
                    reaped += 1;
                }
            }
        }
        reaped
    }
}
