// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::manager::Shared;
use crate::state::{Lease, Target};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::{FusedStream, Stream, StreamExt};
use futures_channel::mpsc::UnboundedReceiver;
use motions_core::{CancellationToken, Cancelled, SensorKind};
use std::sync::{Arc, Weak};

/// Stream of readings from one subscription.
///
/// The stream ends without an error item when:
/// - the hardware reports the end of data or a failure (buffered readings are
///   yielded first),
/// - the subscription is cancelled through [`cancel`](Self::cancel) or the
///   [`CancellationToken`],
/// - the sensor is unsubscribed through the manager.
///
/// Dropping the stream stops the hardware delivery as well.
#[derive(Debug)]
pub struct SensorStream<T> {
    receiver: UnboundedReceiver<T>,
    cancelled: Cancelled,
    subscription: Subscription,
    terminated: bool,
}

impl<T> SensorStream<T> {
    pub(crate) fn new(receiver: UnboundedReceiver<T>, subscription: Subscription) -> Self {
        Self {
            receiver,
            cancelled: subscription.lease.token().cancelled(),
            subscription,
            terminated: false,
        }
    }

    /// Stops the delivery now. Readings not yet consumed are discarded.
    pub fn cancel(&mut self) {
        self.subscription.lease.token().cancel();
        self.terminate();
    }

    /// Token that cancels this stream from anywhere.
    ///
    /// Cancelling it ends the stream at its next poll. The hardware delivery
    /// stops when the stream is next polled or dropped, or when the manager
    /// is next used, whichever comes first. Use [`SensorStream::cancel`] to
    /// stop the hardware immediately.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.subscription.lease.token().clone()
    }

    /// The sensor behind this stream, `None` for the aggregate.
    #[must_use]
    pub fn sensor(&self) -> Option<SensorKind> {
        match self.subscription.lease.target() {
            Target::Sensor(kind) => Some(kind),
            Target::Aggregate => None,
        }
    }

    fn terminate(&mut self) {
        self.terminated = true;
        self.receiver.close();
        self.subscription.release();
    }
}

impl<T> Stream for SensorStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        if self.terminated {
            return Poll::Ready(None);
        }

        if Pin::new(&mut self.cancelled).poll(cx).is_ready() {
            self.terminate();
            return Poll::Ready(None);
        }

        match self.receiver.poll_next_unpin(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
            Poll::Ready(None) => {
                self.terminate();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> FusedStream for SensorStream<T> {
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Ties a stream to its lease and hands the lease back to the manager
/// exactly once.
#[derive(Debug)]
pub(crate) struct Subscription {
    lease: Arc<Lease>,
    shared: Weak<Shared>,
    released: bool,
}

impl Subscription {
    pub(crate) fn new(lease: Arc<Lease>, shared: Weak<Shared>) -> Self {
        Self {
            lease,
            shared,
            released: false,
        }
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        match self.shared.upgrade() {
            Some(shared) => shared.release(&self.lease),
            None => {
                self.lease.token().cancel();
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
