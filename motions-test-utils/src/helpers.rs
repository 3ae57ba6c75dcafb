// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::fake_adapter::FakeHardwareAdapter;
use core::fmt::Debug;
use futures::stream::StreamExt;
use futures::Stream;
use motions_manager::SensorManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!(
                "Unexpected item emitted, expected no output."
            );
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Awaits the next item and compares it with `expected`.
pub async fn expect_next<S, T>(stream: &mut S, expected: T)
where
    S: Stream<Item = T> + Unpin,
    T: PartialEq + Debug,
{
    let item = timeout(Duration::from_millis(500), stream.next())
        .await
        .expect("Timeout: No item received within 500 ms")
        .expect("expected next item but stream ended");
    assert_eq!(item, expected);
}

/// Asserts the stream ends within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(item)) => panic!("Expected stream to end but got {item:?}"),
        Err(_) => panic!("Timeout: stream did not end within {timeout_ms} ms"),
    }
}

/// A fake adapter and a manager that has already been authorized.
pub async fn authorized_manager() -> (Arc<FakeHardwareAdapter>, SensorManager) {
    let adapter = Arc::new(FakeHardwareAdapter::new());
    let manager = SensorManager::new(adapter.clone());
    manager
        .request_authorization()
        .await
        .expect("first authorization request");
    (adapter, manager)
}
