// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use motions_core::{AuthorizationStatus, MotionError, SensorKind};
use motions_manager::SensorManager;
use motions_test_utils::{AdapterCall, FakeHardwareAdapter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_request_authorization_twice_is_not_changeable() -> anyhow::Result<()> {
    for outcome in [
        AuthorizationStatus::Authorized,
        AuthorizationStatus::Denied,
        AuthorizationStatus::Restricted,
    ] {
        // Arrange
        let adapter = Arc::new(FakeHardwareAdapter::new());
        adapter.set_authorization(outcome);
        let manager = SensorManager::new(adapter.clone());

        // Act
        let first = manager.request_authorization().await?;
        let second = manager.request_authorization().await;

        // Assert
        assert_eq!(first, outcome);
        assert_eq!(second, Err(MotionError::NotChangeable));
        assert_eq!(manager.authorization_status(), outcome);
        assert_eq!(adapter.count(AdapterCall::ProbeAuthorization), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_fresh_manager_is_undetermined() {
    let manager = SensorManager::new(Arc::new(FakeHardwareAdapter::new()));

    assert_eq!(
        manager.authorization_status(),
        AuthorizationStatus::Undetermined
    );
    assert!(!manager.is_authorized());
}

#[tokio::test]
async fn test_denied_authorization_blocks_subscriptions() -> anyhow::Result<()> {
    let adapter = Arc::new(FakeHardwareAdapter::new());
    adapter.set_authorization(AuthorizationStatus::Denied);
    let manager = SensorManager::new(adapter.clone());

    manager.request_authorization().await?;

    assert!(!manager.is_authorized());
    assert_eq!(
        manager.subscribe(SensorKind::Accelerometer).err(),
        Some(MotionError::NotAuthorized)
    );
    assert!(adapter
        .calls()
        .iter()
        .all(|call| *call == AdapterCall::ProbeAuthorization));
    Ok(())
}

#[tokio::test]
async fn test_request_while_pending_is_not_changeable() -> anyhow::Result<()> {
    // Arrange
    let adapter = Arc::new(FakeHardwareAdapter::new());
    let answer = adapter.defer_authorization();
    let manager = SensorManager::new(adapter.clone());

    let pending = tokio::spawn({
        let manager = manager.clone();
        async move { manager.request_authorization().await }
    });
    while adapter.count(AdapterCall::ProbeAuthorization) == 0 {
        sleep(Duration::from_millis(5)).await;
    }

    // Act
    let concurrent = manager.request_authorization().await;

    // Assert
    assert_eq!(concurrent, Err(MotionError::NotChangeable));
    assert_eq!(
        manager.authorization_status(),
        AuthorizationStatus::Undetermined
    );

    answer
        .send(AuthorizationStatus::Authorized)
        .map_err(|_| anyhow::anyhow!("probe dropped"))?;
    assert_eq!(pending.await??, AuthorizationStatus::Authorized);
    assert!(manager.is_authorized());
    assert_eq!(adapter.count(AdapterCall::ProbeAuthorization), 1);
    Ok(())
}

#[tokio::test]
async fn test_abandoned_request_can_be_retried() -> anyhow::Result<()> {
    // Arrange
    let adapter = Arc::new(FakeHardwareAdapter::new());
    let answer = adapter.defer_authorization();
    let manager = SensorManager::new(adapter.clone());

    // Act
    let abandoned =
        tokio::time::timeout(Duration::from_millis(20), manager.request_authorization()).await;
    drop(answer);
    let status_after_abandon = manager.authorization_status();
    let retried = manager.request_authorization().await;

    // Assert
    assert!(abandoned.is_err());
    assert_eq!(status_after_abandon, AuthorizationStatus::Undetermined);
    assert_eq!(retried, Ok(AuthorizationStatus::Authorized));
    assert!(manager.is_authorized());
    assert_eq!(
        manager.request_authorization().await,
        Err(MotionError::NotChangeable)
    );
    assert_eq!(adapter.count(AdapterCall::ProbeAuthorization), 2);
    Ok(())
}
