// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use motions_core::{MotionError, SensorKind};
use motions_test_utils::fixtures::gravity;
use motions_test_utils::{assert_stream_ended, authorized_manager};

#[tokio::test]
async fn test_unsubscribe_never_subscribed_is_inactive() {
    let (adapter, manager) = authorized_manager().await;

    for kind in SensorKind::ALL {
        assert_eq!(manager.unsubscribe(kind), Err(MotionError::Inactive(kind)));
    }
    assert_eq!(adapter.calls().len(), 1);
}

#[tokio::test]
async fn test_unsubscribe_ends_stream() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut stream = manager.subscribe(SensorKind::Gyroscope)?;

    // Act
    manager.unsubscribe(SensorKind::Gyroscope)?;

    // Assert
    assert!(!manager.is_active(SensorKind::Gyroscope));
    assert_stream_ended(&mut stream, 500).await;
    drop(stream);
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 1);
    Ok(())
}

#[tokio::test]
async fn test_second_unsubscribe_is_reported() -> anyhow::Result<()> {
    let (_adapter, manager) = authorized_manager().await;
    let _stream = manager.subscribe(SensorKind::Magnetometer)?;

    manager.unsubscribe(SensorKind::Magnetometer)?;

    assert_eq!(
        manager.unsubscribe(SensorKind::Magnetometer),
        Err(MotionError::Inactive(SensorKind::Magnetometer))
    );
    Ok(())
}

#[tokio::test]
async fn test_unsubscribe_leaves_other_sensors_running() -> anyhow::Result<()> {
    let (adapter, manager) = authorized_manager().await;
    let _acceleration = manager.subscribe(SensorKind::Accelerometer)?;
    let _rotation = manager.subscribe(SensorKind::Gyroscope)?;

    manager.unsubscribe(SensorKind::Accelerometer)?;

    assert!(manager.is_active(SensorKind::Gyroscope));
    assert!(manager.are_any_sensors_active());
    assert!(!manager.are_all_sensors_active());
    assert!(adapter.is_delivering(SensorKind::Gyroscope));
    Ok(())
}

#[tokio::test]
async fn test_unsubscribe_from_all_stops_every_sensor() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut acceleration = manager.subscribe(SensorKind::Accelerometer)?;
    let mut field = manager.subscribe(SensorKind::Magnetometer)?;

    // Act
    manager.unsubscribe_from_all();

    // Assert
    assert!(!manager.are_any_sensors_active());
    assert_eq!(adapter.stop_count(SensorKind::Accelerometer), 1);
    assert_eq!(adapter.stop_count(SensorKind::Magnetometer), 1);
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 0);
    assert_stream_ended(&mut acceleration, 500).await;
    assert_stream_ended(&mut field, 500).await;
    Ok(())
}

#[tokio::test]
async fn test_unsubscribe_from_all_with_nothing_active() {
    let (adapter, manager) = authorized_manager().await;

    manager.unsubscribe_from_all();

    assert_eq!(adapter.calls().len(), 1);
}

#[tokio::test]
async fn test_shutdown_stops_everything_and_keeps_manager_usable() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut rotation = manager.subscribe(SensorKind::Gyroscope)?;
    let mut field = manager.subscribe(SensorKind::Magnetometer)?;

    // Act
    manager.shutdown();

    // Assert
    assert_stream_ended(&mut rotation, 500).await;
    assert_stream_ended(&mut field, 500).await;
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 1);
    assert_eq!(adapter.stop_count(SensorKind::Magnetometer), 1);

    let _again = manager.subscribe(SensorKind::Gyroscope)?;
    assert!(manager.is_active(SensorKind::Gyroscope));
    Ok(())
}

#[tokio::test]
async fn test_dropping_manager_stops_delivery() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut stream = manager.subscribe(SensorKind::Accelerometer)?;
    let clone = manager.clone();
    drop(manager);
    assert!(adapter.is_delivering(SensorKind::Accelerometer));

    // Act
    drop(clone);

    // Assert
    assert!(!adapter.is_delivering(SensorKind::Accelerometer));
    assert!(!adapter.emit(SensorKind::Accelerometer, gravity()));
    assert_stream_ended(&mut stream, 500).await;
    drop(stream);
    assert_eq!(adapter.stop_count(SensorKind::Accelerometer), 1);
    Ok(())
}
