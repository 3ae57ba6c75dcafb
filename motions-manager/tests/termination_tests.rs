// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::FusedStream;
use motions_core::{Sample, SensorKind};
use motions_test_utils::fixtures::{gravity, resting_motion, spin, tilt};
use motions_test_utils::{assert_stream_ended, authorized_manager, expect_next};

#[tokio::test]
async fn test_hardware_failure_ends_stream_silently() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut stream = manager.subscribe(SensorKind::Accelerometer)?;

    // Act
    adapter.emit(SensorKind::Accelerometer, gravity());
    adapter.fail(SensorKind::Accelerometer, "sensor fault");
    adapter.emit(SensorKind::Accelerometer, tilt());

    // Assert
    expect_next(
        &mut stream,
        Sample::from_raw(SensorKind::Accelerometer, gravity()),
    )
    .await;
    assert_stream_ended(&mut stream, 500).await;
    assert!(stream.is_terminated());
    assert!(!manager.is_active(SensorKind::Accelerometer));
    drop(stream);
    assert_eq!(adapter.stop_count(SensorKind::Accelerometer), 1);
    Ok(())
}

#[tokio::test]
async fn test_end_of_data_yields_buffered_samples_first() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut stream = manager.subscribe(SensorKind::Gyroscope)?;

    // Act
    adapter.emit(SensorKind::Gyroscope, spin());
    adapter.emit(SensorKind::Gyroscope, tilt());
    adapter.finish(SensorKind::Gyroscope);

    // Assert: the manager notices the end before the consumer does.
    assert!(!manager.is_active(SensorKind::Gyroscope));
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 1);
    expect_next(&mut stream, Sample::from_raw(SensorKind::Gyroscope, spin())).await;
    expect_next(&mut stream, Sample::from_raw(SensorKind::Gyroscope, tilt())).await;
    assert_stream_ended(&mut stream, 500).await;
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 1);
    Ok(())
}

#[tokio::test]
async fn test_stale_stream_does_not_stop_newer_subscription() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let old = manager.subscribe(SensorKind::Magnetometer)?;
    adapter.finish(SensorKind::Magnetometer);
    assert!(!manager.is_active(SensorKind::Magnetometer));
    let _new = manager.subscribe(SensorKind::Magnetometer)?;

    // Act
    drop(old);

    // Assert
    assert!(manager.is_active(SensorKind::Magnetometer));
    assert!(adapter.is_delivering(SensorKind::Magnetometer));
    assert_eq!(adapter.stop_count(SensorKind::Magnetometer), 1);
    Ok(())
}

#[tokio::test]
async fn test_cancel_after_end_stops_once() -> anyhow::Result<()> {
    let (adapter, manager) = authorized_manager().await;
    let mut stream = manager.subscribe(SensorKind::Accelerometer)?;

    adapter.finish(SensorKind::Accelerometer);
    stream.cancel();

    assert_stream_ended(&mut stream, 500).await;
    assert!(!manager.is_active(SensorKind::Accelerometer));
    assert_eq!(adapter.stop_count(SensorKind::Accelerometer), 1);
    Ok(())
}

#[tokio::test]
async fn test_cancel_racing_with_end_stops_once() -> anyhow::Result<()> {
    let (adapter, manager) = authorized_manager().await;

    for round in 1..=50 {
        // Arrange
        let mut stream = manager.subscribe(SensorKind::Gyroscope)?;

        // Act
        std::thread::scope(|scope| {
            scope.spawn(|| adapter.fail(SensorKind::Gyroscope, "sensor fault"));
            scope.spawn(|| stream.cancel());
        });

        // Assert
        assert_stream_ended(&mut stream, 500).await;
        assert!(!manager.is_active(SensorKind::Gyroscope));
        assert_eq!(adapter.stop_count(SensorKind::Gyroscope), round);
    }
    Ok(())
}

#[tokio::test]
async fn test_fused_failure_ends_aggregate() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let mut stream = manager.subscribe_to_all_sensors()?;

    // Act
    adapter.emit_fused(resting_motion());
    adapter.fail_fused("fusion unavailable");

    // Assert
    expect_next(&mut stream, resting_motion()).await;
    assert_stream_ended(&mut stream, 500).await;
    assert!(!manager.is_aggregate_active());
    assert_eq!(adapter.fused_stop_count(), 1);

    let _acceleration = manager.subscribe(SensorKind::Accelerometer)?;
    Ok(())
}

#[tokio::test]
async fn test_token_cancel_stops_hardware_on_next_manager_use() -> anyhow::Result<()> {
    // Arrange
    let (adapter, manager) = authorized_manager().await;
    let stream = manager.subscribe(SensorKind::Gyroscope)?;
    let token = stream.cancellation_token();

    // Act
    token.cancel();
    let delivering_after_cancel = adapter.is_delivering(SensorKind::Gyroscope);
    let active = manager.is_active(SensorKind::Gyroscope);

    // Assert
    assert!(delivering_after_cancel);
    assert!(!active);
    assert!(!adapter.is_delivering(SensorKind::Gyroscope));
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 1);

    drop(stream);
    assert_eq!(adapter.stop_count(SensorKind::Gyroscope), 1);
    Ok(())
}
