// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the motions workspace.
//!
//! This crate is for development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `FakeHardwareAdapter`
//!
//! An in-memory sensor driver. Tests hand it to a `SensorManager`, then push
//! readings, end or fail deliveries, and inspect every call the manager made:
//!
//! ```rust
//! use motions_core::SensorKind;
//! use motions_test_utils::{fixtures::gravity, AdapterCall, FakeHardwareAdapter};
//! use motions_manager::SensorManager;
//! use std::sync::Arc;
//!
//! # async fn example() -> motions_core::Result<()> {
//! let adapter = Arc::new(FakeHardwareAdapter::new());
//! let manager = SensorManager::new(adapter.clone());
//! manager.request_authorization().await?;
//!
//! let _stream = manager.subscribe(SensorKind::Accelerometer)?;
//! assert!(adapter.emit(SensorKind::Accelerometer, gravity()));
//! assert_eq!(adapter.count(AdapterCall::ProbeAuthorization), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Assertion helpers
//!
//! ```rust
//! use motions_test_utils::assert_no_element_emitted;
//! use futures::stream;
//!
//! # async fn example() {
//! let mut empty = stream::pending::<i32>();
//! assert_no_element_emitted(&mut empty, 10).await;
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `fake_adapter` - `FakeHardwareAdapter` and the recorded `AdapterCall`s
//! - `fixtures` - sample readings
//! - `helpers` - assertion and setup functions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fake_adapter;
pub mod fixtures;
pub mod helpers;

// Re-export commonly used test utilities
pub use fake_adapter::{AdapterCall, FakeHardwareAdapter};
pub use helpers::{assert_no_element_emitted, assert_stream_ended, authorized_manager, expect_next};
