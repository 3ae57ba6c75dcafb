// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod adapter;
pub mod config;
pub mod manager;
mod state;
pub mod stream;

// Re-export commonly used types
pub use adapter::{Delivery, DeliveryCallback, HardwareAdapter};
pub use config::ManagerConfig;
pub use manager::SensorManager;
pub use stream::SensorStream;
