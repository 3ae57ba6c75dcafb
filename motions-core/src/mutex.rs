// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Non-poisoning lock used for all shared state in the motion crates.

pub use parking_lot::{Mutex, MutexGuard};
