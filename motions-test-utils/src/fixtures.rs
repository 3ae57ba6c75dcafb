// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Readings a phone lying flat on a table would plausibly report.

use motions_core::{Acceleration, MagneticField, MotionData, RotationRate, Vector3};

#[must_use]
pub const fn gravity() -> Vector3 {
    Vector3::new(0.0, 0.0, -1.0)
}

#[must_use]
pub const fn tilt() -> Vector3 {
    Vector3::new(0.5, 0.0, -0.866)
}

#[must_use]
pub const fn spin() -> Vector3 {
    Vector3::new(0.0, 0.0, 1.57)
}

#[must_use]
pub const fn at_rest() -> Vector3 {
    Vector3::new(0.0, 0.0, 0.0)
}

#[must_use]
pub const fn north() -> Vector3 {
    Vector3::new(22.5, -3.1, -41.0)
}

/// Fused reading of a device at rest.
#[must_use]
pub const fn resting_motion() -> MotionData {
    MotionData::new(
        Acceleration::new(0.0, 0.0, -1.0),
        RotationRate::new(0.0, 0.0, 0.0),
        MagneticField::new(22.5, -3.1, -41.0),
    )
}

/// Fused reading of a device turning on the table.
#[must_use]
pub const fn turning_motion() -> MotionData {
    MotionData::new(
        Acceleration::new(0.0, 0.0, -1.0),
        RotationRate::new(0.0, 0.0, 1.57),
        MagneticField::new(-3.1, 22.5, -41.0),
    )
}
