// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sample payloads produced by motion sensors.
//!
//! Hardware delivers an untyped [`Vector3`]; the manager tags it with the unit
//! of the sensor that produced it.

use crate::sensor::SensorKind;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Raw three-axis reading as delivered by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

macro_rules! define_axes {
    ($(#[$meta:meta])* $name:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name {
            pub x: f64,
            pub y: f64,
            pub z: f64,
        }

        impl $name {
            /// Unit symbol shared by all three axes.
            pub const UNIT: &'static str = $unit;

            #[must_use]
            pub const fn new(x: f64, y: f64, z: f64) -> Self {
                Self { x, y, z }
            }
        }

        impl From<Vector3> for $name {
            fn from(raw: Vector3) -> Self {
                Self::new(raw.x, raw.y, raw.z)
            }
        }

        impl From<$name> for Vector3 {
            fn from(value: $name) -> Self {
                Vector3::new(value.x, value.y, value.z)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "(x: {} {unit}, y: {} {unit}, z: {} {unit})",
                    self.x,
                    self.y,
                    self.z,
                    unit = $unit
                )
            }
        }
    };
}

define_axes!(
    /// Three-axis acceleration in gravitational force.
    Acceleration,
    "g"
);

define_axes!(
    /// Three-axis rotation rate in radians per second.
    RotationRate,
    "rad/s"
);

define_axes!(
    /// Three-axis magnetic field in microteslas.
    MagneticField,
    "µT"
);

/// A reading from one sensor, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sensor", rename_all = "snake_case")]
pub enum Sample {
    Acceleration(Acceleration),
    RotationRate(RotationRate),
    MagneticField(MagneticField),
}

impl Sample {
    /// Tags a raw reading with the unit of `kind`.
    #[must_use]
    pub fn from_raw(kind: SensorKind, raw: Vector3) -> Self {
        match kind {
            SensorKind::Accelerometer => Self::Acceleration(raw.into()),
            SensorKind::Gyroscope => Self::RotationRate(raw.into()),
            SensorKind::Magnetometer => Self::MagneticField(raw.into()),
        }
    }

    /// The sensor that produced this sample.
    #[must_use]
    pub const fn kind(&self) -> SensorKind {
        match self {
            Self::Acceleration(_) => SensorKind::Accelerometer,
            Self::RotationRate(_) => SensorKind::Gyroscope,
            Self::MagneticField(_) => SensorKind::Magnetometer,
        }
    }

    /// The untagged reading.
    #[must_use]
    pub fn raw(&self) -> Vector3 {
        match *self {
            Self::Acceleration(value) => value.into(),
            Self::RotationRate(value) => value.into(),
            Self::MagneticField(value) => value.into(),
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acceleration(value) => write!(f, "{}: {value}", self.kind()),
            Self::RotationRate(value) => write!(f, "{}: {value}", self.kind()),
            Self::MagneticField(value) => write!(f, "{}: {value}", self.kind()),
        }
    }
}

/// One fused reading covering all three sensors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionData {
    pub acceleration: Acceleration,
    pub rotation_rate: RotationRate,
    pub magnetic_field: MagneticField,
}

impl MotionData {
    #[must_use]
    pub const fn new(
        acceleration: Acceleration,
        rotation_rate: RotationRate,
        magnetic_field: MagneticField,
    ) -> Self {
        Self {
            acceleration,
            rotation_rate,
            magnetic_field,
        }
    }

    /// The component of this reading that belongs to `kind`.
    #[must_use]
    pub const fn sample(&self, kind: SensorKind) -> Sample {
        match kind {
            SensorKind::Accelerometer => Sample::Acceleration(self.acceleration),
            SensorKind::Gyroscope => Sample::RotationRate(self.rotation_rate),
            SensorKind::Magnetometer => Sample::MagneticField(self.magnetic_field),
        }
    }
}

impl From<MotionData> for (Acceleration, RotationRate, MagneticField) {
    fn from(data: MotionData) -> Self {
        (data.acceleration, data.rotation_rate, data.magnetic_field)
    }
}
