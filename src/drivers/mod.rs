//! Sensor drivers composed from the field primitives
//!
//! Each driver is a register map of `const` fields plus the unit conversions for its
//! outputs. None of them add behavior beyond what the fields provide.

pub mod lis2mdl;
pub mod mcp9808;
pub mod mpu6050;

pub use lis2mdl::Lis2mdl;
pub use mcp9808::Mcp9808;
pub use mpu6050::Mpu6050;

/// Three-axis reading in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    /// X axis
    pub x: f32,
    /// Y axis
    pub y: f32,
    /// Z axis
    pub z: f32,
}

impl Vector3 {
    /// Create a new vector
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
