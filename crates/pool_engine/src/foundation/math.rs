//! Math types for instance placement
//!
//! Thin aliases over `nalgebra`; spawn placements are expressed in these
//! types and forwarded untouched to the host.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;
