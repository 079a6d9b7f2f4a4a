// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// RGB color with linear components, nominally in [0, 1].
pub type Color = Vec3;
