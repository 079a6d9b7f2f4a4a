//! Lumen Core - Scene description types for the Lumen ray tracer.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `CameraDescription`,
//!   `LightDescription`, `ObjectDescription`, `Geometry`, `Attributes`,
//!   `Finish`, `TransformOp`
//! - **Loading**: JSON scene description files
//! - **Reporting**: a plain-text scene summary
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_scene_json;
//!
//! // Load a scene description
//! let description = load_scene_json("scene.json")?;
//! println!("{}", description.summary());
//! ```

pub mod loader;
pub mod scene;
mod summary;

// Re-export commonly used types
pub use loader::{load_scene_json, load_scene_json_from_string, LoadError, LoadResult};
pub use scene::{
    Attributes, CameraDescription, Finish, Geometry, LightDescription, ObjectDescription,
    SceneDescription, TransformOp,
};
