//! Scene description loading.
//!
//! The text front end is an external collaborator; this module reads the
//! JSON form of its output so the renderer can be driven from files.

use std::path::Path;

use thiserror::Error;

use crate::scene::SceneDescription;

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene description from a JSON file.
///
/// # Example
///
/// ```ignore
/// use lumen_core::load_scene_json;
///
/// let description = load_scene_json("scenes/spheres.json")?;
/// println!("{} objects", description.object_count());
/// ```
pub fn load_scene_json<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let description = load_scene_json_from_string(&contents)?;

    log::info!(
        "Loaded {} with {} objects and {} lights",
        path.display(),
        description.object_count(),
        description.light_count()
    );

    Ok(description)
}

/// Parse a scene description from a JSON string.
pub fn load_scene_json_from_string(contents: &str) -> LoadResult<SceneDescription> {
    Ok(serde_json::from_str(contents)?)
}
