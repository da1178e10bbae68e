//! Perspective camera looking at the bounding cube.

/// Camera spawning and zoom-driven field of view.
pub mod viewport_camera;
