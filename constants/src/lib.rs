//! Shared settings for the point cloud processing tools and the viewer.

pub mod colour;
pub mod record;
pub mod render_settings;
pub mod synthetic;
