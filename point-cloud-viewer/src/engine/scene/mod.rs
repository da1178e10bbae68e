//! Scene construction for the decoded point sets.

/// Flat registry joining rendered point entities to absolute indices.
pub mod scene_index;

/// Point cloud group and per-point sphere entities.
pub mod point_cloud;

/// Translucent bounding cube, its outlines and the lighting rig.
pub mod bounding_cube;
