use bevy::prelude::*;
use point_cloud_processing::PointContainer;
use serde::Deserialize;

/// File extension the JSON asset loader claims for point containers.
pub const CONTAINER_EXTENSION: &str = "points.json";

#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ContainerAsset {
    pub container: PointContainer,
}
