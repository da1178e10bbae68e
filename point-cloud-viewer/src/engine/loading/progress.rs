use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub container_requested: bool,
    pub container_loaded: bool,
    pub point_sets_built: bool,
    pub scene_spawned: bool,
}

impl LoadingProgress {
    /// The container has been requested and not yet turned into point sets.
    pub fn awaiting_container(&self) -> bool {
        self.container_requested && !self.point_sets_built
    }

    pub fn is_complete(&self) -> bool {
        self.container_requested
            && self.container_loaded
            && self.point_sets_built
            && self.scene_spawned
    }
}
