use bevy::prelude::*;

use crate::engine::scene::scene_index::PointUserData;

/// Published when the pointer comes to rest over a new point. Any number of
/// systems may read it; the selection consumer is only one of them.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointIntersection {
    pub entity: Entity,
    pub user_data: PointUserData,
    /// Pointer position in logical window pixels when the hit was made.
    pub viewport_offset: Vec2,
}

pub fn log_intersections(mut intersections: EventReader<PointIntersection>) {
    for intersection in intersections.read() {
        debug!(
            "Intersection: entity {:?}, set {}, point {}, absolute {} at {}",
            intersection.entity,
            intersection.user_data.set_index,
            intersection.user_data.point_index,
            intersection.user_data.absolute_index,
            intersection.viewport_offset
        );
    }
}
