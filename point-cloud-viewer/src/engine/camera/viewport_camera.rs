use bevy::prelude::*;
use constants::render_settings::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_POSITION};

use crate::engine::interaction::selection_controller::SelectionController;

#[derive(Component)]
pub struct ViewportCamera;

pub fn spawn_viewport_camera(mut commands: Commands) {
    let [x, y, z] = CAMERA_POSITION;
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
        ViewportCamera,
    ));
}

/// Vertical field of view for a zoom factor. Zooming narrows the view
/// without moving the camera.
pub fn fov_for_zoom(base_fov: f32, zoom: f32) -> f32 {
    2.0 * ((base_fov * 0.5).tan() / zoom).atan()
}

/// Recompute the projection whenever the controller's zoom changes.
pub fn apply_camera_zoom(
    controller: Res<SelectionController>,
    mut cameras: Query<&mut Projection, With<ViewportCamera>>,
) {
    let fov = fov_for_zoom(CAMERA_FOV_DEGREES.to_radians(), controller.zoom());
    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            if (perspective.fov - fov).abs() > f32::EPSILON {
                perspective.fov = fov;
            }
        }
    }
}
