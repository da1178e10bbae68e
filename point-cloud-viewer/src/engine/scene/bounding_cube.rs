use bevy::prelude::*;
use constants::colour::{
    AMBIENT_LIGHT_BRIGHTNESS, AMBIENT_LIGHT_RGB, AXIS_LINE_RGB, BOUNDING_CUBE_EDGE_RGB,
    BOUNDING_CUBE_FACE_OPACITY, BOUNDING_CUBE_FACE_RGB, KEY_LIGHT_ILLUMINANCE, KEY_LIGHT_RGB,
    hex_to_rgb,
};
use constants::render_settings::{
    BOUNDING_CUBE_EDGE_PADDING, BOUNDING_CUBE_PADDING, KEY_LIGHT_POSITION,
};

/// Parent of the cube faces. Rotated together with the point cloud group.
#[derive(Component)]
pub struct CubeBackgroundGroup;

/// Closed outline of one cube face: four corners plus the first repeated.
pub type FaceLoop = [Vec3; 5];

fn hex_colour(hex: u32) -> Color {
    let [r, g, b] = hex_to_rgb(hex);
    Color::srgb_u8(r, g, b)
}

pub fn spawn_bounding_cube(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = 1.0 + 2.0 * BOUNDING_CUBE_PADDING + BOUNDING_CUBE_EDGE_PADDING;
    let faces = meshes.add(Cuboid::new(size, size, size));
    let material = materials.add(StandardMaterial {
        base_color: hex_colour(BOUNDING_CUBE_FACE_RGB).with_alpha(BOUNDING_CUBE_FACE_OPACITY),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Name::new("CubeBackgroundGroup"),
            CubeBackgroundGroup,
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((Mesh3d(faces), MeshMaterial3d(material)));
        });
}

pub fn spawn_lighting(mut commands: Commands) {
    let [x, y, z] = KEY_LIGHT_POSITION;
    commands.spawn((
        DirectionalLight {
            color: hex_colour(KEY_LIGHT_RGB),
            illuminance: KEY_LIGHT_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: hex_colour(AMBIENT_LIGHT_RGB),
        brightness: AMBIENT_LIGHT_BRIGHTNESS,
        ..default()
    });
}

/// Outline the six faces and the reference axis, following the group's
/// current orientation.
pub fn draw_bounding_cube(
    mut gizmos: Gizmos,
    groups: Query<&GlobalTransform, With<CubeBackgroundGroup>>,
) {
    let edge_colour = hex_colour(BOUNDING_CUBE_EDGE_RGB);
    let axis_colour = hex_colour(AXIS_LINE_RGB);

    for transform in &groups {
        for face in cube_face_loops(BOUNDING_CUBE_PADDING) {
            gizmos.linestrip(
                face.iter().map(|corner| transform.transform_point(*corner)),
                edge_colour,
            );
        }
        let (start, end) = axis_line(BOUNDING_CUBE_PADDING);
        gizmos.line(
            transform.transform_point(start),
            transform.transform_point(end),
            axis_colour,
        );
    }
}

/// Face outlines of the unit cube grown by `padding` on every side, in the
/// order bottom, top, left, right, front, back.
pub fn cube_face_loops(padding: f32) -> [FaceLoop; 6] {
    let lo = -0.5 - padding;
    let hi = 0.5 + padding;
    let v = Vec3::new;
    [
        [v(lo, lo, hi), v(hi, lo, hi), v(hi, lo, lo), v(lo, lo, lo), v(lo, lo, hi)],
        [v(hi, hi, lo), v(lo, hi, lo), v(lo, hi, hi), v(hi, hi, hi), v(hi, hi, lo)],
        [v(lo, lo, hi), v(lo, lo, lo), v(lo, hi, lo), v(lo, hi, hi), v(lo, lo, hi)],
        [v(hi, hi, lo), v(hi, lo, lo), v(hi, lo, hi), v(hi, hi, hi), v(hi, hi, lo)],
        [v(lo, hi, hi), v(hi, hi, hi), v(hi, lo, hi), v(lo, lo, hi), v(lo, hi, hi)],
        [v(lo, hi, lo), v(hi, hi, lo), v(hi, lo, lo), v(lo, lo, lo), v(lo, hi, lo)],
    ]
}

/// Red X axis along the bottom of the cube, centred in depth.
pub fn axis_line(padding: f32) -> (Vec3, Vec3) {
    let lo = -0.5 - padding;
    let hi = 0.5 + padding;
    (Vec3::new(lo, lo, 0.0), Vec3::new(hi, lo, 0.0))
}
