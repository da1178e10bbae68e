use bevy::prelude::*;
use constants::render_settings::{POINT_MESH_SCALE_DEFAULT, POINT_SPHERE_RADIUS};
use point_cloud_processing::Point3;

use crate::engine::loading::point_set_loader::LoadedPointCloud;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::scene_index::{PointUserData, SceneIndex};

/// Parent of every point entity. Drag rotation is applied here.
#[derive(Component)]
pub struct PointCloudGroup;

/// Spawn one sphere per normalised point, one material per set, and register
/// each entity in set-major order.
pub fn spawn_point_cloud(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut scene_index: ResMut<SceneIndex>,
    mut progress: ResMut<LoadingProgress>,
    point_cloud: Res<LoadedPointCloud>,
) {
    scene_index.clear();

    let mesh = meshes.add(Sphere::new(POINT_SPHERE_RADIUS).mesh().uv(12, 8));
    let group = commands
        .spawn((
            Name::new("PointCloudGroup"),
            PointCloudGroup,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let sets = point_cloud.normalized_sets.iter().zip(&point_cloud.colours);
    for (set_index, (points, colour)) in sets.enumerate() {
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb_u8(colour.r, colour.g, colour.b),
            perceptual_roughness: 1.0,
            ..default()
        });

        for (point_index, point) in points.iter().enumerate() {
            let entity = commands
                .spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    point_transform(point),
                    ChildOf(group),
                ))
                .id();
            let absolute_index = scene_index.register(entity, set_index, point_index);
            commands.entity(entity).insert(PointUserData {
                set_index,
                point_index,
                absolute_index,
            });
        }
    }

    progress.scene_spawned = true;
    info!("✓ Spawned {} point entities", scene_index.len());
}

pub fn point_transform(point: &Point3) -> Transform {
    Transform::from_translation(Vec3::from_array(point.as_f32_array()))
        .with_scale(Vec3::splat(POINT_MESH_SCALE_DEFAULT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use point_cloud_processing::{LabelColour, PointCloudBounds, PointSetCollection};

    fn two_set_cloud() -> LoadedPointCloud {
        let normalized_sets = vec![
            vec![
                Point3::new(-0.5, -0.5, -0.5),
                Point3::new(0.1, 0.2, 0.3),
                Point3::new(0.0, 0.0, 0.0),
            ],
            vec![Point3::new(0.5, 0.5, 0.5), Point3::new(0.25, -0.25, 0.0)],
        ];
        LoadedPointCloud(PointSetCollection {
            key: "abc".to_string(),
            names: vec!["red".to_string(), "green".to_string()],
            colours: vec![LabelColour::new(255, 0, 0), LabelColour::new(0, 128, 0)],
            raw_sets: normalized_sets.clone(),
            normalized_sets,
            bounds: PointCloudBounds::default(),
        })
    }

    #[test]
    fn point_transform_places_point_at_default_scale() {
        let transform = point_transform(&Point3::new(0.25, -0.5, 0.125));
        assert_eq!(transform.translation, Vec3::new(0.25, -0.5, 0.125));
        assert_eq!(transform.scale, Vec3::splat(1.5));
    }

    #[test]
    fn spawned_points_are_registered_set_major() {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<SceneIndex>()
            .init_resource::<LoadingProgress>()
            .insert_resource(two_set_cloud())
            .add_systems(Update, spawn_point_cloud);
        app.update();

        let world = app.world();
        let scene_index = world.resource::<SceneIndex>();
        assert_eq!(scene_index.len(), 5);
        assert!(world.resource::<LoadingProgress>().scene_spawned);

        let entry = scene_index.lookup(3).unwrap();
        assert_eq!((entry.user_data.set_index, entry.user_data.point_index), (1, 0));

        let entity = world.entity(entry.entity);
        assert_eq!(entity.get::<PointUserData>(), Some(&entry.user_data));
        assert_eq!(
            entity.get::<Transform>().map(|t| t.translation),
            Some(Vec3::splat(0.5))
        );
        let parent = entity.get::<ChildOf>().map(|child_of| child_of.parent());
        assert!(parent.is_some_and(|group| world.entity(group).contains::<PointCloudGroup>()));
    }
}
