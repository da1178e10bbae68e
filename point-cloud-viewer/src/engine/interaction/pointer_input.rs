use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{CursorLeft, PrimaryWindow, RequestRedraw, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use constants::render_settings::{
    POINT_MESH_SCALE_DEFAULT, POINT_MESH_SCALE_HIGHLIGHTED, POINT_SPHERE_RADIUS,
};

use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::interaction::hit_test::nearest_hit;
use crate::engine::interaction::idle_timer::{IdleTimeout, IdleTimer};
use crate::engine::interaction::intersection::PointIntersection;
use crate::engine::interaction::selection_controller::{
    ConsumeOutcome, HighlightChange, PointHit, PointerCursor, PointerMove, SelectionController,
};
use crate::engine::loading::point_set_loader::LoadedPointCloud;
use crate::engine::scene::bounding_cube::CubeBackgroundGroup;
use crate::engine::scene::point_cloud::PointCloudGroup;
use crate::engine::scene::scene_index::{PointUserData, SceneIndex};

/// Casts a ray from the viewport camera through the pointer and returns the
/// nearest point sphere it enters.
#[derive(SystemParam)]
pub struct PointPicker<'w, 's> {
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<ViewportCamera>>,
    points: Query<'w, 's, (Entity, &'static GlobalTransform), With<PointUserData>>,
    scene_index: Res<'w, SceneIndex>,
}

impl PointPicker<'_, '_> {
    pub fn pick(&self, cursor: Vec2) -> Option<PointHit> {
        let (camera, camera_transform) = self.cameras.single().ok()?;
        let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
        registered_hit(&self.scene_index, ray.origin, *ray.direction, &self.points)
    }
}

/// Nearest hit among the points registered for the current load. User data
/// comes from the registry, not from the entity.
pub fn registered_hit<'a>(
    scene_index: &SceneIndex,
    origin: Vec3,
    direction: Vec3,
    points: impl IntoIterator<Item = (Entity, &'a GlobalTransform)>,
) -> Option<PointHit> {
    let candidates = points.into_iter().filter_map(|(entity, transform)| {
        let absolute_index = scene_index.entity_at(entity)?;
        let entry = scene_index.lookup(absolute_index)?;
        let (scale, _, centre) = transform.to_scale_rotation_translation();
        let hit = PointHit {
            entity,
            user_data: entry.user_data,
        };
        Some((hit, centre, POINT_SPHERE_RADIUS * scale.x))
    });
    nearest_hit(origin, direction, candidates)
}

pub fn handle_pointer_buttons(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut controller: ResMut<SelectionController>,
    mut idle_timer: ResMut<IdleTimer>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        let cursor = windows
            .single()
            .ok()
            .and_then(Window::cursor_position)
            .or(controller.idle_position());
        if let Some(position) = cursor {
            controller.pointer_down(position);
            idle_timer.reset();
        }
    }

    if buttons.just_released(MouseButton::Left) {
        controller.pointer_up();
        idle_timer.reset();
    }
}

/// Feed cursor moves, window exits and a replay of the last position after
/// an idle period through the controller. Drag rotation is applied to the
/// point cloud and the cube together so they stay aligned.
pub fn handle_pointer_motion(
    mut cursor_moves: EventReader<CursorMoved>,
    mut cursor_exits: EventReader<CursorLeft>,
    mut timeouts: EventReader<IdleTimeout>,
    picker: PointPicker,
    mut controller: ResMut<SelectionController>,
    mut idle_timer: ResMut<IdleTimer>,
    mut groups: Query<&mut Transform, Or<(With<PointCloudGroup>, With<CubeBackgroundGroup>)>>,
    mut intersections: EventWriter<PointIntersection>,
) {
    let mut moved = false;
    for cursor_moved in cursor_moves.read() {
        moved = true;
        apply_pointer_move(
            cursor_moved.position,
            &picker,
            &mut controller,
            &mut groups,
            &mut intersections,
        );
    }
    if moved {
        idle_timer.reset();
    }

    if cursor_exits.read().count() > 0 {
        controller.pointer_leave();
    }

    if timeouts.read().count() > 0 {
        if let Some(position) = controller.idle_position() {
            apply_pointer_move(
                position,
                &picker,
                &mut controller,
                &mut groups,
                &mut intersections,
            );
        }
    }
}

fn apply_pointer_move(
    position: Vec2,
    picker: &PointPicker,
    controller: &mut SelectionController,
    groups: &mut Query<&mut Transform, Or<(With<PointCloudGroup>, With<CubeBackgroundGroup>)>>,
    intersections: &mut EventWriter<PointIntersection>,
) {
    let hit = if controller.is_dragging() {
        None
    } else {
        picker.pick(position)
    };

    match controller.pointer_move(position, hit) {
        PointerMove::Rotate(rotation) => {
            for mut transform in groups.iter_mut() {
                transform.rotation = rotation * transform.rotation;
            }
        }
        PointerMove::Intersect(intersection) => {
            intersections.write(intersection);
        }
        PointerMove::Unchanged | PointerMove::Cleared => {}
    }
}

/// Zoom from accumulated wheel input. Bevy reports scrolling towards the
/// content as positive, so deltas are flipped before they reach the
/// controller.
pub fn handle_wheel(
    mut wheel_events: EventReader<MouseWheel>,
    mut controller: ResMut<SelectionController>,
    mut idle_timer: ResMut<IdleTimer>,
) {
    let mut delta = Vec2::ZERO;
    let mut received = false;
    for event in wheel_events.read() {
        delta += Vec2::new(event.x, event.y);
        received = true;
    }
    if !received {
        return;
    }

    idle_timer.reset();
    if controller.wheel(Vec3::new(-delta.x, -delta.y, 0.0)) {
        debug!("Zoom now {:.3}", controller.zoom());
    }
}

pub fn consume_intersections(
    mut intersections: EventReader<PointIntersection>,
    mut controller: ResMut<SelectionController>,
    scene_index: Res<SceneIndex>,
    point_cloud: Res<LoadedPointCloud>,
) {
    for intersection in intersections.read() {
        match controller.consume_intersection(intersection, &scene_index, &point_cloud.raw_sets) {
            ConsumeOutcome::Selected(absolute_index) => {
                debug!("Selected point {}", absolute_index);
            }
            ConsumeOutcome::OutOfRange => {
                warn!(
                    "Ignoring intersection with unknown point: set {}, point {}, absolute {}",
                    intersection.user_data.set_index,
                    intersection.user_data.point_index,
                    intersection.user_data.absolute_index
                );
            }
            ConsumeOutcome::AlreadySelected | ConsumeOutcome::Stale => {}
        }
    }
}

pub fn apply_highlights(
    mut controller: ResMut<SelectionController>,
    mut points: Query<&mut Transform, With<PointUserData>>,
) {
    if !controller.has_highlight_changes() {
        return;
    }
    for change in controller.take_highlight_changes() {
        let (entity, scale) = match change {
            HighlightChange::Highlight(entity) => (entity, POINT_MESH_SCALE_HIGHLIGHTED),
            HighlightChange::Reset(entity) => (entity, POINT_MESH_SCALE_DEFAULT),
        };
        if let Ok(mut transform) = points.get_mut(entity) {
            transform.scale = Vec3::splat(scale);
        }
    }
}

pub fn sync_cursor_icon(
    mut commands: Commands,
    controller: Res<SelectionController>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut applied: Local<Option<PointerCursor>>,
) {
    let cursor = controller.cursor();
    if *applied == Some(cursor) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };

    let icon = match cursor {
        PointerCursor::Grab => SystemCursorIcon::Grab,
        PointerCursor::Pointer => SystemCursorIcon::Pointer,
        PointerCursor::Grabbing => SystemCursorIcon::Grabbing,
        PointerCursor::ZoomIn => SystemCursorIcon::ZoomIn,
        PointerCursor::ZoomOut => SystemCursorIcon::ZoomOut,
    };
    commands.entity(window).insert(CursorIcon::from(icon));
    *applied = Some(cursor);
}

/// The app runs reactively, so scene changes have to ask for a frame.
pub fn request_redraw(
    mut controller: ResMut<SelectionController>,
    mut redraws: EventWriter<RequestRedraw>,
) {
    if controller.take_redraw_request() {
        redraws.write(RequestRedraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::mouse::MouseScrollUnit;
    use point_cloud_processing::{LabelColour, Point3, PointCloudBounds, PointSetCollection};
    use std::time::Duration;

    fn loaded_cloud() -> LoadedPointCloud {
        let raw_sets = vec![
            vec![Point3::new(-2.0, 10.0, 0.5), Point3::new(0.0, 12.0, 1.0)],
            vec![Point3::new(4.0, 20.0, 2.0)],
        ];
        LoadedPointCloud(PointSetCollection {
            key: "abc".to_string(),
            names: vec!["red".to_string(), "green".to_string()],
            colours: vec![LabelColour::new(255, 0, 0), LabelColour::new(0, 128, 0)],
            normalized_sets: raw_sets.clone(),
            bounds: PointCloudBounds::from_points(&raw_sets.concat()),
            raw_sets,
        })
    }

    fn interaction_app() -> App {
        let mut app = App::new();
        app.insert_resource(SelectionController::default())
            .insert_resource(IdleTimer::new(Duration::from_millis(500)))
            .insert_resource(loaded_cloud())
            .init_resource::<SceneIndex>()
            .add_event::<PointIntersection>()
            .add_event::<IdleTimeout>()
            .add_event::<CursorMoved>()
            .add_event::<CursorLeft>()
            .add_event::<MouseWheel>();
        app
    }

    fn spawn_points(app: &mut App) -> Vec<(Entity, PointUserData)> {
        let layout = [(0, 0), (0, 1), (1, 0)];
        let mut spawned = Vec::new();
        for (set_index, point_index) in layout {
            let entity = app
                .world_mut()
                .spawn(Transform::from_scale(Vec3::splat(POINT_MESH_SCALE_DEFAULT)))
                .id();
            let absolute_index = app
                .world_mut()
                .resource_mut::<SceneIndex>()
                .register(entity, set_index, point_index);
            let user_data = PointUserData {
                set_index,
                point_index,
                absolute_index,
            };
            app.world_mut().entity_mut(entity).insert(user_data);
            spawned.push((entity, user_data));
        }
        spawned
    }

    fn hover(app: &mut App, entity: Entity, user_data: PointUserData) -> PointIntersection {
        let hit = PointHit { entity, user_data };
        let outcome = app
            .world_mut()
            .resource_mut::<SelectionController>()
            .pointer_move(Vec2::new(50.0, 60.0), Some(hit));
        match outcome {
            PointerMove::Intersect(intersection) => intersection,
            other => panic!("expected intersection, got {other:?}"),
        }
    }

    fn scale_of(app: &App, entity: Entity) -> f32 {
        app.world().get::<Transform>(entity).unwrap().scale.x
    }

    #[test]
    fn consumed_intersection_enlarges_only_the_hovered_point() {
        let mut app = interaction_app();
        app.add_systems(Update, (consume_intersections, apply_highlights).chain());
        let points = spawn_points(&mut app);

        let (entity, user_data) = points[2];
        let intersection = hover(&mut app, entity, user_data);
        app.world_mut().send_event(intersection);
        app.update();

        assert_eq!(scale_of(&app, entity), POINT_MESH_SCALE_HIGHLIGHTED);
        assert_eq!(scale_of(&app, points[0].0), POINT_MESH_SCALE_DEFAULT);
        let controller = app.world().resource::<SelectionController>();
        assert_eq!(controller.selected_indices(), vec![2]);
        assert_eq!(controller.tooltip().text, "x 4.00\ny 20.0\nz 2.00");

        // moving to another point shrinks the first one back
        let (next, next_data) = points[0];
        let intersection = hover(&mut app, next, next_data);
        app.world_mut().send_event(intersection);
        app.update();

        assert_eq!(scale_of(&app, entity), POINT_MESH_SCALE_DEFAULT);
        assert_eq!(scale_of(&app, next), POINT_MESH_SCALE_HIGHLIGHTED);
    }

    #[test]
    fn stale_intersection_changes_nothing() {
        let mut app = interaction_app();
        app.add_systems(Update, (consume_intersections, apply_highlights).chain());
        let points = spawn_points(&mut app);

        let stale = hover(&mut app, points[0].0, points[0].1);
        hover(&mut app, points[1].0, points[1].1);
        app.world_mut().send_event(stale);
        app.update();

        assert_eq!(scale_of(&app, points[0].0), POINT_MESH_SCALE_DEFAULT);
        assert!(
            app.world()
                .resource::<SelectionController>()
                .selected_indices()
                .is_empty()
        );
    }

    #[test]
    fn dragging_rotates_cloud_and_cube_identically() {
        let mut app = interaction_app();
        app.add_systems(Update, handle_pointer_motion);
        let cloud = app
            .world_mut()
            .spawn((PointCloudGroup, Transform::default()))
            .id();
        let cube = app
            .world_mut()
            .spawn((CubeBackgroundGroup, Transform::default()))
            .id();

        app.world_mut()
            .resource_mut::<SelectionController>()
            .pointer_down(Vec2::new(100.0, 100.0));
        app.world_mut().send_event(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(110.0, 100.0),
            delta: None,
        });
        app.update();

        let cloud_rotation = app.world().get::<Transform>(cloud).unwrap().rotation;
        let cube_rotation = app.world().get::<Transform>(cube).unwrap().rotation;
        assert_eq!(cloud_rotation, cube_rotation);
        assert!(cloud_rotation.abs_diff_eq(Quat::from_rotation_y(10f32.to_radians()), 1e-6));
    }

    #[test]
    fn idle_timeout_replays_the_last_position_during_a_drag() {
        let mut app = interaction_app();
        app.add_systems(Update, handle_pointer_motion);
        let cloud = app
            .world_mut()
            .spawn((PointCloudGroup, Transform::default()))
            .id();

        app.world_mut()
            .resource_mut::<SelectionController>()
            .pointer_down(Vec2::new(20.0, 20.0));
        app.world_mut().send_event(IdleTimeout);
        app.update();

        assert_eq!(
            app.world().get::<Transform>(cloud).unwrap().rotation,
            Quat::IDENTITY
        );
        assert!(app.world().resource::<SelectionController>().is_dragging());
    }

    #[test]
    fn leaving_the_window_clears_the_highlight_for_good() {
        let mut app = interaction_app();
        app.add_systems(
            Update,
            (handle_pointer_motion, consume_intersections, apply_highlights).chain(),
        );
        let points = spawn_points(&mut app);

        let (entity, user_data) = points[1];
        let intersection = hover(&mut app, entity, user_data);
        app.world_mut().send_event(intersection);
        app.update();
        assert_eq!(scale_of(&app, entity), POINT_MESH_SCALE_HIGHLIGHTED);

        app.world_mut().send_event(CursorLeft {
            window: Entity::PLACEHOLDER,
        });
        app.update();
        app.world_mut().send_event(IdleTimeout);
        app.update();

        assert_eq!(scale_of(&app, entity), POINT_MESH_SCALE_DEFAULT);
        let controller = app.world().resource::<SelectionController>();
        assert!(controller.selected_indices().is_empty());
        assert!(!controller.tooltip().visible);
        assert_eq!(controller.idle_position(), None);
    }

    #[test]
    fn scrolling_towards_the_content_zooms_in() {
        let mut app = interaction_app();
        app.add_systems(Update, handle_wheel);

        app.world_mut().send_event(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: 1.0,
            window: Entity::PLACEHOLDER,
        });
        app.update();
        let controller = app.world().resource::<SelectionController>();
        assert!((controller.zoom() - 1.05).abs() < 1e-6);
        assert_eq!(controller.cursor(), PointerCursor::ZoomIn);

        app.world_mut().send_event(MouseWheel {
            unit: MouseScrollUnit::Pixel,
            x: 0.0,
            y: -40.0,
            window: Entity::PLACEHOLDER,
        });
        app.update();
        let controller = app.world().resource::<SelectionController>();
        assert!((controller.zoom() - 1.0).abs() < 1e-6);
        assert_eq!(controller.cursor(), PointerCursor::ZoomOut);
    }

    #[test]
    fn only_registered_points_are_hit() {
        let registered = Entity::from_raw(1);
        let stray = Entity::from_raw(2);
        let mut scene_index = SceneIndex::default();
        scene_index.register(registered, 0, 0);

        let scaled = |z: f32| {
            GlobalTransform::from(
                Transform::from_xyz(0.0, 0.0, z)
                    .with_scale(Vec3::splat(POINT_MESH_SCALE_DEFAULT)),
            )
        };
        let behind = scaled(0.0);
        let in_front = scaled(1.0);
        let origin = Vec3::new(0.0, 0.0, 5.0);

        let hit = registered_hit(
            &scene_index,
            origin,
            Vec3::NEG_Z,
            [(stray, &in_front), (registered, &behind)],
        )
        .unwrap();
        assert_eq!(hit.entity, registered);
        assert_eq!(hit.user_data, scene_index.lookup(0).unwrap().user_data);

        assert_eq!(
            registered_hit(&scene_index, origin, Vec3::NEG_Z, [(stray, &in_front)]),
            None
        );
    }
}
