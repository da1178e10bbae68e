use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::winit::{UpdateMode, WinitSettings};
use bevy_common_assets::json::JsonAssetPlugin;
use constants::colour::BACKGROUND_RGB;
use constants::render_settings::REACTIVE_UPDATE_MS;
use std::time::Duration;

use crate::engine::camera::viewport_camera::{apply_camera_zoom, spawn_viewport_camera};
use crate::engine::core::app_state::{AppState, log_running, show_load_failure};
use crate::engine::core::config::ViewerConfig;
use crate::engine::core::window_config::create_window_config;
use crate::engine::interaction::SelectionPlugin;
use crate::engine::loading::container_asset::{CONTAINER_EXTENSION, ContainerAsset};
use crate::engine::loading::point_set_loader::{ContainerLoader, finish_loading, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::bounding_cube::{
    draw_bounding_cube, spawn_bounding_cube, spawn_lighting,
};
use crate::engine::scene::point_cloud::spawn_point_cloud;
use crate::engine::scene::scene_index::SceneIndex;

pub fn create_app(config: ViewerConfig) -> App {
    let mut app = App::new();
    let idle_timeout = config.idle_timeout();
    let [r, g, b] = BACKGROUND_RGB;

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers the point container as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ContainerAsset>::new(&[CONTAINER_EXTENSION]))
        // Only redraw on input or when a system asks for it.
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::reactive(Duration::from_millis(REACTIVE_UPDATE_MS)),
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_millis(
                REACTIVE_UPDATE_MS * 10,
            )),
        })
        .insert_resource(ClearColor(Color::srgb_u8(r, g, b)))
        .insert_resource(config);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ContainerLoader>()
        .init_resource::<SceneIndex>();

    app.add_plugins(SelectionPlugin { idle_timeout });

    // State-based system scheduling
    app.add_systems(
        Startup,
        (spawn_viewport_camera, spawn_lighting, start_loading).chain(),
    )
    .add_systems(Update, finish_loading.run_if(in_state(AppState::Loading)))
    .add_systems(
        OnEnter(AppState::Running),
        (spawn_point_cloud, spawn_bounding_cube, log_running).chain(),
    )
    .add_systems(OnEnter(AppState::Failed), show_load_failure);

    app.add_systems(
        Update,
        (draw_bounding_cube, apply_camera_zoom).run_if(in_state(AppState::Running)),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
