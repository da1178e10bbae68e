use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::scene_index::SceneIndex;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    /// The container could not be decoded. Nothing is spawned.
    Failed,
}

/// Message shown when the load fails.
#[derive(Resource, Debug, Clone)]
pub struct LoadFailure {
    pub message: String,
}

#[derive(Component)]
pub struct FailureText;

pub fn log_running(scene_index: Res<SceneIndex>, progress: Res<LoadingProgress>) {
    if progress.is_complete() {
        info!("→ Scene ready with {} points, accepting input", scene_index.len());
    } else {
        warn!("Entered running state before loading finished: {:?}", *progress);
    }
}

pub fn show_load_failure(mut commands: Commands, failure: Option<Res<LoadFailure>>) {
    let message = failure
        .map(|failure| failure.message.clone())
        .unwrap_or_else(|| "Failed to load point container".to_string());

    commands.spawn((
        Text::new(message),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(1., 0.3, 0.3)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        FailureText,
    ));
}
