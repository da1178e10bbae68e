use bevy::asset::LoadState;
use bevy::prelude::*;
use indicatif::ProgressBar;
use point_cloud_processing::{PointCloudError, PointContainer, PointSetCollection};

use crate::engine::core::app_state::{AppState, LoadFailure};
use crate::engine::core::config::ViewerConfig;
use crate::engine::loading::container_asset::ContainerAsset;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ContainerLoader {
    handle: Option<Handle<ContainerAsset>>,
}

/// Decoded point sets for the current load. Only present once the app is
/// running, so nothing can read partially built geometry.
#[derive(Resource, Debug, Clone, Deref)]
pub struct LoadedPointCloud(pub PointSetCollection);

// Request the container from the asset server
pub fn start_loading(
    mut loader: ResMut<ContainerLoader>,
    mut progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
) {
    info!("Loading point container from: {}", config.container_path);
    loader.handle = Some(asset_server.load(config.container_path.clone()));
    progress.container_requested = true;
}

/// Decode the container once the asset is available and move to the running
/// or failed state.
pub fn finish_loading(
    mut commands: Commands,
    mut progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
    loader: Res<ContainerLoader>,
    asset_server: Res<AssetServer>,
    containers: Res<Assets<ContainerAsset>>,
    config: Res<ViewerConfig>,
) {
    if !progress.awaiting_container() {
        return;
    }
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
        fail_load(
            &mut commands,
            &mut next_state,
            PointCloudError::transport(err),
        );
        return;
    }

    let Some(asset) = containers.get(handle) else {
        return;
    };
    if !progress.container_loaded {
        progress.container_loaded = true;
        info!("✓ Container asset loaded");
    }

    match build_point_sets(&asset.container, &config) {
        Ok(collection) => {
            info!(
                "✓ Decoded '{}': {} sets, {} points",
                collection.key,
                collection.set_count(),
                collection.total_points()
            );
            progress.point_sets_built = true;
            commands.insert_resource(LoadedPointCloud(collection));
            info!("→ Transitioning to Running state");
            next_state.set(AppState::Running);
        }
        Err(err) => fail_load(&mut commands, &mut next_state, err),
    }
}

/// Decode the configured key, falling back to the first dataset in the
/// container. The padding override wins over the container summary.
pub fn build_point_sets(
    container: &PointContainer,
    config: &ViewerConfig,
) -> Result<PointSetCollection, PointCloudError> {
    let key = container.resolve_key(config.container_key.as_deref())?;
    let padding_fraction = config
        .padding_fraction
        .or_else(|| container.padding_fraction())
        .unwrap_or(0.0);

    PointSetCollection::load(container, &key, padding_fraction, &ProgressBar::hidden())
}

fn fail_load(
    commands: &mut Commands,
    next_state: &mut NextState<AppState>,
    err: PointCloudError,
) {
    error!("Point container load failed: {err}");
    commands.insert_resource(LoadFailure {
        message: err.to_string(),
    });
    next_state.set(AppState::Failed);
}
