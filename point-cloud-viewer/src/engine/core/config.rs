use bevy::prelude::*;
use constants::render_settings::IDLE_TIMEOUT_MS;
use point_cloud_processing::PointCloudError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

const DEFAULT_CONTAINER_PATH: &str = "data/synthetic.points.json";

/// Runtime viewer settings. Every field has a default so a partial JSON file
/// (or none at all) is valid.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Asset path of the container, relative to the asset root.
    pub container_path: String,
    /// Dataset key inside the container. The first key is used when unset.
    pub container_key: Option<String>,
    /// Overrides the padding fraction stored in the container summary.
    pub padding_fraction: Option<f64>,
    pub idle_timeout_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            container_path: DEFAULT_CONTAINER_PATH.to_string(),
            container_key: None,
            padding_fraction: None,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self, PointCloudError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "point-cloud-viewer", about = "Inspect labelled point sets")]
pub struct Cli {
    /// JSON file with viewer settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Container asset path, overrides the config file
    #[arg(long)]
    pub container: Option<String>,
    /// Dataset key, overrides the config file
    #[arg(short, long)]
    pub key: Option<String>,
    /// Padding fraction, overrides the config file and container
    #[arg(short, long)]
    pub padding: Option<f64>,
}

#[cfg(not(target_arch = "wasm32"))]
impl ViewerConfig {
    pub fn from_args() -> Result<Self, PointCloudError> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, PointCloudError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_json(&std::fs::read(path)?)?,
            None => Self::default(),
        };
        if let Some(container) = cli.container {
            config.container_path = container;
        }
        if let Some(key) = cli.key {
            config.container_key = Some(key);
        }
        if cli.padding.is_some() {
            config.padding_fraction = cli.padding;
        }
        Ok(config)
    }
}
