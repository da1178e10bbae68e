//! Core application setup and state management.
//!
//! Handles application lifecycle, viewer configuration, window setup and
//! plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the container asset loader, scene spawning,
/// interaction systems and reactive redraw settings.
pub mod app_setup;

/// Application state machine from container loading to runtime interaction.
pub mod app_state;

/// Viewer configuration read from JSON and command line overrides.
pub mod config;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
