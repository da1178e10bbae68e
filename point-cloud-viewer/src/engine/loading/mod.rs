//! Container loading and point set construction.
//!
//! The container arrives through the asset server, is decoded in one atomic
//! pass, and the resulting point sets are published as a resource before the
//! app enters its running state.

/// Container document registered as a JSON asset.
pub mod container_asset;

/// Systems driving the load from asset request to decoded point sets.
pub mod point_set_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
