//! Error types for container decoding and point set construction.

use thiserror::Error;

use crate::bounds::Axis;

/// Failures that abort a point cloud load. No partial scene is built once one
/// of these is returned.
#[derive(Debug, Error)]
pub enum PointCloudError {
    #[error("malformed record: expected {expected} bytes, got {actual}")]
    MalformedRecord { expected: usize, actual: usize },

    #[error("degenerate bounds on {axis} axis: min and max are both {value}")]
    DegenerateAxisBounds { axis: Axis, value: f64 },

    #[error("container key '{key}' not found under {path}")]
    ContainerKeyNotFound { key: String, path: String },

    #[error("transport failure: {reason}")]
    TransportFailure { reason: String },

    #[error("record {record} references label {label_idx}, but only {label_count} labels exist")]
    LabelOutOfRange {
        record: usize,
        label_idx: u32,
        label_count: usize,
    },

    #[error("no points to normalise")]
    EmptyDataset,

    #[error("non-finite {axis} coordinate in set {set_index}, point {point_index}")]
    NonFiniteCoordinate {
        axis: Axis,
        set_index: usize,
        point_index: usize,
    },

    #[error("covariance for synthetic set {set_index} is not positive definite")]
    InvalidCovariance { set_index: usize },
}

impl PointCloudError {
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::TransportFailure {
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for PointCloudError {
    fn from(err: serde_json::Error) -> Self {
        Self::transport(err)
    }
}

impl From<std::io::Error> for PointCloudError {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err)
    }
}
