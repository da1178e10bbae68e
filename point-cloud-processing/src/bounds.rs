/// Point cloud coordinate bounds tracking and normalisation
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PointCloudError;
use crate::point::Point3;

/// Points per parallel chunk when scanning for bounds.
const BOUNDS_CHUNK_SIZE: usize = 25_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Extent of a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    /// Map a raw value into [-0.5, 0.5]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.extent() - 0.5
    }

    /// Inverse of `normalize`
    pub fn denormalize(&self, value: f64) -> f64 {
        (value + 0.5) * self.extent() + self.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for PointCloudBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCloudBounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Scan points in parallel chunks and fold the partial bounds together.
    pub fn from_points(points: &[Point3]) -> Self {
        points
            .par_chunks(BOUNDS_CHUNK_SIZE)
            .map(|chunk| {
                let mut local_bounds = PointCloudBounds::new();
                for point in chunk {
                    local_bounds.update(point.x, point.y, point.z);
                }
                local_bounds
            })
            .reduce(PointCloudBounds::new, PointCloudBounds::merge)
    }

    /// Update bounds with a new point
    pub fn update(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    pub fn merge(mut self, other: PointCloudBounds) -> Self {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
        self.min_z = self.min_z.min(other.min_z);
        self.max_z = self.max_z.max(other.max_z);
        self
    }

    pub fn axis(&self, axis: Axis) -> AxisBounds {
        match axis {
            Axis::X => AxisBounds {
                min: self.min_x,
                max: self.max_x,
            },
            Axis::Y => AxisBounds {
                min: self.min_y,
                max: self.max_y,
            },
            Axis::Z => AxisBounds {
                min: self.min_z,
                max: self.max_z,
            },
        }
    }

    /// Get world space dimensions
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }

    /// Widen every bound by `padding` times its own magnitude, leaving a margin
    /// inside the bounding cube. Bounds only ever grow.
    pub fn expand(&mut self, padding: f64) {
        if padding == 0.0 {
            return;
        }
        self.max_x += (padding * self.max_x).abs();
        self.min_x -= (padding * self.min_x).abs();
        self.max_y += (padding * self.max_y).abs();
        self.min_y -= (padding * self.min_y).abs();
        self.max_z += (padding * self.max_z).abs();
        self.min_z -= (padding * self.min_z).abs();
    }

    /// Reject zero-width axes before anything divides by the extent.
    pub fn validate(&self) -> Result<(), PointCloudError> {
        for axis in Axis::ALL {
            let bounds = self.axis(axis);
            if bounds.extent() == 0.0 {
                return Err(PointCloudError::DegenerateAxisBounds {
                    axis,
                    value: bounds.min,
                });
            }
        }
        Ok(())
    }

    /// Normalise a raw point into [-0.5, 0.5] on every axis
    pub fn normalize(&self, point: &Point3) -> Point3 {
        Point3::new(
            self.axis(Axis::X).normalize(point.x),
            self.axis(Axis::Y).normalize(point.y),
            self.axis(Axis::Z).normalize(point.z),
        )
    }

    pub fn denormalize(&self, point: &Point3) -> Point3 {
        Point3::new(
            self.axis(Axis::X).denormalize(point.x),
            self.axis(Axis::Y).denormalize(point.y),
            self.axis(Axis::Z).denormalize(point.z),
        )
    }
}
