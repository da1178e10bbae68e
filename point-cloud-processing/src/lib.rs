//! Point container decoding and point set construction shared by the viewer
//! and the command line tools.

pub mod bounds;
pub mod colour;
pub mod container;
pub mod decoder;
pub mod error;
pub mod point;
pub mod point_set;
pub mod synthetic;

pub use bounds::{Axis, AxisBounds, PointCloudBounds};
pub use colour::{LabelColour, composite, composite_all};
pub use container::PointContainer;
pub use decoder::{RawRecord, decode, encode};
pub use error::PointCloudError;
pub use point::Point3;
pub use point_set::{BuiltPointSets, PointSetCollection, build};
pub use synthetic::{SyntheticCloud, SyntheticConfig, generate};
