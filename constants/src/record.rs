/// Number of coordinate components packed in one record (x, y, z)
pub const XYZ_COMPONENTS: usize = 3;

/// Size in bytes of a single packed IEEE-754 f32 component
pub const BYTES_PER_COMPONENT: usize = 4;

/// Size in bytes of one packed XYZ record
pub const XYZ_RECORD_BYTES: usize = XYZ_COMPONENTS * BYTES_PER_COMPONENT;

/// Decimal places kept after decoding, matching the source data's effective precision
pub const DECODED_DECIMAL_PLACES: i32 = 6;

/// Significant digits shown for coordinates in the tooltip
pub const TOOLTIP_SIGNIFICANT_DIGITS: usize = 3;

/// Container path prefix for point datasets, followed by the container key
pub const DATA_GROUP: &str = "data";

/// Container path prefix for label metadata, followed by the container key
pub const METADATA_GROUPS: &str = "metadata/groups";
