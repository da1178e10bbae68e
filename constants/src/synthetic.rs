/// Number of label sets produced by the synthetic generator
pub const NUM_SETS: usize = 5;

/// Points drawn per synthetic set
pub const NUM_POINTS_PER_SET: usize = 100;

/// Diagonal and near-diagonal covariance terms of the sampling distribution
pub const COVARIANCE_DIAGONAL: f64 = 0.9;
pub const COVARIANCE_OFF_DIAGONAL: f64 = 0.25;

/// Padding fraction contributed per unit of set scale (scale = 2s + 5)
pub const PADDING_PER_SCALE: f64 = 0.01;

/// Upper bound for synthetic label channels so colours stay dark on white tooltips
pub const DARK_CHANNEL_MAX: u8 = 160;

/// Alpha range for synthetic labels
pub const LABEL_ALPHA_MIN: u8 = 128;

/// Length and alphabet of generated container keys
pub const GROUP_KEY_LENGTH: usize = 8;
pub const GROUP_KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
