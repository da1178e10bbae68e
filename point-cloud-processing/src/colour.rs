/// Label colour compositing.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque display colour attached to a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelColour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LabelColour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for LabelColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Blend an RGBA label over an opaque background.
pub fn composite(label: [u8; 4], background: LabelColour) -> LabelColour {
    let [r, g, b, a] = label;
    let coverage = f64::from(a) / 255.0;
    let alpha = 1.0 - coverage;
    let blend = |channel: u8, backdrop: u8| -> u8 {
        let value =
            coverage * (f64::from(channel) / 255.0) + alpha * (f64::from(backdrop) / 255.0);
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    };
    LabelColour::new(
        blend(r, background.r),
        blend(g, background.g),
        blend(b, background.b),
    )
}

/// Composite every label in order, one colour per set.
pub fn composite_all(labels: &[[u8; 4]], background: LabelColour) -> Vec<LabelColour> {
    labels
        .iter()
        .map(|label| composite(*label, background))
        .collect()
}
