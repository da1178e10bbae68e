/// Packed XYZ record decoding.
///
/// Each record is three IEEE-754 f32 values laid out back to back. The byte
/// order flag comes from the dataset's compound type and covers all three
/// components.
use constants::record::{
    BYTES_PER_COMPONENT, DECODED_DECIMAL_PLACES, XYZ_COMPONENTS, XYZ_RECORD_BYTES,
};

use crate::error::PointCloudError;
use crate::point::Point3;

/// Borrowed view of one packed record and the byte order of its components.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    pub bytes: &'a [u8],
    pub little_endian: bool,
}

impl RawRecord<'_> {
    pub fn decode(&self) -> Result<Point3, PointCloudError> {
        decode(self.bytes, self.little_endian)
    }
}

/// Decode one 12-byte record into a point rounded to six decimal places.
pub fn decode(raw: &[u8], little_endian: bool) -> Result<Point3, PointCloudError> {
    if raw.len() != XYZ_RECORD_BYTES {
        return Err(PointCloudError::MalformedRecord {
            expected: XYZ_RECORD_BYTES,
            actual: raw.len(),
        });
    }

    let mut values = [0.0f64; XYZ_COMPONENTS];
    for (component, group) in raw.chunks_exact(BYTES_PER_COMPONENT).enumerate() {
        let mut bytes = [group[0], group[1], group[2], group[3]];
        if little_endian {
            bytes.reverse();
        }
        values[component] = round_decimals(f32_from_big_endian(bytes) as f64);
    }

    Ok(Point3::from(values))
}

/// Encode a point as a 12-byte record, the inverse of `decode` up to rounding.
pub fn encode(point: &Point3, little_endian: bool) -> [u8; XYZ_RECORD_BYTES] {
    let mut record = [0u8; XYZ_RECORD_BYTES];
    for (component, value) in point.as_array().into_iter().enumerate() {
        let mut bytes = f32_to_big_endian(value as f32);
        if little_endian {
            bytes.reverse();
        }
        let offset = component * BYTES_PER_COMPONENT;
        record[offset..offset + BYTES_PER_COMPONENT].copy_from_slice(&bytes);
    }
    record
}

fn f32_from_big_endian(bytes: [u8; 4]) -> f32 {
    let bits = (u32::from(bytes[0]) << 24)
        | (u32::from(bytes[1]) << 16)
        | (u32::from(bytes[2]) << 8)
        | u32::from(bytes[3]);
    f32::from_bits(bits)
}

fn f32_to_big_endian(value: f32) -> [u8; 4] {
    let bits = value.to_bits();
    [
        (bits >> 24) as u8,
        (bits >> 16) as u8,
        (bits >> 8) as u8,
        bits as u8,
    ]
}

fn round_decimals(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(DECODED_DECIMAL_PLACES);
    (value * scale).round() / scale
}
