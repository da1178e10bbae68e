/// Synthetic point cloud generation.
///
/// Each set is drawn from its own multivariate normal distribution, giving a
/// handful of overlapping clusters that exercise picking and normalisation
/// without any external data.
use constants::synthetic::{
    COVARIANCE_DIAGONAL, COVARIANCE_OFF_DIAGONAL, DARK_CHANNEL_MAX, GROUP_KEY_ALPHABET,
    GROUP_KEY_LENGTH, LABEL_ALPHA_MIN, NUM_POINTS_PER_SET, NUM_SETS, PADDING_PER_SCALE,
};
use nalgebra::{Matrix3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::container::{
    AxisMetadata, CompoundDataset, CompoundRecord, ContainerMetadata, ContainerSummary,
    LabelGroup, LabelRecord, PointContainer,
};
use crate::decoder::encode;
use crate::error::PointCloudError;
use crate::point::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticConfig {
    pub sets: usize,
    pub points_per_set: usize,
    pub seed: u64,
    pub little_endian: bool,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            sets: NUM_SETS,
            points_per_set: NUM_POINTS_PER_SET,
            seed: 42,
            little_endian: true,
        }
    }
}

/// A generated container and the key its single dataset lives under.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticCloud {
    pub key: String,
    pub container: PointContainer,
}

/// Generate a labelled container. The same config always yields the same
/// container.
pub fn generate(config: &SyntheticConfig) -> Result<SyntheticCloud, PointCloudError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let key = random_key(&mut rng);

    let mut labels = Vec::with_capacity(config.sets);
    let mut records = Vec::with_capacity(config.sets * config.points_per_set);
    let mut padding_fraction: f64 = 0.0;

    for set_index in 0..config.sets {
        let mean = Vector3::from_fn(|_, _| rng.r#gen::<f64>() - 0.5);
        let corner = rng.r#gen::<f64>() - 0.5;
        let factor = sampling_factor(covariance(corner))
            .ok_or(PointCloudError::InvalidCovariance { set_index })?;

        for _ in 0..config.points_per_set {
            let point = sample_normal(&mut rng, &mean, &factor);
            records.push(CompoundRecord {
                xyz: encode(&point, config.little_endian).to_vec(),
                label_idx: set_index as u32,
            });
        }

        let scale = (2 * set_index + 5) as f64;
        padding_fraction = padding_fraction.max(PADDING_PER_SCALE * scale * rng.r#gen::<f64>());

        labels.push(LabelRecord {
            rgba_uint8: [
                rng.gen_range(0..=DARK_CHANNEL_MAX),
                rng.gen_range(0..=DARK_CHANNEL_MAX),
                rng.gen_range(0..=DARK_CHANNEL_MAX),
                rng.gen_range(LABEL_ALPHA_MIN..=u8::MAX),
            ],
            label_idx: set_index as u32,
            name: format!("set-{set_index}"),
        });
    }

    debug!(key, sets = config.sets, padding_fraction, "Generated synthetic sets");

    let metadata = ContainerMetadata {
        summary: Some(ContainerSummary {
            title: "Synthetic multivariate normal point sets".to_string(),
            subtitle: Some(format!(
                "{} sets of {} points, seed {}",
                config.sets, config.points_per_set, config.seed
            )),
            description: Some(
                "Each set is sampled from a normal distribution with a random mean and a \
                 randomly skewed covariance."
                    .to_string(),
            ),
            padding_fraction: Some(padding_fraction),
        }),
        axes: axis_metadata(),
        groups: BTreeMap::from([(
            key.clone(),
            LabelGroup {
                name: "Synthetic sets".to_string(),
                labels,
            },
        )]),
    };

    let data = BTreeMap::from([(
        key.clone(),
        CompoundDataset {
            little_endian: config.little_endian,
            records,
        },
    )]);

    Ok(SyntheticCloud {
        key,
        container: PointContainer { metadata, data },
    })
}

fn random_key(rng: &mut impl Rng) -> String {
    (0..GROUP_KEY_LENGTH)
        .map(|_| GROUP_KEY_ALPHABET[rng.gen_range(0..GROUP_KEY_ALPHABET.len())] as char)
        .collect()
}

fn axis_metadata() -> BTreeMap<String, AxisMetadata> {
    [
        ("x", "X", [255, 0, 0, 255]),
        ("y", "Y", [0, 255, 0, 255]),
        ("z", "Z", [0, 0, 255, 255]),
    ]
    .into_iter()
    .map(|(key, name, rgba_uint8)| {
        (
            key.to_string(),
            AxisMetadata {
                name: name.to_string(),
                rgba_uint8,
            },
        )
    })
    .collect()
}

/// Covariance of one synthetic set; only the x/z term varies between sets.
fn covariance(corner: f64) -> Matrix3<f64> {
    Matrix3::new(
        COVARIANCE_DIAGONAL,
        COVARIANCE_OFF_DIAGONAL,
        corner,
        COVARIANCE_OFF_DIAGONAL,
        COVARIANCE_DIAGONAL,
        COVARIANCE_OFF_DIAGONAL,
        corner,
        COVARIANCE_OFF_DIAGONAL,
        COVARIANCE_DIAGONAL,
    )
}

/// Lower Cholesky factor `L` with `L * L^T == covariance`, or `None` when the
/// matrix is not positive definite.
fn sampling_factor(covariance: Matrix3<f64>) -> Option<Matrix3<f64>> {
    covariance.cholesky().map(|cholesky| cholesky.l())
}

fn sample_normal(rng: &mut impl Rng, mean: &Vector3<f64>, factor: &Matrix3<f64>) -> Point3 {
    let standard = Vector3::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal));
    let sample = mean + factor * standard;
    Point3::new(sample.x, sample.y, sample.z)
}
