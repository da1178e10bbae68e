/// Point set construction: decode, group by label, normalise, colour.
use constants::colour::BACKGROUND_RGB;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::bounds::{Axis, PointCloudBounds};
use crate::colour::{LabelColour, composite_all};
use crate::container::PointContainer;
use crate::error::PointCloudError;
use crate::point::Point3;

/// Normalised geometry plus the untouched raw samples it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPointSets {
    pub normalized_sets: Vec<Vec<Point3>>,
    pub raw_sets: Vec<Vec<Point3>>,
    pub bounds: PointCloudBounds,
}

/// Normalise every set against bounds shared across all sets.
///
/// Raw points are kept as given and indexed identically to the normalised
/// ones, so tooltips can show the original coordinates.
pub fn build(
    raw_sets: Vec<Vec<Point3>>,
    padding_fraction: f64,
) -> Result<BuiltPointSets, PointCloudError> {
    for (set_index, set) in raw_sets.iter().enumerate() {
        for (point_index, point) in set.iter().enumerate() {
            let non_finite = Axis::ALL
                .into_iter()
                .find(|axis| !point.get(*axis).is_finite());
            if let Some(axis) = non_finite {
                return Err(PointCloudError::NonFiniteCoordinate {
                    axis,
                    set_index,
                    point_index,
                });
            }
        }
    }

    let flattened: Vec<Point3> = raw_sets.iter().flatten().copied().collect();
    if flattened.is_empty() {
        return Err(PointCloudError::EmptyDataset);
    }

    let mut bounds = PointCloudBounds::from_points(&flattened);
    bounds.expand(padding_fraction);
    bounds.validate()?;

    let normalized_sets: Vec<Vec<Point3>> = raw_sets
        .par_iter()
        .map(|set| {
            set.iter()
                .map(|point| bounds.normalize(point))
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(BuiltPointSets {
        normalized_sets,
        raw_sets,
        bounds,
    })
}

/// Everything the scene needs from one container key.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSetCollection {
    pub key: String,
    pub names: Vec<String>,
    pub colours: Vec<LabelColour>,
    pub raw_sets: Vec<Vec<Point3>>,
    pub normalized_sets: Vec<Vec<Point3>>,
    pub bounds: PointCloudBounds,
}

impl PointSetCollection {
    /// Decode and normalise the dataset at `key` in one atomic pass. Any
    /// failure aborts the whole load.
    ///
    /// Points are grouped into one set per label, in label-table order.
    pub fn load(
        container: &PointContainer,
        key: &str,
        padding_fraction: f64,
        progress: &ProgressBar,
    ) -> Result<Self, PointCloudError> {
        let labels = container.labels(key)?;
        let record_count = container.dataset(key)?.records.len();
        let records = container.slice(key, 0..record_count)?;

        let set_lookup: HashMap<u32, usize> = labels
            .iter()
            .enumerate()
            .map(|(set_index, label)| (label.label_idx, set_index))
            .collect();

        progress.set_length(record_count as u64);
        progress.set_message("Decoding records");

        let decoded = records
            .par_iter()
            .enumerate()
            .map(|(record_index, (record, label_idx))| -> Result<_, PointCloudError> {
                let set_index = set_lookup.get(label_idx).copied().ok_or(
                    PointCloudError::LabelOutOfRange {
                        record: record_index,
                        label_idx: *label_idx,
                        label_count: labels.len(),
                    },
                )?;
                let point = record.decode()?;
                progress.inc(1);
                Ok((set_index, point))
            })
            .collect::<Result<Vec<_>, PointCloudError>>()?;
        progress.finish_with_message("Records decoded");

        let mut raw_sets = vec![Vec::new(); labels.len()];
        for (set_index, point) in decoded {
            raw_sets[set_index].push(point);
        }

        let built = build(raw_sets, padding_fraction)?;

        let label_rgba: Vec<[u8; 4]> = labels.iter().map(|label| label.rgba_uint8).collect();
        let colours = composite_all(&label_rgba, LabelColour::from_array(BACKGROUND_RGB));
        let names = labels.iter().map(|label| label.name.clone()).collect();

        info!(
            key,
            sets = built.raw_sets.len(),
            points = record_count,
            padding_fraction,
            "Decoded point sets"
        );
        debug!(bounds = ?built.bounds, "Axis bounds");

        Ok(Self {
            key: key.to_string(),
            names,
            colours,
            raw_sets: built.raw_sets,
            normalized_sets: built.normalized_sets,
            bounds: built.bounds,
        })
    }

    pub fn set_count(&self) -> usize {
        self.raw_sets.len()
    }

    pub fn set_sizes(&self) -> Vec<usize> {
        self.raw_sets.iter().map(Vec::len).collect()
    }

    pub fn total_points(&self) -> usize {
        self.raw_sets.iter().map(Vec::len).sum()
    }

    pub fn raw_point(&self, set_index: usize, point_index: usize) -> Option<&Point3> {
        self.raw_sets.get(set_index)?.get(point_index)
    }

    pub fn normalized_point(&self, set_index: usize, point_index: usize) -> Option<&Point3> {
        self.normalized_sets.get(set_index)?.get(point_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{CompoundDataset, CompoundRecord, LabelGroup, LabelRecord};
    use crate::decoder::encode;

    fn two_set_container(little_endian: bool) -> PointContainer {
        let set_zero = [
            Point3::new(-2.0, 10.0, 0.5),
            Point3::new(0.0, 12.0, 1.0),
            Point3::new(-1.0, 11.0, 0.75),
        ];
        let set_one = [Point3::new(4.0, 20.0, 2.0), Point3::new(3.0, 18.0, 1.5)];

        let mut container = PointContainer::default();
        container.metadata.groups.insert(
            "abc".to_string(),
            LabelGroup {
                name: "scenario".to_string(),
                labels: vec![
                    LabelRecord {
                        rgba_uint8: [255, 0, 0, 255],
                        label_idx: 0,
                        name: "red".to_string(),
                    },
                    LabelRecord {
                        rgba_uint8: [0, 255, 0, 128],
                        label_idx: 1,
                        name: "green".to_string(),
                    },
                ],
            },
        );

        // interleave records so grouping has to follow labels, not file order
        let records = vec![
            (set_zero[0], 0),
            (set_one[0], 1),
            (set_zero[1], 0),
            (set_zero[2], 0),
            (set_one[1], 1),
        ]
        .into_iter()
        .map(|(point, label_idx)| CompoundRecord {
            xyz: encode(&point, little_endian).to_vec(),
            label_idx,
        })
        .collect();

        container.data.insert(
            "abc".to_string(),
            CompoundDataset {
                little_endian,
                records,
            },
        );
        container
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn normalised_points_stay_inside_unit_cube_and_invert() {
        let raw_sets = vec![
            vec![Point3::new(1.0, -3.0, 7.5), Point3::new(2.5, 4.0, 7.0)],
            vec![Point3::new(-6.0, 0.1, 9.0)],
        ];
        let built = build(raw_sets.clone(), 0.0).unwrap();

        assert_eq!(built.raw_sets, raw_sets);
        for (raw_set, normalized_set) in built.raw_sets.iter().zip(&built.normalized_sets) {
            assert_eq!(raw_set.len(), normalized_set.len());
            for (raw, normalized) in raw_set.iter().zip(normalized_set) {
                for axis in Axis::ALL {
                    let value = normalized.get(axis);
                    assert!((-0.5..=0.5).contains(&value), "{axis} = {value}");
                }
                let restored = built.bounds.denormalize(normalized);
                assert_close(restored.x, raw.x);
                assert_close(restored.y, raw.y);
                assert_close(restored.z, raw.z);
            }
        }
    }

    #[test]
    fn padding_pulls_points_away_from_cube_faces() {
        let raw_sets = vec![vec![Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0)]];
        let built = build(raw_sets, 0.5).unwrap();
        for point in &built.normalized_sets[0] {
            for axis in Axis::ALL {
                assert!(point.get(axis).abs() < 0.5);
            }
        }
    }

    #[test]
    fn single_value_axis_fails_instead_of_producing_nan() {
        let raw_sets = vec![vec![Point3::new(1.0, 5.0, 0.0), Point3::new(2.0, 6.0, 0.0)]];
        match build(raw_sets, 0.0) {
            Err(PointCloudError::DegenerateAxisBounds { axis, .. }) => assert_eq!(axis, Axis::Z),
            other => panic!("expected degenerate z axis, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_non_finite_input_are_rejected() {
        assert!(matches!(
            build(vec![vec![], vec![]], 0.0),
            Err(PointCloudError::EmptyDataset)
        ));
        let raw_sets = vec![
            vec![Point3::new(0.0, 0.0, 0.0)],
            vec![Point3::new(1.0, f64::NAN, 1.0)],
        ];
        match build(raw_sets, 0.0) {
            Err(PointCloudError::NonFiniteCoordinate {
                axis,
                set_index,
                point_index,
            }) => {
                assert_eq!((axis, set_index, point_index), (Axis::Y, 1, 0));
            }
            other => panic!("expected non-finite error, got {other:?}"),
        }
    }

    #[test]
    fn loads_two_labelled_sets_with_composited_colours() {
        for little_endian in [true, false] {
            let container = two_set_container(little_endian);
            let collection =
                PointSetCollection::load(&container, "abc", 0.0, &ProgressBar::hidden()).unwrap();

            assert_eq!(collection.set_sizes(), vec![3, 2]);
            assert_eq!(collection.total_points(), 5);
            assert_eq!(collection.colours[0].to_string(), "rgb(255,0,0)");
            assert_eq!(collection.colours[1].to_string(), "rgb(0,128,0)");
            assert_eq!(collection.names, vec!["red", "green"]);

            assert_eq!(collection.raw_point(0, 1), Some(&Point3::new(0.0, 12.0, 1.0)));
            assert_eq!(collection.raw_point(1, 0), Some(&Point3::new(4.0, 20.0, 2.0)));
            assert_eq!(collection.bounds.min_x, -2.0);
            assert_eq!(collection.bounds.max_y, 20.0);
            assert_eq!(
                collection.normalized_point(0, 0),
                Some(&Point3::new(-0.5, -0.5, -0.5))
            );
            assert_eq!(
                collection.normalized_point(1, 0),
                Some(&Point3::new(0.5, 0.5, 0.5))
            );
        }
    }

    #[test]
    fn unknown_label_aborts_the_load() {
        let mut container = two_set_container(true);
        if let Some(dataset) = container.data.get_mut("abc") {
            dataset.records[3].label_idx = 9;
        }
        match PointSetCollection::load(&container, "abc", 0.0, &ProgressBar::hidden()) {
            Err(PointCloudError::LabelOutOfRange {
                record, label_idx, ..
            }) => assert_eq!((record, label_idx), (3, 9)),
            other => panic!("expected label error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_record_aborts_the_load() {
        let mut container = two_set_container(true);
        if let Some(dataset) = container.data.get_mut("abc") {
            dataset.records[1].xyz.pop();
        }
        assert!(matches!(
            PointSetCollection::load(&container, "abc", 0.0, &ProgressBar::hidden()),
            Err(PointCloudError::MalformedRecord { actual: 11, .. })
        ));
    }

    #[test]
    fn missing_key_aborts_the_load() {
        let container = two_set_container(true);
        assert!(matches!(
            PointSetCollection::load(&container, "nope", 0.0, &ProgressBar::hidden()),
            Err(PointCloudError::ContainerKeyNotFound { .. })
        ));
    }
}
