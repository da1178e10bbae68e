/// Point container layout: labelled compound datasets plus metadata groups.
///
/// The document mirrors the structured container written by the generator:
/// `data/<key>` holds `(xyz, label_idx)` records and
/// `metadata/groups/<key>/labels` holds the `(rgba, label_idx)` label table.
use constants::record::{DATA_GROUP, METADATA_GROUPS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use crate::decoder::RawRecord;
use crate::error::PointCloudError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointContainer {
    pub metadata: ContainerMetadata,
    #[serde(default)]
    pub data: BTreeMap<String, CompoundDataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ContainerSummary>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub axes: BTreeMap<String, AxisMetadata>,
    #[serde(default)]
    pub groups: BTreeMap<String, LabelGroup>,
}

/// Descriptive attributes; `padding_fraction` is only set for synthetic data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_fraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisMetadata {
    pub name: String,
    pub rgba_uint8: [u8; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Vec<LabelRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub rgba_uint8: [u8; 4],
    pub label_idx: u32,
    #[serde(default)]
    pub name: String,
}

/// Compound dataset of packed coordinates. The byte order is a property of the
/// dataset's compound type, shared by every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundDataset {
    pub little_endian: bool,
    #[serde(default)]
    pub records: Vec<CompoundRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub xyz: Vec<u8>,
    pub label_idx: u32,
}

impl PointContainer {
    /// Parse a container from raw bytes. Unparseable or truncated payloads are
    /// reported as transport failures.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PointCloudError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PointCloudError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), PointCloudError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Keys of every point dataset in the container.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// The requested key, or the first dataset when none is given.
    pub fn resolve_key(&self, key: Option<&str>) -> Result<String, PointCloudError> {
        match key {
            Some(key) => Ok(key.to_string()),
            None => self.keys().next().map(str::to_string).ok_or_else(|| {
                PointCloudError::ContainerKeyNotFound {
                    key: String::new(),
                    path: DATA_GROUP.to_string(),
                }
            }),
        }
    }

    pub fn dataset(&self, key: &str) -> Result<&CompoundDataset, PointCloudError> {
        self.data
            .get(key)
            .ok_or_else(|| PointCloudError::ContainerKeyNotFound {
                key: key.to_string(),
                path: DATA_GROUP.to_string(),
            })
    }

    pub fn group(&self, key: &str) -> Result<&LabelGroup, PointCloudError> {
        self.metadata
            .groups
            .get(key)
            .ok_or_else(|| PointCloudError::ContainerKeyNotFound {
                key: key.to_string(),
                path: METADATA_GROUPS.to_string(),
            })
    }

    /// Label table at `metadata/groups/<key>/labels`.
    pub fn labels(&self, key: &str) -> Result<&[LabelRecord], PointCloudError> {
        Ok(&self.group(key)?.labels)
    }

    /// `(record, label_idx)` pairs for `range` of the dataset at `data/<key>`.
    pub fn slice(
        &self,
        key: &str,
        range: Range<usize>,
    ) -> Result<Vec<(RawRecord<'_>, u32)>, PointCloudError> {
        let dataset = self.dataset(key)?;
        let records = dataset.records.get(range.clone()).ok_or_else(|| {
            PointCloudError::transport(format!(
                "slice {}..{} past end of dataset '{}' ({} records)",
                range.start,
                range.end,
                key,
                dataset.records.len()
            ))
        })?;

        Ok(records
            .iter()
            .map(|record| {
                (
                    RawRecord {
                        bytes: &record.xyz,
                        little_endian: dataset.little_endian,
                    },
                    record.label_idx,
                )
            })
            .collect())
    }

    pub fn padding_fraction(&self) -> Option<f64> {
        self.metadata
            .summary
            .as_ref()
            .and_then(|summary| summary.padding_fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "metadata": {
            "groups": {
                "tsg8n0ki": {
                    "name": "RGBa colorspace",
                    "labels": [
                        {"rgba_uint8": [255, 0, 0, 255], "label_idx": 0, "name": "red"},
                        {"rgba_uint8": [0, 255, 0, 128], "label_idx": 1}
                    ]
                }
            }
        },
        "data": {
            "tsg8n0ki": {
                "little_endian": true,
                "records": [
                    {"xyz": [0, 0, 128, 63, 0, 0, 0, 64, 0, 0, 64, 64], "label_idx": 1}
                ]
            }
        }
    }"#;

    #[test]
    fn parses_groups_and_datasets() {
        let container = PointContainer::from_slice(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(container.keys().collect::<Vec<_>>(), vec!["tsg8n0ki"]);

        let labels = container.labels("tsg8n0ki").unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].rgba_uint8, [0, 255, 0, 128]);
        assert_eq!(labels[1].name, "");
        assert_eq!(container.padding_fraction(), None);
    }

    #[test]
    fn slice_yields_records_with_dataset_byte_order() {
        let container = PointContainer::from_slice(DOCUMENT.as_bytes()).unwrap();
        let slice = container.slice("tsg8n0ki", 0..1).unwrap();
        assert_eq!(slice.len(), 1);

        let (record, label_idx) = slice[0];
        assert!(record.little_endian);
        assert_eq!(label_idx, 1);
        let point = record.decode().unwrap();
        assert_eq!(point.as_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn unknown_key_reports_the_searched_path() {
        let container = PointContainer::from_slice(DOCUMENT.as_bytes()).unwrap();
        match container.labels("missing") {
            Err(PointCloudError::ContainerKeyNotFound { key, path }) => {
                assert_eq!(key, "missing");
                assert_eq!(path, "metadata/groups");
            }
            other => panic!("expected missing key, got {other:?}"),
        }
        assert!(matches!(
            container.dataset("missing"),
            Err(PointCloudError::ContainerKeyNotFound { .. })
        ));
    }

    #[test]
    fn key_resolution_falls_back_to_the_first_dataset() {
        let container = PointContainer::from_slice(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(container.resolve_key(None).unwrap(), "tsg8n0ki");
        assert_eq!(container.resolve_key(Some("other")).unwrap(), "other");

        match PointContainer::default().resolve_key(None) {
            Err(PointCloudError::ContainerKeyNotFound { key, path }) => {
                assert_eq!(key, "");
                assert_eq!(path, "data");
            }
            other => panic!("expected missing key, got {other:?}"),
        }
    }

    #[test]
    fn slice_past_end_is_a_transport_failure() {
        let container = PointContainer::from_slice(DOCUMENT.as_bytes()).unwrap();
        assert!(matches!(
            container.slice("tsg8n0ki", 0..5),
            Err(PointCloudError::TransportFailure { .. })
        ));
    }

    #[test]
    fn truncated_payload_is_a_transport_failure() {
        let truncated = &DOCUMENT.as_bytes()[..DOCUMENT.len() / 2];
        assert!(matches!(
            PointContainer::from_slice(truncated),
            Err(PointCloudError::TransportFailure { .. })
        ));
    }
}
