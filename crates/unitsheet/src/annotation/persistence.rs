//! Persistence for annotation trees - save/load JSON records.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::warn;

use crate::dimension::parse_abbreviation;
use crate::error::{Result, UnitSheetError};

use super::types::{AnnotationTree, CompoundUnit};

/// How records that break the one-compound-unit-per-cell shape are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Merge extra compound units into the first, drop empty entries.
    #[default]
    Normalize,
    /// Reject the record with `InvalidRecord`.
    Strict,
}

impl AnnotationTree {
    /// Save the tree to a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    UnitSheetError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            UnitSheetError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            UnitSheetError::Persistence(format!("Failed to serialize annotations: {}", e))
        })?;

        Ok(())
    }

    /// Load a tree from a JSON file, normalizing its cells.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_policy(path, LoadPolicy::default())
    }

    /// Load a tree from a JSON file with an explicit [`LoadPolicy`].
    pub fn load_with_policy(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| UnitSheetError::io(path, e))?;
        let reader = BufReader::new(file);
        let tree: AnnotationTree = serde_json::from_reader(reader).map_err(|e| {
            UnitSheetError::Persistence(format!(
                "Failed to parse annotations '{}': {}",
                path.display(),
                e
            ))
        })?;

        tree.normalized(policy)
    }

    /// Parse a tree from a JSON string.
    pub fn from_json_str(json: &str, policy: LoadPolicy) -> Result<Self> {
        let tree: AnnotationTree = serde_json::from_str(json)?;
        tree.normalized(policy)
    }

    /// Serialize the tree to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Enforce the cell shape: exactly one non-empty compound unit per cell,
    /// no empty rows, columns or sheets.
    fn normalized(mut self, policy: LoadPolicy) -> Result<Self> {
        for (sheet_name, columns) in self.sheets_mut().iter_mut() {
            for (column_name, rows) in columns.iter_mut() {
                for (row_name, cell) in rows.iter_mut() {
                    let before = cell.len();
                    cell.retain(|cu| !cu.parts.is_empty());
                    let at = format!("{}!{}{}", sheet_name, column_name, row_name);

                    if policy == LoadPolicy::Strict && cell.len() != before {
                        return Err(UnitSheetError::InvalidRecord(format!(
                            "empty compound unit at {}",
                            at
                        )));
                    }

                    if cell.len() > 1 {
                        if policy == LoadPolicy::Strict {
                            return Err(UnitSheetError::InvalidRecord(format!(
                                "{} compound units at {}; expected one",
                                cell.len(),
                                at
                            )));
                        }
                        warn!("Merging {} compound units at {} into one", cell.len(), at);
                        let merged = merge_compound_units(std::mem::take(cell));
                        cell.push(merged);
                    }
                }

                if policy == LoadPolicy::Strict && rows.values().any(|cell| cell.is_empty()) {
                    return Err(UnitSheetError::InvalidRecord(format!(
                        "empty cell in column {} of sheet '{}'",
                        column_name, sheet_name
                    )));
                }
                rows.retain(|_, cell| !cell.is_empty());
            }
            if policy == LoadPolicy::Strict && columns.values().any(|rows| rows.is_empty()) {
                return Err(UnitSheetError::InvalidRecord(format!(
                    "empty column in sheet '{}'",
                    sheet_name
                )));
            }
            columns.retain(|_, rows| !rows.is_empty());
        }

        if policy == LoadPolicy::Strict && self.sheets().values().any(|columns| columns.is_empty()) {
            return Err(UnitSheetError::InvalidRecord("empty sheet".to_string()));
        }
        self.sheets_mut().retain(|_, columns| !columns.is_empty());

        Ok(self)
    }
}

/// Concatenate parts in order; the dimension is the sum of the cached
/// dimensions when they all parse, otherwise the first one's.
fn merge_compound_units(units: Vec<CompoundUnit>) -> CompoundUnit {
    let dimension = units
        .iter()
        .map(|cu| parse_abbreviation(&cu.dimension))
        .collect::<Result<Vec<_>>>()
        .map(|dims| dims.into_iter().sum::<crate::dimension::DimensionVector>().to_abbreviation())
        .unwrap_or_else(|_| {
            units
                .first()
                .map(|cu| cu.dimension.clone())
                .unwrap_or_default()
        });

    let parts = units.into_iter().flat_map(|cu| cu.parts).collect();
    CompoundUnit::with_dimension(parts, dimension)
}

/// Path of the extracted annotation record for a data file.
///
/// ```
/// use unitsheet::annotation::annotation_path;
///
/// let path = annotation_path("data/survey.csv");
/// assert_eq!(path.to_string_lossy(), "data/survey.ccut.json");
/// ```
pub fn annotation_path(data_path: impl AsRef<Path>) -> PathBuf {
    sibling_with_suffix(data_path.as_ref(), "ccut.json")
}

/// Path of the curated reference record for a data file.
///
/// ```
/// use unitsheet::annotation::reference_path;
///
/// let path = reference_path("data/survey.csv");
/// assert_eq!(path.to_string_lossy(), "data/survey.ccutvld.json");
/// ```
pub fn reference_path(data_path: impl AsRef<Path>) -> PathBuf {
    sibling_with_suffix(data_path.as_ref(), "ccutvld.json")
}

fn sibling_with_suffix(data_path: &Path, suffix: &str) -> PathBuf {
    let stem = data_path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = data_path.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}.{}", stem, suffix))
}
