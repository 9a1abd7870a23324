//! Workbook input: one CSV per sheet.
//!
//! A `.csv` file is a workbook with a single sheet named after the file
//! stem. A directory is a workbook whose sheets are the `.csv` files inside
//! it, in file-name order. Sheets have no header row.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::annotation::column_label;
use crate::error::{Result, UnitSheetError};

/// Grid of cell texts for one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Non-empty cells as `(column label, row number, text)`; both are 1-based.
    pub fn cells(&self) -> impl Iterator<Item = (String, String, &str)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, text)| {
                if text.is_empty() {
                    None
                } else {
                    Some((column_label(c + 1), (r + 1).to_string(), text.as_str()))
                }
            })
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Metadata about a loaded workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookSource {
    /// File or directory name without path.
    pub file: String,
    pub path: PathBuf,
    /// SHA-256 over the sheet files' bytes, in sheet order.
    pub hash: String,
    pub sheet_count: usize,
}

/// A loaded workbook.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<SheetTable>,
    pub source: WorkbookSource,
}

impl Workbook {
    /// Load a `.csv` file or a directory of `.csv` files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let sheet_files = if path.is_dir() {
            sheet_files_in(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut hasher = Sha256::new();
        let mut sheets = Vec::with_capacity(sheet_files.len());
        for file in &sheet_files {
            let contents = fs::read(file).map_err(|e| UnitSheetError::io(file, e))?;
            hasher.update(&contents);
            sheets.push(parse_sheet(sheet_name(file), &contents)?);
        }
        let hash = format!("sha256:{:x}", hasher.finalize());

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            source: WorkbookSource {
                file,
                path: path.to_path_buf(),
                hash,
                sheet_count: sheets.len(),
            },
            sheets,
        })
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

/// True when `path` looks like a workbook: a `.csv` file or a directory.
pub fn is_workbook(path: &Path) -> bool {
    if path.is_dir() {
        return !path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
    }
    has_csv_extension(path)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn sheet_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| UnitSheetError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| UnitSheetError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && has_csv_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parse_sheet(name: String, bytes: &[u8]) -> Result<SheetTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(SheetTable::new(name, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_single_csv_is_one_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run1.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "mass,length").unwrap();
        writeln!(file, "kg,").unwrap();

        let workbook = Workbook::load(&path).unwrap();
        assert_eq!(workbook.sheet_count(), 1);
        assert_eq!(workbook.sheets[0].name, "run1");
        assert!(workbook.source.hash.starts_with("sha256:"));

        let cells: Vec<_> = workbook.sheets[0].cells().collect();
        assert_eq!(
            cells,
            vec![
                ("A".to_string(), "1".to_string(), "mass"),
                ("B".to_string(), "1".to_string(), "length"),
                ("A".to_string(), "2".to_string(), "kg"),
            ]
        );
    }

    #[test]
    fn test_cell_text_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("padded.csv");
        fs::write(&path, "kg ,  \n").unwrap();

        let workbook = Workbook::load(&path).unwrap();
        let cells: Vec<_> = workbook.sheets[0].cells().map(|(_, _, text)| text).collect();
        assert_eq!(cells, ["kg ", "  "]);
    }

    #[test]
    fn test_directory_sheets_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.csv"), "m\n").unwrap();
        fs::write(dir.path().join("a.csv"), "s\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();

        let workbook = Workbook::load(dir.path()).unwrap();
        let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Workbook::load("/definitely/not/here.csv"),
            Err(UnitSheetError::Io { .. })
        ));
    }
}
