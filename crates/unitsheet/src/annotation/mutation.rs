//! Adding and removing atomic unit parts, and dimension recomputation.

use log::debug;

use crate::dimension::DimensionVector;
use crate::error::{Result, UnitSheetError};

use super::cell_ref::{CellKey, cell_key_of};
use super::types::{AnnotationTree, AtomicUnitPart, CompoundUnit};

/// Resolves a unit URI to the dimension of one unit of it.
pub trait DimensionResolver {
    /// Dimension of the unit at exponent 1, or `UnresolvedUnit`.
    fn unit_dimension(&self, unit_uri: &str) -> Result<DimensionVector>;
}

/// How far a removal cascaded up the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Only the part was removed; the cell still has parts.
    PartRemoved,
    /// The cell became empty and its row entry was removed.
    RowRemoved,
    /// The column became empty and was removed.
    ColumnRemoved,
    /// The sheet became empty and was removed.
    SheetRemoved,
}

/// Sum of the exponent-scaled dimensions of `parts`.
///
/// Parts that cannot be resolved, or whose exponent is not a number,
/// contribute nothing.
pub fn compound_dimension(parts: &[AtomicUnitPart], resolver: &dyn DimensionResolver) -> DimensionVector {
    parts
        .iter()
        .filter_map(|part| {
            let exponent = match part.exponent_value() {
                Some(e) => e,
                None => {
                    debug!(
                        "Skipping part '{}' with non-numeric exponent '{}'",
                        part.unit,
                        part.exponent.as_ref().map(ToString::to_string).unwrap_or_default()
                    );
                    return None;
                }
            };
            match resolver.unit_dimension(&part.unit) {
                Ok(dimension) => Some(dimension.scale(exponent)),
                Err(e) => {
                    debug!("{}; contributes no dimension", e);
                    None
                }
            }
        })
        .sum()
}

impl AnnotationTree {
    /// Add an atomic part to the cell at `cell_reference` in `sheet`.
    ///
    /// Missing sheet, column and cell entries are created. The part is
    /// appended to the cell's first compound unit, or becomes a new
    /// single-part compound unit when the cell is empty. The dimension is
    /// not recomputed; call [`AnnotationTree::recompute_dimension`] after.
    pub fn add_atomic_part(
        &mut self,
        sheet: &str,
        cell_reference: &str,
        part: AtomicUnitPart,
    ) -> Result<CellKey> {
        let key = cell_key_of(cell_reference)?;

        let cell = self
            .sheets_mut()
            .entry(sheet.to_string())
            .or_default()
            .entry(key.column.clone())
            .or_default()
            .entry(key.row.clone())
            .or_default();

        match cell.first_mut() {
            Some(compound) => compound.parts.push(part),
            None => cell.push(CompoundUnit::single(part)),
        }

        Ok(key)
    }

    /// Recompute the dimension of the first compound unit at `cell_reference`.
    ///
    /// Returns the new abbreviation.
    pub fn recompute_dimension(
        &mut self,
        sheet: &str,
        cell_reference: &str,
        resolver: &dyn DimensionResolver,
    ) -> Result<String> {
        let key = cell_key_of(cell_reference)?;
        self.recompute_at(sheet, &key.column, &key.row, resolver)
    }

    fn recompute_at(
        &mut self,
        sheet: &str,
        column: &str,
        row: &str,
        resolver: &dyn DimensionResolver,
    ) -> Result<String> {
        let compound = self
            .sheets_mut()
            .get_mut(sheet)
            .and_then(|s| s.get_mut(column))
            .and_then(|c| c.get_mut(row))
            .and_then(|cell| cell.first_mut())
            .ok_or_else(|| {
                UnitSheetError::NotFound(format!("cell {}{} in sheet '{}'", column, row, sheet))
            })?;

        compound.dimension = compound_dimension(&compound.parts, resolver).to_abbreviation();
        Ok(compound.dimension.clone())
    }

    /// Remove the part at 1-based `part_index` from the first compound unit
    /// of a cell, cleaning up empty containers.
    ///
    /// Cleanup stops at the first level that still has content: a cell with
    /// parts left gets its dimension recomputed; otherwise the row goes, then
    /// the column if empty, then the sheet if empty. On error the tree is
    /// left untouched.
    pub fn remove_atomic_part(
        &mut self,
        sheet: &str,
        column: &str,
        row: &str,
        part_index: usize,
        resolver: &dyn DimensionResolver,
    ) -> Result<RemovalOutcome> {
        let columns = self
            .sheets_mut()
            .get_mut(sheet)
            .ok_or_else(|| UnitSheetError::NotFound(format!("sheet '{}'", sheet)))?;
        let rows = columns.get_mut(column).ok_or_else(|| {
            UnitSheetError::NotFound(format!("column '{}' in sheet '{}'", column, sheet))
        })?;
        let cell = rows.get_mut(row).ok_or_else(|| {
            UnitSheetError::NotFound(format!("row '{}' in column '{}' of sheet '{}'", row, column, sheet))
        })?;
        let compound = cell.first_mut().ok_or_else(|| {
            UnitSheetError::NotFound(format!("compound unit at {}{} in sheet '{}'", column, row, sheet))
        })?;

        let len = compound.parts.len();
        if part_index == 0 || part_index > len {
            return Err(UnitSheetError::IndexOutOfRange {
                index: part_index,
                len,
            });
        }
        compound.parts.remove(part_index - 1);

        if !compound.parts.is_empty() {
            compound.dimension = compound_dimension(&compound.parts, resolver).to_abbreviation();
            return Ok(RemovalOutcome::PartRemoved);
        }

        rows.shift_remove(row);
        if !rows.is_empty() {
            return Ok(RemovalOutcome::RowRemoved);
        }

        columns.shift_remove(column);
        if !columns.is_empty() {
            return Ok(RemovalOutcome::ColumnRemoved);
        }

        self.sheets_mut().shift_remove(sheet);
        Ok(RemovalOutcome::SheetRemoved)
    }
}
