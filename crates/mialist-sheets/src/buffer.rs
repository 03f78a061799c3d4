//! Sparse in-memory destination sheet
//!
//! Both gateways collect write-back operations here. Clearing a range drops
//! values but keeps bold formatting, matching how a spreadsheet service treats
//! a values-only clear.

use std::collections::BTreeMap;

use crate::{CellRef, RangeRef, SheetError};

/// Destination sheet contents: cell text plus bold ranges
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetBuffer {
    name: String,
    cells: BTreeMap<CellRef, String>,
    bold: Vec<RangeRef>,
}

impl SheetBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Worksheet name references must match when they carry one
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse a reference and check it targets this sheet
    pub fn resolve(&self, reference: &str) -> Result<RangeRef, SheetError> {
        let range = RangeRef::parse(reference)?;
        match &range.sheet {
            Some(sheet) if sheet != &self.name => Err(SheetError::UnknownSheet {
                reference: reference.to_string(),
                sheet: sheet.clone(),
                expected: self.name.clone(),
            }),
            _ => Ok(range),
        }
    }

    pub fn clear(&mut self, reference: &str) -> Result<(), SheetError> {
        let range = self.resolve(reference)?;
        let before = self.cells.len();
        self.cells.retain(|cell, _| !range.contains(*cell));
        tracing::debug!(range = %range, removed = before - self.cells.len(), "cleared range");
        Ok(())
    }

    /// Write a block of rows with its top-left corner at `reference`.
    ///
    /// Nothing is written unless the whole block fits on the sheet.
    pub fn write(&mut self, reference: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        let anchor = self.resolve(reference)?.first;
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let fits = |start: usize, extent: usize, max: usize| {
            extent == 0 || start.checked_add(extent - 1).is_some_and(|last| last <= max)
        };
        if !fits(anchor.row as usize, height, crate::a1::MAX_ROW as usize)
            || !fits(anchor.col as usize, width, crate::a1::MAX_COLUMN as usize)
        {
            return Err(SheetError::InvalidReference(format!(
                "{reference} (+{height} rows, {width} columns)"
            )));
        }

        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let cell = CellRef::new(anchor.row + i as u32, anchor.col + j as u16);
                self.put(cell, value.clone());
            }
        }
        Ok(())
    }

    pub fn set_text(&mut self, reference: &str, text: &str) -> Result<(), SheetError> {
        let cell = self.resolve(reference)?.first;
        self.put(cell, text.to_string());
        Ok(())
    }

    pub fn set_bold(&mut self, reference: &str) -> Result<(), SheetError> {
        let range = self.resolve(reference)?;
        self.bold.push(range);
        Ok(())
    }

    /// Text stored at `reference` (its top-left cell)
    pub fn text(&self, reference: &str) -> Result<Option<&str>, SheetError> {
        let cell = self.resolve(reference)?.first;
        Ok(self.cells.get(&cell).map(String::as_str))
    }

    pub fn is_bold(&self, cell: CellRef) -> bool {
        self.bold.iter().any(|range| range.contains(cell))
    }

    /// Non-empty cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &str)> {
        self.cells.iter().map(|(cell, text)| (*cell, text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Dense rows from A1 to the last used cell
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let Some(height) = self.cells.keys().map(|c| c.row as usize + 1).max() else {
            return Vec::new();
        };
        let width = self.cells.keys().map(|c| c.col as usize + 1).max().unwrap_or(0);

        let mut rows = vec![vec![String::new(); width]; height];
        for (cell, text) in &self.cells {
            rows[cell.row as usize][cell.col as usize] = text.clone();
        }
        rows
    }

    fn put(&mut self, cell: CellRef, text: String) {
        if text.is_empty() {
            self.cells.remove(&cell);
        } else {
            self.cells.insert(cell, text);
        }
    }
}
