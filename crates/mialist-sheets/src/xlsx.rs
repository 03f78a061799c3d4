//! Workbook-file gateway
//!
//! The attendance sheet is read with calamine (xlsx, xlsm, xls, xlsb, ods).
//! Write-back operations are buffered and saved as a fresh `.xlsx` holding
//! the destination worksheet, since the source file is never modified in
//! place.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use mialist_core::SheetGateway;
use rust_xlsxwriter::{Format, Workbook};

use crate::{SheetBuffer, SheetError};

/// Gateway over a workbook file on disk
#[derive(Clone, Debug)]
pub struct XlsxWorkbook {
    path: PathBuf,
    source_sheet: String,
    destination: SheetBuffer,
}

impl XlsxWorkbook {
    /// Bind to `path`, reading from `source_sheet` and writing `destination`.
    ///
    /// The file must exist; it is only read when the grid is fetched.
    pub fn open(
        path: impl Into<PathBuf>,
        source_sheet: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Self, SheetError> {
        let path = path.into();
        if !path.is_file() {
            return Err(SheetError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("workbook not found: {}", path.display()),
            )));
        }
        Ok(Self {
            path,
            source_sheet: source_sheet.into(),
            destination: SheetBuffer::new(destination),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_sheet(&self) -> &str {
        &self.source_sheet
    }

    pub fn destination(&self) -> &SheetBuffer {
        &self.destination
    }

    /// Worksheet names of the source workbook, in workbook order
    pub fn sheet_names(&self) -> Result<Vec<String>, SheetError> {
        let workbook = open_workbook_auto(&self.path)?;
        Ok(workbook.sheet_names())
    }

    /// Destination worksheet as `.xlsx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, SheetError> {
        let mut workbook = self.render()?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Save the destination worksheet to `output`
    pub fn save(&self, output: &Path) -> Result<(), SheetError> {
        let mut workbook = self.render()?;
        workbook.save(output)?;
        tracing::info!(path = %output.display(), sheet = self.destination.name(), "saved workbook");
        Ok(())
    }

    fn render(&self) -> Result<Workbook, SheetError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.set_name(self.destination.name())?;
        for (cell, text) in self.destination.cells() {
            if self.destination.is_bold(cell) {
                sheet.write_string_with_format(cell.row, cell.col, text, &bold)?;
            } else {
                sheet.write_string(cell.row, cell.col, text)?;
            }
        }
        sheet.autofit();

        Ok(workbook)
    }
}

impl SheetGateway for XlsxWorkbook {
    type Error = SheetError;

    fn fetch_grid(&mut self) -> Result<Vec<Vec<String>>, SheetError> {
        let mut workbook = open_workbook_auto(&self.path)?;
        if !workbook.sheet_names().iter().any(|s| s == &self.source_sheet) {
            return Err(SheetError::SheetNotFound(self.source_sheet.clone()));
        }
        let range = workbook.worksheet_range(&self.source_sheet)?;
        let rows = range_to_rows(&range);
        tracing::debug!(
            path = %self.path.display(),
            sheet = %self.source_sheet,
            rows = rows.len(),
            "read attendance sheet"
        );
        Ok(rows)
    }

    fn clear_range(&mut self, range: &str) -> Result<(), SheetError> {
        self.destination.clear(range)
    }

    fn write_values(&mut self, cell: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        self.destination.write(cell, rows)
    }

    fn set_cell_text(&mut self, cell: &str, text: &str) -> Result<(), SheetError> {
        self.destination.set_text(cell, text)
    }

    fn set_range_bold(&mut self, range: &str) -> Result<(), SheetError> {
        self.destination.set_bold(range)
    }
}

/// Render a used range as text rows anchored at A1.
///
/// calamine ranges start at the first used cell; leading rows and columns
/// are padded back in so column indices match the sheet.
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let (_, width) = range.get_size();
    let first_col = first_col as usize;
    let total_width = first_col + width;

    let mut rows = vec![vec![String::new(); total_width]; first_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); first_col];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }
    rows
}

/// Cell text as a spreadsheet displays it; whole floats lose their `.0`
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::Error(e) => e.to_string(),
        other => other.to_string(),
    }
}
