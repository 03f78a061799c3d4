//! Gateway held entirely in memory

use mialist_core::SheetGateway;

use crate::{SheetBuffer, SheetError};

/// Source grid plus a destination buffer, with no backing file
#[derive(Clone, Debug, Default)]
pub struct MemorySheet {
    source: Vec<Vec<String>>,
    destination: SheetBuffer,
}

impl MemorySheet {
    pub fn new(destination: impl Into<String>, source: Vec<Vec<String>>) -> Self {
        Self {
            source,
            destination: SheetBuffer::new(destination),
        }
    }

    pub fn destination(&self) -> &SheetBuffer {
        &self.destination
    }

    /// Destination rendered as a dense grid from A1
    pub fn destination_rows(&self) -> Vec<Vec<String>> {
        self.destination.to_rows()
    }
}

impl SheetGateway for MemorySheet {
    type Error = SheetError;

    fn fetch_grid(&mut self) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(self.source.clone())
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
