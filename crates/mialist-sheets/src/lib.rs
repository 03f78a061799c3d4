//! # mialist-sheets
//!
//! Spreadsheet gateways for mialist.
//!
//! This crate provides:
//! - A1 notation parsing (`CellRef`, `RangeRef`)
//! - `MemorySheet`: a gateway backed entirely by memory
//! - `XlsxWorkbook`: a gateway reading the attendance sheet from a workbook
//!   file and saving the destination sheet as a new `.xlsx`
//!
//! ## Example
//!
//! ```rust
//! use mialist_core::SheetGateway;
//! use mialist_sheets::MemorySheet;
//!
//! let mut sheet = MemorySheet::new("MIA List 1", Vec::new());
//! sheet.set_cell_text("A1", "Last Week").unwrap();
//! sheet.write_values("A3", &[vec!["Bob".to_string()]]).unwrap();
//!
//! assert_eq!(sheet.destination().text("A3").unwrap(), Some("Bob"));
//! ```

pub mod a1;
pub mod buffer;
pub mod memory;
pub mod xlsx;

pub use a1::{column_letters, CellRef, RangeRef};
pub use buffer::SheetBuffer;
pub use memory::MemorySheet;
pub use xlsx::XlsxWorkbook;

use thiserror::Error;

/// Spreadsheet gateway error
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Worksheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("Reference {reference} targets sheet '{sheet}', expected '{expected}'")]
    UnknownSheet {
        reference: String,
        sheet: String,
        expected: String,
    },
}
