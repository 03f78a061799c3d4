//! A1 cell notation
//!
//! Supports plain references (`C3`, `A1:E1000`) and sheet-qualified ones
//! (`MIA List 1!C3`, `'MIA List 1'!A1:E1000`). Column letters are
//! case-insensitive; rows are 1-based in text and 0-based in the structs.

use std::fmt;

use crate::SheetError;

/// Last column index accepted (`XFD`)
pub const MAX_COLUMN: u16 = 16_383;
/// Last row index accepted
pub const MAX_ROW: u32 = 1_048_575;

/// Column letters for a 0-based index (0 = A, 26 = AA)
pub fn column_letters(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// A single cell position
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse an unqualified reference such as `C3`
    pub fn parse(text: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidReference(text.to_string());

        let trimmed = text.trim().replace('$', "");
        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            let value = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
            col = col * 26 + value;
            if col > u32::from(MAX_COLUMN) + 1 {
                return Err(invalid());
            }
        }

        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row > MAX_ROW + 1 {
            return Err(invalid());
        }

        Ok(Self {
            row: row - 1,
            col: (col - 1) as u16,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row + 1)
    }
}

/// A rectangular block of cells, optionally bound to a sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRef {
    pub sheet: Option<String>,
    /// Top-left corner
    pub first: CellRef,
    /// Bottom-right corner (inclusive)
    pub last: CellRef,
}

impl RangeRef {
    /// Parse `A1:E1000`, `C3` or either form with a sheet prefix.
    ///
    /// Corners are normalised, so `E5:A1` equals `A1:E5`.
    pub fn parse(text: &str) -> Result<Self, SheetError> {
        let (sheet, cells) = split_sheet(text)?;
        let (first, last) = match cells.split_once(':') {
            Some((a, b)) => (CellRef::parse(a)?, CellRef::parse(b)?),
            None => {
                let cell = CellRef::parse(cells)?;
                (cell, cell)
            }
        };

        Ok(Self {
            sheet,
            first: CellRef::new(first.row.min(last.row), first.col.min(last.col)),
            last: CellRef::new(first.row.max(last.row), first.col.max(last.col)),
        })
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.first.row..=self.last.row).contains(&cell.row)
            && (self.first.col..=self.last.col).contains(&cell.col)
    }

    pub fn height(&self) -> u32 {
        self.last.row - self.first.row + 1
    }

    pub fn width(&self) -> u16 {
        self.last.col - self.first.col + 1
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write!(f, "'{}'!", sheet.replace('\'', "''"))?;
        }
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}

/// Split an optional `Sheet!` prefix off a reference
fn split_sheet(text: &str) -> Result<(Option<String>, &str), SheetError> {
    let Some((sheet, cells)) = text.rsplit_once('!') else {
        return Ok((None, text));
    };

    let sheet = sheet.trim();
    let name = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => quoted.replace("''", "'"),
        None => sheet.to_string(),
    };
    if name.is_empty() {
        return Err(SheetError::InvalidReference(text.to_string()));
    }
    Ok((Some(name), cells))
}
