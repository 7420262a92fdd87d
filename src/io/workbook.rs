//! Worksheet access.
//!
//! The loader works on `SheetTable`s (rows of `Cell`s), not on a particular
//! spreadsheet library. `CalamineWorkbook` adapts xlsx/xlsm/xls/ods files;
//! `MemoryWorkbook` holds tables built in code.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use crate::domain::Cell;
use crate::error::LoadError;

/// A worksheet as a dense grid, left-aligned to column A.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetTable {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Anything that can hand out named worksheets.
pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    /// Read one sheet by its exact name.
    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, String>;

    /// Read a sheet, matching the name exactly first and then ignoring
    /// case/surrounding whitespace.
    fn sheet(&mut self, wanted: &str) -> Result<SheetTable, String> {
        let names = self.sheet_names();
        let resolved = names
            .iter()
            .find(|n| n.as_str() == wanted)
            .or_else(|| {
                names
                    .iter()
                    .find(|n| n.trim().eq_ignore_ascii_case(wanted.trim()))
            })
            .cloned()
            .ok_or_else(|| {
                format!(
                    "missing sheet `{wanted}` (available: {})",
                    if names.is_empty() {
                        "none".to_string()
                    } else {
                        names.join(", ")
                    }
                )
            })?;
        self.read_sheet(&resolved)
    }
}

/// Workbook file opened through `calamine` (format detected from the extension).
pub struct CalamineWorkbook {
    inner: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let inner = open_workbook_auto(path).map_err(|e| LoadError::parse(path, e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Workbook for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, String> {
        let range = self
            .inner
            .worksheet_range(name)
            .map_err(|e| format!("cannot read sheet `{name}`: {e}"))?;
        Ok(SheetTable::new(name, range_to_rows(&range)))
    }
}

/// `calamine` ranges start at the first used cell; pad the left edge so that
/// positional column indices always count from column A.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(to_cell));
            cells
        })
        .collect()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

/// In-memory workbook, used for fixtures and for callers that already hold tabular data.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<SheetTable>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<SheetTable>) -> Self {
        Self { sheets }
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, String> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| format!("missing sheet `{name}`"))
    }
}
