//! Tabular input: named sheets of loosely-typed records.
//!
//! [`Workbook`] loads every sheet of a spreadsheet file up front with
//! `calamine`, so the engine works against plain in-memory rows.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::CatalogError;

pub const SHEET_PRICES_USED: &str = "prices_usados";
pub const SHEET_PRICES_NEW: &str = "prices_novos";
pub const SHEET_COLORS: &str = "colors";
pub const SHEET_PRODUCTS: &str = "products";

/// A single cell value as read from a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// `true` for [`Cell::Empty`] and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// Trimmed string form. Whole numbers render without a fractional part
    /// (`12.0` → `"12"`), which is how ids typed as numbers are stringified.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                (*n as i64).to_string()
            }
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// One sheet row. Columns keep their header order; header lookups ignore
/// ASCII case and surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Cell)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    #[must_use]
    pub fn with(mut self, header: &str, value: impl Into<Cell>) -> Self {
        self.push(header, value.into());
        self
    }

    pub fn push(&mut self, header: &str, value: Cell) {
        self.fields.push((header.trim().to_string(), value));
    }

    #[must_use]
    pub fn get(&self, header: &str) -> Option<&Cell> {
        let header = header.trim();
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header))
            .map(|(_, cell)| cell)
    }

    /// First non-blank cell among `aliases`, checked in alias order.
    #[must_use]
    pub fn first_cell(&self, aliases: &[&str]) -> Option<&Cell> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|cell| !cell.is_blank())
    }

    /// Like [`Record::first_cell`], stringified.
    #[must_use]
    pub fn first_text(&self, aliases: &[&str]) -> Option<String> {
        self.first_cell(aliases).map(Cell::to_text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, cell)| cell.is_blank())
    }
}

/// Anything that can hand out the rows of a named sheet.
///
/// `None` means the sheet does not exist. Optional sheets degrade to empty.
pub trait SheetSource {
    fn sheet(&self, name: &str) -> Option<&[Record]>;

    /// Rows of `name`, or an empty slice when the sheet is absent.
    fn rows(&self, name: &str) -> &[Record] {
        self.sheet(name).unwrap_or(&[])
    }
}

impl<S: BuildHasher> SheetSource for HashMap<String, Vec<Record>, S> {
    fn sheet(&self, name: &str) -> Option<&[Record]> {
        self.get(name).map(Vec::as_slice)
    }
}

/// All sheets of a spreadsheet, loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: HashMap<String, Vec<Record>>,
}

impl Workbook {
    /// Opens an `.xlsx` / `.xls` / `.ods` file and reads every sheet.
    ///
    /// The first row of each sheet is its header row. Columns with a blank
    /// header are skipped, as are rows with no non-blank cell.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SourceUnavailable`] if the file is missing or
    /// not a readable spreadsheet, and [`CatalogError::Sheet`] if a sheet
    /// cannot be decoded.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if !path.is_file() {
            return Err(CatalogError::SourceUnavailable {
                path: path.display().to_string(),
                reason: "file not found".to_string(),
            });
        }

        let mut workbook =
            open_workbook_auto(path).map_err(|e| CatalogError::SourceUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut sheets = HashMap::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| CatalogError::Sheet {
                    sheet: name.clone(),
                    reason: e.to_string(),
                })?;

            let mut rows = range.rows();
            let headers: Vec<String> = match rows.next() {
                Some(header_row) => header_row
                    .iter()
                    .map(|cell| convert_cell(cell).to_text())
                    .collect(),
                None => Vec::new(),
            };

            let records: Vec<Record> = rows
                .map(|row| {
                    let mut record = Record::new();
                    for (header, cell) in headers.iter().zip(row) {
                        if !header.is_empty() {
                            record.push(header, convert_cell(cell));
                        }
                    }
                    record
                })
                .filter(|record| !record.is_blank())
                .collect();

            tracing::debug!(sheet = %name, rows = records.len(), "loaded sheet");
            sheets.insert(name, records);
        }

        Ok(Self { sheets })
    }

    /// Builds a workbook from already-parsed sheets.
    #[must_use]
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Record>)>,
        S: Into<String>,
    {
        Self {
            sheets: sheets
                .into_iter()
                .map(|(name, rows)| (name.into(), rows))
                .collect(),
        }
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sheets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl SheetSource for Workbook {
    fn sheet(&self, name: &str) -> Option<&[Record]> {
        self.sheets.get(name).map(Vec::as_slice)
    }
}

#[allow(clippy::cast_precision_loss)]
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lookup_ignores_header_case() {
        let record = Record::new().with("Disponibilidade", "Luanda");
        assert_eq!(
            record.get("disponibilidade"),
            Some(&Cell::Text("Luanda".to_string()))
        );
        assert_eq!(
            record.get("DISPONIBILIDADE"),
            Some(&Cell::Text("Luanda".to_string()))
        );
    }

    #[test]
    fn first_text_skips_blank_aliases() {
        let record = Record::new()
            .with("model", "   ")
            .with("modelo", "iPhone 12");
        assert_eq!(
            record.first_text(&["model", "product", "modelo"]),
            Some("iPhone 12".to_string())
        );
    }

    #[test]
    fn first_text_respects_alias_order_not_column_order() {
        let record = Record::new()
            .with("modelo", "second")
            .with("model", "first");
        assert_eq!(
            record.first_text(&["model", "modelo"]),
            Some("first".to_string())
        );
    }

    #[test]
    fn whole_numbers_stringify_without_fraction() {
        assert_eq!(Cell::Number(12.0).to_text(), "12");
        assert_eq!(Cell::Number(12.5).to_text(), "12.5");
        assert_eq!(Cell::Text("  abc ".to_string()).to_text(), "abc");
    }

    #[test]
    fn record_blankness_covers_every_cell() {
        assert!(Record::new()
            .with("a", "")
            .with("b", Cell::Empty)
            .is_blank());
        assert!(!Record::new().with("a", "").with("b", 0.0).is_blank());
    }

    #[test]
    fn open_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Workbook::open(&dir.path().join("missing.xlsx")).unwrap_err();
        assert!(matches!(err, CatalogError::SourceUnavailable { .. }));
        assert_eq!(err.code(), "source_unavailable");
    }

    #[test]
    fn open_non_spreadsheet_is_source_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prices.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").expect("write");
        let err = Workbook::open(&path).unwrap_err();
        assert!(matches!(err, CatalogError::SourceUnavailable { .. }));
    }

    #[test]
    fn absent_sheet_reads_as_empty_rows() {
        let workbook = Workbook::from_sheets([(SHEET_PRICES_USED, vec![Record::new()])]);
        assert!(workbook.sheet(SHEET_COLORS).is_none());
        assert!(workbook.rows(SHEET_COLORS).is_empty());
        assert_eq!(workbook.rows(SHEET_PRICES_USED).len(), 1);
    }
}
