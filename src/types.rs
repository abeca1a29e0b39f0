use crate::constants::{
    ELEMENT_NOT_FOUND, EMPLOYEE_LABEL_NOT_FOUND, INVALID_NUMBER, NEXT_SIBLING_NOT_FOUND,
    OUTPUT_HEADER, PARSED_NAN_PREFIX,
};
use crate::error::EnrichError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell as it arrives from the uploaded table.
///
/// Serialized untagged so the JSON upload format (`[["Acme", 123, null]]`)
/// maps straight onto it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Spreadsheet truthiness: empty cells, empty strings, zero and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One organization as read from the input table. Fields are addressed by
/// position only here; everything downstream works on named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputRow {
    pub cells: Vec<CellValue>,
}

impl InputRow {
    pub const NAME: usize = 0;
    pub const ACCOUNT_MANAGER: usize = 1;
    pub const PEOPLE: usize = 2;
    pub const REGISTRY_CODE: usize = 3;
    pub const TURNOVER: usize = 8;
    /// First input cell that has no named counterpart in the output.
    pub const EXTRA_START: usize = 9;

    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, index: usize) -> CellValue {
        self.cells.get(index).cloned().unwrap_or_default()
    }

    pub fn name(&self) -> String {
        self.cell(Self::NAME).to_string()
    }

    /// Empty rows and rows without a name are dropped before any enrichment.
    pub fn is_skippable(&self) -> bool {
        self.cells.is_empty() || !self.cell(Self::NAME).is_truthy()
    }

    /// Registry code with surrounding whitespace trimmed. Older uploads carry
    /// the code in the account-manager column, so that cell is the fallback.
    pub fn raw_registry_code(&self) -> String {
        let primary = self.cell(Self::REGISTRY_CODE);
        let code = if primary.is_empty() {
            self.cell(Self::ACCOUNT_MANAGER)
        } else {
            primary
        };
        code.to_string().trim().to_string()
    }
}

/// Employee count as read from the rendered profile page. Anything but a
/// count is a diagnostic that is written to the output instead of a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeCount {
    Count(i64),
    InvalidNumber,
    ElementNotFound,
    NextSiblingNotFound,
    LabelNotFound,
    NotANumber(String),
}

impl EmployeeCount {
    pub fn to_cell(&self) -> CellValue {
        match self {
            EmployeeCount::Count(n) => CellValue::Number(*n as f64),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for EmployeeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeCount::Count(n) => write!(f, "{}", n),
            EmployeeCount::InvalidNumber => f.write_str(INVALID_NUMBER),
            EmployeeCount::ElementNotFound => f.write_str(ELEMENT_NOT_FOUND),
            EmployeeCount::NextSiblingNotFound => f.write_str(NEXT_SIBLING_NOT_FOUND),
            EmployeeCount::LabelNotFound => f.write_str(EMPLOYEE_LABEL_NOT_FOUND),
            EmployeeCount::NotANumber(raw) => write!(f, "{}{}", PARSED_NAN_PREFIX, raw),
        }
    }
}

/// Fields extracted from the registry for one registry code.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryProfile {
    pub activity_code: String,
    pub activity_label: String,
    pub county: String,
    pub employee_count: EmployeeCount,
}

/// Enriched row. `account_manager` is always blank in the output and so has no field.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub name: String,
    pub people: CellValue,
    pub registry_code: String,
    pub profile: RegistryProfile,
    pub turnover: CellValue,
    pub profile_url: String,
    pub extra: Vec<CellValue>,
}

impl OutputRow {
    /// Cells in `OUTPUT_HEADER` order, followed by any extra input cells.
    pub fn to_cells(&self) -> Vec<CellValue> {
        let mut cells = vec![
            CellValue::from(self.name.as_str()),
            CellValue::from(""),
            self.people.clone(),
            CellValue::from(self.registry_code.as_str()),
            CellValue::from(self.profile.county.as_str()),
            CellValue::from(self.profile.activity_code.as_str()),
            CellValue::from(self.profile.activity_label.as_str()),
            self.profile.employee_count.to_cell(),
            self.turnover.clone(),
            CellValue::from(self.profile_url.as_str()),
        ];
        cells.extend(self.extra.iter().cloned());
        cells
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Matching,
    NonMatching,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Matching => "matching",
            Bucket::NonMatching => "non_matching",
        }
    }
}

/// A row whose enrichment was abandoned. `cells` holds the row as it stood
/// when it failed, for logging and summaries; it never reaches an output table.
#[derive(Debug)]
pub struct RowFailure {
    pub row_number: usize,
    pub cells: Vec<CellValue>,
    pub error: EnrichError,
}

/// Terminal state of one input row.
#[derive(Debug)]
pub enum RowOutcome {
    Skipped,
    Classified { bucket: Bucket, row: OutputRow },
    Failed(RowFailure),
}

/// Header plus data rows, ready for a spreadsheet writer.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn with_output_header() -> Self {
        Self {
            header: OUTPUT_HEADER.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_truthiness() {
        assert!(!CellValue::Empty.is_truthy());
        assert!(!CellValue::from("").is_truthy());
        assert!(!CellValue::from(0.0).is_truthy());
        assert!(!CellValue::from(false).is_truthy());
        assert!(CellValue::from("Acme").is_truthy());
        assert!(CellValue::from(12.0).is_truthy());
    }

    #[test]
    fn test_cells_deserialize_from_upload_json() {
        let row: Vec<CellValue> = serde_json::from_str(r#"["Acme", 12345678, null, true]"#).unwrap();
        assert_eq!(
            row,
            vec![
                CellValue::from("Acme"),
                CellValue::from(12345678.0),
                CellValue::Empty,
                CellValue::from(true)
            ]
        );
        assert_eq!(row[1].to_string(), "12345678");
    }

    #[test]
    fn test_skippable_rows() {
        assert!(InputRow::new(vec![]).is_skippable());
        assert!(InputRow::new(vec![CellValue::Empty, "x".into()]).is_skippable());
        assert!(InputRow::new(vec!["".into(), "x".into()]).is_skippable());
        assert!(!InputRow::new(vec!["Acme".into()]).is_skippable());
    }

    #[test]
    fn test_registry_code_falls_back_to_second_column() {
        let row = InputRow::new(vec!["Acme".into(), "EE123".into()]);
        assert_eq!(row.raw_registry_code(), "EE123");

        let row = InputRow::new(vec!["Acme".into(), "".into(), "".into(), " 456 ".into()]);
        assert_eq!(row.raw_registry_code(), "456");
    }

    #[test]
    fn test_employee_diagnostics_render_as_text() {
        assert_eq!(EmployeeCount::Count(12).to_cell(), CellValue::from(12.0));
        assert_eq!(EmployeeCount::InvalidNumber.to_cell(), CellValue::from("Invalid number"));
        assert_eq!(
            EmployeeCount::NotANumber("puudub".into()).to_string(),
            "Parsed value is NaN for text: puudub"
        );
    }

    #[test]
    fn test_output_row_cells_follow_header() {
        let row = OutputRow {
            name: "Example OÜ".into(),
            people: "Mari".into(),
            registry_code: "12345678".into(),
            profile: RegistryProfile {
                activity_code: "62011".into(),
                activity_label: "Programmeerimine".into(),
                county: "Harjumaa".into(),
                employee_count: EmployeeCount::Count(7),
            },
            turnover: CellValue::Empty,
            profile_url: "https://ariregister.rik.ee/est/company/12345678".into(),
            extra: vec!["note".into()],
        };
        let cells = row.to_cells();
        assert_eq!(cells.len(), OUTPUT_HEADER.len() + 1);
        assert_eq!(cells[1], CellValue::from(""));
        assert_eq!(cells[7], CellValue::from(7.0));
        assert_eq!(cells[9], CellValue::from("https://ariregister.rik.ee/est/company/12345678"));
        assert_eq!(cells[10], CellValue::from("note"));
    }
}
