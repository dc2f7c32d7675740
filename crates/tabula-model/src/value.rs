use core::fmt;

use serde::{Deserialize, Serialize};

use crate::FormulaError;

/// The value a consumer observes when reading a cell.
///
/// The enum uses an explicit `{type, value}` tagged layout for stable IPC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Empty / unset cell value. Displays identically to empty text.
    Empty,
    /// IEEE-754 double precision number.
    Number(f64),
    /// Plain string, with any leading escape character already stripped.
    Text(String),
    /// In-band evaluation failure.
    Error(FormulaError),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Returns true if the value is [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns true if the value is [`CellValue::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => f.write_str(e.as_str()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<FormulaError> for CellValue {
    fn from(value: FormulaError) -> Self {
        CellValue::Error(value)
    }
}
