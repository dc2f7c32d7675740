use core::fmt;
use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Position;

/// In-band formula evaluation failure.
///
/// These are legal cell values, not exceptions: a formula whose evaluation
/// fails stores and propagates the error the same way a number would be.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormulaError {
    /// A reference denotes a cell outside the sheet bounds.
    Ref,
    /// An operand cannot be coerced to a number.
    Value,
    /// Division by zero, overflow or any other non-finite result.
    Arithmetic,
}

impl FormulaError {
    /// The canonical spelling of the error (including punctuation).
    pub const fn as_str(self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithmetic => "#ARITHM!",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormulaError {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "#REF!" => Ok(FormulaError::Ref),
            "#VALUE!" => Ok(FormulaError::Value),
            "#ARITHM!" => Ok(FormulaError::Arithmetic),
            _ => Err(UnknownErrorCode),
        }
    }
}

/// Failed to parse a [`FormulaError`] from its code string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownErrorCode;

impl fmt::Display for UnknownErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown formula error code")
    }
}

impl std::error::Error for UnknownErrorCode {}

impl Serialize for FormulaError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FormulaError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FormulaError>()
            .map_err(|_| D::Error::custom(format!("unknown formula error code: {s}")))
    }
}

/// A sheet operation received a position outside the sheet bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidPositionError(pub Position);

impl fmt::Display for InvalidPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell position ({}, {})", self.0.row, self.0.col)
    }
}

impl std::error::Error for InvalidPositionError {}
