//! Engine error types.

use thiserror::Error;

use tabula_model::InvalidPositionError;

use crate::graph::CycleError;
use crate::parser::FormulaParseError;

/// A write through [`Sheet::set_cell`](crate::Sheet::set_cell) was rejected.
///
/// Every variant leaves the sheet exactly as it was: classification and
/// parsing happen before any mutation, and the acyclicity check runs against
/// the live graph without touching it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetCellError {
    #[error(transparent)]
    InvalidPosition(#[from] InvalidPositionError),
    #[error("invalid formula: {0}")]
    Parse(#[from] FormulaParseError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
}
