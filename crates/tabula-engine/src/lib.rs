#![forbid(unsafe_code)]

//! In-memory spreadsheet engine.
//!
//! A [`Sheet`] is a sparse grid of cells holding empty content, literal text
//! or a formula over other cells. Formulas are parsed into an AST
//! ([`Formula`]), their cell references become edges in a dependency graph,
//! and computed values are memoized per cell. Writes validate before they
//! commit: a syntactically invalid or cycle-introducing formula leaves the
//! sheet untouched. Any committed change invalidates the memoized values of
//! every formula downstream of the written cell.
//!
//! ```
//! use tabula_engine::{CellValue, Position, Sheet};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::from_string("A1"), "10")?;
//! sheet.set_cell(Position::from_string("B1"), "=A1*2+1")?;
//! assert_eq!(
//!     sheet.get_value(Position::from_string("B1"))?,
//!     CellValue::Number(21.0)
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
mod cell;
mod error;
mod eval;
mod graph;
mod parser;
mod sheet;

pub use cell::{Cell, ESCAPE_SIGN, FORMULA_SIGN};
pub use error::SetCellError;
pub use eval::ValueResolver;
pub use graph::CycleError;
pub use parser::{parse_formula, FormulaParseError};
pub use sheet::Sheet;

pub use ast::Formula;
pub use tabula_model::{
    CellValue, FormulaError, InvalidPositionError, Position, Size, MAX_COLS, MAX_POSITION_LENGTH,
    MAX_POS_LETTER_COUNT, MAX_ROWS,
};
