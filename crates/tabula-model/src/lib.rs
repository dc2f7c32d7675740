#![forbid(unsafe_code)]

//! Data model for the tabula spreadsheet engine.
//!
//! This crate defines the address algebra ([`Position`], [`CellKey`],
//! [`Size`]) and the value model ([`CellValue`], [`FormulaError`]) shared by
//! the engine and its consumers. It carries no evaluation logic.

mod error;
mod position;
mod value;

pub use error::{FormulaError, InvalidPositionError, UnknownErrorCode};
pub use position::{
    column_name, CellKey, Position, Size, MAX_COLS, MAX_POSITION_LENGTH, MAX_POS_LETTER_COUNT,
    MAX_ROWS,
};
pub use value::CellValue;
