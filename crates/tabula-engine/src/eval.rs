//! Formula evaluation.

use tabula_model::{CellValue, FormulaError, Position};

use crate::ast::{BinaryOp, Expr, Formula, UnaryOp};

/// Supplies cell values to formula evaluation.
///
/// [`Sheet`](crate::Sheet) implements this by reading (and lazily computing)
/// the referenced cells; tests and standalone consumers can back it with any
/// lookup they like.
pub trait ValueResolver {
    /// Current value of the cell at `pos`. Absent cells are
    /// [`CellValue::Empty`].
    fn cell_value(&self, pos: Position) -> CellValue;
}

impl Formula {
    /// Evaluate against `resolver`.
    ///
    /// The result is always [`CellValue::Number`] or [`CellValue::Error`];
    /// evaluation failures are in-band values, never panics or `Err`s.
    pub fn evaluate(&self, resolver: &dyn ValueResolver) -> CellValue {
        match eval_expr(self.expr(), resolver) {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

fn eval_expr(expr: &Expr, resolver: &dyn ValueResolver) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => finite(*n),
        Expr::Reference(pos) => {
            if !pos.is_valid() {
                return Err(FormulaError::Ref);
            }
            coerce_to_number(resolver.cell_value(*pos))
        }
        Expr::Unary { op, expr } => {
            let n = eval_expr(expr, resolver)?;
            Ok(match op {
                UnaryOp::Plus => n,
                UnaryOp::Minus => -n,
            })
        }
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, resolver)?;
            let r = eval_expr(right, resolver)?;
            match op {
                BinaryOp::Add => finite(l + r),
                BinaryOp::Sub => finite(l - r),
                BinaryOp::Mul => finite(l * r),
                BinaryOp::Div => {
                    if r == 0.0 {
                        Err(FormulaError::Arithmetic)
                    } else {
                        finite(l / r)
                    }
                }
            }
        }
    }
}

fn finite(n: f64) -> Result<f64, FormulaError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(FormulaError::Arithmetic)
    }
}

/// Coerce a referenced cell's value to a number.
///
/// Empty and empty text coerce to `0.0`; other text must parse as a finite
/// number in its entirety; errors propagate unchanged.
fn coerce_to_number(value: CellValue) -> Result<f64, FormulaError> {
    match value {
        CellValue::Empty => Ok(0.0),
        CellValue::Number(n) => Ok(n),
        CellValue::Text(s) => {
            if s.is_empty() {
                return Ok(0.0);
            }
            match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(FormulaError::Value),
            }
        }
        CellValue::Error(e) => Err(e),
    }
}
