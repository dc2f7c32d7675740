//! Parsed formula representation.

use core::fmt;
use std::collections::HashSet;

use tabula_model::{column_name, Position};

/// Binary arithmetic operators, in increasing binding strength `+ -` < `* /`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    const fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// Unary sign operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    const fn symbol(self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

/// A node of the formula expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// A cell reference. The position may lie outside the sheet bounds, in
    /// which case evaluation yields `#REF!`.
    Reference(Position),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A parsed formula.
///
/// Obtained from [`parse_formula`](crate::parse_formula). The `Display`
/// impl produces the canonical expression text: redundant parentheses are
/// omitted according to operator precedence and associativity, so two equal
/// formulas always print identically.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    pub(crate) fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// The root of the expression tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The cells this formula reads, unique, in first-occurrence order.
    ///
    /// References to cells outside the sheet bounds are excluded: they always
    /// evaluate to `#REF!` and are not dependencies.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_references(&self.expr, &mut seen, &mut out);
        out
    }
}

fn collect_references(expr: &Expr, seen: &mut HashSet<Position>, out: &mut Vec<Position>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Reference(pos) => {
            if pos.is_valid() && seen.insert(*pos) {
                out.push(*pos);
            }
        }
        Expr::Unary { expr, .. } => collect_references(expr, seen, out),
        Expr::Binary { left, right, .. } => {
            collect_references(left, seen, out);
            collect_references(right, seen, out);
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(&self.expr, f)
    }
}

fn write_expr(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expr {
        Expr::Number(n) => write!(f, "{n}"),
        // Written from the raw coordinates: invalid references must still
        // print the address they were parsed from.
        Expr::Reference(pos) => {
            write!(f, "{}{}", column_name(pos.col), i64::from(pos.row) + 1)
        }
        Expr::Unary { op, expr } => {
            write!(f, "{}", op.symbol())?;
            let parens = matches!(
                expr.as_ref(),
                Expr::Binary {
                    op: BinaryOp::Add | BinaryOp::Sub,
                    ..
                }
            );
            write_operand(expr, f, parens)
        }
        Expr::Binary { op, left, right } => {
            write_operand(left, f, needs_parens(left, *op, false))?;
            write!(f, "{}", op.symbol())?;
            write_operand(right, f, needs_parens(right, *op, true))
        }
    }
}

fn write_operand(expr: &Expr, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
    if parens {
        f.write_str("(")?;
        write_expr(expr, f)?;
        f.write_str(")")
    } else {
        write_expr(expr, f)
    }
}

/// Whether a binary operand must keep its parentheses to preserve evaluation
/// order under the parent operator.
fn needs_parens(child: &Expr, parent: BinaryOp, right: bool) -> bool {
    let child_op = match child {
        Expr::Binary { op, .. } => *op,
        _ => return false,
    };
    match parent {
        BinaryOp::Add => false,
        BinaryOp::Sub => right && matches!(child_op, BinaryOp::Add | BinaryOp::Sub),
        BinaryOp::Mul => matches!(child_op, BinaryOp::Add | BinaryOp::Sub),
        BinaryOp::Div => matches!(child_op, BinaryOp::Add | BinaryOp::Sub) || right,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use crate::parse_formula;
    use tabula_model::Position;

    #[test]
    fn referenced_cells_are_unique_in_first_occurrence_order() {
        let formula = parse_formula("=B1+A1*B1+C2").unwrap();
        assert_eq!(
            formula.referenced_cells(),
            vec![
                Position::new(0, 1),
                Position::new(0, 0),
                Position::new(1, 2),
            ]
        );
    }

    #[test]
    fn out_of_bounds_references_are_not_dependencies() {
        let formula = parse_formula("=ZZZ999+A1").unwrap();
        assert_eq!(formula.referenced_cells(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn literal_formulas_reference_nothing() {
        let formula = parse_formula("=1+2*3").unwrap();
        assert_eq!(formula.referenced_cells(), Vec::new());
    }

    proptest! {
        /// Canonical text is a fixed point: printing, reparsing and printing
        /// again yields the same text.
        #[test]
        fn canonical_display_is_stable(src in "[0-9]{1,3}([+*/-][0-9]{1,3}){0,4}") {
            let Ok(first) = parse_formula(&src) else { return Ok(()) };
            let printed = first.to_string();
            let reparsed = parse_formula(&printed).unwrap();
            prop_assert_eq!(reparsed.to_string(), printed);
        }
    }
}
