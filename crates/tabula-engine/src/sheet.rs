//! The sheet: sparse cell storage plus dependency bookkeeping.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;

use tabula_model::{CellKey, CellValue, InvalidPositionError, Position, Size};

use crate::cell::{Cell, CellContent};
use crate::error::SetCellError;
use crate::eval::ValueResolver;
use crate::graph::DependencyGraph;

/// A two-dimensional sparse grid of cells.
///
/// The sheet owns all cell storage and the dependency graph between formula
/// cells. Writes go through [`Sheet::set_cell`], which validates the new
/// content (parse, then acyclicity) before mutating anything, then rewires
/// dependency edges and invalidates every downstream memoized value.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: HashMap<CellKey, Cell>,
    graph: DependencyGraph,
    /// Bottom-right corner of the bounding box of stored cells.
    extent: Option<Position>,
}

enum PrintKind {
    Values,
    Texts,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(pos: Position) -> Result<CellKey, InvalidPositionError> {
        CellKey::try_from_position(pos).ok_or(InvalidPositionError(pos))
    }

    /// Set the cell at `pos` from raw input text.
    ///
    /// Empty text clears the content, `=`-prefixed text is parsed as a
    /// formula, anything else is stored as text. A formula write that fails
    /// to parse, or whose references would make the dependency graph cyclic,
    /// is rejected with the sheet left exactly as it was.
    /// On success, cells referenced by the formula that do not exist
    /// yet are materialized as empty cells so the printable region and the
    /// dependency graph agree on their existence.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SetCellError> {
        let key = Self::key(pos)?;
        let content = CellContent::parse(text)?;

        let references: Vec<CellKey> = content
            .formula()
            .map(|formula| {
                formula
                    .referenced_cells()
                    .into_iter()
                    .filter_map(CellKey::try_from_position)
                    .collect()
            })
            .unwrap_or_default();

        if let Some(cycle) = self.graph.find_cycle(key, &references) {
            return Err(SetCellError::Cycle(cycle));
        }

        // Validation passed; from here on the write always commits.
        self.graph.clear_precedents(key);
        self.invalidate_dependents(key);
        for &reference in &references {
            self.materialize(reference);
        }
        self.graph.set_precedents(key, &references);

        match self.cells.get_mut(&key) {
            Some(cell) => cell.set_content(content),
            None => {
                self.cells.insert(key, Cell::new(content));
            }
        }
        self.expand_extent(pos);
        Ok(())
    }

    /// Get the cell at `pos`, if present.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, InvalidPositionError> {
        let key = Self::key(pos)?;
        Ok(self.cells.get(&key))
    }

    /// The value of the cell at `pos`; [`CellValue::Empty`] when absent.
    ///
    /// Formula values are computed lazily and memoized; rereading a cell
    /// whose inputs have not changed is free.
    pub fn get_value(&self, pos: Position) -> Result<CellValue, InvalidPositionError> {
        let key = Self::key(pos)?;
        Ok(self
            .cells
            .get(&key)
            .map(|cell| cell.get_value(self))
            .unwrap_or(CellValue::Empty))
    }

    /// Clear the cell at `pos`.
    ///
    /// Its own dependency edges are removed and downstream memoized values
    /// are invalidated. The cell object is dropped only when no formula
    /// references it; otherwise its content is replaced with empty, so that
    /// referencing formulas keep reading a (now empty) cell at a stable
    /// address.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), InvalidPositionError> {
        let key = Self::key(pos)?;
        if !self.cells.contains_key(&key) {
            return Ok(());
        }

        self.graph.clear_precedents(key);
        self.invalidate_dependents(key);

        if self.graph.has_dependents(key) {
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.set_content(CellContent::Empty);
            }
        } else {
            self.cells.remove(&key);
            self.shrink_extent(pos);
        }
        Ok(())
    }

    /// Dimensions of the smallest rectangle anchored at `A1` that contains
    /// every stored cell. `(0, 0)` for an empty sheet.
    pub fn printable_size(&self) -> Size {
        match self.extent {
            Some(extent) => Size::new(extent.row + 1, extent.col + 1),
            None => Size::new(0, 0),
        }
    }

    /// Write the printable region as tab-separated cell values, one `\n`
    /// terminated line per row. Absent and empty cells print nothing; error
    /// values print their code.
    pub fn print_values<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.print(out, PrintKind::Values)
    }

    /// Write the printable region as tab-separated raw cell texts, one `\n`
    /// terminated line per row.
    pub fn print_texts<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.print(out, PrintKind::Texts)
    }

    fn print<W: io::Write>(&self, out: &mut W, kind: PrintKind) -> io::Result<()> {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                let cell = CellKey::try_from_position(Position::new(row, col))
                    .and_then(|key| self.cells.get(&key));
                if let Some(cell) = cell {
                    match kind {
                        PrintKind::Values => write!(out, "{}", cell.get_value(self))?,
                        PrintKind::Texts => write!(out, "{}", cell.get_text())?,
                    }
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Ensure a cell object exists at `key` so dependency edges and the
    /// printable region account for it.
    fn materialize(&mut self, key: CellKey) {
        if !self.cells.contains_key(&key) {
            self.cells.insert(key, Cell::default());
            self.expand_extent(key.to_position());
        }
    }

    /// Clear the memoized value of every formula cell that transitively
    /// reads `origin`.
    ///
    /// Worklist traversal over the reverse edges. A visited cell whose cache
    /// is already empty is not expanded further: everything above it was
    /// invalidated when its own cache was cleared, which keeps the total
    /// work proportional to the number of caches actually dropped.
    fn invalidate_dependents(&mut self, origin: CellKey) {
        let mut queue: VecDeque<CellKey> = self.graph.dependents_of(origin).iter().copied().collect();
        let mut seen: HashSet<CellKey> = queue.iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            let cleared = self
                .cells
                .get_mut(&current)
                .map(Cell::clear_cache)
                .unwrap_or(false);
            if !cleared {
                continue;
            }
            for &dependent in self.graph.dependents_of(current) {
                if seen.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
    }

    fn expand_extent(&mut self, pos: Position) {
        match &mut self.extent {
            None => self.extent = Some(pos),
            Some(extent) => {
                extent.row = extent.row.max(pos.row);
                extent.col = extent.col.max(pos.col);
            }
        }
    }

    /// Recompute the bounding box after removing the cell at `pos`, but only
    /// when that cell sat on the box boundary.
    fn shrink_extent(&mut self, pos: Position) {
        let Some(extent) = self.extent else {
            return;
        };
        if pos.row < extent.row && pos.col < extent.col {
            return;
        }
        self.extent = self.cells.keys().fold(None, |acc: Option<Position>, key| {
            let pos = key.to_position();
            Some(match acc {
                None => pos,
                Some(acc) => Position::new(acc.row.max(pos.row), acc.col.max(pos.col)),
            })
        });
    }
}

impl ValueResolver for Sheet {
    fn cell_value(&self, pos: Position) -> CellValue {
        CellKey::try_from_position(pos)
            .and_then(|key| self.cells.get(&key))
            .map(|cell| cell.get_value(self))
            .unwrap_or(CellValue::Empty)
    }
}
