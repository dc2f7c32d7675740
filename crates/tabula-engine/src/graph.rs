//! Cell dependency tracking.

use core::fmt;
use std::collections::{HashMap, HashSet, VecDeque};

use tabula_model::{CellKey, Position};

/// The dependency graph between formula cells and the cells they read.
///
/// Edges are keyed by cell address, never by object identity, so removing a
/// cell from the sheet cannot dangle an edge. Both directions are stored and
/// kept symmetric with matching multiplicities:
///
/// - `precedents[c]`: the cells `c`'s formula reads (its out-edges)
/// - `dependents[p]`: the formula cells that read `p` (its in-edges)
///
/// Entries are removed when their last edge goes away, so an address that
/// participates in no edge has no footprint here.
#[derive(Debug, Clone, Default)]
pub(crate) struct DependencyGraph {
    precedents: HashMap<CellKey, Vec<CellKey>>,
    dependents: HashMap<CellKey, Vec<CellKey>>,
}

impl DependencyGraph {
    /// Replace the out-edges of `cell` with `new`, balancing the reverse
    /// lists on both sides.
    pub(crate) fn set_precedents(&mut self, cell: CellKey, new: &[CellKey]) {
        self.clear_precedents(cell);
        if new.is_empty() {
            return;
        }
        self.precedents.insert(cell, new.to_vec());
        for &precedent in new {
            self.dependents.entry(precedent).or_default().push(cell);
        }
    }

    /// Remove all out-edges of `cell`, removing one matching occurrence of
    /// `cell` from each precedent's dependent list.
    pub(crate) fn clear_precedents(&mut self, cell: CellKey) {
        let Some(old) = self.precedents.remove(&cell) else {
            return;
        };
        for precedent in old {
            if let Some(list) = self.dependents.get_mut(&precedent) {
                if let Some(idx) = list.iter().position(|&d| d == cell) {
                    list.swap_remove(idx);
                }
                if list.is_empty() {
                    self.dependents.remove(&precedent);
                }
            }
        }
    }

    /// The cells `cell`'s formula reads directly.
    pub(crate) fn precedents_of(&self, cell: CellKey) -> &[CellKey] {
        self.precedents.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The formula cells that read `cell` directly.
    pub(crate) fn dependents_of(&self, cell: CellKey) -> &[CellKey] {
        self.dependents.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if at least one formula reads `cell`.
    pub(crate) fn has_dependents(&self, cell: CellKey) -> bool {
        self.dependents.contains_key(&cell)
    }

    /// Check whether giving `cell` the out-edges `candidates` would close a
    /// cycle, without mutating anything.
    ///
    /// Breadth-first search from the candidate set following live out-edges;
    /// reaching `cell` itself means the write must be rejected. `cell`'s own
    /// current out-edges are never expanded, which is exactly the "as if its
    /// edges were replaced" semantics. Work is bounded by the reachable
    /// sub-graph via the visited set.
    pub(crate) fn find_cycle(&self, cell: CellKey, candidates: &[CellKey]) -> Option<CycleError> {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        // Predecessor in the search, for reconstructing the cycle path.
        let mut came_from: HashMap<CellKey, CellKey> = HashMap::new();

        for &candidate in candidates {
            if visited.insert(candidate) {
                came_from.insert(candidate, cell);
                queue.push_back(candidate);
            }
        }

        while let Some(current) = queue.pop_front() {
            if current == cell {
                return Some(CycleError {
                    path: reconstruct_path(cell, current, &came_from),
                });
            }
            for &next in self.precedents_of(current) {
                if visited.insert(next) {
                    came_from.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// True when every stored edge appears in both directions with the same
    /// multiplicity. Cheap enough to assert after every mutation in tests.
    #[cfg(test)]
    pub(crate) fn edges_balanced(&self) -> bool {
        let count = |map: &HashMap<CellKey, Vec<CellKey>>, from: CellKey, to: CellKey| {
            map.get(&from)
                .map(|list| list.iter().filter(|&&k| k == to).count())
                .unwrap_or(0)
        };

        self.precedents.iter().all(|(&cell, targets)| {
            !targets.is_empty()
                && targets
                    .iter()
                    .all(|&t| count(&self.precedents, cell, t) == count(&self.dependents, t, cell))
        }) && self.dependents.iter().all(|(&cell, sources)| {
            !sources.is_empty()
                && sources
                    .iter()
                    .all(|&s| count(&self.dependents, cell, s) == count(&self.precedents, s, cell))
        })
    }
}

fn reconstruct_path(
    start: CellKey,
    hit: CellKey,
    came_from: &HashMap<CellKey, CellKey>,
) -> Vec<Position> {
    let mut keys = vec![hit];
    let mut current = hit;
    while let Some(&prev) = came_from.get(&current) {
        keys.push(prev);
        if prev == start {
            break;
        }
        current = prev;
    }
    keys.reverse();
    keys.into_iter().map(CellKey::to_position).collect()
}

/// A rejected write: the candidate formula would introduce a circular
/// reference.
///
/// `path` walks the would-be cycle from the written cell back to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub path: Vec<Position>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular reference: ")?;
        for (idx, pos) in self.path.iter().enumerate() {
            if idx > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{pos}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleError {}
