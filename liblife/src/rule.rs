use super::grid::{ALIVE, Cell, DEAD};

/// Conway's B3/S23 rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rule;

impl Rule {
    pub fn next_value(&self, current: Cell, live_neighbor_count: usize) -> Cell {
        match live_neighbor_count {
            // Isolation.
            0 | 1 => DEAD,
            // The only count that keeps whatever value the cell already has.
            2 => current,
            3 => ALIVE,
            // Overcrowding.
            _ => DEAD,
        }
    }
}
