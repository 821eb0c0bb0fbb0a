use std::fmt;

use anyhow::{Context, bail, ensure};
use itertools::Itertools;
use rand::Rng;

use super::pos::Position;

/// A cell value. Only `ALIVE` counts as alive; any other value is treated as dead when counting
/// neighbours, but is stored as-is.
pub type Cell = u8;

pub const DEAD: Cell = 0;
pub const ALIVE: Cell = 1;

/// The largest accepted side length.
pub const MAX_SIZE: usize = 1024;

fn cell_count(size: usize) -> anyhow::Result<usize> {
    ensure!(size <= MAX_SIZE, "Grid size {size} exceeds the maximum of {MAX_SIZE}");
    size.checked_mul(size)
        .with_context(|| format!("Grid size {size} overflows the cell count"))
}

/// A square, row-major matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> anyhow::Result<Self> {
        Ok(Self {
            size,
            cells: vec![DEAD; cell_count(size)?],
        })
    }

    pub fn new_random<R>(size: usize, rng: &mut R) -> anyhow::Result<Self>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Self::default();
        grid.resize(size, rng)?;
        Ok(grid)
    }

    pub fn from_rows<S>(rows: &[S]) -> anyhow::Result<Self>
    where
        S: AsRef<[Cell]>,
    {
        let mut grid = Self::new(rows.len())?;
        grid.set_all(rows)?;
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Discards the current cells and refills a `size`×`size` matrix with cells that are alive
    /// with probability 0.5 each. A size above [`MAX_SIZE`] is rejected and leaves the grid as is.
    pub fn resize<R>(&mut self, size: usize, rng: &mut R) -> anyhow::Result<()>
    where
        R: Rng + ?Sized,
    {
        let cell_count = cell_count(size)?;

        self.size = size;
        self.cells = (0..cell_count)
            .map(|_| if rng.random_bool(0.5) { ALIVE } else { DEAD })
            .collect();

        Ok(())
    }

    /// Copies `source` into the grid cell by cell. The source must be exactly `size`×`size`.
    pub fn set_all<S>(&mut self, source: &[S]) -> anyhow::Result<()>
    where
        S: AsRef<[Cell]>,
    {
        ensure!(
            source.len() == self.size,
            "Source has {} rows, grid is {}x{}",
            source.len(),
            self.size,
            self.size
        );

        if let Some((row_index, row)) = source
            .iter()
            .map(AsRef::<[Cell]>::as_ref)
            .find_position(|row| row.len() != self.size)
        {
            bail!(
                "Source row {row_index} has {} cells, grid is {}x{}",
                row.len(),
                self.size,
                self.size
            );
        }

        for (chunk, row) in self.cells.chunks_mut(self.size.max(1)).zip(source) {
            chunk.copy_from_slice(row.as_ref());
        }

        Ok(())
    }

    pub fn cell<P>(&self, pos: P) -> Option<Cell>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.cells.get(index).copied()
    }

    pub fn cell_mut<P>(&mut self, pos: P) -> Option<&mut Cell>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.cells.get_mut(index)
    }

    pub fn set_cell<P>(&mut self, pos: P, value: Cell) -> anyhow::Result<()>
    where
        P: Into<Position>,
    {
        let pos = pos.into();
        let size = self.size;

        let cell = self
            .cell_mut(pos)
            .with_context(|| format!("Cell {pos:?} is outside of the {size}x{size} grid"))?;
        *cell = value;

        Ok(())
    }

    pub fn is_alive<P>(&self, pos: P) -> bool
    where
        P: Into<Position>,
    {
        self.cell(pos) == Some(ALIVE)
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == ALIVE).count()
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        (0..self.size)
            .cartesian_product(0..self.size)
            .map(|(row, col)| Position { row, col })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() refuses a zero chunk size; an empty grid has no cells anyway.
        self.cells.chunks(self.size.max(1))
    }

    pub fn to_matrix(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { grid: self.clone() }
    }

    fn pos_to_index<P>(&self, pos: P) -> Option<usize>
    where
        P: Into<Position>,
    {
        let Position { row, col } = pos.into();

        if row >= self.size {
            return None;
        }

        if col >= self.size {
            return None;
        }

        Some(col + row * self.size)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}

/// A frozen copy of a grid taken before an evolution pass. Neighbour counts are only ever read
/// from a snapshot, so every cell of a pass sees the same pre-step state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: Grid,
}

impl Snapshot {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Live cells among the eight neighbours of `pos`. Neighbours outside the grid count as dead.
    pub fn count_live_neighbors<P>(&self, pos: P) -> usize
    where
        P: Into<Position>,
    {
        pos.into()
            .neighbors()
            .filter(|neighbor| self.grid.is_alive(*neighbor))
            .count()
    }
}
