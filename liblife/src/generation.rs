use anyhow::Context;
use rand::Rng;

use super::{
    DEFAULT_SIZE,
    graph::GenerationKey,
    grid::{Cell, Grid, Snapshot},
    pos::Position,
    rule::Rule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Uninitialized,
    Seeded,
    Evolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    pub size: usize,

    /// Whether edits to this generation re-derive its descendants immediately.
    pub live_propagation: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            live_propagation: false,
        }
    }
}

/// One grid in a chain of generations.
///
/// Links to other generations are keys into the [`GenerationGraph`](super::graph::GenerationGraph)
/// that owns it and are only ever set when the generation is inserted there.
#[derive(Debug, Clone)]
pub struct Generation {
    grid: Grid,
    rule: Rule,
    live_propagation: bool,
    state: GenerationState,

    /// The pre-step state of the most recent evolution pass.
    previous: Option<Snapshot>,

    pub(crate) ancestor: Option<GenerationKey>,
    pub(crate) descendants: Vec<GenerationKey>,
}

impl Generation {
    pub fn new(config: GenerationConfig) -> anyhow::Result<Self> {
        Ok(Self {
            grid: Grid::new(config.size).context("Couldn't create generation")?,
            rule: Rule,
            live_propagation: config.live_propagation,
            state: GenerationState::Uninitialized,
            previous: None,
            ancestor: None,
            descendants: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    pub fn live_propagation(&self) -> bool {
        self.live_propagation
    }

    pub fn ancestor(&self) -> Option<GenerationKey> {
        self.ancestor
    }

    pub fn descendants(&self) -> &[GenerationKey] {
        &self.descendants
    }

    /// Resizes the grid, throwing away its data in favour of a random fill. A rejected size
    /// leaves the generation untouched.
    pub fn set_size<R>(&mut self, size: usize, rng: &mut R) -> anyhow::Result<()>
    where
        R: Rng + ?Sized,
    {
        self.grid
            .resize(size, rng)
            .context("Couldn't resize generation")?;
        self.previous = None;
        self.state = GenerationState::Seeded;

        Ok(())
    }

    pub fn generate_random<R>(&mut self, rng: &mut R) -> anyhow::Result<()>
    where
        R: Rng + ?Sized,
    {
        let size = self.size();
        self.set_size(size, rng)
    }

    pub fn load_from<S>(&mut self, source: &[S]) -> anyhow::Result<()>
    where
        S: AsRef<[Cell]>,
    {
        self.grid
            .set_all(source)
            .context("Couldn't load generation data")?;
        self.state = GenerationState::Seeded;

        Ok(())
    }

    /// Takes over the ancestor's size and copies its cells.
    pub fn load_from_ancestor(&mut self, ancestor: &Generation) {
        if self.size() != ancestor.size() {
            self.previous = None;
        }

        self.grid.clone_from(&ancestor.grid);
        self.state = GenerationState::Seeded;
    }

    /// Replaces this generation with the ancestor's data advanced by one step.
    pub fn evolve_from(&mut self, ancestor: &Generation) {
        self.load_from_ancestor(ancestor);
        self.evolve_steps(1);
    }

    /// Advances the current grid in place.
    pub fn evolve_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }

        if steps > 0 {
            self.state = GenerationState::Evolved;
        }
    }

    /// Writes a single cell. Propagation to descendants is the graph's job, see
    /// [`GenerationGraph::set_cell_value`](super::graph::GenerationGraph::set_cell_value).
    pub fn set_cell<P>(&mut self, pos: P, value: Cell) -> anyhow::Result<()>
    where
        P: Into<Position>,
    {
        self.grid.set_cell(pos, value)
    }

    fn step(&mut self) {
        let snapshot = self.grid.snapshot();

        for pos in self.grid.positions() {
            let live_neighbor_count = snapshot.count_live_neighbors(pos);

            if let Some(cell) = self.grid.cell_mut(pos) {
                *cell = self.rule.next_value(*cell, live_neighbor_count);
            }
        }

        self.previous = Some(snapshot);
    }
}
