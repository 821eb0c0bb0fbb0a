use std::ops::{Index, IndexMut};

use anyhow::Context;
use log::{debug, trace};
use slotmap::{SlotMap, new_key_type};

use super::{
    generation::Generation,
    grid::Cell,
    pos::Position,
};

new_key_type! {
    pub struct GenerationKey;
}

/// Owns a set of generations and the ancestor -> descendant links between them.
///
/// A generation can only be linked to an ancestor that already exists at the moment it is
/// inserted, and links never change afterwards, so the links always form a DAG.
#[derive(Debug, Clone, Default)]
pub struct GenerationGraph {
    generations: SlotMap<GenerationKey, Generation>,
}

impl GenerationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a generation without an ancestor.
    pub fn insert_root(&mut self, mut generation: Generation) -> GenerationKey {
        generation.ancestor = None;
        generation.descendants.clear();

        self.generations.insert(generation)
    }

    /// Inserts `generation` as a descendant of `ancestor` and evolves it from the ancestor's
    /// current data.
    pub fn spawn_descendant(
        &mut self,
        ancestor: GenerationKey,
        mut generation: Generation,
    ) -> anyhow::Result<GenerationKey> {
        let ancestor_generation = self
            .generations
            .get(ancestor)
            .context("Unknown ancestor generation")?;

        generation.ancestor = Some(ancestor);
        generation.descendants.clear();
        generation.evolve_from(ancestor_generation);

        let key = self.generations.insert(generation);

        self.generations
            .get_mut(ancestor)
            .context("Unknown ancestor generation")?
            .descendants
            .push(key);

        debug!("Linked generation {key:?} to ancestor {ancestor:?}");
        Ok(key)
    }

    /// Re-derives a generation from its ancestor without touching any links.
    pub fn evolve_from_ancestor(&mut self, key: GenerationKey) -> anyhow::Result<()> {
        let ancestor_key = self
            .generations
            .get(key)
            .context("Unknown generation")?
            .ancestor
            .context("Generation has no ancestor")?;

        let [ancestor, generation] = self
            .generations
            .get_disjoint_mut([ancestor_key, key])
            .context("Ancestor generation is missing")?;

        generation.evolve_from(ancestor);
        Ok(())
    }

    /// Writes a cell of `key`. When the generation has live propagation enabled, every
    /// descendant is re-derived before returning, depth first.
    pub fn set_cell_value<P>(
        &mut self,
        key: GenerationKey,
        value: Cell,
        pos: P,
    ) -> anyhow::Result<()>
    where
        P: Into<Position>,
    {
        let generation = self.generations.get_mut(key).context("Unknown generation")?;
        generation.set_cell(pos, value)?;

        if generation.live_propagation() {
            self.refresh_descendants(key)?;
        }

        Ok(())
    }

    fn refresh_descendants(&mut self, key: GenerationKey) -> anyhow::Result<()> {
        let descendants = self
            .generations
            .get(key)
            .context("Unknown generation")?
            .descendants
            .clone();

        for descendant in descendants {
            trace!("Refreshing {descendant:?} after an update of {key:?}");

            self.evolve_from_ancestor(descendant)?;
            self.refresh_descendants(descendant)?;
        }

        Ok(())
    }
}

impl Index<GenerationKey> for GenerationGraph {
    type Output = Generation;

    fn index(&self, key: GenerationKey) -> &Self::Output {
        &self.generations[key]
    }
}

impl IndexMut<GenerationKey> for GenerationGraph {
    fn index_mut(&mut self, key: GenerationKey) -> &mut Self::Output {
        &mut self.generations[key]
    }
}
