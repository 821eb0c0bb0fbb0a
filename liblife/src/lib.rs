use anyhow::Context;
use generation::{Generation, GenerationConfig};
use graph::{GenerationGraph, GenerationKey};
use grid::Cell;
use log::debug;
use pos::Position;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

pub mod generation;
pub mod graph;
pub mod grid;
pub mod pos;
pub mod rule;

pub const DEFAULT_SIZE: usize = 5;

/// The seed for generation one when the game is played at the default size.
pub const TEST_PATTERN: [[Cell; DEFAULT_SIZE]; DEFAULT_SIZE] = [
    [0, 1, 0, 0, 0],
    [1, 0, 0, 1, 1],
    [1, 1, 0, 0, 1],
    [0, 1, 0, 0, 0],
    [1, 0, 0, 0, 1],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: usize,

    /// Seed for every random fill. Without one the random source is seeded from the OS.
    pub seed: Option<u64>,

    /// Whether generation one starts from [`TEST_PATTERN`]. Only honoured at the pattern's size.
    pub use_test_pattern: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: None,
            use_test_pattern: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum GenerationSlot {
    First,
    Second,
    Third,
}

/// Three generations chained root -> child -> grandchild. Only the first one is editable, the
/// other two are always derived from it.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    graph: GenerationGraph,
    keys: [GenerationKey; 3],
    rng: StdRng,
}

impl Game {
    pub fn new(size: usize) -> anyhow::Result<Self> {
        Self::with_config(GameConfig {
            size,
            ..Default::default()
        })
    }

    pub fn with_config(config: GameConfig) -> anyhow::Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut first = Generation::new(GenerationConfig {
            size: config.size,
            live_propagation: true,
        })?;

        if config.use_test_pattern && config.size == TEST_PATTERN.len() {
            first.load_from(&TEST_PATTERN)?;
        } else {
            first.generate_random(&mut rng)?;
        }

        let derived = || {
            Generation::new(GenerationConfig {
                size: config.size,
                live_propagation: false,
            })
        };

        let mut graph = GenerationGraph::new();
        let first = graph.insert_root(first);
        let second = graph
            .spawn_descendant(first, derived()?)
            .context("Couldn't derive the second generation")?;
        let third = graph
            .spawn_descendant(second, derived()?)
            .context("Couldn't derive the third generation")?;

        debug!("Created a {0}x{0} game from {config:?}", config.size);

        Ok(Self {
            config,
            graph,
            keys: [first, second, third],
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.generation(GenerationSlot::First).size()
    }

    pub fn generation(&self, slot: GenerationSlot) -> &Generation {
        &self.graph[self.keys[slot as usize]]
    }

    pub fn generations(&self) -> impl Iterator<Item = (GenerationSlot, &Generation)> {
        GenerationSlot::iter().map(move |slot| (slot, self.generation(slot)))
    }

    /// Re-derives the second generation from the first and the third from the second.
    pub fn evolve(&mut self) -> anyhow::Result<()> {
        let [_, second, third] = self.keys;

        self.graph.evolve_from_ancestor(second)?;
        self.graph.evolve_from_ancestor(third)?;

        debug!("Re-derived {second:?} and {third:?}");
        Ok(())
    }

    /// Edits a cell of the first generation. The derived generations follow within the call.
    pub fn set_cell_value<P>(&mut self, value: Cell, pos: P) -> anyhow::Result<()>
    where
        P: Into<Position>,
    {
        let pos = pos.into();
        debug!("Setting {pos:?} to {value}");

        self.graph.set_cell_value(self.keys[0], value, pos)
    }

    /// Loads a new seed into the first generation and re-derives the others.
    pub fn load_pattern<S>(&mut self, source: &[S]) -> anyhow::Result<()>
    where
        S: AsRef<[Cell]>,
    {
        self.graph[self.keys[0]].load_from(source)?;
        self.evolve()
    }

    pub fn generate_random(&mut self) -> anyhow::Result<()> {
        self.graph[self.keys[0]].generate_random(&mut self.rng)?;
        self.evolve()
    }

    /// Changes the size of every generation. The first one gets a random fill. Sizes above
    /// [`grid::MAX_SIZE`] are rejected and leave the game as it was.
    pub fn set_size(&mut self, size: usize) -> anyhow::Result<()> {
        self.graph[self.keys[0]].set_size(size, &mut self.rng)?;
        self.config.size = size;
        self.evolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: [[Cell; 5]; 5] = [
        [0, 0, 0, 0, 0],
        [1, 0, 1, 1, 1],
        [1, 1, 1, 1, 1],
        [0, 1, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ];

    const THIRD: [[Cell; 5]; 5] = [
        [0, 0, 0, 1, 0],
        [1, 0, 0, 0, 1],
        [1, 0, 0, 0, 1],
        [1, 1, 0, 1, 0],
        [0, 0, 0, 0, 0],
    ];

    fn matrix<const N: usize>(rows: [[Cell; N]; N]) -> Vec<Vec<Cell>> {
        rows.iter().map(|row| row.to_vec()).collect()
    }

    fn seeded_config() -> GameConfig {
        GameConfig {
            seed: Some(5),
            ..Default::default()
        }
    }

    fn matrices(game: &Game) -> Vec<Vec<Vec<Cell>>> {
        game.generations()
            .map(|(_, generation)| generation.grid().to_matrix())
            .collect()
    }

    #[test]
    fn default_game_derives_from_the_test_pattern() {
        let game = Game::with_config(seeded_config()).unwrap();

        assert_eq!(game.size(), 5);
        assert_eq!(
            game.generation(GenerationSlot::First).grid().to_matrix(),
            matrix(TEST_PATTERN)
        );
        assert_eq!(
            game.generation(GenerationSlot::Second).grid().to_matrix(),
            matrix(SECOND)
        );
        assert_eq!(
            game.generation(GenerationSlot::Third).grid().to_matrix(),
            matrix(THIRD)
        );
    }

    #[test]
    fn only_the_first_generation_propagates_live() {
        let game = Game::with_config(seeded_config()).unwrap();
        let flags = game
            .generations()
            .map(|(_, generation)| generation.live_propagation())
            .collect::<Vec<_>>();

        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn other_sizes_start_random() {
        let game = Game::with_config(GameConfig {
            size: 8,
            ..seeded_config()
        })
        .unwrap();

        for (_, generation) in game.generations() {
            assert_eq!(generation.size(), 8);
        }

        let mut expected = Generation::new(GenerationConfig::default()).unwrap();
        expected.evolve_from(game.generation(GenerationSlot::First));
        assert_eq!(expected.grid(), game.generation(GenerationSlot::Second).grid());
    }

    #[test]
    fn evolve_is_idempotent() {
        let mut game = Game::with_config(seeded_config()).unwrap();
        let before = matrices(&game);

        game.evolve().unwrap();
        let once = matrices(&game);
        game.evolve().unwrap();
        let twice = matrices(&game);

        assert_eq!(before, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn edit_cascades_like_a_fresh_game() {
        let mut game = Game::with_config(seeded_config()).unwrap();
        game.set_cell_value(1, [2, 2]).unwrap();

        let mut edited = TEST_PATTERN;
        edited[2][2] = 1;

        let mut fresh = Game::with_config(seeded_config()).unwrap();
        fresh.load_pattern(&edited).unwrap();
        fresh.evolve().unwrap();

        assert_eq!(matrices(&game), matrices(&fresh));
        assert_eq!(
            game.generation(GenerationSlot::Third).grid().to_matrix(),
            matrix([
                [0, 0, 0, 0, 0],
                [0, 1, 0, 1, 1],
                [0, 0, 1, 0, 1],
                [0, 1, 1, 1, 0],
                [0, 0, 0, 0, 0],
            ])
        );
    }

    #[test]
    fn set_size_resizes_every_generation() {
        let mut game = Game::with_config(seeded_config()).unwrap();
        game.set_size(9).unwrap();

        assert_eq!(game.config().size, 9);
        for (_, generation) in game.generations() {
            assert_eq!(generation.size(), 9);
        }
    }

    #[test]
    fn oversized_set_size_is_rejected() {
        let mut game = Game::with_config(seeded_config()).unwrap();
        let before = matrices(&game);

        assert!(game.set_size(1 << 33).is_err());
        assert!(game.set_size(grid::MAX_SIZE + 1).is_err());

        assert_eq!(game.size(), 5);
        assert_eq!(game.config().size, 5);
        assert_eq!(matrices(&game), before);
    }

    #[test]
    fn oversized_config_is_rejected() {
        let config = GameConfig {
            size: usize::MAX,
            ..seeded_config()
        };

        assert!(Game::with_config(config).is_err());
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let config = GameConfig {
            size: 12,
            ..seeded_config()
        };

        let mut a = Game::with_config(config).unwrap();
        let mut b = Game::with_config(config).unwrap();
        assert_eq!(matrices(&a), matrices(&b));

        a.generate_random().unwrap();
        b.generate_random().unwrap();
        assert_eq!(matrices(&a), matrices(&b));
    }

    #[test]
    fn load_pattern_rejects_wrong_size() {
        let mut game = Game::with_config(seeded_config()).unwrap();
        let source: [[Cell; 2]; 2] = [[1, 1], [1, 1]];

        assert!(game.load_pattern(&source).is_err());
        assert_eq!(
            game.generation(GenerationSlot::First).grid().to_matrix(),
            matrix(TEST_PATTERN)
        );
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: GameConfig = serde_json::from_str(r#"{ "seed": 3 }"#).unwrap();

        assert_eq!(
            config,
            GameConfig {
                size: DEFAULT_SIZE,
                seed: Some(3),
                use_test_pattern: true,
            }
        );
    }
}
