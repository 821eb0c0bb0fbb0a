use std::{
    env, fs,
    io::{self, Write},
    path::Path,
};

use anyhow::Context;
use liblife::{Game, GameConfig};
use log::info;

mod cli;
mod render;

pub struct State {
    game: Game,
    config: GameConfig,
}

impl State {
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        Ok(Self {
            game: Game::with_config(config)?,
            config,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(config_path) => load_config(config_path)?,
        None => GameConfig::default(),
    };

    info!("Starting a {0}x{0} game", config.size);
    let mut state = State::new(config)?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render::render(&state.game))?;

    cli::run_cli(&mut state, io::stdin().lock(), &mut stdout)
}

fn load_config<P>(path: P) -> anyhow::Result<GameConfig>
where
    P: AsRef<Path>,
{
    let config_serialized = fs::read(path).context("Couldn't read config")?;
    let config =
        serde_json::from_slice(&config_serialized).context("Couldn't deserialize config")?;
    Ok(config)
}
