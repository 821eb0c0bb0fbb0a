use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use liblife::{
    DEFAULT_SIZE, Game, GameConfig,
    grid::{ALIVE, Cell, DEAD},
};
use log::warn;
use strum::EnumString;

use crate::{State, render::render};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
enum Command {
    Show,
    Set,
    Evolve,
    Random,
    Resize,
    Reset,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub fn run_cli<R, W>(state: &mut State, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line_res in input.lines() {
        let line = line_res.context("Couldn't read command")?;
        let mut args = line.split_whitespace().peekable();

        if args.peek().is_none() {
            continue;
        }

        match handle_cmd(state, args, output) {
            Ok(Flow::Continue) => writeln!(output, "OK")?,
            Ok(Flow::Exit) => break,
            Err(e) => {
                warn!("Command {line:?} failed: {e:#}");
                writeln!(output, "! {e:#}")?;
            }
        }
    }

    Ok(())
}

fn handle_cmd<'a, I, W>(state: &mut State, mut args: I, output: &mut W) -> anyhow::Result<Flow>
where
    I: Iterator<Item = &'a str>,
    W: Write,
{
    let command = args.next().context("No command")?;
    let command = command
        .parse::<Command>()
        .with_context(|| format!("Unknown command {command:?}"))?;

    match command {
        Command::Show => {
            write!(output, "{}", render(&state.game))?;
        }

        Command::Set => {
            let row = args.next().context("missing row")?.parse::<usize>()?;
            let col = args.next().context("missing col")?.parse::<usize>()?;
            let value = parse_cell(args.next().context("missing value")?);

            state.game.set_cell_value(value, [row, col])?;
            write!(output, "{}", render(&state.game))?;
        }

        Command::Evolve => {
            state.game.evolve()?;
            write!(output, "{}", render(&state.game))?;
        }

        Command::Random => {
            state.game.generate_random()?;
            write!(output, "{}", render(&state.game))?;
        }

        Command::Resize => {
            let size = args.next().context("missing size")?.parse::<usize>()?;

            state.game.set_size(size)?;
            write!(output, "{}", render(&state.game))?;
        }

        Command::Reset => {
            // The fixed pattern only exists at its own size.
            let config = match args.next() {
                None => state.config,
                Some("test") => GameConfig {
                    size: DEFAULT_SIZE,
                    use_test_pattern: true,
                    ..state.config
                },
                Some("random") => GameConfig {
                    use_test_pattern: false,
                    ..state.config
                },
                Some(other) => bail!("Unknown seed {other:?}, expected test or random"),
            };

            state.game = Game::with_config(config)?;
            write!(output, "{}", render(&state.game))?;
        }

        Command::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

/// Anything that doesn't read as a 0 or a 1 becomes a dead cell.
fn parse_cell(raw: &str) -> Cell {
    raw.parse::<Cell>()
        .ok()
        .filter(|value| *value == ALIVE || *value == DEAD)
        .unwrap_or(DEAD)
}
