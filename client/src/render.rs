use itertools::Itertools;
use liblife::Game;

const COLUMN_GAP: &str = "   ";

/// Draws the three generations next to each other, one grid row per line.
pub fn render(game: &Game) -> String {
    let columns = game
        .generations()
        .map(|(slot, generation)| {
            let rows = generation
                .grid()
                .rows()
                .map(|row| row.iter().join(" "))
                .collect_vec();

            (slot.to_string(), rows)
        })
        .collect_vec();

    let width = columns
        .iter()
        .flat_map(|(title, rows)| rows.iter().chain([title]))
        .map(String::len)
        .max()
        .unwrap_or_default();

    let height = columns
        .iter()
        .map(|(_, rows)| rows.len())
        .max()
        .unwrap_or_default();

    let mut output = String::new();

    let header = columns
        .iter()
        .map(|(title, _)| format!("{title:<width$}"))
        .join(COLUMN_GAP);
    output.push_str(header.trim_end());
    output.push('\n');

    for row_index in 0..height {
        let line = columns
            .iter()
            .map(|(_, rows)| {
                let row = rows.get(row_index).map(String::as_str).unwrap_or_default();
                format!("{row:<width$}")
            })
            .join(COLUMN_GAP);

        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
