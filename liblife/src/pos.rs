use strum::{EnumIter, IntoEnumIterator};

/// A cell coordinate. `row` is the first matrix index, `col` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The position one step towards `direction`, or `None` when that would leave the
    /// non-negative quadrant. The upper bound is left for the grid to check.
    pub fn offset(self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();

        Some(Position {
            row: self.row.checked_add_signed(dy)?,
            col: self.col.checked_add_signed(dx)?,
        })
    }

    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Direction::iter().filter_map(move |direction| self.offset(direction))
    }
}

impl From<[usize; 2]> for Position {
    fn from(value: [usize; 2]) -> Self {
        Self {
            row: value[0],
            col: value[1],
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for [usize; 2] {
    fn from(value: Position) -> Self {
        [value.row, value.col]
    }
}

/// The eight neighbour directions, in the order they are visited when counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Direction {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Direction {
    /// `(dx, dy)`: `dx` moves along a row (column index), `dy` across rows (row index).
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Top => (0, 1),
            Direction::TopRight => (1, 1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, -1),
            Direction::Bottom => (0, -1),
            Direction::BottomLeft => (-1, -1),
            Direction::Left => (-1, 0),
            Direction::TopLeft => (-1, 1),
        }
    }
}
