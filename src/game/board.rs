use super::*;

/// Side length of the grid.
pub const N: usize = 3;

/// A winning line: three cell coordinates.
pub type Line = [(usize, usize); 3];

/// The 8 candidate lines in reporting order: rows, then columns, then
/// diagonals. The scan order is fixed so a multi-line finish always
/// reports the same line.
pub const LINES: [Line; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A rejected move. The board is untouched when one of these comes back.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InvalidMove {
    OutOfRange(usize, usize),
    Occupied(usize, usize),
}

impl std::fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(row, col) => write!(f, "cell ({}, {}) is out of range", row, col),
            Self::Occupied(row, col) => write!(f, "cell ({}, {}) is already taken", row, col),
        }
    }
}

impl std::error::Error for InvalidMove {}

/// 3x3 grid of cells. A cell written once keeps its mark until an
/// explicit reset; nothing here knows about turns or seats.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Board([[Option<Mark>; N]; N]);

impl Board {
    pub fn get(&self, row: usize, col: usize) -> Option<Mark> {
        self.0[row][col]
    }

    /// Writes a mark into an empty in-range cell.
    pub fn apply(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), InvalidMove> {
        if row >= N || col >= N {
            return Err(InvalidMove::OutOfRange(row, col));
        }
        match self.0[row][col] {
            Some(_) => Err(InvalidMove::Occupied(row, col)),
            None => Ok(self.0[row][col] = Some(mark)),
        }
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empties(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..N)
            .flat_map(|row| (0..N).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.0[row][col].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.empties().next().is_none()
    }

    /// Scans the line table for three equal non-empty cells.
    /// Full board with no line is a draw; anything else is still live.
    pub fn evaluate(&self) -> Outcome {
        for line in LINES {
            let [a, b, c] = line.map(|(row, col)| self.0[row][col]);
            if let Some(mark) = a {
                if a == b && b == c {
                    return Outcome::Win(mark, line);
                }
            }
        }
        match self.is_full() {
            true => Outcome::Draw,
            false => Outcome::InProgress,
        }
    }
}

/// Wire shape: 3x3 array of `""` / `"X"` / `"O"`.
impl serde::Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(
            &self
                .0
                .map(|row| row.map(|cell| cell.map_or("", |mark| mark.glyph()))),
            serializer,
        )
    }
}

/// Board literals: nine cells of `X`, `O`, or `.`, row-major,
/// any other characters ignored. Panics on a malformed literal.
impl From<&str> for Board {
    fn from(s: &str) -> Self {
        let cells = s
            .chars()
            .filter_map(|c| match c {
                'X' => Some(Some(Mark::X)),
                'O' => Some(Some(Mark::O)),
                '.' => Some(None),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(cells.len() == N * N, "board literal needs 9 cells");
        let mut board = Self::default();
        for (i, cell) in cells.into_iter().enumerate() {
            board.0[i / N][i % N] = cell;
        }
        board
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{}", cell.map_or(".", |mark| mark.glyph()))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_rejects_occupied_cell() {
        let mut board = Board::from("X........");
        assert_eq!(
            board.apply(0, 0, Mark::O),
            Err(InvalidMove::Occupied(0, 0))
        );
        assert_eq!(board, Board::from("X........"));
    }

    #[test]
    fn apply_rejects_out_of_range() {
        let mut board = Board::default();
        assert_eq!(
            board.apply(3, 0, Mark::X),
            Err(InvalidMove::OutOfRange(3, 0))
        );
        assert_eq!(board, Board::default());
    }

    #[test]
    fn evaluate_finds_row_win() {
        let board = Board::from("XXX OO. ...");
        assert_eq!(
            board.evaluate(),
            Outcome::Win(Mark::X, [(0, 0), (0, 1), (0, 2)])
        );
    }

    #[test]
    fn evaluate_finds_diagonal_win() {
        let board = Board::from("O.X .OX ..O");
        assert_eq!(
            board.evaluate(),
            Outcome::Win(Mark::O, [(0, 0), (1, 1), (2, 2)])
        );
    }

    #[test]
    fn evaluate_reports_first_line_in_scan_order() {
        // X completes both row 0 and column 0; rows come first.
        let board = Board::from("XXX XOO XOO");
        assert_eq!(
            board.evaluate(),
            Outcome::Win(Mark::X, [(0, 0), (0, 1), (0, 2)])
        );
    }

    #[test]
    fn evaluate_full_board_without_line_is_draw() {
        let board = Board::from("XOX XOO OXX");
        assert_eq!(board.evaluate(), Outcome::Draw);
        assert!(board.evaluate().line().is_empty());
    }

    #[test]
    fn evaluate_is_idempotent() {
        let board = Board::from("XO. .X. ...");
        assert_eq!(board.evaluate(), board.evaluate());
        assert_eq!(board.evaluate(), Outcome::InProgress);
    }

    #[test]
    fn serializes_to_string_grid() {
        let board = Board::from("XO. ... ...");
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(json[0][0], "X");
        assert_eq!(json[0][1], "O");
        assert_eq!(json[2][2], "");
    }
}
