use super::*;
use rand::seq::IndexedRandom;

/// Full-depth game-tree search for the automated opponent.
///
/// Scores leaves +1 for a win by `mark`, -1 for a loss, 0 for a draw, and
/// picks uniformly among the equally-best cells. The search space tops out
/// at 9 plies, so no pruning is worth the code. None only on a full board.
pub fn best_move(board: &Board, mark: Mark) -> Option<(usize, usize)> {
    let mut best = i8::MIN;
    let mut cells = Vec::new();
    for (row, col) in board.empties() {
        let mut next = *board;
        next.apply(row, col, mark).expect("cell came from empties");
        let score = minimax(&next, mark, mark.flip());
        if score > best {
            best = score;
            cells.clear();
        }
        if score == best {
            cells.push((row, col));
        }
    }
    cells.choose(&mut rand::rng()).copied()
}

fn minimax(board: &Board, maximizer: Mark, moving: Mark) -> i8 {
    match board.evaluate() {
        Outcome::Draw => 0,
        Outcome::Win(mark, _) if mark == maximizer => 1,
        Outcome::Win(..) => -1,
        Outcome::InProgress => {
            let scores = board.empties().map(|(row, col)| {
                let mut next = *board;
                next.apply(row, col, moving).expect("cell came from empties");
                minimax(&next, maximizer, moving.flip())
            });
            match moving == maximizer {
                true => scores.max().expect("live board has an empty cell"),
                false => scores.min().expect("live board has an empty cell"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_immediate_win() {
        let board = Board::from("XX. OO. ...");
        assert_eq!(best_move(&board, Mark::X), Some((0, 2)));
    }

    #[test]
    fn blocks_the_immediate_loss() {
        // Holding the center, O draws by blocking; every other cell loses.
        let board = Board::from("XX. .O. ...");
        assert_eq!(best_move(&board, Mark::O), Some((0, 2)));
    }

    #[test]
    fn prefers_winning_over_blocking() {
        // O can win on the spot; blocking X's threat would be worse.
        let board = Board::from("XX. OO. X..");
        assert_eq!(best_move(&board, Mark::O), Some((1, 2)));
    }

    #[test]
    fn full_board_has_no_move() {
        let board = Board::from("XOX XOO OXX");
        assert_eq!(best_move(&board, Mark::X), None);
    }

    #[test]
    fn never_returns_an_occupied_cell() {
        let board = Board::from("XO. .X. ...");
        for _ in 0..20 {
            let (row, col) = best_move(&board, Mark::O).unwrap();
            assert_eq!(board.get(row, col), None);
        }
    }

    #[test]
    fn perfect_play_always_draws() {
        // Optimal vs optimal from an empty board cannot produce a winner,
        // whichever way ties get broken.
        for _ in 0..10 {
            let mut board = Board::default();
            let mut mark = Mark::X;
            while let Some((row, col)) = best_move(&board, mark) {
                board.apply(row, col, mark).unwrap();
                if board.evaluate().is_over() {
                    break;
                }
                mark = mark.flip();
            }
            assert_eq!(board.evaluate(), Outcome::Draw);
        }
    }
}
