use super::*;
use crate::game::*;
use std::time::Duration;
use std::time::Instant;

/// Play mode for a local session.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Two humans sharing a screen.
    #[default]
    Pvp,
    /// One human as X against the advisor as O.
    Pve,
}

/// One local (non-networked) game session.
///
/// Owned per-session by the HTTP layer and passed in by handle on every
/// request; the Lobby never sees these and they share nothing with rooms
/// but the board engine. Abandoned sessions are aged out by the gateway
/// the same way stale rooms are.
#[derive(Debug)]
pub struct Solo {
    mode: Mode,
    board: Board,
    turn: Mark,
    outcome: Outcome,
    created: Instant,
}

impl Solo {
    pub fn start(mode: Mode) -> Self {
        Self {
            mode,
            board: Board::default(),
            turn: Mark::X,
            outcome: Outcome::InProgress,
            created: Instant::now(),
        }
    }

    /// Applies the submitted move for whichever mark holds the turn.
    /// In Pve mode, when the turn then lands on O, the advisor answers in
    /// the same call; the returned cell is its move, for the reply payload.
    pub fn submit(&mut self, row: usize, col: usize) -> Result<Option<(usize, usize)>, Error> {
        if self.outcome.is_over() {
            return Err(Error::GameOver);
        }
        self.board.apply(row, col, self.turn)?;
        self.advance();
        match (self.mode, self.turn, self.outcome.is_over()) {
            (Mode::Pve, Mark::O, false) => Ok(self.respond()),
            _ => Ok(None),
        }
    }

    fn advance(&mut self) {
        self.outcome = self.board.evaluate();
        if !self.outcome.is_over() {
            self.turn = self.turn.flip();
        }
    }

    fn respond(&mut self) -> Option<(usize, usize)> {
        let (row, col) = best_move(&self.board, Mark::O)?;
        self.board.apply(row, col, Mark::O).ok()?;
        self.advance();
        Some((row, col))
    }

    /// Reply payload shared by both local endpoints.
    pub fn state(&self) -> serde_json::Value {
        serde_json::json!({
            "board": self.board,
            "current_turn": self.turn,
            "game_over": self.outcome.is_over(),
            "winner": self.outcome.label(),
            "win_line": self.outcome.line(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn turn(&self) -> Mark {
        self.turn
    }
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pvp_alternates_marks() {
        let mut solo = Solo::start(Mode::Pvp);
        assert_eq!(solo.submit(0, 0), Ok(None));
        assert_eq!(solo.turn(), Mark::O);
        assert_eq!(solo.submit(1, 1), Ok(None));
        assert_eq!(solo.turn(), Mark::X);
        assert_eq!(solo.board().get(1, 1), Some(Mark::O));
    }

    #[test]
    fn pve_advisor_answers_in_the_same_call() {
        let mut solo = Solo::start(Mode::Pve);
        let reply = solo.submit(0, 0).unwrap();
        let (row, col) = reply.expect("advisor moves");
        assert_eq!(solo.board().get(row, col), Some(Mark::O));
        assert_eq!(solo.turn(), Mark::X);
    }

    #[test]
    fn pve_never_lets_the_human_win() {
        // The advisor plays perfectly; a greedy row-stuffing human
        // gets blocked or beaten every time.
        for _ in 0..5 {
            let mut solo = Solo::start(Mode::Pve);
            while !solo.outcome().is_over() {
                let (row, col) = solo.board().empties().next().expect("live board");
                solo.submit(row, col).unwrap();
            }
            assert_ne!(solo.outcome().label(), Some("X"));
        }
    }

    #[test]
    fn finished_session_rejects_moves() {
        let mut solo = Solo::start(Mode::Pvp);
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            solo.submit(row, col).unwrap();
        }
        assert!(solo.outcome().is_over());
        assert_eq!(solo.submit(2, 2), Err(Error::GameOver));
    }

    #[test]
    fn occupied_cell_is_rejected_and_turn_kept() {
        let mut solo = Solo::start(Mode::Pvp);
        solo.submit(0, 0).unwrap();
        assert!(solo.submit(0, 0).is_err());
        assert_eq!(solo.turn(), Mark::O);
    }

    #[test]
    fn state_payload_shape() {
        let solo = Solo::start(Mode::Pve);
        let state = solo.state();
        assert_eq!(state["current_turn"], "X");
        assert_eq!(state["game_over"], false);
        assert_eq!(state["winner"], serde_json::Value::Null);
    }
}
