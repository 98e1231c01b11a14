use super::*;
use crate::game::*;
use std::collections::HashSet;
use std::time::Duration;
use std::time::Instant;

/// Opaque identifier for one live network connection.
pub type ConnId = u64;

/// Seats per room. Two, and only two.
pub const SEATS: usize = 2;

/// Wins and draws accumulated across rematches within one room.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, serde::Serialize)]
pub struct Scores {
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "O")]
    pub o: u32,
    #[serde(rename = "draw")]
    pub draws: u32,
}

/// Where a room sits in its lifecycle. Derived from seats and outcome,
/// never stored.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    WaitingForOpponent,
    InProgress,
    Finished,
}

/// Single source of truth for one two-seat match.
///
/// The Lobby owns every Room; callers borrow one for the duration of a
/// single operation and never longer. Every operation either commits its
/// whole transition or returns an error having touched nothing.
///
/// Lifecycle: WaitingForOpponent -> InProgress (second join) -> Finished
/// (decisive outcome) -> InProgress again (rematch quorum), torn down when
/// the last seat empties or the retention sweep fires.
#[derive(Debug)]
pub struct Room {
    board: Board,
    turn: Mark,
    seats: [Option<ConnId>; SEATS],
    outcome: Outcome,
    scores: Scores,
    votes: HashSet<ConnId>,
    created: Instant,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            board: Board::default(),
            turn: Mark::X,
            seats: [None; SEATS],
            outcome: Outcome::InProgress,
            scores: Scores::default(),
            votes: HashSet::new(),
            created: Instant::now(),
        }
    }
}

impl Room {
    /// Seats a connection, filling X before O. Any successful join restarts
    /// the match: whatever the lone occupant did while waiting is
    /// discardable by design of the protocol.
    pub fn join(&mut self, conn: ConnId) -> Result<Mark, Error> {
        if self.is_seated(conn) {
            return Err(Error::AlreadySeated);
        }
        let mark = self.vacancy().ok_or(Error::RoomFull)?;
        self.seats[mark as usize] = Some(conn);
        self.reset();
        Ok(mark)
    }

    /// One move by the seated connection that owns the current turn.
    /// A decisive outcome freezes the turn and bumps the score counter;
    /// otherwise the turn flips. Returns the mark that moved.
    pub fn play(&mut self, conn: ConnId, row: usize, col: usize) -> Result<Mark, Error> {
        if self.seat(self.turn) != Some(conn) {
            return Err(Error::NotYourTurn);
        }
        if self.outcome.is_over() {
            return Err(Error::GameOver);
        }
        let mark = self.turn;
        self.board.apply(row, col, mark)?;
        self.outcome = self.board.evaluate();
        match self.outcome {
            Outcome::InProgress => self.turn = self.turn.flip(),
            Outcome::Draw => self.scores.draws += 1,
            Outcome::Win(Mark::X, _) => self.scores.x += 1,
            Outcome::Win(Mark::O, _) => self.scores.o += 1,
        }
        Ok(mark)
    }

    /// Records a rematch vote, once per connection no matter how often it
    /// asks. Returns true when the second vote lands and a fresh match has
    /// started; scores survive the reset.
    pub fn vote_rematch(&mut self, conn: ConnId) -> Result<bool, Error> {
        if !self.is_seated(conn) {
            return Err(Error::NotSeated);
        }
        if !self.outcome.is_over() {
            return Err(Error::MatchRunning);
        }
        self.votes.insert(conn);
        match self.votes.len() >= SEATS {
            true => {
                self.reset();
                Ok(true)
            }
            false => Ok(false),
        }
    }

    /// Frees the connection's seat and discards its rematch vote, so a
    /// stale vote can never count toward a later quorum. Returns the
    /// vacated mark so the caller can notify the survivor.
    pub fn vacate(&mut self, conn: ConnId) -> Option<Mark> {
        self.votes.remove(&conn);
        let mark = self.mark_of(conn)?;
        self.seats[mark as usize] = None;
        Some(mark)
    }

    /// Fresh board, X to open, votes cleared. Seats and scores survive.
    fn reset(&mut self) {
        self.board = Board::default();
        self.turn = Mark::X;
        self.outcome = Outcome::InProgress;
        self.votes.clear();
    }
}

impl Room {
    /// The game_start payload broadcast when a match (re)starts.
    pub fn started(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "game_start",
            "board": self.board,
            "turn": self.turn,
            "scores": self.scores,
        })
    }

    /// The game_update payload broadcast after a move, with the move
    /// echoed back for opponent-side highlighting.
    pub fn updated(&self, mark: Mark, row: usize, col: usize) -> serde_json::Value {
        serde_json::json!({
            "type": "game_update",
            "board": self.board,
            "turn": self.turn,
            "winner": self.outcome.label(),
            "win_line": self.outcome.line(),
            "last_move": { "row": row, "col": col, "symbol": mark },
            "scores": self.scores,
        })
    }
}

impl Room {
    pub fn phase(&self) -> Phase {
        match (self.occupancy(), self.outcome.is_over()) {
            (_, true) => Phase::Finished,
            (SEATS, false) => Phase::InProgress,
            _ => Phase::WaitingForOpponent,
        }
    }
    pub fn seat(&self, mark: Mark) -> Option<ConnId> {
        self.seats[mark as usize]
    }
    pub fn mark_of(&self, conn: ConnId) -> Option<Mark> {
        [Mark::X, Mark::O]
            .into_iter()
            .find(|&mark| self.seat(mark) == Some(conn))
    }
    pub fn is_seated(&self, conn: ConnId) -> bool {
        self.mark_of(conn).is_some()
    }
    pub fn occupants(&self) -> impl Iterator<Item = ConnId> + '_ {
        self.seats.iter().flatten().copied()
    }
    pub fn occupancy(&self) -> usize {
        self.occupants().count()
    }
    pub fn is_empty(&self) -> bool {
        self.occupancy() == 0
    }
    fn vacancy(&self) -> Option<Mark> {
        [Mark::X, Mark::O]
            .into_iter()
            .find(|&mark| self.seat(mark).is_none())
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
    pub fn scores(&self) -> &Scores {
        &self.scores
    }
    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}
