use super::Code;
use crate::game::InvalidMove;

/// Everything that can go wrong inside the room core.
///
/// All of these are reported to the offending connection only; none of
/// them mutates a room, triggers a broadcast, or leaves state half-updated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// Bad coordinates or an occupied cell.
    Invalid(InvalidMove),
    /// The mover's seat does not own the current turn.
    NotYourTurn,
    /// The match already has a decisive outcome.
    GameOver,
    /// Both seats are occupied.
    RoomFull,
    /// The connection already holds a seat in this room.
    AlreadySeated,
    /// The connection holds no seat in this room.
    NotSeated,
    /// No rematch while the match is still running.
    MatchRunning,
    /// No live room under this code.
    NotFound(Code),
    /// Code generation gave up after bounded retries.
    Exhausted,
}

impl From<InvalidMove> for Error {
    fn from(e: InvalidMove) -> Self {
        Self::Invalid(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "{}", e),
            Self::NotYourTurn => write!(f, "it is not your turn"),
            Self::GameOver => write!(f, "the game is already over"),
            Self::RoomFull => write!(f, "the room is already full"),
            Self::AlreadySeated => write!(f, "you are already in this room"),
            Self::NotSeated => write!(f, "you are not in this room"),
            Self::MatchRunning => write!(f, "the match is still in progress"),
            Self::NotFound(code) => write!(f, "room {} not found", code),
            Self::Exhausted => write!(f, "could not allocate a room code"),
        }
    }
}

impl std::error::Error for Error {}
