use super::*;

/// Terminal or non-terminal status of a match.
/// A win carries the completed line for client-side highlighting.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    InProgress,
    Draw,
    Win(Mark, Line),
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Wire label: "X" / "O" / "draw", absent while in progress.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::InProgress => None,
            Self::Draw => Some("draw"),
            Self::Win(mark, _) => Some(mark.glyph()),
        }
    }

    /// The winning line, empty unless decided by three in a row.
    pub fn line(&self) -> &[(usize, usize)] {
        match self {
            Self::Win(_, line) => line,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, ".."),
            Self::Draw => write!(f, "=="),
            Self::Win(mark, _) => write!(f, "{}!", mark),
        }
    }
}
