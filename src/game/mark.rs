/// One of the two symbols placed on the board.
/// X always owns the opening move of a match.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, serde::Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn flip(&self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl TryFrom<&str> for Mark {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "X" => Ok(Self::X),
            "O" => Ok(Self::O),
            _ => Err("invalid mark"),
        }
    }
}
