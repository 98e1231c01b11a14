mod board;
mod mark;
mod minimax;
mod outcome;

pub use board::*;
pub use mark::*;
pub use minimax::*;
pub use outcome::*;
