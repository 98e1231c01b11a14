mod code;
mod error;
mod event;
mod lobby;
mod room;
mod solo;

pub use code::*;
pub use error::*;
pub use event::*;
pub use lobby::*;
pub use room::*;
pub use solo::*;
