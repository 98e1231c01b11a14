mod parlor;
mod server;

pub use parlor::*;
pub use server::*;
