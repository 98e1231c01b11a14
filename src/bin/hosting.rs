//! Hosting server binary.
//!
//! Runs the HTTP server for live game rooms and local play.
//! Supports WebSocket connections for real-time matches.

use noughts::*;

#[tokio::main]
async fn main() {
    log();
    kys();
    hosting::Server::run().await.unwrap();
}
