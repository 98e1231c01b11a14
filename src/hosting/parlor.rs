use crate::gameroom::*;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

type Tx = UnboundedSender<String>;

/// Connection gateway: owns the lobby, the outbound channel of every live
/// connection, and the local-play sessions.
///
/// Every room operation runs to completion under the single lobby lock, so
/// two racing moves, or a move racing a disconnect, serialize cleanly.
/// Nothing inside the lock blocks on I/O; fanout goes through unbounded
/// channels and never waits on a slow socket.
pub struct Parlor {
    lobby: Mutex<Lobby>,
    conns: RwLock<HashMap<ConnId, Tx>>,
    solos: Mutex<HashMap<u64, Solo>>,
    count: AtomicU64,
}

impl Default for Parlor {
    fn default() -> Self {
        Self {
            lobby: Mutex::new(Lobby::default()),
            conns: RwLock::new(HashMap::new()),
            solos: Mutex::new(HashMap::new()),
            count: AtomicU64::new(1),
        }
    }
}

impl Parlor {
    /// Registers a new connection and returns its handle plus the stream
    /// of outbound frames to pump into the socket.
    pub async fn attach(&self) -> (ConnId, UnboundedReceiver<String>) {
        let conn = self.count.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = unbounded_channel();
        self.conns.write().await.insert(conn, tx);
        log::info!("connection {} attached", conn);
        (conn, rx)
    }

    /// Tears down a connection: frees its seat wherever it sat, notifies
    /// the opponent, and deletes the room once the last seat empties.
    /// Same serialization discipline as a move; a vanished client that
    /// never signals anything keeps its seat until the room expires.
    pub async fn detach(&self, conn: ConnId) {
        self.conns.write().await.remove(&conn);
        let mut lobby = self.lobby.lock().await;
        if let Some(code) = lobby.locate(conn) {
            self.abandon(&mut lobby, &code, conn).await;
        }
        log::info!("connection {} detached", conn);
    }

    /// Routes one inbound event. Failures go back to the sender only,
    /// with no broadcast and no state change.
    pub async fn handle(&self, conn: ConnId, event: Event) {
        if let Err(e) = self.dispatch(conn, event).await {
            self.unicast(conn, error(&e)).await;
        }
    }

    /// Unicast a protocol complaint outside the event path, e.g. for
    /// frames that never parsed into an Event.
    pub(super) async fn reject(&self, conn: ConnId, message: &str) {
        self.unicast(conn, serde_json::json!({ "type": "error", "message": message }))
            .await;
    }

    async fn dispatch(&self, conn: ConnId, event: Event) -> anyhow::Result<()> {
        match event {
            Event::CreateRoom => self.create(conn).await,
            Event::JoinRoom { room_code } => self.join(conn, &room_code).await,
            Event::OnlineMove { room_code, row, col } => {
                self.play(conn, &room_code, row, col).await
            }
            Event::RequestRematch { room_code } => self.rematch(conn, &room_code).await,
            Event::LeaveRoom { room_code } => self.leave(conn, &room_code).await,
        }
    }
}

impl Parlor {
    async fn create(&self, conn: ConnId) -> anyhow::Result<()> {
        let (code, mark) = self.lobby.lock().await.open(conn)?;
        log::info!("connection {} opened room {}", conn, code);
        self.unicast(
            conn,
            serde_json::json!({
                "type": "room_created",
                "room_code": code,
                "symbol": mark,
                "message": format!("Room {} created, waiting for an opponent", code),
            }),
        )
        .await;
        Ok(())
    }

    async fn join(&self, conn: ConnId, code: &str) -> anyhow::Result<()> {
        let code = Code::try_from(code).map_err(anyhow::Error::msg)?;
        let mut lobby = self.lobby.lock().await;
        let room = lobby.get_mut(&code)?;
        let mark = room.join(conn)?;
        let start = room.started();
        let occupants = room.occupants().collect::<Vec<_>>();
        drop(lobby);
        log::info!("connection {} joined room {} as {}", conn, code, mark);
        self.unicast(
            conn,
            serde_json::json!({
                "type": "room_joined",
                "room_code": code,
                "symbol": mark,
                "message": format!("You joined as {}", mark),
            }),
        )
        .await;
        self.fanout(&occupants, start).await;
        Ok(())
    }

    async fn play(&self, conn: ConnId, code: &str, row: usize, col: usize) -> anyhow::Result<()> {
        let code = Code::try_from(code).map_err(anyhow::Error::msg)?;
        let mut lobby = self.lobby.lock().await;
        let room = lobby.get_mut(&code)?;
        let mark = room.play(conn, row, col)?;
        let update = room.updated(mark, row, col);
        let occupants = room.occupants().collect::<Vec<_>>();
        drop(lobby);
        self.fanout(&occupants, update).await;
        Ok(())
    }

    /// Every vote notifies the other occupant; the quorum-completing vote
    /// follows the notice with a fresh game_start to the whole room.
    async fn rematch(&self, conn: ConnId, code: &str) -> anyhow::Result<()> {
        let code = Code::try_from(code).map_err(anyhow::Error::msg)?;
        let mut lobby = self.lobby.lock().await;
        let room = lobby.get_mut(&code)?;
        let started = room.vote_rematch(conn)?;
        let start = room.started();
        let occupants = room.occupants().collect::<Vec<_>>();
        drop(lobby);
        let others = occupants
            .iter()
            .copied()
            .filter(|&o| o != conn)
            .collect::<Vec<_>>();
        self.fanout(
            &others,
            serde_json::json!({
                "type": "rematch_requested",
                "message": "Your opponent wants a rematch",
            }),
        )
        .await;
        if started {
            self.fanout(&occupants, start).await;
        }
        Ok(())
    }

    /// Explicit leave. Unknown rooms are ignored on purpose: the client
    /// is going away either way and gets no failure payload.
    async fn leave(&self, conn: ConnId, code: &str) -> anyhow::Result<()> {
        if let Ok(code) = Code::try_from(code) {
            let mut lobby = self.lobby.lock().await;
            self.abandon(&mut lobby, &code, conn).await;
        }
        Ok(())
    }

    /// Shared tail of leave and disconnect: vacate, console the survivor,
    /// drop the room when nobody is left.
    async fn abandon(&self, lobby: &mut Lobby, code: &Code, conn: ConnId) {
        if let Ok(room) = lobby.get_mut(code) {
            if room.vacate(conn).is_some() {
                log::info!("connection {} left room {}", conn, code);
            }
            let survivors = room.occupants().collect::<Vec<_>>();
            if survivors.is_empty() {
                lobby.close(code);
            } else {
                self.fanout(
                    &survivors,
                    serde_json::json!({
                        "type": "opponent_left",
                        "message": "Your opponent left the room",
                    }),
                )
                .await;
            }
        }
    }
}

impl Parlor {
    /// Opens a local-play session. The returned id accompanies every
    /// subsequent move for this session. Sweeps abandoned sessions first,
    /// same discipline as the lobby's room sweep.
    pub async fn new_game(&self, mode: Mode) -> (u64, serde_json::Value) {
        let id = self.count.fetch_add(1, Ordering::Relaxed);
        let solo = Solo::start(mode);
        let state = solo.state();
        let mut solos = self.solos.lock().await;
        Self::sweep_solos(&mut solos, RETENTION);
        solos.insert(id, solo);
        (id, state)
    }

    /// One local-play move against the session behind the id.
    /// A session whose match just ended is dropped with its final state
    /// reported; later moves against the same id come back as unknown.
    pub async fn submit(&self, id: u64, row: usize, col: usize) -> anyhow::Result<serde_json::Value> {
        let mut solos = self.solos.lock().await;
        let solo = solos
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("unknown session"))?;
        let reply = solo.submit(row, col)?;
        let mut state = solo.state();
        if let Some((row, col)) = reply {
            state["ai_move"] = serde_json::json!({ "row": row, "col": col });
        }
        if solo.outcome().is_over() {
            solos.remove(&id);
        }
        Ok(state)
    }

    /// Drops every session older than max_age, finished or not. A client
    /// that walks away mid-game never reports back, so age is the only
    /// signal left.
    fn sweep_solos(solos: &mut HashMap<u64, Solo>, max_age: std::time::Duration) {
        solos.retain(|id, solo| match solo.age() <= max_age {
            true => true,
            false => {
                log::info!("swept stale local session {}", id);
                false
            }
        });
    }
}

impl Parlor {
    async fn unicast(&self, conn: ConnId, payload: serde_json::Value) {
        if let Some(tx) = self.conns.read().await.get(&conn) {
            tx.send(payload.to_string())
                .inspect_err(|e| log::warn!("failed unicast to connection {}: {:?}", conn, e))
                .ok();
        }
    }

    async fn fanout(&self, conns: &[ConnId], payload: serde_json::Value) {
        for &conn in conns {
            self.unicast(conn, payload.clone()).await;
        }
    }
}

fn error(e: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({ "type": "error", "message": e.to_string() })
}
