use super::*;
use crate::game::Mark;
use std::collections::HashMap;
use std::time::Duration;

/// Rooms older than this are removed by the opportunistic sweep,
/// seated or not.
pub const RETENTION: Duration = Duration::from_secs(3600);
/// Attempts at a unique code before a create request gives up.
const RETRIES: usize = 256;

/// In-memory registry of live rooms, keyed by room code.
///
/// One Lobby per process, behind the gateway's lock. Operations here are
/// synchronous, never block, and never span two rooms, so a single coarse
/// lock around the whole registry is enough to serialize racing moves
/// and disconnects.
#[derive(Debug, Default)]
pub struct Lobby {
    rooms: HashMap<Code, Room>,
}

impl Lobby {
    /// Creates a room with the given connection seated as X.
    /// Sweeps expired rooms first so dead codes don't crowd the space.
    pub fn open(&mut self, conn: ConnId) -> Result<(Code, Mark), Error> {
        self.sweep(RETENTION);
        let code = self.allocate()?;
        let mut room = Room::default();
        let mark = room.join(conn)?;
        self.rooms.insert(code, room);
        log::info!("opened room {}", code);
        Ok((code, mark))
    }

    pub fn get_mut(&mut self, code: &Code) -> Result<&mut Room, Error> {
        self.rooms.get_mut(code).ok_or(Error::NotFound(*code))
    }

    pub fn close(&mut self, code: &Code) {
        if self.rooms.remove(code).is_some() {
            log::info!("closed room {}", code);
        }
    }

    /// Drops every room older than max_age. Correctness never depends on
    /// this running; it only reclaims memory and code space.
    pub fn sweep(&mut self, max_age: Duration) {
        self.rooms.retain(|code, room| match room.age() <= max_age {
            true => true,
            false => {
                log::info!("swept expired room {}", code);
                false
            }
        });
    }

    /// The room where this connection holds a seat, if any.
    /// Rooms stay few enough that a scan beats bookkeeping a reverse map.
    pub fn locate(&self, conn: ConnId) -> Option<Code> {
        self.rooms
            .iter()
            .find(|(_, room)| room.is_seated(conn))
            .map(|(code, _)| *code)
    }

    fn allocate(&self) -> Result<Code, Error> {
        (0..RETRIES)
            .map(|_| Code::random())
            .find(|code| !self.rooms.contains_key(code))
            .ok_or(Error::Exhausted)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_seats_the_creator_as_x() {
        let mut lobby = Lobby::default();
        let (code, mark) = lobby.open(1).unwrap();
        assert_eq!(mark, Mark::X);
        assert_eq!(lobby.get_mut(&code).unwrap().seat(Mark::X), Some(1));
    }

    #[test]
    fn codes_are_unique_among_live_rooms() {
        let mut lobby = Lobby::default();
        let codes = (0..50)
            .map(|conn| lobby.open(conn).unwrap().0)
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn lookup_of_unknown_code_fails() {
        let mut lobby = Lobby::default();
        let code = Code::try_from("AAAAAA").unwrap();
        assert_eq!(lobby.get_mut(&code).err(), Some(Error::NotFound(code)));
    }

    #[test]
    fn sweep_drops_only_stale_rooms() {
        let mut lobby = Lobby::default();
        lobby.open(1).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        lobby.sweep(RETENTION);
        assert_eq!(lobby.len(), 1);
        lobby.sweep(Duration::ZERO);
        assert!(lobby.is_empty());
    }

    #[test]
    fn locate_follows_the_seat() {
        let mut lobby = Lobby::default();
        let (code, _) = lobby.open(1).unwrap();
        assert_eq!(lobby.locate(1), Some(code));
        assert_eq!(lobby.locate(2), None);
        lobby.get_mut(&code).unwrap().vacate(1);
        assert_eq!(lobby.locate(1), None);
    }

    #[test]
    fn close_is_idempotent() {
        let mut lobby = Lobby::default();
        let (code, _) = lobby.open(1).unwrap();
        lobby.close(&code);
        lobby.close(&code);
        assert!(lobby.is_empty());
    }
}
