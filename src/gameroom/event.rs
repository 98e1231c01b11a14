use serde::Deserialize;

/// Inbound connection events, one JSON object per WebSocket text frame.
///
/// The `type` tag selects the variant; room codes arrive as raw strings
/// and are normalized at dispatch so sloppy input still resolves.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CreateRoom,
    JoinRoom {
        room_code: String,
    },
    OnlineMove {
        room_code: String,
        row: usize,
        col: usize,
    },
    RequestRematch {
        room_code: String,
    },
    #[serde(rename = "leave_room_event")]
    LeaveRoom {
        room_code: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_room() {
        let event: Event = serde_json::from_str(r#"{"type":"create_room"}"#).unwrap();
        assert!(matches!(event, Event::CreateRoom));
    }

    #[test]
    fn parses_online_move() {
        let event: Event =
            serde_json::from_str(r#"{"type":"online_move","room_code":"AB12CD","row":2,"col":0}"#)
                .unwrap();
        match event {
            Event::OnlineMove { room_code, row, col } => {
                assert_eq!(room_code, "AB12CD");
                assert_eq!((row, col), (2, 0));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn parses_leave_room_tag() {
        let event: Event =
            serde_json::from_str(r#"{"type":"leave_room_event","room_code":"AB12CD"}"#).unwrap();
        assert!(matches!(event, Event::LeaveRoom { .. }));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(serde_json::from_str::<Event>(r#"{"type":"shenanigans"}"#).is_err());
    }

    #[test]
    fn rejects_negative_coordinates() {
        let raw = r#"{"type":"online_move","room_code":"AB12CD","row":-1,"col":0}"#;
        assert!(serde_json::from_str::<Event>(raw).is_err());
    }
}
