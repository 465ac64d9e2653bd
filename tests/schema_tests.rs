//! Stored-document contract: the JSON this crate writes must match what
//! existing deployments already hold, field for field.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

use chase_lobby::{
    GameRecord, GameStatus, MapPackId, MemberRecord, NicknameClaimRecord, RoomCodeRecord,
    RoomRecord, RoomState, RoomVisibility,
};
use serde_json::json;

#[test]
fn room_record_wire_shape() {
    let room = RoomRecord {
        id: "r1".into(),
        code: "ABC234".into(),
        created_at_ms: 1_700_000_000_000,
        visibility: RoomVisibility::Public,
        created_by_uid: "u1".into(),
        map_pack_id: MapPackId::LondonClassic,
        mr_x_black_tickets: 5,
        mr_x_double_tickets: 2,
        state: RoomState::Lobby,
        game_id: None,
        started_at_ms: None,
    };
    assert_eq!(
        serde_json::to_value(&room).unwrap(),
        json!({
            "id": "r1",
            "code": "ABC234",
            "createdAtMs": 1_700_000_000_000_i64,
            "visibility": "public",
            "createdByUid": "u1",
            "mapPackId": "london-classic",
            "mrXBlackTickets": 5,
            "mrXDoubleTickets": 2,
            "state": "lobby",
        })
    );
}

#[test]
fn started_room_gains_game_fields() {
    let room = RoomRecord {
        id: "r1".into(),
        code: "ABC234".into(),
        created_at_ms: 10,
        visibility: RoomVisibility::Private,
        created_by_uid: "u1".into(),
        map_pack_id: MapPackId::NammaBengaluru,
        mr_x_black_tickets: 10,
        mr_x_double_tickets: 0,
        state: RoomState::Started,
        game_id: Some("r1".into()),
        started_at_ms: Some(99),
    };
    let value = serde_json::to_value(&room).unwrap();
    assert_eq!(value["state"], "started");
    assert_eq!(value["gameId"], "r1");
    assert_eq!(value["startedAtMs"], 99);
    assert_eq!(value["mapPackId"], "namma-bengaluru");
}

#[test]
fn member_and_claim_wire_shapes() {
    let member = MemberRecord {
        uid: "u1".into(),
        nickname: "Casey".into(),
        nickname_key: "casey".into(),
        joined_at_ms: 7,
        is_host: true,
    };
    assert_eq!(
        serde_json::to_value(&member).unwrap(),
        json!({
            "uid": "u1",
            "nickname": "Casey",
            "nicknameKey": "casey",
            "joinedAtMs": 7,
            "isHost": true,
        })
    );

    let claim = NicknameClaimRecord {
        nickname_key: "casey".into(),
        nickname: "Casey".into(),
        uid: "u1".into(),
        created_at_ms: 7,
    };
    assert_eq!(
        serde_json::to_value(&claim).unwrap(),
        json!({
            "nicknameKey": "casey",
            "nickname": "Casey",
            "uid": "u1",
            "createdAtMs": 7,
        })
    );
}

#[test]
fn code_record_wire_shape() {
    let record = RoomCodeRecord {
        code: "ABC234".into(),
        room_id: "r1".into(),
        created_at_ms: 7,
    };
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "code": "ABC234",
            "roomId": "r1",
            "createdAtMs": 7,
        })
    );
}

#[test]
fn game_record_wire_shape() {
    let game = GameRecord {
        id: "r1".into(),
        room_id: "r1".into(),
        created_at_ms: 99,
        started_by_uid: "u1".into(),
        status: GameStatus::Active,
        map_pack_id: MapPackId::LondonClassic,
        mr_x_black_tickets: 5,
        mr_x_double_tickets: 2,
        mr_x_uid: "u2".into(),
        detective_uids: vec!["u1".into(), "u3".into()],
        turn_index: 0,
        player_order_uids: vec!["u2".into(), "u1".into(), "u3".into()],
    };
    assert_eq!(
        serde_json::to_value(&game).unwrap(),
        json!({
            "id": "r1",
            "roomId": "r1",
            "createdAtMs": 99,
            "startedByUid": "u1",
            "status": "active",
            "mapPackId": "london-classic",
            "mrXBlackTickets": 5,
            "mrXDoubleTickets": 2,
            "mrXUid": "u2",
            "detectiveUids": ["u1", "u3"],
            "turnIndex": 0,
            "playerOrderUids": ["u2", "u1", "u3"],
        })
    );
}

#[test]
fn documents_written_by_older_clients_still_parse() {
    // No isHost flag, extra unknown fields.
    let member: MemberRecord = serde_json::from_value(json!({
        "uid": "u1",
        "nickname": "Casey",
        "nicknameKey": "casey",
        "joinedAtMs": 7,
        "legacyField": true,
    }))
    .unwrap();
    assert!(!member.is_host);

    // No gameId/startedAtMs on a lobby room.
    let room: RoomRecord = serde_json::from_value(json!({
        "id": "r1",
        "code": "ABC234",
        "createdAtMs": 10,
        "visibility": "private",
        "createdByUid": "u1",
        "mapPackId": "london-classic",
        "mrXBlackTickets": 5,
        "mrXDoubleTickets": 2,
        "state": "lobby",
    }))
    .unwrap();
    assert!(room.game_id.is_none());
    assert!(room.started_at_ms.is_none());
}
