//! Persisted record shapes for the lobby coordination engine.
//!
//! Every struct in this module produces the exact JSON stored by existing
//! deployments — field names are the on-store schema contract (`createdAtMs`,
//! `mapPackId`, `mrXUid`, `playerOrderUids`, …), so all structs rename to
//! camelCase and all enums serialize to the stored string literals.

use serde::{Deserialize, Serialize};

use crate::store::{CollectionPath, DocPath};

// ── Type aliases ────────────────────────────────────────────────────

/// Opaque, stable per-client identifier supplied by the identity provider.
pub type Uid = String;

/// Store-level room document identifier (a v4 UUID in string form).
pub type RoomId = String;

// ── Enums ───────────────────────────────────────────────────────────

/// Whether a room appears in the public listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomVisibility {
    /// Reachable only by code.
    Private,
    /// Listed in the public-room feed.
    Public,
}

/// Lifecycle state of a room.
///
/// The engine performs exactly one transition, `Lobby` → `Started`, as part
/// of game launch. `Finished` is written by the game rules engine and is an
/// immutable fact from this crate's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    /// Pre-game: membership and nicknames change freely.
    Lobby,
    /// A game record exists and play has begun.
    Started,
    /// The game concluded (out of this crate's scope).
    Finished,
}

/// Identifier of a shipped map pack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MapPackId {
    /// The classic London board.
    LondonClassic,
    /// The Bengaluru board.
    NammaBengaluru,
}

/// Status of a launched game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Play in progress.
    Active,
    /// Play concluded.
    Finished,
}

// ── Records ─────────────────────────────────────────────────────────

/// One room per session. Stored at `rooms/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    /// Store document id; also the game document id once launched.
    pub id: RoomId,
    /// Six-symbol human-typeable join code.
    pub code: String,
    /// Creation timestamp, Unix milliseconds.
    pub created_at_ms: i64,
    /// Public-listing visibility; fixed at creation.
    pub visibility: RoomVisibility,
    /// Current host. Initially the creator; rewritten only by host transfer.
    pub created_by_uid: Uid,
    /// Map pack selection; fixed at creation.
    pub map_pack_id: MapPackId,
    /// Mr. X black tickets, clamped to 0..=10 at creation.
    pub mr_x_black_tickets: u8,
    /// Mr. X double-move tickets, clamped to 0..=5 at creation.
    pub mr_x_double_tickets: u8,
    /// Lifecycle state.
    pub state: RoomState,
    /// Game document id, set by the launch transaction (equals `id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    /// Launch timestamp, set by the launch transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<i64>,
}

/// Reservation index entry mapping a code to its room. Stored at
/// `roomCodes/{code}`, created atomically with the room, never mutated or
/// deleted (codes are not recycled).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomCodeRecord {
    /// The reserved code.
    pub code: String,
    /// Room the code resolves to.
    pub room_id: RoomId,
    /// Reservation timestamp, Unix milliseconds.
    pub created_at_ms: i64,
}

/// One membership record per (room, member). Stored at
/// `rooms/{roomId}/players/{uid}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    /// The member's identity-provider id.
    pub uid: Uid,
    /// Display form of the nickname.
    pub nickname: String,
    /// Normalized nickname key; matches exactly one claim document.
    pub nickname_key: String,
    /// First-join timestamp; the room's only total order over members.
    /// Preserved across re-joins so a returning player keeps their slot.
    pub joined_at_ms: i64,
    /// Informational host flag; the authoritative pointer is
    /// [`RoomRecord::created_by_uid`].
    #[serde(default)]
    pub is_host: bool,
}

/// Per-room reservation guaranteeing a normalized nickname is held by exactly
/// one member. Stored at `rooms/{roomId}/nicknameClaims/{nicknameKey}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NicknameClaimRecord {
    /// Normalized key (trimmed, lowercased).
    pub nickname_key: String,
    /// Display form at claim time.
    pub nickname: String,
    /// Owning member; must equal the membership record using this key.
    pub uid: Uid,
    /// Claim timestamp, Unix milliseconds.
    pub created_at_ms: i64,
}

/// Role-assigned game record, created exactly once per room at launch.
/// Stored at `games/{roomId}`; immutable under this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Equals the room id.
    pub id: String,
    /// The room this game was launched from.
    pub room_id: RoomId,
    /// Launch timestamp, Unix milliseconds.
    pub created_at_ms: i64,
    /// Member who initiated the launch (the host at launch time).
    pub started_by_uid: Uid,
    /// Game status; written as [`GameStatus::Active`] at launch.
    pub status: GameStatus,
    /// Copied verbatim from the room at launch time.
    pub map_pack_id: MapPackId,
    /// Copied verbatim from the room at launch time.
    pub mr_x_black_tickets: u8,
    /// Copied verbatim from the room at launch time.
    pub mr_x_double_tickets: u8,
    /// The member assigned the asymmetric Mr. X role.
    pub mr_x_uid: Uid,
    /// The remaining members, in canonical join order (at most 5).
    pub detective_uids: Vec<Uid>,
    /// Turn cursor into `player_order_uids`; initialized to zero.
    pub turn_index: u32,
    /// Full player order: Mr. X first, then detectives in join order.
    pub player_order_uids: Vec<Uid>,
}

// ── Document paths ──────────────────────────────────────────────────

const ROOMS: &str = "rooms";
const ROOM_CODES: &str = "roomCodes";
const GAMES: &str = "games";

/// Path of a room document.
pub fn room_doc(room_id: &str) -> DocPath {
    DocPath::new(format!("{ROOMS}/{room_id}"))
}

/// Path of a code reservation document.
pub fn room_code_doc(code: &str) -> DocPath {
    DocPath::new(format!("{ROOM_CODES}/{code}"))
}

/// Path of a membership document.
pub fn member_doc(room_id: &str, uid: &str) -> DocPath {
    DocPath::new(format!("{ROOMS}/{room_id}/players/{uid}"))
}

/// Path of a nickname claim document.
///
/// The claim key is the path leaf, which is why nicknames may not contain
/// the path separator (see [`validate_nickname`](crate::validate_nickname)).
pub fn claim_doc(room_id: &str, nickname_key: &str) -> DocPath {
    DocPath::new(format!("{ROOMS}/{room_id}/nicknameClaims/{nickname_key}"))
}

/// Path of a game document.
pub fn game_doc(room_id: &str) -> DocPath {
    DocPath::new(format!("{GAMES}/{room_id}"))
}

/// The top-level rooms collection.
pub fn rooms_collection() -> CollectionPath {
    CollectionPath::new(ROOMS)
}

/// The membership collection of one room.
pub fn members_collection(room_id: &str) -> CollectionPath {
    CollectionPath::new(format!("{ROOMS}/{room_id}/players"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn map_pack_ids_serialize_to_shipped_literals() {
        assert_eq!(
            serde_json::to_string(&MapPackId::LondonClassic).unwrap(),
            "\"london-classic\""
        );
        assert_eq!(
            serde_json::to_string(&MapPackId::NammaBengaluru).unwrap(),
            "\"namma-bengaluru\""
        );
    }

    #[test]
    fn room_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RoomState::Lobby).unwrap(), "\"lobby\"");
        assert_eq!(
            serde_json::to_string(&RoomState::Started).unwrap(),
            "\"started\""
        );
    }

    #[test]
    fn member_record_tolerates_missing_host_flag() {
        // Stored member docs written by older clients omit `isHost`.
        let m: MemberRecord = serde_json::from_str(
            r#"{"uid":"u1","nickname":"Casey","nicknameKey":"casey","joinedAtMs":7}"#,
        )
        .unwrap();
        assert!(!m.is_host);
    }

    #[test]
    fn paths_follow_store_layout() {
        assert_eq!(room_doc("r1").as_str(), "rooms/r1");
        assert_eq!(room_code_doc("ABC234").as_str(), "roomCodes/ABC234");
        assert_eq!(member_doc("r1", "u1").as_str(), "rooms/r1/players/u1");
        assert_eq!(
            claim_doc("r1", "casey").as_str(),
            "rooms/r1/nicknameClaims/casey"
        );
        assert_eq!(game_doc("r1").as_str(), "games/r1");
        assert_eq!(members_collection("r1").doc("u2").as_str(), "rooms/r1/players/u2");
    }
}
