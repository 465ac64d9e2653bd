//! Room creation and code resolution.
//!
//! Creation reserves a join code and writes the room, its code index entry,
//! the host's membership record, and the host's nickname claim in one atomic
//! commit, so either the whole room exists or none of it does. Code
//! collisions are detected by reading the reservation inside the same
//! transaction; a taken code burns one attempt and a fresh code is drawn.

use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{CreateRoomParams, LobbyClient};
use crate::codes::{normalize_room_code, ROOM_CODE_LEN};
use crate::error::{LobbyError, Result};
use crate::nicknames::{nickname_key, validate_nickname};
use crate::schema::{
    claim_doc, member_doc, room_code_doc, room_doc, MemberRecord, NicknameClaimRecord, RoomCodeRecord,
    RoomId, RoomRecord, RoomState,
};
use crate::store::StoreError;
use crate::txn::{Tx, MAX_COMMIT_ATTEMPTS};

/// Nickname given to a host whose display name is unusable.
const FALLBACK_HOST_NICKNAME: &str = "Host";

/// Valid range for Mr. X black tickets.
const BLACK_TICKETS_MAX: i64 = 10;

/// Valid range for Mr. X double-move tickets.
const DOUBLE_TICKETS_MAX: i64 = 5;

impl LobbyClient {
    /// Create a room and seat the caller as its host.
    ///
    /// Draws candidate codes until one's reservation slot is free, then
    /// commits the room document, the code index entry, the host membership
    /// record, and the host nickname claim atomically. The host nickname is
    /// the caller's display name when it passes validation, otherwise
    /// `"Host"`.
    ///
    /// # Errors
    ///
    /// [`LobbyError::CodeSpaceExhausted`] after five attempts that all hit a
    /// taken code or a racing reservation.
    pub async fn create_room(&self, params: CreateRoomParams) -> Result<RoomRecord> {
        let user = self.identity.current_user().await?;
        let host_nickname = user
            .display_name
            .as_deref()
            .and_then(|name| validate_nickname(name).ok())
            .unwrap_or_else(|| FALLBACK_HOST_NICKNAME.to_string());
        let host_key = nickname_key(&host_nickname);

        let black = params.mr_x_black_tickets.clamp(0, BLACK_TICKETS_MAX) as u8;
        let double = params.mr_x_double_tickets.clamp(0, DOUBLE_TICKETS_MAX) as u8;

        for attempt in 0..MAX_COMMIT_ATTEMPTS {
            let code = self.codes.next_code();
            let mut tx = Tx::begin(self.store.as_ref());

            let reserved: Option<RoomCodeRecord> = tx.get(&room_code_doc(&code)).await?;
            if reserved.is_some() {
                debug!(%code, attempt, "room code already reserved, drawing another");
                continue;
            }

            let room_id: RoomId = Uuid::new_v4().to_string();
            let now = self.clock.now_ms();
            let room = RoomRecord {
                id: room_id.clone(),
                code: code.clone(),
                created_at_ms: now,
                visibility: params.visibility,
                created_by_uid: user.uid.clone(),
                map_pack_id: params.map_pack_id,
                mr_x_black_tickets: black,
                mr_x_double_tickets: double,
                state: RoomState::Lobby,
                game_id: None,
                started_at_ms: None,
            };

            tx.set(&room_doc(&room_id), &room)?;
            tx.set(
                &room_code_doc(&code),
                &RoomCodeRecord {
                    code: code.clone(),
                    room_id: room_id.clone(),
                    created_at_ms: now,
                },
            )?;
            tx.set(
                &member_doc(&room_id, &user.uid),
                &MemberRecord {
                    uid: user.uid.clone(),
                    nickname: host_nickname.clone(),
                    nickname_key: host_key.clone(),
                    joined_at_ms: now,
                    is_host: true,
                },
            )?;
            tx.set(
                &claim_doc(&room_id, &host_key),
                &NicknameClaimRecord {
                    nickname_key: host_key.clone(),
                    nickname: host_nickname.clone(),
                    uid: user.uid.clone(),
                    created_at_ms: now,
                },
            )?;

            match tx.commit().await {
                Ok(()) => {
                    info!(room_id = %room.id, %code, "room created");
                    return Ok(room);
                }
                // A racing creator won the same code between our read and
                // commit. The code may now be taken, so draw a fresh one.
                Err(StoreError::Contention { path }) => {
                    debug!(%code, attempt, %path, "creation commit contended, retrying");
                }
                Err(other) => return Err(LobbyError::Store(other)),
            }
        }

        Err(LobbyError::CodeSpaceExhausted {
            attempts: MAX_COMMIT_ATTEMPTS,
        })
    }

    /// Resolve user input into a room id via the code index.
    ///
    /// Input is normalized (trimmed, uppercased, non-alphanumerics stripped)
    /// before the lookup. Returns `Ok(None)` for unknown codes and for input
    /// that does not normalize to the code length.
    pub async fn resolve_room_code(&self, input: &str) -> Result<Option<RoomId>> {
        self.identity.current_user().await?;
        let code = normalize_room_code(input);
        if code.len() != ROOM_CODE_LEN {
            return Ok(None);
        }
        match self.store.get(&room_code_doc(&code)).await? {
            Some(doc) => {
                let record: RoomCodeRecord = serde_json::from_value(doc.value)?;
                Ok(Some(record.room_id))
            }
            None => Ok(None),
        }
    }
}
