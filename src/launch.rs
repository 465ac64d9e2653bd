//! One-shot game launch with Mr. X role assignment.
//!
//! The launch transaction re-reads the room, the game slot, and every member
//! of the caller's lobby snapshot, so the roster the roles were computed
//! from is exactly the roster that exists at commit time. The room's state
//! flips to `started` in the same commit that creates the game record,
//! making the launch a single irreversible step.

use tracing::{info, warn};

use crate::client::LobbyClient;
use crate::error::{LobbyError, Result};
use crate::schema::{
    game_doc, member_doc, room_doc, GameRecord, GameStatus, MemberRecord, RoomRecord, RoomState,
};
use crate::txn::{Tx, TxRetry};

/// Minimum players for a launch (one Mr. X, one detective).
pub const MIN_PLAYERS: usize = 2;

/// Maximum players for a launch (one Mr. X, five detectives).
pub const MAX_PLAYERS: usize = 6;

impl LobbyClient {
    /// Launch the game from the caller's view of the lobby. Host only.
    ///
    /// `lobby_members` is the roster the caller is looking at; the launch
    /// commits only if every one of them is still in the room. Mr. X is
    /// picked from the roster (sorted by join time) using a time-derived
    /// seed; the remaining members become detectives in join order, and the
    /// play order is Mr. X first. Calling again after a successful launch
    /// returns the existing game record.
    ///
    /// # Errors
    ///
    /// [`LobbyError::TooFewPlayers`] / [`LobbyError::TooManyPlayers`] for a
    /// roster outside 2..=6, [`LobbyError::RoomNotFound`],
    /// [`LobbyError::NotHost`], [`LobbyError::AlreadyStarted`] when the room
    /// left the lobby state without a game record, and
    /// [`LobbyError::MembershipChanged`] when the roster drifted from the
    /// caller's snapshot.
    pub async fn start_game(
        &self,
        room_id: &str,
        lobby_members: &[MemberRecord],
    ) -> Result<GameRecord> {
        let user = self.identity.current_user().await?;

        let mut roster = lobby_members.to_vec();
        roster.sort_by_key(|m| m.joined_at_ms);
        let count = roster.len();
        if count < MIN_PLAYERS {
            return Err(LobbyError::TooFewPlayers { count });
        }
        if count > MAX_PLAYERS {
            return Err(LobbyError::TooManyPlayers { count });
        }

        // One seed per launch attempt, so commit retries re-run the same
        // role assignment against the re-validated roster.
        let seed = self.clock.now_ms();
        let mr_x_index = seed.rem_euclid(count as i64) as usize;
        let Some(mr_x) = roster.get(mr_x_index) else {
            return Err(LobbyError::MembershipChanged);
        };
        let mr_x_uid = mr_x.uid.clone();
        let detective_uids: Vec<String> = roster
            .iter()
            .filter(|m| m.uid != mr_x_uid)
            .map(|m| m.uid.clone())
            .collect();
        let mut player_order_uids = Vec::with_capacity(count);
        player_order_uids.push(mr_x_uid.clone());
        player_order_uids.extend(detective_uids.iter().cloned());

        let mut retry = TxRetry::new("start_game");
        loop {
            let mut tx = Tx::begin(self.store.as_ref());

            let room: Option<RoomRecord> = tx.get(&room_doc(room_id)).await?;
            let Some(mut room) = room else {
                return Err(LobbyError::RoomNotFound);
            };
            if room.created_by_uid != user.uid {
                return Err(LobbyError::NotHost);
            }

            // An existing game means a previous launch won; hand it back.
            let existing: Option<GameRecord> = tx.get(&game_doc(room_id)).await?;
            if let Some(game) = existing {
                info!(room_id, "launch already completed, returning existing game");
                return Ok(game);
            }
            if room.state != RoomState::Lobby {
                return Err(LobbyError::AlreadyStarted);
            }

            // Every snapshot member is re-read individually so the commit
            // fails if anyone joined a different record or left.
            for snapshot in &roster {
                let current: Option<MemberRecord> =
                    tx.get(&member_doc(room_id, &snapshot.uid)).await?;
                if current.is_none() {
                    warn!(room_id, uid = %snapshot.uid, "lobby roster drifted before launch");
                    return Err(LobbyError::MembershipChanged);
                }
            }

            let now = self.clock.now_ms();
            let game = GameRecord {
                id: room_id.to_string(),
                room_id: room_id.to_string(),
                created_at_ms: now,
                started_by_uid: user.uid.clone(),
                status: GameStatus::Active,
                map_pack_id: room.map_pack_id,
                mr_x_black_tickets: room.mr_x_black_tickets,
                mr_x_double_tickets: room.mr_x_double_tickets,
                mr_x_uid: mr_x_uid.clone(),
                detective_uids: detective_uids.clone(),
                turn_index: 0,
                player_order_uids: player_order_uids.clone(),
            };

            room.state = RoomState::Started;
            room.game_id = Some(room_id.to_string());
            room.started_at_ms = Some(now);

            tx.set(&game_doc(room_id), &game)?;
            tx.set(&room_doc(room_id), &room)?;

            match tx.commit().await {
                Ok(()) => {
                    info!(room_id, mr_x = %game.mr_x_uid, players = count, "game started");
                    return Ok(game);
                }
                Err(err) => retry.check(err)?,
            }
        }
    }
}
