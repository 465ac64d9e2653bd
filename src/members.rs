//! Membership: join, rename, leave, and kick.
//!
//! Joining and renaming are the same operation — claim a nickname and upsert
//! the caller's membership record — which is what makes rename atomic: the
//! old claim is released and the new one taken in a single commit. Leave and
//! kick release the departing member's claim only when it is still theirs,
//! so a claim that has already moved on is never clobbered.

use tracing::{debug, info};

use crate::client::LobbyClient;
use crate::error::{LobbyError, Result};
use crate::nicknames::{nickname_key, release_in_tx, reserve_in_tx, validate_nickname};
use crate::schema::{member_doc, room_doc, MemberRecord, RoomRecord};
use crate::txn::{Tx, TxRetry};

impl LobbyClient {
    /// Join a room under `nickname`, or rename when already a member.
    ///
    /// Validates the nickname before touching the store, then atomically
    /// claims its normalized key and upserts the caller's membership record.
    /// A re-joining member keeps their original `joinedAtMs` (and host flag),
    /// so leaving and coming back does not move them in join order.
    ///
    /// # Errors
    ///
    /// [`LobbyError::InvalidNickname`] for a malformed nickname,
    /// [`LobbyError::RoomNotFound`] for an unknown room, and
    /// [`LobbyError::NicknameTaken`] when another member holds the key.
    pub async fn join_room(&self, room_id: &str, nickname: &str) -> Result<MemberRecord> {
        let user = self.identity.current_user().await?;
        let nickname = validate_nickname(nickname)?;
        let key = nickname_key(&nickname);

        let mut retry = TxRetry::new("join_room");
        loop {
            let mut tx = Tx::begin(self.store.as_ref());

            let room: Option<RoomRecord> = tx.get(&room_doc(room_id)).await?;
            if room.is_none() {
                return Err(LobbyError::RoomNotFound);
            }

            let now = self.clock.now_ms();
            let prior = reserve_in_tx(&mut tx, room_id, &user.uid, &nickname, &key, now).await?;
            let member = MemberRecord {
                uid: user.uid.clone(),
                nickname: nickname.clone(),
                nickname_key: key.clone(),
                joined_at_ms: prior.as_ref().map_or(now, |m| m.joined_at_ms),
                is_host: prior.as_ref().is_some_and(|m| m.is_host),
            };
            tx.set(&member_doc(room_id, &user.uid), &member)?;

            match tx.commit().await {
                Ok(()) => {
                    info!(room_id, uid = %member.uid, nickname = %member.nickname, "joined room");
                    return Ok(member);
                }
                Err(err) => retry.check(err)?,
            }
        }
    }

    /// Change the caller's nickname in a room they are already in.
    ///
    /// Alias for [`join_room`](Self::join_room); listed separately because
    /// callers think of it as a distinct action.
    pub async fn rename(&self, room_id: &str, nickname: &str) -> Result<MemberRecord> {
        self.join_room(room_id, nickname).await
    }

    /// Leave a room, optionally handing the host role to `transfer_to`.
    ///
    /// Releases the caller's nickname claim (when still theirs) and deletes
    /// their membership record. A departing host may name a successor; the
    /// transfer applies only if the successor is a current member other than
    /// the caller, and a host who leaves without a valid successor leaves
    /// the room host-less. Leaving a room the caller is not in is a no-op.
    ///
    /// # Errors
    ///
    /// [`LobbyError::RoomNotFound`] for an unknown room.
    pub async fn leave_room(&self, room_id: &str, transfer_to: Option<&str>) -> Result<()> {
        let user = self.identity.current_user().await?;

        let mut retry = TxRetry::new("leave_room");
        loop {
            let mut tx = Tx::begin(self.store.as_ref());

            let room: Option<RoomRecord> = tx.get(&room_doc(room_id)).await?;
            let Some(mut room) = room else {
                return Err(LobbyError::RoomNotFound);
            };

            let me: Option<MemberRecord> = tx.get(&member_doc(room_id, &user.uid)).await?;
            let Some(me) = me else {
                debug!(room_id, uid = %user.uid, "leave of non-member is a no-op");
                return Ok(());
            };

            release_in_tx(&mut tx, room_id, &user.uid, &me.nickname_key).await?;
            tx.delete(&member_doc(room_id, &user.uid));

            if room.created_by_uid == user.uid {
                if let Some(target) = transfer_to.filter(|t| *t != user.uid) {
                    let successor: Option<MemberRecord> =
                        tx.get(&member_doc(room_id, target)).await?;
                    if successor.is_some() {
                        room.created_by_uid = target.to_string();
                        tx.set(&room_doc(room_id), &room)?;
                    } else {
                        debug!(room_id, target, "host successor not a member, room left host-less");
                    }
                }
            }

            match tx.commit().await {
                Ok(()) => {
                    info!(room_id, uid = %user.uid, "left room");
                    return Ok(());
                }
                Err(err) => retry.check(err)?,
            }
        }
    }

    /// Remove `target_uid` from the room. Host only.
    ///
    /// Deletes the target's membership record and releases their nickname
    /// claim when the claim is still theirs.
    ///
    /// # Errors
    ///
    /// [`LobbyError::CannotKickSelf`] when the target is the caller,
    /// [`LobbyError::RoomNotFound`] for an unknown room,
    /// [`LobbyError::NotHost`] when the caller is not the current host, and
    /// [`LobbyError::MemberNotFound`] when the target is not in the room.
    pub async fn kick_player(&self, room_id: &str, target_uid: &str) -> Result<()> {
        let user = self.identity.current_user().await?;
        if target_uid == user.uid {
            return Err(LobbyError::CannotKickSelf);
        }

        let mut retry = TxRetry::new("kick_player");
        loop {
            let mut tx = Tx::begin(self.store.as_ref());

            let room: Option<RoomRecord> = tx.get(&room_doc(room_id)).await?;
            let Some(room) = room else {
                return Err(LobbyError::RoomNotFound);
            };
            if room.created_by_uid != user.uid {
                return Err(LobbyError::NotHost);
            }

            let target: Option<MemberRecord> = tx.get(&member_doc(room_id, target_uid)).await?;
            let Some(target) = target else {
                return Err(LobbyError::MemberNotFound {
                    uid: target_uid.to_string(),
                });
            };

            release_in_tx(&mut tx, room_id, target_uid, &target.nickname_key).await?;
            tx.delete(&member_doc(room_id, target_uid));

            match tx.commit().await {
                Ok(()) => {
                    info!(room_id, target_uid, "kicked player");
                    return Ok(());
                }
                Err(err) => retry.check(err)?,
            }
        }
    }
}
