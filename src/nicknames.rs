//! Nickname validation, normalization, and the per-room claim registry.
//!
//! A claim document at `rooms/{id}/nicknameClaims/{key}` guarantees that a
//! normalized nickname is held by exactly one member. Claiming is a
//! check-then-act sequence made atomic purely by transaction isolation:
//! the claim, the caller's membership record, and (on rename) the old claim
//! are all read in the same [`Tx`] that writes the replacement, so two
//! members racing for one name serialize at commit and the loser observes
//! the winner's claim on its retry.

use crate::error::{LobbyError, Result};
use crate::schema::{claim_doc, member_doc, MemberRecord, NicknameClaimRecord};
use crate::txn::Tx;

/// Minimum trimmed nickname length, in characters.
pub const NICKNAME_MIN_LEN: usize = 2;

/// Maximum trimmed nickname length, in characters.
pub const NICKNAME_MAX_LEN: usize = 18;

/// Validate a raw nickname and return its trimmed display form.
///
/// Rejects trimmed lengths outside `[2, 18]` and any occurrence of `/`,
/// which is the document path separator (the normalized key becomes a path
/// leaf).
pub fn validate_nickname(raw: &str) -> Result<String> {
    let nickname = raw.trim();
    let len = nickname.chars().count();
    if len < NICKNAME_MIN_LEN {
        return Err(LobbyError::InvalidNickname("too short"));
    }
    if len > NICKNAME_MAX_LEN {
        return Err(LobbyError::InvalidNickname("too long"));
    }
    if nickname.contains('/') {
        return Err(LobbyError::InvalidNickname("must not contain '/'"));
    }
    Ok(nickname.to_string())
}

/// Normalized claim key of a nickname: trimmed and lowercased.
pub fn nickname_key(nickname: &str) -> String {
    nickname.trim().to_lowercase()
}

/// Reserve `nickname` for `uid` inside the transaction.
///
/// Reads the target claim and the caller's membership record; fails with
/// [`LobbyError::NicknameTaken`] if another member holds the key. Releases
/// the caller's previous claim when renaming away from it (only if still
/// owned), then stages the new claim. Returns the caller's pre-existing
/// membership record so the caller can preserve join order and host flag.
pub(crate) async fn reserve_in_tx(
    tx: &mut Tx<'_>,
    room_id: &str,
    uid: &str,
    nickname: &str,
    key: &str,
    now_ms: i64,
) -> Result<Option<MemberRecord>> {
    let claim_path = claim_doc(room_id, key);
    let existing: Option<NicknameClaimRecord> = tx.get(&claim_path).await?;
    if let Some(claim) = existing {
        if claim.uid != uid {
            return Err(LobbyError::NicknameTaken);
        }
    }

    let member: Option<MemberRecord> = tx.get(&member_doc(room_id, uid)).await?;
    if let Some(prev) = &member {
        if prev.nickname_key != key {
            let old_path = claim_doc(room_id, &prev.nickname_key);
            let old: Option<NicknameClaimRecord> = tx.get(&old_path).await?;
            if old.is_some_and(|c| c.uid == uid) {
                tx.delete(&old_path);
            }
        }
    }

    tx.set(
        &claim_path,
        &NicknameClaimRecord {
            nickname_key: key.to_string(),
            nickname: nickname.to_string(),
            uid: uid.to_string(),
            created_at_ms: now_ms,
        },
    )?;

    Ok(member)
}

/// Release `key` inside the transaction if it is still owned by `uid`.
///
/// Used by leave and kick; a claim that was already replaced by another
/// member is left untouched.
pub(crate) async fn release_in_tx(
    tx: &mut Tx<'_>,
    room_id: &str,
    uid: &str,
    key: &str,
) -> Result<()> {
    let claim_path = claim_doc(room_id, key);
    let claim: Option<NicknameClaimRecord> = tx.get(&claim_path).await?;
    if claim.is_some_and(|c| c.uid == uid) {
        tx.delete(&claim_path);
    }
    Ok(())
}
