//! Error types for the chase-lobby coordination engine.
//!
//! Every fallible operation returns [`LobbyError`] through the crate-level
//! [`Result`] alias. Validation, conflict, authorization, and not-found
//! conditions are distinct typed variants so callers can render precise
//! feedback (e.g. "that nickname is already taken in this room") instead of
//! pattern-matching on message strings.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur when using the lobby coordination engine.
#[derive(Debug, Error)]
pub enum LobbyError {
    // Validation errors — detected before touching the store.
    /// The nickname failed validation (length or forbidden characters).
    #[error("invalid nickname: {0}")]
    InvalidNickname(&'static str),

    // Conflict errors — detected inside a transaction.
    /// The normalized nickname is already claimed by another member of the room.
    #[error("that nickname is already taken in this room")]
    NicknameTaken,

    /// Every generated room code collided with an existing reservation.
    #[error("failed to reserve a room code after {attempts} attempts")]
    CodeSpaceExhausted {
        /// Number of fresh candidate codes tried before giving up.
        attempts: u32,
    },

    /// The membership list drifted between snapshot and launch.
    #[error("player list changed while starting; take a fresh snapshot and retry")]
    MembershipChanged,

    // Authorization errors.
    /// The acting member is not the room's host.
    #[error("only the host can do that")]
    NotHost,

    /// A member attempted to kick themselves.
    #[error("cannot kick yourself")]
    CannotKickSelf,

    // Not-found errors.
    /// The room does not exist.
    #[error("room not found")]
    RoomNotFound,

    /// The targeted member is not present in the room.
    #[error("member {uid} is not in the room")]
    MemberNotFound {
        /// Identifier of the absent member.
        uid: String,
    },

    // Launch preconditions.
    /// Fewer than the minimum player count were supplied to `start_game`.
    #[error("need at least 2 players to start, have {count}")]
    TooFewPlayers {
        /// Number of members in the supplied snapshot.
        count: usize,
    },

    /// More than the maximum player count were supplied to `start_game`.
    #[error("at most 6 players are supported, have {count}")]
    TooManyPlayers {
        /// Number of members in the supplied snapshot.
        count: usize,
    },

    /// The room already left the lobby state and no game record exists to
    /// report idempotent success against.
    #[error("the game has already started")]
    AlreadyStarted,

    // External collaborators.
    /// The identity provider could not produce a signed-in user.
    #[error("identity provider error: {0}")]
    Identity(String),

    /// A stored document could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store reported a failure (contention budget exhausted, unavailable).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LobbyError {
    /// Returns `true` if retrying the same operation may succeed.
    ///
    /// Covers transient store failures, exhausted code-reservation budgets
    /// (a retry draws fresh random codes), and stale launch snapshots (a
    /// retry starts from a fresh membership read).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::CodeSpaceExhausted { .. } | Self::MembershipChanged
        )
    }

    /// Returns `true` if the error was caused by a concurrent conflicting
    /// operation rather than by the caller's own input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::NicknameTaken
                | Self::MembershipChanged
                | Self::CodeSpaceExhausted { .. }
                | Self::Store(StoreError::Contention { .. })
        )
    }
}

/// A specialized [`Result`] type for lobby operations.
pub type Result<T> = std::result::Result<T, LobbyError>;
