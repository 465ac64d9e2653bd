//! # chase-lobby
//!
//! Room, membership, and nickname coordination for short-lived multiplayer
//! chase-game lobbies: human-typeable join codes, per-room unique nicknames,
//! host transfer and kicks, and a one-shot launch that assigns the Mr. X
//! role and freezes the roster.
//!
//! The engine keeps **no authoritative state in process**. Every decision is
//! made inside an optimistic transaction against a shared document store
//! (the [`Store`] seam): read the records the decision depends on, stage the
//! writes, and commit with version preconditions. Any number of clients —
//! in one process or many — can operate on the same rooms concurrently; two
//! players racing for one nickname, two creators racing for one code, or two
//! hosts racing to launch all serialize at the store, and the loser retries
//! or surfaces a typed conflict error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chase_lobby::{
//!     CreateRoomParams, LobbyClient, MapPackId, RoomVisibility, StaticIdentity,
//!     stores::MemoryStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> chase_lobby::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let identity = Arc::new(StaticIdentity::new("u-alice", Some("Alice")));
//!     let client = LobbyClient::new(store, identity);
//!
//!     let room = client
//!         .create_room(CreateRoomParams::new(
//!             RoomVisibility::Public,
//!             MapPackId::LondonClassic,
//!         ))
//!         .await?;
//!     println!("room code: {}", room.code);
//!
//!     let members = client.watch_members(&room.id).await?.current()?;
//!     let game = client.start_game(&room.id, &members).await?;
//!     println!("Mr. X is {}", game.mr_x_uid);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`store`] — the transactional document-store seam ([`Store`]) and its
//!   path/query/commit vocabulary.
//! - [`stores`] — bundled backends (currently [`stores::MemoryStore`],
//!   behind the `store-memory` feature).
//! - [`schema`] — the persisted record shapes and document layout.
//! - [`LobbyClient`] — the stateless operation surface: rooms, membership,
//!   nicknames, launch, and typed subscriptions.
//!
//! Identity, time, and code generation are injectable seams
//! ([`IdentityProvider`], [`Clock`], [`CodeSource`]) so embeddings can plug
//! in real auth and tests can pin every source of nondeterminism.

#![warn(missing_docs)]

mod client;
pub mod clock;
pub mod codes;
mod error;
pub mod identity;
mod launch;
mod members;
mod nicknames;
mod rooms;
pub mod schema;
pub mod store;
#[cfg(feature = "store-memory")]
pub mod stores;
mod txn;

pub use client::{
    CreateRoomParams, DocWatch, ListWatch, LobbyClient, DEFAULT_PUBLIC_ROOMS_LIMIT,
};
pub use clock::{Clock, SystemClock};
pub use codes::{normalize_room_code, CodeSource, RandomCodes, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
pub use error::{LobbyError, Result};
pub use identity::{IdentityProvider, StaticIdentity, UserProfile};
pub use launch::{MAX_PLAYERS, MIN_PLAYERS};
pub use nicknames::{
    nickname_key, validate_nickname, NICKNAME_MAX_LEN, NICKNAME_MIN_LEN,
};
pub use schema::{
    GameRecord, GameStatus, MapPackId, MemberRecord, NicknameClaimRecord, RoomCodeRecord, RoomId,
    RoomRecord, RoomState, RoomVisibility, Uid,
};
pub use store::{Store, StoreError};
