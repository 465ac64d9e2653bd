//! The lobby engine handle.
//!
//! [`LobbyClient`] bundles the four external seams (store, identity, clock,
//! code source) and exposes the full coordination surface: create room,
//! resolve a code, join/rename, leave with optional host transfer, kick,
//! start game, and read-only subscriptions. The handle is stateless — every
//! decision is made from reads taken inside the transaction that acts on
//! them — so any number of handles may operate on the same store at once.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = Arc::new(MemoryStore::new());
//! let identity = Arc::new(StaticIdentity::new("u-alice", Some("Alice")));
//! let client = LobbyClient::new(store, identity);
//!
//! let room = client
//!     .create_room(CreateRoomParams::new(RoomVisibility::Public, MapPackId::LondonClassic))
//!     .await?;
//! println!("share this code: {}", room.code);
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::watch;

use crate::clock::{Clock, SystemClock};
use crate::codes::{CodeSource, RandomCodes};
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::schema::{
    members_collection, room_doc, rooms_collection, MapPackId, MemberRecord, RoomRecord,
    RoomVisibility,
};
use crate::store::{Direction, Document, Query, Store};

/// Default number of rooms returned by the public-room listing.
pub const DEFAULT_PUBLIC_ROOMS_LIMIT: usize = 12;

// ── CreateRoomParams ────────────────────────────────────────────────

/// Parameters for creating a room.
///
/// Ticket counts default to the classic rules (5 black, 2 double) and are
/// clamped to their valid ranges at write time, so out-of-range values are
/// a silent correction rather than an error.
///
/// # Example
///
/// ```
/// use chase_lobby::{CreateRoomParams, MapPackId, RoomVisibility};
///
/// let params = CreateRoomParams::new(RoomVisibility::Private, MapPackId::LondonClassic)
///     .with_black_tickets(7);
/// assert_eq!(params.mr_x_black_tickets, 7);
/// ```
#[derive(Debug, Clone)]
pub struct CreateRoomParams {
    /// Public-listing visibility.
    pub visibility: RoomVisibility,
    /// Map pack to play on.
    pub map_pack_id: MapPackId,
    /// Mr. X black tickets; clamped to 0..=10 at write time.
    pub mr_x_black_tickets: i64,
    /// Mr. X double-move tickets; clamped to 0..=5 at write time.
    pub mr_x_double_tickets: i64,
}

impl CreateRoomParams {
    /// Create parameters with the classic ticket defaults.
    pub fn new(visibility: RoomVisibility, map_pack_id: MapPackId) -> Self {
        Self {
            visibility,
            map_pack_id,
            mr_x_black_tickets: 5,
            mr_x_double_tickets: 2,
        }
    }

    /// Set the black ticket count (clamped to 0..=10 at write time).
    #[must_use]
    pub fn with_black_tickets(mut self, count: i64) -> Self {
        self.mr_x_black_tickets = count;
        self
    }

    /// Set the double-move ticket count (clamped to 0..=5 at write time).
    #[must_use]
    pub fn with_double_tickets(mut self, count: i64) -> Self {
        self.mr_x_double_tickets = count;
        self
    }
}

// ── Typed subscriptions ─────────────────────────────────────────────

/// Typed view over a single-document subscription.
///
/// Wraps the store's push channel; [`current`](DocWatch::current)
/// deserializes the latest value on demand.
#[derive(Debug)]
pub struct DocWatch<T> {
    rx: watch::Receiver<Option<Document>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> DocWatch<T> {
    fn new(rx: watch::Receiver<Option<Document>>) -> Self {
        Self {
            rx,
            _marker: PhantomData,
        }
    }

    /// The latest pushed value, or `None` if the document does not exist.
    pub fn current(&self) -> Result<Option<T>> {
        self.rx
            .borrow()
            .as_ref()
            .map(|doc| serde_json::from_value(doc.value.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Wait for the next committed change. Returns `false` when the store
    /// dropped the subscription.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Typed view over a query subscription.
#[derive(Debug)]
pub struct ListWatch<T> {
    rx: watch::Receiver<Vec<Document>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> ListWatch<T> {
    fn new(rx: watch::Receiver<Vec<Document>>) -> Self {
        Self {
            rx,
            _marker: PhantomData,
        }
    }

    /// The latest pushed result, in query order.
    pub fn current(&self) -> Result<Vec<T>> {
        self.rx
            .borrow()
            .iter()
            .map(|doc| serde_json::from_value(doc.value.clone()).map_err(Into::into))
            .collect()
    }

    /// Wait for the next committed change. Returns `false` when the store
    /// dropped the subscription.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

// ── Client handle ───────────────────────────────────────────────────

/// Handle for the room/membership/nickname coordination engine.
///
/// Cheap to clone; clones share the same seams.
#[derive(Clone)]
pub struct LobbyClient {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) codes: Arc<dyn CodeSource>,
}

impl LobbyClient {
    /// Create a client over `store` and `identity` with the system clock and
    /// uniform random room codes.
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            clock: Arc::new(SystemClock),
            codes: Arc::new(RandomCodes),
        }
    }

    /// Replace the clock (timestamps and launch seed).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the room-code source.
    #[must_use]
    pub fn with_code_source(mut self, codes: Arc<dyn CodeSource>) -> Self {
        self.codes = codes;
        self
    }

    // ── Subscriptions ───────────────────────────────────────────────

    /// Subscribe to a room document.
    pub async fn watch_room(&self, room_id: &str) -> Result<DocWatch<RoomRecord>> {
        let rx = self.store.watch_doc(&room_doc(room_id)).await?;
        Ok(DocWatch::new(rx))
    }

    /// Subscribe to a room's membership, ordered by join time ascending.
    pub async fn watch_members(&self, room_id: &str) -> Result<ListWatch<MemberRecord>> {
        let query = Query::collection(members_collection(room_id), "joinedAtMs");
        let rx = self.store.watch_query(&query).await?;
        Ok(ListWatch::new(rx))
    }

    /// Subscribe to the public-room listing, newest first.
    ///
    /// `limit` defaults to [`DEFAULT_PUBLIC_ROOMS_LIMIT`].
    pub async fn watch_public_rooms(&self, limit: Option<usize>) -> Result<ListWatch<RoomRecord>> {
        let query = Query::collection(rooms_collection(), "createdAtMs")
            .filter_eq("visibility", json!("public"))
            .direction(Direction::Descending)
            .limit(limit.unwrap_or(DEFAULT_PUBLIC_ROOMS_LIMIT));
        let rx = self.store.watch_query(&query).await?;
        Ok(ListWatch::new(rx))
    }
}

impl std::fmt::Debug for LobbyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LobbyClient").finish_non_exhaustive()
    }
}
