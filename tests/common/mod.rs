//! Shared harness for the integration tests: deterministic seams plus a
//! helper that builds clients sharing one store.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, Once};

use chase_lobby::stores::MemoryStore;
use chase_lobby::{Clock, CodeSource, LobbyClient, StaticIdentity};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install an env-filtered subscriber once per test binary, so retry and
/// contention logs show up under `RUST_LOG=chase_lobby=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Code source that replays a scripted sequence, then falls back to a
/// counter-derived code so tests never run dry.
pub struct ScriptedCodes {
    queue: Mutex<VecDeque<String>>,
    fallback: AtomicI64,
}

impl ScriptedCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(codes.into_iter().map(Into::into).collect()),
            fallback: AtomicI64::new(0),
        }
    }
}

impl CodeSource for ScriptedCodes {
    fn next_code(&self) -> String {
        if let Some(code) = self.queue.lock().expect("codes lock").pop_front() {
            return code;
        }
        let n = self.fallback.fetch_add(1, Ordering::Relaxed);
        format!("FB{n:04}")
    }
}

/// Clock pinned to a settable instant.
pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// A client for `uid` over the shared `store`, with a pinned clock.
pub fn client_for(
    store: &Arc<MemoryStore>,
    uid: &str,
    display_name: Option<&str>,
    clock: &Arc<FixedClock>,
) -> LobbyClient {
    init_tracing();
    LobbyClient::new(
        Arc::clone(store) as Arc<dyn chase_lobby::Store>,
        Arc::new(StaticIdentity::new(uid, display_name)),
    )
    .with_clock(Arc::clone(clock) as Arc<dyn Clock>)
}
