//! Identity provider seam.
//!
//! The engine never authenticates anyone itself. An external provider hands
//! it a stable opaque identifier plus a mutable display name, and every
//! public operation fetches the current user before touching the store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::schema::Uid;

/// The signed-in user as seen by the lobby engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stable opaque per-client identifier.
    pub uid: Uid,
    /// Mutable display name; used as the default host nickname.
    pub display_name: Option<String>,
}

/// Supplier of the current signed-in user.
///
/// # Object Safety
///
/// This trait is object-safe; the engine holds it as `Arc<dyn IdentityProvider>`.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// The current user, signing in first if the provider requires it.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Identity`](crate::LobbyError::Identity) when no
    /// user can be produced.
    async fn current_user(&self) -> Result<UserProfile>;

    /// Update the user's display name at the provider.
    async fn set_display_name(&self, name: &str) -> Result<()>;
}

/// A fixed identity, useful for tests and single-user embeddings.
#[derive(Debug)]
pub struct StaticIdentity {
    profile: RwLock<UserProfile>,
}

impl StaticIdentity {
    /// Create a provider that always reports `uid` with the given name.
    pub fn new(uid: impl Into<Uid>, display_name: Option<&str>) -> Self {
        Self {
            profile: RwLock::new(UserProfile {
                uid: uid.into(),
                display_name: display_name.map(str::to_string),
            }),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<UserProfile> {
        Ok(self.profile.read().await.clone())
    }

    async fn set_display_name(&self, name: &str) -> Result<()> {
        self.profile.write().await.display_name = Some(name.to_string());
        Ok(())
    }
}
