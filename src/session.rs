//! Explicit session state.
//!
//! A [`SessionContext`] is populated at login and cleared at logout; the
//! profile editor requires a resolvable user id (session id, or a persisted
//! fallback) before it touches the store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::UserProfile;
use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user_id: Option<Uuid>,
    fallback_user_id: Option<Uuid>,
    profile: Option<UserProfile>,
}

impl SessionContext {
    pub fn signed_in(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    /// Persisted fallback identity, consulted when no live session id exists.
    pub fn with_fallback(mut self, user_id: Uuid) -> Self {
        self.fallback_user_id = Some(user_id);
        self
    }

    /// The session's user id, or the fallback. Precondition failure when
    /// neither is present; no store access has happened at that point.
    pub fn resolve_user_id(&self) -> Result<Uuid, ApiError> {
        self.user_id
            .or(self.fallback_user_id)
            .ok_or(ApiError::MissingUserId)
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// In-process cache of live sessions, keyed by user id.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
}

impl SessionStore {
    pub async fn open(&self, user_id: Uuid) {
        self.inner
            .write()
            .await
            .insert(user_id, SessionContext::signed_in(user_id));
    }

    pub async fn close(&self, user_id: Uuid) {
        self.inner.write().await.remove(&user_id);
    }

    pub async fn get(&self, user_id: Uuid) -> Option<SessionContext> {
        self.inner.read().await.get(&user_id).cloned()
    }

    /// Refresh the cached profile view after a successful update. No-op when
    /// the user has no live session.
    pub async fn refresh_profile(&self, profile: &UserProfile) {
        if let Some(ctx) = self.inner.write().await.get_mut(&profile.id) {
            ctx.set_profile(profile.clone());
        }
    }
}
