//! # Session: tokens and the signed-in user
//!
//! A [`Session`] is a cheap, cloneable handle shared by the client and the UI on
//! a single thread. It holds the current [`Tokens`] and [`User`] and mirrors the
//! tokens into a [`TokenStore`], so that a reload can pick the session back up.
//!
//! | Implementation | Where |
//! |----------------|-------|
//! | [`MemoryTokenStore`] | Tests and native builds. |
//! | `LocalStorageTokenStore` (ui crate) | The browser's `localStorage`. |

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use resolver::User;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Tokens {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

/// Where tokens survive between page loads.
pub trait TokenStore {
    fn load(&self) -> Option<Tokens>;
    fn save(&self, tokens: &Tokens);
    fn clear(&self);
}

/// In-memory [`TokenStore`].
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<Option<Tokens>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(Some(tokens))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<Tokens> {
        self.tokens.lock().ok().and_then(|t| t.clone())
    }

    fn save(&self, tokens: &Tokens) {
        if let Ok(mut slot) = self.tokens.lock() {
            *slot = Some(tokens.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.tokens.lock() {
            *slot = None;
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    tokens: Option<Tokens>,
    user: Option<User>,
}

#[derive(Clone)]
pub struct Session {
    state: Rc<RwLock<SessionState>>,
    store: Rc<dyn TokenStore>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(MemoryTokenStore::new())
    }
}

impl Session {
    /// Create a session, restoring whatever tokens `store` already holds.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let tokens = store.load();
        if tokens.is_some() {
            tracing::debug!("Restored stored session tokens");
        }
        Self {
            state: Rc::new(RwLock::new(SessionState { tokens, user: None })),
            store: Rc::new(store),
        }
    }

    pub async fn tokens(&self) -> Option<Tokens> {
        self.state.read().await.tokens.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .tokens
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .tokens
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    pub async fn has_tokens(&self) -> bool {
        self.state.read().await.tokens.is_some()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn set_tokens(&self, tokens: Tokens) {
        self.store.save(&tokens);
        self.state.write().await.tokens = Some(tokens);
    }

    pub async fn set_user(&self, user: Option<User>) {
        self.state.write().await.user = user;
    }

    pub async fn sign_in(&self, tokens: Tokens, user: User) {
        self.store.save(&tokens);
        let mut state = self.state.write().await;
        state.tokens = Some(tokens);
        state.user = Some(user);
    }

    /// Forget tokens and user, here and in the store.
    pub async fn clear(&self) {
        self.store.clear();
        let mut state = self.state.write().await;
        state.tokens = None;
        state.user = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_restores_from_store() {
        let store = MemoryTokenStore::with_tokens(Tokens::new("a1", Some("r1".into())));
        let session = Session::new(store);
        assert_eq!(session.access_token().await.as_deref(), Some("a1"));
        assert_eq!(session.refresh_token().await.as_deref(), Some("r1"));
        assert!(session.user().await.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_and_clear_mirror_the_store() {
        let store = MemoryTokenStore::new();
        let session = Session::new(store.clone());

        let user = User {
            id: "u1".into(),
            ..Default::default()
        };
        session.sign_in(Tokens::new("a1", None), user).await;
        assert_eq!(store.load(), Some(Tokens::new("a1", None)));
        assert_eq!(session.user().await.map(|u| u.id), Some("u1".to_string()));

        session.clear().await;
        assert!(store.load().is_none());
        assert!(!session.has_tokens().await);
        assert!(session.user().await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state_and_store() {
        let store = MemoryTokenStore::new();
        let session = Session::new(store.clone());
        let other = session.clone();

        other.set_tokens(Tokens::new("a2", Some("r2".into()))).await;
        assert_eq!(session.access_token().await.as_deref(), Some("a2"));
        assert_eq!(store.load(), Some(Tokens::new("a2", Some("r2".into()))));

        session.clear().await;
        assert!(!other.has_tokens().await);
    }

    #[test]
    fn test_tokens_wire_format() {
        let tokens: Tokens =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(tokens, Tokens::new("a", Some("r".into())));
    }
}
