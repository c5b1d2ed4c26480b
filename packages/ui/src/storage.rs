//! Token persistence for the browser session.

use api::{TokenStore, Tokens};

#[cfg(target_arch = "wasm32")]
const TOKENS_KEY: &str = "taskboard.tokens";

/// [`TokenStore`] backed by `window.localStorage`.
///
/// Storage access can fail (private browsing, quota); failures are logged and
/// the session simply does not survive a reload.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTokenStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageTokenStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<Tokens> {
        let raw = Self::storage()?.get_item(TOKENS_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored tokens: {e}");
                None
            }
        }
    }

    fn save(&self, tokens: &Tokens) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(tokens) {
            Ok(raw) => {
                if storage.set_item(TOKENS_KEY, &raw).is_err() {
                    tracing::warn!("Could not persist session tokens");
                }
            }
            Err(e) => tracing::warn!("Could not encode session tokens: {e}"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(TOKENS_KEY);
        }
    }
}

// Outside the browser there is nowhere durable to keep tokens.
#[cfg(not(target_arch = "wasm32"))]
impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<Tokens> {
        None
    }

    fn save(&self, _tokens: &Tokens) {}

    fn clear(&self) {}
}
