use crate::storage::TOKEN_KEY;

/// Supplies the opaque credential attached to every API request.
///
/// The editor never inspects or refreshes it.
pub(crate) trait CredentialProvider {
    fn credential(&self) -> Option<String>;
}

/// Credential persisted in `localStorage` by the login flow.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StoredCredential;

// Written by the login flow; only the browser tests drive it from here.
#[cfg(all(test, target_arch = "wasm32"))]
impl StoredCredential {
    pub fn save(token: &str) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    pub fn clear() {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

impl CredentialProvider for StoredCredential {
    fn credential(&self) -> Option<String> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Fixed credential for tests.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct StaticCredential(pub Option<String>);

#[cfg(test)]
impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone()
    }
}
