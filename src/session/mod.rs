pub mod credential;
pub mod gate;
pub mod navigator;

pub use credential::{Credential, CredentialRecord, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use gate::{GateDecision, SessionGate};
pub use navigator::{Navigator, Route, RouteHistory, PUBLIC_ROOT};

use std::sync::Arc;
use tracing::info;

use crate::error::ClientError;

/// Injected session context shared by the gate, the screens and the HTTP client
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn gate(&self) -> SessionGate {
        SessionGate::new(self.store.clone())
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Current valid credential, read fresh from the store
    pub fn credential(&self) -> Result<Option<Credential>, ClientError> {
        self.store.get()
    }

    /// Bearer token for outgoing requests
    pub fn bearer(&self) -> Result<String, ClientError> {
        self.credential()?
            .map(|c| c.token)
            .ok_or(ClientError::NotAuthenticated)
    }

    pub fn sign_in(&self, credential: &Credential) -> Result<(), ClientError> {
        self.store.set(credential)?;
        info!("Signed in as '{}'", credential.display_name);
        Ok(())
    }

    /// Clear both fields and return to the public root, whatever the prior state
    pub fn logout(&self, navigator: &mut dyn Navigator) -> Result<(), ClientError> {
        self.store.clear()?;
        navigator.replace(PUBLIC_ROOT);
        info!("Signed out");
        Ok(())
    }
}
