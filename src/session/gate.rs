use std::sync::Arc;
use tracing::{debug, warn};

use super::credential::{Credential, CredentialRecord, CredentialStore};
use super::navigator::{Navigator, PUBLIC_ROOT};
use crate::error::ClientError;

/// Outcome of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Credential),
    Deny,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow(_))
    }
}

/// Route guard over the persisted credential record.
///
/// The decision is local only: no request is made to check the token.
pub struct SessionGate {
    store: Arc<dyn CredentialStore>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Pure decision over a record
    pub fn decide(record: &CredentialRecord) -> GateDecision {
        match record.credential() {
            Some(credential) => GateDecision::Allow(credential),
            None => GateDecision::Deny,
        }
    }

    /// Read the store, decide, and apply the deny side effects.
    ///
    /// An unreadable record counts as absent.
    pub fn evaluate(&self, navigator: &mut dyn Navigator) -> Result<GateDecision, ClientError> {
        let record = match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                warn!("Credential record unreadable, treating as signed out: {}", e);
                CredentialRecord::empty()
            }
        };

        let decision = Self::decide(&record);
        match &decision {
            GateDecision::Allow(credential) => {
                debug!("Session gate allowed '{}' on {}", credential.display_name, navigator.current());
            }
            GateDecision::Deny => {
                debug!("Session gate denied {}", navigator.current());
                navigator.replace(PUBLIC_ROOT);
                self.store.clear()?;
            }
        }

        Ok(decision)
    }

    /// Navigate to a protected path and guard it
    pub fn enter(&self, navigator: &mut dyn Navigator, path: &str) -> Result<GateDecision, ClientError> {
        navigator.push(path);
        self.evaluate(navigator)
    }
}
