//! Shared session handle with persistence.

use std::sync::Arc;

use bigtree_network::{Network, Scenario};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::config::BonusConfig;
use crate::session::Session;
use crate::store::{NetworkStore, SaveOutcome, StoreError};
use crate::types::Result;

/// Cloneable handle to a session and the store it persists to.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<RwLock<Session>>,
    store: Arc<dyn NetworkStore>,
}

impl SessionHandle {
    pub fn new(session: Session, store: Arc<dyn NetworkStore>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            store,
        }
    }

    /// Open the scenario's saved network, or its built-in network when
    /// nothing is saved or the saved data is malformed. I/O failures are
    /// returned.
    pub async fn load_or_default(
        scenario: Scenario,
        owner: &str,
        config: BonusConfig,
        store: Arc<dyn NetworkStore>,
    ) -> Result<Self> {
        let key = scenario.store_key();
        let loaded = match store.load(key).await {
            Ok(records) => records,
            Err(StoreError::Serialization(e)) => {
                warn!(key = %key, error = %e, "Saved network is unreadable, using default");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let network = match loaded.map(|records| Network::from_records(&records)) {
            Some(Ok(network)) => {
                info!(key = %key, members = network.len(), "Loaded saved network");
                Some(network)
            }
            Some(Err(e)) => {
                warn!(key = %key, error = %e, "Saved network is malformed, using default");
                None
            }
            None => None,
        };

        let session = match network {
            Some(network) => Session::new(scenario, network, config),
            None => Session::with_default_network(scenario, owner, config)?,
        };
        Ok(Self::new(session, store))
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().await
    }

    /// Persist the current network. The session lock is released before the
    /// store is awaited.
    pub async fn save(&self) -> Result<SaveOutcome> {
        let (key, records) = {
            let session = self.session.read().await;
            (session.scenario().store_key(), session.records())
        };
        Ok(self.store.save(key, &records).await?)
    }
}
