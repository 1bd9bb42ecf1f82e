//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and how it is wired from configuration.

use crate::adapters::{
    FileKeyValueStore, SimulatedAuthAdapter, SimulatedExportAdapter, SimulatedGenerationAdapter,
    SimulatedParsingAdapter,
};
use crate::config::Config;
use docgen_core::{DocumentBackends, DocumentState, DocumentStore, SessionStore};
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// Created once at startup and passed to all handlers. The two stores are the
/// only writers of their state; handlers issue commands through them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub documents: Arc<DocumentStore>,
}

impl AppState {
    /// Wires the simulated adapters and the file-backed session storage.
    pub fn from_config(config: Arc<Config>) -> Self {
        let latency = &config.latency;

        let auth = Arc::new(SimulatedAuthAdapter::new(
            config.demo_email.clone(),
            config.demo_password.clone(),
            latency.auth,
        ));
        let storage = Arc::new(FileKeyValueStore::new(config.storage_path.clone()));
        info!("Session storage at {}", storage.path().display());
        let sessions = Arc::new(SessionStore::restore(auth, storage));

        let backends = DocumentBackends {
            generation: Arc::new(SimulatedGenerationAdapter::new(latency.create, latency.generate)),
            parsing: Arc::new(SimulatedParsingAdapter::new(latency.parse)),
            export: Arc::new(SimulatedExportAdapter::new(
                config.export_base_url.clone(),
                latency.export,
            )),
        };
        let documents = if config.seed_demo_documents {
            DocumentStore::with_demo_data(backends)
        } else {
            DocumentStore::new(backends, DocumentState::default())
        };

        Self {
            config,
            sessions,
            documents: Arc::new(documents),
        }
    }
}
