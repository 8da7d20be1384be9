//! Shared application state.
//!
//! The catalog and dispatcher are shared read-only across all requests.
//! Wizard sessions are per-user: each lives behind its own lock inside a
//! TTL-evicting cache, so no mutable state is shared between sessions.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::engine::{FormWizard, GenerationDispatcher, StrategyCatalog};

/// One user's wizard session: the state machine plus the host-side payment
/// confirmation signal for this session.
pub struct WizardSession {
    pub wizard: FormWizard,
    pub payment_confirmed: bool,
}

impl WizardSession {
    pub fn new(wizard: FormWizard) -> Self {
        Self {
            wizard,
            payment_confirmed: false,
        }
    }
}

/// In-memory session store with idle expiry. Sessions are never persisted;
/// an expired or deleted session simply disappears.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<Mutex<WizardSession>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(ttl)
            .max_capacity(max_sessions)
            .build();
        Self { sessions }
    }

    pub fn insert(&self, session: WizardSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<WizardSession>>> {
        self.sessions.get(id)
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        let existed = self.sessions.contains_key(id);
        self.sessions.invalidate(id);
        existed
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        // 30 minutes of idle time before a session is dropped
        Self::new(Duration::from_secs(30 * 60), 10_000)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StrategyCatalog>,
    pub dispatcher: Arc<GenerationDispatcher>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(catalog: Arc<StrategyCatalog>, dispatcher: Arc<GenerationDispatcher>) -> Self {
        Self {
            catalog,
            dispatcher,
            sessions: SessionStore::default(),
        }
    }
}
