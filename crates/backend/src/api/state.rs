use std::sync::Arc;

use crate::shared::record_source::RecordSource;
use crate::system::session::SessionStore;

/// Shared by every handler: the record source picked at startup and the sessions.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            sessions: SessionStore::new(),
        }
    }
}
