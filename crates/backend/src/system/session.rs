//! In-memory dashboard sessions.
//!
//! A session remembers the active tab and filter of one dashboard. Every filter
//! change bumps `generation`; a daily fetch started under an older generation is
//! discarded when it completes, so only the latest filter's rows become visible.
//!
//! Sessions idle for longer than the store's max age are dropped whenever a new
//! session is created.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use contracts::dashboards::d410_store_performance::DailyPerformanceResponse;
use contracts::domain::a030_store::StoreFilter;
use contracts::shared::session::{
    DashboardTab, RefreshOutcome, SessionSnapshot, UpdateFilterRequest,
};
use thiserror::Error;
use uuid::Uuid;

use crate::dashboards::d410_store_performance::service;
use crate::shared::catalog::{self, FilterError};
use crate::shared::record_source::RecordSource;

/// Idle time after which a session is dropped.
pub const SESSION_MAX_AGE_HOURS: i64 = 12;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub id: Uuid,
    pub active_tab: DashboardTab,
    pub filter: StoreFilter,
    pub generation: u64,
    pub daily: Option<DailyPerformanceResponse>,
    /// Last read or write through the store
    pub last_seen: DateTime<Utc>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            active_tab: DashboardTab::default(),
            filter: StoreFilter::new("", "", "Week 1"),
            generation: 0,
            daily: None,
            last_seen: Utc::now(),
        }
    }

    /// Changing the region drops the store selection.
    pub fn set_region(&mut self, region: &str) -> Result<(), FilterError> {
        let candidate = StoreFilter {
            store_id: String::new(),
            region: region.trim().to_string(),
            week: self.filter.week.clone(),
        };
        self.commit(candidate)
    }

    pub fn set_store(&mut self, store_id: &str) -> Result<(), FilterError> {
        let candidate = StoreFilter {
            store_id: store_id.trim().to_string(),
            ..self.filter.clone()
        };
        self.commit(candidate)
    }

    pub fn set_week(&mut self, week: &str) -> Result<(), FilterError> {
        let candidate = StoreFilter {
            week: week.trim().to_string(),
            ..self.filter.clone()
        };
        self.commit(candidate)
    }

    pub fn set_tab(&mut self, tab: DashboardTab) {
        self.active_tab = tab;
    }

    /// Region first (it clears the store), then store, then week.
    ///
    /// Counts as one filter change; the session is left untouched when rejected.
    pub fn apply_update(&mut self, update: &UpdateFilterRequest) -> Result<(), FilterError> {
        let mut candidate = self.filter.clone();
        if let Some(region) = &update.region {
            candidate.region = region.trim().to_string();
            candidate.store_id.clear();
        }
        if let Some(store_id) = &update.store_id {
            candidate.store_id = store_id.trim().to_string();
        }
        if let Some(week) = &update.week {
            candidate.week = week.trim().to_string();
        }
        self.commit(candidate)
    }

    fn commit(&mut self, candidate: StoreFilter) -> Result<(), FilterError> {
        let resolved = catalog::resolve_filter(&candidate)?;
        if resolved.filter != self.filter {
            self.filter = resolved.filter;
            self.generation += 1;
            self.daily = None;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            active_tab: self.active_tab,
            filter: self.filter.clone(),
            generation: self.generation,
            daily: self.daily.clone(),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, DashboardSession>>>,
    max_age: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_max_age(Duration::hours(SESSION_MAX_AGE_HOURS))
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_age,
        }
    }

    pub fn create(&self) -> SessionSnapshot {
        let evicted = self.cleanup_old_sessions(self.max_age);
        if evicted > 0 {
            tracing::info!("Dropped {} idle sessions", evicted);
        }

        let session = DashboardSession::new();
        let snapshot = session.snapshot();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session.id, session);
        snapshot
    }

    pub fn get(&self, id: Uuid) -> Option<SessionSnapshot> {
        self.update(id, |session| Ok(session.snapshot())).ok()
    }

    /// Returns `false` when the session did not exist.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(&id).is_some()
    }

    /// Drops sessions not seen for `max_age`; returns how many were dropped.
    pub fn cleanup_old_sessions(&self, max_age: Duration) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_seen < max_age);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut DashboardSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.last_seen = Utc::now();
        f(session)
    }

    pub fn update_filter(
        &self,
        id: Uuid,
        update: &UpdateFilterRequest,
    ) -> Result<SessionSnapshot, SessionError> {
        self.update(id, |session| {
            session.apply_update(update)?;
            tracing::info!(
                "Session {}: filter {:?}, generation {}",
                id,
                session.filter,
                session.generation
            );
            Ok(session.snapshot())
        })
    }

    pub fn set_tab(&self, id: Uuid, tab: DashboardTab) -> Result<SessionSnapshot, SessionError> {
        self.update(id, |session| {
            session.set_tab(tab);
            Ok(session.snapshot())
        })
    }

    /// Fetches daily rows for the session's current filter.
    ///
    /// The lock is not held during the fetch. The result is committed only if no
    /// filter change happened meanwhile; a failure for a replaced filter is
    /// reported as superseded too.
    pub async fn refresh_daily(
        &self,
        id: Uuid,
        source: &dyn RecordSource,
    ) -> anyhow::Result<RefreshOutcome> {
        let (filter, generation, active_tab) = {
            let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
            let session = sessions.get(&id).ok_or(SessionError::NotFound(id))?;
            (
                session.filter.clone(),
                session.generation,
                session.active_tab,
            )
        };

        if active_tab != DashboardTab::Stores {
            return Ok(RefreshOutcome::Skipped { active_tab });
        }

        let response = match service::get_daily_performance(source, &filter).await {
            Ok(response) => response,
            Err(e) => {
                let current = self.update(id, |session| Ok(session.generation))?;
                if current != generation {
                    tracing::warn!(
                        "Session {}: ignoring failed fetch for generation {} (current {}): {}",
                        id,
                        generation,
                        current,
                        e
                    );
                    return Ok(RefreshOutcome::Superseded {
                        generation: current,
                    });
                }
                return Err(e);
            }
        };

        self.update(id, |session| {
            if session.generation != generation {
                tracing::warn!(
                    "Session {}: discarding daily rows for generation {} (current {})",
                    id,
                    generation,
                    session.generation
                );
                return Ok(RefreshOutcome::Superseded {
                    generation: session.generation,
                });
            }
            session.daily = Some(response.clone());
            Ok(RefreshOutcome::Applied { data: response })
        })
        .map_err(Into::into)
    }
}
