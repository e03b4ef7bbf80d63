//! Login sessions
//!
//! A session is created at login and holds the upstream access token, the
//! user's display preference and one table engine per view. Sessions live
//! in memory only and expire after the configured idle time.

use chrono::{DateTime, Duration, Utc};
use paydash_config::Config;
use paydash_utils::generate_id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

use super::engine::{TableEngine, TableView, ViewPreferences, ViewPreferencesUpdate};
use super::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use super::filter::FilterState;
use super::models::TransactionRecord;

/// One table with its engine and the outcome of the last fetch
#[derive(Debug, Clone)]
pub struct ViewState {
    pub engine: TableEngine,
    /// Message of the last failed fetch, cleared by a successful one
    pub fetch_error: Option<String>,
    /// Selected school for the school view
    pub school_id: Option<String>,
    /// Whether any fetch has completed yet
    pub loaded: bool,
}

impl ViewState {
    pub fn new(engine: TableEngine) -> Self {
        Self {
            engine,
            fetch_error: None,
            school_id: None,
            loaded: false,
        }
    }

    /// Replace the records with a fetch result
    ///
    /// A failed fetch leaves the view empty with the error recorded; no
    /// previous records survive.
    pub fn apply_fetch<E: Display>(&mut self, result: Result<Vec<TransactionRecord>, E>) {
        self.loaded = true;
        match result {
            Ok(records) => {
                log::info!("Loaded {} transactions", records.len());
                self.fetch_error = None;
                self.engine.set_records(records);
            }
            Err(e) => {
                let message = e.to_string();
                let mut context = ErrorContext::new("fetch_transactions".to_string());
                if let Some(school_id) = &self.school_id {
                    context = context.with_data("school_id", serde_json::json!(school_id));
                }
                DefaultErrorLogger.log_error(&CoreError::FetchFailed { message: message.clone() }, &context);
                self.fetch_error = Some(message);
                self.engine.set_records(Vec::new());
            }
        }
    }

    /// Serializable state for API responses
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            table: self.engine.view(),
            filter: self.engine.filter().clone(),
            error: self.fetch_error.clone(),
            school_id: self.school_id.clone(),
            loaded: self.loaded,
        }
    }
}

/// View state as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    #[serde(flatten)]
    pub table: TableView,
    pub filter: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    pub loaded: bool,
}

/// Per-user display preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Everything a client can save and restore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPreferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub overview: ViewPreferences,
    #[serde(default)]
    pub school: ViewPreferences,
}

/// Partial preferences update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub overview: Option<ViewPreferencesUpdate>,
    #[serde(default)]
    pub school: Option<ViewPreferencesUpdate>,
}

/// Server-side login state
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Bearer token for the upstream payments API
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub preferences: Preferences,
    pub overview: ViewState,
    pub school: ViewState,
}

impl Session {
    pub fn new(id: String, token: String, config: &Config, now: DateTime<Utc>) -> Self {
        Self {
            id,
            token,
            created_at: now,
            last_seen: now,
            preferences: Preferences {
                dark_mode: config.ui.dark_mode,
            },
            overview: ViewState::new(TableEngine::from_config(config)),
            school: ViewState::new(TableEngine::from_config(config)),
        }
    }

    pub fn saved_preferences(&self) -> SessionPreferences {
        SessionPreferences {
            dark_mode: self.preferences.dark_mode,
            overview: self.overview.engine.snapshot(),
            school: self.school.engine.snapshot(),
        }
    }

    pub fn apply_preferences(&mut self, update: PreferencesUpdate) {
        if let Some(dark_mode) = update.dark_mode {
            self.preferences.dark_mode = dark_mode;
        }
        if let Some(overview) = update.overview {
            self.overview.engine.restore(overview);
        }
        if let Some(school) = update.school {
            self.school.engine.restore(school);
        }
    }
}

/// Upper bound on the idle ttl (about a century)
const MAX_TTL_MINUTES: u64 = 60 * 24 * 365 * 100;

/// In-memory session registry
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    /// Idle lifetime; `None` never expires
    ttl: Option<Duration>,
    config: Config,
}

impl SessionStore {
    pub fn new(config: &Config) -> Self {
        let ttl = match config.session.ttl_minutes {
            0 => None,
            minutes => Some(Duration::minutes(minutes.min(MAX_TTL_MINUTES) as i64)),
        };
        Self {
            sessions: HashMap::new(),
            ttl,
            config: config.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Register a session for a fresh upstream token; returns its id
    pub fn create(&mut self, token: String) -> String {
        self.create_at(token, Utc::now())
    }

    pub fn create_at(&mut self, token: String, now: DateTime<Utc>) -> String {
        self.purge_expired(now);
        let id = generate_id();
        let session = Session::new(id.clone(), token, &self.config, now);
        self.sessions.insert(id.clone(), session);
        log::info!("Session created ({} active)", self.sessions.len());
        id
    }

    /// Look up a live session and mark it as used
    pub fn get(&mut self, id: &str) -> CoreResult<&mut Session> {
        self.get_at(id, Utc::now())
    }

    pub fn get_at(&mut self, id: &str, now: DateTime<Utc>) -> CoreResult<&mut Session> {
        let expired = match self.sessions.get(id) {
            None => return Err(CoreError::SessionNotFound),
            Some(session) => self.is_expired(session, now),
        };
        if expired {
            self.sessions.remove(id);
            log::info!("Session expired ({} active)", self.sessions.len());
            return Err(CoreError::SessionExpired);
        }

        let session = self.sessions.get_mut(id).ok_or(CoreError::SessionNotFound)?;
        session.last_seen = now;
        Ok(session)
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            log::info!("Session closed ({} active)", self.sessions.len());
        }
        removed
    }

    /// Drop every session idle past the ttl
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now - s.last_seen <= ttl);
        let purged = before - self.sessions.len();
        if purged > 0 {
            log::debug!("Purged {} expired sessions", purged);
        }
        purged
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        self.ttl.is_some_and(|ttl| now - session.last_seen > ttl)
    }
}
