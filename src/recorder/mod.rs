use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, error};
use reqwest::Client;

use crate::db::Database;
use crate::models::StudySession;

/// Where completed focus phases go. Submission is fire-and-forget: the
/// timer never waits on the write and never sees its error. Each sink
/// spawns its own task and observes the result only to log it.
pub trait SessionSink: Send + Sync {
    fn submit(&self, session: StudySession);
}

/// Persists sessions to the local study-history database.
pub struct SqliteSink {
    db: Database,
}

impl SqliteSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl SessionSink for SqliteSink {
    fn submit(&self, session: StudySession) {
        let db = self.db.clone();
        tokio::spawn(async move {
            match db.insert_study_session(&session).await {
                Ok(()) => debug!(
                    "recorded study session {} ({}s, {} distractions)",
                    session.id,
                    session.duration_secs(),
                    session.distraction_count
                ),
                Err(err) => error!("failed to record study session {}: {err:#}", session.id),
            }
        });
    }
}

/// POSTs sessions to the Study Buddy API. Network failures are logged and
/// swallowed; there is no retry.
pub struct HttpSink {
    client: Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("failed to build HTTP client for session logging")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl SessionSink for HttpSink {
    fn submit(&self, session: StudySession) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            let result = client.post(&endpoint).json(&session).send().await;
            match result {
                Ok(response) if response.status().is_success() => {
                    debug!("study session {} logged to {endpoint}", session.id);
                }
                Ok(response) => {
                    error!(
                        "session logging endpoint returned {} for session {}",
                        response.status(),
                        session.id
                    );
                }
                Err(err) => {
                    error!("failed to log study session {}: {err}", session.id);
                }
            }
        });
    }
}

/// Discards sessions. For hosts that subscribe to `SessionRecorded`
/// events and do their own persistence.
pub struct NullSink;

impl SessionSink for NullSink {
    fn submit(&self, _session: StudySession) {}
}
