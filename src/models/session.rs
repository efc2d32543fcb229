use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted summary of one completed focus phase. Never mutated after
/// creation; break phases are never recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub topic_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub distraction_count: u32,
    pub created_at: DateTime<Utc>,
}

impl StudySession {
    pub fn new(
        topic_id: String,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        distraction_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic_id,
            started_at,
            ended_at,
            distraction_count,
            created_at: ended_at,
        }
    }

    /// Focused wall-clock seconds, clamped at zero for degenerate clocks.
    pub fn duration_secs(&self) -> u64 {
        (self.ended_at - self.started_at).num_seconds().max(0) as u64
    }
}
