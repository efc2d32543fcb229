use serde::{Deserialize, Serialize};

/// Aggregated study activity for one topic, shown on the profile dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicTotals {
    pub topic_id: String,
    pub session_count: u64,
    pub focused_secs: u64,
    pub distraction_count: u64,
}
