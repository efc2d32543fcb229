use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    helpers::{parse_datetime, to_i64, to_u32, to_u64},
    Database,
};
use crate::models::{StudySession, TopicTotals};

fn row_to_session(row: &Row) -> Result<StudySession> {
    let started_at: String = row.get("started_at")?;
    let ended_at: String = row.get("ended_at")?;
    let created_at: String = row.get("created_at")?;
    let distraction_count: i64 = row.get("distraction_count")?;

    Ok(StudySession {
        id: row.get("id")?,
        topic_id: row.get("topic_id")?,
        started_at: parse_datetime(&started_at, "started_at")?,
        ended_at: parse_datetime(&ended_at, "ended_at")?,
        distraction_count: to_u32(distraction_count, "distraction_count")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_study_session(&self, session: &StudySession) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO study_sessions (id, topic_id, started_at, ended_at, duration_secs, distraction_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.topic_id,
                    record.started_at.to_rfc3339(),
                    record.ended_at.to_rfc3339(),
                    to_i64(record.duration_secs())?,
                    record.distraction_count,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn list_study_sessions(&self, limit: usize, offset: usize) -> Result<Vec<StudySession>> {
        let limit = limit as i64;
        let offset = offset as i64;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, topic_id, started_at, ended_at, distraction_count, created_at
                 FROM study_sessions
                 ORDER BY started_at DESC
                 LIMIT ?1 OFFSET ?2",
            )?;

            let mut rows = stmt.query(params![limit, offset])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    pub async fn sessions_for_topic(&self, topic_id: &str) -> Result<Vec<StudySession>> {
        let topic_id = topic_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, topic_id, started_at, ended_at, distraction_count, created_at
                 FROM study_sessions
                 WHERE topic_id = ?1
                 ORDER BY started_at DESC",
            )?;

            let mut rows = stmt.query(params![topic_id])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Per-topic rollup for the activity dashboard: session count, focused
    /// seconds, and total distractions, most-studied topic first.
    pub async fn totals_by_topic(&self) -> Result<Vec<TopicTotals>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT topic_id,
                        COUNT(*) AS session_count,
                        SUM(duration_secs) AS focused_secs,
                        SUM(distraction_count) AS distraction_count
                 FROM study_sessions
                 GROUP BY topic_id
                 ORDER BY focused_secs DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut totals = Vec::new();
            while let Some(row) = rows.next()? {
                totals.push(TopicTotals {
                    topic_id: row.get("topic_id")?,
                    session_count: to_u64(row.get("session_count")?, "session_count")?,
                    focused_secs: to_u64(row.get("focused_secs")?, "focused_secs")?,
                    distraction_count: to_u64(
                        row.get("distraction_count")?,
                        "distraction_count",
                    )?,
                });
            }

            Ok(totals)
        })
        .await
    }
}
