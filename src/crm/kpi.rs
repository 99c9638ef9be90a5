// src/crm/kpi.rs
use super::KpiEvent;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Aggregated activity counts over a reporting window.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub kind: String,
    pub count: i64,
}

pub struct KpiRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> KpiRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        recruiter_id: i64,
        kind: &str,
        candidate_id: Option<&str>,
        project_id: Option<&str>,
        notes: Option<&str>,
        occurred_at: Option<DateTime<Utc>>,
    ) -> Result<KpiEvent> {
        let kind = kind.trim();
        if kind.is_empty() {
            anyhow::bail!("KPI event kind is required");
        }

        let event = KpiEvent {
            id: uuid::Uuid::new_v4().to_string(),
            recruiter_id,
            kind: kind.to_string(),
            candidate_id: candidate_id.map(String::from),
            project_id: project_id.map(String::from),
            notes: notes.map(String::from),
            occurred_at: occurred_at.unwrap_or_else(Utc::now),
        };

        sqlx::query(
            r#"
            INSERT INTO kpi_events (id, recruiter_id, kind, candidate_id, project_id, notes, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(event.recruiter_id)
        .bind(&event.kind)
        .bind(&event.candidate_id)
        .bind(&event.project_id)
        .bind(&event.notes)
        .bind(event.occurred_at)
        .execute(self.pool)
        .await?;

        Ok(event)
    }

    pub async fn list_range(
        &self,
        recruiter_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<KpiEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM kpi_events
            WHERE recruiter_id = ? AND occurred_at >= ? AND occurred_at < ?
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(recruiter_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(event_from_row).collect()
    }

    /// Per-kind counts for the dashboard tiles.
    pub async fn summary(
        &self,
        recruiter_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<KpiSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT kind, COUNT(*) AS count
            FROM kpi_events
            WHERE recruiter_id = ? AND occurred_at >= ? AND occurred_at < ?
            GROUP BY kind
            ORDER BY count DESC
            "#,
        )
        .bind(recruiter_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(KpiSummary {
                    kind: row.try_get("kind")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    pub async fn delete(&self, recruiter_id: i64, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kpi_events WHERE recruiter_id = ? AND id = ?")
            .bind(recruiter_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn event_from_row(row: &SqliteRow) -> Result<KpiEvent> {
    Ok(KpiEvent {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        kind: row.try_get("kind")?,
        candidate_id: row.try_get("candidate_id")?,
        project_id: row.try_get("project_id")?,
        notes: row.try_get("notes")?,
        occurred_at: row.try_get("occurred_at")?,
    })
}
