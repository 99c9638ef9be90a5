// src/crm/calendar.rs
use super::CalendarEvent;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct CalendarRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CalendarRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        recruiter_id: i64,
        title: &str,
        description: Option<&str>,
        location: Option<&str>,
        candidate_id: Option<&str>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<CalendarEvent> {
        let title = title.trim();
        if title.is_empty() {
            anyhow::bail!("Event title is required");
        }
        if ends_at < starts_at {
            anyhow::bail!("Event cannot end before it starts");
        }

        let event = CalendarEvent {
            id: uuid::Uuid::new_v4().to_string(),
            recruiter_id,
            title: title.to_string(),
            description: description.map(String::from),
            location: location.map(String::from),
            candidate_id: candidate_id.map(String::from),
            starts_at,
            ends_at,
        };

        sqlx::query(
            r#"
            INSERT INTO calendar_events (id, recruiter_id, title, description, location, candidate_id, starts_at, ends_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(event.recruiter_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.candidate_id)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .execute(self.pool)
        .await?;

        Ok(event)
    }

    /// Events overlapping the given window, soonest first.
    pub async fn list_range(
        &self,
        recruiter_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM calendar_events
            WHERE recruiter_id = ? AND starts_at < ? AND ends_at > ?
            ORDER BY starts_at ASC
            "#,
        )
        .bind(recruiter_id)
        .bind(to)
        .bind(from)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(event_from_row).collect()
    }

    pub async fn delete(&self, recruiter_id: i64, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE recruiter_id = ? AND id = ?")
            .bind(recruiter_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn event_from_row(row: &SqliteRow) -> Result<CalendarEvent> {
    Ok(CalendarEvent {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        candidate_id: row.try_get("candidate_id")?,
        starts_at: row.try_get("starts_at")?,
        ends_at: row.try_get("ends_at")?,
    })
}
