// src/crm/notes.rs
use super::Note;
use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct NoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NoteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        recruiter_id: i64,
        candidate_id: &str,
        note_type: Option<&str>,
        body: &str,
    ) -> Result<Note> {
        let body = body.trim();
        if body.is_empty() {
            anyhow::bail!("Note body is required");
        }

        let note = Note {
            id: uuid::Uuid::new_v4().to_string(),
            recruiter_id,
            candidate_id: candidate_id.to_string(),
            note_type: note_type.map(String::from),
            body: body.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO notes (id, recruiter_id, candidate_id, note_type, body, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(note.recruiter_id)
        .bind(&note.candidate_id)
        .bind(&note.note_type)
        .bind(&note.body)
        .bind(note.created_at)
        .execute(self.pool)
        .await?;

        Ok(note)
    }

    /// Notes for one candidate, newest first.
    pub async fn list_for_candidate(
        &self,
        recruiter_id: i64,
        candidate_id: &str,
    ) -> Result<Vec<Note>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM notes
            WHERE recruiter_id = ? AND candidate_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(recruiter_id)
        .bind(candidate_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(note_from_row).collect()
    }

    pub async fn delete(&self, recruiter_id: i64, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE recruiter_id = ? AND id = ?")
            .bind(recruiter_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn note_from_row(row: &SqliteRow) -> Result<Note> {
    Ok(Note {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        candidate_id: row.try_get("candidate_id")?,
        note_type: row.try_get("note_type")?,
        body: row.try_get("body")?,
        created_at: row.try_get("created_at")?,
    })
}
