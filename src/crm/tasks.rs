// src/crm/tasks.rs
use super::{Task, TaskStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        recruiter_id: i64,
        title: &str,
        priority: Option<&str>,
        candidate_id: Option<&str>,
        project_id: Option<&str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            anyhow::bail!("Task title is required");
        }

        let now = Utc::now();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            recruiter_id,
            candidate_id: candidate_id.map(String::from),
            project_id: project_id.map(String::from),
            title: title.to_string(),
            priority: priority.unwrap_or("normal").to_string(),
            status: TaskStatus::Open,
            due_date,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO tasks (id, recruiter_id, candidate_id, project_id, title, priority, status, due_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(task.recruiter_id)
        .bind(&task.candidate_id)
        .bind(&task.project_id)
        .bind(&task.title)
        .bind(&task.priority)
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(self.pool)
        .await?;

        info!("Created task {} for recruiter {}", task.id, recruiter_id);
        Ok(task)
    }

    pub async fn list(&self, recruiter_id: i64, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let mut sql = String::from("SELECT * FROM tasks WHERE recruiter_id = ?");
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        // Open tasks with the nearest due date first.
        sql.push_str(" ORDER BY due_date IS NULL, due_date ASC, created_at DESC");

        let mut query = sqlx::query(&sql).bind(recruiter_id);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(self.pool).await?;
        rows.iter().map(task_from_row).collect()
    }

    pub async fn set_status(
        &self,
        recruiter_id: i64,
        id: &str,
        status: TaskStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET status = ?, updated_at = ? WHERE recruiter_id = ? AND id = ?",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(recruiter_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, recruiter_id: i64, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE recruiter_id = ? AND id = ?")
            .bind(recruiter_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn task_from_row(row: &SqliteRow) -> Result<Task> {
    let status_raw: String = row.try_get("status")?;
    let status = TaskStatus::parse(&status_raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown task status: {}", status_raw))?;

    Ok(Task {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        candidate_id: row.try_get("candidate_id")?,
        project_id: row.try_get("project_id")?,
        title: row.try_get("title")?,
        priority: row.try_get("priority")?,
        status,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
