// src/crm/projects.rs
use super::{Project, ProjectStatus};
use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct ProjectRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        recruiter_id: i64,
        name: &str,
        client_company: Option<&str>,
        role_title: Option<&str>,
    ) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Project name is required");
        }

        let now = Utc::now();
        let project = Project {
            id: uuid::Uuid::new_v4().to_string(),
            recruiter_id,
            name: name.to_string(),
            client_company: client_company.map(String::from),
            role_title: role_title.map(String::from),
            status: ProjectStatus::Open,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO projects (id, recruiter_id, name, client_company, role_title, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(project.recruiter_id)
        .bind(&project.name)
        .bind(&project.client_company)
        .bind(&project.role_title)
        .bind(project.status.as_str())
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(self.pool)
        .await?;

        info!("Created project {} for recruiter {}", project.id, recruiter_id);
        Ok(project)
    }

    pub async fn get(&self, recruiter_id: i64, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE recruiter_id = ? AND id = ?")
            .bind(recruiter_id)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| project_from_row(&r)).transpose()
    }

    pub async fn list(&self, recruiter_id: i64) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT * FROM projects WHERE recruiter_id = ? ORDER BY updated_at DESC",
        )
        .bind(recruiter_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(project_from_row).collect()
    }

    pub async fn update(
        &self,
        recruiter_id: i64,
        id: &str,
        name: Option<&str>,
        client_company: Option<&str>,
        role_title: Option<&str>,
        status: Option<ProjectStatus>,
    ) -> Result<Option<Project>> {
        let Some(mut project) = self.get(recruiter_id, id).await? else {
            return Ok(None);
        };

        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Project name is required");
            }
            project.name = name.to_string();
        }
        if let Some(company) = client_company {
            project.client_company = Some(company.to_string());
        }
        if let Some(role) = role_title {
            project.role_title = Some(role.to_string());
        }
        if let Some(status) = status {
            project.status = status;
        }
        project.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, client_company = ?, role_title = ?, status = ?, updated_at = ?
            WHERE recruiter_id = ? AND id = ?
            "#,
        )
        .bind(&project.name)
        .bind(&project.client_company)
        .bind(&project.role_title)
        .bind(project.status.as_str())
        .bind(project.updated_at)
        .bind(recruiter_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(Some(project))
    }

    /// Delete a project and detach any candidates still assigned to it.
    pub async fn delete(&self, recruiter_id: i64, id: &str) -> Result<bool> {
        sqlx::query(
            "UPDATE candidates SET project_id = NULL WHERE recruiter_id = ? AND project_id = ?",
        )
        .bind(recruiter_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        let result = sqlx::query("DELETE FROM projects WHERE recruiter_id = ? AND id = ?")
            .bind(recruiter_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted project {} for recruiter {}", id, recruiter_id);
        }
        Ok(deleted)
    }
}

fn project_from_row(row: &SqliteRow) -> Result<Project> {
    let status_raw: String = row.try_get("status")?;
    let status = ProjectStatus::parse(&status_raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown project status: {}", status_raw))?;

    Ok(Project {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        name: row.try_get("name")?,
        client_company: row.try_get("client_company")?,
        role_title: row.try_get("role_title")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
