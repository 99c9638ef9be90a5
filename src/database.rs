// src/database.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

/// Authenticated principal of the CRM. Every candidate, project, task, note,
/// event, and KPI row is scoped to one recruiter.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recruiter {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Database pool not initialized. Call init_pool() first."))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recruiters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_recruiters_email
            ON recruiters(email);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS candidates (
                id TEXT PRIMARY KEY,
                recruiter_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                location TEXT,
                linkedin_url TEXT,
                current_job_title TEXT,
                current_company TEXT,
                years_in_current_role REAL,
                total_years_experience REAL,
                industries TEXT,
                seniority_levels_placed TEXT,
                market_focus TEXT,
                recruitment_tools TEXT,
                sourcing_methods TEXT,
                current_salary TEXT,
                commission_structure TEXT,
                revenue_generated TEXT,
                ai_summary TEXT,
                strengths TEXT,
                red_flags TEXT,
                push_factors TEXT,
                pull_factors TEXT,
                stay_factors TEXT,
                likelihood_score REAL,
                business_development_exposure TEXT,
                client_facing_strength TEXT,
                career_trajectory TEXT,
                market_reputation TEXT,
                languages TEXT,
                cultural_background TEXT,
                missing_critical_info TEXT,
                status TEXT NOT NULL DEFAULT 'sourced',
                project_id TEXT,
                extraction_method TEXT,
                extraction_quality TEXT,
                confidence_scores TEXT,
                confidence_score INTEGER,
                raw_content TEXT,
                source_document TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_candidates_recruiter
            ON candidates(recruiter_id, status);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                recruiter_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                client_company TEXT,
                role_title TEXT,
                status TEXT NOT NULL DEFAULT 'open',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                recruiter_id INTEGER NOT NULL,
                candidate_id TEXT,
                project_id TEXT,
                title TEXT NOT NULL,
                priority TEXT NOT NULL DEFAULT 'normal',
                status TEXT NOT NULL DEFAULT 'open',
                due_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                recruiter_id INTEGER NOT NULL,
                candidate_id TEXT NOT NULL,
                note_type TEXT,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS calendar_events (
                id TEXT PRIMARY KEY,
                recruiter_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                location TEXT,
                candidate_id TEXT,
                starts_at TEXT NOT NULL,
                ends_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kpi_events (
                id TEXT PRIMARY KEY,
                recruiter_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                candidate_id TEXT,
                project_id TEXT,
                notes TEXT,
                occurred_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

pub struct RecruiterRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RecruiterRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find recruiter by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Recruiter>> {
        let recruiter = sqlx::query_as::<_, Recruiter>(
            r#"
            SELECT id, email, display_name, created_at, updated_at, is_active
            FROM recruiters
            WHERE email = ? AND is_active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(recruiter)
    }

    /// Create a new recruiter
    pub async fn create(&self, email: &str, display_name: Option<&str>) -> Result<Recruiter> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO recruiters (email, display_name, created_at, updated_at, is_active)
            VALUES (?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        let recruiter = Recruiter {
            id: result.last_insert_rowid(),
            email: email.to_string(),
            display_name: display_name.map(String::from),
            created_at: now,
            updated_at: now,
            is_active: true,
        };

        info!("Created recruiter account for email: {}", email);
        Ok(recruiter)
    }

    /// Existing active recruiter, or a freshly provisioned one. Called by the
    /// auth guard on first login.
    pub async fn get_or_create(&self, email: &str, display_name: Option<&str>) -> Result<Recruiter> {
        if let Some(recruiter) = self.find_by_email(email).await? {
            return Ok(recruiter);
        }
        self.create(email, display_name).await
    }

    /// List all active recruiters
    pub async fn list_active(&self) -> Result<Vec<Recruiter>> {
        let recruiters = sqlx::query_as::<_, Recruiter>(
            r#"
            SELECT id, email, display_name, created_at, updated_at, is_active
            FROM recruiters
            WHERE is_active = TRUE
            ORDER BY email ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(recruiters)
    }

    /// Deactivate a recruiter
    pub async fn deactivate(&self, email: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recruiters
            SET is_active = FALSE, updated_at = ?
            WHERE email = ?
            "#,
        )
        .bind(Utc::now())
        .bind(email)
        .execute(self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Deactivated recruiter for email: {}", email);
        }

        Ok(updated)
    }
}
