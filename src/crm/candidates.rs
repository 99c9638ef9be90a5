// src/crm/candidates.rs
use super::CandidateStatus;
use crate::extraction::{CandidateFields, ExtractionMethod};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::info;

/// Persisted candidate record: the extracted fields plus pipeline metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub recruiter_id: i64,
    #[serde(flatten)]
    pub fields: CandidateFields,
    pub status: CandidateStatus,
    pub project_id: Option<String>,
    pub extraction_method: Option<ExtractionMethod>,
    pub confidence_score: Option<i64>,
    pub raw_content: Option<String>,
    /// Public URL of the uploaded source file in object storage, if any.
    pub source_document: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub status: Option<CandidateStatus>,
    pub project_id: Option<String>,
    pub limit: Option<i64>,
}

pub struct CandidateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CandidateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new candidate. The extracted fields must carry a name.
    pub async fn create(
        &self,
        recruiter_id: i64,
        fields: CandidateFields,
        status: CandidateStatus,
        project_id: Option<String>,
        extraction_method: Option<ExtractionMethod>,
        confidence_score: Option<i64>,
        raw_content: Option<String>,
        source_document: Option<String>,
    ) -> Result<Candidate> {
        let name = fields
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Candidate name is required"))?
            .to_string();

        let now = Utc::now();
        let candidate = Candidate {
            id: uuid::Uuid::new_v4().to_string(),
            recruiter_id,
            fields: CandidateFields {
                name: Some(name),
                ..fields
            },
            status,
            project_id,
            extraction_method,
            confidence_score,
            raw_content,
            source_document,
            created_at: now,
            updated_at: now,
        };

        self.insert(self.pool, &candidate).await?;
        info!(
            "Created candidate {} for recruiter {}",
            candidate.id, recruiter_id
        );
        Ok(candidate)
    }

    async fn insert<'e, E>(&self, executor: E, c: &Candidate) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO candidates (
                id, recruiter_id, name, email, phone, location, linkedin_url,
                current_job_title, current_company, years_in_current_role,
                total_years_experience, industries, seniority_levels_placed,
                market_focus, recruitment_tools, sourcing_methods,
                current_salary, commission_structure, revenue_generated,
                ai_summary, strengths, red_flags, push_factors, pull_factors,
                stay_factors, likelihood_score, business_development_exposure,
                client_facing_strength, career_trajectory, market_reputation,
                languages, cultural_background, missing_critical_info,
                status, project_id, extraction_method, extraction_quality,
                confidence_scores, confidence_score, raw_content,
                source_document, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                    ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&c.id)
        .bind(c.recruiter_id)
        .bind(c.fields.name.as_deref().unwrap_or_default())
        .bind(&c.fields.email)
        .bind(&c.fields.phone)
        .bind(&c.fields.location)
        .bind(&c.fields.linkedin_url)
        .bind(&c.fields.current_job_title)
        .bind(&c.fields.current_company)
        .bind(c.fields.years_in_current_role)
        .bind(c.fields.total_years_experience)
        .bind(list_to_json(&c.fields.industries)?)
        .bind(list_to_json(&c.fields.seniority_levels_placed)?)
        .bind(list_to_json(&c.fields.market_focus)?)
        .bind(list_to_json(&c.fields.recruitment_tools)?)
        .bind(list_to_json(&c.fields.sourcing_methods)?)
        .bind(&c.fields.current_salary)
        .bind(&c.fields.commission_structure)
        .bind(&c.fields.revenue_generated)
        .bind(&c.fields.ai_summary)
        .bind(list_to_json(&c.fields.strengths)?)
        .bind(list_to_json(&c.fields.red_flags)?)
        .bind(list_to_json(&c.fields.push_factors)?)
        .bind(list_to_json(&c.fields.pull_factors)?)
        .bind(list_to_json(&c.fields.stay_factors)?)
        .bind(c.fields.likelihood_score)
        .bind(&c.fields.business_development_exposure)
        .bind(&c.fields.client_facing_strength)
        .bind(&c.fields.career_trajectory)
        .bind(&c.fields.market_reputation)
        .bind(list_to_json(&c.fields.languages)?)
        .bind(&c.fields.cultural_background)
        .bind(list_to_json(&c.fields.missing_critical_info)?)
        .bind(c.status.as_str())
        .bind(&c.project_id)
        .bind(c.extraction_method.map(method_str))
        .bind(quality_str(&c.fields))
        .bind(scores_to_json(&c.fields.confidence_scores)?)
        .bind(c.confidence_score)
        .bind(&c.raw_content)
        .bind(&c.source_document)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(executor)
        .await
        .context("Failed to insert candidate")?;

        Ok(())
    }

    pub async fn get(&self, recruiter_id: i64, id: &str) -> Result<Option<Candidate>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM candidates WHERE recruiter_id = ? AND id = ?
            "#,
        )
        .bind(recruiter_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| candidate_from_row(&r)).transpose()
    }

    pub async fn list(&self, recruiter_id: i64, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let mut sql = String::from("SELECT * FROM candidates WHERE recruiter_id = ?");
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.project_id.is_some() {
            sql.push_str(" AND project_id = ?");
        }
        sql.push_str(" ORDER BY updated_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql).bind(recruiter_id);
        if let Some(status) = filter.status {
            query = query.bind(status.as_str().to_string());
        }
        if let Some(project_id) = &filter.project_id {
            query = query.bind(project_id.clone());
        }
        query = query.bind(filter.limit.unwrap_or(200));

        let rows = query.fetch_all(self.pool).await?;
        rows.iter().map(candidate_from_row).collect()
    }

    /// Full-row update; creation metadata is preserved, updated_at bumped.
    /// Runs inside one transaction so a failed re-insert keeps the old row.
    pub async fn update(&self, c: &Candidate) -> Result<Candidate> {
        let mut updated = c.clone();
        updated.updated_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM candidates WHERE recruiter_id = ? AND id = ?
            "#,
        )
        .bind(updated.recruiter_id)
        .bind(&updated.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Candidate not found: {}", updated.id);
        }

        self.insert(&mut *tx, &updated).await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, recruiter_id: i64, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM candidates WHERE recruiter_id = ? AND id = ?
            "#,
        )
        .bind(recruiter_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted candidate {} for recruiter {}", id, recruiter_id);
        }
        Ok(deleted)
    }

    /// Export the recruiter's candidate book as CSV.
    pub async fn export_csv(&self, recruiter_id: i64) -> Result<String> {
        let candidates = self.list(recruiter_id, &CandidateFilter::default()).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "id",
            "name",
            "email",
            "phone",
            "location",
            "linkedin_url",
            "current_job_title",
            "current_company",
            "industries",
            "status",
            "likelihood_score",
            "confidence_score",
            "created_at",
        ])?;

        for c in &candidates {
            writer.write_record([
                c.id.clone(),
                c.fields.name.clone().unwrap_or_default(),
                c.fields.email.clone().unwrap_or_default(),
                c.fields.phone.clone().unwrap_or_default(),
                c.fields.location.clone().unwrap_or_default(),
                c.fields.linkedin_url.clone().unwrap_or_default(),
                c.fields.current_job_title.clone().unwrap_or_default(),
                c.fields.current_company.clone().unwrap_or_default(),
                c.fields
                    .industries
                    .as_ref()
                    .map(|v| v.join("; "))
                    .unwrap_or_default(),
                c.status.as_str().to_string(),
                c.fields
                    .likelihood_score
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                c.confidence_score.map(|s| s.to_string()).unwrap_or_default(),
                c.created_at.to_rfc3339(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {e}"))?;
        String::from_utf8(bytes).context("CSV export was not valid UTF-8")
    }
}

fn method_str(method: ExtractionMethod) -> &'static str {
    match method {
        ExtractionMethod::Resume => "resume",
        ExtractionMethod::Linkedin => "linkedin",
    }
}

fn parse_method(value: Option<String>) -> Option<ExtractionMethod> {
    match value.as_deref() {
        Some("resume") => Some(ExtractionMethod::Resume),
        Some("linkedin") => Some(ExtractionMethod::Linkedin),
        _ => None,
    }
}

fn quality_str(fields: &CandidateFields) -> Option<&'static str> {
    use crate::extraction::ExtractionQuality;
    fields.extraction_quality.map(|q| match q {
        ExtractionQuality::Excellent => "excellent",
        ExtractionQuality::Good => "good",
        ExtractionQuality::Fair => "fair",
        ExtractionQuality::Poor => "poor",
    })
}

fn parse_quality(value: Option<String>) -> Option<crate::extraction::ExtractionQuality> {
    use crate::extraction::ExtractionQuality;
    match value.as_deref() {
        Some("excellent") => Some(ExtractionQuality::Excellent),
        Some("good") => Some(ExtractionQuality::Good),
        Some("fair") => Some(ExtractionQuality::Fair),
        Some("poor") => Some(ExtractionQuality::Poor),
        _ => None,
    }
}

fn list_to_json(list: &Option<Vec<String>>) -> Result<Option<String>> {
    list.as_ref()
        .map(|v| serde_json::to_string(v).context("Failed to serialize list field"))
        .transpose()
}

fn json_to_list(value: Option<String>) -> Option<Vec<String>> {
    value.and_then(|v| serde_json::from_str(&v).ok())
}

fn scores_to_json(scores: &HashMap<String, f64>) -> Result<Option<String>> {
    if scores.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        serde_json::to_string(scores).context("Failed to serialize confidence scores")?,
    ))
}

fn json_to_scores(value: Option<String>) -> HashMap<String, f64> {
    value
        .and_then(|v| serde_json::from_str(&v).ok())
        .unwrap_or_default()
}

fn candidate_from_row(row: &SqliteRow) -> Result<Candidate> {
    let fields = CandidateFields {
        name: Some(row.try_get::<String, _>("name")?),
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        location: row.try_get("location")?,
        linkedin_url: row.try_get("linkedin_url")?,
        current_job_title: row.try_get("current_job_title")?,
        current_company: row.try_get("current_company")?,
        years_in_current_role: row.try_get("years_in_current_role")?,
        total_years_experience: row.try_get("total_years_experience")?,
        industries: json_to_list(row.try_get("industries")?),
        seniority_levels_placed: json_to_list(row.try_get("seniority_levels_placed")?),
        market_focus: json_to_list(row.try_get("market_focus")?),
        recruitment_tools: json_to_list(row.try_get("recruitment_tools")?),
        sourcing_methods: json_to_list(row.try_get("sourcing_methods")?),
        current_salary: row.try_get("current_salary")?,
        commission_structure: row.try_get("commission_structure")?,
        revenue_generated: row.try_get("revenue_generated")?,
        ai_summary: row.try_get("ai_summary")?,
        strengths: json_to_list(row.try_get("strengths")?),
        red_flags: json_to_list(row.try_get("red_flags")?),
        push_factors: json_to_list(row.try_get("push_factors")?),
        pull_factors: json_to_list(row.try_get("pull_factors")?),
        stay_factors: json_to_list(row.try_get("stay_factors")?),
        likelihood_score: row.try_get("likelihood_score")?,
        business_development_exposure: row.try_get("business_development_exposure")?,
        client_facing_strength: row.try_get("client_facing_strength")?,
        career_trajectory: row.try_get("career_trajectory")?,
        market_reputation: row.try_get("market_reputation")?,
        languages: json_to_list(row.try_get("languages")?),
        cultural_background: row.try_get("cultural_background")?,
        confidence_scores: json_to_scores(row.try_get("confidence_scores")?),
        extraction_quality: parse_quality(row.try_get("extraction_quality")?),
        missing_critical_info: json_to_list(row.try_get("missing_critical_info")?),
    };

    let status_raw: String = row.try_get("status")?;
    let status = CandidateStatus::parse(&status_raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown candidate status: {}", status_raw))?;

    Ok(Candidate {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        fields,
        status,
        project_id: row.try_get("project_id")?,
        extraction_method: parse_method(row.try_get("extraction_method")?),
        confidence_score: row.try_get("confidence_score")?,
        raw_content: row.try_get("raw_content")?,
        source_document: row.try_get("source_document")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;

    async fn test_db() -> DatabaseConfig {
        let path = std::env::temp_dir().join(format!("candi-test-{}.db", uuid::Uuid::new_v4()));
        let mut db = DatabaseConfig::new(path);
        db.init_pool().await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_strategic_fields_survive_round_trip() {
        let db = test_db().await;
        let repo = CandidateRepository::new(db.pool().unwrap());

        let fields = CandidateFields {
            name: Some("Jane Doe".to_string()),
            business_development_exposure: Some("High - 70% BD focused".to_string()),
            client_facing_strength: Some("Strong C-level presence".to_string()),
            career_trajectory: Some("Steady progression to principal".to_string()),
            market_reputation: Some("Well known in Zurich tech market".to_string()),
            missing_critical_info: Some(vec![
                "Current salary".to_string(),
                "Notice period".to_string(),
            ]),
            ..Default::default()
        };

        let created = repo
            .create(
                1,
                fields,
                CandidateStatus::Sourced,
                None,
                Some(ExtractionMethod::Resume),
                Some(82),
                None,
                None,
            )
            .await
            .unwrap();

        let stored = repo.get(1, &created.id).await.unwrap().unwrap();
        assert_eq!(
            stored.fields.business_development_exposure,
            Some("High - 70% BD focused".to_string())
        );
        assert_eq!(
            stored.fields.client_facing_strength,
            Some("Strong C-level presence".to_string())
        );
        assert_eq!(
            stored.fields.career_trajectory,
            Some("Steady progression to principal".to_string())
        );
        assert_eq!(
            stored.fields.market_reputation,
            Some("Well known in Zurich tech market".to_string())
        );
        assert_eq!(
            stored.fields.missing_critical_info,
            Some(vec![
                "Current salary".to_string(),
                "Notice period".to_string()
            ])
        );

        tokio::fs::remove_file(&db.database_path).await.ok();
    }

    #[tokio::test]
    async fn test_failed_update_keeps_existing_row() {
        let db = test_db().await;
        let pool = db.pool().unwrap();
        let repo = CandidateRepository::new(pool);

        let created = repo
            .create(
                1,
                CandidateFields {
                    name: Some("Jane Doe".to_string()),
                    ..Default::default()
                },
                CandidateStatus::Sourced,
                None,
                None,
                None,
                None,
                None,
            )
            .await
            .unwrap();

        // Break the schema so the re-insert inside update fails.
        sqlx::query("ALTER TABLE candidates RENAME COLUMN ai_summary TO ai_summary_legacy")
            .execute(pool)
            .await
            .unwrap();

        let mut edited = created.clone();
        edited.fields.location = Some("Geneva".to_string());
        assert!(repo.update(&edited).await.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates WHERE id = ?")
            .bind(&created.id)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        tokio::fs::remove_file(&db.database_path).await.ok();
    }

    #[test]
    fn test_list_json_round_trip() {
        let list = Some(vec!["Tech".to_string(), "Pharma".to_string()]);
        let json = list_to_json(&list).unwrap();
        assert_eq!(json_to_list(json), list);
        assert_eq!(list_to_json(&None).unwrap(), None);
    }

    #[test]
    fn test_empty_scores_stored_as_null() {
        assert_eq!(scores_to_json(&HashMap::new()).unwrap(), None);
        assert!(json_to_scores(None).is_empty());
    }

    #[test]
    fn test_candidate_json_is_flat() {
        let candidate = Candidate {
            id: "c1".to_string(),
            recruiter_id: 7,
            fields: CandidateFields {
                name: Some("Jane Doe".to_string()),
                ..Default::default()
            },
            status: CandidateStatus::Sourced,
            project_id: None,
            extraction_method: Some(ExtractionMethod::Resume),
            confidence_score: Some(82),
            raw_content: None,
            source_document: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&candidate).unwrap();
        // Extracted fields sit at the top level, like the persisted shape
        // the frontend binds to.
        assert_eq!(value["name"], "Jane Doe");
        assert_eq!(value["status"], "sourced");
        assert_eq!(value["extraction_method"], "resume");
    }
}
