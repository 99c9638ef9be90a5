// src/extraction/mod.rs
//! Candidate extraction pipeline: AI-driven parsing of resumes and LinkedIn
//! profiles into structured candidate fields, plus the deterministic
//! post-processing that cleans the AI output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod error;
pub mod linkedin;
pub mod post_process;
pub mod schema;
pub mod scraper;
pub mod service;

pub use error::ExtractionError;
pub use service::ExtractionService;

/// Structured candidate data as returned by the AI extraction call.
///
/// Every field is optional: the generative service omits anything it cannot
/// find in the source material. Deserializing the raw AI response into this
/// struct is the schema validation step at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFields {
    // Basic information
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,

    // Professional background
    pub current_job_title: Option<String>,
    pub current_company: Option<String>,
    pub years_in_current_role: Option<f64>,
    pub total_years_experience: Option<f64>,

    // Recruiting specialization
    pub industries: Option<Vec<String>>,
    pub seniority_levels_placed: Option<Vec<String>>,
    pub market_focus: Option<Vec<String>>,
    pub recruitment_tools: Option<Vec<String>>,
    pub sourcing_methods: Option<Vec<String>>,

    // Performance and compensation
    pub current_salary: Option<String>,
    pub commission_structure: Option<String>,
    pub revenue_generated: Option<String>,

    // Qualitative analysis
    pub ai_summary: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub red_flags: Option<Vec<String>>,
    pub push_factors: Option<Vec<String>>,
    pub pull_factors: Option<Vec<String>>,
    pub stay_factors: Option<Vec<String>>,
    pub likelihood_score: Option<f64>,

    // Strategic and cultural insights
    pub business_development_exposure: Option<String>,
    pub client_facing_strength: Option<String>,
    pub career_trajectory: Option<String>,
    pub market_reputation: Option<String>,
    pub languages: Option<Vec<String>>,
    pub cultural_background: Option<String>,

    // Extraction metadata
    pub confidence_scores: HashMap<String, f64>,
    pub extraction_quality: Option<ExtractionQuality>,
    pub missing_critical_info: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Resume,
    Linkedin,
}

/// Outcome of one extraction call. Failure is a value carrying a categorized,
/// user-facing message; nothing panics across the extraction boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub data: Option<CandidateFields>,
    pub error: Option<String>,
    pub error_code: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub confidence_score: Option<i64>,
    pub extraction_method: Option<ExtractionMethod>,
    pub raw_content: Option<String>,
}

impl ExtractionResult {
    pub fn success(
        data: CandidateFields,
        method: ExtractionMethod,
        raw_content: String,
        confidence_score: i64,
    ) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            suggestions: None,
            confidence_score: Some(confidence_score),
            extraction_method: Some(method),
            raw_content: Some(raw_content),
        }
    }

    pub fn failure(error: ExtractionError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            error_code: Some(error.code().to_string()),
            suggestions: Some(error.suggestions()),
            confidence_score: None,
            extraction_method: None,
            raw_content: None,
        }
    }
}
