// src/extraction/service.rs
use super::linkedin;
use super::post_process::{overall_confidence, post_process};
use super::schema;
use super::scraper::{ProfileScraper, ScrapedProfile};
use super::{CandidateFields, ExtractionError, ExtractionMethod, ExtractionResult};
use crate::core::AiClient;
use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info, warn};

const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const VALID_CONTENT_TYPES: [&str; 5] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/png",
    "image/jpeg",
    "image/jpg",
];

// Below these sizes the source is treated as unreadable/private rather than
// handed to the generation step.
const MIN_RESUME_TEXT_LEN: usize = 100;
const MIN_PROFILE_TEXT_LEN: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnhancedAnalysis {
    enhanced_summary: Option<String>,
    risk_factors: Option<Vec<String>>,
    value_proposition: Option<Vec<String>>,
    updated_likelihood_score: Option<f64>,
}

/// Orchestrates one extraction: source validation, content retrieval,
/// structured generation, boundary validation, post-processing.
pub struct ExtractionService {
    ai: AiClient,
    scraper: ProfileScraper,
}

impl ExtractionService {
    pub fn new(ai_service_url: String) -> Result<Self> {
        Ok(Self {
            ai: AiClient::new(ai_service_url)?,
            scraper: ProfileScraper::new()?,
        })
    }

    /// Extract candidate fields from an uploaded resume file. Never fails
    /// across this boundary; failures come back as a tagged result.
    pub async fn extract_from_resume(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ExtractionResult {
        match self.resume_pipeline(file_name, content_type, bytes).await {
            Ok(result) => result,
            Err(e) => {
                error!("Resume extraction failed for {}: {}", file_name, e);
                ExtractionResult::failure(e)
            }
        }
    }

    /// Extract candidate fields from a public LinkedIn profile URL.
    pub async fn extract_from_linkedin(&self, url: &str) -> ExtractionResult {
        match self.linkedin_pipeline(url).await {
            Ok(result) => result,
            Err(e) => {
                error!("LinkedIn extraction failed for {}: {}", url, e);
                ExtractionResult::failure(e)
            }
        }
    }

    async fn resume_pipeline(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionResult, ExtractionError> {
        if !VALID_CONTENT_TYPES.contains(&content_type) {
            warn!("Rejected upload with content type: {}", content_type);
            return Err(ExtractionError::UnsupportedFileType);
        }

        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(ExtractionError::FileTooLarge);
        }

        let text = self
            .ai
            .extract_text(file_name, content_type, bytes)
            .await
            .map_err(|e| {
                error!("Text extraction service call failed: {}", e);
                ExtractionError::UpstreamServiceFailure
            })?;

        if text.trim().len() < MIN_RESUME_TEXT_LEN {
            return Err(ExtractionError::UnreadableContent);
        }

        let prompt = resume_prompt(&text, file_name, content_type);
        let fields = self.generate_candidate(&prompt).await?;

        info!("Resume extraction completed for {}", file_name);
        Ok(self.finish(fields, ExtractionMethod::Resume, text))
    }

    async fn linkedin_pipeline(&self, url: &str) -> Result<ExtractionResult, ExtractionError> {
        if !linkedin::is_valid_profile_url(url) {
            return Err(ExtractionError::InvalidSourceUrl);
        }

        let normalized_url = linkedin::normalize_profile_url(url);

        let profile = self.scraper.scrape(&normalized_url).await.map_err(|e| {
            error!("Profile scrape failed for {}: {}", normalized_url, e);
            ExtractionError::InaccessibleSourceContent
        })?;

        if profile.markdown.trim().len() < MIN_PROFILE_TEXT_LEN {
            return Err(ExtractionError::InaccessibleSourceContent);
        }

        let prompt = linkedin_prompt(&profile, &normalized_url);
        let mut fields = self.generate_candidate(&prompt).await?;

        // The source URL is authoritative regardless of what the model found.
        fields.linkedin_url = Some(normalized_url.clone());

        info!("LinkedIn extraction completed for {}", normalized_url);
        Ok(self.finish(fields, ExtractionMethod::Linkedin, profile.markdown))
    }

    async fn generate_candidate(&self, prompt: &str) -> Result<CandidateFields, ExtractionError> {
        let value = self
            .ai
            .generate_object(prompt, &schema::candidate_schema())
            .await
            .map_err(|e| {
                error!("Structured generation call failed: {}", e);
                ExtractionError::UpstreamServiceFailure
            })?;

        // Boundary validation: the loosely-typed AI object must deserialize
        // into the candidate schema before anything downstream touches it.
        serde_json::from_value::<CandidateFields>(value).map_err(|e| {
            error!("AI response did not match candidate schema: {}", e);
            ExtractionError::UpstreamServiceFailure
        })
    }

    fn finish(
        &self,
        fields: CandidateFields,
        method: ExtractionMethod,
        raw_content: String,
    ) -> ExtractionResult {
        let processed = post_process(&fields);
        let confidence = overall_confidence(&processed.confidence_scores);
        ExtractionResult::success(processed, method, raw_content, confidence)
    }

    /// Second-pass strategic analysis. Merges enhanced insights into the
    /// extracted fields; on any failure the original fields come back
    /// unchanged.
    pub async fn enhance_candidate(
        &self,
        fields: CandidateFields,
        raw_content: &str,
    ) -> CandidateFields {
        let prompt = enhancement_prompt(&fields, raw_content);

        let analysis = match self
            .ai
            .generate_object(&prompt, &schema::enhancement_schema())
            .await
            .and_then(|value| Ok(serde_json::from_value::<EnhancedAnalysis>(value)?))
        {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Enhancement pass failed, keeping original fields: {}", e);
                return fields;
            }
        };

        let mut enhanced = fields;
        if analysis.enhanced_summary.is_some() {
            enhanced.ai_summary = analysis.enhanced_summary;
        }
        if let Some(risks) = analysis.risk_factors {
            enhanced
                .push_factors
                .get_or_insert_with(Vec::new)
                .extend(risks);
        }
        if let Some(value_points) = analysis.value_proposition {
            enhanced
                .pull_factors
                .get_or_insert_with(Vec::new)
                .extend(value_points.clone());
            enhanced
                .strengths
                .get_or_insert_with(Vec::new)
                .extend(value_points);
        }
        if analysis.updated_likelihood_score.is_some() {
            enhanced.likelihood_score = analysis.updated_likelihood_score;
        }

        // Re-run cleanup so merged lists stay deduplicated and scores capped.
        post_process(&enhanced)
    }
}

fn resume_prompt(text: &str, file_name: &str, content_type: &str) -> String {
    format!(
        r#"You are an expert recruiter and talent analyst with deep expertise in evaluating recruiting professionals.
Analyze this resume/CV with the precision of a senior recruiting director who needs to make strategic hiring decisions.

CRITICAL FOCUS AREAS:
1. RECRUITING SPECIALIZATION: What markets, industries, and seniority levels do they focus on?
2. PERFORMANCE INDICATORS: Look for metrics, achievements, revenue numbers, placement success rates
3. TOOLS & METHODOLOGY: What recruiting tools, platforms, and approaches do they use?
4. BUSINESS DEVELOPMENT: How client-facing are they? BD-focused or delivery-focused?
5. CAREER TRAJECTORY: What does their progression tell us about ambition and capability?

QUALITY STANDARDS:
- Be thorough but accurate - if information isn't clearly stated, don't fabricate
- For likelihood_score, consider career stage, recent achievements, market conditions, and any satisfaction indicators
- Flag any missing critical information that should be gathered through follow-up

Resume/CV Content:
{text}

File name: {file_name}
File type: {content_type}
"#
    )
}

fn linkedin_prompt(profile: &ScrapedProfile, url: &str) -> String {
    format!(
        r#"You are analyzing a LinkedIn profile of a recruiting professional with the expertise of a senior talent acquisition leader.
Extract comprehensive information with special attention to LinkedIn-specific indicators.

LINKEDIN-SPECIFIC ANALYSIS:
1. HEADLINE & SUMMARY: Often contains key specializations and value propositions
2. EXPERIENCE SECTION: Look for progression, achievements, and specific recruiting metrics
3. SKILLS & ENDORSEMENTS: Indicate areas of expertise and peer recognition
4. RECOMMENDATIONS: May contain performance indicators and client feedback

MOTIVATION ANALYSIS:
- Recent job changes or promotions may indicate satisfaction/dissatisfaction
- Career progression pattern suggests ambition and growth trajectory
- Industry connections and thought leadership indicate market standing

LinkedIn Profile Content:
{markdown}

Profile URL: {url}
Page Title: {title}
Meta Description: {description}
"#,
        markdown = profile.markdown,
        title = profile.title.as_deref().unwrap_or("N/A"),
        description = profile.description.as_deref().unwrap_or("N/A"),
    )
}

fn enhancement_prompt(fields: &CandidateFields, raw_content: &str) -> String {
    let current = serde_json::to_string_pretty(fields).unwrap_or_default();
    let excerpt: String = raw_content.chars().take(3000).collect();

    format!(
        r#"As a senior recruiting director, provide strategic insights about this recruiting professional.
Focus on actionable intelligence that would inform hiring and engagement decisions.

Current Analysis: {current}

Raw Content: {excerpt}...

STRATEGIC ENHANCEMENT FOCUS:
1. COMPETITIVE POSITIONING: How do they stack up in the recruiting market?
2. HIRING POTENTIAL: What would make them an attractive hire?
3. ENGAGEMENT STRATEGY: What would motivate them to consider new opportunities?
4. RISK ASSESSMENT: What are the potential challenges or concerns?
5. VALUE PROPOSITION: What unique value do they bring to a recruiting team?
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_prompt_embeds_source() {
        let prompt = resume_prompt("ten years of recruiting", "cv.pdf", "application/pdf");
        assert!(prompt.contains("ten years of recruiting"));
        assert!(prompt.contains("cv.pdf"));
    }

    #[test]
    fn test_linkedin_prompt_handles_missing_metadata() {
        let profile = ScrapedProfile {
            markdown: "profile body".to_string(),
            title: None,
            description: None,
        };
        let prompt = linkedin_prompt(&profile, "https://www.linkedin.com/in/janedoe");
        assert!(prompt.contains("profile body"));
        assert!(prompt.contains("Page Title: N/A"));
    }

    #[test]
    fn test_content_type_allow_list() {
        assert!(VALID_CONTENT_TYPES.contains(&"application/pdf"));
        assert!(!VALID_CONTENT_TYPES.contains(&"text/html"));
    }
}
