// src/web/handlers/extraction_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::{CandidateRepository, CandidateStatus};
use crate::database::DatabaseConfig;
use crate::extraction::post_process::{overall_confidence, post_process};
use crate::extraction::ExtractionService;
use crate::storage::ObjectStorage;
use crate::web::types::*;

use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub async fn import_resume_handler(
    upload: Form<ResumeUploadForm<'_>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
    storage: &State<ObjectStorage>,
    extraction: &State<ExtractionService>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();
    let mut upload = upload.into_inner();

    let content_type = upload
        .file
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_default();

    let file_name = upload
        .file_name
        .clone()
        .or_else(|| {
            upload
                .file
                .raw_name()
                .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        })
        .unwrap_or_else(|| "resume".to_string());

    let bytes = match read_upload(&mut upload.file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read uploaded file {}: {}", file_name, e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to read uploaded file".to_string(),
                "UPLOAD_READ_ERROR".to_string(),
                vec!["Try uploading the file again".to_string()],
                None,
            )));
        }
    };

    // Keep the original document; extraction proceeds even if storage fails.
    let source_document = match storage.upload(recruiter_id, &file_name, &bytes).await {
        Ok(stored) => Some(stored.public_url),
        Err(e) => {
            warn!("Failed to store source document {}: {}", file_name, e);
            None
        }
    };

    let result = extraction
        .extract_from_resume(&file_name, &content_type, bytes)
        .await;

    if !result.success {
        return Err(Json(StandardErrorResponse::from_failed_extraction(
            &result, None,
        )));
    }

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let candidates = CandidateRepository::new(pool);
    match candidates
        .create(
            recruiter_id,
            result.data.unwrap_or_default(),
            CandidateStatus::Sourced,
            upload.project_id.clone(),
            result.extraction_method,
            result.confidence_score,
            result.raw_content,
            source_document,
        )
        .await
    {
        Ok(candidate) => {
            info!(
                "Imported candidate {} from resume {} for recruiter {}",
                candidate.id, file_name, recruiter_id
            );
            Ok(Json(DataResponse::success(
                "Candidate imported from resume".to_string(),
                candidate,
                None,
            )))
        }
        Err(e) => {
            error!("Failed to save imported candidate: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Extraction succeeded but the candidate could not be saved".to_string(),
                "CANDIDATE_SAVE_ERROR".to_string(),
                vec!["Try the import again".to_string()],
                None,
            )))
        }
    }
}

pub async fn import_linkedin_handler(
    request: Json<StandardRequest<LinkedinImportRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
    extraction: &State<ExtractionService>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();
    let conversation_id = request.conversation_id();

    let result = extraction.extract_from_linkedin(&request.data.url).await;

    if !result.success {
        return Err(Json(StandardErrorResponse::from_failed_extraction(
            &result,
            conversation_id,
        )));
    }

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let candidates = CandidateRepository::new(pool);
    match candidates
        .create(
            recruiter_id,
            result.data.unwrap_or_default(),
            CandidateStatus::Sourced,
            request.data.project_id.clone(),
            result.extraction_method,
            result.confidence_score,
            result.raw_content,
            None,
        )
        .await
    {
        Ok(candidate) => {
            info!(
                "Imported candidate {} from LinkedIn for recruiter {}",
                candidate.id, recruiter_id
            );
            Ok(Json(DataResponse::success(
                "Candidate imported from LinkedIn profile".to_string(),
                candidate,
                conversation_id,
            )))
        }
        Err(e) => {
            error!("Failed to save imported candidate: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Extraction succeeded but the candidate could not be saved".to_string(),
                "CANDIDATE_SAVE_ERROR".to_string(),
                vec!["Try the import again".to_string()],
                conversation_id,
            )))
        }
    }
}

/// Second-pass AI analysis over a previously imported candidate.
pub async fn enhance_candidate_handler(
    request: Json<StandardRequest<EnhanceCandidateRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
    extraction: &State<ExtractionService>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();
    let conversation_id = request.conversation_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let candidates = CandidateRepository::new(pool);
    let candidate = match candidates.get(recruiter_id, &request.data.id).await {
        Ok(Some(candidate)) => candidate,
        Ok(None) => {
            return Err(Json(StandardErrorResponse::new(
                format!("Candidate '{}' not found", request.data.id),
                "CANDIDATE_NOT_FOUND".to_string(),
                vec!["Check the candidate id".to_string()],
                conversation_id,
            )));
        }
        Err(e) => {
            error!("Failed to load candidate {}: {}", request.data.id, e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let raw_content = candidate.raw_content.clone().unwrap_or_default();
    if raw_content.is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "This candidate has no stored source content to analyze".to_string(),
            "NO_SOURCE_CONTENT".to_string(),
            vec!["Re-import the candidate from a resume or profile".to_string()],
            conversation_id,
        )));
    }

    let enhanced = extraction
        .enhance_candidate(candidate.fields.clone(), &raw_content)
        .await;

    let mut updated = candidate;
    updated.confidence_score = Some(overall_confidence(&enhanced.confidence_scores));
    updated.fields = enhanced;

    match candidates.update(&updated).await {
        Ok(candidate) => {
            info!(
                "Enhanced candidate {} for recruiter {}",
                candidate.id, recruiter_id
            );
            Ok(Json(DataResponse::success(
                "Candidate analysis enhanced".to_string(),
                candidate,
                conversation_id,
            )))
        }
        Err(e) => {
            error!("Failed to save enhanced candidate: {}", e);
            Err(Json(database_error(conversation_id)))
        }
    }
}

/// Manual candidate entry. Runs the same cleanup pass as AI imports so the
/// stored record obeys the same invariants.
pub async fn create_candidate_handler(
    request: Json<StandardRequest<CreateCandidateRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();
    let conversation_id = request.conversation_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let fields = post_process(&request.data.fields);
    let status = request.data.status.unwrap_or(CandidateStatus::Sourced);

    let candidates = CandidateRepository::new(pool);
    match candidates
        .create(
            recruiter_id,
            fields,
            status,
            request.data.project_id.clone(),
            None,
            None,
            None,
            None,
        )
        .await
    {
        Ok(candidate) => Ok(Json(DataResponse::success(
            "Candidate created".to_string(),
            candidate,
            conversation_id,
        ))),
        Err(e) => {
            warn!("Candidate creation rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["Provide at least the candidate name".to_string()],
                conversation_id,
            )))
        }
    }
}

pub(crate) async fn read_upload(file: &mut rocket::fs::TempFile<'_>) -> anyhow::Result<Vec<u8>> {
    let temp_path = std::env::temp_dir().join(format!("candi-upload-{}", uuid::Uuid::new_v4()));
    file.copy_to(&temp_path).await?;
    let bytes = tokio::fs::read(&temp_path).await?;
    tokio::fs::remove_file(&temp_path).await.ok();
    Ok(bytes)
}

pub(crate) fn database_error(conversation_id: Option<String>) -> StandardErrorResponse {
    StandardErrorResponse::new(
        "Database error occurred".to_string(),
        "DATABASE_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
        conversation_id,
    )
}
