// src/web/handlers/candidate_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::{CandidateFilter, CandidateRepository, CandidateStatus};
use crate::database::DatabaseConfig;
use crate::extraction::post_process::post_process;
use crate::web::handlers::extraction_handlers::database_error;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub async fn list_candidates_handler(
    status: Option<String>,
    project_id: Option<String>,
    limit: Option<i64>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<CandidateData>>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();

    let status = match status.as_deref() {
        None => None,
        Some(raw) => match CandidateStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return Err(Json(StandardErrorResponse::new(
                    format!("Unknown candidate status: {raw}"),
                    "INVALID_STATUS".to_string(),
                    vec!["Use one of: sourced, messaged, unsure, interested, follow-up, interviewing, hired, archived".to_string()],
                    None,
                )));
            }
        },
    };

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let filter = CandidateFilter {
        status,
        project_id,
        limit,
    };

    let candidates = CandidateRepository::new(pool);
    match candidates.list(recruiter_id, &filter).await {
        Ok(list) => Ok(Json(DataResponse::success(
            format!("{} candidates", list.len()),
            list,
            None,
        ))),
        Err(e) => {
            error!("Failed to list candidates: {}", e);
            Err(Json(database_error(None)))
        }
    }
}

pub async fn get_candidate_handler(
    id: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let candidates = CandidateRepository::new(pool);
    match candidates.get(recruiter_id, &id).await {
        Ok(Some(candidate)) => Ok(Json(DataResponse::success(
            "Candidate found".to_string(),
            candidate,
            None,
        ))),
        Ok(None) => Err(Json(StandardErrorResponse::new(
            format!("Candidate '{id}' not found"),
            "CANDIDATE_NOT_FOUND".to_string(),
            vec!["Check the candidate id".to_string()],
            None,
        ))),
        Err(e) => {
            error!("Failed to load candidate {}: {}", id, e);
            Err(Json(database_error(None)))
        }
    }
}

pub async fn update_candidate_handler(
    request: Json<StandardRequest<UpdateCandidateRequest>>,
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

    let candidates = CandidateRepository::new(pool);
    let mut candidate = match candidates.get(recruiter_id, &request.data.id).await {
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

    // Edits go through the same cleanup pass as imports.
    if let Some(fields) = &request.data.fields {
        candidate.fields = post_process(fields);
    }
    if let Some(status) = request.data.status {
        candidate.status = status;
    }
    if let Some(project_id) = &request.data.project_id {
        candidate.project_id = if project_id.is_empty() {
            None
        } else {
            Some(project_id.clone())
        };
    }

    match candidates.update(&candidate).await {
        Ok(candidate) => {
            info!(
                "Updated candidate {} for recruiter {}",
                candidate.id, recruiter_id
            );
            Ok(Json(DataResponse::success(
                "Candidate updated".to_string(),
                candidate,
                conversation_id,
            )))
        }
        Err(e) => {
            warn!("Candidate update rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["The candidate must keep a name".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn delete_candidate_handler(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
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
    match candidates.delete(recruiter_id, &request.data.id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Candidate deleted".to_string(),
            "delete_candidate".to_string(),
            conversation_id,
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Candidate '{}' not found", request.data.id),
            "CANDIDATE_NOT_FOUND".to_string(),
            vec!["Check the candidate id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to delete candidate {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}

pub async fn export_candidates_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let candidates = CandidateRepository::new(pool);
    match candidates.export_csv(recruiter_id).await {
        Ok(csv) => {
            info!("Exported candidate CSV for recruiter {}", recruiter_id);
            Ok(CsvResponse {
                data: csv,
                filename: "candidates.csv".to_string(),
            })
        }
        Err(e) => {
            error!("Failed to export candidates: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to export candidates".to_string(),
                "EXPORT_ERROR".to_string(),
                vec!["Try again in a few moments".to_string()],
                None,
            )))
        }
    }
}
