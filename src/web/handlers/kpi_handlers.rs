// src/web/handlers/kpi_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::KpiRepository;
use crate::database::DatabaseConfig;
use crate::utils::parse_timestamp;
use crate::web::handlers::extraction_handlers::database_error;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, warn};

/// Activity report: raw events plus per-kind counts for one window.
pub async fn kpi_report_handler(
    from: String,
    to: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<KpiReport>>, Json<StandardErrorResponse>> {
    let invalid = |e: anyhow::Error| {
        Json(StandardErrorResponse::new(
            e.to_string(),
            "INVALID_TIMESTAMP".to_string(),
            vec!["Use RFC 3339 format, e.g. 2026-08-01T00:00:00Z".to_string()],
            None,
        ))
    };
    let from = parse_timestamp(&from).map_err(invalid)?;
    let to = parse_timestamp(&to).map_err(invalid)?;

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let kpi = KpiRepository::new(pool);
    let recruiter_id = auth.recruiter_id();

    let events = match kpi.list_range(recruiter_id, from, to).await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to list KPI events: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let summary = match kpi.summary(recruiter_id, from, to).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Failed to summarize KPI events: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    Ok(Json(DataResponse::success(
        format!("{} activity events", events.len()),
        KpiReport { events, summary },
        None,
    )))
}

pub async fn record_kpi_handler(
    request: Json<StandardRequest<RecordKpiRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<crate::crm::KpiEvent>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let occurred_at = match &request.data.occurred_at {
        None => None,
        Some(raw) => match parse_timestamp(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                return Err(Json(StandardErrorResponse::new(
                    e.to_string(),
                    "INVALID_TIMESTAMP".to_string(),
                    vec!["Use RFC 3339 format or omit to record now".to_string()],
                    conversation_id,
                )));
            }
        },
    };

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let kpi = KpiRepository::new(pool);
    match kpi
        .record(
            auth.recruiter_id(),
            &request.data.kind,
            request.data.candidate_id.as_deref(),
            request.data.project_id.as_deref(),
            request.data.notes.as_deref(),
            occurred_at,
        )
        .await
    {
        Ok(event) => Ok(Json(DataResponse::success(
            "Activity recorded".to_string(),
            event,
            conversation_id,
        ))),
        Err(e) => {
            warn!("KPI record rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["Provide an activity kind, e.g. call, meeting, placement".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn delete_kpi_handler(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let kpi = KpiRepository::new(pool);
    match kpi.delete(auth.recruiter_id(), &request.data.id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Activity event deleted".to_string(),
            "delete_kpi_event".to_string(),
            conversation_id,
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Activity event '{}' not found", request.data.id),
            "KPI_EVENT_NOT_FOUND".to_string(),
            vec!["Check the event id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to delete KPI event {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}
