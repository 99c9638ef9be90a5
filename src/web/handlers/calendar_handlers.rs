// src/web/handlers/calendar_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::CalendarRepository;
use crate::database::DatabaseConfig;
use crate::utils::parse_timestamp;
use crate::web::handlers::extraction_handlers::database_error;
use crate::web::types::*;

use chrono::{DateTime, Utc};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, warn};

fn parse_window(
    from: &str,
    to: &str,
    conversation_id: Option<String>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), Box<StandardErrorResponse>> {
    let invalid = |e: anyhow::Error| {
        Box::new(StandardErrorResponse::new(
            e.to_string(),
            "INVALID_TIMESTAMP".to_string(),
            vec!["Use RFC 3339 format, e.g. 2026-09-01T09:00:00Z".to_string()],
            conversation_id.clone(),
        ))
    };

    let from = parse_timestamp(from).map_err(invalid)?;
    let to = parse_timestamp(to).map_err(invalid)?;

    if to <= from {
        return Err(Box::new(StandardErrorResponse::new(
            "The 'to' timestamp must come after 'from'".to_string(),
            "INVALID_RANGE".to_string(),
            vec!["Swap the range bounds".to_string()],
            conversation_id,
        )));
    }

    Ok((from, to))
}

pub async fn list_events_handler(
    from: String,
    to: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<EventData>>>, Json<StandardErrorResponse>> {
    let (from, to) = parse_window(&from, &to, None).map_err(|e| Json(*e))?;

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let calendar = CalendarRepository::new(pool);
    match calendar.list_range(auth.recruiter_id(), from, to).await {
        Ok(list) => Ok(Json(DataResponse::success(
            format!("{} events", list.len()),
            list,
            None,
        ))),
        Err(e) => {
            error!("Failed to list calendar events: {}", e);
            Err(Json(database_error(None)))
        }
    }
}

pub async fn create_event_handler(
    request: Json<StandardRequest<CreateEventRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<EventData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let (starts_at, ends_at) = parse_window(
        &request.data.starts_at,
        &request.data.ends_at,
        conversation_id.clone(),
    )
    .map_err(|e| Json(*e))?;

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let calendar = CalendarRepository::new(pool);
    match calendar
        .create(
            auth.recruiter_id(),
            &request.data.title,
            request.data.description.as_deref(),
            request.data.location.as_deref(),
            request.data.candidate_id.as_deref(),
            starts_at,
            ends_at,
        )
        .await
    {
        Ok(event) => Ok(Json(DataResponse::success(
            "Event scheduled".to_string(),
            event,
            conversation_id,
        ))),
        Err(e) => {
            warn!("Event creation rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["Provide an event title and a valid time range".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn delete_event_handler(
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

    let calendar = CalendarRepository::new(pool);
    match calendar.delete(auth.recruiter_id(), &request.data.id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Event deleted".to_string(),
            "delete_event".to_string(),
            conversation_id,
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Event '{}' not found", request.data.id),
            "EVENT_NOT_FOUND".to_string(),
            vec!["Check the event id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to delete event {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}
