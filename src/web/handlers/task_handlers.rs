// src/web/handlers/task_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::{TaskRepository, TaskStatus};
use crate::database::DatabaseConfig;
use crate::utils::parse_timestamp;
use crate::web::handlers::extraction_handlers::database_error;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, warn};

pub async fn list_tasks_handler(
    status: Option<String>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<TaskData>>>, Json<StandardErrorResponse>> {
    let status = match status.as_deref() {
        None => None,
        Some(raw) => match TaskStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return Err(Json(StandardErrorResponse::new(
                    format!("Unknown task status: {raw}"),
                    "INVALID_STATUS".to_string(),
                    vec!["Use one of: open, done".to_string()],
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

    let tasks = TaskRepository::new(pool);
    match tasks.list(auth.recruiter_id(), status).await {
        Ok(list) => Ok(Json(DataResponse::success(
            format!("{} tasks", list.len()),
            list,
            None,
        ))),
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            Err(Json(database_error(None)))
        }
    }
}

pub async fn create_task_handler(
    request: Json<StandardRequest<CreateTaskRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<TaskData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let due_date = match &request.data.due_date {
        None => None,
        Some(raw) => match parse_timestamp(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                return Err(Json(StandardErrorResponse::new(
                    e.to_string(),
                    "INVALID_TIMESTAMP".to_string(),
                    vec!["Use RFC 3339 format, e.g. 2026-09-01T09:00:00Z".to_string()],
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

    let tasks = TaskRepository::new(pool);
    match tasks
        .create(
            auth.recruiter_id(),
            &request.data.title,
            request.data.priority.as_deref(),
            request.data.candidate_id.as_deref(),
            request.data.project_id.as_deref(),
            due_date,
        )
        .await
    {
        Ok(task) => Ok(Json(DataResponse::success(
            "Task created".to_string(),
            task,
            conversation_id,
        ))),
        Err(e) => {
            warn!("Task creation rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["Provide a task title".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn set_task_status_handler(
    request: Json<StandardRequest<TaskStatusRequest>>,
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

    let tasks = TaskRepository::new(pool);
    match tasks
        .set_status(auth.recruiter_id(), &request.data.id, request.data.status)
        .await
    {
        Ok(true) => Ok(Json(ActionResponse::success(
            format!("Task marked {}", request.data.status.as_str()),
            "set_task_status".to_string(),
            conversation_id,
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Task '{}' not found", request.data.id),
            "TASK_NOT_FOUND".to_string(),
            vec!["Check the task id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to update task {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}

pub async fn delete_task_handler(
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

    let tasks = TaskRepository::new(pool);
    match tasks.delete(auth.recruiter_id(), &request.data.id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Task deleted".to_string(),
            "delete_task".to_string(),
            conversation_id,
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Task '{}' not found", request.data.id),
            "TASK_NOT_FOUND".to_string(),
            vec!["Check the task id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to delete task {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}
