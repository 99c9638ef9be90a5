// src/web/handlers/project_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::ProjectRepository;
use crate::database::DatabaseConfig;
use crate::web::handlers::extraction_handlers::database_error;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, warn};

pub async fn list_projects_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<ProjectData>>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let projects = ProjectRepository::new(pool);
    match projects.list(auth.recruiter_id()).await {
        Ok(list) => Ok(Json(DataResponse::success(
            format!("{} projects", list.len()),
            list,
            None,
        ))),
        Err(e) => {
            error!("Failed to list projects: {}", e);
            Err(Json(database_error(None)))
        }
    }
}

pub async fn create_project_handler(
    request: Json<StandardRequest<CreateProjectRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<ProjectData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let projects = ProjectRepository::new(pool);
    match projects
        .create(
            auth.recruiter_id(),
            &request.data.name,
            request.data.client_company.as_deref(),
            request.data.role_title.as_deref(),
        )
        .await
    {
        Ok(project) => Ok(Json(DataResponse::success(
            "Project created".to_string(),
            project,
            conversation_id,
        ))),
        Err(e) => {
            warn!("Project creation rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["Provide a project name".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn update_project_handler(
    request: Json<StandardRequest<UpdateProjectRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<ProjectData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let projects = ProjectRepository::new(pool);
    match projects
        .update(
            auth.recruiter_id(),
            &request.data.id,
            request.data.name.as_deref(),
            request.data.client_company.as_deref(),
            request.data.role_title.as_deref(),
            request.data.status,
        )
        .await
    {
        Ok(Some(project)) => Ok(Json(DataResponse::success(
            "Project updated".to_string(),
            project,
            conversation_id,
        ))),
        Ok(None) => Err(Json(StandardErrorResponse::new(
            format!("Project '{}' not found", request.data.id),
            "PROJECT_NOT_FOUND".to_string(),
            vec!["Check the project id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            warn!("Project update rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["The project must keep a name".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn delete_project_handler(
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

    let projects = ProjectRepository::new(pool);
    match projects.delete(auth.recruiter_id(), &request.data.id).await {
        Ok(true) => Ok(Json(
            ActionResponse::success(
                "Project deleted".to_string(),
                "delete_project".to_string(),
                conversation_id,
            )
            .with_next_actions(vec![
                "Candidates assigned to this project were kept and unassigned".to_string()
            ]),
        )),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Project '{}' not found", request.data.id),
            "PROJECT_NOT_FOUND".to_string(),
            vec!["Check the project id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to delete project {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}
