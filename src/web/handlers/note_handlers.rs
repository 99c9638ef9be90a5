// src/web/handlers/note_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::crm::NoteRepository;
use crate::database::DatabaseConfig;
use crate::web::handlers::extraction_handlers::database_error;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, warn};

pub async fn list_notes_handler(
    candidate_id: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<NoteData>>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(None)));
        }
    };

    let notes = NoteRepository::new(pool);
    match notes
        .list_for_candidate(auth.recruiter_id(), &candidate_id)
        .await
    {
        Ok(list) => Ok(Json(DataResponse::success(
            format!("{} notes", list.len()),
            list,
            None,
        ))),
        Err(e) => {
            error!("Failed to list notes for {}: {}", candidate_id, e);
            Err(Json(database_error(None)))
        }
    }
}

pub async fn create_note_handler(
    request: Json<StandardRequest<CreateNoteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<NoteData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Json(database_error(conversation_id)));
        }
    };

    let notes = NoteRepository::new(pool);
    match notes
        .create(
            auth.recruiter_id(),
            &request.data.candidate_id,
            request.data.note_type.as_deref(),
            &request.data.body,
        )
        .await
    {
        Ok(note) => Ok(Json(DataResponse::success(
            "Note added".to_string(),
            note,
            conversation_id,
        ))),
        Err(e) => {
            warn!("Note creation rejected: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "VALIDATION_ERROR".to_string(),
                vec!["Provide a note body".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn delete_note_handler(
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

    let notes = NoteRepository::new(pool);
    match notes.delete(auth.recruiter_id(), &request.data.id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Note deleted".to_string(),
            "delete_note".to_string(),
            conversation_id,
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            format!("Note '{}' not found", request.data.id),
            "NOTE_NOT_FOUND".to_string(),
            vec!["Check the note id".to_string()],
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to delete note {}: {}", request.data.id, e);
            Err(Json(database_error(conversation_id)))
        }
    }
}
