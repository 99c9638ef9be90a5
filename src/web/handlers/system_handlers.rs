// src/web/handlers/system_handlers.rs
use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::storage::ObjectStorage;
use crate::web::types::*;

use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

/// Store an attachment in the recruiter's namespace and return its public URL.
pub async fn upload_file_handler(
    upload: Form<FileUploadForm<'_>>,
    auth: AuthenticatedUser,
    storage: &State<ObjectStorage>,
) -> Result<Json<DataResponse<UploadData>>, Json<StandardErrorResponse>> {
    let recruiter_id = auth.recruiter_id();
    let mut upload = upload.into_inner();

    let file_name = upload
        .file_name
        .clone()
        .or_else(|| {
            upload
                .file
                .raw_name()
                .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        })
        .unwrap_or_else(|| "attachment".to_string());

    let bytes = match super::extraction_handlers::read_upload(&mut upload.file).await {
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

    match storage.upload(recruiter_id, &file_name, &bytes).await {
        Ok(stored) => {
            info!(
                "Stored file {} for recruiter {} at {}",
                file_name, recruiter_id, stored.public_url
            );
            Ok(Json(DataResponse::success(
                "File uploaded".to_string(),
                UploadData {
                    key: stored.key,
                    public_url: stored.public_url,
                },
                None,
            )))
        }
        Err(e) => {
            error!("Failed to store file {}: {}", file_name, e);
            Err(Json(StandardErrorResponse::new(
                "Failed to store the uploaded file".to_string(),
                "STORAGE_ERROR".to_string(),
                vec!["Try again in a few moments".to_string()],
                None,
            )))
        }
    }
}

pub async fn get_current_user_handler(auth: AuthenticatedUser) -> Json<AuthResponse> {
    let user = auth.user();
    let recruiter = auth.recruiter();

    Json(AuthResponse {
        success: true,
        user: Some(UserInfo {
            uid: user.uid.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            recruiter_id: recruiter.id,
        }),
        message: format!("User authenticated as recruiter {}", recruiter.id),
    })
}

pub async fn get_current_user_error_handler() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Authentication required".to_string(),
        "AUTHORIZATION_ERROR".to_string(),
        vec![
            "Login is required".to_string(),
            "Send a Firebase ID token in the Authorization header".to_string(),
        ],
        None,
    ))
}

pub async fn health_handler(auth: OptionalAuth) -> Json<TextResponse> {
    if let Some(user) = auth.user {
        info!(
            "Health check by authenticated user: {} (recruiter {})",
            user.email(),
            user.recruiter_id()
        );
    } else {
        info!("Health check by anonymous user");
    }
    Json(TextResponse::success("OK".to_string(), None))
}

/// JSON tree of the recruiter's stored source documents.
pub async fn get_files_tree_handler(
    auth: AuthenticatedUser,
    storage: &State<ObjectStorage>,
) -> Result<Json<serde_json::Value>, Status> {
    match storage.list_tree(auth.recruiter_id()).await {
        Ok(tree) => Ok(Json(serde_json::json!(tree))),
        Err(e) => {
            error!(
                "Failed to build file tree for recruiter {}: {}",
                auth.recruiter_id(),
                e
            );
            Err(Status::InternalServerError)
        }
    }
}
