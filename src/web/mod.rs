// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::auth::{AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::database::DatabaseConfig;
use crate::environment::EnvironmentConfig;
use crate::extraction::ExtractionService;
use crate::storage::ObjectStorage;
use anyhow::Result;
use rocket::form::Form;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PATCH, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Extraction and candidate routes

#[post("/candidates/import-resume", data = "<upload>")]
pub async fn import_resume(
    upload: Form<ResumeUploadForm<'_>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
    storage: &State<ObjectStorage>,
    extraction: &State<ExtractionService>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    handlers::import_resume_handler(upload, auth, db_config, storage, extraction).await
}

#[post("/candidates/import-linkedin", data = "<request>")]
pub async fn import_linkedin(
    request: Json<StandardRequest<LinkedinImportRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
    extraction: &State<ExtractionService>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    handlers::import_linkedin_handler(request, auth, db_config, extraction).await
}

#[post("/candidates/enhance", data = "<request>")]
pub async fn enhance_candidate(
    request: Json<StandardRequest<EnhanceCandidateRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
    extraction: &State<ExtractionService>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    handlers::enhance_candidate_handler(request, auth, db_config, extraction).await
}

#[post("/candidates/create", data = "<request>")]
pub async fn create_candidate(
    request: Json<StandardRequest<CreateCandidateRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    handlers::create_candidate_handler(request, auth, db_config).await
}

#[get("/candidates?<status>&<project_id>&<limit>")]
pub async fn list_candidates(
    status: Option<String>,
    project_id: Option<String>,
    limit: Option<i64>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<CandidateData>>>, Json<StandardErrorResponse>> {
    handlers::list_candidates_handler(status, project_id, limit, auth, db_config).await
}

#[get("/candidates/export")]
pub async fn export_candidates(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    handlers::export_candidates_handler(auth, db_config).await
}

#[get("/candidates/<id>")]
pub async fn get_candidate(
    id: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    handlers::get_candidate_handler(id, auth, db_config).await
}

#[post("/candidates/update", data = "<request>")]
pub async fn update_candidate(
    request: Json<StandardRequest<UpdateCandidateRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CandidateData>>, Json<StandardErrorResponse>> {
    handlers::update_candidate_handler(request, auth, db_config).await
}

#[post("/candidates/delete", data = "<request>")]
pub async fn delete_candidate(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_candidate_handler(request, auth, db_config).await
}

// Project routes

#[get("/projects")]
pub async fn list_projects(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<ProjectData>>>, Json<StandardErrorResponse>> {
    handlers::list_projects_handler(auth, db_config).await
}

#[post("/projects/create", data = "<request>")]
pub async fn create_project(
    request: Json<StandardRequest<CreateProjectRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<ProjectData>>, Json<StandardErrorResponse>> {
    handlers::create_project_handler(request, auth, db_config).await
}

#[post("/projects/update", data = "<request>")]
pub async fn update_project(
    request: Json<StandardRequest<UpdateProjectRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<ProjectData>>, Json<StandardErrorResponse>> {
    handlers::update_project_handler(request, auth, db_config).await
}

#[post("/projects/delete", data = "<request>")]
pub async fn delete_project(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_project_handler(request, auth, db_config).await
}

// Task routes

#[get("/tasks?<status>")]
pub async fn list_tasks(
    status: Option<String>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<TaskData>>>, Json<StandardErrorResponse>> {
    handlers::list_tasks_handler(status, auth, db_config).await
}

#[post("/tasks/create", data = "<request>")]
pub async fn create_task(
    request: Json<StandardRequest<CreateTaskRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<TaskData>>, Json<StandardErrorResponse>> {
    handlers::create_task_handler(request, auth, db_config).await
}

#[post("/tasks/status", data = "<request>")]
pub async fn set_task_status(
    request: Json<StandardRequest<TaskStatusRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::set_task_status_handler(request, auth, db_config).await
}

#[post("/tasks/delete", data = "<request>")]
pub async fn delete_task(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_task_handler(request, auth, db_config).await
}

// Note routes

#[get("/notes?<candidate_id>")]
pub async fn list_notes(
    candidate_id: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<NoteData>>>, Json<StandardErrorResponse>> {
    handlers::list_notes_handler(candidate_id, auth, db_config).await
}

#[post("/notes/create", data = "<request>")]
pub async fn create_note(
    request: Json<StandardRequest<CreateNoteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<NoteData>>, Json<StandardErrorResponse>> {
    handlers::create_note_handler(request, auth, db_config).await
}

#[post("/notes/delete", data = "<request>")]
pub async fn delete_note(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_note_handler(request, auth, db_config).await
}

// Calendar routes

#[get("/calendar?<from>&<to>")]
pub async fn list_events(
    from: String,
    to: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<EventData>>>, Json<StandardErrorResponse>> {
    handlers::list_events_handler(from, to, auth, db_config).await
}

#[post("/calendar/create", data = "<request>")]
pub async fn create_event(
    request: Json<StandardRequest<CreateEventRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<EventData>>, Json<StandardErrorResponse>> {
    handlers::create_event_handler(request, auth, db_config).await
}

#[post("/calendar/delete", data = "<request>")]
pub async fn delete_event(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_event_handler(request, auth, db_config).await
}

// KPI routes

#[get("/kpi?<from>&<to>")]
pub async fn kpi_report(
    from: String,
    to: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<KpiReport>>, Json<StandardErrorResponse>> {
    handlers::kpi_report_handler(from, to, auth, db_config).await
}

#[post("/kpi/record", data = "<request>")]
pub async fn record_kpi(
    request: Json<StandardRequest<RecordKpiRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<crate::crm::KpiEvent>>, Json<StandardErrorResponse>> {
    handlers::record_kpi_handler(request, auth, db_config).await
}

#[post("/kpi/delete", data = "<request>")]
pub async fn delete_kpi(
    request: Json<StandardRequest<DeleteRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_kpi_handler(request, auth, db_config).await
}

// System routes

#[get("/me")]
pub async fn get_current_user(auth: AuthenticatedUser) -> Json<AuthResponse> {
    handlers::get_current_user_handler(auth).await
}

#[get("/me", rank = 2)]
pub async fn get_current_user_error() -> Json<StandardErrorResponse> {
    handlers::get_current_user_error_handler().await
}

#[get("/health")]
pub async fn health(auth: OptionalAuth) -> Json<TextResponse> {
    handlers::health_handler(auth).await
}

#[post("/files/upload", data = "<upload>")]
pub async fn upload_file(
    upload: Form<FileUploadForm<'_>>,
    auth: AuthenticatedUser,
    storage: &State<ObjectStorage>,
) -> Result<Json<DataResponse<UploadData>>, Json<StandardErrorResponse>> {
    handlers::upload_file_handler(upload, auth, storage).await
}

#[get("/files/tree")]
pub async fn get_files_tree(
    auth: AuthenticatedUser,
    storage: &State<ObjectStorage>,
) -> Result<Json<serde_json::Value>, Status> {
    handlers::get_files_tree_handler(auth, storage).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

// Main server start function
pub async fn start_web_server(env: EnvironmentConfig, port: u16) -> Result<()> {
    env.ensure_directories().await?;

    let mut db_config = DatabaseConfig::new(env.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    let mut auth_config = AuthConfig::new(env.auth_project_id.clone());

    if let Err(e) = auth_config.update_firebase_keys().await {
        error!("Failed to fetch Firebase keys: {}", e);
        return Err(e);
    }

    let storage = ObjectStorage::new(env.storage_path.clone());
    let extraction = ExtractionService::new(env.ai_service_url.clone())?;

    info!("Starting CANDI recruiting CRM API server");
    info!("Database: {}", db_config.database_path.display());
    info!("Object storage: {}", storage.root().display());
    info!("AI service: {}", env.ai_service_url);

    let files_root = storage.root().to_path_buf();

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(auth_config)
        .manage(db_config)
        .manage(storage)
        .manage(extraction)
        .register("/api", catchers![bad_request, internal_error])
        .mount("/files", FileServer::from(files_root))
        .mount(
            "/api",
            routes![
                import_resume,
                import_linkedin,
                enhance_candidate,
                create_candidate,
                list_candidates,
                export_candidates,
                get_candidate,
                update_candidate,
                delete_candidate,
                list_projects,
                create_project,
                update_project,
                delete_project,
                list_tasks,
                create_task,
                set_task_status,
                delete_task,
                list_notes,
                create_note,
                delete_note,
                list_events,
                create_event,
                delete_event,
                kpi_report,
                record_kpi,
                delete_kpi,
                get_current_user,
                get_current_user_error,
                health,
                upload_file,
                get_files_tree,
                options,
            ],
        )
        .launch()
        .await;

    Ok(())
}
