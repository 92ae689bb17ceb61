//! HTTP JSON transport for the credential API

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::response::{ApiError, ApiResponse};
use passop_core::{
    CredentialService, DeleteResult, InsertOneResult, ListedCredential, NewCredential,
    NewGeneratedPassword,
};

/// Shared state for HTTP handlers
struct AppState {
    service: Arc<CredentialService>,
}

/// HTTP transport for the credential API
pub struct HttpTransport {
    service: Arc<CredentialService>,
    addr: String,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(service: Arc<CredentialService>, addr: impl Into<String>) -> Self {
        Self {
            service,
            addr: addr.into(),
        }
    }

    /// Run the HTTP server until interrupted
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.service.clone());

        info!("Starting PassOP HTTP server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("PassOP HTTP server stopped");
        Ok(())
    }
}

/// Build the API router
pub fn router(service: Arc<CredentialService>) -> Router {
    let state = Arc::new(AppState { service });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(list_credentials).post(save_credential))
        // `/health` shadows `/:id`, so it also deletes a credential whose id is "health"
        .route("/health", get(health).delete(delete_health_credential))
        .route("/generated-passwords", post(save_generated_password))
        .route("/:id", delete(delete_credential))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Health check endpoint
async fn health() -> &'static str {
    "OK"
}

/// GET / - every credential with its password decrypted
async fn list_credentials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ListedCredential>>, ApiError> {
    let credentials = state
        .service
        .list_credentials()
        .await
        .map_err(ApiError::internal("Error retrieving passwords"))?;

    debug!("Returning {} credentials", credentials.len());
    Ok(Json(credentials))
}

/// POST / - encrypt and store a credential
async fn save_credential(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCredential>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<InsertOneResult>>), ApiError> {
    let Json(credential) = payload?;

    let result = state
        .service
        .save_credential(credential)
        .await
        .map_err(ApiError::internal("Error saving password"))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// DELETE /:id - remove a credential
async fn delete_credential(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteResult>>, ApiError> {
    delete_by_id(&state, &id).await
}

/// DELETE /health - same as DELETE /:id for the id "health"
async fn delete_health_credential(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DeleteResult>>, ApiError> {
    delete_by_id(&state, "health").await
}

async fn delete_by_id(
    state: &AppState,
    id: &str,
) -> Result<Json<ApiResponse<DeleteResult>>, ApiError> {
    let result = state
        .service
        .delete_credential(id)
        .await
        .map_err(ApiError::internal("Error deleting password"))?;

    Ok(Json(ApiResponse::ok(result)))
}

/// POST /generated-passwords - record a generated password
async fn save_generated_password(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewGeneratedPassword>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<InsertOneResult>>), ApiError> {
    let Json(generated) = payload?;

    let result = state
        .service
        .save_generated_password(generated)
        .await
        .map_err(ApiError::internal("Error saving generated password"))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}
