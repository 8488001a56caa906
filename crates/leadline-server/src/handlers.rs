//! HTTP request handlers for the lead API.
//!
//! Implements summary processing, lead listing, statistics and bulk
//! deletion using axum.

use crate::LeadPipeline;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{DateTime, Utc};
use leadline_domain::{CanonicalLead, LeadStats, StoredLead};
use leadline_pipeline::{PipelineError, ProcessingResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The lead pipeline and its collaborators
    pub pipeline: Arc<LeadPipeline>,
}

/// Summary processing request
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Free-text meeting summary
    pub summary: String,
}

/// Query parameters for lead listing
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Maximum number of leads; 0 or absent means all
    pub limit: Option<usize>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service description
    pub message: String,
    /// Always "healthy" while the server is answering
    pub status: String,
}

/// A stored lead as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct LeadView {
    /// The canonical record
    #[serde(flatten)]
    pub lead: CanonicalLead,
    /// Insert timestamp
    pub created_at: DateTime<Utc>,
}

impl From<StoredLead> for LeadView {
    fn from(stored: StoredLead) -> Self {
        Self {
            lead: stored.lead,
            created_at: stored.created_at,
        }
    }
}

/// Lead listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct LeadListResponse {
    /// Leads, most recent first
    pub leads: Vec<LeadView>,
    /// Number of leads returned
    pub total: usize,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub detail: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The request was rejected
    BadRequest(String),
    /// The pipeline ran but extraction failed
    ProcessingFailed(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ProcessingFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidInput(msg) => AppError::BadRequest(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// GET / - Health check
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Leadline CRM lead processor is running".to_string(),
        status: "healthy".to_string(),
    })
}

/// POST /api/process - Extract a lead from a meeting summary
async fn process_summary(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessingResult>, AppError> {
    let result = state.pipeline.process(&request.summary).await?;

    if !result.success {
        let detail = result
            .error
            .unwrap_or_else(|| "Processing failed".to_string());
        return Err(AppError::ProcessingFailed(detail));
    }

    Ok(Json(result))
}

/// GET /api/leads - List stored leads
async fn list_leads(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<LeadListResponse>, AppError> {
    let limit = params.limit.filter(|l| *l > 0);

    let leads: Vec<LeadView> = state
        .pipeline
        .list_leads(limit)
        .await
        .map_err(|e| internal("Failed to retrieve leads", e))?
        .into_iter()
        .map(LeadView::from)
        .collect();

    Ok(Json(LeadListResponse {
        total: leads.len(),
        leads,
    }))
}

/// GET /api/stats - Aggregate statistics
async fn lead_stats(State(state): State<AppState>) -> Result<Json<LeadStats>, AppError> {
    let stats = state
        .pipeline
        .stats()
        .await
        .map_err(|e| internal("Failed to retrieve stats", e))?;
    Ok(Json(stats))
}

/// DELETE /api/leads - Remove every stored lead
async fn clear_leads(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state
        .pipeline
        .clear()
        .await
        .map_err(|e| internal("Failed to clear leads", e))?;

    Ok(Json(MessageResponse {
        message: format!("Deleted {} leads", deleted),
    }))
}

fn internal(context: &str, e: PipelineError) -> AppError {
    error!("{}: {}", context, e);
    AppError::InternalError(format!("{}: {}", context, e))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(health_check))
        .route("/api/process", post(process_summary))
        .route("/api/leads", get(list_leads).delete(clear_leads))
        .route("/api/stats", get(lead_stats))
        .with_state(state)
}
