//! API request handlers
//!
//! Handlers for the selection flow and report generation.
//! Every `/api/v1` request carries the caller's email.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::data::AccountSummary;
use crate::report::generate_report;

use super::server::AppState;

pub const UNRECOGNIZED_EMAIL: &str = "Your email is not recognized. Please contact support.";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn reply<T: Serialize>(data: T) -> Reply<T> {
    (StatusCode::OK, Json(ApiResponse::ok(data)))
}

fn reject<T: Serialize>(status: StatusCode, message: impl Into<String>) -> Reply<T> {
    (status, Json(ApiResponse::err(message)))
}

/// Allow-list check repeated on every call
fn authorize<T: Serialize>(state: &AppState, email: &str) -> Result<(), Reply<T>> {
    if state.config.is_allowed(email) {
        Ok(())
    } else {
        warn!("Rejected request from unrecognized email {}", email);
        Err(reject(StatusCode::UNAUTHORIZED, UNRECOGNIZED_EMAIL))
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "QBR Builder API Server".to_string(),
        version: state.version.clone(),
        description: "Partner renewal decks generated from opportunity data".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/login", "Check an email against the allow-list"),
            EndpointInfo::new("POST", "/api/v1/assignees", "List assigned CRS values"),
            EndpointInfo::new("POST", "/api/v1/partners", "List partners of an assignee"),
            EndpointInfo::new("POST", "/api/v1/accounts", "List accounts of a partner"),
            EndpointInfo::new("POST", "/api/v1/generate", "Generate and share a presentation"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["login", "assignees", "partners", "accounts", "generate"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub authorized: bool,
}

/// POST /api/v1/login - Allow-list gate
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Reply<LoginResponse> {
    if let Err(rejection) = authorize(&state, &req.email) {
        return rejection;
    }
    info!("Login accepted for {}", req.email);
    reply(LoginResponse {
        email: req.email.trim().to_string(),
        authorized: true,
    })
}

/// Assignees request
#[derive(Deserialize)]
pub struct AssigneesRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct AssigneesResponse {
    pub assignees: Vec<String>,
}

/// POST /api/v1/assignees - Distinct assigned CRS values
pub async fn assignees(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssigneesRequest>,
) -> Reply<AssigneesResponse> {
    if let Err(rejection) = authorize(&state, &req.email) {
        return rejection;
    }
    match state.roster.assignees() {
        Ok(assignees) => reply(AssigneesResponse { assignees }),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Partners request
#[derive(Deserialize)]
pub struct PartnersRequest {
    pub email: String,
    #[serde(default)]
    pub assigned_crs: String,
}

#[derive(Serialize)]
pub struct PartnersResponse {
    pub assigned_crs: String,
    pub partners: Vec<String>,
}

/// POST /api/v1/partners - Partners handled by one assignee
pub async fn partners(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PartnersRequest>,
) -> Reply<PartnersResponse> {
    if let Err(rejection) = authorize(&state, &req.email) {
        return rejection;
    }
    let assigned_crs = req.assigned_crs.trim();
    if assigned_crs.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "No assigned CRS selected");
    }
    match state.roster.partners_for(assigned_crs) {
        Ok(partners) => reply(PartnersResponse {
            assigned_crs: assigned_crs.to_string(),
            partners,
        }),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Accounts request
#[derive(Deserialize)]
pub struct AccountsRequest {
    pub email: String,
    #[serde(default)]
    pub partner_name: String,
}

#[derive(Serialize)]
pub struct AccountsResponse {
    pub partner_name: String,
    pub accounts: Vec<AccountSummary>,
}

/// POST /api/v1/accounts - Accounts of one partner
pub async fn accounts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AccountsRequest>,
) -> Reply<AccountsResponse> {
    if let Err(rejection) = authorize(&state, &req.email) {
        return rejection;
    }
    let partner_name = req.partner_name.trim();
    if partner_name.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "No partner selected");
    }
    match state.roster.accounts_for(partner_name) {
        Ok(accounts) => reply(AccountsResponse {
            partner_name: partner_name.to_string(),
            accounts,
        }),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Generate request
#[derive(Deserialize)]
pub struct GenerateRequest {
    pub email: String,
    #[serde(default)]
    pub account_ids: Vec<String>,
}

/// Generate response
#[derive(Serialize)]
pub struct GenerateResponse {
    pub message: String,
    pub presentation_id: String,
    pub presentation_url: String,
    pub populated: Vec<String>,
    pub skipped: Vec<String>,
}

/// POST /api/v1/generate - Run the pipeline and share with the caller
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Reply<GenerateResponse> {
    if let Err(rejection) = authorize(&state, &req.email) {
        return rejection;
    }
    let account_ids: Vec<String> = req
        .account_ids
        .iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    if account_ids.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "No account selected");
    }

    let email = req.email.trim().to_string();
    let task_state = Arc::clone(&state);
    let task_email = email.clone();
    // The Google handles are blocking clients
    let joined = tokio::task::spawn_blocking(move || {
        generate_report(&task_state.config, &account_ids, &task_email)
    })
    .await;

    match joined {
        Ok(Ok(outcome)) => reply(GenerateResponse {
            message: format!("Presentation created and shared with {}", email),
            presentation_id: outcome.presentation_id,
            presentation_url: outcome.presentation_url,
            populated: outcome.populated.into_iter().map(|s| s.title).collect(),
            skipped: outcome.skipped,
        }),
        Ok(Err(e)) => {
            error!("Report generation failed for {}: {}", email, e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!("Report task did not complete: {}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
