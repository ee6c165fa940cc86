// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! axum router and handlers for the slug-to-UUID mapping service.
//!
//! The surface mirrors what the web client calls:
//! `POST /api/get-id`, `GET /api/get-slug/{uuid}`, `GET /api/health`, and a
//! service-info root. Errors come back as `{"error": "..."}` JSON.

use std::fmt;
use std::fs;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::model::{MappingKind, Slug};
use crate::store::{MappingStore, StoreError};

const SERVICE_NAME: &str = "Lembar Comic API";

#[derive(Debug)]
pub struct ApiState {
    store: Mutex<MappingStore>,
}

impl ApiState {
    pub fn new(store: MappingStore) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/get-id", post(get_id))
        .route("/api/get-slug/{uuid}", get(get_slug))
        .route("/api/health", get(health))
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    /// Bad request payload (missing/empty fields, unknown type, bad JSON).
    Validation(String),
    /// No mapping behind the given uuid.
    UnknownUuid(String),
    /// Datastore failure; the message passes through.
    Store(StoreError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => f.write_str(message),
            Self::UnknownUuid(value) => write!(f, "no mapping for uuid {value:?}"),
            Self::Store(source) => write!(f, "internal error: {source}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(source) => Some(source),
            Self::Validation(_) | Self::UnknownUuid(_) => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        Self::Store(source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnknownUuid(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct ServiceInfoResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetIdRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetIdResponse {
    pub uuid: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MappingResponse {
    pub uuid: Uuid,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: MappingKind,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        status: "OK",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(crate) async fn get_id(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<GetIdRequest>, JsonRejection>,
) -> Result<Json<GetIdResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let slug_raw = request.slug.unwrap_or_default();
    let kind_raw = request.kind.unwrap_or_default();
    if slug_raw.is_empty() || kind_raw.is_empty() {
        return Err(ApiError::Validation(
            "slug and type are required".to_owned(),
        ));
    }

    let slug =
        Slug::new(slug_raw).map_err(|source| ApiError::Validation(source.to_string()))?;
    let kind = kind_raw
        .parse::<MappingKind>()
        .map_err(|source| ApiError::Validation(source.to_string()))?;

    let mut store = state.store.lock().await;
    let outcome = store.lookup_or_create(slug.clone(), kind)?;
    if outcome.created {
        info!("mapped {kind} slug {slug} to {}", outcome.uuid);
    }

    Ok(Json(GetIdResponse { uuid: outcome.uuid }))
}

pub(crate) async fn get_slug(
    State(state): State<Arc<ApiState>>,
    Path(raw_uuid): Path<String>,
) -> Result<Json<MappingResponse>, ApiError> {
    // A non-uuid path segment cannot match anything, which is a plain 404
    // rather than a client error.
    let Ok(uuid) = Uuid::parse_str(&raw_uuid) else {
        return Err(ApiError::UnknownUuid(raw_uuid));
    };

    let store = state.store.lock().await;
    match store.get(uuid) {
        Some(mapping) => Ok(Json(MappingResponse {
            uuid: mapping.uuid(),
            slug: mapping.slug().to_string(),
            kind: mapping.kind(),
        })),
        None => Err(ApiError::UnknownUuid(raw_uuid)),
    }
}

pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Response {
    let store = state.store.lock().await;
    match fs::metadata(store.root()) {
        Ok(md) if md.is_dir() => Json(HealthResponse {
            status: "OK",
            database: Some("Connected"),
            message: None,
        })
        .into_response(),
        Ok(_) => health_error("store root is not a directory".to_owned()),
        Err(err) => health_error(err.to_string()),
    }
}

fn health_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(HealthResponse {
            status: "Error",
            database: None,
            message: Some(message),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests;
