// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use super::{get_id, get_slug, health, ApiError, ApiState, GetIdRequest};
use crate::store::MappingStore;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("lembar-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn test_state(tmp: &TempDir) -> Arc<ApiState> {
    let store = MappingStore::open(tmp.path().join("mappings")).unwrap();
    ApiState::new(store)
}

fn request(slug: &str, kind: &str) -> Result<Json<GetIdRequest>, axum::extract::rejection::JsonRejection> {
    Ok(Json(GetIdRequest {
        slug: Some(slug.to_owned()),
        kind: Some(kind.to_owned()),
    }))
}

#[tokio::test]
async fn get_id_twice_returns_the_same_uuid() {
    let tmp = TempDir::new("api");
    let state = test_state(&tmp);

    let first = get_id(State(state.clone()), request("one-piece", "series"))
        .await
        .unwrap();
    let second = get_id(State(state.clone()), request("one-piece", "series"))
        .await
        .unwrap();

    assert_eq!(first.uuid, second.uuid);
}

#[tokio::test]
async fn get_slug_returns_the_original_pair() {
    let tmp = TempDir::new("api");
    let state = test_state(&tmp);

    let created = get_id(State(state.clone()), request("one-piece", "series"))
        .await
        .unwrap();

    let mapping = get_slug(State(state.clone()), Path(created.uuid.to_string()))
        .await
        .unwrap();
    assert_eq!(mapping.uuid, created.uuid);
    assert_eq!(mapping.slug, "one-piece");
    assert_eq!(mapping.kind, crate::model::MappingKind::Series);
}

#[tokio::test]
async fn missing_fields_are_a_validation_error() {
    let tmp = TempDir::new("api");
    let state = test_state(&tmp);

    let err = get_id(
        State(state.clone()),
        Ok(Json(GetIdRequest {
            slug: Some("one-piece".to_owned()),
            kind: None,
        })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = get_id(State(state.clone()), request("", "series"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn unknown_kind_is_a_validation_error() {
    let tmp = TempDir::new("api");
    let state = test_state(&tmp);

    let err = get_id(State(state), request("one-piece", "volume"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn unknown_uuid_is_not_found() {
    let tmp = TempDir::new("api");
    let state = test_state(&tmp);

    let err = get_slug(State(state.clone()), Path(Uuid::new_v4().to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UnknownUuid(_)));

    // A non-uuid segment is also a plain 404, not a 400.
    let err = get_slug(State(state), Path("definitely-not-a-uuid".to_owned()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UnknownUuid(_)));
}

#[tokio::test]
async fn health_reports_connected_store() {
    let tmp = TempDir::new("api");
    let state = test_state(&tmp);

    let response = health(State(state)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn error_statuses_map_to_http_codes() {
    let response = ApiError::Validation("slug and type are required".to_owned()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ApiError::UnknownUuid("nope".to_owned()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn error_bodies_carry_the_error_field() {
    let response = ApiError::UnknownUuid("nope".to_owned()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("nope"));
}
