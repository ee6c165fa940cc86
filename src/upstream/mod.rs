// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client plumbing for the third-party comic scraper API.
//!
//! The scraper itself is an external collaborator reached with plain GETs
//! through a proxy; this module owns the pieces that are ours: endpoint URL
//! building, the loose response envelope, and a per-URL TTL cache. Fetch
//! failures are soft: callers get `None` and a log line, never a panic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::model::{Chapter, Comic, Slug};

pub const DEFAULT_PROXY_URL: &str = "https://api.nekolabs.web.id/px?url=";
pub const DEFAULT_BASE_URL: &str = "https://www.sankavollerei.com/comic/komikcast";

/// How long a fetched payload stays servable from the cache.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

const PROXY_URL_ENV: &str = "LEMBAR_PROXY_URL";
const BASE_URL_ENV: &str = "LEMBAR_UPSTREAM_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub proxy_url: String,
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl UpstreamConfig {
    /// Reads the proxy/base URLs from the environment, falling back to the
    /// documented defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            proxy_url: std::env::var(PROXY_URL_ENV).unwrap_or(defaults.proxy_url),
            base_url: std::env::var(BASE_URL_ENV).unwrap_or(defaults.base_url),
        }
    }

    pub fn home_url(&self) -> String {
        format!("{}/home", self.base_url)
    }

    pub fn detail_url(&self, slug: &Slug) -> String {
        format!("{}/detail/{slug}", self.base_url)
    }

    pub fn chapter_url(&self, slug: &Slug) -> String {
        format!("{}/chapter/{slug}", self.base_url)
    }

    pub fn search_url(&self, query: &str, page: u32) -> String {
        format!(
            "{}/search/{}/{page}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    pub fn genre_url(&self, slug: &Slug, page: u32) -> String {
        format!("{}/genre/{slug}/{page}", self.base_url)
    }

    pub fn list_url(&self, filter: &ListFilter) -> String {
        format!("{}/list?{}", self.base_url, filter.query_string())
    }

    /// Wraps a target URL in the proxy prefix, percent-encoding it the way the
    /// proxy expects.
    pub fn proxied(&self, target: &str) -> String {
        format!("{}{}", self.proxy_url, urlencoding::encode(target))
    }
}

/// Filters for the upstream `list` endpoint. Unset fields are omitted from the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<String>,
    pub comic_type: Option<String>,
    pub orderby: Option<String>,
    pub page: Option<u32>,
}

impl ListFilter {
    fn query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(status) = &self.status {
            pairs.push(format!("status={}", urlencoding::encode(status)));
        }
        if let Some(comic_type) = &self.comic_type {
            pairs.push(format!("type={}", urlencoding::encode(comic_type)));
        }
        if let Some(orderby) = &self.orderby {
            pairs.push(format!("orderby={}", urlencoding::encode(orderby)));
        }
        if let Some(page) = self.page {
            pairs.push(format!("page={page}"));
        }
        pairs.join("&")
    }
}

/// The loose envelope the scraper wraps payloads in. Which nesting carries the
/// payload varies by endpoint, so unwrapping tries them in a fixed order:
/// `result.content`, `result.data`, `data`, `content`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<EnvelopeResult<T>>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub content: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeResult<T> {
    #[serde(default)]
    pub content: Option<T>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_payload(self) -> Option<T> {
        if !self.success {
            return None;
        }

        let (result_content, result_data) = match self.result {
            Some(result) => (result.content, result.data),
            None => (None, None),
        };

        result_content
            .or(result_data)
            .or(self.data)
            .or(self.content)
    }
}

/// Some endpoints nest the payload one level deeper under a `data` key; peel
/// that off when present.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[derive(Debug)]
struct CacheEntry {
    inserted_at: Instant,
    payload: Value,
}

/// Per-URL payload cache with a fixed TTL.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, url: &str) -> Option<Value> {
        self.get_at(url, Instant::now())
    }

    fn get_at(&mut self, url: &str, now: Instant) -> Option<Value> {
        match self.entries.get(url) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                Some(entry.payload.clone())
            }
            Some(_) => {
                self.entries.remove(url);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, url: impl Into<String>, payload: Value) {
        self.insert_at(url, payload, Instant::now());
    }

    fn insert_at(&mut self, url: impl Into<String>, payload: Value, now: Instant) {
        self.entries.insert(
            url.into(),
            CacheEntry {
                inserted_at: now,
                payload,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Async client for the scraper API: proxied GETs, envelope unwrapping and the
/// TTL cache in one place.
#[derive(Debug)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    http: reqwest::Client,
    cache: Mutex<TtlCache>,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            cache: Mutex::new(TtlCache::new(CACHE_TTL)),
        }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    // A poisoned cache only means a panic mid-insert; the entries are still
    // coherent, so keep serving from them.
    fn cache(&self) -> MutexGuard<'_, TtlCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches a target URL through the proxy, returning the unwrapped
    /// payload. Cached payloads short-circuit the network entirely.
    pub async fn fetch_payload(&self, target: &str) -> Option<Value> {
        if let Some(payload) = self.cache().get(target) {
            return Some(payload);
        }

        let url = self.config.proxied(target);
        let envelope = match self.request_envelope(&url).await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!("upstream: GET {target} failed: {err}");
                return None;
            }
        };

        let payload = envelope.into_payload()?;
        self.cache().insert(target, payload.clone());
        Some(payload)
    }

    async fn request_envelope(&self, url: &str) -> Result<ApiEnvelope<Value>, reqwest::Error> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<ApiEnvelope<Value>>()
            .await
    }

    async fn fetch_typed<T: DeserializeOwned>(&self, target: &str) -> Option<T> {
        let payload = unwrap_data(self.fetch_payload(target).await?);
        match serde_json::from_value(payload) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!("upstream: unexpected payload shape from {target}: {err}");
                None
            }
        }
    }

    pub async fn home(&self) -> Option<Value> {
        self.fetch_payload(&self.config.home_url()).await
    }

    pub async fn detail(&self, slug: &Slug) -> Option<Comic> {
        self.fetch_typed(&self.config.detail_url(slug)).await
    }

    pub async fn chapter(&self, slug: &Slug) -> Option<Chapter> {
        self.fetch_typed(&self.config.chapter_url(slug)).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Option<Value> {
        self.fetch_payload(&self.config.search_url(query, page)).await
    }

    pub async fn genre(&self, slug: &Slug, page: u32) -> Option<Value> {
        self.fetch_payload(&self.config.genre_url(slug, page)).await
    }

    pub async fn list(&self, filter: &ListFilter) -> Option<Value> {
        self.fetch_payload(&self.config.list_url(filter)).await
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache().len()
    }
}
