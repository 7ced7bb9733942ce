use crate::auth::CredentialProvider;
use crate::models::{Category, Note, VersionToken};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    /// The server rejected the version token (HTTP 409).
    Conflict,
    Network,
    Http,
    Parse,
    /// The request was dropped because its owner went away.
    Cancelled,
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    pub(crate) fn conflict(body: String) -> Self {
        Self {
            kind: ApiErrorKind::Conflict,
            message: format!("Version conflict: {body}"),
        }
    }

    pub(crate) fn http(status: u16, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self {
            kind: ApiErrorKind::Cancelled,
            message: "Request cancelled".to_string(),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Maps a non-success status to the error taxonomy the editor reacts to.
pub(crate) fn classify_status(status: u16, body: String, ctx: &str) -> ApiError {
    match status {
        401 => ApiError::unauthorized(),
        409 => ApiError::conflict(body),
        _ => ApiError::http(status, body, ctx),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub auth_scheme: String,
}

impl EnvConfig {
    pub const DEFAULT_API_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_AUTH_SCHEME: &'static str = "Token";

    pub fn new() -> Self {
        let mut config = Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            auth_scheme: Self::DEFAULT_AUTH_SCHEME.to_string(),
        };

        // We support BOTH `window.ENV.API_URL` (documented) and the lowercase
        // `window.ENV.api_url` spelling.
        let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) else {
            return config;
        };
        if env.is_undefined() || !env.is_object() {
            return config;
        }

        let read = |key: &str| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.trim().is_empty())
        };

        if let Some(url) = read("API_URL").or_else(|| read("api_url")) {
            config.api_url = url;
        }
        if let Some(scheme) = read("AUTH_SCHEME").or_else(|| read("auth_scheme")) {
            config.auth_scheme = scheme;
        }

        config
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct UpdateNoteRequest {
    pub title: String,
    pub content: String,
    /// `None` serializes as `null` for an unassigned note.
    pub category_id: Option<String>,
    /// Version token the client last observed.
    pub updated_at: Option<VersionToken>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateNoteResponse {
    pub updated_at: VersionToken,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
}

/// Remote operations the note editor depends on.
#[async_trait(?Send)]
pub(crate) trait NotesBackend {
    async fn get_note(&self, note_id: &str) -> ApiResult<Note>;

    async fn update_note(
        &self,
        note_id: &str,
        req: &UpdateNoteRequest,
    ) -> ApiResult<UpdateNoteResponse>;

    async fn list_categories(&self) -> ApiResult<Vec<Category>>;

    async fn create_category(&self, req: &CreateCategoryRequest) -> ApiResult<Category>;
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) auth_scheme: String,
    credentials: Rc<dyn CredentialProvider>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: EnvConfig, credentials: Rc<dyn CredentialProvider>) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth_scheme: config.auth_scheme,
            credentials,
            http: reqwest::Client::new(),
        }
    }

    pub(crate) fn get_auth_header(&self) -> Option<String> {
        self.credentials
            .credential()
            .map(|token| format!("{} {}", self.auth_scheme, token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }
        req
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        ctx: &str,
    ) -> ApiResult<T> {
        let res = self
            .with_auth_headers(req)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(classify_status(status, body, ctx))
        }
    }
}

#[async_trait(?Send)]
impl NotesBackend for ApiClient {
    async fn get_note(&self, note_id: &str) -> ApiResult<Note> {
        tracing::debug!(note_id, "fetching note");
        let req = self.http.get(self.url(&format!("/api/v1/notes/{note_id}/")));
        self.send(req, "Failed to fetch note data").await
    }

    async fn update_note(
        &self,
        note_id: &str,
        body: &UpdateNoteRequest,
    ) -> ApiResult<UpdateNoteResponse> {
        tracing::debug!(note_id, "saving note");
        let req = self
            .http
            .patch(self.url(&format!("/api/v1/notes/{note_id}/")))
            .json(body);
        self.send(req, "Failed to save note").await
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let req = self.http.get(self.url("/api/v1/categories/"));
        self.send(req, "Failed to fetch categories").await
    }

    async fn create_category(&self, body: &CreateCategoryRequest) -> ApiResult<Category> {
        tracing::debug!(name = %body.name, "creating category");
        let req = self.http.post(self.url("/api/v1/categories/")).json(body);
        self.send(req, "Failed to create category").await
    }
}
