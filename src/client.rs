use anyhow::Context;
use reqwest::multipart;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, SessionLocation};
use crate::error::{ApiError, Result};
use crate::session::{MemorySessionStore, SessionManager, SessionStore, SqliteSessionStore};

/// One part of a multipart form, held as owned data so the form can be
/// rebuilt for the retry after a token refresh (a `reqwest` multipart body
/// is not cloneable).
enum FormPart {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// An owned, re-appliable multipart form.
#[derive(Default)]
pub struct OwnedForm {
    parts: Vec<(String, FormPart)>,
}

impl OwnedForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                file_name: file_name.into(),
                bytes,
            },
        ));
        self
    }

    /// Materialize a fresh `reqwest` form. Called once per attempt.
    fn to_form(&self) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, part) in &self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name.clone(), value.clone()),
                FormPart::File { file_name, bytes } => {
                    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
                    form.part(
                        name.clone(),
                        multipart::Part::bytes(bytes.clone())
                            .file_name(file_name.clone())
                            .mime_str(mime.as_ref())?,
                    )
                }
            };
        }
        Ok(form)
    }
}

/// Request body, held in an owned form so the request can be rebuilt
/// verbatim for the post-refresh retry.
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Query(Vec<(String, String)>),
    Form(OwnedForm),
}

/// HTTP client for the blog API
/// Applies the stored bearer token to every request and coordinates the
/// 401 -> refresh -> retry protocol with the session manager.
pub struct ApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Session coordinator (tokens, user summary, refresh)
    session: Arc<SessionManager>,

    config: Config,
}

impl ApiClient {
    /// Create a client, opening the session store named by the config.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn SessionStore> = match &config.session {
            SessionLocation::File(path) => Arc::new(SqliteSessionStore::open(path)?),
            SessionLocation::Memory => Arc::new(MemorySessionStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Create a client over an existing session store.
    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        let session = Arc::new(SessionManager::new(
            store,
            config.refresh_url(),
            Duration::from_secs(config.refresh_timeout),
        )?);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            session,
            config,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // Typed helpers
    // ========================================================================

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, &Payload::Empty).await?;
        decode(response).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        let response = self.send(Method::GET, path, &Payload::Query(query)).await?;
        decode(response).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = Payload::Json(to_value(body)?);
        let response = self.send(Method::POST, path, &payload).await?;
        decode(response).await
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = Payload::Json(to_value(body)?);
        let response = self.send(Method::PUT, path, &payload).await?;
        decode(response).await
    }

    pub(crate) async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = Payload::Json(to_value(body)?);
        let response = self.send(Method::PATCH, path, &payload).await?;
        decode(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: OwnedForm,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, &Payload::Form(form)).await?;
        decode(response).await
    }

    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: OwnedForm,
    ) -> Result<T> {
        let response = self.send(Method::PUT, path, &Payload::Form(form)).await?;
        decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &Payload::Empty).await?;
        Ok(())
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::DELETE, path, &Payload::Empty).await?;
        decode(response).await
    }

    // ========================================================================
    // Core request path
    // ========================================================================

    /// Execute a request with the current bearer token. On a 401, join the
    /// single-flight refresh and retry once with the refreshed token; if
    /// the refresh does not produce a token, the original 401 is what the
    /// caller gets.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> Result<Response> {
        let url = self.config.url(path);
        let (token, generation) = self.session.snapshot().await;

        let response = self.execute(&method, &url, payload, token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return ok_or_api_error(response).await;
        }

        // Decode the 401 body now: this is the error the caller sees if
        // the refresh cannot help.
        let original = error_from(response).await;

        match self.session.refresh_after(generation).await {
            Ok(fresh) => {
                tracing::debug!(method = %method, url = %url, "Retrying request with refreshed token");
                let retried = self.execute(&method, &url, payload, Some(fresh)).await?;
                ok_or_api_error(retried).await
            }
            Err(reason) => {
                tracing::debug!(method = %method, url = %url, ?reason, "Refresh yielded no token, surfacing original response");
                Err(original)
            }
        }
    }

    /// Build and send one attempt.
    async fn execute(
        &self,
        method: &Method,
        url: &str,
        payload: &Payload,
        bearer: Option<String>,
    ) -> Result<Response> {
        let mut builder = self.client.request(method.clone(), url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Query(pairs) => builder.query(pairs),
            Payload::Form(form) => builder.multipart(form.to_form()?),
        };

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");
        Ok(builder.send().await?)
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body: {e}")))
}

/// Pass successful responses through, map everything else to
/// [`ApiError::Api`] with the decoded error envelope.
async fn ok_or_api_error(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from(response).await)
    }
}

async fn error_from(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    tracing::warn!(status, "Received error response");
    ApiError::Api { status, body }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_parts_build_for_any_extension() {
        // MIME comes from the file name at build time; unknown extensions
        // fall back to application/octet-stream rather than failing.
        let form = OwnedForm::new()
            .file("cover", "diagram.svg", b"<svg/>".to_vec())
            .file("scan", "page.tiff", vec![1, 2, 3])
            .file("raw", "noextension", vec![9]);
        assert!(form.to_form().is_ok());
    }

    #[test]
    fn test_owned_form_rebuilds() {
        let form = OwnedForm::new()
            .text("title", "Hello")
            .file("cover", "cover.png", vec![1, 2, 3]);

        // Must be materializable more than once for the retry path.
        assert!(form.to_form().is_ok());
        assert!(form.to_form().is_ok());
    }
}
