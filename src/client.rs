use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUESTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS};
use crate::types::{ChatReply, ChatRequest, ReindexReport, UploadReceipt};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";
const SERVER_URL_ENV: &str = "TARMAC_SERVER_URL";

const CHAT_PATH: &str = "api/chat";
const UPLOAD_PATH: &str = "api/upload";
const REINDEX_PATH: &str = "api/reindex";

/// Something that can answer a chat request.
///
/// [`TarmacClient`] talks to a real server; tests and embedders can supply
/// their own.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one message and wait for the reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// HTTP client for the assistant server.
#[derive(Debug, Clone)]
pub struct TarmacClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl TarmacClient {
    /// Create a new client.
    ///
    /// The server URL can be provided directly or read from the
    /// TARMAC_SERVER_URL environment variable.  Without either, the client
    /// talks to a server on localhost port 8000.  No timeout is applied.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with a request timeout.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
        };
        let base_url = normalize_base_url(&base_url)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The server this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The request timeout, if one was configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Upload a document for the server to index.
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<UploadReceipt> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::validation(
                    format!("{} does not name a file", path.display()),
                    Some("path".to_string()),
                )
            })?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let url = self.base_url.join(UPLOAD_PATH)?;
        let response = self.execute(self.client.post(url).multipart(form)).await?;
        decode(response).await
    }

    /// Ask the server to rebuild its document index.
    pub async fn reindex(&self) -> Result<ReindexReport> {
        let url = self.base_url.join(REINDEX_PATH)?;
        let response = self.execute(self.client.post(url)).await?;
        decode(response).await
    }

    /// Send a request and turn non-success statuses into errors.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = request.send().await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    self.timeout.map(|t| t.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }

    /// Process a non-success response into an [`Error::Api`].
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };
        Error::api(status.as_u16(), error_message(status, &body), body)
    }
}

#[async_trait::async_trait]
impl ChatBackend for TarmacClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.base_url.join(CHAT_PATH)?;
        tracing::debug!(
            url = %url,
            has_session = request.session_id.is_some(),
            "posting chat message"
        );
        let response = self.execute(self.client.post(url).form(request)).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        Error::serialization(
            format!("Failed to parse response: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Parse and normalize a server URL so that endpoint paths join beneath it.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::validation(
            format!("unsupported scheme {:?}", url.scheme()),
            Some("server".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Pick the most useful message out of an error body.
///
/// The server reports its own failures as `{"error": ..., "details": ...}`
/// and request validation failures as `{"detail": ...}`.  Anything else is
/// passed through as-is.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        details: Option<String>,
        detail: Option<serde_json::Value>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match (parsed.error, parsed.details, parsed.detail) {
            (Some(error), Some(details), _) => return format!("{error}: {details}"),
            (Some(error), None, _) => return error,
            (None, _, Some(serde_json::Value::String(detail))) => return detail,
            (None, _, Some(detail)) => return detail.to_string(),
            _ => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
