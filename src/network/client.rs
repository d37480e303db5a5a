//! HTTP transport - the one blocking network call a fetch worker makes

use std::time::Duration;

use futures_util::StreamExt;
use thiserror::Error;
use tokio::runtime::Runtime;

use crate::config::FetchConfig;
use crate::models::FetchRequest;

/// What the server sent back
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
    /// The body was cut off at the configured size cap
    pub truncated: bool,
}

/// Transport failures, all of which end a fetch without a complete body
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out ({0:?})")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    /// Headers arrived but the body stream broke; whatever was read is kept
    #[error("error reading body (status {status}): {message}")]
    Interrupted {
        status: u16,
        partial: Vec<u8>,
        message: String,
    },
}

/// Failure to set up the transport itself
#[derive(Debug, Error)]
pub enum TransportInitError {
    #[error("failed to start network runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Body bytes salvaged from the failed fetch, usually none
    pub fn into_partial_body(self) -> Vec<u8> {
        match self {
            FetchError::Interrupted { partial, .. } => partial,
            _ => Vec::new(),
        }
    }
}

/// Performs one request and blocks the calling thread until it finishes.
///
/// Implementations must enforce their own timeout: the fetch manager has no
/// way to abort a call in progress.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: &FetchRequest) -> Result<HttpReply, FetchError>;
}

/// reqwest-backed transport with its own small tokio runtime.
///
/// Fetch workers are plain threads, so each call enters the runtime with
/// `block_on`. Dropping the transport shuts the runtime and connection pool
/// down; do that from a thread that is not itself running async code.
pub struct HttpTransport {
    runtime: Runtime,
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpTransport {
    pub fn new(config: &FetchConfig) -> Result<Self, TransportInitError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("postwoman-net")
            .enable_all()
            .build()?;

        let client = {
            let _guard = runtime.enter();
            create_client(config)?
        };

        Ok(HttpTransport {
            runtime,
            client,
            timeout: config.timeout(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    async fn execute_async(&self, request: &FetchRequest) -> Result<HttpReply, FetchError> {
        let req_builder = build_request(&self.client, request);
        let resp = req_builder.send().await.map_err(|e| self.classify(e))?;
        let status = resp.status().as_u16();

        let mut stream = resp.bytes_stream();
        let mut body = Vec::new();
        let mut truncated = false;

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    let room = self.max_body_bytes - body.len();
                    if bytes.len() > room {
                        body.extend_from_slice(&bytes[..room]);
                        truncated = true;
                        tracing::warn!(status, limit = self.max_body_bytes, "response body truncated");
                        break;
                    }
                    body.extend_from_slice(&bytes);
                }
                Err(e) => {
                    let message = match self.classify(e) {
                        FetchError::Timeout(after) => format!("timed out after {:?}", after),
                        other => other.to_string(),
                    };
                    return Err(FetchError::Interrupted {
                        status,
                        partial: body,
                        message,
                    });
                }
            }
        }

        Ok(HttpReply {
            status,
            body,
            truncated,
        })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &FetchRequest) -> Result<HttpReply, FetchError> {
        self.runtime.block_on(self.execute_async(request))
    }
}

/// Build a request from the given parameters
fn build_request(client: &reqwest::Client, request: &FetchRequest) -> reqwest::RequestBuilder {
    match &request.body {
        Some(body) => client.post(&request.url).body(body.clone()),
        None => client.get(&request.url),
    }
}

/// Create an HTTP client from the transport settings
fn create_client(config: &FetchConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .user_agent(config.user_agent.clone())
        .build()
}
