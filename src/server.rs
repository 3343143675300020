use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::config::AgentConfig;
use crate::metrics::MetricsSnapshot;

pub const REGISTER_ATTEMPTS: u32 = 60;
pub const REGISTER_RETRY_DELAY: Duration = Duration::from_secs(5);

const METRICS_TIMEOUT: Duration = Duration::from_secs(5);
const REGISTER_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "X-Api-Key";

/// One-time identity announcement sent before any sampling starts.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub system_name: String,
    pub location: String,
    pub os_type: String,
    pub hostname: String,
    pub public_ip: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub table_name: Option<String>,
}

/// Why a single register attempt failed. Transport errors and non-200
/// statuses are treated the same by the retry loop.
#[derive(Debug)]
pub enum RegisterError {
    Http(reqwest::Error),
    Status(StatusCode),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::Http(err) => write!(f, "request failed: {err}"),
            RegisterError::Status(status) => write!(f, "server answered {status}"),
        }
    }
}

impl std::error::Error for RegisterError {}

impl From<reqwest::Error> for RegisterError {
    fn from(err: reqwest::Error) -> Self {
        RegisterError::Http(err)
    }
}

/// The retry budget ran out without a single successful registration.
#[derive(Debug)]
pub struct RegistrationExhausted {
    pub attempts: u32,
}

impl fmt::Display for RegistrationExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registration failed after {} attempts", self.attempts)
    }
}

impl std::error::Error for RegistrationExhausted {}

/// The delivery side of the remote collector, as the pipeline sees it.
pub trait MetricsTransport: Send + Sync {
    /// One bounded-timeout delivery attempt. True means the server
    /// acknowledged the snapshot; any other outcome is a failure.
    fn send_metrics(&self, snapshot: &MetricsSnapshot) -> impl Future<Output = bool> + Send;
}

impl<T: MetricsTransport> MetricsTransport for std::sync::Arc<T> {
    fn send_metrics(&self, snapshot: &MetricsSnapshot) -> impl Future<Output = bool> + Send {
        (**self).send_metrics(snapshot)
    }
}

/// The registration side of the remote collector.
pub trait RegistrationTransport: Send + Sync {
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<RegisterResponse, RegisterError>> + Send;
}

/// HTTP client for the REFORMMED server. Cheap to clone; every request
/// carries the configured API key.
#[derive(Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ServerClient {
    pub fn new(config: &AgentConfig, http: reqwest::Client) -> Self {
        ServerClient {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

impl MetricsTransport for ServerClient {
    async fn send_metrics(&self, snapshot: &MetricsSnapshot) -> bool {
        let result = self
            .http
            .post(format!("{}/metrics", self.base_url))
            .timeout(METRICS_TIMEOUT)
            .header(API_KEY_HEADER, &self.api_key)
            .json(snapshot)
            .send()
            .await;
        match result {
            Ok(response) => response.status() == StatusCode::OK,
            Err(err) => {
                debug!("metrics delivery failed: {err}");
                false
            }
        }
    }
}

impl RegistrationTransport for ServerClient {
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, RegisterError> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .timeout(REGISTER_TIMEOUT)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(RegisterError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

/// Flat retry policy: up to `attempts` tries spaced by `delay`, no backoff
/// growth. The process has nothing useful to do without an identity, so
/// exhaustion is fatal to the caller.
pub async fn register_with_retry<T: RegistrationTransport>(
    transport: &T,
    request: &RegisterRequest,
    attempts: u32,
    delay: Duration,
) -> Result<RegisterResponse, RegistrationExhausted> {
    for attempt in 1..=attempts {
        match transport.register(request).await {
            Ok(response) => return Ok(response),
            Err(err) => warn!("register attempt {attempt}/{attempts} failed: {err}"),
        }
        if attempt < attempts {
            sleep(delay).await;
        }
    }
    Err(RegistrationExhausted { attempts })
}
