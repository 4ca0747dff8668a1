//! JSON-over-HTTP contract with the deprovisioning backend.
//!
//! Two endpoints only: `POST /test-connections` and `POST /deprovision`.
//! Everything server-side (directory integration, password generation,
//! session auth) is an external collaborator behind this contract.

use crate::actions::ActionSelection;
use crate::log::Severity;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestConnectionsRequest<'a> {
    ad_username: &'a str,
    ad_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeprovisionRequest<'a> {
    user_email: &'a str,
    actions: &'a ActionSelection,
    ad_username: &'a str,
    ad_password: &'a str,
}

/// One server-reported step result, replayed into the operator log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    pub status: Severity,
}

/// The four subsystems a connection test covers. An explicit enumeration so
/// the "n/4" summary is derived from the contract, not a magic constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Graph,
    Directory,
    ServiceAccount,
    OrgUnit,
}

impl Subsystem {
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Graph,
        Subsystem::Directory,
        Subsystem::ServiceAccount,
        Subsystem::OrgUnit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subsystem::Graph => "Graph API",
            Subsystem::Directory => "Directory bind",
            Subsystem::ServiceAccount => "Service credentials",
            Subsystem::OrgUnit => "Organizational unit",
        }
    }

    pub fn ok_text(&self) -> &'static str {
        match self {
            Subsystem::Graph => "Connected via user session",
            Subsystem::Directory => "Connected successfully",
            Subsystem::ServiceAccount => "Credentials valid",
            Subsystem::OrgUnit => "OU accessible",
        }
    }

    pub fn fail_text(&self) -> &'static str {
        match self {
            Subsystem::Graph => "Session expired",
            Subsystem::Directory => "Authentication failed",
            Subsystem::ServiceAccount => "Invalid credentials",
            Subsystem::OrgUnit => "OU not found",
        }
    }
}

/// Response body of `POST /test-connections`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionTestResult {
    pub graph: bool,
    pub ad: bool,
    pub service: bool,
    pub ou: bool,
    #[serde(default)]
    pub messages: Vec<StatusMessage>,
}

impl ConnectionTestResult {
    /// Per-subsystem outcomes in display order.
    pub fn checks(&self) -> [(Subsystem, bool); 4] {
        [
            (Subsystem::Graph, self.graph),
            (Subsystem::Directory, self.ad),
            (Subsystem::ServiceAccount, self.service),
            (Subsystem::OrgUnit, self.ou),
        ]
    }

    pub fn success_count(&self) -> usize {
        self.checks().iter().filter(|(_, ok)| *ok).count()
    }

    pub fn total(&self) -> usize {
        self.checks().len()
    }
}

/// Response body of `POST /deprovision`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeprovisionOutcome {
    pub results: Vec<StatusMessage>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 401. The session cookie died; nothing else of the response is
    /// read and the console must be restarted after a fresh login.
    #[error("authentication session expired")]
    SessionExpired,
    /// The server answered with an `error` field, or with a 2xx body that
    /// does not match the contract.
    #[error("{0}")]
    Server(String),
    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

/// Seam between the controller and the network. The controller is generic
/// over this so tests can script responses without a server.
pub trait ApiClient {
    fn test_connections(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<ConnectionTestResult, ApiError>>;

    fn deprovision(
        &self,
        email: &str,
        actions: &ActionSelection,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<DeprovisionOutcome, ApiError>>;
}

/// Map a finished HTTP exchange to the typed contract. 401 short-circuits
/// before the body is touched.
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::SessionExpired);
    }
    if status.is_success() {
        return serde_json::from_str(body)
            .map_err(|err| ApiError::Server(format!("unexpected response from server: {err}")));
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("request failed with status {status}"));
    Err(ApiError::Server(message))
}

/// Production client. Shares a cookie store with the backend session the
/// operator established in the browser-facing login flow.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid base URL: {base_url}"))?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Transport(format!("bad endpoint path {path}: {err}")))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        decode(status, &body)
    }
}

impl ApiClient for HttpApiClient {
    async fn test_connections(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ConnectionTestResult, ApiError> {
        self.post(
            "test-connections",
            &TestConnectionsRequest {
                ad_username: username,
                ad_password: password,
            },
        )
        .await
    }

    async fn deprovision(
        &self,
        email: &str,
        actions: &ActionSelection,
        username: &str,
        password: &str,
    ) -> Result<DeprovisionOutcome, ApiError> {
        self.post(
            "deprovision",
            &DeprovisionRequest {
                user_email: email,
                actions,
                ad_username: username,
                ad_password: password,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_short_circuits_without_reading_the_body() {
        let result: Result<ConnectionTestResult, _> =
            decode(StatusCode::UNAUTHORIZED, "this is not even json");
        assert_eq!(result.unwrap_err(), ApiError::SessionExpired);
    }

    #[test]
    fn successful_test_response_parses_with_optional_messages() {
        let body = r#"{"graph": true, "ad": false, "service": false, "ou": true}"#;
        let result: ConnectionTestResult = decode(StatusCode::OK, body).unwrap();
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.total(), 4);
        assert!(result.messages.is_empty());

        let body = r#"{
            "graph": true, "ad": true, "service": true, "ou": true,
            "messages": [{"message": "bind ok", "status": "success"}]
        }"#;
        let result: ConnectionTestResult = decode(StatusCode::OK, body).unwrap();
        assert_eq!(result.success_count(), 4);
        assert_eq!(result.messages[0].status, Severity::Success);
    }

    #[test]
    fn server_error_body_is_surfaced() {
        let result: Result<DeprovisionOutcome, _> = decode(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "directory unavailable"}"#,
        );
        assert_eq!(result.unwrap_err(), ApiError::Server("directory unavailable".into()));
    }

    #[test]
    fn error_status_without_body_still_reports_the_status() {
        let result: Result<DeprovisionOutcome, _> = decode(StatusCode::BAD_GATEWAY, "");
        match result.unwrap_err() {
            ApiError::Server(message) => assert!(message.contains("502")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn success_without_results_is_a_server_error() {
        let result: Result<DeprovisionOutcome, _> = decode(StatusCode::OK, r#"{"password": "x"}"#);
        assert!(matches!(result.unwrap_err(), ApiError::Server(_)));
    }

    #[test]
    fn deprovision_outcome_parses_password_when_present() {
        let body = r#"{
            "results": [{"message": "Account disabled", "status": "success"}],
            "password": "Xk9!mQ2z"
        }"#;
        let outcome: DeprovisionOutcome = decode(StatusCode::OK, body).unwrap();
        assert_eq!(outcome.password.as_deref(), Some("Xk9!mQ2z"));
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn request_payloads_use_the_wire_field_names() {
        let creds = TestConnectionsRequest {
            ad_username: "admin",
            ad_password: "hunter22",
        };
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(value["adUsername"], "admin");
        assert_eq!(value["adPassword"], "hunter22");

        let selection = ActionSelection::default();
        let request = DeprovisionRequest {
            user_email: "jane@example.com",
            actions: &selection,
            ad_username: "admin",
            ad_password: "hunter22",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["userEmail"], "jane@example.com");
        assert_eq!(value["actions"]["adActions"], true);
    }
}
