//! HTTP loading of the patient collection.
//!
//! One GET per load, no retry. Transport errors and non-2xx statuses both
//! surface as [`DashboardError::FetchFailed`]; a failed response body is
//! never parsed.

use dashboard_core::{DashboardConfig, DashboardError, PatientSnapshot};
use dashboard_records::load_collection_str;
use reqwest::{Client, RequestBuilder, StatusCode};

/// Attaches credentials to an outgoing request.
pub trait Authenticator {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// HTTP Basic credentials supplied by the host application.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Authenticator for BasicAuth {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

/// Sends requests without an authorization header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

pub struct PatientClient<A = BasicAuth> {
    http: Client,
    endpoint: String,
    auth: A,
}

impl<A: Authenticator> PatientClient<A> {
    pub fn new(endpoint: impl Into<String>, auth: A) -> Self {
        Self::with_client(Client::new(), endpoint, auth)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>, auth: A) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            auth,
        }
    }

    /// Fetch and normalize the whole collection.
    pub async fn fetch_snapshot(
        &self,
        config: &DashboardConfig,
    ) -> Result<PatientSnapshot, DashboardError> {
        log::info!("Fetching patient collection from {}", self.endpoint);

        let response = self
            .auth
            .authorize(self.http.get(&self.endpoint))
            .send()
            .await
            .map_err(|err| {
                log::error!("Patient request failed: {err}");
                DashboardError::FetchFailed(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body = response
            .text()
            .await
            .map_err(|err| DashboardError::FetchFailed(err.to_string()))?;

        snapshot_from_response(status, &body, config)
    }
}

/// Turn a completed response into a snapshot.
///
/// A non-2xx status fails without looking at `body`; a body that is not a
/// patient array is reported as a failed fetch as well.
pub fn snapshot_from_response(
    status: StatusCode,
    body: &str,
    config: &DashboardConfig,
) -> Result<PatientSnapshot, DashboardError> {
    if !status.is_success() {
        return Err(status_error(status));
    }

    load_collection_str(body, config).map_err(|err| match err {
        DashboardError::Parse(message) => {
            log::error!("Unreadable patient collection: {message}");
            DashboardError::FetchFailed(message)
        }
        other => other,
    })
}

fn status_error(status: StatusCode) -> DashboardError {
    log::error!("Patient request returned HTTP {status}");
    DashboardError::FetchFailed(format!("HTTP error, status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::ViewState;
    use dashboard_records::dashboard_for;

    const BODY: &str = r#"[{ "id": 1, "name": "Jessica Taylor" }]"#;

    #[test]
    fn server_error_is_fetch_failure_and_renders_nothing() {
        let config = DashboardConfig::default();
        let result = snapshot_from_response(StatusCode::INTERNAL_SERVER_ERROR, BODY, &config);

        assert!(matches!(result, Err(DashboardError::FetchFailed(_))));

        let state = ViewState::from_result(
            result.and_then(|snapshot| dashboard_for(&snapshot, &config)),
        );
        assert!(matches!(state, ViewState::Failed(_)));
        assert!(state.ready().is_none());
    }

    #[test]
    fn unauthorized_is_fetch_failure() {
        let result = snapshot_from_response(
            StatusCode::UNAUTHORIZED,
            BODY,
            &DashboardConfig::default(),
        );
        assert!(matches!(result, Err(DashboardError::FetchFailed(_))));
    }

    #[test]
    fn unreadable_body_is_fetch_failure() {
        let result = snapshot_from_response(
            StatusCode::OK,
            "<html>maintenance</html>",
            &DashboardConfig::default(),
        );
        assert!(matches!(result, Err(DashboardError::FetchFailed(_))));
    }

    #[test]
    fn success_loads_snapshot() {
        let snapshot =
            snapshot_from_response(StatusCode::OK, BODY, &DashboardConfig::default()).unwrap();
        assert_eq!(snapshot.patients().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_fetch_failure() {
        let client = PatientClient::new("http://127.0.0.1:9/", NoAuth);
        let result = client.fetch_snapshot(&DashboardConfig::default()).await;
        assert!(matches!(result, Err(DashboardError::FetchFailed(_))));
    }
}
