use std::time::Duration;

use accessable_shared::{osrm, RouteResult, RoutingBackendError, WaypointList};

/// HTTP client for an OSRM-compatible routing backend.
#[derive(Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        OsrmClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One pedestrian route through `waypoints`, bounded by the configured timeout.
    pub async fn route(
        &self,
        waypoints: &WaypointList,
    ) -> Result<RouteResult, RoutingBackendError> {
        let url = osrm::route_url(&self.base_url, waypoints);
        tracing::debug!(waypoints = waypoints.len(), %url, "requesting route");

        let exchange = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| RoutingBackendError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| RoutingBackendError::Transport(e.to_string()))?;
            Ok::<_, RoutingBackendError>((status, body))
        };

        let result = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok((status, body))) => osrm::classify_response(status, &body),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(RoutingBackendError::Timeout {
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match &result {
            Ok(route) => tracing::debug!(
                points = route.geometry.len(),
                steps = route.instructions.len(),
                "route resolved"
            ),
            Err(err) => tracing::warn!(error = %err, "routing backend failed"),
        }
        result
    }
}
