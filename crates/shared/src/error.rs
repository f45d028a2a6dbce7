use thiserror::Error;

/// Failure of a single route request against the routing backend.
///
/// Every variant is transient from the session's point of view: it is shown to
/// the user and the next input change (or an explicit retry) issues a new
/// request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingBackendError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("routing backend unreachable: {0}")]
    Transport(String),

    /// Non-success HTTP status without a usable error body.
    #[error("routing backend returned HTTP {status}")]
    Status { status: u16 },

    /// The backend answered but refused to route (e.g. `NoRoute`, `InvalidQuery`).
    #[error("routing backend rejected the request ({code}): {message}")]
    Rejected { code: String, message: String },

    /// A response arrived but carried no drawable path.
    #[error("routing backend returned no usable route geometry")]
    MissingGeometry,

    /// The body could not be decoded.
    #[error("invalid routing backend response: {0}")]
    InvalidResponse(String),

    /// The request exceeded the configured bound.
    #[error("routing backend did not answer within {millis} ms")]
    Timeout { millis: u64 },
}

impl RoutingBackendError {
    /// Stable machine-readable tag, carried across the GraphQL hop.
    pub fn code(&self) -> &'static str {
        match self {
            RoutingBackendError::Transport(_) => "ROUTING_TRANSPORT",
            RoutingBackendError::Status { .. } => "ROUTING_STATUS",
            RoutingBackendError::Rejected { .. } => "ROUTING_REJECTED",
            RoutingBackendError::MissingGeometry => "ROUTING_NO_GEOMETRY",
            RoutingBackendError::InvalidResponse(_) => "ROUTING_INVALID_RESPONSE",
            RoutingBackendError::Timeout { .. } => "ROUTING_TIMEOUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaypointError {
    #[error("a route needs at least two waypoints, got {0}")]
    TooFew(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
