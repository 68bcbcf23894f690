//! Error kinds surfaced by the route and BGP summary lenses
//!
//! Every failure is fail-fast: the lens stops at the first error and the
//! command layer decides the exit status.

/// Errors produced while enumerating instances, querying them, or
/// assembling their responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteviewError {
    /// Malformed display-mode, namespace, or format argument
    InvalidArgument(String),
    /// Explicit namespace that the platform does not know about
    UnknownNamespace {
        namespace: String,
        valid: Vec<String>,
    },
    /// Instance answered with an error-marked response
    QueryFailed { instance: String, message: String },
    /// Instance answered with nothing; the operation ends without output
    EmptyResponse { instance: String },
    /// Response could not be parsed as the expected JSON document
    MalformedResponse { instance: String, reason: String },
    /// BGP summary response lacks an expected field
    MissingField(String),
}

impl RouteviewError {
    /// Whether this is the benign "nothing to display" outcome
    pub fn is_empty_response(&self) -> bool {
        matches!(self, RouteviewError::EmptyResponse { .. })
    }

    /// Check whether an `anyhow` error chain ends in an empty response
    pub fn is_empty_response_err(err: &anyhow::Error) -> bool {
        err.downcast_ref::<RouteviewError>()
            .map(|e| e.is_empty_response())
            .unwrap_or(false)
    }
}

impl std::fmt::Display for RouteviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteviewError::InvalidArgument(msg) => write!(f, "{}", msg),
            RouteviewError::UnknownNamespace { namespace, valid } => write!(
                f,
                "namespace '{}' is not valid. Choose one of {}",
                namespace,
                valid.join(", ")
            ),
            RouteviewError::QueryFailed { message, .. } => write!(f, "{}", message),
            RouteviewError::EmptyResponse { instance } => {
                write!(f, "empty response from instance '{}'", instance)
            }
            RouteviewError::MalformedResponse { instance, reason } => write!(
                f,
                "malformed response from instance '{}': {}",
                instance, reason
            ),
            RouteviewError::MissingField(field) => {
                write!(f, "{} missing in the bgp_summary", field)
            }
        }
    }
}

impl std::error::Error for RouteviewError {}
