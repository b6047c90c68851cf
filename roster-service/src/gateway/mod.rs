// Remote User Gateway
// The four REST calls against `{API_ROOT}/users`. The gateway never touches local state.

pub mod http;
pub mod memory;

pub use http::HttpUserGateway;
pub use memory::InMemoryGateway;

use crate::models::{EchoedUser, NewUser, UserRecord};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The remote operation a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayOperation::List => write!(f, "list users"),
            GatewayOperation::Create => write!(f, "create user"),
            GatewayOperation::Update => write!(f, "update user"),
            GatewayOperation::Delete => write!(f, "delete user"),
        }
    }
}

/// Network failures. Every variant that carries an operation is non-fatal
/// for the session and surfaces as a dismissible banner.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation} failed: {source}")]
    Transport {
        operation: GatewayOperation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed with HTTP status {status}")]
    Status {
        operation: GatewayOperation,
        status: u16,
    },

    #[error("{operation} returned an unreadable body: {message}")]
    Decode {
        operation: GatewayOperation,
        message: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GatewayError {
    /// The operation that failed, if the failure came from a request
    pub fn operation(&self) -> Option<GatewayOperation> {
        match self {
            GatewayError::Transport { operation, .. }
            | GatewayError::Status { operation, .. }
            | GatewayError::Decode { operation, .. } => Some(*operation),
            GatewayError::Client(_) => None,
        }
    }
}

#[async_trait]
pub trait UserGateway: Send + Sync {
    /// `GET {API_ROOT}/users`
    async fn list(&self) -> GatewayResult<Vec<UserRecord>>;

    /// `POST {API_ROOT}/users`; the echoed id is only a hint
    async fn create(&self, user: &NewUser) -> GatewayResult<EchoedUser>;

    /// `PUT {API_ROOT}/users/{id}` with the full record
    async fn update(&self, id: u64, user: &UserRecord) -> GatewayResult<()>;

    /// `DELETE {API_ROOT}/users/{id}`
    async fn delete(&self, id: u64) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_operation() {
        let err = GatewayError::Status {
            operation: GatewayOperation::Delete,
            status: 500,
        };
        assert_eq!(err.operation(), Some(GatewayOperation::Delete));
        assert_eq!(err.to_string(), "delete user failed with HTTP status 500");
    }
}
