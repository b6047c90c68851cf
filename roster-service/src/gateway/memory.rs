// In-memory user gateway
// Mirrors the placeholder backend: writes are acknowledged but never persisted.

use crate::gateway::{GatewayError, GatewayOperation, GatewayResult, UserGateway};
use crate::models::{EchoedUser, NewUser, UserRecord};

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// A gateway that serves a fixed list and records every call made to it.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    users: Vec<UserRecord>,
    echo_id: Option<u64>,
    failing: Mutex<HashSet<GatewayOperation>>,
    calls: Mutex<Vec<GatewayOperation>>,
}

impl InMemoryGateway {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    /// Id returned by `create`, like a canned server response
    pub fn with_echo_id(mut self, id: Option<u64>) -> Self {
        self.echo_id = id;
        self
    }

    /// Make the given operation fail with HTTP 503
    pub fn failing(mut self, operation: GatewayOperation) -> Self {
        self.failing.get_mut().insert(operation);
        self
    }

    pub async fn set_failing(&self, operation: GatewayOperation, failing: bool) {
        let mut set = self.failing.lock().await;
        if failing {
            set.insert(operation);
        } else {
            set.remove(&operation);
        }
    }

    /// Operations received so far, in call order
    pub async fn calls(&self) -> Vec<GatewayOperation> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, operation: GatewayOperation) -> GatewayResult<()> {
        self.calls.lock().await.push(operation);
        if self.failing.lock().await.contains(&operation) {
            return Err(GatewayError::Status {
                operation,
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserGateway for InMemoryGateway {
    async fn list(&self) -> GatewayResult<Vec<UserRecord>> {
        self.record(GatewayOperation::List).await?;
        Ok(self.users.clone())
    }

    async fn create(&self, user: &NewUser) -> GatewayResult<EchoedUser> {
        self.record(GatewayOperation::Create).await?;
        Ok(EchoedUser {
            id: self.echo_id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        })
    }

    async fn update(&self, _id: u64, _user: &UserRecord) -> GatewayResult<()> {
        self.record(GatewayOperation::Update).await
    }

    async fn delete(&self, _id: u64) -> GatewayResult<()> {
        self.record(GatewayOperation::Delete).await
    }
}
