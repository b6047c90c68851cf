// HTTP implementation of the user gateway, backed by reqwest

use crate::config::RosterConfig;
use crate::gateway::{GatewayError, GatewayOperation, GatewayResult, UserGateway};
use crate::models::{EchoedUser, NewUser, UserRecord};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Talks to `{API_ROOT}/users` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserGateway {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpUserGateway {
    pub fn new(api_root: &str, timeout: Duration) -> GatewayResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            base_url: api_root.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &RosterConfig) -> GatewayResult<Self> {
        Self::new(&config.api_root, config.request_timeout())
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    /// Send a request and turn transport failures and non-2xx statuses into gateway errors
    async fn send(
        &self,
        operation: GatewayOperation,
        request: reqwest::RequestBuilder,
    ) -> GatewayResult<reqwest::Response> {
        let start = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(
                    %operation,
                    error = %source,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "request failed"
                );
                return Err(GatewayError::Transport { operation, source });
            }
        };

        let status = response.status();
        debug!(
            %operation,
            url = %response.url(),
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "response received"
        );

        if !status.is_success() {
            warn!(%operation, status = status.as_u16(), "server returned an error status");
            return Err(GatewayError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        operation: GatewayOperation,
        response: reqwest::Response,
    ) -> GatewayResult<T> {
        let body = response
            .text()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(%operation, error = %e, "response body could not be decoded");
            GatewayError::Decode {
                operation,
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl UserGateway for HttpUserGateway {
    async fn list(&self) -> GatewayResult<Vec<UserRecord>> {
        let operation = GatewayOperation::List;
        let response = self
            .send(operation, self.http_client.get(self.users_url()))
            .await?;
        Self::decode(operation, response).await
    }

    async fn create(&self, user: &NewUser) -> GatewayResult<EchoedUser> {
        let operation = GatewayOperation::Create;
        let response = self
            .send(operation, self.http_client.post(self.users_url()).json(user))
            .await?;
        Self::decode(operation, response).await
    }

    async fn update(&self, id: u64, user: &UserRecord) -> GatewayResult<()> {
        self.send(
            GatewayOperation::Update,
            self.http_client.put(self.user_url(id)).json(user),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> GatewayResult<()> {
        self.send(
            GatewayOperation::Delete,
            self.http_client.delete(self.user_url(id)),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway(server: &MockServer) -> HttpUserGateway {
        HttpUserGateway::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let gateway =
            HttpUserGateway::new("https://api.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.users_url(), "https://api.example.com/users");
    }

    #[tokio::test]
    async fn test_list_users() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(200).json_body(json!([
                    { "id": 1, "name": "Alice", "email": "alice@example.com", "phone": "1", "username": "al" },
                    { "id": 2, "name": "Bob", "email": "bob@example.com", "phone": "2" }
                ]));
            })
            .await;

        let users = gateway(&server).list().await.unwrap();

        mock.assert_async().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0], UserRecord::new(1, "Alice", "alice@example.com", "1"));
    }

    #[tokio::test]
    async fn test_list_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(503);
            })
            .await;

        let err = gateway(&server).list().await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Status {
                operation: GatewayOperation::List,
                status: 503
            }
        ));
    }

    #[tokio::test]
    async fn test_list_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(200).body("not json");
            })
            .await;

        let err = gateway(&server).list().await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode { .. }));
        assert_eq!(err.operation(), Some(GatewayOperation::List));
    }

    #[tokio::test]
    async fn test_create_posts_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/users")
                    .json_body(json!({ "name": "Ann", "email": "ann@example.com", "phone": "9" }));
                then.status(201)
                    .json_body(json!({ "id": 11, "name": "Ann", "email": "ann@example.com", "phone": "9" }));
            })
            .await;

        let echo = gateway(&server)
            .create(&NewUser::new("Ann", "ann@example.com", "9"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(echo.id, Some(11));
    }

    #[tokio::test]
    async fn test_update_puts_full_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/users/3").json_body(
                    json!({ "id": 3, "name": "Cy", "email": "cy@example.com", "phone": "3" }),
                );
                then.status(200).json_body(json!({ "id": 3 }));
            })
            .await;

        gateway(&server)
            .update(3, &UserRecord::new(3, "Cy", "cy@example.com", "3"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_failure_reports_operation() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/users/4");
                then.status(404);
            })
            .await;

        let err = gateway(&server).delete(4).await.unwrap_err();
        assert_eq!(err.operation(), Some(GatewayOperation::Delete));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on port 9 on the loopback interface
        let gateway = HttpUserGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = gateway.list().await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport { .. }));
    }
}
