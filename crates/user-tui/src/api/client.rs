use reqwest::{Client, StatusCode};
use user_shared::{
    api::{
        CreateUserRequest, DbStateResponse, DeleteUserResponse, ErrorResponse, HealthResponse,
        UpdateUserRequest,
    },
    User,
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Pull the `error` field out of a failure body, falling back to the raw text.
    async fn error_message(response: reqwest::Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or(text)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(ApiError::Network)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ApiError::Validation(Self::error_message(response).await))
            }
            StatusCode::CONFLICT => Err(ApiError::Conflict(Self::error_message(response).await)),
            _ => {
                let message = Self::error_message(response).await;
                Err(ApiError::Server(format!("{}: {}", status, message)))
            }
        }
    }

    // ============ Diagnostics ============

    /// Health is reported in the body for both healthy and degraded servers.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.url("/health")).send().await?;
        match response.status() {
            StatusCode::OK | StatusCode::SERVICE_UNAVAILABLE => {
                response.json().await.map_err(ApiError::Network)
            }
            _ => self.handle_response(response).await,
        }
    }

    pub async fn db_state(&self) -> Result<DbStateResponse, ApiError> {
        let response = self.client.get(self.url("/dbstate")).send().await?;
        self.handle_response(response).await
    }

    // ============ Users ============

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self.client.get(self.url("/users")).send().await?;
        self.handle_response(response).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/users/{}", id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<User, ApiError> {
        let response = self.client.post(self.url("/users")).json(req).send().await?;
        self.handle_response(response).await
    }

    pub async fn update_user(&self, id: Uuid, req: &UpdateUserRequest) -> Result<User, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/users/{}", id)))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{}", id)))
            .send()
            .await?;
        let _: DeleteUserResponse = self.handle_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;

    fn create_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn crud_against_live_server() {
        let api = ApiClient::new(&spawn_server().await);

        let ann = api.create_user(&create_request("Ann", "ann@x.com")).await.unwrap();
        assert_eq!(api.list_users().await.unwrap(), vec![ann.clone()]);

        let anna = api
            .update_user(
                ann.id,
                &UpdateUserRequest {
                    name: "Anna".to_string(),
                    email: "ann@x.com".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(anna.id, ann.id);
        assert_eq!(api.get_user(ann.id).await.unwrap().name, "Anna");

        api.delete_user(ann.id).await.unwrap();
        assert!(api.list_users().await.unwrap().is_empty());
        assert!(matches!(api.delete_user(ann.id).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn maps_failures_to_error_variants() {
        let api = ApiClient::new(&format!("{}/", spawn_server().await));

        let err = api.create_user(&create_request("", "")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref msg) if msg == "name and email required"));

        api.create_user(&create_request("Ann", "ann@x.com")).await.unwrap();
        let err = api.create_user(&create_request("Ann", "ann@x.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");

        assert!(matches!(api.get_user(Uuid::new_v4()).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn reports_health_and_db_state() {
        let api = ApiClient::new(&spawn_server().await);

        assert_eq!(api.health().await.unwrap().status, "ok");
        assert_eq!(api.db_state().await.unwrap().ready_state, 1);
    }
}
