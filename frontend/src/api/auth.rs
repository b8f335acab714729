use serde_json::json;

use crate::api::client::ApiClient;
use crate::api::types::{ApiError, LoginRequest, LoginResponse, UserProfile};
use crate::utils::storage;

impl ApiClient {
    /// POST /auth/login. On success the token and profile are persisted so
    /// later requests pick up the Authorization header automatically.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let value = self
            .post_json("/auth/login", json!({
                "email": request.email,
                "password": request.password,
            }))
            .await?;
        let response: LoginResponse = Self::decode(value)?;
        storage::set(storage::ACCESS_TOKEN_KEY, &response.access_token)
            .map_err(ApiError::validation)?;
        storage::set(storage::TOKEN_TYPE_KEY, &response.token_type)
            .map_err(ApiError::validation)?;
        let user_json = serde_json::to_string(&response.user).map_err(ApiError::parse)?;
        storage::set(storage::USER_KEY, &user_json).map_err(ApiError::validation)?;
        Ok(response)
    }

    /// POST /auth/logout, then drop the local session. The server call is
    /// best-effort: the session is cleared even when it fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.post_json("/auth/logout", json!({})).await;
        storage::clear_session();
        result.map(|_| ())
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let value = self.get_value("/auth/me", &[]).await?;
        Self::decode(value)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn user_body() -> serde_json::Value {
        json!({
            "id": "u-1",
            "nama": "Agus Pratama",
            "email": "agus@student.univ.ac.id",
            "role": "mahasiswa",
            "nim": "210001"
        })
    }

    #[tokio::test]
    async fn login_persists_token_and_profile() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({ "email": "agus@student.univ.ac.id", "password": "rahasia" }));
            then.status(200).json_body(json!({
                "access_token": "tok-login",
                "token_type": "Bearer",
                "user": user_body()
            }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let response = client
            .login(&LoginRequest {
                email: "agus@student.univ.ac.id".into(),
                password: "rahasia".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.nama, "Agus Pratama");
        assert_eq!(storage::get(storage::ACCESS_TOKEN_KEY).as_deref(), Some("tok-login"));
        assert_eq!(storage::get(storage::TOKEN_TYPE_KEY).as_deref(), Some("Bearer"));
        let stored = storage::get(storage::USER_KEY).unwrap();
        assert!(stored.contains("\"nim\":\"210001\""));
        storage::clear_session();
    }

    #[tokio::test]
    async fn failed_login_keeps_storage_empty() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(json!({ "message": "Email atau kata sandi salah" }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client
            .login(&LoginRequest {
                email: "agus@student.univ.ac.id".into(),
                password: "salah".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(401));
        assert!(storage::get(storage::ACCESS_TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_server_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/logout");
            then.status(500).body("boom");
        });

        storage::set(storage::ACCESS_TOKEN_KEY, "tok").unwrap();
        storage::set(storage::USER_KEY, "{}").unwrap();
        let client = ApiClient::new_with_base_url(server.url("/api"));
        let _ = client.logout().await;
        assert!(storage::get(storage::ACCESS_TOKEN_KEY).is_none());
        assert!(storage::get(storage::USER_KEY).is_none());
    }
}
