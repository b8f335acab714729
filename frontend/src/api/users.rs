use reqwest::Method;

use crate::api::client::{ApiClient, Payload};
use crate::api::types::{ApiError, CreateUserRequest, Role, UpdateUserRequest, UserProfile};

impl ApiClient {
    pub async fn list_users(&self, role: Option<Role>) -> Result<Vec<UserProfile>, ApiError> {
        let mut query = Vec::new();
        if let Some(role) = role {
            let wire = serde_json::to_value(role)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            query.push(("role", wire));
        }
        let value = self.get_value("/users", &query).await?;
        Self::decode_list(value)
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<UserProfile, ApiError> {
        let body = serde_json::to_value(request).map_err(ApiError::parse)?;
        let value = self.post_json("/users", body).await?;
        Self::decode(value)
    }

    pub async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        let body = serde_json::to_value(request).map_err(ApiError::parse)?;
        let value = self.put_json(&format!("/users/{}", id), body).await?;
        Self::decode(value)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/users/{}", id), &[], Payload::None)
            .await
            .map(|_| ())
    }

    /// Role list as the backend knows it. The UI keeps its own `Role` enum;
    /// unknown entries from a newer backend are skipped rather than failing
    /// the whole page.
    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        let value = self.get_value("/roles", &[]).await?;
        let raw: Vec<serde_json::Value> = Self::decode_list(value)?;
        Ok(raw
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_users_passes_role_filter_and_unwraps_envelope() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/users")
                .query_param("role", "dosen");
            then.status(200).json_body(json!({ "data": [{
                "id": "u-1",
                "nama": "Budi Santoso",
                "email": "budi@univ.ac.id",
                "role": "dosen",
                "nidn": "0011028501"
            }]}));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let users = client.list_users(Some(Role::Dosen)).await.unwrap();
        mock.assert();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Dosen);
        assert_eq!(users[0].nidn.as_deref(), Some("0011028501"));
    }

    #[tokio::test]
    async fn create_user_omits_empty_optional_fields() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/users").json_body(json!({
                "nama": "Siti",
                "email": "siti@student.univ.ac.id",
                "password": "rahasia",
                "role": "mahasiswa",
                "nim": "210002"
            }));
            then.status(201).json_body(json!({
                "id": "u-baru",
                "nama": "Siti",
                "email": "siti@student.univ.ac.id",
                "role": "mahasiswa",
                "nim": "210002"
            }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let created = client
            .create_user(&CreateUserRequest {
                nama: "Siti".into(),
                email: "siti@student.univ.ac.id".into(),
                password: "rahasia".into(),
                role: Role::Mahasiswa,
                nim: Some("210002".into()),
                nidn: None,
                fakultas_id: None,
                prodi_id: None,
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(created.id, "u-baru");
    }

    #[tokio::test]
    async fn unknown_roles_from_the_backend_are_skipped() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/roles");
            then.status(200)
                .json_body(json!({ "data": ["mahasiswa", "rektor", "dosen"] }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let roles = client.list_roles().await.unwrap();
        assert_eq!(roles, vec![Role::Mahasiswa, Role::Dosen]);
    }

    #[tokio::test]
    async fn delete_user_hits_resource_path() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/users/u-9");
            then.status(204);
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        client.delete_user("u-9").await.unwrap();
        mock.assert();
    }
}
