use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

use crate::api::fixture::FixtureStore;
use crate::api::types::{ApiError, ErrorBody};
use crate::config::{self, ApiBackend};
use crate::utils::storage;
use crate::utils::upload::UploadPayload;

/// Where requests go. `Remote(None)` resolves the base URL from the runtime
/// configuration on each call; `Fixture` routes everything to the seeded
/// in-memory store. The choice is made explicitly at construction time,
/// never by sniffing network failures.
#[derive(Clone)]
pub enum Backend {
    Remote(Option<String>),
    Fixture(Rc<FixtureStore>),
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    backend: Backend,
}

/// Request body variants the transport funnel understands.
pub(crate) enum Payload {
    None,
    Json(Value),
    /// Multipart upload: plain form fields plus one `file` part. The file
    /// has already passed client-side validation by the time it gets here.
    Multipart {
        meta: Value,
        file: UploadPayload,
    },
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Backend chosen from startup configuration: a configured base URL
    /// means REST, none means the demo fixture store.
    pub fn new() -> Self {
        let backend = match config::backend() {
            ApiBackend::Remote(url) => Backend::Remote(Some(url)),
            ApiBackend::Fixture => Backend::Fixture(crate::api::fixture::shared()),
        };
        Self {
            http: Client::new(),
            backend,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            backend: Backend::Remote(Some(base_url.into())),
        }
    }

    pub fn new_with_fixture(store: Rc<FixtureStore>) -> Self {
        Self {
            http: Client::new(),
            backend: Backend::Fixture(store),
        }
    }

    /// Single transport funnel. Every failure is logged here before it is
    /// returned, so no caller can drop an error without a console trace.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        payload: Payload,
    ) -> Result<Value, ApiError> {
        let result = match &self.backend {
            Backend::Fixture(store) => store.respond(&method, path, query, &payload),
            Backend::Remote(base) => {
                self.execute_remote(base.clone(), method.clone(), path, query, payload)
                    .await
            }
        };
        if let Err(err) = &result {
            log::error!("{} {} gagal: {}", method, path, err.message);
        }
        result
    }

    async fn execute_remote(
        &self,
        base: Option<String>,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        payload: Payload,
    ) -> Result<Value, ApiError> {
        let base = match base {
            Some(base) => base,
            None => match config::backend() {
                ApiBackend::Remote(url) => url,
                ApiBackend::Fixture => {
                    return Err(ApiError::request_failed("backend tidak dikonfigurasi"))
                }
            },
        };

        let mut request = self.http.request(method, format!("{}{}", base, path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = storage::get(storage::ACCESS_TOKEN_KEY) {
            let scheme = storage::get(storage::TOKEN_TYPE_KEY).unwrap_or_else(|| "Bearer".into());
            request = request.header(AUTHORIZATION, format!("{} {}", scheme, token));
        }
        match payload {
            Payload::None => {}
            Payload::Json(body) => request = request.json(&body),
            Payload::Multipart { meta, file } => {
                let mut form = reqwest::multipart::Form::new();
                if let Value::Object(fields) = meta {
                    for (name, value) in fields {
                        let text = match value {
                            Value::String(text) => text,
                            other => other.to_string(),
                        };
                        form = form.text(name, text);
                    }
                }
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime_type)
                    .map_err(|err| ApiError::validation(format!("Tipe berkas tidak valid: {}", err)))?;
                form = form.part("file", part);
                request = request.multipart(form);
            }
        }

        let response = request
            .send()
            .await
            .map_err(ApiError::request_failed)?;
        let status = response.status();
        Self::handle_unauthorized_status(status);
        let text = response.text().await.map_err(ApiError::parse)?;

        if status.is_success() {
            if text.trim().is_empty() {
                Ok(Value::Null)
            } else {
                serde_json::from_str(&text).map_err(ApiError::parse)
            }
        } else {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("Permintaan gagal dengan status {}", status.as_u16()));
            Err(ApiError::http(status.as_u16(), message))
        }
    }

    fn handle_unauthorized_status(status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            storage::clear_session();
            Self::redirect_to_login_if_needed();
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn redirect_to_login_if_needed() {
        if let Some(window) = web_sys::window() {
            let location = window.location();
            if let Ok(pathname) = location.pathname() {
                if pathname == "/login" {
                    return;
                }
            }
            let _ = location.set_href("/login");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn redirect_to_login_if_needed() {}

    pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(ApiError::parse)
    }

    /// Deserialize a list body, unwrapping the `{ "data": [...] }` envelope
    /// when present; bare arrays pass through unchanged.
    pub(crate) fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
        match value {
            Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                serde_json::from_value(data).map_err(ApiError::parse)
            }
            other => serde_json::from_value(other).map_err(ApiError::parse),
        }
    }

    pub(crate) async fn get_value(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, ApiError> {
        self.execute(Method::GET, path, query, Payload::None).await
    }

    pub(crate) async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(Method::POST, path, &[], Payload::Json(body)).await
    }

    pub(crate) async fn put_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(Method::PUT, path, &[], Payload::Json(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::DELETE, path, &[], Payload::None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_list_unwraps_data_envelope() {
        let enveloped = json!({ "data": [1, 2, 3] });
        let list: Vec<i32> = ApiClient::decode_list(enveloped).unwrap();
        assert_eq!(list, vec![1, 2, 3]);

        let bare = json!([4, 5]);
        let list: Vec<i32> = ApiClient::decode_list(bare).unwrap();
        assert_eq!(list, vec![4, 5]);
    }

    #[test]
    fn decode_list_rejects_non_list_payload() {
        let result: Result<Vec<i32>, _> = ApiClient::decode_list(json!({ "data": "oops" }));
        assert!(result.is_err());
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn non_2xx_response_becomes_typed_error_with_server_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(403)
                .json_body(json!({ "message": "akses ditolak" }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client.get_value("/users", &[]).await.unwrap_err();
        assert_eq!(err.status, Some(403));
        assert_eq!(err.message, "akses ditolak");
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn error_without_message_body_falls_back_to_generic_text() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(500).body("boom");
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client.get_value("/users", &[]).await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert!(err.message.contains("500"));
    }

    #[tokio::test]
    async fn bearer_token_from_storage_is_attached() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/users")
                .header("authorization", "Bearer tok-123");
            then.status(200).json_body(json!({ "data": [] }));
        });

        crate::utils::storage::set(crate::utils::storage::ACCESS_TOKEN_KEY, "tok-123").unwrap();
        crate::utils::storage::set(crate::utils::storage::TOKEN_TYPE_KEY, "Bearer").unwrap();
        let client = ApiClient::new_with_base_url(server.url("/api"));
        let value = client.get_value("/users", &[]).await.unwrap();
        mock.assert();
        assert_eq!(value, json!({ "data": [] }));
        crate::utils::storage::clear_session();
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(401).json_body(json!({ "message": "token kadaluarsa" }));
        });

        crate::utils::storage::set(crate::utils::storage::ACCESS_TOKEN_KEY, "stale").unwrap();
        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client.get_value("/users", &[]).await.unwrap_err();
        assert_eq!(err.status, Some(401));
        assert!(crate::utils::storage::get(crate::utils::storage::ACCESS_TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn multipart_upload_sends_fields_and_file() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/dokumen-akademik")
                .body_contains("proposal.pdf");
            then.status(201).json_body(json!({ "id": "d1" }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let value = client
            .execute(
                Method::POST,
                "/dokumen-akademik",
                &[],
                Payload::Multipart {
                    meta: json!({ "judul": "Proposal", "jenis": "proposal_skripsi" }),
                    file: UploadPayload {
                        file_name: "proposal.pdf".into(),
                        mime_type: "application/pdf".into(),
                        bytes: b"%PDF-1.4".to_vec(),
                    },
                },
            )
            .await
            .unwrap();
        mock.assert();
        assert_eq!(value, json!({ "id": "d1" }));
    }
}
