use std::rc::Rc;

use crate::api::types::{ApiError, JadwalKuliah, Nilai, UpsertNilaiRequest};
use crate::api::ApiClient;

#[derive(Clone)]
pub struct NilaiRepository {
    client: Rc<ApiClient>,
}

impl NilaiRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    /// Courses taught by the lecturer, used to pick which class to grade.
    pub async fn list_kelas(&self, dosen_id: &str) -> Result<Vec<JadwalKuliah>, ApiError> {
        self.client.list_jadwal_kuliah(Some(dosen_id)).await
    }

    pub async fn list(&self, jadwal_id: &str) -> Result<Vec<Nilai>, ApiError> {
        self.client.list_nilai(Some(jadwal_id), None).await
    }

    pub async fn upsert(&self, request: UpsertNilaiRequest) -> Result<Nilai, ApiError> {
        self.client.upsert_nilai(&request).await
    }

    pub async fn finalize(&self, id: &str) -> Result<Nilai, ApiError> {
        self.client.finalisasi_nilai(id).await
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_scopes_to_the_selected_class() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/nilai")
                .query_param("jadwal_id", "j-1");
            then.status(200).json_body(json!({ "data": [] }));
        });

        let repo = NilaiRepository::new(ApiClient::new_with_base_url(server.url("/api")));
        repo.list("j-1").await.unwrap();
        mock.assert();
    }

    // A failed class-list fetch must reach the page as an error, not as an
    // empty class dropdown.
    #[tokio::test]
    async fn failed_class_list_propagates_the_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/jadwal-kuliah")
                .query_param("dosen_id", "u-dosen-1");
            then.status(500)
                .json_body(json!({ "message": "basis data tidak tersedia" }));
        });

        let repo = NilaiRepository::new(ApiClient::new_with_base_url(server.url("/api")));
        let err = repo.list_kelas("u-dosen-1").await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(err.message, "basis data tidak tersedia");
    }
}
