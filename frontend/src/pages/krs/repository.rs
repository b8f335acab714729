use std::rc::Rc;

use crate::api::types::{ApiError, JadwalKuliah, Krs, KrsStatus, TahunAkademik};
use crate::api::ApiClient;

#[derive(Clone)]
pub struct KrsRepository {
    client: Rc<ApiClient>,
}

impl KrsRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    /// `Ok(None)` when the student has not created a plan yet; any other
    /// failure propagates.
    pub async fn my_krs(&self) -> Result<Option<Krs>, ApiError> {
        match self.client.my_krs().await {
            Ok(krs) => Ok(Some(krs)),
            Err(err) if err.status == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn active_tahun(&self) -> Result<Option<TahunAkademik>, ApiError> {
        let tahun = self.client.list_tahun_akademik().await?;
        Ok(tahun.into_iter().find(|t| t.is_aktif))
    }

    pub async fn available_courses(&self) -> Result<Vec<JadwalKuliah>, ApiError> {
        self.client.list_jadwal_kuliah(None).await
    }

    pub async fn create(&self, tahun_akademik_id: &str) -> Result<Krs, ApiError> {
        self.client.create_krs(tahun_akademik_id).await
    }

    pub async fn add_item(&self, krs_id: &str, jadwal_id: &str) -> Result<Krs, ApiError> {
        self.client.add_krs_item(krs_id, jadwal_id).await
    }

    pub async fn remove_item(&self, krs_id: &str, item_id: &str) -> Result<Krs, ApiError> {
        self.client.remove_krs_item(krs_id, item_id).await
    }

    pub async fn submit(&self, krs_id: &str) -> Result<Krs, ApiError> {
        self.client.submit_krs(krs_id).await
    }

    pub async fn pending_queue(&self) -> Result<Vec<Krs>, ApiError> {
        self.client.list_krs(Some(KrsStatus::Submitted)).await
    }

    pub async fn approve(&self, krs_id: &str) -> Result<Krs, ApiError> {
        self.client.approve_krs(krs_id).await
    }

    pub async fn reject(&self, krs_id: &str) -> Result<Krs, ApiError> {
        self.client.reject_krs(krs_id).await
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_plan_maps_to_none() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/krs/me");
            then.status(404).json_body(json!({ "message": "KRS belum dibuat" }));
        });

        let repo = KrsRepository::new(ApiClient::new_with_base_url(server.url("/api")));
        assert!(repo.my_krs().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn active_tahun_picks_the_flagged_term()  {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/tahun-akademik");
            then.status(200).json_body(json!({ "data": [
                { "id": "ta-1", "nama": "2024/2025 Genap", "is_aktif": false },
                { "id": "ta-2", "nama": "2025/2026 Ganjil", "is_aktif": true }
            ]}));
        });

        let repo = KrsRepository::new(ApiClient::new_with_base_url(server.url("/api")));
        let aktif = repo.active_tahun().await.unwrap().unwrap();
        assert_eq!(aktif.id, "ta-2");
    }
}
