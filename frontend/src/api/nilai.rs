use serde_json::json;

use crate::api::client::ApiClient;
use crate::api::types::{ApiError, Nilai, UpsertNilaiRequest};
use crate::utils::grade;

impl ApiClient {
    pub async fn list_nilai(
        &self,
        jadwal_id: Option<&str>,
        mahasiswa_id: Option<&str>,
    ) -> Result<Vec<Nilai>, ApiError> {
        let mut query = Vec::new();
        if let Some(id) = jadwal_id {
            query.push(("jadwal_id", id.to_string()));
        }
        if let Some(id) = mahasiswa_id {
            query.push(("mahasiswa_id", id.to_string()));
        }
        let value = self.get_value("/nilai", &query).await?;
        Self::decode_list(value)
    }

    /// Component scores are validated client-side; the backend computes and
    /// returns the weighted final score and letter grade.
    pub async fn upsert_nilai(&self, request: &UpsertNilaiRequest) -> Result<Nilai, ApiError> {
        for komponen in [request.tugas, request.uts, request.uas] {
            if !grade::komponen_valid(komponen) {
                return Err(ApiError::validation("Nilai komponen harus berada pada rentang 0-100"));
            }
        }
        let body = serde_json::to_value(request).map_err(ApiError::parse)?;
        let value = self.put_json("/nilai", body).await?;
        Self::decode(value)
    }

    /// Finalization is refused with 409 outside the grading period; the
    /// caller maps that to a friendly message.
    pub async fn finalisasi_nilai(&self, id: &str) -> Result<Nilai, ApiError> {
        let value = self
            .put_json(&format!("/nilai/{}/finalisasi", id), json!({}))
            .await?;
        Self::decode(value)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn nilai_body() -> serde_json::Value {
        json!({
            "id": "n-1",
            "mahasiswa_id": "u-mhs-1",
            "mahasiswa_nama": "Agus Pratama",
            "nim": "210001",
            "jadwal_id": "j-1",
            "tugas": 85.0,
            "uts": 78.0,
            "uas": 82.0,
            "nilai_akhir": 81.7,
            "nilai_huruf": "A-",
            "is_final": false
        })
    }

    #[tokio::test]
    async fn upsert_rejects_out_of_range_component_without_network() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/api/nilai");
            then.status(200).json_body(nilai_body());
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client
            .upsert_nilai(&UpsertNilaiRequest {
                mahasiswa_id: "u-mhs-1".into(),
                jadwal_id: "j-1".into(),
                tugas: 101.0,
                uts: 80.0,
                uas: 80.0,
            })
            .await
            .unwrap_err();
        assert!(err.message.contains("0-100"));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn upsert_returns_backend_computed_grade() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/api/nilai").json_body(json!({
                "mahasiswa_id": "u-mhs-1",
                "jadwal_id": "j-1",
                "tugas": 85.0,
                "uts": 78.0,
                "uas": 82.0
            }));
            then.status(200).json_body(nilai_body());
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let nilai = client
            .upsert_nilai(&UpsertNilaiRequest {
                mahasiswa_id: "u-mhs-1".into(),
                jadwal_id: "j-1".into(),
                tugas: 85.0,
                uts: 78.0,
                uas: 82.0,
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(nilai.nilai_akhir, Some(81.7));
    }

    #[tokio::test]
    async fn finalize_conflict_surfaces_as_409() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path("/api/nilai/n-1/finalisasi");
            then.status(409)
                .json_body(json!({ "message": "Periode penilaian sudah ditutup" }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client.finalisasi_nilai("n-1").await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.user_message(), "Periode penilaian sudah ditutup");
    }
}
