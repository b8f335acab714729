use reqwest::Method;

use crate::api::client::{ApiClient, Payload};
use crate::api::types::{ApiError, CreateJadwalRequest, JadwalKuliah, JadwalUjian};

impl ApiClient {
    pub async fn list_jadwal_kuliah(
        &self,
        dosen_id: Option<&str>,
    ) -> Result<Vec<JadwalKuliah>, ApiError> {
        let mut query = Vec::new();
        if let Some(id) = dosen_id {
            query.push(("dosen_id", id.to_string()));
        }
        let value = self.get_value("/jadwal-kuliah", &query).await?;
        Self::decode_list(value)
    }

    pub async fn create_jadwal(&self, request: &CreateJadwalRequest) -> Result<JadwalKuliah, ApiError> {
        let body = serde_json::to_value(request).map_err(ApiError::parse)?;
        let value = self.post_json("/jadwal-kuliah", body).await?;
        Self::decode(value)
    }

    pub async fn delete_jadwal(&self, id: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &format!("/jadwal-kuliah/{}", id),
            &[],
            Payload::None,
        )
        .await
        .map(|_| ())
    }

    pub async fn list_jadwal_ujian(&self) -> Result<Vec<JadwalUjian>, ApiError> {
        let value = self.get_value("/jadwal-ujian", &[]).await?;
        Self::decode_list(value)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn dosen_filter_narrows_the_course_list() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/jadwal-kuliah")
                .query_param("dosen_id", "u-dosen-1");
            then.status(200).json_body(json!({ "data": [{
                "id": "j-1",
                "kode_matkul": "IF101",
                "nama_matkul": "Algoritma dan Pemrograman",
                "sks": 3,
                "dosen_id": "u-dosen-1",
                "dosen_nama": "Budi Santoso, M.Kom",
                "ruangan": "R-201",
                "hari": "Senin",
                "jam_mulai": "08:00",
                "jam_selesai": "10:30",
                "tahun_akademik_id": "ta-2"
            }]}));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let jadwal = client.list_jadwal_kuliah(Some("u-dosen-1")).await.unwrap();
        mock.assert();
        assert_eq!(jadwal[0].kode_matkul, "IF101");
    }

    #[tokio::test]
    async fn exam_schedule_parses_dates() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/jadwal-ujian");
            then.status(200).json_body(json!({ "data": [{
                "id": "uj-1",
                "jadwal_id": "j-1",
                "nama_matkul": "Algoritma dan Pemrograman",
                "jenis": "UTS",
                "tanggal": "2025-10-20",
                "jam_mulai": "08:00",
                "jam_selesai": "10:00",
                "ruangan": "R-201"
            }]}));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let ujian = client.list_jadwal_ujian().await.unwrap();
        assert_eq!(ujian[0].tanggal.to_string(), "2025-10-20");
    }
}
