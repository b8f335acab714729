use reqwest::Method;

use crate::api::client::{ApiClient, Payload};
use crate::api::types::{ApiError, MateriKuliah, MateriUploadMeta};
use crate::utils::upload::{self, UploadPayload};

impl ApiClient {
    pub async fn list_materi(&self, jadwal_id: Option<&str>) -> Result<Vec<MateriKuliah>, ApiError> {
        let mut query = Vec::new();
        if let Some(id) = jadwal_id {
            query.push(("jadwal_id", id.to_string()));
        }
        let value = self.get_value("/materi-kuliah", &query).await?;
        Self::decode_list(value)
    }

    /// Materi accepts presentation formats on top of the document set, with
    /// a 15 MB ceiling.
    pub async fn upload_materi(
        &self,
        meta: &MateriUploadMeta,
        file: UploadPayload,
    ) -> Result<MateriKuliah, ApiError> {
        upload::UploadRule::materi().check(&file.file_name, &file.mime_type, file.bytes.len() as u64)?;
        let meta = serde_json::to_value(meta).map_err(ApiError::parse)?;
        let value = self
            .execute(
                Method::POST,
                "/materi-kuliah",
                &[],
                Payload::Multipart { meta, file },
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_materi(&self, id: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &format!("/materi-kuliah/{}", id),
            &[],
            Payload::None,
        )
        .await
        .map(|_| ())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn upload_sends_meta_fields_and_file_part() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/materi-kuliah")
                .body_contains("pertemuan-2.pptx");
            then.status(201).json_body(json!({
                "id": "m-2",
                "judul": "Struktur Data",
                "jadwal_id": "j-1",
                "nama_matkul": "Algoritma dan Pemrograman",
                "file_name": "pertemuan-2.pptx",
                "dosen_nama": "Budi Santoso, M.Kom",
                "created_at": "2025-09-08T08:00:00Z"
            }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let materi = client
            .upload_materi(
                &MateriUploadMeta {
                    judul: "Struktur Data".into(),
                    deskripsi: None,
                    jadwal_id: "j-1".into(),
                },
                UploadPayload {
                    file_name: "pertemuan-2.pptx".into(),
                    mime_type:
                        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
                            .into(),
                    bytes: vec![1, 2, 3],
                },
            )
            .await
            .unwrap();
        mock.assert();
        assert_eq!(materi.id, "m-2");
    }

    #[tokio::test]
    async fn presentation_mime_is_rejected_for_dokumen_but_not_materi() {
        // Same bytes, different rule set.
        let rule_err = upload::UploadRule::dokumen()
            .check("slide.pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation", 100)
            .unwrap_err();
        assert!(rule_err.message.contains("tidak diizinkan"));
        assert!(upload::UploadRule::materi()
            .check("slide.pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation", 100)
            .is_ok());
    }
}
