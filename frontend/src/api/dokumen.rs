use reqwest::Method;
use serde_json::json;

use crate::api::client::{ApiClient, Payload};
use crate::api::types::{ApiError, DokumenAkademik, DokumenJenis, DokumenStatus, DokumenUploadMeta};
use crate::utils::upload::{self, UploadPayload};

impl ApiClient {
    pub async fn list_dokumen(
        &self,
        status: Option<DokumenStatus>,
        jenis: Option<DokumenJenis>,
    ) -> Result<Vec<DokumenAkademik>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", wire_string(&status)?));
        }
        if let Some(jenis) = jenis {
            query.push(("jenis", wire_string(&jenis)?));
        }
        let value = self.get_value("/dokumen-akademik", &query).await?;
        Self::decode_list(value)
    }

    /// Multipart upload. The file must already satisfy the dokumen upload
    /// rule (PDF/DOC/DOCX, max 10 MB); `upload::read_file` enforces that
    /// before the bytes ever reach this call.
    pub async fn upload_dokumen(
        &self,
        meta: &DokumenUploadMeta,
        file: UploadPayload,
    ) -> Result<DokumenAkademik, ApiError> {
        upload::UploadRule::dokumen().check(&file.file_name, &file.mime_type, file.bytes.len() as u64)?;
        let meta = serde_json::to_value(meta).map_err(ApiError::parse)?;
        let value = self
            .execute(
                Method::POST,
                "/dokumen-akademik",
                &[],
                Payload::Multipart { meta, file },
            )
            .await?;
        Self::decode(value)
    }

    pub async fn approve_dokumen(&self, id: &str) -> Result<DokumenAkademik, ApiError> {
        let value = self
            .put_json(&format!("/dokumen-akademik/{}/approve", id), json!({}))
            .await?;
        Self::decode(value)
    }

    /// Rejection carries a mandatory reason.
    pub async fn reject_dokumen(
        &self,
        id: &str,
        alasan: &str,
    ) -> Result<DokumenAkademik, ApiError> {
        if alasan.trim().is_empty() {
            return Err(ApiError::validation("Alasan penolakan wajib diisi"));
        }
        let value = self
            .put_json(
                &format!("/dokumen-akademik/{}/reject", id),
                json!({ "alasan": alasan }),
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_dokumen(&self, id: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &format!("/dokumen-akademik/{}", id),
            &[],
            Payload::None,
        )
        .await
        .map(|_| ())
    }
}

fn wire_string<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_value(value)
        .map_err(ApiError::parse)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ApiError::parse("enum tanpa representasi string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_string_matches_serde_rename() {
        assert_eq!(wire_string(&DokumenStatus::Pending).unwrap(), "Pending");
        assert_eq!(
            wire_string(&DokumenJenis::ProposalSkripsi).unwrap(),
            "proposal_skripsi"
        );
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn dokumen_body(status: &str) -> serde_json::Value {
        json!({
            "id": "d-1",
            "judul": "Proposal Skripsi",
            "jenis": "proposal_skripsi",
            "file_name": "proposal.pdf",
            "pengunggah_id": "u-mhs-1",
            "pengunggah_nama": "Agus Pratama",
            "status": status,
            "created_at": "2025-08-01T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_sends_status_and_jenis_filters() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/dokumen-akademik")
                .query_param("status", "Pending")
                .query_param("jenis", "laporan_kp");
            then.status(200).json_body(json!({ "data": [] }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let list = client
            .list_dokumen(Some(DokumenStatus::Pending), Some(DokumenJenis::LaporanKp))
            .await
            .unwrap();
        mock.assert();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/dokumen-akademik");
            then.status(201).json_body(dokumen_body("Pending"));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client
            .upload_dokumen(
                &DokumenUploadMeta {
                    judul: "Proposal".into(),
                    jenis: DokumenJenis::ProposalSkripsi,
                },
                UploadPayload {
                    file_name: "proposal.pdf".into(),
                    mime_type: "application/pdf".into(),
                    bytes: vec![0; 10 * 1024 * 1024 + 1],
                },
            )
            .await
            .unwrap_err();
        assert!(err.message.contains("melebihi batas"));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn reject_requires_a_reason() {
        let client = ApiClient::new_with_base_url("http://unused.invalid");
        let err = client.reject_dokumen("d-1", "   ").await.unwrap_err();
        assert_eq!(err.message, "Alasan penolakan wajib diisi");
    }

    #[tokio::test]
    async fn reject_sends_reason_in_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/dokumen-akademik/d-1/reject")
                .json_body(json!({ "alasan": "Lampiran tidak lengkap" }));
            then.status(200).json_body(dokumen_body("Rejected"));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let dokumen = client
            .reject_dokumen("d-1", "Lampiran tidak lengkap")
            .await
            .unwrap();
        mock.assert();
        assert_eq!(dokumen.status, DokumenStatus::Rejected);
    }
}
