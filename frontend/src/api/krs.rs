use reqwest::Method;
use serde_json::json;

use crate::api::client::{ApiClient, Payload};
use crate::api::types::{ApiError, Khs, Krs, KrsStatus};

impl ApiClient {
    /// The logged-in student's plan for the active term; 404 when none has
    /// been created yet.
    pub async fn my_krs(&self) -> Result<Krs, ApiError> {
        let value = self.get_value("/krs/me", &[]).await?;
        Self::decode(value)
    }

    pub async fn create_krs(&self, tahun_akademik_id: &str) -> Result<Krs, ApiError> {
        let value = self
            .post_json("/krs", json!({ "tahun_akademik_id": tahun_akademik_id }))
            .await?;
        Self::decode(value)
    }

    pub async fn add_krs_item(&self, krs_id: &str, jadwal_id: &str) -> Result<Krs, ApiError> {
        let value = self
            .post_json(
                &format!("/krs/{}/items", krs_id),
                json!({ "jadwal_id": jadwal_id }),
            )
            .await?;
        Self::decode(value)
    }

    pub async fn remove_krs_item(&self, krs_id: &str, item_id: &str) -> Result<Krs, ApiError> {
        let value = self
            .execute(
                Method::DELETE,
                &format!("/krs/{}/items/{}", krs_id, item_id),
                &[],
                Payload::None,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn submit_krs(&self, krs_id: &str) -> Result<Krs, ApiError> {
        let value = self
            .put_json(&format!("/krs/{}/submit", krs_id), json!({}))
            .await?;
        Self::decode(value)
    }

    /// Submitted plans waiting for the kaprodi's decision.
    pub async fn list_krs(&self, status: Option<KrsStatus>) -> Result<Vec<Krs>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            let wire = serde_json::to_value(status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            query.push(("status", wire));
        }
        let value = self.get_value("/krs", &query).await?;
        Self::decode_list(value)
    }

    pub async fn approve_krs(&self, krs_id: &str) -> Result<Krs, ApiError> {
        let value = self
            .put_json(&format!("/krs/{}/approve", krs_id), json!({}))
            .await?;
        Self::decode(value)
    }

    /// Rejection sends the plan back to Draft so the student can rework it.
    pub async fn reject_krs(&self, krs_id: &str) -> Result<Krs, ApiError> {
        let value = self
            .put_json(&format!("/krs/{}/reject", krs_id), json!({}))
            .await?;
        Self::decode(value)
    }

    pub async fn list_khs(&self, mahasiswa_id: Option<&str>) -> Result<Vec<Khs>, ApiError> {
        let mut query = Vec::new();
        if let Some(id) = mahasiswa_id {
            query.push(("mahasiswa_id", id.to_string()));
        }
        let value = self.get_value("/khs", &query).await?;
        Self::decode_list(value)
    }
}
