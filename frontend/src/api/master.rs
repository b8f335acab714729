use serde_json::json;

use crate::api::client::ApiClient;
use crate::api::types::{ApiError, Fakultas, Prodi, TahunAkademik};

impl ApiClient {
    pub async fn list_fakultas(&self) -> Result<Vec<Fakultas>, ApiError> {
        let value = self.get_value("/fakultas", &[]).await?;
        Self::decode_list(value)
    }

    pub async fn list_prodi(&self, fakultas_id: Option<&str>) -> Result<Vec<Prodi>, ApiError> {
        let mut query = Vec::new();
        if let Some(id) = fakultas_id {
            query.push(("fakultas_id", id.to_string()));
        }
        let value = self.get_value("/prodi", &query).await?;
        Self::decode_list(value)
    }

    pub async fn list_tahun_akademik(&self) -> Result<Vec<TahunAkademik>, ApiError> {
        let value = self.get_value("/tahun-akademik", &[]).await?;
        Self::decode_list(value)
    }

    pub async fn create_tahun_akademik(&self, nama: &str) -> Result<TahunAkademik, ApiError> {
        let value = self
            .post_json("/tahun-akademik", json!({ "nama": nama }))
            .await?;
        Self::decode(value)
    }

    /// Activation is exclusive: the backend deactivates every other term.
    pub async fn aktifkan_tahun_akademik(&self, id: &str) -> Result<TahunAkademik, ApiError> {
        let value = self
            .put_json(&format!("/tahun-akademik/{}/aktifkan", id), json!({}))
            .await?;
        Self::decode(value)
    }
}
