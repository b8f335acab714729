use std::rc::Rc;

use crate::api::types::{
    ApiError, DokumenAkademik, DokumenJenis, DokumenStatus, DokumenUploadMeta,
};
use crate::api::ApiClient;
use crate::utils::upload::UploadPayload;

#[derive(Clone)]
pub struct DokumenRepository {
    client: Rc<ApiClient>,
}

impl DokumenRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    pub async fn list(
        &self,
        status: Option<DokumenStatus>,
        jenis: Option<DokumenJenis>,
    ) -> Result<Vec<DokumenAkademik>, ApiError> {
        self.client.list_dokumen(status, jenis).await
    }

    pub async fn upload(
        &self,
        meta: DokumenUploadMeta,
        file: UploadPayload,
    ) -> Result<DokumenAkademik, ApiError> {
        self.client.upload_dokumen(&meta, file).await
    }

    pub async fn approve(&self, id: &str) -> Result<DokumenAkademik, ApiError> {
        self.client.approve_dokumen(id).await
    }

    pub async fn reject(&self, id: &str, alasan: &str) -> Result<DokumenAkademik, ApiError> {
        self.client.reject_dokumen(id, alasan).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_dokumen(id).await
    }
}
