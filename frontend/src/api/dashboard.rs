use crate::api::client::ApiClient;
use crate::api::types::{ApiError, DashboardSummary, Role};

impl ApiClient {
    /// Role-scoped summary counters. Unknown fields are tolerated and
    /// missing ones default to zero, so each role's endpoint can return
    /// only the counters it owns.
    pub async fn dashboard_summary(&self, role: Role) -> Result<DashboardSummary, ApiError> {
        let path = match role {
            Role::Mahasiswa => "/dashboard/mahasiswa",
            Role::Dosen => "/dashboard/dosen",
            Role::Kaprodi => "/dashboard/kaprodi",
            Role::Dekan => "/dashboard/dekan",
            Role::TuFakultas | Role::TuProdi => "/dashboard/tata-usaha",
            Role::Admin => "/dashboard/admin",
        };
        let value = self.get_value(path, &[]).await?;
        Self::decode(value)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn partial_summary_defaults_missing_counters_to_zero() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/kaprodi");
            then.status(200)
                .json_body(json!({ "dokumen_pending": 4, "krs_submitted": 2 }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let summary = client.dashboard_summary(Role::Kaprodi).await.unwrap();
        mock.assert();
        assert_eq!(summary.dokumen_pending, 4);
        assert_eq!(summary.krs_submitted, 2);
        assert_eq!(summary.total_mahasiswa, 0);
    }

    // A failed summary fetch surfaces as an error on the dashboard instead
    // of rendering as an absent summary.
    #[tokio::test]
    async fn failed_summary_propagates_the_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/admin");
            then.status(500)
                .json_body(json!({ "message": "layanan ringkasan gagal" }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        let err = client.dashboard_summary(Role::Admin).await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(err.message, "layanan ringkasan gagal");
    }

    #[tokio::test]
    async fn both_tata_usaha_roles_share_one_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/tata-usaha");
            then.status(200).json_body(json!({ "total_mahasiswa": 120 }));
        });

        let client = ApiClient::new_with_base_url(server.url("/api"));
        client.dashboard_summary(Role::TuFakultas).await.unwrap();
        client.dashboard_summary(Role::TuProdi).await.unwrap();
        mock.assert_hits(2);
    }
}
