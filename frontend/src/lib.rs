use leptos::*;
use leptos_router::*;

pub mod api;
pub mod components;
pub mod config;
pub mod pages;
pub mod state;
#[cfg(test)]
pub mod test_support;
pub mod utils;

use components::toast::{provide_toasts, ToastHost};
use pages::{
    dashboard::DashboardPage, dokumen::DokumenPage, jadwal::JadwalPage, khs::KhsPage,
    krs::KrsApprovalPage, krs::KrsPage, login::LoginPage, master::MasterDataPage,
    materi::MateriPage, nilai::NilaiPage, users::UsersPage,
};
use state::auth::AuthProvider;

#[component]
pub fn App() -> impl IntoView {
    provide_context(api::ApiClient::new());
    provide_toasts();

    view! {
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path="/" view=|| view! { <Redirect path="/dashboard"/> }/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/dashboard" view=DashboardPage/>
                    <Route path="/pengguna" view=UsersPage/>
                    <Route path="/master" view=MasterDataPage/>
                    <Route path="/dokumen" view=DokumenPage/>
                    <Route path="/materi" view=MateriPage/>
                    <Route path="/nilai" view=NilaiPage/>
                    <Route path="/krs" view=KrsPage/>
                    <Route path="/krs/persetujuan" view=KrsApprovalPage/>
                    <Route path="/khs" view=KhsPage/>
                    <Route path="/jadwal" view=JadwalPage/>
                </Routes>
            </Router>
            <ToastHost />
        </AuthProvider>
    }
}

/// Browser entry point: resolve the runtime config (REST or demo fixture),
/// then mount the SPA.
#[cfg(target_arch = "wasm32")]
pub fn boot() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("memulai SIAKAD frontend");

    spawn_local(async move {
        let backend = config::init().await;
        log::info!("backend aktif: {:?}", backend);
        mount_to_body(|| view! { <App /> });
    });
}
