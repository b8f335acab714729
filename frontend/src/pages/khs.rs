use leptos::*;

use crate::api::types::{ApiError, Khs, Role};
use crate::api::ApiClient;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::guard::RequireRole;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::utils::format;

const ALLOWED: &[Role] = &[Role::Mahasiswa];

#[component]
pub fn KhsPage() -> impl IntoView {
    view! {
        <RequireRole allowed=ALLOWED>
            {|| view! {
                <PageScaffold title="Kartu Hasil Studi".to_string()>
                    <KhsPanel />
                </PageScaffold>
            }}
        </RequireRole>
    }
}

#[component]
fn KhsPanel() -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    // The backend scopes /khs to the caller for students.
    let reports = create_resource(
        || (),
        move |_| {
            let api = api.clone();
            async move { api.list_khs(None).await }
        },
    );
    create_effect(move |_| {
        if let Some(Err(err)) = reports.get() {
            load_error.set(Some(err));
        }
    });

    view! {
        <div class="space-y-6">
            <InlineErrorMessage error=load_error.into() />
            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    reports.get().map(|result| match result {
                        Err(_) => ().into_view(),
                        Ok(list) if list.is_empty() => {
                            view! { <EmptyState message="Belum ada hasil studi".to_string() /> }
                                .into_view()
                        }
                        Ok(list) => list
                            .into_iter()
                            .map(|khs| view! { <KhsCard khs=khs /> })
                            .collect_view(),
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn KhsCard(khs: Khs) -> impl IntoView {
    let total_sks: i32 = khs.entries.iter().map(|entry| entry.sks).sum();
    view! {
        <section class="bg-surface-elevated rounded-2xl border border-border shadow-sm">
            <header class="flex items-center justify-between border-b border-border px-5 py-4">
                <h3 class="text-base font-semibold text-fg">{khs.tahun_akademik_nama.clone()}</h3>
                <p class="text-sm text-fg-muted">
                    {format!("IP Semester: {} ({} SKS)", format::angka(khs.ip_semester), total_sks)}
                </p>
            </header>
            <div class="overflow-x-auto">
                <table class="min-w-full divide-y divide-border text-sm">
                    <thead>
                        <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                            <th class="px-4 py-3">"Kode"</th>
                            <th class="px-4 py-3">"Mata Kuliah"</th>
                            <th class="px-4 py-3">"SKS"</th>
                            <th class="px-4 py-3">"Nilai"</th>
                            <th class="px-4 py-3">"Huruf"</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        {khs.entries.iter().map(|entry| view! {
                            <tr>
                                <td class="px-4 py-3 text-fg-muted">{entry.kode_matkul.clone()}</td>
                                <td class="px-4 py-3 font-medium text-fg">{entry.nama_matkul.clone()}</td>
                                <td class="px-4 py-3">{entry.sks}</td>
                                <td class="px-4 py-3">{format::angka(entry.nilai_akhir)}</td>
                                <td class="px-4 py-3 font-semibold">{entry.nilai_huruf.clone()}</td>
                            </tr>
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        </section>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::types::KhsEntry;
    use crate::test_support::helpers::{mahasiswa_user, provide_auth};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn page_renders_for_students_only() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! { <KhsPage /> }
        });
        assert!(html.contains("Kartu Hasil Studi"));

        let html = render_to_string(move || {
            provide_auth(Some(crate::test_support::helpers::kaprodi_user()));
            view! { <KhsPage /> }
        });
        assert!(!html.contains("Kartu Hasil Studi"));
    }

    #[test]
    fn card_shows_term_header_and_letter_grades() {
        let khs = Khs {
            id: "kh-1".into(),
            mahasiswa_id: "u-mhs-1".into(),
            tahun_akademik_id: "ta-1".into(),
            tahun_akademik_nama: "2024/2025 Genap".into(),
            ip_semester: 3.42,
            entries: vec![KhsEntry {
                kode_matkul: "IF201".into(),
                nama_matkul: "Struktur Data".into(),
                sks: 3,
                nilai_akhir: 81.7,
                nilai_huruf: "B+".into(),
            }],
        };
        let html = render_to_string(move || view! { <KhsCard khs=khs.clone() /> });
        assert!(html.contains("2024/2025 Genap"));
        assert!(html.contains("IP Semester: 3.42"));
        assert!(html.contains("B+"));
    }
}
