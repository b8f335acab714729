use leptos::*;

use crate::api::types::{ApiError, Krs, Role};
use crate::api::ApiClient;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::SearchBox;
use crate::components::guard::RequireRole;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::pages::krs::repository::KrsRepository;
use crate::state::list::ListStore;

const ALLOWED: &[Role] = &[Role::Kaprodi, Role::Admin];

#[component]
pub fn KrsApprovalPage() -> impl IntoView {
    view! {
        <RequireRole allowed=ALLOWED>
            {|| view! {
                <PageScaffold title="Persetujuan KRS".to_string()>
                    <KrsApprovalPanel />
                </PageScaffold>
            }}
        </RequireRole>
    }
}

#[component]
fn KrsApprovalPanel() -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let repo = KrsRepository::new(api);
    let toasts = use_toasts();

    let store: ListStore<Krs> = ListStore::new();
    let generation = create_rw_signal(0u32);
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let load_repo = repo.clone();
    let queue = create_resource(
        move || generation.get(),
        move |_| {
            let repo = load_repo.clone();
            async move { repo.pending_queue().await }
        },
    );
    {
        let store = store.clone();
        create_effect(move |_| {
            if let Some(result) = queue.get() {
                match result {
                    Ok(rows) => {
                        load_error.set(None);
                        store.set_rows(rows);
                    }
                    Err(err) => load_error.set(Some(err)),
                }
            }
        });
    }

    // (krs, approve?) pending confirmation.
    let decide_target: RwSignal<Option<(Krs, bool)>> = create_rw_signal(None);

    let decide_repo = repo.clone();
    let decide_action = create_action(move |input: &(String, bool)| {
        let (krs_id, approve) = input.clone();
        let repo = decide_repo.clone();
        async move {
            if approve {
                repo.approve(&krs_id).await
            } else {
                repo.reject(&krs_id).await
            }
        }
    });
    {
        let store = store.clone();
        create_effect(move |_| {
            if let Some(result) = decide_action.value().get() {
                match result {
                    Ok(decided) => {
                        store.remove_row(&decided.id);
                        let verdict = if decided.status.is_editable() {
                            "ditolak dan dikembalikan menjadi draft"
                        } else {
                            "disetujui"
                        };
                        toasts.success(format!("KRS {} {}", decided.mahasiswa_nama, verdict));
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
            }
        });
    }

    let dialog_open = Signal::derive(move || decide_target.get().is_some());
    let dialog_title = move || {
        decide_target
            .get()
            .map(|(_, approve)| if approve { "Setujui KRS" } else { "Tolak KRS" })
            .unwrap_or("")
    };
    let dialog_message = move || {
        decide_target
            .get()
            .map(|(krs, approve)| {
                if approve {
                    format!(
                        "Setujui KRS {} ({} SKS)? Keputusan tidak dapat dibatalkan.",
                        krs.mahasiswa_nama,
                        krs.total_sks()
                    )
                } else {
                    format!(
                        "Tolak KRS {}? KRS akan kembali menjadi draft.",
                        krs.mahasiswa_nama
                    )
                }
            })
            .unwrap_or_default()
    };

    let rows = store.filtered;
    let search = store.search;

    view! {
        <div class="space-y-6">
            <InlineErrorMessage error=load_error.into() />
            <div class="max-w-sm">
                <SearchBox value=search placeholder="Cari nama atau NIM..." />
            </div>

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    queue.get().map(|_| {
                        if rows.get().is_empty() {
                            view! { <EmptyState message="Tidak ada KRS menunggu persetujuan".to_string() /> }
                                .into_view()
                        } else {
                            view! {
                                <div class="space-y-4">
                                    <For
                                        each=move || rows.get()
                                        key=|krs| krs.id.clone()
                                        children=move |krs: Krs| {
                                            let approve_target = krs.clone();
                                            let reject_target = krs.clone();
                                            view! {
                                                <div class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5 space-y-4">
                                                    <div class="flex items-center justify-between">
                                                        <div>
                                                            <p class="font-semibold text-fg">
                                                                {format!("{} ({})", krs.mahasiswa_nama, krs.nim)}
                                                            </p>
                                                            <p class="text-sm text-fg-muted">
                                                                {format!(
                                                                    "{} mata kuliah, total {} SKS",
                                                                    krs.items.len(),
                                                                    krs.total_sks()
                                                                )}
                                                            </p>
                                                        </div>
                                                        <div class="flex gap-2">
                                                            <button
                                                                class="rounded-lg bg-action-primary-bg text-action-primary-text px-4 py-2 text-sm font-semibold hover:bg-action-primary-bg-hover"
                                                                on:click=move |_| decide_target.set(Some((approve_target.clone(), true)))
                                                            >
                                                                "Setujui"
                                                            </button>
                                                            <button
                                                                class="rounded-lg bg-status-error-bg text-status-error-text px-4 py-2 text-sm font-semibold hover:opacity-80"
                                                                on:click=move |_| decide_target.set(Some((reject_target.clone(), false)))
                                                            >
                                                                "Tolak"
                                                            </button>
                                                        </div>
                                                    </div>
                                                    <ul class="text-sm text-fg-muted divide-y divide-border">
                                                        {krs.items.iter().map(|item| view! {
                                                            <li class="py-1.5">
                                                                {format!(
                                                                    "{} - {} ({} SKS), {} {}-{}",
                                                                    item.kode_matkul,
                                                                    item.nama_matkul,
                                                                    item.sks,
                                                                    item.hari,
                                                                    item.jam_mulai,
                                                                    item.jam_selesai
                                                                )}
                                                            </li>
                                                        }).collect_view()}
                                                    </ul>
                                                </div>
                                            }
                                        }
                                    />
                                </div>
                            }
                            .into_view()
                        }
                    })
                }}
            </Suspense>

            <ConfirmDialog
                is_open=dialog_open
                title=Signal::derive(move || dialog_title().to_string())
                message=Signal::derive(dialog_message)
                confirm_label="Ya, lanjutkan".to_string()
                destructive=Signal::derive(move || {
                    decide_target.get().map(|(_, approve)| !approve).unwrap_or(false)
                })
                on_confirm=Callback::new(move |_| {
                    if let Some((krs, approve)) = decide_target.get_untracked() {
                        decide_action.dispatch((krs.id, approve));
                    }
                    decide_target.set(None);
                })
                on_cancel=Callback::new(move |_| decide_target.set(None))
            />
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{kaprodi_user, mahasiswa_user, provide_auth};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn kaprodi_sees_the_approval_queue() {
        let html = render_to_string(move || {
            provide_auth(Some(kaprodi_user()));
            view! { <KrsApprovalPage /> }
        });
        assert!(html.contains("Persetujuan KRS"));
    }

    #[test]
    fn students_are_kept_out() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! { <KrsApprovalPage /> }
        });
        assert!(!html.contains("Persetujuan KRS"));
    }
}
