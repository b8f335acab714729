use leptos::*;

use crate::api::types::{ApiError, Nilai, Role, UpsertNilaiRequest};
use crate::api::ApiClient;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::{SearchBox, SelectField};
use crate::components::guard::RequireRole;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::pages::nilai::repository::NilaiRepository;
use crate::pages::nilai::view_model::{build_upsert, preview};
use crate::state::auth::use_auth;
use crate::state::list::ListStore;
use crate::utils::format;

const ALLOWED: &[Role] = &[Role::Dosen, Role::Admin];

#[component]
pub fn NilaiPage() -> impl IntoView {
    view! {
        <RequireRole allowed=ALLOWED>
            {|| view! {
                <PageScaffold title="Input Nilai".to_string()>
                    <NilaiPanel />
                </PageScaffold>
            }}
        </RequireRole>
    }
}

#[component]
fn NilaiPanel() -> impl IntoView {
    let (auth, _) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();
    let repo = NilaiRepository::new(api);
    let toasts = use_toasts();

    let kelas_repo = repo.clone();
    let kelas_error: RwSignal<Option<ApiError>> = create_rw_signal(None);
    let kelas = create_resource(
        move || auth.get().user.map(|user| user.id),
        move |dosen_id| {
            let repo = kelas_repo.clone();
            async move {
                match dosen_id {
                    Some(id) => repo.list_kelas(&id).await,
                    None => Ok(Vec::new()),
                }
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = kelas.get() {
            match result {
                Ok(_) => kelas_error.set(None),
                Err(err) => kelas_error.set(Some(err)),
            }
        }
    });

    let jadwal_id = create_rw_signal(String::new());
    let generation = create_rw_signal(0u32);
    let store: ListStore<Nilai> = ListStore::new();
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let list_repo = repo.clone();
    let rows = create_resource(
        move || (jadwal_id.get(), generation.get()),
        move |(jadwal, _)| {
            let repo = list_repo.clone();
            async move {
                if jadwal.is_empty() {
                    Ok(Vec::new())
                } else {
                    repo.list(&jadwal).await
                }
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = rows.get() {
            match result {
                Ok(list) => {
                    load_error.set(None);
                    store.set_rows(list);
                }
                Err(err) => load_error.set(Some(err)),
            }
        }
    });

    // Inline editor, one row at a time.
    let edit_id: RwSignal<Option<String>> = create_rw_signal(None);
    let tugas = create_rw_signal(String::new());
    let uts = create_rw_signal(String::new());
    let uas = create_rw_signal(String::new());
    let edit_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let start_edit = move |row: &Nilai| {
        edit_id.set(Some(row.id.clone()));
        tugas.set(row.tugas.map(|v| v.to_string()).unwrap_or_default());
        uts.set(row.uts.map(|v| v.to_string()).unwrap_or_default());
        uas.set(row.uas.map(|v| v.to_string()).unwrap_or_default());
        edit_error.set(None);
    };

    let save_repo = repo.clone();
    let save_action = create_action(move |request: &UpsertNilaiRequest| {
        let request = request.clone();
        let repo = save_repo.clone();
        async move { repo.upsert(request).await }
    });
    create_effect(move |_| {
        if let Some(result) = save_action.value().get() {
            match result {
                Ok(updated) => {
                    toasts.success("Nilai tersimpan");
                    store.replace_row(updated);
                    edit_id.set(None);
                    edit_error.set(None);
                }
                Err(err) => edit_error.set(Some(err)),
            }
        }
    });

    let finalize_target: RwSignal<Option<Nilai>> = create_rw_signal(None);
    let finalize_repo = repo.clone();
    let finalize_action = create_action(move |id: &String| {
        let id = id.clone();
        let repo = finalize_repo.clone();
        async move { repo.finalize(&id).await }
    });
    create_effect(move |_| {
        if let Some(result) = finalize_action.value().get() {
            match result {
                Ok(updated) => {
                    toasts.success("Nilai difinalisasi");
                    store.replace_row(updated);
                    finalize_target.set(None);
                }
                Err(err) => {
                    // 409 means the grading period is closed.
                    let message = if err.is_conflict() {
                        "Finalisasi ditolak: di luar periode penilaian".to_string()
                    } else {
                        err.user_message()
                    };
                    toasts.error(message);
                    finalize_target.set(None);
                }
            }
        }
    });

    let kelas_options = create_memo(move |_| {
        let mut options = vec![(String::new(), "Pilih kelas".to_string())];
        if let Some(Ok(list)) = kelas.get() {
            options.extend(list.into_iter().map(|jadwal| {
                (
                    jadwal.id,
                    format!("{} - {}", jadwal.kode_matkul, jadwal.nama_matkul),
                )
            }));
        }
        options
    });

    let dialog_open = Signal::derive(move || finalize_target.get().is_some());
    let dialog_message = Signal::derive(move || {
        finalize_target
            .get()
            .map(|row| {
                format!(
                    "Finalisasi nilai {} ({})? Nilai final tidak dapat diubah lagi.",
                    row.mahasiswa_nama, row.nim
                )
            })
            .unwrap_or_default()
    });

    view! {
        <div class="space-y-6">
            <div class="flex flex-col sm:flex-row gap-3 sm:items-end">
                <SelectField
                    value=jadwal_id
                    label="Kelas"
                    options=Signal::derive(move || kelas_options.get())
                />
                <SearchBox value=store.search placeholder="Cari mahasiswa atau NIM..." />
            </div>

            <InlineErrorMessage error=kelas_error.into() />
            <InlineErrorMessage error=load_error.into() />

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    rows.get().map(|_| {
                        if jadwal_id.get().is_empty() {
                            return view! { <EmptyState message="Pilih kelas untuk mulai mengisi nilai".to_string() /> }.into_view();
                        }
                        let visible = store.filtered.get();
                        if visible.is_empty() {
                            return view! { <EmptyState message="Belum ada peserta di kelas ini".to_string() /> }.into_view();
                        }
                        view! {
                            <div class="overflow-x-auto bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                <table class="min-w-full divide-y divide-border text-sm">
                                    <thead>
                                        <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                            <th class="px-4 py-3">"Mahasiswa"</th>
                                            <th class="px-4 py-3">"NIM"</th>
                                            <th class="px-4 py-3">"Tugas (30%)"</th>
                                            <th class="px-4 py-3">"UTS (30%)"</th>
                                            <th class="px-4 py-3">"UAS (40%)"</th>
                                            <th class="px-4 py-3">"Akhir"</th>
                                            <th class="px-4 py-3">"Huruf"</th>
                                            <th class="px-4 py-3">"Aksi"</th>
                                        </tr>
                                    </thead>
                                    <tbody class="divide-y divide-border">
                                        {visible
                                            .into_iter()
                                            .map(|row| {
                                                let is_editing = {
                                                    let id = row.id.clone();
                                                    create_memo(move |_| edit_id.get().as_deref() == Some(id.as_str()))
                                                };
                                                let edit_row = row.clone();
                                                let finalize_row = row.clone();
                                                let save_row = row.clone();
                                                view! {
                                                    <tr>
                                                        <td class="px-4 py-3 font-medium text-fg">{row.mahasiswa_nama.clone()}</td>
                                                        <td class="px-4 py-3 text-fg-muted">{row.nim.clone()}</td>
                                                        <Show
                                                            when=move || is_editing.get()
                                                            fallback={
                                                                let row = row.clone();
                                                                move || view! {
                                                                    <td class="px-4 py-3">{format::skor(row.tugas)}</td>
                                                                    <td class="px-4 py-3">{format::skor(row.uts)}</td>
                                                                    <td class="px-4 py-3">{format::skor(row.uas)}</td>
                                                                    <td class="px-4 py-3 font-semibold">{format::skor(row.nilai_akhir)}</td>
                                                                    <td class="px-4 py-3 font-semibold">{row.nilai_huruf.clone().unwrap_or_else(|| "-".into())}</td>
                                                                }
                                                            }
                                                        >
                                                            <td class="px-4 py-3">
                                                                <input class="w-20 rounded-lg border border-form-control-border px-2 py-1" prop:value=move || tugas.get() on:input=move |ev| tugas.set(event_target_value(&ev)) />
                                                            </td>
                                                            <td class="px-4 py-3">
                                                                <input class="w-20 rounded-lg border border-form-control-border px-2 py-1" prop:value=move || uts.get() on:input=move |ev| uts.set(event_target_value(&ev)) />
                                                            </td>
                                                            <td class="px-4 py-3">
                                                                <input class="w-20 rounded-lg border border-form-control-border px-2 py-1" prop:value=move || uas.get() on:input=move |ev| uas.set(event_target_value(&ev)) />
                                                            </td>
                                                            <td class="px-4 py-3 font-semibold" colspan="2">
                                                                {move || {
                                                                    preview(&tugas.get(), &uts.get(), &uas.get())
                                                                        .map(|(akhir, huruf)| format!("{:.2} ({})", akhir, huruf))
                                                                        .unwrap_or_else(|| "-".into())
                                                                }}
                                                            </td>
                                                        </Show>
                                                        <td class="px-4 py-3 space-x-2 whitespace-nowrap">
                                                            <Show
                                                                when={
                                                                    let row = row.clone();
                                                                    move || !row.is_final
                                                                }
                                                                fallback=|| view! { <span class="text-xs text-fg-muted">"Final"</span> }
                                                            >
                                                                {
                                                                    let save_row = save_row.clone();
                                                                    view! {
                                                                <Show
                                                                    when=move || is_editing.get()
                                                                    fallback={
                                                                        let edit_row = edit_row.clone();
                                                                        let finalize_row = finalize_row.clone();
                                                                        move || {
                                                                            let edit_row = edit_row.clone();
                                                                            let finalize_row = finalize_row.clone();
                                                                            view! {
                                                                                <button
                                                                                    class="text-action-primary-bg hover:underline text-sm font-semibold"
                                                                                    on:click=move |_| start_edit(&edit_row)
                                                                                >
                                                                                    "Ubah"
                                                                                </button>
                                                                                <Show when={
                                                                                    let finalize_row = finalize_row.clone();
                                                                                    move || finalize_row.nilai_akhir.is_some()
                                                                                }>
                                                                                    <button
                                                                                        class="text-status-warning-text hover:underline text-sm font-semibold"
                                                                                        on:click={
                                                                                            let finalize_row = finalize_row.clone();
                                                                                            move |_| finalize_target.set(Some(finalize_row.clone()))
                                                                                        }
                                                                                    >
                                                                                        "Finalisasi"
                                                                                    </button>
                                                                                </Show>
                                                                            }
                                                                        }
                                                                    }
                                                                >
                                                                    <button
                                                                        class="text-status-success-text hover:underline text-sm font-semibold"
                                                                        on:click={
                                                                            let save_row = save_row.clone();
                                                                            move |_| {
                                                                                match build_upsert(
                                                                                    &save_row,
                                                                                    &tugas.get_untracked(),
                                                                                    &uts.get_untracked(),
                                                                                    &uas.get_untracked(),
                                                                                ) {
                                                                                    Ok(request) => save_action.dispatch(request),
                                                                                    Err(message) => edit_error.set(Some(ApiError::validation(message))),
                                                                                }
                                                                            }
                                                                        }
                                                                    >
                                                                        "Simpan"
                                                                    </button>
                                                                    <button
                                                                        class="text-fg-muted hover:text-fg text-sm font-semibold"
                                                                        on:click=move |_| edit_id.set(None)
                                                                    >
                                                                        "Batal"
                                                                    </button>
                                                                </Show>
                                                                    }
                                                                }
                                                            </Show>
                                                        </td>
                                                    </tr>
                                                }
                                            })
                                            .collect_view()}
                                    </tbody>
                                </table>
                            </div>
                        }.into_view()
                    })
                }}
            </Suspense>

            <InlineErrorMessage error=edit_error.into() />

            <ConfirmDialog
                is_open=dialog_open
                title="Finalisasi Nilai".to_string()
                message=dialog_message
                confirm_label="Finalisasi".to_string()
                on_confirm=Callback::new(move |_| {
                    if let Some(row) = finalize_target.get_untracked() {
                        finalize_action.dispatch(row.id);
                    }
                })
                on_cancel=Callback::new(move |_| finalize_target.set(None))
            />
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{provide_auth, user_with_role};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn panel_shows_class_picker_and_weighted_columns() {
        let html = render_to_string(move || {
            provide_auth(Some(user_with_role(Role::Dosen)));
            view! { <NilaiPanel /> }
        });
        assert!(html.contains("Pilih kelas"));
        assert!(html.contains("Tugas (30%)"));
        assert!(html.contains("UAS (40%)"));
    }
}
