use leptos::*;

use crate::api::types::{
    ApiError, DokumenAkademik, DokumenJenis, DokumenStatus, DokumenUploadMeta, Role,
};
use crate::api::ApiClient;
use crate::components::badge::DokumenStatusBadge;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::{FileField, SearchBox, SelectField, TextField};
use crate::components::guard::RequireAuth;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::pages::dokumen::repository::DokumenRepository;
use crate::pages::dokumen::view_model::{can_decide, can_delete, DokumenFilters};
use crate::state::auth::use_auth;
use crate::state::list::ListStore;
use crate::utils::format;
use crate::utils::upload::{self, UploadPayload};

/// Uploaders: students file their own documents, tata usaha files the
/// faculty letters.
pub fn can_upload(role: Option<Role>) -> bool {
    matches!(
        role,
        Some(Role::Mahasiswa) | Some(Role::TuFakultas) | Some(Role::TuProdi)
    )
}

#[component]
pub fn DokumenPage() -> impl IntoView {
    view! {
        <RequireAuth>
            {|| view! {
                <PageScaffold title="Dokumen Akademik".to_string()>
                    <DokumenPanel />
                </PageScaffold>
            }}
        </RequireAuth>
    }
}

#[component]
fn DokumenPanel() -> impl IntoView {
    let (auth, _) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();
    let repo = DokumenRepository::new(api);

    let filters = DokumenFilters::new();
    let store: ListStore<DokumenAkademik> = ListStore::new();
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let list_repo = repo.clone();
    let rows = create_resource(
        move || filters.snapshot(),
        move |(status, jenis, _generation)| {
            let repo = list_repo.clone();
            async move { repo.list(status, jenis).await }
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

    // Upload form.
    let judul = create_rw_signal(String::new());
    let jenis = create_rw_signal(String::new());
    let pending_file: RwSignal<Option<UploadPayload>> = create_rw_signal(None);
    let form_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let on_file = Callback::new(move |file: web_sys::File| {
        #[cfg(target_arch = "wasm32")]
        {
            spawn_local(async move {
                match upload::read_file(&file, &upload::UploadRule::dokumen()).await {
                    Ok(payload) => {
                        form_error.set(None);
                        pending_file.set(Some(payload));
                    }
                    Err(err) => {
                        pending_file.set(None);
                        form_error.set(Some(err));
                    }
                }
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = file;
    });

    let toasts = use_toasts();
    let upload_repo = repo.clone();
    let upload_action = create_action(move |input: &(DokumenUploadMeta, UploadPayload)| {
        let (meta, file) = input.clone();
        let repo = upload_repo.clone();
        async move { repo.upload(meta, file).await }
    });
    create_effect(move |_| {
        if let Some(result) = upload_action.value().get() {
            match result {
                Ok(_) => {
                    toasts.success("Dokumen berhasil diunggah");
                    judul.set(String::new());
                    jenis.set(String::new());
                    pending_file.set(None);
                    form_error.set(None);
                    filters.reload();
                }
                Err(err) => form_error.set(Some(err)),
            }
        }
    });

    let on_upload = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let judul_value = judul.get_untracked();
        let jenis_value =
            crate::pages::dokumen::view_model::parse_jenis_filter(&jenis.get_untracked());
        let file = pending_file.get_untracked();
        if judul_value.trim().is_empty() {
            form_error.set(Some(ApiError::validation("Judul dokumen wajib diisi")));
            return;
        }
        let Some(jenis_value) = jenis_value else {
            form_error.set(Some(ApiError::validation("Jenis dokumen wajib dipilih")));
            return;
        };
        let Some(file) = file else {
            form_error.set(Some(ApiError::validation("Pilih berkas terlebih dahulu")));
            return;
        };
        upload_action.dispatch((
            DokumenUploadMeta {
                judul: judul_value,
                jenis: jenis_value,
            },
            file,
        ));
    };

    // Decision dialogs. `Some((dokumen, true))` = approve, `false` = reject.
    let decide_target: RwSignal<Option<(DokumenAkademik, bool)>> = create_rw_signal(None);
    let reject_reason = create_rw_signal(String::new());
    let action_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let decide_repo = repo.clone();
    let decide_action = create_action(move |input: &(String, bool, String)| {
        let (id, approve, alasan) = input.clone();
        let repo = decide_repo.clone();
        async move {
            if approve {
                repo.approve(&id).await
            } else {
                repo.reject(&id, &alasan).await
            }
        }
    });
    create_effect(move |_| {
        if let Some(result) = decide_action.value().get() {
            match result {
                Ok(updated) => {
                    let label = match updated.status {
                        DokumenStatus::Approved => "Dokumen disetujui",
                        _ => "Dokumen ditolak",
                    };
                    toasts.success(label);
                    store.replace_row(updated);
                    decide_target.set(None);
                    reject_reason.set(String::new());
                    action_error.set(None);
                }
                Err(err) => {
                    toasts.error(err.user_message());
                    action_error.set(Some(err));
                    decide_target.set(None);
                }
            }
        }
    });

    let delete_repo = repo.clone();
    let delete_action = create_action(move |id: &String| {
        let id = id.clone();
        let repo = delete_repo.clone();
        async move { repo.delete(&id).await.map(|_| id) }
    });
    create_effect(move |_| {
        if let Some(result) = delete_action.value().get() {
            match result {
                Ok(id) => {
                    toasts.success("Dokumen dihapus");
                    store.remove_row(&id);
                }
                Err(err) => toasts.error(err.user_message()),
            }
        }
    });

    let jenis_options: Vec<(String, String)> = std::iter::once((String::new(), "Semua Jenis".to_string()))
        .chain(DokumenJenis::ALL.iter().map(|jenis| {
            (
                serde_json::to_value(jenis)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                jenis.label().to_string(),
            )
        }))
        .collect();
    let upload_jenis_options: Vec<(String, String)> = std::iter::once((String::new(), "Pilih jenis".to_string()))
        .chain(jenis_options.iter().skip(1).cloned())
        .collect();
    let status_options = vec![
        (String::new(), "Semua Status".to_string()),
        ("Pending".to_string(), "Menunggu".to_string()),
        ("Approved".to_string(), "Disetujui".to_string()),
        ("Rejected".to_string(), "Ditolak".to_string()),
    ];

    let dialog_open = Signal::derive(move || decide_target.get().is_some());
    let dialog_is_approve = create_memo(move |_| {
        decide_target
            .get()
            .map(|(_, approve)| approve)
            .unwrap_or(true)
    });
    let dialog_title = Signal::derive(move || {
        if dialog_is_approve.get() {
            "Setujui Dokumen".to_string()
        } else {
            "Tolak Dokumen".to_string()
        }
    });
    let dialog_message = Signal::derive(move || {
        decide_target
            .get()
            .map(|(dokumen, approve)| {
                if approve {
                    format!("Setujui \"{}\"?", dokumen.judul)
                } else {
                    format!("Tolak \"{}\"? Alasan wajib diisi.", dokumen.judul)
                }
            })
            .unwrap_or_default()
    });
    let confirm_disabled = Signal::derive(move || {
        !dialog_is_approve.get() && reject_reason.get().trim().is_empty()
    });

    let on_dialog_confirm = Callback::new(move |_| {
        if let Some((dokumen, approve)) = decide_target.get_untracked() {
            decide_action.dispatch((dokumen.id, approve, reject_reason.get_untracked()));
        }
    });
    let on_dialog_cancel = Callback::new(move |_| {
        decide_target.set(None);
        reject_reason.set(String::new());
    });

    view! {
        <div class="space-y-6">
            <Show when=move || can_upload(auth.get().role())>
                <form
                    class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5 space-y-4"
                    on:submit=on_upload
                >
                    <h3 class="text-base font-semibold text-fg">"Unggah Dokumen"</h3>
                    <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                        <TextField value=judul label="Judul" placeholder="Judul dokumen" />
                        <SelectField value=jenis label="Jenis" options=upload_jenis_options.clone() />
                    </div>
                    <FileField label="Berkas (PDF/DOC/DOCX, maks 10 MB)" accept=".pdf,.doc,.docx" on_file=on_file />
                    <InlineErrorMessage error=form_error.into() />
                    <button
                        type="submit"
                        class="rounded-xl bg-action-primary-bg text-action-primary-text px-5 py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                        disabled=move || upload_action.pending().get()
                    >
                        {move || if upload_action.pending().get() { "Mengunggah..." } else { "Unggah" }}
                    </button>
                </form>
            </Show>

            <div class="flex flex-col sm:flex-row gap-3 sm:items-end">
                <SearchBox value=store.search placeholder="Cari judul atau pengunggah..." />
                <SelectField value=filters.status label="Status" options=status_options />
                <SelectField value=filters.jenis label="Jenis" options=jenis_options />
            </div>

            <InlineErrorMessage error=load_error.into() />
            <InlineErrorMessage error=action_error.into() />

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    rows.get().map(|_| {
                        let visible = store.filtered.get();
                        if visible.is_empty() {
                            view! { <EmptyState message="Belum ada dokumen".to_string() /> }.into_view()
                        } else {
                            view! {
                                <div class="overflow-x-auto bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                    <table class="min-w-full divide-y divide-border text-sm">
                                        <thead>
                                            <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                <th class="px-4 py-3">"Judul"</th>
                                                <th class="px-4 py-3">"Jenis"</th>
                                                <th class="px-4 py-3">"Pengunggah"</th>
                                                <th class="px-4 py-3">"Tanggal"</th>
                                                <th class="px-4 py-3">"Status"</th>
                                                <th class="px-4 py-3">"Aksi"</th>
                                            </tr>
                                        </thead>
                                        <tbody class="divide-y divide-border">
                                            {visible
                                                .into_iter()
                                                .map(|dokumen| {
                                                    let decidable = can_decide(auth.get().role(), &dokumen);
                                                    let deletable = can_delete(auth.get().user.as_ref(), &dokumen);
                                                    let approve_target = dokumen.clone();
                                                    let reject_target = dokumen.clone();
                                                    let delete_id = dokumen.id.clone();
                                                    view! {
                                                        <tr>
                                                            <td class="px-4 py-3 font-medium text-fg">{dokumen.judul.clone()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{dokumen.jenis.label()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{dokumen.pengunggah_nama.clone()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{format::tanggal_waktu(&dokumen.created_at)}</td>
                                                            <td class="px-4 py-3">
                                                                <DokumenStatusBadge status=dokumen.status />
                                                                {dokumen.alasan_penolakan.clone().map(|alasan| view! {
                                                                    <p class="text-xs text-fg-muted mt-1">{format!("Alasan: {}", alasan)}</p>
                                                                })}
                                                            </td>
                                                            <td class="px-4 py-3 space-x-2 whitespace-nowrap">
                                                                <Show when=move || decidable>
                                                                    <button
                                                                        class="text-status-success-text hover:underline text-sm font-semibold"
                                                                        on:click={
                                                                            let dokumen = approve_target.clone();
                                                                            move |_| decide_target.set(Some((dokumen.clone(), true)))
                                                                        }
                                                                    >
                                                                        "Setujui"
                                                                    </button>
                                                                    <button
                                                                        class="text-status-error-text hover:underline text-sm font-semibold"
                                                                        on:click={
                                                                            let dokumen = reject_target.clone();
                                                                            move |_| decide_target.set(Some((dokumen.clone(), false)))
                                                                        }
                                                                    >
                                                                        "Tolak"
                                                                    </button>
                                                                </Show>
                                                                <Show when=move || deletable>
                                                                    <button
                                                                        class="text-fg-muted hover:text-status-error-text text-sm font-semibold"
                                                                        on:click={
                                                                            let id = delete_id.clone();
                                                                            move |_| delete_action.dispatch(id.clone())
                                                                        }
                                                                    >
                                                                        "Hapus"
                                                                    </button>
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
                        }
                    })
                }}
            </Suspense>

            <ConfirmDialog
                is_open=dialog_open
                title=dialog_title
                message=dialog_message
                confirm_label=Signal::derive(move || {
                    if dialog_is_approve.get() { "Setujui".to_string() } else { "Tolak".to_string() }
                })
                confirm_disabled=confirm_disabled
                destructive=false
                on_confirm=on_dialog_confirm
                on_cancel=on_dialog_cancel
            >
                {move || {
                    if dialog_is_approve.get() {
                        ().into_view()
                    } else {
                        view! {
                            <textarea
                                class="w-full rounded-xl border-2 border-form-control-border bg-form-control-bg py-2.5 px-4 text-sm shadow-sm focus:border-action-primary-border-hover focus:outline-none"
                                rows="3"
                                placeholder="Alasan penolakan"
                                prop:value=move || reject_reason.get()
                                on:input=move |ev| reject_reason.set(event_target_value(&ev))
                            ></textarea>
                        }.into_view()
                    }
                }}
            </ConfirmDialog>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::can_upload;
    use crate::api::types::Role;

    #[test]
    fn upload_form_is_for_students_and_tata_usaha() {
        assert!(can_upload(Some(Role::Mahasiswa)));
        assert!(can_upload(Some(Role::TuFakultas)));
        assert!(!can_upload(Some(Role::Dosen)));
        assert!(!can_upload(Some(Role::Kaprodi)));
        assert!(!can_upload(None));
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{kaprodi_user, provide_auth};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn kaprodi_view_has_filters_but_no_upload_form() {
        let html = render_to_string(move || {
            provide_auth(Some(kaprodi_user()));
            view! { <DokumenPanel /> }
        });
        assert!(html.contains("Semua Status"));
        assert!(!html.contains("Unggah Dokumen"));
    }

    #[test]
    fn mahasiswa_view_has_upload_form() {
        let html = render_to_string(move || {
            provide_auth(Some(crate::test_support::helpers::mahasiswa_user()));
            view! { <DokumenPanel /> }
        });
        assert!(html.contains("Unggah Dokumen"));
        assert!(html.contains("maks 10 MB"));
    }
}
