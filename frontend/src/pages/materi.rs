use leptos::*;

use crate::api::types::{ApiError, JadwalKuliah, MateriKuliah, MateriUploadMeta, Role, UserProfile};
use crate::api::ApiClient;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::{FileField, SearchBox, SelectField, TextField};
use crate::components::guard::RequireAuth;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::state::auth::use_auth;
use crate::state::list::{ListStore, Searchable};
use crate::utils::format;
use crate::utils::upload::{self, UploadPayload};

impl Searchable for MateriKuliah {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn haystack(&self) -> String {
        format!("{} {} {}", self.judul, self.nama_matkul, self.dosen_nama)
    }
}

pub fn can_upload(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Dosen))
}

/// Admin moderates everything; a dosen only removes materials attached to
/// one of their own classes.
pub fn can_delete(
    user: Option<&UserProfile>,
    materi: &MateriKuliah,
    own_jadwal: &[JadwalKuliah],
) -> bool {
    match user {
        Some(user) if user.role == Role::Admin => true,
        Some(user) if user.role == Role::Dosen => own_jadwal
            .iter()
            .any(|jadwal| jadwal.dosen_id == user.id && jadwal.id == materi.jadwal_id),
        _ => false,
    }
}

#[component]
pub fn MateriPage() -> impl IntoView {
    view! {
        <RequireAuth>
            {|| view! {
                <PageScaffold title="Materi Kuliah".to_string()>
                    <MateriPanel />
                </PageScaffold>
            }}
        </RequireAuth>
    }
}

#[component]
fn MateriPanel() -> impl IntoView {
    let (auth, _) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();
    let toasts = use_toasts();

    let store: ListStore<MateriKuliah> = ListStore::new();
    let generation = create_rw_signal(0u32);
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let list_api = api.clone();
    let loaded = create_resource(
        move || generation.get(),
        move |_| {
            let api = list_api.clone();
            async move {
                let materi = api.list_materi(None).await?;
                let jadwal = api.list_jadwal_kuliah(None).await?;
                Ok::<_, ApiError>((materi, jadwal))
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = loaded.get() {
            match result {
                Ok((materi, _)) => {
                    load_error.set(None);
                    store.set_rows(materi);
                }
                Err(err) => load_error.set(Some(err)),
            }
        }
    });

    // Upload form (dosen).
    let judul = create_rw_signal(String::new());
    let deskripsi = create_rw_signal(String::new());
    let jadwal_id = create_rw_signal(String::new());
    let pending_file: RwSignal<Option<UploadPayload>> = create_rw_signal(None);
    let form_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let on_file = Callback::new(move |file: web_sys::File| {
        #[cfg(target_arch = "wasm32")]
        {
            spawn_local(async move {
                match upload::read_file(&file, &upload::UploadRule::materi()).await {
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

    let upload_api = api.clone();
    let upload_action = create_action(move |input: &(MateriUploadMeta, UploadPayload)| {
        let (meta, file) = input.clone();
        let api = upload_api.clone();
        async move { api.upload_materi(&meta, file).await }
    });
    create_effect(move |_| {
        if let Some(result) = upload_action.value().get() {
            match result {
                Ok(_) => {
                    toasts.success("Materi berhasil diunggah");
                    judul.set(String::new());
                    deskripsi.set(String::new());
                    jadwal_id.set(String::new());
                    pending_file.set(None);
                    form_error.set(None);
                    generation.update(|g| *g += 1);
                }
                Err(err) => form_error.set(Some(err)),
            }
        }
    });

    let on_upload = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let judul_value = judul.get_untracked();
        let jadwal_value = jadwal_id.get_untracked();
        if judul_value.trim().is_empty() {
            form_error.set(Some(ApiError::validation("Judul materi wajib diisi")));
            return;
        }
        if jadwal_value.is_empty() {
            form_error.set(Some(ApiError::validation("Pilih mata kuliah terlebih dahulu")));
            return;
        }
        let Some(file) = pending_file.get_untracked() else {
            form_error.set(Some(ApiError::validation("Pilih berkas terlebih dahulu")));
            return;
        };
        let deskripsi_value = deskripsi.get_untracked();
        upload_action.dispatch((
            MateriUploadMeta {
                judul: judul_value.trim().to_string(),
                deskripsi: (!deskripsi_value.trim().is_empty())
                    .then(|| deskripsi_value.trim().to_string()),
                jadwal_id: jadwal_value,
            },
            file,
        ));
    };

    let delete_api = api.clone();
    let delete_action = create_action(move |id: &String| {
        let id = id.clone();
        let api = delete_api.clone();
        async move { api.delete_materi(&id).await.map(|_| id) }
    });
    create_effect(move |_| {
        if let Some(result) = delete_action.value().get() {
            match result {
                Ok(id) => {
                    toasts.success("Materi dihapus");
                    store.remove_row(&id);
                }
                Err(err) => toasts.error(err.user_message()),
            }
        }
    });

    view! {
        <div class="space-y-6">
            <Show when=move || can_upload(auth.get().role())>
                <form
                    class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5 space-y-4"
                    on:submit=on_upload
                >
                    <h3 class="text-base font-semibold text-fg">"Unggah Materi"</h3>
                    <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                        <TextField value=judul label="Judul" placeholder="Judul materi" />
                        <TextField value=deskripsi label="Deskripsi (opsional)" placeholder="Deskripsi singkat" />
                    </div>
                    {move || {
                        let user_id = auth.get().user.map(|u| u.id);
                        let options: Vec<(String, String)> = std::iter::once(
                            (String::new(), "Pilih mata kuliah".to_string()),
                        )
                        .chain(
                            loaded
                                .get()
                                .and_then(Result::ok)
                                .map(|(_, jadwal)| jadwal)
                                .unwrap_or_default()
                                .into_iter()
                                .filter(|j| Some(&j.dosen_id) == user_id.as_ref())
                                .map(|j| (j.id, format!("{} - {}", j.kode_matkul, j.nama_matkul))),
                        )
                        .collect();
                        view! { <SelectField value=jadwal_id label="Mata Kuliah" options=options /> }
                    }}
                    <FileField
                        label="Berkas (PDF/DOC/DOCX/PPT/PPTX, maks 15 MB)"
                        accept=".pdf,.doc,.docx,.ppt,.pptx"
                        on_file=on_file
                    />
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

            <div class="max-w-sm">
                <SearchBox value=store.search placeholder="Cari judul atau mata kuliah..." />
            </div>

            <InlineErrorMessage error=load_error.into() />

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    loaded.get().map(|result| {
                        let Ok((_, jadwal)) = result else {
                            return ().into_view();
                        };
                        let visible = store.filtered.get();
                        if visible.is_empty() {
                            return view! { <EmptyState message="Belum ada materi".to_string() /> }
                                .into_view();
                        }
                        let user = auth.get().user;
                        view! {
                            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                {visible
                                    .into_iter()
                                    .map(|materi| {
                                        let deletable = can_delete(user.as_ref(), &materi, &jadwal);
                                        let delete_id = materi.id.clone();
                                        view! {
                                            <div class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5 space-y-2">
                                                <div class="flex items-start justify-between gap-3">
                                                    <div>
                                                        <p class="font-semibold text-fg">{materi.judul.clone()}</p>
                                                        <p class="text-sm text-fg-muted">{materi.nama_matkul.clone()}</p>
                                                    </div>
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
                                                </div>
                                                {materi.deskripsi.clone().map(|d| view! {
                                                    <p class="text-sm text-fg-muted">{d}</p>
                                                })}
                                                <p class="text-xs text-fg-muted">
                                                    {format!(
                                                        "{} oleh {}, {}",
                                                        materi.file_name,
                                                        materi.dosen_nama,
                                                        format::tanggal_waktu(&materi.created_at)
                                                    )}
                                                </p>
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                        .into_view()
                    })
                }}
            </Suspense>
        </div>
    }
}
