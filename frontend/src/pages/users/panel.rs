use leptos::*;

use crate::api::types::{ApiError, CreateUserRequest, Role, UserProfile};
use crate::api::ApiClient;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::{SearchBox, SelectField, TextField};
use crate::components::guard::RequireRole;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::pages::users::repository::UsersRepository;
use crate::pages::users::view_model::{build_create_request, parse_role, role_wire, ROLE_OPTIONS};
use crate::state::list::ListStore;

const ALLOWED: &[Role] = &[Role::Admin, Role::TuFakultas, Role::TuProdi];

#[component]
pub fn UsersPage() -> impl IntoView {
    view! {
        <RequireRole allowed=ALLOWED>
            {|| view! {
                <PageScaffold title="Manajemen Pengguna".to_string()>
                    <UsersPanel />
                </PageScaffold>
            }}
        </RequireRole>
    }
}

#[component]
fn UsersPanel() -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let repo = UsersRepository::new(api);
    let toasts = use_toasts();

    let role_filter = create_rw_signal(String::new());
    let generation = create_rw_signal(0u32);
    let store: ListStore<UserProfile> = ListStore::new();
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let list_repo = repo.clone();
    let rows = create_resource(
        move || (parse_role(&role_filter.get()), generation.get()),
        move |(role, _)| {
            let repo = list_repo.clone();
            async move { repo.list(role).await }
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

    // Create form.
    let nama = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let role_new = create_rw_signal(String::new());
    let nim = create_rw_signal(String::new());
    let nidn = create_rw_signal(String::new());
    let form_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let create_repo = repo.clone();
    let create_action = create_action(move |request: &CreateUserRequest| {
        let request = request.clone();
        let repo = create_repo.clone();
        async move { repo.create(request).await }
    });
    create_effect(move |_| {
        if let Some(result) = create_action.value().get() {
            match result {
                Ok(_) => {
                    toasts.success("Pengguna berhasil ditambahkan");
                    for signal in [nama, email, password, role_new, nim, nidn] {
                        signal.set(String::new());
                    }
                    form_error.set(None);
                    generation.update(|n| *n += 1);
                }
                Err(err) => form_error.set(Some(err)),
            }
        }
    });

    let on_create = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        match build_create_request(
            &nama.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &role_new.get_untracked(),
            &nim.get_untracked(),
            &nidn.get_untracked(),
        ) {
            Ok(request) => create_action.dispatch(request),
            Err(message) => form_error.set(Some(ApiError::validation(message))),
        }
    };

    let delete_repo = repo.clone();
    let delete_action = leptos::create_action(move |id: &String| {
        let id = id.clone();
        let repo = delete_repo.clone();
        async move { repo.delete(&id).await.map(|_| id) }
    });
    create_effect(move |_| {
        if let Some(result) = delete_action.value().get() {
            match result {
                Ok(id) => {
                    toasts.success("Pengguna dihapus");
                    store.remove_row(&id);
                }
                Err(err) => toasts.error(err.user_message()),
            }
        }
    });

    let role_options: Vec<(String, String)> = std::iter::once((String::new(), "Semua Peran".to_string()))
        .chain(ROLE_OPTIONS.iter().map(|role| (role_wire(*role), role.label().to_string())))
        .collect();
    let role_new_options: Vec<(String, String)> = std::iter::once((String::new(), "Pilih peran".to_string()))
        .chain(role_options.iter().skip(1).cloned())
        .collect();

    view! {
        <div class="space-y-6">
            <form
                class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5 space-y-4"
                on:submit=on_create
            >
                <h3 class="text-base font-semibold text-fg">"Tambah Pengguna"</h3>
                <div class="grid grid-cols-1 sm:grid-cols-3 gap-4">
                    <TextField value=nama label="Nama" />
                    <TextField value=email label="Email" input_type="email" />
                    <TextField value=password label="Kata Sandi" input_type="password" />
                    <SelectField value=role_new label="Peran" options=role_new_options />
                    <TextField value=nim label="NIM (mahasiswa)" />
                    <TextField value=nidn label="NIDN (dosen)" />
                </div>
                <InlineErrorMessage error=form_error.into() />
                <button
                    type="submit"
                    class="rounded-xl bg-action-primary-bg text-action-primary-text px-5 py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                    disabled=move || create_action.pending().get()
                >
                    "Simpan"
                </button>
            </form>

            <div class="flex flex-col sm:flex-row gap-3 sm:items-end">
                <SearchBox value=store.search placeholder="Cari nama, email, NIM..." />
                <SelectField value=role_filter label="Peran" options=role_options />
            </div>

            <InlineErrorMessage error=load_error.into() />

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    rows.get().map(|_| {
                        let visible = store.filtered.get();
                        if visible.is_empty() {
                            view! { <EmptyState message="Tidak ada pengguna yang cocok".to_string() /> }.into_view()
                        } else {
                            view! {
                                <div class="overflow-x-auto bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                    <table class="min-w-full divide-y divide-border text-sm">
                                        <thead>
                                            <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                <th class="px-4 py-3">"Nama"</th>
                                                <th class="px-4 py-3">"Email"</th>
                                                <th class="px-4 py-3">"Peran"</th>
                                                <th class="px-4 py-3">"NIM/NIDN"</th>
                                                <th class="px-4 py-3">"Aksi"</th>
                                            </tr>
                                        </thead>
                                        <tbody class="divide-y divide-border">
                                            {visible
                                                .into_iter()
                                                .map(|user| {
                                                    let delete_id = user.id.clone();
                                                    let nomor = user
                                                        .nim
                                                        .clone()
                                                        .or(user.nidn.clone())
                                                        .unwrap_or_else(|| "-".into());
                                                    view! {
                                                        <tr>
                                                            <td class="px-4 py-3 font-medium text-fg">{user.nama.clone()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{user.email.clone()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{user.role.label()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{nomor}</td>
                                                            <td class="px-4 py-3">
                                                                <button
                                                                    class="text-fg-muted hover:text-status-error-text text-sm font-semibold"
                                                                    on:click={
                                                                        let id = delete_id.clone();
                                                                        move |_| delete_action.dispatch(id.clone())
                                                                    }
                                                                >
                                                                    "Hapus"
                                                                </button>
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
        </div>
    }
}
