use leptos::*;

use crate::api::types::{ApiError, Role, TahunAkademik};
use crate::api::ApiClient;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::{SelectField, TextField};
use crate::components::guard::RequireRole;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;

const ALLOWED: &[Role] = &[Role::Admin, Role::TuFakultas];

/// "2025/2026 Ganjil" or "2025/2026 Genap".
pub fn tahun_nama_valid(nama: &str) -> bool {
    let mut parts = nama.split_whitespace();
    let (Some(tahun), Some(semester), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let Some((awal, akhir)) = tahun.split_once('/') else {
        return false;
    };
    let tahun_berurutan = match (awal.parse::<u32>(), akhir.parse::<u32>()) {
        (Ok(a), Ok(b)) => awal.len() == 4 && b == a + 1,
        _ => false,
    };
    tahun_berurutan && matches!(semester, "Ganjil" | "Genap")
}

#[component]
pub fn MasterDataPage() -> impl IntoView {
    view! {
        <RequireRole allowed=ALLOWED>
            {|| view! {
                <PageScaffold title="Data Master".to_string()>
                    <MasterDataPanel />
                </PageScaffold>
            }}
        </RequireRole>
    }
}

#[component]
fn MasterDataPanel() -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let toasts = use_toasts();
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let fakultas_filter = create_rw_signal(String::new());
    let generation = create_rw_signal(0u32);

    let list_api = api.clone();
    let loaded = create_resource(
        move || (fakultas_filter.get(), generation.get()),
        move |(fakultas_id, _)| {
            let api = list_api.clone();
            async move {
                let fakultas = api.list_fakultas().await?;
                let filter = (!fakultas_id.is_empty()).then_some(fakultas_id);
                let prodi = api.list_prodi(filter.as_deref()).await?;
                let tahun = api.list_tahun_akademik().await?;
                Ok::<_, ApiError>((fakultas, prodi, tahun))
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = loaded.get() {
            load_error.set(result.err());
        }
    });

    // Tahun akademik management.
    let tahun_nama = create_rw_signal(String::new());
    let form_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let create_api = api.clone();
    let create_action = create_action(move |nama: &String| {
        let nama = nama.clone();
        let api = create_api.clone();
        async move { api.create_tahun_akademik(&nama).await }
    });
    create_effect(move |_| {
        if let Some(result) = create_action.value().get() {
            match result {
                Ok(created) => {
                    toasts.success(format!("Tahun akademik {} ditambahkan", created.nama));
                    tahun_nama.set(String::new());
                    form_error.set(None);
                    generation.update(|g| *g += 1);
                }
                Err(err) => form_error.set(Some(err)),
            }
        }
    });

    let on_create = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let nama = tahun_nama.get_untracked();
        if !tahun_nama_valid(nama.trim()) {
            form_error.set(Some(ApiError::validation(
                "Format tahun akademik: 2025/2026 Ganjil atau Genap",
            )));
            return;
        }
        create_action.dispatch(nama.trim().to_string());
    };

    // Activating one term deactivates the rest; confirm before switching.
    let aktifkan_target: RwSignal<Option<TahunAkademik>> = create_rw_signal(None);
    let aktifkan_api = api.clone();
    let aktifkan_action = leptos::create_action(move |id: &String| {
        let id = id.clone();
        let api = aktifkan_api.clone();
        async move { api.aktifkan_tahun_akademik(&id).await }
    });
    create_effect(move |_| {
        if let Some(result) = aktifkan_action.value().get() {
            match result {
                Ok(aktif) => {
                    toasts.success(format!("{} sekarang aktif", aktif.nama));
                    generation.update(|g| *g += 1);
                }
                Err(err) => toasts.error(err.user_message()),
            }
        }
    });

    let dialog_open = Signal::derive(move || aktifkan_target.get().is_some());
    let dialog_message = Signal::derive(move || {
        aktifkan_target
            .get()
            .map(|t| {
                format!(
                    "Aktifkan {}? Tahun akademik aktif saat ini akan dinonaktifkan.",
                    t.nama
                )
            })
            .unwrap_or_default()
    });

    view! {
        <div class="space-y-6">
            <InlineErrorMessage error=load_error.into() />
            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    loaded.get().map(|result| {
                        let Ok((fakultas, prodi, tahun)) = result else {
                            return ().into_view();
                        };
                        let fakultas_options: Vec<(String, String)> =
                            std::iter::once((String::new(), "Semua Fakultas".to_string()))
                                .chain(fakultas.iter().map(|f| (f.id.clone(), f.nama.clone())))
                                .collect();
                        view! {
                            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                                <section class="bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                    <header class="border-b border-border px-5 py-4">
                                        <h3 class="text-base font-semibold text-fg">"Fakultas"</h3>
                                    </header>
                                    {if fakultas.is_empty() {
                                        view! { <EmptyState message="Belum ada fakultas".to_string() /> }.into_view()
                                    } else {
                                        view! {
                                            <table class="min-w-full divide-y divide-border text-sm">
                                                <thead>
                                                    <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                        <th class="px-4 py-3">"Kode"</th>
                                                        <th class="px-4 py-3">"Nama"</th>
                                                    </tr>
                                                </thead>
                                                <tbody class="divide-y divide-border">
                                                    {fakultas.iter().map(|f| view! {
                                                        <tr>
                                                            <td class="px-4 py-3 text-fg-muted">{f.kode.clone()}</td>
                                                            <td class="px-4 py-3 font-medium text-fg">{f.nama.clone()}</td>
                                                        </tr>
                                                    }).collect_view()}
                                                </tbody>
                                            </table>
                                        }.into_view()
                                    }}
                                </section>

                                <section class="bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                    <header class="flex items-center justify-between gap-3 border-b border-border px-5 py-4">
                                        <h3 class="text-base font-semibold text-fg">"Program Studi"</h3>
                                        <SelectField value=fakultas_filter label="Fakultas" options=fakultas_options />
                                    </header>
                                    {if prodi.is_empty() {
                                        view! { <EmptyState message="Belum ada program studi".to_string() /> }.into_view()
                                    } else {
                                        view! {
                                            <table class="min-w-full divide-y divide-border text-sm">
                                                <thead>
                                                    <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                        <th class="px-4 py-3">"Kode"</th>
                                                        <th class="px-4 py-3">"Nama"</th>
                                                        <th class="px-4 py-3">"Jenjang"</th>
                                                    </tr>
                                                </thead>
                                                <tbody class="divide-y divide-border">
                                                    {prodi.iter().map(|p| view! {
                                                        <tr>
                                                            <td class="px-4 py-3 text-fg-muted">{p.kode.clone()}</td>
                                                            <td class="px-4 py-3 font-medium text-fg">{p.nama.clone()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{p.jenjang.clone().unwrap_or_else(|| "-".into())}</td>
                                                        </tr>
                                                    }).collect_view()}
                                                </tbody>
                                            </table>
                                        }.into_view()
                                    }}
                                </section>
                            </div>

                            <section class="bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                <header class="border-b border-border px-5 py-4">
                                    <h3 class="text-base font-semibold text-fg">"Tahun Akademik"</h3>
                                </header>
                                <div class="p-5 space-y-4">
                                    <form class="flex flex-col sm:flex-row gap-3 sm:items-end" on:submit=on_create>
                                        <TextField value=tahun_nama label="Tahun Akademik Baru" placeholder="2025/2026 Ganjil" />
                                        <button
                                            type="submit"
                                            class="rounded-xl bg-action-primary-bg text-action-primary-text px-5 py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                                            disabled=move || create_action.pending().get()
                                        >
                                            "Tambah"
                                        </button>
                                    </form>
                                    <InlineErrorMessage error=form_error.into() />
                                    <table class="min-w-full divide-y divide-border text-sm">
                                        <thead>
                                            <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                <th class="px-4 py-3">"Nama"</th>
                                                <th class="px-4 py-3">"Status"</th>
                                                <th class="px-4 py-3">"Aksi"</th>
                                            </tr>
                                        </thead>
                                        <tbody class="divide-y divide-border">
                                            {tahun.iter().map(|t| {
                                                let target = t.clone();
                                                let is_aktif = t.is_aktif;
                                                view! {
                                                    <tr>
                                                        <td class="px-4 py-3 font-medium text-fg">{t.nama.clone()}</td>
                                                        <td class="px-4 py-3">
                                                            {if is_aktif {
                                                                view! { <span class="inline-flex rounded-full bg-status-success-bg text-status-success-text px-2.5 py-0.5 text-xs font-semibold">"Aktif"</span> }.into_view()
                                                            } else {
                                                                view! { <span class="text-fg-muted text-xs">"Nonaktif"</span> }.into_view()
                                                            }}
                                                        </td>
                                                        <td class="px-4 py-3">
                                                            <Show when=move || !is_aktif>
                                                                <button
                                                                    class="text-status-success-text hover:underline text-sm font-semibold"
                                                                    on:click={
                                                                        let target = target.clone();
                                                                        move |_| aktifkan_target.set(Some(target.clone()))
                                                                    }
                                                                >
                                                                    "Aktifkan"
                                                                </button>
                                                            </Show>
                                                        </td>
                                                    </tr>
                                                }
                                            }).collect_view()}
                                        </tbody>
                                    </table>
                                </div>
                            </section>
                        }
                        .into_view()
                    })
                }}
            </Suspense>

            <ConfirmDialog
                is_open=dialog_open
                title="Aktifkan Tahun Akademik".to_string()
                message=dialog_message
                confirm_label="Aktifkan".to_string()
                on_confirm=Callback::new(move |_| {
                    if let Some(tahun) = aktifkan_target.get_untracked() {
                        aktifkan_action.dispatch(tahun.id);
                    }
                    aktifkan_target.set(None);
                })
                on_cancel=Callback::new(move |_| aktifkan_target.set(None))
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::tahun_nama_valid;

    #[test]
    fn tahun_akademik_name_format() {
        assert!(tahun_nama_valid("2025/2026 Ganjil"));
        assert!(tahun_nama_valid("2025/2026 Genap"));
        assert!(!tahun_nama_valid("2025/2026"));
        assert!(!tahun_nama_valid("2025/2027 Ganjil"));
        assert!(!tahun_nama_valid("2025-2026 Ganjil"));
        assert!(!tahun_nama_valid("2025/2026 Pendek"));
        assert!(!tahun_nama_valid(""));
    }
}
