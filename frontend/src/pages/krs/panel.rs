use leptos::*;

use crate::api::types::{ApiError, Krs, Role};
use crate::api::ApiClient;
use crate::components::badge::KrsStatusBadge;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::guard::RequireRole;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::pages::krs::repository::KrsRepository;
use crate::pages::krs::view_model::add_blocker;

const ALLOWED: &[Role] = &[Role::Mahasiswa];

#[component]
pub fn KrsPage() -> impl IntoView {
    view! {
        <RequireRole allowed=ALLOWED>
            {|| view! {
                <PageScaffold title="Kartu Rencana Studi".to_string()>
                    <KrsPanel />
                </PageScaffold>
            }}
        </RequireRole>
    }
}

#[component]
fn KrsPanel() -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let repo = KrsRepository::new(api);
    let toasts = use_toasts();

    let krs: RwSignal<Option<Krs>> = create_rw_signal(None);
    let generation = create_rw_signal(0u32);
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let load_repo = repo.clone();
    let loaded = create_resource(
        move || generation.get(),
        move |_| {
            let repo = load_repo.clone();
            async move {
                let plan = repo.my_krs().await?;
                let tahun = repo.active_tahun().await?;
                let courses = repo.available_courses().await?;
                Ok::<_, ApiError>((plan, tahun, courses))
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = loaded.get() {
            match result {
                Ok((plan, _, _)) => {
                    load_error.set(None);
                    krs.set(plan);
                }
                Err(err) => load_error.set(Some(err)),
            }
        }
    });

    let create_repo = repo.clone();
    let create_action = create_action(move |tahun_id: &String| {
        let tahun_id = tahun_id.clone();
        let repo = create_repo.clone();
        async move { repo.create(&tahun_id).await }
    });

    let add_repo = repo.clone();
    let add_action = leptos::create_action(move |input: &(String, String)| {
        let (krs_id, jadwal_id) = input.clone();
        let repo = add_repo.clone();
        async move { repo.add_item(&krs_id, &jadwal_id).await }
    });

    let remove_repo = repo.clone();
    let remove_action = leptos::create_action(move |input: &(String, String)| {
        let (krs_id, item_id) = input.clone();
        let repo = remove_repo.clone();
        async move { repo.remove_item(&krs_id, &item_id).await }
    });

    let submit_repo = repo.clone();
    let submit_action = leptos::create_action(move |krs_id: &String| {
        let krs_id = krs_id.clone();
        let repo = submit_repo.clone();
        async move { repo.submit(&krs_id).await }
    });

    // All four mutations resolve to the updated plan.
    create_effect(move |_| {
        for value in [
            create_action.value().get(),
            add_action.value().get(),
            remove_action.value().get(),
            submit_action.value().get(),
        ]
        .into_iter()
        .flatten()
        {
            match value {
                Ok(updated) => {
                    krs.set(Some(updated));
                    load_error.set(None);
                }
                Err(err) => toasts.error(err.user_message()),
            }
        }
    });

    let submit_confirm = create_rw_signal(false);
    let dialog_open = Signal::derive(move || submit_confirm.get());

    view! {
        <div class="space-y-6">
            <InlineErrorMessage error=load_error.into() />
            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    loaded.get().map(|result| {
                        let Ok((_, tahun, courses)) = result else {
                            return ().into_view();
                        };
                        match krs.get() {
                            None => {
                                let tahun_aktif = tahun.clone();
                                view! {
                                    <div class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-8 text-center space-y-4">
                                        <p class="text-fg-muted">
                                            {tahun_aktif
                                                .as_ref()
                                                .map(|t| format!("Belum ada KRS untuk {}", t.nama))
                                                .unwrap_or_else(|| "Tidak ada tahun akademik aktif".to_string())}
                                        </p>
                                        {tahun_aktif.map(|t| view! {
                                            <button
                                                class="rounded-xl bg-action-primary-bg text-action-primary-text px-5 py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                                                disabled=move || create_action.pending().get()
                                                on:click={
                                                    let id = t.id.clone();
                                                    move |_| create_action.dispatch(id.clone())
                                                }
                                            >
                                                "Buat KRS"
                                            </button>
                                        })}
                                    </div>
                                }.into_view()
                            }
                            Some(plan) => {
                                let editable = plan.status.is_editable();
                                let plan_id = plan.id.clone();
                                let submit_disabled = plan.items.is_empty();
                                view! {
                                    <div class="space-y-6">
                                        <div class="flex items-center justify-between bg-surface-elevated rounded-2xl border border-border shadow-sm p-5">
                                            <div class="space-y-1">
                                                <p class="text-sm text-fg-muted">
                                                    {plan.tahun_akademik_nama.clone().unwrap_or_default()}
                                                </p>
                                                <p class="text-lg font-semibold text-fg">
                                                    {format!("Total {} SKS", plan.total_sks())}
                                                </p>
                                            </div>
                                            <div class="flex items-center gap-3">
                                                <KrsStatusBadge status=plan.status />
                                                <Show when=move || editable>
                                                    <button
                                                        class="rounded-xl bg-action-primary-bg text-action-primary-text px-5 py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                                                        disabled=move || submit_disabled
                                                        on:click=move |_| submit_confirm.set(true)
                                                    >
                                                        "Ajukan KRS"
                                                    </button>
                                                </Show>
                                            </div>
                                        </div>

                                        {if plan.items.is_empty() {
                                            view! { <EmptyState message="Belum ada mata kuliah di KRS".to_string() /> }.into_view()
                                        } else {
                                            view! {
                                                <div class="overflow-x-auto bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                                    <table class="min-w-full divide-y divide-border text-sm">
                                                        <thead>
                                                            <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                                <th class="px-4 py-3">"Kode"</th>
                                                                <th class="px-4 py-3">"Mata Kuliah"</th>
                                                                <th class="px-4 py-3">"SKS"</th>
                                                                <th class="px-4 py-3">"Jadwal"</th>
                                                                <th class="px-4 py-3">"Dosen"</th>
                                                                <Show when=move || editable>
                                                                    <th class="px-4 py-3">"Aksi"</th>
                                                                </Show>
                                                            </tr>
                                                        </thead>
                                                        <tbody class="divide-y divide-border">
                                                            {plan.items.iter().map(|item| {
                                                                let item_id = item.id.clone();
                                                                let krs_id = plan_id.clone();
                                                                view! {
                                                                    <tr>
                                                                        <td class="px-4 py-3 text-fg-muted">{item.kode_matkul.clone()}</td>
                                                                        <td class="px-4 py-3 font-medium text-fg">{item.nama_matkul.clone()}</td>
                                                                        <td class="px-4 py-3">{item.sks}</td>
                                                                        <td class="px-4 py-3 text-fg-muted">
                                                                            {format!("{} {}-{} ({})", item.hari, item.jam_mulai, item.jam_selesai, item.ruangan)}
                                                                        </td>
                                                                        <td class="px-4 py-3 text-fg-muted">{item.dosen_nama.clone()}</td>
                                                                        <Show when=move || editable>
                                                                            <td class="px-4 py-3">
                                                                                <button
                                                                                    class="text-status-error-text hover:underline text-sm font-semibold"
                                                                                    on:click={
                                                                                        let krs_id = krs_id.clone();
                                                                                        let item_id = item_id.clone();
                                                                                        move |_| remove_action.dispatch((krs_id.clone(), item_id.clone()))
                                                                                    }
                                                                                >
                                                                                    "Hapus"
                                                                                </button>
                                                                            </td>
                                                                        </Show>
                                                                    </tr>
                                                                }
                                                            }).collect_view()}
                                                        </tbody>
                                                    </table>
                                                </div>
                                            }.into_view()
                                        }}

                                        <Show when=move || editable>
                                            <div class="space-y-3">
                                                <h3 class="text-base font-semibold text-fg">"Mata Kuliah Tersedia"</h3>
                                                <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                                                    {courses.iter().map(|course| {
                                                        let blocker = krs.get().as_ref().and_then(|plan| add_blocker(plan, course));
                                                        let krs_id = plan_id.clone();
                                                        let course_id = course.id.clone();
                                                        let blocked = blocker.is_some();
                                                        view! {
                                                            <div class="flex items-center justify-between bg-surface-elevated rounded-2xl border border-border shadow-sm p-4">
                                                                <div class="space-y-0.5">
                                                                    <p class="font-medium text-fg">
                                                                        {format!("{} - {} ({} SKS)", course.kode_matkul, course.nama_matkul, course.sks)}
                                                                    </p>
                                                                    <p class="text-xs text-fg-muted">
                                                                        {format!("{} {}-{}, {}", course.hari, course.jam_mulai, course.jam_selesai, course.dosen_nama)}
                                                                    </p>
                                                                    {blocker.clone().map(|reason| view! {
                                                                        <p class="text-xs text-status-warning-text">{reason}</p>
                                                                    })}
                                                                </div>
                                                                <button
                                                                    class="rounded-lg bg-action-primary-bg text-action-primary-text px-4 py-2 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-40"
                                                                    disabled=move || blocked
                                                                    on:click={
                                                                        let krs_id = krs_id.clone();
                                                                        let course_id = course_id.clone();
                                                                        move |_| add_action.dispatch((krs_id.clone(), course_id.clone()))
                                                                    }
                                                                >
                                                                    "Tambah"
                                                                </button>
                                                            </div>
                                                        }
                                                    }).collect_view()}
                                                </div>
                                            </div>
                                        </Show>
                                    </div>
                                }.into_view()
                            }
                        }
                    })
                }}
            </Suspense>

            <ConfirmDialog
                is_open=dialog_open
                title="Ajukan KRS".to_string()
                message="Setelah diajukan, KRS tidak dapat diubah sampai diputuskan kaprodi. Lanjutkan?"
                    .to_string()
                confirm_label="Ajukan".to_string()
                on_confirm=Callback::new(move |_| {
                    submit_confirm.set(false);
                    if let Some(plan) = krs.get_untracked() {
                        submit_action.dispatch(plan.id);
                    }
                })
                on_cancel=Callback::new(move |_| submit_confirm.set(false))
            />
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{mahasiswa_user, provide_auth};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn panel_renders_inside_scaffold_for_students() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! { <KrsPage /> }
        });
        assert!(html.contains("Kartu Rencana Studi"));
    }
}
