use leptos::*;

use crate::api::types::{ApiError, CreateJadwalRequest, JadwalKuliah, Role};
use crate::api::ApiClient;
use crate::components::empty_state::EmptyState;
use crate::components::error::InlineErrorMessage;
use crate::components::forms::{SelectField, TextField};
use crate::components::guard::RequireAuth;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::components::toast::use_toasts;
use crate::state::auth::use_auth;
use crate::utils::format;

pub const HARI: &[&str] = &["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"];

pub fn jam_valid(jam: &str) -> bool {
    let Some((h, m)) = jam.split_once(':') else {
        return false;
    };
    let jam_ok = h.len() == 2 && matches!(h.parse::<u32>(), Ok(v) if v < 24);
    let menit_ok = m.len() == 2 && matches!(m.parse::<u32>(), Ok(v) if v < 60);
    jam_ok && menit_ok
}

/// All fields checked client-side before the request goes out; the id of the
/// active term is supplied by the caller.
pub fn build_create_request(
    kode: &str,
    nama: &str,
    sks_raw: &str,
    dosen_id: &str,
    ruangan: &str,
    hari: &str,
    jam_mulai: &str,
    jam_selesai: &str,
    tahun_akademik_id: &str,
) -> Result<CreateJadwalRequest, String> {
    if kode.trim().is_empty() || nama.trim().is_empty() || ruangan.trim().is_empty() {
        return Err("Kode, nama mata kuliah, dan ruangan wajib diisi".into());
    }
    let Ok(sks) = sks_raw.trim().parse::<i32>() else {
        return Err("SKS harus berupa angka".into());
    };
    if !(1..=6).contains(&sks) {
        return Err("SKS harus antara 1 dan 6".into());
    }
    if dosen_id.is_empty() {
        return Err("Pilih dosen pengampu".into());
    }
    if !HARI.contains(&hari) {
        return Err("Pilih hari perkuliahan".into());
    }
    if !jam_valid(jam_mulai) || !jam_valid(jam_selesai) {
        return Err("Format jam: HH:MM".into());
    }
    if jam_mulai >= jam_selesai {
        return Err("Jam selesai harus setelah jam mulai".into());
    }
    if tahun_akademik_id.is_empty() {
        return Err("Tidak ada tahun akademik aktif".into());
    }
    Ok(CreateJadwalRequest {
        kode_matkul: kode.trim().to_string(),
        nama_matkul: nama.trim().to_string(),
        sks,
        dosen_id: dosen_id.to_string(),
        ruangan: ruangan.trim().to_string(),
        hari: hari.to_string(),
        jam_mulai: jam_mulai.to_string(),
        jam_selesai: jam_selesai.to_string(),
        tahun_akademik_id: tahun_akademik_id.to_string(),
    })
}

#[component]
pub fn JadwalPage() -> impl IntoView {
    view! {
        <RequireAuth>
            {|| view! {
                <PageScaffold title="Jadwal".to_string()>
                    <JadwalPanel />
                </PageScaffold>
            }}
        </RequireAuth>
    }
}

#[component]
fn JadwalPanel() -> impl IntoView {
    let (auth, _) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();
    let toasts = use_toasts();

    let generation = create_rw_signal(0u32);
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let manage = Signal::derive(move || {
        auth.get()
            .role()
            .map(|role| role.can_manage_jadwal())
            .unwrap_or(false)
    });

    let list_api = api.clone();
    let loaded = create_resource(
        move || (generation.get(), manage.get()),
        move |(_, manage)| {
            let api = list_api.clone();
            async move {
                let kuliah = api.list_jadwal_kuliah(None).await?;
                let ujian = api.list_jadwal_ujian().await?;
                let dosen = if manage {
                    api.list_users(Some(Role::Dosen)).await?
                } else {
                    Vec::new()
                };
                let tahun = api.list_tahun_akademik().await?;
                let aktif_id = tahun
                    .into_iter()
                    .find(|t| t.is_aktif)
                    .map(|t| t.id)
                    .unwrap_or_default();
                Ok::<_, ApiError>((kuliah, ujian, dosen, aktif_id))
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = loaded.get() {
            load_error.set(result.err());
        }
    });

    // Create form (tata usaha / admin).
    let kode = create_rw_signal(String::new());
    let nama = create_rw_signal(String::new());
    let sks = create_rw_signal(String::new());
    let dosen_id = create_rw_signal(String::new());
    let ruangan = create_rw_signal(String::new());
    let hari = create_rw_signal(String::new());
    let jam_mulai = create_rw_signal(String::new());
    let jam_selesai = create_rw_signal(String::new());
    let form_error: RwSignal<Option<ApiError>> = create_rw_signal(None);

    let create_api = api.clone();
    let create_action = create_action(move |request: &CreateJadwalRequest| {
        let request = request.clone();
        let api = create_api.clone();
        async move { api.create_jadwal(&request).await }
    });
    create_effect(move |_| {
        if let Some(result) = create_action.value().get() {
            match result {
                Ok(created) => {
                    toasts.success(format!("Jadwal {} ditambahkan", created.nama_matkul));
                    for signal in [kode, nama, sks, dosen_id, ruangan, hari, jam_mulai, jam_selesai] {
                        signal.set(String::new());
                    }
                    form_error.set(None);
                    generation.update(|g| *g += 1);
                }
                Err(err) => form_error.set(Some(err)),
            }
        }
    });

    let on_create = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let aktif_id = loaded
            .get()
            .and_then(Result::ok)
            .map(|(_, _, _, aktif_id)| aktif_id)
            .unwrap_or_default();
        match build_create_request(
            &kode.get_untracked(),
            &nama.get_untracked(),
            &sks.get_untracked(),
            &dosen_id.get_untracked(),
            &ruangan.get_untracked(),
            &hari.get_untracked(),
            &jam_mulai.get_untracked(),
            &jam_selesai.get_untracked(),
            &aktif_id,
        ) {
            Ok(request) => create_action.dispatch(request),
            Err(message) => form_error.set(Some(ApiError::validation(message))),
        }
    };

    let delete_api = api.clone();
    let delete_action = leptos::create_action(move |id: &String| {
        let id = id.clone();
        let api = delete_api.clone();
        async move { api.delete_jadwal(&id).await.map(|_| id) }
    });
    create_effect(move |_| {
        if let Some(result) = delete_action.value().get() {
            match result {
                Ok(_) => {
                    toasts.success("Jadwal dihapus");
                    generation.update(|g| *g += 1);
                }
                Err(err) => toasts.error(err.user_message()),
            }
        }
    });

    let hari_options: Vec<(String, String)> =
        std::iter::once((String::new(), "Pilih hari".to_string()))
            .chain(HARI.iter().map(|h| (h.to_string(), h.to_string())))
            .collect();

    view! {
        <div class="space-y-6">
            <Show when=move || manage.get()>
                <form
                    class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5 space-y-4"
                    on:submit=on_create
                >
                    <h3 class="text-base font-semibold text-fg">"Tambah Jadwal Kuliah"</h3>
                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
                        <TextField value=kode label="Kode" placeholder="IF101" />
                        <TextField value=nama label="Mata Kuliah" placeholder="Nama mata kuliah" />
                        <TextField value=sks label="SKS" placeholder="3" />
                        <TextField value=ruangan label="Ruangan" placeholder="R-201" />
                        {move || {
                            let options: Vec<(String, String)> = std::iter::once(
                                (String::new(), "Pilih dosen".to_string()),
                            )
                            .chain(
                                loaded
                                    .get()
                                    .and_then(Result::ok)
                                    .map(|(_, _, dosen, _)| dosen)
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|d| (d.id, d.nama)),
                            )
                            .collect();
                            view! { <SelectField value=dosen_id label="Dosen" options=options /> }
                        }}
                        <SelectField value=hari label="Hari" options=hari_options.clone() />
                        <TextField value=jam_mulai label="Jam Mulai" placeholder="08:00" />
                        <TextField value=jam_selesai label="Jam Selesai" placeholder="10:30" />
                    </div>
                    <InlineErrorMessage error=form_error.into() />
                    <button
                        type="submit"
                        class="rounded-xl bg-action-primary-bg text-action-primary-text px-5 py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                        disabled=move || create_action.pending().get()
                    >
                        "Tambah"
                    </button>
                </form>
            </Show>

            <InlineErrorMessage error=load_error.into() />

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    loaded.get().map(|result| {
                        let Ok((kuliah, ujian, _, _)) = result else {
                            return ().into_view();
                        };
                        view! {
                            <section class="bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                <header class="border-b border-border px-5 py-4">
                                    <h3 class="text-base font-semibold text-fg">"Jadwal Kuliah"</h3>
                                </header>
                                {if kuliah.is_empty() {
                                    view! { <EmptyState message="Belum ada jadwal kuliah".to_string() /> }.into_view()
                                } else {
                                    view! {
                                        <div class="overflow-x-auto">
                                            <table class="min-w-full divide-y divide-border text-sm">
                                                <thead>
                                                    <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                        <th class="px-4 py-3">"Kode"</th>
                                                        <th class="px-4 py-3">"Mata Kuliah"</th>
                                                        <th class="px-4 py-3">"SKS"</th>
                                                        <th class="px-4 py-3">"Dosen"</th>
                                                        <th class="px-4 py-3">"Waktu"</th>
                                                        <th class="px-4 py-3">"Ruangan"</th>
                                                        <Show when=move || manage.get()>
                                                            <th class="px-4 py-3">"Aksi"</th>
                                                        </Show>
                                                    </tr>
                                                </thead>
                                                <tbody class="divide-y divide-border">
                                                    {kuliah.iter().map(|jadwal: &JadwalKuliah| {
                                                        let delete_id = jadwal.id.clone();
                                                        view! {
                                                            <tr>
                                                                <td class="px-4 py-3 text-fg-muted">{jadwal.kode_matkul.clone()}</td>
                                                                <td class="px-4 py-3 font-medium text-fg">{jadwal.nama_matkul.clone()}</td>
                                                                <td class="px-4 py-3">{jadwal.sks}</td>
                                                                <td class="px-4 py-3 text-fg-muted">{jadwal.dosen_nama.clone()}</td>
                                                                <td class="px-4 py-3 text-fg-muted">
                                                                    {format!("{} {}-{}", jadwal.hari, jadwal.jam_mulai, jadwal.jam_selesai)}
                                                                </td>
                                                                <td class="px-4 py-3 text-fg-muted">{jadwal.ruangan.clone()}</td>
                                                                <Show when=move || manage.get()>
                                                                    <td class="px-4 py-3">
                                                                        <button
                                                                            class="text-status-error-text hover:underline text-sm font-semibold"
                                                                            on:click={
                                                                                let id = delete_id.clone();
                                                                                move |_| delete_action.dispatch(id.clone())
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
                            </section>

                            <section class="bg-surface-elevated rounded-2xl border border-border shadow-sm">
                                <header class="border-b border-border px-5 py-4">
                                    <h3 class="text-base font-semibold text-fg">"Jadwal Ujian"</h3>
                                </header>
                                {if ujian.is_empty() {
                                    view! { <EmptyState message="Belum ada jadwal ujian".to_string() /> }.into_view()
                                } else {
                                    view! {
                                        <div class="overflow-x-auto">
                                            <table class="min-w-full divide-y divide-border text-sm">
                                                <thead>
                                                    <tr class="text-left text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                        <th class="px-4 py-3">"Mata Kuliah"</th>
                                                        <th class="px-4 py-3">"Jenis"</th>
                                                        <th class="px-4 py-3">"Tanggal"</th>
                                                        <th class="px-4 py-3">"Jam"</th>
                                                        <th class="px-4 py-3">"Ruangan"</th>
                                                    </tr>
                                                </thead>
                                                <tbody class="divide-y divide-border">
                                                    {ujian.iter().map(|u| view! {
                                                        <tr>
                                                            <td class="px-4 py-3 font-medium text-fg">{u.nama_matkul.clone()}</td>
                                                            <td class="px-4 py-3">{u.jenis.clone()}</td>
                                                            <td class="px-4 py-3 text-fg-muted">{format::tanggal(&u.tanggal)}</td>
                                                            <td class="px-4 py-3 text-fg-muted">
                                                                {format!("{}-{}", u.jam_mulai, u.jam_selesai)}
                                                            </td>
                                                            <td class="px-4 py-3 text-fg-muted">{u.ruangan.clone()}</td>
                                                        </tr>
                                                    }).collect_view()}
                                                </tbody>
                                            </table>
                                        </div>
                                    }.into_view()
                                }}
                            </section>
                        }
                        .into_view()
                    })
                }}
            </Suspense>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_format_is_strict_hh_mm() {
        assert!(jam_valid("08:00"));
        assert!(jam_valid("23:59"));
        assert!(!jam_valid("8:00"));
        assert!(!jam_valid("24:00"));
        assert!(!jam_valid("08:60"));
        assert!(!jam_valid("0800"));
    }

    #[test]
    fn create_request_validation() {
        let ok = build_create_request(
            "IF101",
            "Algoritma",
            "3",
            "u-dosen-1",
            "R-201",
            "Senin",
            "08:00",
            "10:30",
            "ta-2",
        )
        .unwrap();
        assert_eq!(ok.sks, 3);
        assert_eq!(ok.hari, "Senin");

        let sks_err = build_create_request(
            "IF101", "Algoritma", "tujuh", "u-dosen-1", "R-201", "Senin", "08:00", "10:30", "ta-2",
        )
        .unwrap_err();
        assert!(sks_err.contains("SKS"));

        let urutan_err = build_create_request(
            "IF101", "Algoritma", "3", "u-dosen-1", "R-201", "Senin", "10:30", "08:00", "ta-2",
        )
        .unwrap_err();
        assert!(urutan_err.contains("setelah"));

        let tahun_err = build_create_request(
            "IF101", "Algoritma", "3", "u-dosen-1", "R-201", "Senin", "08:00", "10:30", "",
        )
        .unwrap_err();
        assert!(tahun_err.contains("tahun akademik"));
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{mahasiswa_user, provide_auth, user_with_role};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn tata_usaha_gets_the_create_form() {
        let html = render_to_string(move || {
            provide_auth(Some(user_with_role(Role::TuProdi)));
            view! { <JadwalPanel /> }
        });
        assert!(html.contains("Tambah Jadwal Kuliah"));
    }

    #[test]
    fn mahasiswa_only_reads() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! { <JadwalPanel /> }
        });
        assert!(!html.contains("Tambah Jadwal Kuliah"));
    }
}
