use crate::{
    api::types::Role,
    state::auth::{self, use_auth},
};
use leptos::*;

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

/// Navigation entries for the current role. Every role sees the dashboard;
/// the rest follows the capability split used by the guards.
pub fn nav_items_for(role: Option<Role>) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![("/dashboard", "Dasbor")];
    let Some(role) = role else {
        return items;
    };
    match role {
        Role::Mahasiswa => {
            items.push(("/krs", "KRS"));
            items.push(("/khs", "KHS"));
            items.push(("/jadwal", "Jadwal"));
            items.push(("/dokumen", "Dokumen"));
            items.push(("/materi", "Materi"));
        }
        Role::Dosen => {
            items.push(("/jadwal", "Jadwal"));
            items.push(("/nilai", "Nilai"));
            items.push(("/materi", "Materi"));
        }
        Role::Kaprodi => {
            items.push(("/dokumen", "Dokumen"));
            items.push(("/krs/persetujuan", "Persetujuan KRS"));
            items.push(("/jadwal", "Jadwal"));
        }
        Role::Dekan => {
            items.push(("/dokumen", "Dokumen"));
            items.push(("/jadwal", "Jadwal"));
        }
        Role::TuFakultas => {
            items.push(("/pengguna", "Pengguna"));
            items.push(("/master", "Master Data"));
            items.push(("/jadwal", "Jadwal"));
            items.push(("/dokumen", "Dokumen"));
        }
        Role::TuProdi => {
            items.push(("/pengguna", "Pengguna"));
            items.push(("/jadwal", "Jadwal"));
            items.push(("/dokumen", "Dokumen"));
        }
        Role::Admin => {
            items.push(("/pengguna", "Pengguna"));
            items.push(("/master", "Master Data"));
            items.push(("/jadwal", "Jadwal"));
            items.push(("/dokumen", "Dokumen"));
            items.push(("/krs/persetujuan", "Persetujuan KRS"));
        }
    }
    items
}

#[component]
pub fn Header() -> impl IntoView {
    let (auth, _set_auth) = use_auth();
    let items = create_memo(move |_| nav_items_for(auth.get().role()));
    let user_label = move || {
        auth.get()
            .user
            .map(|user| format!("{} ({})", user.nama, user.role.label()))
            .unwrap_or_default()
    };
    let logout_action = auth::use_logout_action();
    let logout_pending = logout_action.pending();
    create_effect(move |_| {
        if logout_action.value().get().is_some() {
            if let Some(win) = web_sys::window() {
                let _ = win.location().set_href("/login");
            }
        }
    });
    let on_logout = move |_| {
        if logout_pending.get_untracked() {
            return;
        }
        logout_action.dispatch(());
    };
    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex items-center">
                        <h1 class="text-xl font-semibold text-fg">"SIAKAD"</h1>
                    </div>
                    <div class="flex items-center gap-4">
                        <nav class="hidden lg:flex space-x-2">
                            <For
                                each=move || items.get()
                                key=|(href, _)| *href
                                children=|(href, label)| {
                                    view! {
                                        <a
                                            href=href
                                            class="text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium hover:bg-action-ghost-bg-hover"
                                        >
                                            {label}
                                        </a>
                                    }
                                }
                            />
                        </nav>
                        <span class="hidden sm:block text-sm text-fg-muted">{user_label}</span>
                        <button
                            on:click=on_logout
                            class="text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium disabled:opacity-50 hover:bg-action-ghost-bg-hover"
                            disabled=move || logout_pending.get()
                        >
                            "Keluar"
                        </button>
                    </div>
                </div>
            </div>
        </header>
    }
}

#[component]
pub fn PageScaffold(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header />
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8 space-y-6">
                <h2 class="text-2xl font-bold text-fg">{title}</h2>
                {children()}
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::nav_items_for;
    use crate::api::types::Role;

    fn hrefs(role: Role) -> Vec<&'static str> {
        nav_items_for(Some(role))
            .into_iter()
            .map(|(href, _)| href)
            .collect()
    }

    #[test]
    fn every_role_sees_the_dashboard() {
        for role in [
            Role::Mahasiswa,
            Role::Dosen,
            Role::Kaprodi,
            Role::Dekan,
            Role::TuFakultas,
            Role::TuProdi,
            Role::Admin,
        ] {
            assert!(hrefs(role).contains(&"/dashboard"));
        }
        assert_eq!(nav_items_for(None).len(), 1);
    }

    #[test]
    fn students_get_krs_but_not_user_management() {
        let items = hrefs(Role::Mahasiswa);
        assert!(items.contains(&"/krs"));
        assert!(items.contains(&"/khs"));
        assert!(!items.contains(&"/pengguna"));
    }

    #[test]
    fn kaprodi_gets_approval_entries() {
        let items = hrefs(Role::Kaprodi);
        assert!(items.contains(&"/krs/persetujuan"));
        assert!(items.contains(&"/dokumen"));
        assert!(!items.contains(&"/master"));
    }

    #[test]
    fn tata_usaha_manages_users_but_master_data_is_faculty_level() {
        for role in [Role::TuFakultas, Role::TuProdi] {
            assert!(hrefs(role).contains(&"/pengguna"));
        }
        assert!(hrefs(Role::TuFakultas).contains(&"/master"));
        assert!(!hrefs(Role::TuProdi).contains(&"/master"));
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{mahasiswa_user, provide_auth};
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn header_shows_user_name_and_role() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! { <Header /> }
        });
        assert!(html.contains("Mahasiswa Uji"));
        assert!(html.contains("(Mahasiswa)"));
        assert!(html.contains("Keluar"));
    }
}
