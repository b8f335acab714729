#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::types::{Role, UserProfile};
    use crate::state::auth::AuthState;
    use leptos::*;

    pub fn user_with_role(role: Role) -> UserProfile {
        UserProfile {
            id: format!("u-{}", role.label().to_lowercase().replace(' ', "-")),
            nama: format!("{} Uji", role.label()),
            email: "uji@univ.ac.id".into(),
            role,
            nim: match role {
                Role::Mahasiswa => Some("210001".into()),
                _ => None,
            },
            nidn: None,
            fakultas_id: None,
            prodi_id: None,
        }
    }

    pub fn mahasiswa_user() -> UserProfile {
        user_with_role(Role::Mahasiswa)
    }

    pub fn kaprodi_user() -> UserProfile {
        user_with_role(Role::Kaprodi)
    }

    pub fn provide_auth(
        user: Option<UserProfile>,
    ) -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
        let (auth, set_auth) = create_signal(AuthState {
            is_authenticated: user.is_some(),
            user,
            loading: false,
        });
        provide_context((auth, set_auth));
        (auth, set_auth)
    }
}
