use crate::{api::types::Role, components::layout::LoadingSpinner, state::auth::use_auth};
use leptos::*;

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let (auth, _) = use_auth();
    let is_authenticated = create_memo(move |_| auth.get().is_authenticated);
    let is_loading = create_memo(move |_| auth.get().loading);
    create_effect(move |_| {
        let state = auth.get();
        if state.loading || state.is_authenticated {
            return;
        }
        if let Some(win) = web_sys::window() {
            let _ = win.location().set_href("/login");
        }
    });
    view! {
        <Show
            when=move || should_render_children(is_authenticated.get(), is_loading.get())
            fallback=move || {
                if is_loading.get() {
                    view! { <LoadingSpinner /> }.into_view()
                } else {
                    ().into_view()
                }
            }
        >
            {children()}
        </Show>
    }
}

fn should_render_children(is_authenticated: bool, is_loading: bool) -> bool {
    is_authenticated && !is_loading
}

/// Authenticated and holding one of the listed roles. Everyone else is sent
/// to their dashboard; the backend still enforces the same rule on every
/// request, this only keeps the pages out of sight.
#[component]
pub fn RequireRole(allowed: &'static [Role], children: ChildrenFn) -> impl IntoView {
    let (auth, _) = use_auth();
    let is_authenticated = create_memo(move |_| auth.get().is_authenticated);
    let is_loading = create_memo(move |_| auth.get().loading);
    let has_role = create_memo(move |_| role_allowed(auth.get().role(), allowed));
    create_effect(move |_| {
        let state = auth.get();
        if state.loading {
            return;
        }
        let target = if !state.is_authenticated {
            "/login"
        } else if !role_allowed(state.role(), allowed) {
            "/dashboard"
        } else {
            return;
        };
        if let Some(win) = web_sys::window() {
            let _ = win.location().set_href(target);
        }
    });
    view! {
        <Show
            when=move || {
                should_render_role_children(is_authenticated.get(), is_loading.get(), has_role.get())
            }
            fallback=move || {
                if is_loading.get() {
                    view! { <LoadingSpinner /> }.into_view()
                } else {
                    ().into_view()
                }
            }
        >
            {children()}
        </Show>
    }
}

fn role_allowed(role: Option<Role>, allowed: &[Role]) -> bool {
    role.map(|role| allowed.contains(&role)).unwrap_or(false)
}

fn should_render_role_children(is_authenticated: bool, is_loading: bool, has_role: bool) -> bool {
    is_authenticated && has_role && !is_loading
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::{RequireAuth, RequireRole};
    use crate::api::types::Role;
    use crate::test_support::helpers::{kaprodi_user, mahasiswa_user, provide_auth};
    use crate::test_support::ssr::render_to_string;
    use leptos::*;

    #[test]
    fn require_auth_renders_children_when_authenticated() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! {
                <RequireAuth>
                    {|| view! { <div>"konten-terlindungi"</div> }}
                </RequireAuth>
            }
        });
        assert!(html.contains("konten-terlindungi"));
    }

    #[test]
    fn require_auth_hides_children_when_unauthenticated() {
        let html = render_to_string(move || {
            provide_auth(None);
            view! {
                <RequireAuth>
                    {|| view! { <div>"konten-terlindungi"</div> }}
                </RequireAuth>
            }
        });
        assert!(!html.contains("konten-terlindungi"));
    }

    #[test]
    fn require_role_renders_for_listed_role() {
        let html = render_to_string(move || {
            provide_auth(Some(kaprodi_user()));
            view! {
                <RequireRole allowed=&[Role::Kaprodi, Role::Admin]>
                    {|| view! { <div>"halaman-persetujuan"</div> }}
                </RequireRole>
            }
        });
        assert!(html.contains("halaman-persetujuan"));
    }

    #[test]
    fn require_role_hides_for_other_roles() {
        let html = render_to_string(move || {
            provide_auth(Some(mahasiswa_user()));
            view! {
                <RequireRole allowed=&[Role::Kaprodi, Role::Admin]>
                    {|| view! { <div>"halaman-persetujuan"</div> }}
                </RequireRole>
            }
        });
        assert!(!html.contains("halaman-persetujuan"));
    }
}
