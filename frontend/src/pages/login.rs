use leptos::*;

use crate::api::types::LoginRequest;
use crate::components::error::InlineErrorMessage;
use crate::state::auth;

fn form_valid(email: &str, password: &str) -> bool {
    !email.trim().is_empty() && email.contains('@') && !password.is_empty()
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let login_action = auth::use_login_action();
    let pending = login_action.pending();
    let error = Signal::derive(move || {
        login_action
            .value()
            .get()
            .and_then(|result| result.err())
    });

    create_effect(move |_| {
        if let Some(Ok(())) = login_action.value().get() {
            if let Some(win) = web_sys::window() {
                let _ = win.location().set_href("/dashboard");
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let email_value = email.get_untracked();
        let password_value = password.get_untracked();
        if !form_valid(&email_value, &password_value) || pending.get_untracked() {
            return;
        }
        login_action.dispatch(LoginRequest {
            email: email_value,
            password: password_value,
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface px-4">
            <div class="w-full max-w-md bg-surface-elevated rounded-2xl shadow-xl border border-border p-8 space-y-6">
                <div class="text-center space-y-1">
                    <h1 class="text-2xl font-bold text-fg">"SIAKAD"</h1>
                    <p class="text-sm text-fg-muted">"Sistem Informasi Akademik"</p>
                </div>
                <form class="space-y-4" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <label class="text-sm font-bold text-fg-muted ml-1">"Email"</label>
                        <input
                            type="email"
                            class="w-full rounded-xl border-2 border-form-control-border bg-form-control-bg py-2.5 px-4 text-sm shadow-sm focus:border-action-primary-border-hover focus:outline-none"
                            placeholder="nama@univ.ac.id"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <label class="text-sm font-bold text-fg-muted ml-1">"Kata Sandi"</label>
                        <input
                            type="password"
                            class="w-full rounded-xl border-2 border-form-control-border bg-form-control-bg py-2.5 px-4 text-sm shadow-sm focus:border-action-primary-border-hover focus:outline-none"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </div>
                    <InlineErrorMessage error=error />
                    <button
                        type="submit"
                        class="w-full rounded-xl bg-action-primary-bg text-action-primary-text py-2.5 text-sm font-semibold hover:bg-action-primary-bg-hover disabled:opacity-50"
                        disabled=move || {
                            pending.get() || !form_valid(&email.get(), &password.get())
                        }
                    >
                        {move || if pending.get() { "Memproses..." } else { "Masuk" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::form_valid;

    #[test]
    fn form_requires_plausible_email_and_password() {
        assert!(form_valid("agus@student.univ.ac.id", "rahasia"));
        assert!(!form_valid("", "rahasia"));
        assert!(!form_valid("bukan-email", "rahasia"));
        assert!(!form_valid("agus@student.univ.ac.id", ""));
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn login_page_renders_form_fields() {
        let html = render_to_string(|| view! { <LoginPage /> });
        assert!(html.contains("Email"));
        assert!(html.contains("Kata Sandi"));
        assert!(html.contains("Masuk"));
    }
}
