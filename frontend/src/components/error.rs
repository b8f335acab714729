use crate::api::ApiError;
use leptos::*;

#[component]
pub fn InlineErrorMessage(error: Signal<Option<ApiError>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some() fallback=|| ()>
            <div class="bg-status-error-bg border border-status-error-border text-status-error-text px-4 py-3 rounded space-y-1 my-2">
                <div class="font-bold">
                    {move || error.get().map(|e| e.user_message()).unwrap_or_default()}
                </div>
                {move || error.get().map(|e| {
                    if let Some(errors) = e
                        .details
                        .as_ref()
                        .and_then(|details| details.get("errors"))
                        .and_then(|v| v.as_array())
                    {
                        return view! {
                            <ul class="list-disc list-inside text-sm">
                                {errors.iter().map(|err| {
                                    view! { <li>{err.as_str().unwrap_or_default().to_string()}</li> }
                                }).collect_view()}
                            </ul>
                        }.into_view();
                    }
                    if e.is_conflict() {
                        view! {
                            <div class="text-xs opacity-75">
                                "Data di server sudah berubah, muat ulang halaman lalu coba lagi."
                            </div>
                        }.into_view()
                    } else {
                        ().into_view()
                    }
                }).unwrap_or_else(|| ().into_view())}
            </div>
        </Show>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;
    use serde_json::json;

    #[test]
    fn forbidden_error_renders_friendly_message() {
        let html = render_to_string(move || {
            let signal = create_rw_signal(Some(ApiError::http(403, "forbidden")));
            view! { <InlineErrorMessage error=signal.into() /> }
        });
        assert!(html.contains("Anda tidak memiliki akses untuk aksi ini"));
    }

    #[test]
    fn conflict_error_suggests_reloading() {
        let html = render_to_string(move || {
            let signal = create_rw_signal(Some(ApiError::http(409, "Dokumen sudah diputuskan")));
            view! { <InlineErrorMessage error=signal.into() /> }
        });
        assert!(html.contains("Dokumen sudah diputuskan"));
        assert!(html.contains("muat ulang"));
    }

    #[test]
    fn validation_details_render_as_list() {
        let html = render_to_string(move || {
            let error = ApiError {
                message: "Validasi gagal".into(),
                status: Some(422),
                details: Some(json!({ "errors": ["Judul wajib diisi", "Jenis tidak dikenal"] })),
            };
            let signal = create_rw_signal(Some(error));
            view! { <InlineErrorMessage error=signal.into() /> }
        });
        assert!(html.contains("Judul wajib diisi"));
        assert!(html.contains("Jenis tidak dikenal"));
    }

    #[test]
    fn nothing_renders_without_error() {
        let html = render_to_string(move || {
            let signal = create_rw_signal(None::<ApiError>);
            view! { <InlineErrorMessage error=signal.into() /> }
        });
        assert!(!html.contains("status-error"));
    }
}
