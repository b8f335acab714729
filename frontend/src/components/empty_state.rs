use leptos::*;

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 text-center text-fg-muted">
            <i class="far fa-folder-open text-3xl mb-3"></i>
            <p class="text-sm font-medium">{message}</p>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn empty_state_renders_message() {
        let html =
            render_to_string(|| view! { <EmptyState message="Belum ada dokumen".to_string() /> });
        assert!(html.contains("Belum ada dokumen"));
    }
}
