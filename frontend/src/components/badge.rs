use crate::api::types::{DokumenStatus, KrsStatus};
use leptos::*;

fn dokumen_badge_class(status: DokumenStatus) -> &'static str {
    match status {
        DokumenStatus::Pending => "bg-status-warning-bg text-status-warning-text border-status-warning-border",
        DokumenStatus::Approved => "bg-status-success-bg text-status-success-text border-status-success-border",
        DokumenStatus::Rejected => "bg-status-error-bg text-status-error-text border-status-error-border",
    }
}

fn krs_badge_class(status: KrsStatus) -> &'static str {
    match status {
        KrsStatus::Draft => "bg-surface-muted text-fg-muted border-border",
        KrsStatus::Submitted => "bg-status-warning-bg text-status-warning-text border-status-warning-border",
        KrsStatus::Approved => "bg-status-success-bg text-status-success-text border-status-success-border",
    }
}

#[component]
pub fn DokumenStatusBadge(#[prop(into)] status: MaybeSignal<DokumenStatus>) -> impl IntoView {
    view! {
        <span class=move || format!(
            "inline-flex items-center px-2.5 py-0.5 rounded-full border text-xs font-medium {}",
            dokumen_badge_class(status.get())
        )>
            {move || status.get().label()}
        </span>
    }
}

#[component]
pub fn KrsStatusBadge(#[prop(into)] status: MaybeSignal<KrsStatus>) -> impl IntoView {
    view! {
        <span class=move || format!(
            "inline-flex items-center px-2.5 py-0.5 rounded-full border text-xs font-medium {}",
            krs_badge_class(status.get())
        )>
            {move || status.get().label()}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_colors_track_status() {
        assert!(dokumen_badge_class(DokumenStatus::Pending).contains("warning"));
        assert!(dokumen_badge_class(DokumenStatus::Approved).contains("success"));
        assert!(dokumen_badge_class(DokumenStatus::Rejected).contains("error"));
        assert!(krs_badge_class(KrsStatus::Submitted).contains("warning"));
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn badge_renders_indonesian_label() {
        let html = render_to_string(|| view! { <DokumenStatusBadge status=DokumenStatus::Pending /> });
        assert!(html.contains("Menunggu"));
    }
}
