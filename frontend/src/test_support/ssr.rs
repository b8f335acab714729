//! Host-side rendering harness. Panels are rendered to a static HTML string
//! with resource loading suppressed, so role-gated markup can be asserted
//! without a browser.

use leptos::*;

pub fn with_runtime<T>(test: impl FnOnce() -> T) -> T {
    let runtime = create_runtime();
    let result = test();
    runtime.dispose();
    result
}

pub fn render_to_string<F, N>(build: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    leptos_reactive::suppress_resource_load(true);
    let html = with_runtime(move || build().into_view().render_to_string().to_string());
    leptos_reactive::suppress_resource_load(false);
    // Leptos escapes `/` in text nodes; decode it so assertions can match
    // the text as written in the view.
    html.replace("&#x2F;", "/")
}
