use leptos::*;

const INPUT_CLASS: &str = "w-full rounded-xl border-2 border-form-control-border bg-form-control-bg py-2.5 px-4 text-sm shadow-sm focus:border-action-primary-border-hover focus:outline-none disabled:opacity-50";

#[component]
pub fn TextField(
    #[prop(into)] value: RwSignal<String>,
    #[prop(into)] label: String,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] placeholder: Option<&'static str>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5 w-full">
            <label class="text-sm font-bold text-fg-muted ml-1">{label}</label>
            <input
                type=input_type.unwrap_or("text")
                class=INPUT_CLASS
                placeholder=placeholder.unwrap_or("")
                disabled=disabled
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn NumberField(
    #[prop(into)] value: RwSignal<String>,
    #[prop(into)] label: String,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5 w-full">
            <label class="text-sm font-bold text-fg-muted ml-1">{label}</label>
            <input
                type="number"
                min="0"
                max="100"
                step="0.1"
                class=INPUT_CLASS
                disabled=disabled
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

/// Options are `(value, label)` pairs; an empty value row serves as the
/// placeholder entry.
#[component]
pub fn SelectField(
    #[prop(into)] value: RwSignal<String>,
    #[prop(into)] label: String,
    #[prop(into)] options: MaybeSignal<Vec<(String, String)>>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5 w-full">
            <label class="text-sm font-bold text-fg-muted ml-1">{label}</label>
            <select
                class=INPUT_CLASS
                disabled=disabled
                prop:value=move || value.get()
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                <For
                    each=move || options.get()
                    key=|(option_value, _)| option_value.clone()
                    children=move |(option_value, option_label)| {
                        let selected_value = option_value.clone();
                        view! {
                            <option
                                value=option_value
                                selected=move || value.get() == selected_value
                            >
                                {option_label}
                            </option>
                        }
                    }
                />
            </select>
        </div>
    }
}

#[component]
pub fn SearchBox(
    #[prop(into)] value: RwSignal<String>,
    #[prop(optional)] placeholder: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="relative w-full sm:w-72">
            <i class="fas fa-search absolute left-3 top-1/2 -translate-y-1/2 text-fg-muted text-sm"></i>
            <input
                type="search"
                class="w-full rounded-xl border-2 border-form-control-border bg-form-control-bg py-2 pl-9 pr-4 text-sm shadow-sm focus:border-action-primary-border-hover focus:outline-none"
                placeholder=placeholder.unwrap_or("Cari...")
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

/// Native file input; the selected `web_sys::File` is handed to the caller,
/// which validates it against the relevant upload rule before reading.
#[component]
pub fn FileField(
    #[prop(into)] label: String,
    accept: &'static str,
    on_file: Callback<web_sys::File>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5 w-full">
            <label class="text-sm font-bold text-fg-muted ml-1">{label}</label>
            <input
                type="file"
                accept=accept
                class="text-sm text-fg-muted file:mr-3 file:rounded-lg file:border-0 file:bg-action-primary-bg file:px-4 file:py-2 file:text-sm file:font-semibold file:text-action-primary-text hover:file:bg-action-primary-bg-hover"
                on:change=move |ev| {
                    let input: web_sys::HtmlInputElement = event_target(&ev);
                    if let Some(file) = input.files().and_then(|files| files.get(0)) {
                        on_file.call(file);
                    }
                }
            />
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn text_field_renders_label_and_value() {
        let html = render_to_string(|| {
            let value = create_rw_signal("agus@student.univ.ac.id".to_string());
            view! { <TextField value=value label="Email" /> }
        });
        assert!(html.contains("Email"));
    }

    #[test]
    fn select_field_marks_current_option() {
        let html = render_to_string(|| {
            let value = create_rw_signal("proposal_skripsi".to_string());
            let options = vec![
                (String::new(), "Pilih jenis".to_string()),
                ("proposal_skripsi".to_string(), "Proposal Skripsi".to_string()),
                ("laporan_kp".to_string(), "Laporan KP".to_string()),
            ];
            view! { <SelectField value=value label="Jenis" options=options /> }
        });
        assert!(html.contains("Proposal Skripsi"));
        assert!(html.contains("selected"));
    }

    #[test]
    fn search_box_has_default_placeholder() {
        let html = render_to_string(|| {
            let value = create_rw_signal(String::new());
            view! { <SearchBox value=value /> }
        });
        assert!(html.contains("Cari..."));
    }
}
