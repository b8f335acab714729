use leptos::*;
use uuid::Uuid;

const AUTO_DISMISS_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
}

impl Toasts {
    pub fn push(&self, kind: ToastKind, text: impl Into<String>) {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
        };
        let id = toast.id;
        self.items.update(|items| items.push(toast));

        #[cfg(target_arch = "wasm32")]
        {
            let items = self.items;
            spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(AUTO_DISMISS_MS).await;
                items.update(|list| list.retain(|toast| toast.id != id));
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = id;
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(ToastKind::Success, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(ToastKind::Error, text);
    }

    pub fn dismiss(&self, id: Uuid) {
        self.items.update(|items| items.retain(|toast| toast.id != id));
    }
}

pub fn provide_toasts() -> Toasts {
    let toasts = Toasts {
        items: create_rw_signal(Vec::new()),
    };
    provide_context(toasts);
    toasts
}

pub fn use_toasts() -> Toasts {
    use_context::<Toasts>().unwrap_or_else(|| Toasts {
        items: create_rw_signal(Vec::new()),
    })
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();
    view! {
        <div class="fixed bottom-4 right-4 z-[80] flex flex-col gap-2 w-80">
            <For
                each=move || toasts.items.get()
                key=|toast| toast.id
                children=move |toast| {
                    let (class, icon) = match toast.kind {
                        ToastKind::Success => (
                            "bg-status-success-bg border-status-success-border text-status-success-text",
                            "fa-check-circle",
                        ),
                        ToastKind::Error => (
                            "bg-status-error-bg border-status-error-border text-status-error-text",
                            "fa-exclamation-circle",
                        ),
                    };
                    let id = toast.id;
                    view! {
                        <div class=format!("flex items-center gap-2 p-3 rounded-xl border shadow-lg animate-pop-in {}", class)>
                            <i class=format!("fas {}", icon)></i>
                            <p class="text-sm font-medium flex-1">{toast.text.clone()}</p>
                            <button
                                type="button"
                                aria-label="Tutup"
                                class="opacity-60 hover:opacity-100"
                                on:click=move |_| toasts.dismiss(id)
                            >
                                {"✕"}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
