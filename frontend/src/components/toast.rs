use crate::{labels::label, state::toast::use_toasts};
use leptos::*;

/// Renders the toast stack in the top-right corner.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();
    view! {
        <div class="fixed top-4 right-4 z-50 space-y-2 w-80" aria-live="polite">
            <For
                each=move || toasts.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.as_class() role="status">
                            <div class="flex items-start justify-between gap-2">
                                <p class="text-sm">{toast.message}</p>
                                <button
                                    type="button"
                                    class="text-sm opacity-70 hover:opacity-100"
                                    aria-label=label("common.close", &[])
                                    on:click=move |_| toasts.dismiss(id)
                                >
                                    "×"
                                </button>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}
