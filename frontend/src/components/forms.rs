use leptos::*;
use web_sys::HtmlInputElement;

/// Labelled input bound to `value`.
#[component]
pub fn TextField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] autocomplete: Option<String>,
    #[prop(optional, into)] help: Option<String>,
) -> impl IntoView {
    view! {
        <div>
            <label for=id.clone() class="block text-sm font-medium text-fg">{label}</label>
            <input
                id=id.clone()
                name=id
                type=input_type
                required
                class="mt-1 appearance-none block w-full px-3 py-2 border border-border rounded-md placeholder-fg-muted text-fg focus:outline-none focus:ring-action-primary-bg focus:border-action-primary-bg sm:text-sm"
                placeholder=placeholder.unwrap_or_default()
                autocomplete=autocomplete.unwrap_or_default()
                prop:value=move || value.get()
                on:input=move |ev| {
                    let target = event_target::<HtmlInputElement>(&ev);
                    value.set(target.value());
                }
            />
            {help.map(|text| view! { <p class="mt-1 text-xs text-fg-muted">{text}</p> })}
        </div>
    }
}

/// Full-width submit button that swaps its caption while `pending`.
#[component]
pub fn SubmitButton(
    #[prop(into)] label: String,
    #[prop(into)] pending_label: String,
    #[prop(into)] pending: Signal<bool>,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            disabled=move || pending.get()
            class="group relative w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover focus:outline-none focus:ring-2 focus:ring-offset-2 disabled:opacity-50"
        >
            {move || if pending.get() { pending_label.clone() } else { label.clone() }}
        </button>
    }
}
