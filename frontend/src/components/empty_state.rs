use leptos::*;

#[component]
pub fn EmptyState(
    #[prop(into)] title: String,
    #[prop(optional, into)] description: Option<String>,
    #[prop(optional)] action: Option<View>,
) -> impl IntoView {
    view! {
        <div class="text-center py-12 px-4 rounded-lg border-2 border-dashed border-border-strong bg-surface-muted">
            <h3 class="mt-2 text-sm font-semibold text-fg">{title}</h3>
            {description.map(|desc| view! { <p class="mt-1 text-sm text-fg-muted">{desc}</p> })}
            {action.map(|action| view! { <div class="mt-6">{action}</div> })}
        </div>
    }
}
