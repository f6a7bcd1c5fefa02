use crate::{
    labels::label,
    router::LOGIN_PATH,
    state::auth::{self, use_auth},
    utils::navigation,
};
use leptos::*;

const NAV_LINK: &str =
    "text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium hover:bg-action-ghost-bg-hover";

fn nav_items() -> [(&'static str, String); 3] {
    [
        ("/", label("navigation.dashboard", &[])),
        ("/transactions", label("navigation.transactions", &[])),
        ("/profile", label("navigation.profile", &[])),
    ]
}

#[component]
pub fn Header() -> impl IntoView {
    let (auth, _set_auth) = use_auth();
    let (menu_open, set_menu_open) = create_signal(false);
    let user_name = move || {
        auth.get()
            .user
            .as_ref()
            .map(|user| user.name.clone())
            .unwrap_or_default()
    };
    let logout_action = auth::use_logout_action();
    let logout_pending = logout_action.pending();
    create_effect(move |_| {
        if logout_action.value().get().is_some() {
            navigation::redirect(LOGIN_PATH);
        }
    });
    let on_logout = move |_| {
        if logout_pending.get_untracked() {
            return;
        }
        set_menu_open.set(false);
        logout_action.dispatch(());
    };
    let toggle_menu = move |_| set_menu_open.update(|open| *open = !*open);

    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <a href="/" class="text-xl font-semibold text-fg">
                        {label("app.name", &[])}
                    </a>
                    <div class="flex items-center">
                        <nav class="hidden lg:flex items-center space-x-4">
                            {nav_items()
                                .into_iter()
                                .map(|(href, text)| view! { <a href=href class=NAV_LINK>{text}</a> })
                                .collect_view()}
                            <span class="text-sm text-fg-muted">{user_name}</span>
                            <button
                                on:click=on_logout
                                class=format!("{} disabled:opacity-50", NAV_LINK)
                                disabled=move || logout_pending.get()
                            >
                                {label("navigation.logout", &[])}
                            </button>
                        </nav>
                        <button
                            type="button"
                            class="lg:hidden inline-flex items-center justify-center p-2 rounded-md text-fg-muted hover:text-fg"
                            on:click=toggle_menu
                            aria-expanded=move || menu_open.get()
                            aria-controls="mobile-nav"
                        >
                            <span class="sr-only">{label("common.close", &[])}</span>
                            "☰"
                        </button>
                    </div>
                </div>
                <Show when=move || menu_open.get()>
                    <div id="mobile-nav" class="lg:hidden border-t border-border">
                        <nav class="px-4 py-3 space-y-2">
                            {nav_items()
                                .into_iter()
                                .map(|(href, text)| {
                                    view! {
                                        <a
                                            href=href
                                            class=format!("block {}", NAV_LINK)
                                            on:click=move |_| set_menu_open.set(false)
                                        >
                                            {text}
                                        </a>
                                    }
                                })
                                .collect_view()}
                            <button
                                on:click=on_logout
                                class=format!("w-full text-left {} disabled:opacity-50", NAV_LINK)
                                disabled=move || logout_pending.get()
                            >
                                {label("navigation.logout", &[])}
                            </button>
                        </nav>
                    </div>
                </Show>
            </div>
        </header>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header/>
            <main class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">
                {children()}
            </main>
        </div>
    }
}

/// Centered card used by the signed-out screens.
#[component]
pub fn AuthCard(
    #[prop(into)] title: String,
    #[prop(optional, into)] subtitle: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <div>
                    <h2 class="mt-6 text-center text-3xl font-extrabold text-fg">{title}</h2>
                    {subtitle.map(|text| view! { <p class="mt-2 text-center text-sm text-fg-muted">{text}</p> })}
                </div>
                {children()}
            </div>
        </div>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

#[component]
pub fn SuccessMessage(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="bg-status-success-bg border border-status-success-border text-status-success-text px-4 py-3 rounded mb-4">
            <p class="text-sm">{message}</p>
        </div>
    }
}
