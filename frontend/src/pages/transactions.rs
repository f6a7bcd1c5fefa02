use leptos::*;

use crate::{
    api::{ApiClient, DEFAULT_PAGE, DEFAULT_PER_PAGE},
    components::{
        cards::TransactionRow,
        empty_state::EmptyState,
        layout::{Layout, LoadingSpinner},
    },
    labels::label,
    state::{
        auth::use_auth,
        transactions::{fetch_transactions, use_transactions, Pagination},
    },
};

/// "Showing 11 to 20 of 42 results", or nothing for an empty page.
pub fn showing_summary(pagination: &Pagination) -> Option<String> {
    (pagination.total > 0).then(|| {
        label(
            "transactions.showing",
            &[
                ("from", &pagination.from.to_string()),
                ("to", &pagination.to.to_string()),
                ("total", &pagination.total.to_string()),
            ],
        )
    })
}

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let t = |key: &str| label(&format!("transactions.{}", key), &[]);
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let (auth, _) = use_auth();
    let (transactions, set_transactions) = use_transactions();
    let page = create_rw_signal(DEFAULT_PAGE);

    let load = create_action(move |requested: &u32| {
        let api = api.clone();
        let requested = *requested;
        async move {
            // Failures are logged by the store.
            let _ = fetch_transactions(&api, requested, DEFAULT_PER_PAGE, set_transactions).await;
        }
    });
    create_effect(move |_| load.dispatch(page.get()));

    let pagination = move || transactions.with(|s| s.pagination.clone());
    let items = move || transactions.with(|s| s.transactions.clone());
    let loading = move || transactions.with(|s| s.loading);
    let user_id = move || auth.with(|s| s.user.as_ref().map(|u| u.id));

    let previous = move |_| {
        if pagination().has_previous() {
            page.update(|p| *p = p.saturating_sub(1).max(1));
        }
    };
    let next = move |_| {
        if pagination().has_next() {
            page.update(|p| *p += 1);
        }
    };

    view! {
        <Layout>
            <div class="px-4 py-6 sm:px-0 space-y-6">
                <div class="flex justify-between items-center">
                    <h1 class="text-2xl font-bold text-fg">{t("title")}</h1>
                    <a
                        href="/transactions/create"
                        class="px-4 py-2 rounded-md text-sm font-medium text-action-primary-text bg-action-primary-bg"
                    >
                        {t("sendMoney")}
                    </a>
                </div>
                <div class="bg-surface-elevated shadow rounded-lg p-5">
                    <Show when=move || !loading() fallback=|| view! { <LoadingSpinner /> }>
                        <Show
                            when=move || !items().is_empty()
                            fallback=move || view! {
                                <EmptyState title=t("noTransactions") description=t("noTransactionsSubtitle") />
                            }
                        >
                            <ul class="divide-y divide-border">
                                {move || {
                                    let user = user_id();
                                    items()
                                        .into_iter()
                                        .map(|tx| view! { <TransactionRow transaction=tx user_id=user /> })
                                        .collect_view()
                                }}
                            </ul>
                        </Show>
                    </Show>
                </div>
                <div class="flex items-center justify-between">
                    <p class="text-sm text-fg-muted">{move || showing_summary(&pagination())}</p>
                    <div class="flex items-center gap-2">
                        <button
                            class="px-3 py-1 border border-border rounded-md text-sm disabled:opacity-50"
                            disabled=move || !pagination().has_previous() || loading()
                            on:click=previous
                        >
                            {t("previous")}
                        </button>
                        <span class="text-sm text-fg-muted">
                            {move || label("transactions.page", &[("page", &pagination().current_page.to_string())])}
                        </span>
                        <button
                            class="px-3 py-1 border border-border rounded-md text-sm disabled:opacity-50"
                            disabled=move || !pagination().has_next() || loading()
                            on:click=next
                        >
                            {t("next")}
                        </button>
                    </div>
                </div>
            </div>
        </Layout>
    }
}
