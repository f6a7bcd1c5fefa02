use leptos::*;

use crate::{
    api::{ApiClient, DEFAULT_PAGE, DEFAULT_PER_PAGE},
    components::{
        cards::{BalanceCard, TransactionRow},
        empty_state::EmptyState,
        layout::{Layout, LoadingSpinner},
    },
    labels::label,
    state::{
        auth::{self, use_auth},
        transactions::{fetch_transactions, use_transactions},
    },
};

/// Loads the first page of history and refreshes the profile once the
/// dashboard mounts in the browser.
fn use_dashboard_refresh() {
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let (_, set_auth) = use_auth();
    let (_, set_transactions) = use_transactions();
    let refresh = create_action(move |_: &()| {
        let api = api.clone();
        async move {
            // Both helpers log their own failures.
            let _ = fetch_transactions(&api, DEFAULT_PAGE, DEFAULT_PER_PAGE, set_transactions).await;
            let _ = auth::fetch_user(&api, set_auth).await;
        }
    });
    create_effect(move |_| refresh.dispatch(()));
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let t = |key: &str| label(&format!("dashboard.{}", key), &[]);
    let (auth, _) = use_auth();
    let (transactions, _) = use_transactions();
    use_dashboard_refresh();

    let welcome = move || {
        let name = auth.with(|s| s.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());
        label("dashboard.welcome", &[("name", &name)])
    };
    let user_id = move || auth.with(|s| s.user.as_ref().map(|u| u.id));
    let balance = Signal::derive(move || transactions.with(|s| s.balance.clone()));
    let recent = move || transactions.with(|s| s.recent_transactions().to_vec());
    let loading = move || transactions.with(|s| s.loading && s.transactions.is_empty());

    view! {
        <Layout>
            <div class="px-4 py-6 sm:px-0 space-y-6">
                <div>
                    <h1 class="text-2xl font-bold text-fg">{welcome}</h1>
                    <p class="text-sm text-fg-muted">{t("subtitle")}</p>
                </div>
                <BalanceCard balance=balance />
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <a href="/transactions/create" class="bg-surface-elevated shadow rounded-lg p-5">
                        <p class="font-medium text-fg">{t("newTransfer")}</p>
                        <p class="text-sm text-fg-muted">{t("createTransfer")}</p>
                    </a>
                    <a href="/transactions" class="bg-surface-elevated shadow rounded-lg p-5">
                        <p class="font-medium text-fg">{t("transactions")}</p>
                        <p class="text-sm text-fg-muted">{t("viewTransactions")}</p>
                    </a>
                    <a href="/profile" class="bg-surface-elevated shadow rounded-lg p-5">
                        <p class="font-medium text-fg">{t("profile")}</p>
                        <p class="text-sm text-fg-muted">{t("manageProfile")}</p>
                    </a>
                </div>
                <div class="bg-surface-elevated shadow rounded-lg p-5">
                    <div class="flex justify-between items-center">
                        <h2 class="text-lg font-medium text-fg">{t("recentTransactions")}</h2>
                        <a href="/transactions" class="text-sm text-action-primary-bg">{t("viewAll")}</a>
                    </div>
                    <Show when=move || !loading() fallback=|| view! { <LoadingSpinner /> }>
                        <Show
                            when=move || !recent().is_empty()
                            fallback=move || view! {
                                <EmptyState title=t("noTransactions") description=t("noTransactionsSubtitle") />
                            }
                        >
                            <ul class="divide-y divide-border">
                                {move || {
                                    let user = user_id();
                                    recent()
                                        .into_iter()
                                        .map(|tx| view! { <TransactionRow transaction=tx user_id=user /> })
                                        .collect_view()
                                }}
                            </ul>
                        </Show>
                    </Show>
                </div>
            </div>
        </Layout>
    }
}
