use leptos::{ev::SubmitEvent, *};

use crate::{
    api::{ApiClient, ApiError, CreateTransactionRequest, CreateTransactionResponse},
    components::{
        error::InlineErrorMessage,
        forms::{SubmitButton, TextField},
        layout::Layout,
    },
    labels::label,
    pages::validation,
    state::{
        toast::use_toasts,
        transactions::{create_transaction, use_transactions},
    },
    utils::navigation,
};

const TRANSACTIONS_PATH: &str = "/transactions";

pub fn build_request(receiver: &str, amount: &str) -> Result<CreateTransactionRequest, String> {
    Ok(CreateTransactionRequest {
        receiver_id: validation::receiver_id(receiver)?,
        amount: validation::amount(amount)?,
    })
}

#[component]
pub fn CreateTransactionPage() -> impl IntoView {
    let t = |key: &str| label(&format!("createTransaction.{}", key), &[]);
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let (_, set_transactions) = use_transactions();
    let toasts = use_toasts();
    let receiver = create_rw_signal(String::new());
    let amount = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);

    let send_action = create_action(move |request: &CreateTransactionRequest| {
        let api = api.clone();
        let request = request.clone();
        async move { create_transaction(&api, request, set_transactions).await }
    });
    let pending = send_action.pending();

    create_effect(move |_| {
        if let Some(result) = send_action.value().get() {
            match result {
                Ok(CreateTransactionResponse { message, .. }) => {
                    let text = message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| label("messages.success.transferSent", &[]));
                    toasts.success(&text);
                    navigation::redirect(TRANSACTIONS_PATH);
                }
                Err(err) => {
                    toasts.error(&err.error);
                    error.set(Some(err));
                }
            }
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match build_request(&receiver.get_untracked(), &amount.get_untracked()) {
            Ok(request) => {
                error.set(None);
                send_action.dispatch(request);
            }
            Err(msg) => error.set(Some(ApiError::validation(msg))),
        }
    };

    view! {
        <Layout>
            <div class="max-w-xl mx-auto px-4 py-6 sm:px-0 space-y-6">
                <a href=TRANSACTIONS_PATH class="text-sm text-action-primary-bg">{t("backToTransactions")}</a>
                <div>
                    <h1 class="text-2xl font-bold text-fg">{t("title")}</h1>
                    <p class="text-sm text-fg-muted">{t("subtitle")}</p>
                </div>
                <form class="bg-surface-elevated shadow rounded-lg p-6 space-y-6" on:submit=on_submit>
                    <TextField id="receiver_id" label=t("receiverId") value=receiver input_type="number"
                        placeholder=t("receiverIdPlaceholder") help=t("receiverIdHelp") />
                    <TextField id="amount" label=t("amount") value=amount input_type="number"
                        placeholder=t("amountPlaceholder") help=t("amountHelp") />
                    <div class="rounded-md bg-status-info-bg p-4 text-sm text-status-info-text">
                        <p class="font-medium">{t("transferInfo")}</p>
                        <p>{t("transferInfoText")}</p>
                    </div>
                    <InlineErrorMessage error=error />
                    <div class="flex gap-3">
                        <a href=TRANSACTIONS_PATH class="flex-1 text-center py-2 border border-border rounded-md text-sm">
                            {t("cancel")}
                        </a>
                        <div class="flex-1">
                            <SubmitButton label=t("sendMoney") pending_label=t("sending") pending=pending />
                        </div>
                    </div>
                </form>
            </div>
        </Layout>
    }
}
