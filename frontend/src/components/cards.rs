use leptos::*;

use crate::{api::Transaction, labels::label, utils::time::format_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn of(tx: &Transaction, user_id: Option<i64>) -> Self {
        if user_id == Some(tx.sender_id) {
            Direction::Sent
        } else {
            Direction::Received
        }
    }
}

/// Name of the other party, or their id when the name is missing.
pub fn counterparty(tx: &Transaction, direction: Direction) -> String {
    let (name, id) = match direction {
        Direction::Sent => (&tx.receiver_name, tx.receiver_id),
        Direction::Received => (&tx.sender_name, tx.sender_id),
    };
    name.clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("User #{}", id))
}

pub fn signed_amount(tx: &Transaction, direction: Direction) -> String {
    match direction {
        Direction::Sent => format!("-${}", tx.amount),
        Direction::Received => format!("+${}", tx.amount),
    }
}

#[component]
pub fn BalanceCard(#[prop(into)] balance: Signal<String>) -> impl IntoView {
    view! {
        <div class="bg-surface-elevated overflow-hidden shadow rounded-lg p-5">
            <p class="text-sm font-medium text-fg-muted">{label("dashboard.accountBalance", &[])}</p>
            <p class="mt-1 text-3xl font-semibold text-fg">{move || format!("${}", balance.get())}</p>
            <p class="text-xs text-fg-muted">{label("dashboard.availableBalance", &[])}</p>
        </div>
    }
}

#[component]
pub fn TransactionRow(transaction: Transaction, user_id: Option<i64>) -> impl IntoView {
    let direction = Direction::of(&transaction, user_id);
    let caption = match direction {
        Direction::Sent => label("transactions.sentTo", &[]),
        Direction::Received => label("transactions.receivedFrom", &[]),
    };
    let amount_class = match direction {
        Direction::Sent => "text-sm font-semibold text-status-error-text",
        Direction::Received => "text-sm font-semibold text-status-success-text",
    };
    let fee = (direction == Direction::Sent).then(|| {
        format!(
            "{}: ${}",
            label("transactions.fee", &[]),
            transaction.commission_fee
        )
    });
    let when = transaction.created_at.as_ref().map(format_timestamp);
    view! {
        <li class="py-4 flex items-center justify-between">
            <div>
                <p class="text-sm text-fg">
                    {caption}" "<span class="font-medium">{counterparty(&transaction, direction)}</span>
                </p>
                {when.map(|w| view! { <p class="text-xs text-fg-muted">{w}</p> })}
            </div>
            <div class="text-right">
                <p class=amount_class>{signed_amount(&transaction, direction)}</p>
                {fee.map(|f| view! { <p class="text-xs text-fg-muted">{f}</p> })}
            </div>
        </li>
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::transaction;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn sent_row_shows_fee() {
        let html = render_to_string(move || {
            view! { <ul><TransactionRow transaction=transaction(Some(1)) user_id=Some(1) /></ul> }
        });
        assert!(html.contains("Sent to"));
        assert!(html.contains("Fee: $0.38"));
    }

    #[test]
    fn balance_card_formats_amount() {
        let html = render_to_string(move || {
            let balance = Signal::derive(|| "150.00".to_string());
            view! { <BalanceCard balance=balance /> }
        });
        assert!(html.contains("$150.00"));
    }
}
