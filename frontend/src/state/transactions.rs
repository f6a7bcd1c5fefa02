use crate::api::{
    ApiClient, ApiError, CreateTransactionRequest, CreateTransactionResponse, Transaction,
    TransactionsData, DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
use leptos::*;

pub const DEFAULT_BALANCE: &str = "0.00";
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub from: u64,
    pub to: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: DEFAULT_PAGE,
            last_page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
            from: 0,
            to: 0,
        }
    }
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsState {
    pub transactions: Vec<Transaction>,
    pub balance: String,
    pub pagination: Pagination,
    pub loading: bool,
}

impl Default for TransactionsState {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            balance: DEFAULT_BALANCE.to_string(),
            pagination: Pagination::default(),
            loading: false,
        }
    }
}

impl TransactionsState {
    pub fn recent_transactions(&self) -> &[Transaction] {
        let end = self.transactions.len().min(RECENT_LIMIT);
        &self.transactions[..end]
    }

    fn apply(&mut self, data: TransactionsData) {
        let page = data.transactions;
        let defaults = Pagination::default();
        self.transactions = page.data;
        self.balance = data
            .balance
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_BALANCE.to_string());
        self.pagination = Pagination {
            current_page: page.current_page.unwrap_or(defaults.current_page),
            last_page: page.last_page.unwrap_or(defaults.last_page),
            per_page: page.per_page.unwrap_or(defaults.per_page),
            total: page.total.unwrap_or(defaults.total),
            from: page.from.unwrap_or(defaults.from),
            to: page.to.unwrap_or(defaults.to),
        };
    }
}

pub type TransactionsContext = (ReadSignal<TransactionsState>, WriteSignal<TransactionsState>);

pub fn provide_transactions() -> TransactionsContext {
    let ctx = create_signal(TransactionsState::default());
    provide_context::<TransactionsContext>(ctx);
    ctx
}

pub fn use_transactions() -> TransactionsContext {
    use_context::<TransactionsContext>()
        .unwrap_or_else(|| create_signal(TransactionsState::default()))
}

pub async fn fetch_transactions(
    api: &ApiClient,
    page: u32,
    per_page: u32,
    set_state: WriteSignal<TransactionsState>,
) -> Result<(), ApiError> {
    set_state.update(|state| state.loading = true);
    match api.get_transactions(page, per_page).await {
        Ok(data) => {
            set_state.update(|state| {
                state.apply(data);
                state.loading = false;
            });
            Ok(())
        }
        Err(error) => {
            log::error!("Error fetching transactions: {}", error);
            set_state.update(|state| state.loading = false);
            Err(error)
        }
    }
}

/// Sends money. The returned transaction is prepended only when it has an id.
pub async fn create_transaction(
    api: &ApiClient,
    request: CreateTransactionRequest,
    set_state: WriteSignal<TransactionsState>,
) -> Result<CreateTransactionResponse, ApiError> {
    set_state.update(|state| state.loading = true);
    let result = api.create_transaction(&request).await;
    set_state.update(|state| {
        if let Ok(CreateTransactionResponse {
            transaction: Some(tx),
            ..
        }) = &result
        {
            if tx.id.is_some() {
                state.transactions.insert(0, tx.clone());
            }
        }
        state.loading = false;
    });
    result
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::api::TransactionsPage;
    use crate::test_support::helpers::transaction;

    #[test]
    fn defaults_match_an_empty_wallet() {
        let state = TransactionsState::default();
        assert_eq!(state.balance, "0.00");
        assert_eq!(state.pagination.per_page, 10);
        assert!(!state.pagination.has_next());
        assert!(!state.pagination.has_previous());
    }

    #[test]
    fn recent_transactions_are_capped_at_five() {
        let mut state = TransactionsState::default();
        state.transactions = (1..=7).map(|id| transaction(Some(id))).collect();
        let recent = state.recent_transactions();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, Some(1));
    }

    #[test]
    fn apply_fills_missing_paging_values() {
        let mut state = TransactionsState::default();
        state.apply(TransactionsData {
            balance: None,
            transactions: TransactionsPage {
                data: vec![transaction(Some(3))],
                current_page: Some(2),
                last_page: Some(4),
                ..Default::default()
            },
        });
        assert_eq!(state.balance, "0.00");
        assert_eq!(state.pagination.current_page, 2);
        assert_eq!(state.pagination.per_page, 10);
        assert_eq!(state.pagination.from, 0);
        assert!(state.pagination.has_next());
        assert!(state.pagination.has_previous());
    }
}
