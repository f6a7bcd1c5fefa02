use super::{
    client::ApiClient,
    types::{
        ApiError, ChannelAuth, CreateTransactionRequest, CreateTransactionResponse, Envelope,
        TransactionsData,
    },
};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;

impl ApiClient {
    pub async fn get_transactions(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<TransactionsData, ApiError> {
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.get_json::<Envelope<TransactionsData>>("/transactions", &query)
            .await?
            .into_data()
    }

    pub async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, ApiError> {
        self.post_json("/transactions", Some(request)).await
    }

    /// Signs a private or presence channel subscription for the socket.
    pub async fn authorize_channel(
        &self,
        socket_id: &str,
        channel_name: &str,
    ) -> Result<ChannelAuth, ApiError> {
        self.post_form(
            "/broadcasting/auth",
            &[("socket_id", socket_id), ("channel_name", channel_name)],
        )
        .await
    }
}
