pub mod auth;
pub mod toast;
pub mod transactions;
