mod auth;
pub mod client;
pub mod transactions;
pub mod types;

pub use client::*;
pub use transactions::{DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use types::*;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests;
