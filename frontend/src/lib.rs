#![recursion_limit = "256"]

pub mod activity;
pub mod api;
pub mod components;
pub mod config;
pub mod labels;
pub mod notifications;
pub mod pages;
pub mod router;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

/// Installs the panic hook and console logger. Safe to call more than once.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("console logger unavailable: {}", err).into());
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    init_logging();
    log::info!("Starting Mini Wallet frontend (wasm)");

    // Runtime config (env.js / config.json) must be in place before the API
    // client reads its base URL.
    leptos::spawn_local(async move {
        config::init().await;
        router::mount_app();
    });
}
