use mini_wallet_frontend::{config, init_logging, router};
use wasm_bindgen_futures::spawn_local;

fn main() {
    init_logging();
    let perf = web_sys::window().and_then(|w| w.performance());
    let t0 = perf.as_ref().map(|p| p.now());
    log::info!("Starting Mini Wallet frontend: initializing runtime config");

    spawn_local(async move {
        config::init().await;
        if let (Some(p), Some(start)) = (perf.as_ref(), t0) {
            log::info!("Runtime config initialized ({} ms)", p.now() - start);
        }
        router::mount_app();
    });
}
