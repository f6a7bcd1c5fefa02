//! Full-page navigation helpers.

#[cfg(target_arch = "wasm32")]
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn redirect(path: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(err) = window.location().set_href(path) {
                log::error!("failed to navigate to {}: {:?}", path, err);
            }
        }
        None => log::error!("no window; cannot navigate to {}", path),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_path() -> String {
    "/".to_string()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn redirect(path: &str) {
    log::debug!("redirect to {} skipped outside the browser", path);
}

/// The 401 handler sends users to `/login` unless they are already on a
/// login screen.
pub fn should_redirect_to_login(current: &str) -> bool {
    !current.contains("/login")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_screens_are_not_redirected() {
        assert!(!should_redirect_to_login("/login"));
        assert!(should_redirect_to_login("/transactions"));
        assert!(should_redirect_to_login("/"));
    }
}
