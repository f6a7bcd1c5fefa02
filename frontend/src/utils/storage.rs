//! Session storage access. Host builds keep values in a thread-local map so
//! stores and the API client can be exercised outside a browser.

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user";

#[cfg(target_arch = "wasm32")]
mod backend {
    use web_sys::{Storage, Window};

    pub fn window() -> Result<Window, String> {
        web_sys::window().ok_or_else(|| "No window object".to_string())
    }

    pub fn session_storage() -> Result<Storage, String> {
        window()?
            .session_storage()
            .map_err(|_| "No sessionStorage".to_string())?
            .ok_or_else(|| "No sessionStorage".to_string())
    }

    pub fn get_item(key: &str) -> Result<Option<String>, String> {
        session_storage()?
            .get_item(key)
            .map_err(|_| format!("Failed to read `{}`", key))
    }

    pub fn set_item(key: &str, value: &str) -> Result<(), String> {
        session_storage()?
            .set_item(key, value)
            .map_err(|_| format!("Failed to store `{}`", key))
    }

    pub fn remove_item(key: &str) -> Result<(), String> {
        session_storage()?
            .remove_item(key)
            .map_err(|_| format!("Failed to remove `{}`", key))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::{cell::RefCell, collections::HashMap};

    thread_local! {
        static SESSION: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }

    pub fn get_item(key: &str) -> Result<Option<String>, String> {
        Ok(SESSION.with(|s| s.borrow().get(key).cloned()))
    }

    pub fn set_item(key: &str, value: &str) -> Result<(), String> {
        SESSION.with(|s| s.borrow_mut().insert(key.to_string(), value.to_string()));
        Ok(())
    }

    pub fn remove_item(key: &str) -> Result<(), String> {
        SESSION.with(|s| s.borrow_mut().remove(key));
        Ok(())
    }
}

pub use backend::*;

pub fn auth_token() -> Option<String> {
    get_item(AUTH_TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|token| !token.is_empty())
}

/// Drops the persisted session (token and user).
pub fn clear_session() {
    for key in [AUTH_TOKEN_KEY, USER_KEY] {
        if let Err(err) = remove_item(key) {
            log::warn!("{}", err);
        }
    }
}
