use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_PUSHER_CLUSTER: &str = "ap2";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub pusher_key: Option<String>,
    #[serde(default)]
    pub pusher_cluster: Option<String>,
    #[serde(default)]
    pub inactivity_timeout_ms: Option<u64>,
    #[serde(default)]
    pub warning_lead_time_ms: Option<u64>,
}

impl RuntimeConfig {
    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.or(fallback.api_base_url),
            pusher_key: self.pusher_key.or(fallback.pusher_key),
            pusher_cluster: self.pusher_cluster.or(fallback.pusher_cluster),
            inactivity_timeout_ms: self.inactivity_timeout_ms.or(fallback.inactivity_timeout_ms),
            warning_lead_time_ms: self.warning_lead_time_ms.or(fallback.warning_lead_time_ms),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == RuntimeConfig::default()
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn pusher_cluster(&self) -> &str {
        self.pusher_cluster
            .as_deref()
            .filter(|cluster| !cluster.is_empty())
            .unwrap_or(DEFAULT_PUSHER_CLUSTER)
    }

    /// `None` when no key is configured; real-time notifications stay off.
    pub fn pusher_key(&self) -> Option<&str> {
        self.pusher_key.as_deref().filter(|key| !key.is_empty())
    }
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

fn cache(cfg: RuntimeConfig) -> RuntimeConfig {
    RUNTIME_CONFIG.get_or_init(|| cfg).clone()
}

/// The loaded configuration, or defaults when `init` has not finished yet.
pub fn current() -> RuntimeConfig {
    RUNTIME_CONFIG.get().cloned().unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::RuntimeConfig;
    use wasm_bindgen::JsValue;

    const ENV_GLOBAL: &str = "__WALLET_ENV";
    const CONFIG_GLOBAL: &str = "__WALLET_CONFIG";

    fn global_object(name: &str) -> Option<js_sys::Object> {
        let window = web_sys::window()?;
        let any = js_sys::Reflect::get(&window, &name.into()).ok()?;
        if any.is_undefined() || any.is_null() {
            return None;
        }
        Some(js_sys::Object::from(any))
    }

    // Accepts both `api_base_url` and `API_BASE_URL`.
    fn lookup(obj: &js_sys::Object, key: &str) -> Option<JsValue> {
        [key.to_string(), key.to_ascii_uppercase()]
            .iter()
            .filter_map(|k| js_sys::Reflect::get(obj, &k.as_str().into()).ok())
            .find(|v| !v.is_undefined() && !v.is_null())
    }

    fn string_value(obj: &js_sys::Object, key: &str) -> Option<String> {
        lookup(obj, key).and_then(|v| v.as_string())
    }

    fn millis_value(obj: &js_sys::Object, key: &str) -> Option<u64> {
        let value = lookup(obj, key)?;
        if let Some(number) = value.as_f64() {
            return (number.is_finite() && number >= 0.0).then_some(number as u64);
        }
        value.as_string().and_then(|s| s.trim().parse().ok())
    }

    fn from_global(name: &str) -> Option<RuntimeConfig> {
        let obj = global_object(name)?;
        Some(RuntimeConfig {
            api_base_url: string_value(&obj, "api_base_url"),
            pusher_key: string_value(&obj, "pusher_key"),
            pusher_cluster: string_value(&obj, "pusher_cluster"),
            inactivity_timeout_ms: millis_value(&obj, "inactivity_timeout_ms"),
            warning_lead_time_ms: millis_value(&obj, "warning_lead_time_ms"),
        })
    }

    pub fn snapshot_from_globals() -> RuntimeConfig {
        let env = from_global(ENV_GLOBAL).unwrap_or_default();
        let config = from_global(CONFIG_GLOBAL).unwrap_or_default();
        env.or(config)
    }

    pub fn write_window_config(cfg: &RuntimeConfig) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match serde_wasm_value(cfg) {
            Some(obj) => {
                let _ = js_sys::Reflect::set(&window, &CONFIG_GLOBAL.into(), &obj);
            }
            None => log::warn!("could not publish runtime config to window"),
        }
    }

    fn serde_wasm_value(cfg: &RuntimeConfig) -> Option<JsValue> {
        let json = serde_json::to_string(cfg).ok()?;
        js_sys::JSON::parse(&json).ok()
    }

    async fn fetch_from(url: &str) -> anyhow::Result<RuntimeConfig> {
        let resp = reqwest::get(url).await?;
        if !resp.status().is_success() {
            anyhow::bail!("config.json responded with {}", resp.status());
        }
        Ok(resp.json::<RuntimeConfig>().await?)
    }

    pub async fn fetch_runtime_config() -> Option<RuntimeConfig> {
        let origin = web_sys::window()?.location().origin().ok()?;
        match fetch_from(&format!("{}/config.json", origin)).await {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                log::debug!("no runtime config.json: {}", err);
                None
            }
        }
    }
}

/// Resolves the runtime configuration once: window globals first, then
/// `./config.json`, then built-in defaults.
#[cfg(target_arch = "wasm32")]
pub async fn load() -> RuntimeConfig {
    if let Some(cached) = RUNTIME_CONFIG.get() {
        return cached.clone();
    }
    let from_globals = browser::snapshot_from_globals();
    if !from_globals.is_empty() {
        return cache(from_globals);
    }
    if let Some(cfg) = browser::fetch_runtime_config().await {
        browser::write_window_config(&cfg);
        return cache(cfg);
    }
    cache(RuntimeConfig::default())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load() -> RuntimeConfig {
    cache(RuntimeConfig::default())
}

pub async fn await_api_base_url() -> String {
    load().await.api_base_url().to_string()
}

pub async fn init() {
    let cfg = load().await;
    log::info!("runtime config loaded (api: {})", cfg.api_base_url());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.pusher_cluster(), "ap2");
        assert_eq!(cfg.pusher_key(), None);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let cfg = RuntimeConfig {
            api_base_url: Some(String::new()),
            pusher_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert!(cfg.pusher_key().is_none());
    }

    #[test]
    fn earlier_source_wins_field_by_field() {
        let env = RuntimeConfig {
            api_base_url: Some("https://api.example.com".into()),
            ..Default::default()
        };
        let file = RuntimeConfig {
            api_base_url: Some("https://ignored.example.com".into()),
            pusher_key: Some("key".into()),
            inactivity_timeout_ms: Some(30_000),
            ..Default::default()
        };
        let merged = env.or(file);
        assert_eq!(merged.api_base_url(), "https://api.example.com");
        assert_eq!(merged.pusher_key(), Some("key"));
        assert_eq!(merged.inactivity_timeout_ms, Some(30_000));
        assert!(merged.warning_lead_time_ms.is_none());
    }

    #[test]
    fn partial_json_deserializes() {
        let cfg: RuntimeConfig =
            serde_json::from_str(r#"{"api_base_url":"https://x.test/api","pusher_cluster":"eu"}"#)
                .unwrap();
        assert_eq!(cfg.api_base_url(), "https://x.test/api");
        assert_eq!(cfg.pusher_cluster(), "eu");
        assert!(!cfg.is_empty());
    }

    #[tokio::test]
    async fn host_load_falls_back_to_defaults() {
        assert_eq!(await_api_base_url().await, DEFAULT_API_BASE_URL);
        assert_eq!(current().api_base_url(), DEFAULT_API_BASE_URL);
    }
}
