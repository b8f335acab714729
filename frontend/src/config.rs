use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Runtime configuration resolved at startup. `api_base_url` absent means
/// there is no backend to talk to; the app then runs against the seeded
/// in-memory fixture store (demo mode) instead of the REST API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiBackend {
    Remote(String),
    Fixture,
}

static BACKEND: OnceLock<ApiBackend> = OnceLock::new();

#[cfg(target_arch = "wasm32")]
fn get_from_env_js() -> Option<String> {
    // Optional global object: window.__SIAKAD_ENV = { API_BASE_URL: "..." }
    let w = web_sys::window()?;
    let any = js_sys::Reflect::get(&w, &"__SIAKAD_ENV".into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let obj = js_sys::Object::from(any);
    let val = js_sys::Reflect::get(&obj, &"API_BASE_URL".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .or_else(|| js_sys::Reflect::get(&obj, &"api_base_url".into()).ok());
    val.and_then(|v| v.as_string()).filter(|s| !s.is_empty())
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let resp = reqwest::get("./config.json").await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}

/// Resolve the backend once. Precedence: env.js global, then config.json,
/// then demo mode. Later calls return the cached decision.
#[cfg(target_arch = "wasm32")]
pub async fn init() -> ApiBackend {
    if let Some(backend) = BACKEND.get() {
        return backend.clone();
    }
    let resolved = if let Some(url) = get_from_env_js() {
        ApiBackend::Remote(url)
    } else if let Some(url) = fetch_runtime_config()
        .await
        .and_then(|cfg| cfg.api_base_url)
        .filter(|s| !s.is_empty())
    {
        ApiBackend::Remote(url)
    } else {
        log::info!("no api_base_url configured, running in demo mode");
        ApiBackend::Fixture
    };
    let _ = BACKEND.set(resolved.clone());
    resolved
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn init() -> ApiBackend {
    backend()
}

/// Current backend; defaults to demo mode until `init` has resolved one.
pub fn backend() -> ApiBackend {
    BACKEND.get().cloned().unwrap_or(ApiBackend::Fixture)
}
