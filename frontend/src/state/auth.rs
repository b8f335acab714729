use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use leptos::*;
use serde::Deserialize;

use crate::api::types::{ApiError, LoginRequest, Role, UserProfile};
use crate::api::ApiClient;
use crate::utils::storage;

type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl AuthState {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// True only for a parseable JWT whose `exp` lies in the past. Opaque
/// tokens (the demo fixture issues those) never count as expired; the
/// backend remains the authority and answers 401 when it disagrees.
fn token_expired(token: &str) -> bool {
    let payload = match token.split('.').nth(1) {
        Some(payload) => payload,
        None => return false,
    };
    let decoded = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let claims: JwtClaims = match serde_json::from_slice(&decoded) {
        Ok(claims) => claims,
        Err(_) => return false,
    };
    match claims.exp {
        Some(exp) => exp <= chrono::Utc::now().timestamp(),
        None => false,
    }
}

/// Synchronous restore from the persisted session. An expired token wipes
/// the whole session so no page ever renders with stale credentials.
pub fn restore_session() -> Option<UserProfile> {
    let token = storage::get(storage::ACCESS_TOKEN_KEY)?;
    if token_expired(&token) {
        storage::clear_session();
        return None;
    }
    let raw = storage::get(storage::USER_KEY)?;
    serde_json::from_str(&raw).ok()
}

fn create_auth_context() -> AuthContext {
    let restored = restore_session();
    let (auth_state, set_auth_state) = create_signal(AuthState {
        is_authenticated: restored.is_some(),
        user: restored,
        loading: false,
    });

    // Revalidate against the backend when a session was restored; a 401
    // already cleared storage inside the client, so only the signal needs
    // to follow suit.
    if auth_state.get_untracked().is_authenticated {
        let api_client = use_context::<ApiClient>().unwrap_or_default();
        spawn_local(async move {
            match api_client.me().await {
                Ok(user) => set_auth_state.update(|state| {
                    state.user = Some(user);
                    state.is_authenticated = true;
                }),
                Err(error) if error.status == Some(401) => set_auth_state.update(|state| {
                    state.user = None;
                    state.is_authenticated = false;
                }),
                // Transport hiccups keep the restored session.
                Err(_) => {}
            }
        });
    }

    (auth_state, set_auth_state)
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let ctx = create_auth_context();
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| create_signal(AuthState::default()))
}

pub async fn login_request(
    request: LoginRequest,
    api_client: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    set_auth_state.update(|state| state.loading = true);

    match api_client.login(&request).await {
        Ok(response) => {
            set_auth_state.update(|state| {
                state.user = Some(response.user);
                state.is_authenticated = true;
                state.loading = false;
            });
            Ok(())
        }
        Err(error) => {
            set_auth_state.update(|state| state.loading = false);
            Err(error)
        }
    }
}

pub async fn logout(
    api_client: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    let result = api_client.logout().await;

    set_auth_state.update(|state| {
        state.user = None;
        state.is_authenticated = false;
        state.loading = false;
    });

    result
}

pub fn use_login_action() -> Action<LoginRequest, Result<(), ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let api = api.clone();
        async move { login_request(payload, &api, set_auth).await }
    })
}

pub fn use_logout_action() -> Action<(), Result<(), ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();

    create_action(move |_: &()| {
        let api = api.clone();
        async move { logout(&api, set_auth).await }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::create_runtime;

    fn with_runtime<T>(test: impl FnOnce() -> T) -> T {
        let runtime = create_runtime();
        let result = test();
        runtime.dispose();
        result
    }

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u-1","exp":{}}}"#, exp));
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn use_auth_returns_default_without_context() {
        with_runtime(|| {
            let (state, _set_state) = use_auth();
            let snapshot = state.get();
            assert!(!snapshot.is_authenticated);
            assert!(snapshot.user.is_none());
        });
    }

    #[test]
    fn expired_jwt_is_detected() {
        assert!(token_expired(&jwt_with_exp(1_000_000)));
        let future = chrono::Utc::now().timestamp() + 3600;
        assert!(!token_expired(&jwt_with_exp(future)));
    }

    #[test]
    fn opaque_tokens_never_expire_locally() {
        assert!(!token_expired("demo-token-u-mhs-1"));
        assert!(!token_expired("a.b.c"));
    }
}
