//! Session storage behind a single module. Pages and API code never touch
//! `localStorage` directly; everything goes through these helpers so the
//! session has one init/teardown path. On non-WASM targets a thread-local
//! map stands in for `localStorage` so session logic stays host-testable.

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";
pub const USER_KEY: &str = "user";

#[cfg(target_arch = "wasm32")]
mod backend {
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub fn get(key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    pub fn set(key: &str, value: &str) -> Result<(), String> {
        local_storage()
            .ok_or_else(|| "localStorage tidak tersedia".to_string())?
            .set_item(key, value)
            .map_err(|_| format!("gagal menyimpan {}", key))
    }

    pub fn remove(key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        static STORE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }

    pub fn get(key: &str) -> Option<String> {
        STORE.with(|store| store.borrow().get(key).cloned())
    }

    pub fn set(key: &str, value: &str) -> Result<(), String> {
        STORE.with(|store| {
            store.borrow_mut().insert(key.to_string(), value.to_string());
        });
        Ok(())
    }

    pub fn remove(key: &str) {
        STORE.with(|store| {
            store.borrow_mut().remove(key);
        });
    }
}

pub fn get(key: &str) -> Option<String> {
    backend::get(key)
}

pub fn set(key: &str, value: &str) -> Result<(), String> {
    backend::set(key, value)
}

pub fn remove(key: &str) {
    backend::remove(key)
}

/// Drop every session key. Called on logout and on 401 responses.
pub fn clear_session() {
    remove(ACCESS_TOKEN_KEY);
    remove(TOKEN_TYPE_KEY);
    remove(USER_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_session_removes_all_keys() {
        set(ACCESS_TOKEN_KEY, "tok").unwrap();
        set(TOKEN_TYPE_KEY, "Bearer").unwrap();
        set(USER_KEY, "{}").unwrap();
        clear_session();
        assert!(get(ACCESS_TOKEN_KEY).is_none());
        assert!(get(TOKEN_TYPE_KEY).is_none());
        assert!(get(USER_KEY).is_none());
    }
}
