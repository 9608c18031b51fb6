//! Platform abstraction layer
//!
//! Browser/native differences for persisted key/value data. On the web this
//! is LocalStorage; native builds have no storage and every read misses.

/// Read a stored string (None if missing or storage is unavailable)
#[cfg(target_arch = "wasm32")]
pub fn read(key: &str) -> Option<String> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()?;
    storage.get_item(key).ok().flatten()
}

/// Store a string; failures are logged and otherwise ignored
#[cfg(target_arch = "wasm32")]
pub fn write(key: &str, value: &str) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();
    let Some(storage) = storage else {
        log::warn!("LocalStorage unavailable, not saving {}", key);
        return;
    };
    if storage.set_item(key, value).is_err() {
        log::warn!("Failed to write {} to LocalStorage", key);
    }
}

/// Drop a stored key
#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) {
    if let Some(storage) = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
    {
        let _ = storage.remove_item(key);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn read(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(_key: &str, _value: &str) {
    // No-op for native
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(_key: &str) {}
