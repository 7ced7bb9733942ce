mod api;
mod app;
mod auth;
mod autosave;
mod components;
mod models;
mod notify;
mod pages;
mod runtime;
mod state;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::DEBUG)
            .build(),
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::auth::{CredentialProvider, StoredCredential};
    use crate::storage::{load_json_from_storage, save_json_to_storage, LAST_COLOR_KEY};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_stored_credential_roundtrip() {
        StoredCredential::clear();
        assert!(StoredCredential.credential().is_none());

        StoredCredential::save("t1");
        assert_eq!(StoredCredential.credential().as_deref(), Some("t1"));

        // Blank tokens count as signed out.
        StoredCredential::save("  ");
        assert!(StoredCredential.credential().is_none());

        StoredCredential::clear();
        assert!(StoredCredential.credential().is_none());
    }

    #[wasm_bindgen_test]
    fn test_last_color_storage_roundtrip() {
        save_json_to_storage(LAST_COLOR_KEY, &"#78ABA8".to_string());
        let loaded: Option<String> = load_json_from_storage(LAST_COLOR_KEY);
        assert_eq!(loaded.as_deref(), Some("#78ABA8"));
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    tracing::debug!("notes editor starting");
    mount_to_body(App);
}
