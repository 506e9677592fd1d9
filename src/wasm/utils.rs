//! WASM utility functions

use std::sync::Once;
use wasm_bindgen::prelude::*;

static INIT: Once = Once::new();

/// Install the panic hook and route `tracing` events to the browser console
#[wasm_bindgen(js_name = initRuntime)]
pub fn init_runtime() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}
