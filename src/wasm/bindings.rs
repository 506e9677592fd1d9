//! JavaScript bindings for a replica session

use crate::config::ReplicaConfig;
use crate::sync::Session;
use wasm_bindgen::prelude::*;

/// JavaScript-friendly wrapper for a replica session
///
/// # Example
/// ```javascript
/// const replica = new WasmReplica();
/// for (const line of JSON.parse(replica.applyEdit("Hi", 2))) {
///   socket.send(line);
/// }
/// socket.onmessage = (e) => {
///   if (replica.receive(e.data)) {
///     textarea.value = replica.text();
///     textarea.setSelectionRange(replica.cursor(), replica.cursor());
///   }
/// };
/// ```
#[wasm_bindgen]
pub struct WasmReplica {
    inner: Session,
}

#[wasm_bindgen]
impl WasmReplica {
    /// Create a replica; a random site id is generated when none is given
    #[wasm_bindgen(constructor)]
    pub fn new(site_id: Option<String>) -> Self {
        let config = match site_id {
            Some(site) => ReplicaConfig::with_site(site),
            None => ReplicaConfig::new(),
        };
        Self {
            inner: Session::new(config),
        }
    }

    /// Get the site id
    #[wasm_bindgen(js_name = siteId)]
    pub fn site_id(&self) -> String {
        self.inner.site().to_string()
    }

    /// Visible text
    #[wasm_bindgen(js_name = text)]
    pub fn text(&self) -> String {
        self.inner.text()
    }

    /// Caret position after the last applied message
    #[wasm_bindgen(js_name = cursor)]
    pub fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    /// Report the caret position from the editor
    #[wasm_bindgen(js_name = setCursor)]
    pub fn set_cursor(&mut self, cursor: usize) {
        self.inner.set_cursor(cursor);
    }

    /// Apply an editor change
    ///
    /// # Returns
    /// JSON array of wire message strings to send, in order
    #[wasm_bindgen(js_name = applyEdit)]
    pub fn apply_edit(&mut self, new_text: String, cursor: usize) -> Result<String, JsValue> {
        let lines = self
            .inner
            .local_edit(&new_text, cursor)
            .map_err(|e| JsValue::from_str(&format!("Edit failed: {}", e)))?;

        serde_json::to_string(&lines)
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }

    /// Apply a message from the transport
    ///
    /// # Returns
    /// `true` when the editor has to re-render; malformed messages are
    /// dropped and return `false`
    #[wasm_bindgen(js_name = receive)]
    pub fn receive(&mut self, line: String) -> bool {
        self.inner.handle_line(&line).needs_render()
    }

    /// Export the full document as a snapshot message
    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.inner
            .snapshot_line()
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }
}
