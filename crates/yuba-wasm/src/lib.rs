use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod bridge;
mod dom;
mod speech;
mod transport;
mod utils;
mod widget_ui;

pub use bridge::JsBridge;
pub use speech::WebSpeechRecognizer;
pub use transport::FetchBackend;

use widget_ui::WidgetUi;

/// Initialize the WASM module
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("Yuba widget WASM initialized");
}

/// The embeddable chat widget.
///
/// ```js
/// const widget = new YubaWidget("chat-root", "https://example.com/yuba.json", null, window.chatbotCallback);
/// widget.mount();
/// ```
///
/// The callback is handed over once, at construction; the widget never looks
/// it up on `window` by itself.
#[wasm_bindgen]
pub struct YubaWidget {
    ui: Rc<WidgetUi>,
}

#[wasm_bindgen]
impl YubaWidget {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_id: &str,
        configuration: String,
        user_email: Option<String>,
        callback: Option<js_sys::Function>,
    ) -> Result<YubaWidget, JsValue> {
        let ui = WidgetUi::new(container_id, configuration, user_email, callback)?;
        Ok(Self { ui })
    }

    /// Render the floating toggle button into the container
    pub fn mount(&self) -> Result<(), JsValue> {
        WidgetUi::mount(&self.ui)
    }

    /// Open or close the chat window; returns whether it is now open
    pub fn toggle(&self) -> Result<bool, JsValue> {
        WidgetUi::toggle(&self.ui)
    }

    #[wasm_bindgen(getter)]
    pub fn open(&self) -> bool {
        self.ui.is_open()
    }
}

/// Get the window object
fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
