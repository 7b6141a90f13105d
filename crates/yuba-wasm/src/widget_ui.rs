use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};
use yuba_api::{BackendClient, BackendConfig};
use yuba_chat::{ConversationSession, HostBridge, SpeechError, SpeechInput, Widget};
use yuba_types::ConfigReference;

use crate::bridge::JsBridge;
use crate::dom;
use crate::speech::WebSpeechRecognizer;
use crate::transport::FetchBackend;
use crate::utils;

const WINDOW_ID: &str = "yuba-window";

/// DOM side of the widget: toggle button plus the chat window while open
pub struct WidgetUi {
    document: Document,
    container: Element,
    widget: RefCell<Widget>,
    speech: SpeechInput,
}

/// Elements re-rendered on every session change, plus the window's listeners
struct WindowParts {
    chat_area: Element,
    input: HtmlInputElement,
    mic: Element,
    _listeners: Vec<dom::Listener>,
}

impl WidgetUi {
    pub fn new(
        container_id: &str,
        configuration: String,
        user_email: Option<String>,
        callback: Option<js_sys::Function>,
    ) -> Result<Rc<Self>, JsValue> {
        let window = crate::window()?;
        let document = crate::document()?;
        let container = dom::get_element_by_id(&document, container_id)?;

        let config = BackendConfig::new(utils::backend_origin())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let backend: Rc<dyn BackendClient> = Rc::new(FetchBackend::new(config));
        let bridge: Option<Rc<dyn HostBridge>> =
            callback.map(|f| Rc::new(JsBridge::new(f)) as Rc<dyn HostBridge>);
        let reference = ConfigReference::profile(configuration, user_email);

        let widget = Widget::new(move || {
            let session = ConversationSession::new(backend.clone(), reference.clone());
            match &bridge {
                Some(bridge) => session.with_bridge(bridge.clone()),
                None => session,
            }
        });

        let speech = match WebSpeechRecognizer::detect(&window) {
            Some(recognizer) => SpeechInput::new(Rc::new(recognizer)),
            None => SpeechInput::unsupported(),
        };

        Ok(Rc::new(Self {
            document,
            container,
            widget: RefCell::new(widget),
            speech,
        }))
    }

    pub fn is_open(&self) -> bool {
        self.widget.borrow().is_open()
    }

    pub fn mount(ui: &Rc<Self>) -> Result<(), JsValue> {
        let icon = dom::create_element_with_class(&ui.document, "div", "icon")?;
        let button = dom::create_element_with_class(&ui.document, "button", "btn")?;
        button.set_attribute("aria-label", "Open chat")?;
        button.set_text_content(Some("💬"));
        icon.append_child(&button)?;
        ui.container.append_child(&icon)?;

        let weak = Rc::downgrade(ui);
        dom::add_listener(&button, "click", move |_| {
            if let Some(ui) = weak.upgrade() {
                if let Err(e) = WidgetUi::toggle(&ui) {
                    log::error!("Failed to toggle chat window: {:?}", e);
                }
            }
        })?;

        log::info!("Yuba widget mounted");
        Ok(())
    }

    pub fn toggle(ui: &Rc<Self>) -> Result<bool, JsValue> {
        let open = ui.widget.borrow_mut().toggle();
        if open {
            Self::render_window(ui)?;
        } else {
            ui.remove_window();
        }
        Ok(open)
    }

    fn close(&self) {
        self.widget.borrow_mut().close();
        self.remove_window();
    }

    fn remove_window(&self) {
        if let Some(window) = self.document.get_element_by_id(WINDOW_ID) {
            window.remove();
        }
    }

    fn render_window(ui: &Rc<Self>) -> Result<(), JsValue> {
        let Some(session) = ui.widget.borrow().session() else {
            return Ok(());
        };
        let document = &ui.document;

        let window = dom::create_element_with_class(document, "div", "window")?;
        window.set_id(WINDOW_ID);
        window.set_inner_html(
            r#"<div class="header"><h2>Yuba</h2><button class="close">x</button></div>
<h3>Your Ultimate Backend Agent</h3>
<div class="chat_area"></div>
<div class="input-wrapper">
  <div class="input-with-mic">
    <input type="text" placeholder="Type your message..." />
    <button class="mic-inside" aria-label="Speak">🎤</button>
  </div>
  <button class="bt">Send</button>
</div>"#,
        );
        ui.container.append_child(&window)?;

        let find = |selector: &str| -> Result<Element, JsValue> {
            window
                .query_selector(selector)?
                .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", selector)))
        };
        let chat_area = find(".chat_area")?;
        let input = find("input")?.dyn_into::<HtmlInputElement>()?;
        let mic = find(".mic-inside")?;
        let mut listeners = Vec::new();

        let weak_ui = Rc::downgrade(ui);
        listeners.push(dom::listen(&find(".close")?, "click", move |_| {
            if let Some(ui) = weak_ui.upgrade() {
                ui.close();
            }
        })?);

        // Listeners hold the session weakly: closing the window must drop it
        let target = Rc::downgrade(&session);
        let source = input.clone();
        listeners.push(dom::listen(input.as_ref(), "input", move |_| {
            if let Some(session) = target.upgrade() {
                session.set_draft(source.value());
            }
        })?);

        let target = Rc::downgrade(&session);
        listeners.push(dom::listen(input.as_ref(), "keydown", move |event| {
            let is_enter = event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .map_or(false, |e| e.key() == "Enter");
            if is_enter {
                submit(&target);
            }
        })?);

        let target = Rc::downgrade(&session);
        listeners.push(dom::listen(&find(".bt")?, "click", move |_| submit(&target))?);

        let target = Rc::downgrade(&session);
        let weak_ui = Rc::downgrade(ui);
        listeners.push(dom::listen(&mic, "click", move |_| {
            let (Some(ui), Some(session)) = (weak_ui.upgrade(), target.upgrade()) else {
                return;
            };
            if session.is_listening() {
                return;
            }
            match ui.speech.listen(&session) {
                Ok(()) => {}
                Err(SpeechError::Unsupported) => alert(&SpeechError::Unsupported.to_string()),
                Err(e) => log::error!("{}", e),
            }
        })?);

        // The session's observer owns the parts, so closing the window
        // (which drops the session) detaches every listener above
        let parts = Rc::new(WindowParts {
            chat_area,
            input,
            mic,
            _listeners: listeners,
        });

        let render_parts = parts.clone();
        session.set_observer(move |session| render_session(&render_parts, session));
        render_session(&parts, &session);

        Ok(())
    }
}

fn submit(target: &Weak<ConversationSession>) {
    if let Some(session) = target.upgrade() {
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = session.submit_draft().await;
            log::debug!("Send finished: {:?}", outcome);
        });
    }
}

fn alert(message: &str) {
    if let Ok(window) = crate::window() {
        let _ = window.alert_with_message(message);
    }
}

fn render_session(parts: &WindowParts, session: &ConversationSession) {
    let html: String = session
        .history()
        .iter()
        .map(|msg| {
            format!(
                r#"<div class="message {}"><strong>{}</strong>{}</div>"#,
                msg.sender.as_str(),
                msg.sender.label(),
                utils::escape_html(&msg.display_text())
            )
        })
        .collect();
    parts.chat_area.set_inner_html(&html);
    dom::scroll_to_bottom(&parts.chat_area);

    let draft = session.draft();
    if parts.input.value() != draft {
        parts.input.set_value(&draft);
    }

    let class = if session.is_listening() { "mic-inside listening" } else { "mic-inside" };
    parts.mic.set_class_name(class);
}
