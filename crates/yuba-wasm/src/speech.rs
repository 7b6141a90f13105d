use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;
use yuba_chat::{RecognitionEvent, RecognitionOptions, SpeechError, SpeechRecognizer};

/// Web Speech API recognizer (`SpeechRecognition` or the prefixed `webkitSpeechRecognition`)
pub struct WebSpeechRecognizer {
    constructor: Function,
    current: RefCell<Option<ActiveRecognition>>,
}

const HANDLERS: [&str; 4] = ["onstart", "onresult", "onerror", "onend"];

/// The recognition object of the latest `start` and the handlers it calls into
struct ActiveRecognition {
    recognition: JsValue,
    _on_signal: [Closure<dyn FnMut()>; 2],
    _on_event: [Closure<dyn FnMut(JsValue)>; 2],
}

impl Drop for ActiveRecognition {
    fn drop(&mut self) {
        // Unhook first so a late event never reaches a freed closure
        for handler in HANDLERS {
            let _ = Reflect::set(&self.recognition, &JsValue::from_str(handler), &JsValue::NULL);
        }
    }
}

impl WebSpeechRecognizer {
    /// Look for a recognition constructor; `None` when the browser has none
    pub fn detect(window: &Window) -> Option<Self> {
        ["SpeechRecognition", "webkitSpeechRecognition"]
            .iter()
            .filter_map(|name| Reflect::get(window, &JsValue::from_str(name)).ok())
            .find_map(|value| value.dyn_into::<Function>().ok())
            .map(|constructor| Self {
                constructor,
                current: RefCell::new(None),
            })
    }
}

fn start_error(e: JsValue) -> SpeechError {
    SpeechError::Start(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), SpeechError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(start_error)
}

/// `event.results[0][0].transcript`
fn first_transcript(event: &JsValue) -> Option<String> {
    let results = Reflect::get(event, &JsValue::from_str("results")).ok()?;
    let first = Reflect::get_u32(&results, 0).ok()?;
    let alternative = Reflect::get_u32(&first, 0).ok()?;
    Reflect::get(&alternative, &JsValue::from_str("transcript")).ok()?.as_string()
}

impl SpeechRecognizer for WebSpeechRecognizer {
    fn start(
        &self,
        options: &RecognitionOptions,
        on_event: Rc<dyn Fn(RecognitionEvent)>,
    ) -> Result<(), SpeechError> {
        let recognition = Reflect::construct(&self.constructor, &Array::new()).map_err(start_error)?;

        set(&recognition, "continuous", &JsValue::from_bool(options.continuous))?;
        set(&recognition, "lang", &JsValue::from_str(&options.lang))?;
        set(&recognition, "interimResults", &JsValue::from_bool(options.interim_results))?;
        set(&recognition, "maxAlternatives", &JsValue::from(options.max_alternatives))?;

        let cb = on_event.clone();
        let onstart = Closure::wrap(Box::new(move || {
            cb(RecognitionEvent::Started);
        }) as Box<dyn FnMut()>);
        set(&recognition, "onstart", onstart.as_ref())?;

        let cb = on_event.clone();
        let onresult = Closure::wrap(Box::new(move |event: JsValue| match first_transcript(&event) {
            Some(transcript) => cb(RecognitionEvent::Transcript(transcript)),
            None => cb(RecognitionEvent::Error("result without transcript".to_string())),
        }) as Box<dyn FnMut(JsValue)>);
        set(&recognition, "onresult", onresult.as_ref())?;

        let cb = on_event.clone();
        let onerror = Closure::wrap(Box::new(move |event: JsValue| {
            let error = Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|e| e.as_string())
                .unwrap_or_else(|| "unknown".to_string());
            cb(RecognitionEvent::Error(error));
        }) as Box<dyn FnMut(JsValue)>);
        set(&recognition, "onerror", onerror.as_ref())?;

        let cb = on_event;
        let onend = Closure::wrap(Box::new(move || {
            cb(RecognitionEvent::Ended);
        }) as Box<dyn FnMut()>);
        set(&recognition, "onend", onend.as_ref())?;

        let start = Reflect::get(&recognition, &JsValue::from_str("start"))
            .map_err(start_error)?
            .dyn_into::<Function>()
            .map_err(start_error)?;
        start.call0(&recognition).map_err(start_error)?;

        // Replacing the previous recognition frees its handlers
        *self.current.borrow_mut() = Some(ActiveRecognition {
            recognition,
            _on_signal: [onstart, onend],
            _on_event: [onresult, onerror],
        });

        Ok(())
    }
}
