//! Browser DOM bindings: HUD elements and input listeners

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use super::{
    Hud, InputEvent, high_score_label, input_for_key, progress_label, progress_percent,
    score_label, sound_icon,
};
use crate::consts::PRELOAD_HIDE_DELAY_MS;
use crate::stage::Director;

/// HUD backed by elements in `index.html`
pub struct DomHud {
    document: Document,
}

impl DomHud {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            log::debug!("#{} missing from page", id);
        }
        el
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.element(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }
}

impl Hud for DomHud {
    fn set_load_progress(&mut self, fraction: f32) {
        if let Some(fill) = self
            .element("progress-fill")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let width = format!("{}%", progress_percent(fraction));
            let _ = fill.style().set_property("width", &width);
        }
        self.set_text("progress-text", &progress_label(fraction));
    }

    fn loading_complete(&mut self) {
        let Some(overlay) = self.element("preload-overlay") else {
            return;
        };
        let hide = Closure::once(move || {
            let _ = overlay.class_list().add_1("hidden");
        });
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                hide.as_ref().unchecked_ref(),
                PRELOAD_HIDE_DELAY_MS,
            )
        });
        if !matches!(scheduled, Some(Ok(_))) {
            log::warn!("Could not schedule loader fade");
        }
        hide.forget();
    }

    fn set_score(&mut self, score: u64) {
        self.set_text("score", &score_label(score));
    }

    fn set_high_score(&mut self, high_score: u64) {
        self.set_text("highscore", &high_score_label(high_score));
    }

    fn set_sound_icon(&mut self, sound_on: bool) {
        self.set_text("mute-btn", sound_icon(sound_on));
    }

    fn show_game_over(&mut self, final_score: u64) {
        self.set_text("final-score", &score_label(final_score));
        self.set_hidden("game-over", false);
    }

    fn hide_game_over(&mut self) {
        self.set_hidden("game-over", true);
    }
}

/// Register keyboard, button and pointer listeners that feed the director.
///
/// Input is dispatched inside the event handler so audio started in response
/// counts as user-initiated.
pub fn wire_controls(document: &Document, director: Rc<RefCell<Director>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    // Keyboard
    {
        let director = director.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(input) = input_for_key(&event.key(), event.repeat()) {
                event.prevent_default();
                director.borrow_mut().input(input);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Any press unlocks audio
    {
        let director = director.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            director.borrow_mut().input(InputEvent::PointerDown);
        });
        window.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let buttons = [
        ("left-btn", "pointerdown", InputEvent::MoveLeft),
        ("right-btn", "pointerdown", InputEvent::MoveRight),
        ("mute-btn", "click", InputEvent::ToggleMute),
        ("restart-btn", "click", InputEvent::Restart),
    ];
    for (id, event_name, input) in buttons {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("#{} missing - control unavailable", id);
            continue;
        };
        let director = director.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            director.borrow_mut().input(input);
        });
        btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(controls) = document.get_element_by_id("mobile-controls") {
        controls.class_list().remove_1("hidden")?;
    }

    log::info!("Controls ready");
    Ok(())
}
