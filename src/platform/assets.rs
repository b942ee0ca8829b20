//! Browser asset fetching
//!
//! Starts every manifest download at once and reports each outcome to the
//! director as it settles. Images land in an [`ImageBank`] for the renderer,
//! sounds in the audio backend's bank.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlAudioElement, HtmlImageElement};

use crate::audio::{Sound, SoundBank, WebAudio};
use crate::settings::Settings;
use crate::stage::{AssetKind, AssetSpec, Director, LoadOutcome};

/// Decoded images by manifest key
pub type ImageBank = Rc<RefCell<HashMap<&'static str, HtmlImageElement>>>;

fn settle(director: &Rc<RefCell<Director>>, key: &'static str, outcome: LoadOutcome) {
    director.borrow_mut().asset_settled(key, outcome);
}

/// Kick off downloads for the whole manifest
pub fn load_manifest(
    manifest: &'static [AssetSpec],
    director: Rc<RefCell<Director>>,
    images: ImageBank,
    sounds: SoundBank,
    settings: &Settings,
) {
    for spec in manifest {
        let started = match spec.kind {
            AssetKind::Image => load_image(spec, director.clone(), images.clone()),
            AssetKind::Audio(sound) => {
                load_sound(spec, sound, director.clone(), sounds.clone(), settings.clone())
            }
        };
        if let Err(e) = started {
            log::warn!("Could not start {}: {:?}", spec.key, e);
            settle(&director, spec.key, LoadOutcome::Failed);
        }
    }
}

fn load_image(
    spec: &'static AssetSpec,
    director: Rc<RefCell<Director>>,
    images: ImageBank,
) -> Result<(), JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_cross_origin(Some("anonymous"));

    let onload = {
        let director = director.clone();
        let img = img.clone();
        Closure::<dyn FnMut()>::new(move || {
            images.borrow_mut().insert(spec.key, img.clone());
            settle(&director, spec.key, LoadOutcome::Loaded);
        })
    };
    let onerror = Closure::<dyn FnMut()>::new(move || {
        settle(&director, spec.key, LoadOutcome::Failed);
    });
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    img.set_src(spec.url);
    Ok(())
}

fn load_sound(
    spec: &'static AssetSpec,
    sound: Sound,
    director: Rc<RefCell<Director>>,
    sounds: SoundBank,
    settings: Settings,
) -> Result<(), JsValue> {
    let el = HtmlAudioElement::new()?;
    el.set_cross_origin(Some("anonymous"));
    el.set_preload("auto");

    let ready = {
        let director = director.clone();
        let el = el.clone();
        Closure::<dyn FnMut()>::new(move || {
            WebAudio::register(&sounds, &settings, sound, el.clone());
            settle(&director, spec.key, LoadOutcome::Loaded);
        })
    };
    let failed = Closure::<dyn FnMut()>::new(move || {
        settle(&director, spec.key, LoadOutcome::Failed);
    });
    el.add_event_listener_with_callback("canplaythrough", ready.as_ref().unchecked_ref())?;
    el.add_event_listener_with_callback("error", failed.as_ref().unchecked_ref())?;
    ready.forget();
    failed.forget();

    el.set_src(spec.url);
    el.load();
    Ok(())
}
