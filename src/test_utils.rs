//! Test doubles shared by stage tests.
//!
//! Each double hands out an `Rc` to its log so a test can inspect calls after
//! the double has been boxed into a stage.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::audio::{AudioSink, Sound};
use crate::error::StorageError;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::platform::Hud;
use crate::stage::Services;

#[derive(Debug, Default)]
pub struct HudLog {
    pub progress: Vec<f32>,
    pub loading_complete: bool,
    pub score: Option<u64>,
    pub high_score: Option<u64>,
    pub sound_icon: Option<bool>,
    /// Some(final score) while the overlay is shown
    pub game_over: Option<u64>,
    pub game_over_shown: usize,
}

pub struct RecordingHud(pub Rc<RefCell<HudLog>>);

impl Hud for RecordingHud {
    fn set_load_progress(&mut self, fraction: f32) {
        self.0.borrow_mut().progress.push(fraction);
    }

    fn loading_complete(&mut self) {
        self.0.borrow_mut().loading_complete = true;
    }

    fn set_score(&mut self, score: u64) {
        self.0.borrow_mut().score = Some(score);
    }

    fn set_high_score(&mut self, high_score: u64) {
        self.0.borrow_mut().high_score = Some(high_score);
    }

    fn set_sound_icon(&mut self, sound_on: bool) {
        self.0.borrow_mut().sound_icon = Some(sound_on);
    }

    fn show_game_over(&mut self, final_score: u64) {
        let mut log = self.0.borrow_mut();
        log.game_over = Some(final_score);
        log.game_over_shown += 1;
    }

    fn hide_game_over(&mut self) {
        self.0.borrow_mut().game_over = None;
    }
}

#[derive(Debug, Default)]
pub struct AudioLog {
    pub played: Vec<Sound>,
    pub stopped: Vec<Sound>,
    pub pause_all_calls: usize,
    pub playing: HashSet<Sound>,
    /// Simulates an autoplay block: music play calls are swallowed
    pub block_music: bool,
}

impl AudioLog {
    pub fn count(&self, sound: Sound) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }
}

pub struct RecordingAudio(pub Rc<RefCell<AudioLog>>);

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        let mut log = self.0.borrow_mut();
        log.played.push(sound);
        if sound.looped() && !(sound == Sound::Music && log.block_music) {
            log.playing.insert(sound);
        }
    }

    fn stop(&mut self, sound: Sound) {
        let mut log = self.0.borrow_mut();
        log.stopped.push(sound);
        log.playing.remove(&sound);
    }

    fn is_playing(&self, sound: Sound) -> bool {
        self.0.borrow().playing.contains(&sound)
    }

    fn pause_all(&mut self) {
        let mut log = self.0.borrow_mut();
        log.pause_all_calls += 1;
        log.playing.clear();
    }
}

pub struct SharedStore(pub Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }
}

/// Handles to everything a stage under test talks to
pub struct Probe {
    pub hud: Rc<RefCell<HudLog>>,
    pub audio: Rc<RefCell<AudioLog>>,
    pub store: Rc<RefCell<MemoryStore>>,
}

pub fn recording_services(store: MemoryStore) -> (Services, Probe) {
    let probe = Probe {
        hud: Rc::new(RefCell::new(HudLog::default())),
        audio: Rc::new(RefCell::new(AudioLog::default())),
        store: Rc::new(RefCell::new(store)),
    };
    let services = Services {
        hud: Box::new(RecordingHud(probe.hud.clone())),
        audio: Box::new(RecordingAudio(probe.audio.clone())),
        store: Box::new(SharedStore(probe.store.clone())),
    };
    (services, probe)
}
