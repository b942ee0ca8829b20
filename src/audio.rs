//! Audio system
//!
//! Four named sounds fetched by the preload stage. A sound whose file failed
//! to load is simply absent: playing it does nothing.

use std::collections::HashSet;

/// Sound handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Background music (looped)
    Music,
    /// Lane change
    Whoosh,
    /// Coin pickup
    Coin,
    /// Crash into traffic
    Crash,
}

impl Sound {
    pub const ALL: [Sound; 4] = [Sound::Music, Sound::Whoosh, Sound::Coin, Sound::Crash];

    /// Asset key in the preload manifest
    pub fn key(&self) -> &'static str {
        match self {
            Sound::Music => "bgm",
            Sound::Whoosh => "whoosh",
            Sound::Coin => "coin-sfx",
            Sound::Crash => "crash",
        }
    }

    /// Mix volume before player settings
    pub fn base_volume(&self) -> f32 {
        match self {
            Sound::Music => 0.5,
            Sound::Whoosh => 0.7,
            Sound::Coin => 0.6,
            Sound::Crash => 0.9,
        }
    }

    pub fn looped(&self) -> bool {
        matches!(self, Sound::Music)
    }
}

/// Playback backend
pub trait AudioSink {
    /// Start a sound. May be deferred by the platform until a user gesture.
    fn play(&mut self, sound: Sound);

    /// Stop a sound and rewind it
    fn stop(&mut self, sound: Sound);

    fn is_playing(&self, sound: Sound) -> bool;

    /// Pause everything currently playing
    fn pause_all(&mut self);
}

/// Backend that plays nothing but tracks looped sounds (native builds)
#[derive(Debug, Default)]
pub struct SilentAudio {
    playing: HashSet<Sound>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, sound: Sound) {
        log::debug!("play {}", sound.key());
        if sound.looped() {
            self.playing.insert(sound);
        }
    }

    fn stop(&mut self, sound: Sound) {
        self.playing.remove(&sound);
    }

    fn is_playing(&self, sound: Sound) -> bool {
        self.playing.contains(&sound)
    }

    fn pause_all(&mut self) {
        self.playing.clear();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{SoundBank, WebAudio};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AudioSink, Sound};
    use crate::settings::Settings;

    /// Loaded audio elements, filled in by the asset loader
    pub type SoundBank = Rc<RefCell<HashMap<Sound, HtmlAudioElement>>>;

    /// `<audio>` element backend
    #[derive(Default)]
    pub struct WebAudio {
        bank: SoundBank,
    }

    impl WebAudio {
        pub fn new() -> Self {
            Self::default()
        }

        /// Shared handle for the loader
        pub fn bank(&self) -> SoundBank {
            self.bank.clone()
        }

        /// Configure a freshly loaded element and make it playable
        pub fn register(bank: &SoundBank, settings: &Settings, sound: Sound, el: HtmlAudioElement) {
            let gain = if sound.looped() {
                settings.music_gain()
            } else {
                settings.sfx_gain()
            };
            el.set_loop(sound.looped());
            el.set_volume((sound.base_volume() * gain) as f64);
            bank.borrow_mut().insert(sound, el);
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, sound: Sound) {
            let bank = self.bank.borrow();
            let Some(el) = bank.get(&sound) else { return };

            if !sound.looped() {
                el.set_current_time(0.0);
            }
            match el.play() {
                Ok(promise) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            // Autoplay policy: retried on the next user gesture
                            log::debug!("{} playback deferred: {:?}", sound.key(), e);
                        }
                    });
                }
                Err(e) => log::debug!("{} playback refused: {:?}", sound.key(), e),
            }
        }

        fn stop(&mut self, sound: Sound) {
            if let Some(el) = self.bank.borrow().get(&sound) {
                let _ = el.pause();
                el.set_current_time(0.0);
            }
        }

        fn is_playing(&self, sound: Sound) -> bool {
            self.bank
                .borrow()
                .get(&sound)
                .map(|el| !el.paused())
                .unwrap_or(false)
        }

        fn pause_all(&mut self) {
            for el in self.bank.borrow().values() {
                let _ = el.pause();
            }
        }
    }
}
