//! Preload stage
//!
//! Declares the asset manifest, reports load progress and starts gameplay once
//! every asset has settled. A failed asset does not block the game; the
//! feature that needed it just stays unavailable.

use super::{GameplayStage, Services, Stage, StageTransition};
use crate::audio::Sound;
use crate::consts::ASSET_TIMEOUT_MS;
use crate::error::AssetError;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// What an asset is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio(Sound),
}

/// A named remote asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub key: &'static str,
    pub url: &'static str,
    pub kind: AssetKind,
}

/// Result of fetching one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// Images and sounds the game fetches at boot
pub const MANIFEST: &[AssetSpec] = &[
    AssetSpec {
        key: "carsheet",
        url: "https://opengameart.org/sites/default/files/text3062.png",
        kind: AssetKind::Image,
    },
    AssetSpec {
        key: "enemycar",
        url: "https://opengameart.org/sites/default/files/car0.png",
        kind: AssetKind::Image,
    },
    AssetSpec {
        key: "coin",
        url: "https://opengameart.org/sites/default/files/Coin.png",
        kind: AssetKind::Image,
    },
    AssetSpec {
        key: "tree",
        url: "https://opengameart.org/sites/default/files/Tree.png",
        kind: AssetKind::Image,
    },
    AssetSpec {
        key: "bgm",
        url: "https://assets.mixkit.co/music/preview/mixkit-cute-happy-breeze-127.mp3",
        kind: AssetKind::Audio(Sound::Music),
    },
    AssetSpec {
        key: "whoosh",
        url: "https://assets.mixkit.co/sfx/preview/mixkit-fast-arcade-impact-1694.mp3",
        kind: AssetKind::Audio(Sound::Whoosh),
    },
    AssetSpec {
        key: "coin-sfx",
        url: "https://assets.mixkit.co/sfx/preview/mixkit-quick-jump-arcade-237.mp3",
        kind: AssetKind::Audio(Sound::Coin),
    },
    AssetSpec {
        key: "crash",
        url: "https://assets.mixkit.co/sfx/preview/mixkit-car-crash-1420.mp3",
        kind: AssetKind::Audio(Sound::Crash),
    },
];

/// Tracks which manifest entries have settled
#[derive(Debug, Clone)]
pub struct LoadTracker {
    manifest: &'static [AssetSpec],
    loaded: Vec<&'static str>,
    failed: Vec<&'static str>,
}

impl LoadTracker {
    pub fn new(manifest: &'static [AssetSpec]) -> Self {
        Self {
            manifest,
            loaded: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn is_settled(&self, key: &str) -> bool {
        self.loaded.iter().chain(&self.failed).any(|k| *k == key)
    }

    /// Record an outcome. Returns the asset when this is news (known key, first report).
    pub fn settle(&mut self, key: &str, outcome: LoadOutcome) -> Option<&'static AssetSpec> {
        let spec = self.manifest.iter().find(|s| s.key == key)?;
        if self.is_settled(key) {
            return None;
        }
        match outcome {
            LoadOutcome::Loaded => self.loaded.push(spec.key),
            LoadOutcome::Failed => self.failed.push(spec.key),
        }
        Some(spec)
    }

    /// Fraction of the manifest settled, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.manifest.is_empty() {
            return 1.0;
        }
        (self.loaded.len() + self.failed.len()) as f32 / self.manifest.len() as f32
    }

    pub fn is_complete(&self) -> bool {
        self.loaded.len() + self.failed.len() >= self.manifest.len()
    }

    /// Manifest entries with no outcome yet
    pub fn pending(&self) -> Vec<&'static AssetSpec> {
        let manifest = self.manifest;
        manifest.iter().filter(|s| !self.is_settled(s.key)).collect()
    }

    pub fn failed(&self) -> &[&'static str] {
        &self.failed
    }
}

/// Boot stage: waits for assets, then starts gameplay
pub struct PreloadStage {
    tracker: LoadTracker,
    /// Handed to the gameplay stage on completion
    services: Option<Services>,
    tuning: Tuning,
    settings: Settings,
    seed: u64,
    /// Time spent waiting for assets
    elapsed_ms: f32,
}

impl PreloadStage {
    pub fn new(
        manifest: &'static [AssetSpec],
        services: Services,
        tuning: Tuning,
        settings: Settings,
        seed: u64,
    ) -> Self {
        Self {
            tracker: LoadTracker::new(manifest),
            services: Some(services),
            tuning,
            settings,
            seed,
            elapsed_ms: 0.0,
        }
    }

    /// Give up on anything that has not settled yet. Some browsers never
    /// report media readiness before a user gesture.
    fn expire_pending(&mut self) {
        for spec in self.tracker.pending() {
            log::warn!("{} - timed out", AssetError { key: spec.key, url: spec.url });
            self.tracker.settle(spec.key, LoadOutcome::Failed);
        }
        if let Some(services) = self.services.as_mut() {
            services.hud.set_load_progress(self.tracker.progress());
        }
    }
}

impl Stage for PreloadStage {
    fn name(&self) -> &'static str {
        "preload"
    }

    fn setup(&mut self) {
        log::info!("Loading {} assets", self.tracker.manifest.len());
        if let Some(services) = self.services.as_mut() {
            services.hud.set_load_progress(self.tracker.progress());
        }
    }

    fn asset_settled(&mut self, key: &str, outcome: LoadOutcome) {
        let Some(spec) = self.tracker.settle(key, outcome) else {
            log::debug!("Ignoring load report for {}", key);
            return;
        };
        if outcome == LoadOutcome::Failed {
            log::warn!("{} - continuing without it", AssetError { key: spec.key, url: spec.url });
        }
        if let Some(services) = self.services.as_mut() {
            services.hud.set_load_progress(self.tracker.progress());
        }
    }

    fn on_frame(&mut self, _time_ms: f64, delta_ms: f32) -> StageTransition {
        if !self.tracker.is_complete() {
            self.elapsed_ms += delta_ms.max(0.0);
            if self.elapsed_ms < ASSET_TIMEOUT_MS {
                return StageTransition::None;
            }
            self.expire_pending();
        }
        let Some(mut services) = self.services.take() else {
            return StageTransition::None;
        };

        if !self.tracker.failed().is_empty() {
            log::warn!("Starting without: {}", self.tracker.failed().join(", "));
        }
        services.hud.loading_complete();
        StageTransition::Replace(Box::new(GameplayStage::new(
            services,
            self.tuning.clone(),
            self.settings.clone(),
            self.seed,
        )))
    }
}
