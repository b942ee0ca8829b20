//! Gameplay stage
//!
//! Owns the run state and turns simulation events into sound, HUD updates and
//! saved high scores.

use super::{Services, Stage, StageTransition};
use crate::audio::Sound;
use crate::highscore::HighScore;
use crate::platform::InputEvent;
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GameState, tick};
use crate::tuning::Tuning;

pub struct GameplayStage {
    services: Services,
    settings: Settings,
    state: GameState,
    /// Session-only mute flag; survives restarts
    sound_on: bool,
    hud_refresh_ms: f32,
}

impl GameplayStage {
    pub fn new(services: Services, tuning: Tuning, settings: Settings, seed: u64) -> Self {
        Self {
            services,
            settings,
            state: GameState::new(tuning, seed),
            sound_on: true,
            hud_refresh_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn move_left(&mut self) {
        self.state.try_move(Direction::Left);
        self.apply_events();
    }

    pub fn move_right(&mut self) {
        self.state.try_move(Direction::Right);
        self.apply_events();
    }

    pub fn toggle_mute(&mut self) {
        self.sound_on = !self.sound_on;
        self.services.hud.set_sound_icon(self.sound_on);
        if self.sound_on {
            self.try_play_music();
        } else {
            self.services.audio.pause_all();
        }
    }

    /// Start a new run. High score and mute survive.
    pub fn restart(&mut self) {
        self.services.hud.hide_game_over();
        self.state.restart();
        self.try_play_music();
        self.refresh_hud();
        log::info!("Run restarted");
    }

    /// Music may be blocked until a user gesture; every gesture retries it
    fn try_play_music(&mut self) {
        if self.sound_on && !self.services.audio.is_playing(Sound::Music) {
            self.services.audio.play(Sound::Music);
        }
    }

    fn play(&mut self, sound: Sound) {
        if self.sound_on {
            self.services.audio.play(sound);
        }
    }

    fn refresh_hud(&mut self) {
        self.services.hud.set_score(self.state.score);
        self.services.hud.set_high_score(self.state.high_score);
    }

    fn apply_events(&mut self) {
        let events = self.state.take_events();
        if events.is_empty() {
            return;
        }

        for event in events {
            match event {
                GameEvent::LaneChanged { .. } => self.play(Sound::Whoosh),
                GameEvent::CoinCollected { points } => {
                    log::debug!("Coin +{}", points);
                    self.play(Sound::Coin);
                }
                GameEvent::Crashed { final_score } => {
                    log::info!("Crashed with score {}", final_score);
                    self.play(Sound::Crash);
                    if self.settings.effective_screen_shake() {
                        let tuning = &self.state.tuning;
                        let (ms, intensity) = (tuning.shake_ms, tuning.shake_intensity);
                        self.state.camera.start(ms, intensity);
                    }
                    self.services.audio.stop(Sound::Music);
                    self.services.hud.show_game_over(final_score);
                }
                GameEvent::NewHighScore { score } => {
                    HighScore(score).save(self.services.store.as_mut());
                }
            }
        }
        self.refresh_hud();
    }
}

impl Stage for GameplayStage {
    fn name(&self) -> &'static str {
        "gameplay"
    }

    fn setup(&mut self) {
        self.state.high_score = HighScore::load(self.services.store.as_ref()).0;
        self.services.hud.hide_game_over();
        self.services.hud.set_sound_icon(self.sound_on);
        self.refresh_hud();
        self.try_play_music();
        log::info!(
            "Run started: {} lanes, spawn every {}..={} ms",
            self.state.lanes.count(),
            self.state.tuning.spawn_interval_min_ms,
            self.state.tuning.spawn_interval_max_ms
        );
    }

    fn on_frame(&mut self, _time_ms: f64, delta_ms: f32) -> StageTransition {
        tick(&mut self.state, delta_ms);
        self.apply_events();

        self.hud_refresh_ms += delta_ms.max(0.0);
        let periodic = self.hud_refresh_ms >= self.state.tuning.hud_refresh_ms;
        if periodic {
            self.hud_refresh_ms = 0.0;
        }
        if periodic || !self.state.game_over {
            self.refresh_hud();
        }
        StageTransition::None
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft => self.move_left(),
            InputEvent::MoveRight => self.move_right(),
            InputEvent::ToggleMute => self.toggle_mute(),
            InputEvent::Restart => self.restart(),
            // The game-over screen stays silent until restart
            InputEvent::PointerDown if self.state.game_over => {}
            InputEvent::PointerDown => self.try_play_music(),
        }
    }

    fn game_state(&self) -> Option<&GameState> {
        Some(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::HIGH_SCORE_KEY;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::sim::Enemy;
    use crate::test_utils::{Probe, recording_services};

    fn stage_with(store: MemoryStore, settings: Settings) -> (GameplayStage, Probe) {
        let (services, probe) = recording_services(store);
        let mut stage = GameplayStage::new(services, Tuning::default(), settings, 42);
        stage.setup();
        stage.state.spawn_interval_ms = f32::MAX;
        (stage, probe)
    }

    fn stage() -> (GameplayStage, Probe) {
        stage_with(MemoryStore::new(), Settings::default())
    }

    fn crash(stage: &mut GameplayStage) {
        let id = stage.state.next_entity_id();
        let pos = stage.state.player.pos;
        stage.state.enemies.push(Enemy {
            id,
            pos,
            vel_y: 0.0,
            lane: stage.state.player.lane,
        });
        stage.on_frame(0.0, 16.0);
    }

    #[test]
    fn test_setup_loads_high_score_and_starts_music() {
        let (stage, probe) = stage_with(
            MemoryStore::new().with(HIGH_SCORE_KEY, "250"),
            Settings::default(),
        );
        assert_eq!(stage.state().high_score, 250);
        let hud = probe.hud.borrow();
        assert_eq!(hud.high_score, Some(250));
        assert_eq!(hud.score, Some(0));
        assert_eq!(hud.sound_icon, Some(true));
        assert_eq!(probe.audio.borrow().count(Sound::Music), 1);
    }

    #[test]
    fn test_lane_change_plays_whoosh_once() {
        let (mut stage, probe) = stage();
        stage.handle_input(InputEvent::MoveRight);
        stage.handle_input(InputEvent::MoveRight);
        assert_eq!(stage.state().player.lane, 2);
        assert_eq!(probe.audio.borrow().count(Sound::Whoosh), 1);

        stage.on_frame(0.0, 180.0);
        stage.handle_input(InputEvent::MoveLeft);
        assert_eq!(stage.state().player.lane, 1);
        assert_eq!(probe.audio.borrow().count(Sound::Whoosh), 2);
    }

    #[test]
    fn test_muted_moves_are_silent() {
        let (mut stage, probe) = stage();
        stage.handle_input(InputEvent::ToggleMute);
        stage.handle_input(InputEvent::MoveLeft);
        assert_eq!(stage.state().player.lane, 0);
        assert_eq!(probe.audio.borrow().count(Sound::Whoosh), 0);
        assert_eq!(probe.audio.borrow().pause_all_calls, 1);
        assert_eq!(probe.hud.borrow().sound_icon, Some(false));
    }

    #[test]
    fn test_crash_side_effects() {
        let (mut stage, probe) = stage_with(
            MemoryStore::new().with(HIGH_SCORE_KEY, "5"),
            Settings::default(),
        );
        stage.state.score = 37;
        crash(&mut stage);

        assert!(stage.state().game_over);
        assert!(stage.state().camera.is_active());
        {
            let audio = probe.audio.borrow();
            assert_eq!(audio.count(Sound::Crash), 1);
            assert_eq!(audio.stopped, vec![Sound::Music]);
        }
        {
            let hud = probe.hud.borrow();
            assert_eq!(hud.game_over, Some(37));
            assert_eq!(hud.high_score, Some(37));
        }
        assert_eq!(
            probe.store.borrow().get(HIGH_SCORE_KEY).as_deref(),
            Some("37")
        );

        // Later overlaps change nothing
        crash(&mut stage);
        assert_eq!(probe.hud.borrow().game_over_shown, 1);
        assert_eq!(probe.audio.borrow().count(Sound::Crash), 1);
    }

    #[test]
    fn test_low_score_does_not_overwrite_record() {
        let (mut stage, probe) = stage_with(
            MemoryStore::new().with(HIGH_SCORE_KEY, "500"),
            Settings::default(),
        );
        stage.state.score = 20;
        crash(&mut stage);
        assert_eq!(
            probe.store.borrow().get(HIGH_SCORE_KEY).as_deref(),
            Some("500")
        );
        assert_eq!(stage.state().high_score, 500);
    }

    #[test]
    fn test_reduced_motion_skips_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let (mut stage, _probe) = stage_with(MemoryStore::new(), settings);
        crash(&mut stage);
        assert!(stage.state().game_over);
        assert!(!stage.state().camera.is_active());
    }

    #[test]
    fn test_restart_keeps_record_and_mute() {
        let (mut stage, probe) = stage();
        stage.handle_input(InputEvent::ToggleMute);
        stage.state.score = 64;
        stage.state.multiplier = 1.3;
        stage.state.spawn_enemy();
        stage.state.spawn_coin();
        crash(&mut stage);

        stage.handle_input(InputEvent::Restart);
        let state = stage.state();
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.multiplier, 1.0);
        assert_eq!(state.player.lane, 1);
        assert!(state.enemies.is_empty() && state.coins.is_empty());
        assert_eq!(state.high_score, 64);
        assert!(!stage.sound_on());
        assert_eq!(probe.hud.borrow().game_over, None);
        // Muted: restart does not start the music
        assert_eq!(probe.audio.borrow().count(Sound::Music), 1);
    }

    #[test]
    fn test_restart_resumes_music_when_unmuted() {
        let (mut stage, probe) = stage();
        crash(&mut stage);
        assert!(!probe.audio.borrow().playing.contains(&Sound::Music));
        stage.handle_input(InputEvent::Restart);
        assert_eq!(probe.audio.borrow().count(Sound::Music), 2);
        assert!(probe.audio.borrow().playing.contains(&Sound::Music));
    }

    #[test]
    fn test_blocked_music_retried_on_gesture() {
        let (services, probe) = recording_services(MemoryStore::new());
        probe.audio.borrow_mut().block_music = true;
        let mut stage = GameplayStage::new(services, Tuning::default(), Settings::default(), 1);
        stage.setup();
        assert_eq!(probe.audio.borrow().count(Sound::Music), 1);

        probe.audio.borrow_mut().block_music = false;
        stage.handle_input(InputEvent::PointerDown);
        assert_eq!(probe.audio.borrow().count(Sound::Music), 2);

        // Already playing: further taps do nothing
        stage.handle_input(InputEvent::PointerDown);
        assert_eq!(probe.audio.borrow().count(Sound::Music), 2);
    }

    #[test]
    fn test_tap_after_crash_keeps_music_stopped() {
        let (mut stage, probe) = stage();
        crash(&mut stage);
        assert!(!probe.audio.borrow().playing.contains(&Sound::Music));

        stage.handle_input(InputEvent::PointerDown);
        assert!(stage.state().game_over);
        assert_eq!(probe.audio.borrow().count(Sound::Music), 1);
        assert!(!probe.audio.borrow().playing.contains(&Sound::Music));

        stage.handle_input(InputEvent::Restart);
        assert!(probe.audio.borrow().playing.contains(&Sound::Music));
    }

    #[test]
    fn test_coin_pickup_updates_hud() {
        let (mut stage, probe) = stage();
        let id = stage.state.next_entity_id();
        let pos = stage.state.player.pos;
        stage.state.coins.push(crate::sim::Coin {
            id,
            pos: pos + Vec2::new(0.0, -20.0),
            vel_y: 0.0,
            lane: 1,
        });
        stage.on_frame(0.0, 16.0);
        assert_eq!(stage.state().score, 12);
        assert_eq!(probe.hud.borrow().score, Some(12));
        assert_eq!(probe.audio.borrow().count(Sound::Coin), 1);
    }

    #[test]
    fn test_hud_refreshes_periodically_after_game_over() {
        let (mut stage, probe) = stage();
        crash(&mut stage);
        probe.hud.borrow_mut().score = None;
        stage.on_frame(0.0, 100.0);
        assert_eq!(probe.hud.borrow().score, None);
        stage.on_frame(0.0, 150.0);
        assert_eq!(probe.hud.borrow().score, Some(0));
    }
}
