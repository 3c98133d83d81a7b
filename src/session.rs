//! Host loop for one chapter run
//!
//! Owns the simulation, feeds it fixed ticks from a variable frame clock,
//! and forwards outbound events to the host's [`GameHooks`] once the frame's
//! ticks are done. Progress is saved on every checkpoint and when the run
//! ends; a failed save is logged and simply superseded by the next one.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::input::{InputMapper, RawInput};
use crate::persistence::ProgressStore;
use crate::progress::{DEFAULT_CHECKPOINT_X, ProgressRecord};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::tuning::Tuning;

/// Outbound notifications. All methods default to no-ops.
pub trait GameHooks {
    fn on_game_over(&mut self) {}
    fn on_victory(&mut self) {}
    fn on_collect_currency(&mut self, _amount: u32) {}
    fn on_checkpoint(&mut self, _x: i32) {}
    fn set_player_hp(&mut self, _hp: i32) {}
    fn on_boss_encountered(&mut self) {}
}

impl GameHooks for () {}

pub struct Session<H: GameHooks, S: ProgressStore> {
    pub state: GameState,
    pub progress: ProgressRecord,
    input: InputMapper,
    store: S,
    player_id: String,
    hooks: H,
    accumulator: f32,
    /// Phase to return to after a pause
    paused_from: Option<GamePhase>,
    stopped: bool,
    last_save_error: Option<String>,
}

impl<H: GameHooks, S: ProgressStore> Session<H, S> {
    /// Load the player's progress and build the chapter it points at.
    /// The session starts in `Cutscene`; call [`Session::begin`] once scene
    /// transition work has settled.
    pub fn load(
        player_id: impl Into<String>,
        store: S,
        input: InputMapper,
        hooks: H,
        seed: u64,
        tuning: Tuning,
    ) -> Self {
        let player_id = player_id.into();
        let progress = match store.load(&player_id) {
            Ok(Some(record)) => {
                log::info!("Loaded progress for {player_id}: chapter {}", record.chapter);
                record
            }
            Ok(None) => ProgressRecord::default(),
            Err(e) => {
                log::warn!("Could not load progress for {player_id}, starting fresh: {e}");
                ProgressRecord::default()
            }
        };
        Self::with_progress(player_id, progress, store, input, hooks, seed, tuning)
    }

    pub fn with_progress(
        player_id: impl Into<String>,
        mut progress: ProgressRecord,
        store: S,
        input: InputMapper,
        hooks: H,
        seed: u64,
        tuning: Tuning,
    ) -> Self {
        progress.normalize_hp();
        let mut state = GameState::new(seed, progress.effective_stats(), progress.chapter, tuning);
        state.player.max_hp = progress.max_hp;
        state.player.hp = progress.starting_hp();
        if progress.last_checkpoint_x > DEFAULT_CHECKPOINT_X {
            state.resume_at_checkpoint(progress.last_checkpoint_x as f32);
        }

        Self {
            state,
            progress,
            input,
            store,
            player_id: player_id.into(),
            hooks,
            accumulator: 0.0,
            paused_from: None,
            stopped: false,
            last_save_error: None,
        }
    }

    /// Apply display preferences to the effect layer
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.state.fx.max_particles = settings.max_particles();
        self.state.fx.show_damage_text = settings.damage_numbers;
    }

    /// Leave the cutscene and start active play
    pub fn begin(&mut self) {
        self.state.start();
        self.dispatch_events();
    }

    /// Feed one display frame. Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if self.stopped {
            return 0;
        }

        let mut substeps = 0;
        if self.state.phase.is_active() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let intents = self.input.sample(&self.state);
                tick(&mut self.state, &intents);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        } else {
            // Paused time is not banked
            self.accumulator = 0.0;
        }

        self.dispatch_events();
        substeps
    }

    pub fn handle_input(&mut self, event: &RawInput) {
        self.input.handle(event);
        if *event == RawInput::Blur {
            self.pause();
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase.is_active() {
            self.paused_from = Some(self.state.phase);
            self.state.phase = GamePhase::Paused;
            self.input.release_all();
            log::debug!("Paused at tick {}", self.state.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = self.paused_from.take().unwrap_or(GamePhase::Playing);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Tear down: no further ticks or notifications
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.input.release_all();
            log::info!("Session stopped at tick {}", self.state.time_ticks);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether the run reached victory or game over
    pub fn is_finished(&self) -> bool {
        matches!(self.state.phase, GamePhase::Victory | GamePhase::GameOver)
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Message of the most recent failed save, cleared by the next success
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            self.progress.apply_event(&event);
            match event {
                GameEvent::PlayerHpChanged { hp } => self.hooks.set_player_hp(hp),
                GameEvent::CurrencyCollected { amount } => self.hooks.on_collect_currency(amount),
                GameEvent::CheckpointReached { x } => {
                    self.hooks.on_checkpoint(x);
                    self.save_progress();
                }
                GameEvent::BossEncountered => self.hooks.on_boss_encountered(),
                GameEvent::Victory => {
                    self.hooks.on_victory();
                    self.save_progress();
                }
                GameEvent::GameOver => {
                    self.hooks.on_game_over();
                    self.save_progress();
                }
            }
        }
    }

    /// Write the progress record. Returns false (and logs) on failure.
    pub fn save_progress(&mut self) -> bool {
        match self.store.save(&self.player_id, &self.progress) {
            Ok(()) => {
                self.last_save_error = None;
                true
            }
            Err(e) => {
                log::warn!("Progress save failed, will save again at the next checkpoint: {e}");
                self.last_save_error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyboardBackend, TouchBackend};
    use crate::persistence::MemoryStore;
    use crate::roster::CharacterId;
    use crate::settings::KeyBindings;

    #[derive(Default)]
    struct Recorder {
        log: Vec<GameEvent>,
    }

    impl GameHooks for Recorder {
        fn on_game_over(&mut self) {
            self.log.push(GameEvent::GameOver);
        }
        fn on_victory(&mut self) {
            self.log.push(GameEvent::Victory);
        }
        fn on_collect_currency(&mut self, amount: u32) {
            self.log.push(GameEvent::CurrencyCollected { amount });
        }
        fn on_checkpoint(&mut self, x: i32) {
            self.log.push(GameEvent::CheckpointReached { x });
        }
        fn set_player_hp(&mut self, hp: i32) {
            self.log.push(GameEvent::PlayerHpChanged { hp });
        }
        fn on_boss_encountered(&mut self) {
            self.log.push(GameEvent::BossEncountered);
        }
    }

    fn mapper() -> InputMapper {
        InputMapper::new()
            .with_backend(Box::new(KeyboardBackend::new(KeyBindings::default())))
            .with_backend(Box::new(TouchBackend::new()))
    }

    fn session(store: MemoryStore) -> Session<Recorder, MemoryStore> {
        Session::load("ana", store, mapper(), Recorder::default(), 9, Tuning::default())
    }

    fn key_down(code: &str) -> RawInput {
        RawInput::KeyDown(code.to_string())
    }

    fn checkpoints(hooks: &Recorder) -> Vec<i32> {
        hooks
            .log
            .iter()
            .filter_map(|e| match e {
                GameEvent::CheckpointReached { x } => Some(*x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_cutscene_idles_until_begin() {
        let mut s = session(MemoryStore::new());
        assert_eq!(s.advance(SIM_DT), 0);
        assert_eq!(s.state.time_ticks, 0);

        s.begin();
        assert_eq!(s.hooks().log, vec![GameEvent::PlayerHpChanged { hp: 150 }]);
        assert_eq!(s.advance(SIM_DT), 1);
    }

    #[test]
    fn test_fixed_steps_from_frame_time() {
        let mut s = session(MemoryStore::new());
        s.begin();
        for _ in 0..3 {
            s.advance(SIM_DT);
        }
        assert_eq!(s.state.time_ticks, 3);

        // A long stall is clamped to a handful of ticks
        let ran = s.advance(5.0);
        assert!((5..=6).contains(&ran), "ran {ran}");
    }

    #[test]
    fn test_checkpoint_saves_progress() {
        let mut s = session(MemoryStore::new());
        s.begin();
        s.state.enemies.clear();
        s.state.player.pos.x = 2960.0;
        s.handle_input(&key_down("KeyD"));
        for _ in 0..60 {
            s.advance(SIM_DT);
        }
        assert_eq!(checkpoints(s.hooks()), vec![3000]);
        assert_eq!(s.store().save_count, 1);
        let saved = s.store().load("ana").unwrap().unwrap();
        assert_eq!(saved.last_checkpoint_x, 3000);
    }

    #[test]
    fn test_failed_save_is_superseded_by_next_checkpoint() {
        let mut store = MemoryStore::new();
        store.failing_saves = 1;
        let mut s = session(store);
        s.begin();
        s.state.enemies.clear();
        s.state.player.pos.x = 2990.0;
        s.handle_input(&key_down("KeyD"));
        for _ in 0..30 {
            s.advance(SIM_DT);
        }
        assert_eq!(s.store().save_count, 0);
        assert!(s.last_save_error().is_some());

        s.state.player.pos.x = 5990.0;
        for _ in 0..30 {
            s.advance(SIM_DT);
        }
        assert_eq!(checkpoints(s.hooks()), vec![3000, 6000]);
        assert_eq!(s.store().save_count, 1);
        assert!(s.last_save_error().is_none());
        assert_eq!(s.store().load("ana").unwrap().unwrap().last_checkpoint_x, 6000);
    }

    #[test]
    fn test_resume_from_saved_checkpoint() {
        let mut store = MemoryStore::new();
        let mut record = ProgressRecord::new(CharacterId::Elias);
        record.last_checkpoint_x = 3000;
        record.hp = 90;
        store.save("ana", &record).unwrap();

        let mut s = session(store);
        assert_eq!(s.state.player.pos.x, 3000.0);
        assert_eq!(s.state.player.hp, 90);
        assert_eq!(s.state.player.max_hp, 120);

        s.begin();
        s.state.enemies.clear();
        s.handle_input(&key_down("ArrowRight"));
        for _ in 0..60 {
            s.advance(SIM_DT);
        }
        assert!(s.state.player.pos.x > 3100.0);
        assert!(checkpoints(s.hooks()).is_empty());
    }

    #[test]
    fn test_partial_record_takes_hp_from_selected_character() {
        let mut store = MemoryStore::new();
        store.insert_raw("ana", r#"{"character":"tenzin","upgrades":{"health":2}}"#);
        let s = session(store);
        assert_eq!(s.state.player.max_hp, 140);
        assert_eq!(s.state.player.hp, 140);
        assert_eq!(s.progress.max_hp, 140);
    }

    #[test]
    fn test_unreadable_save_starts_fresh() {
        let mut store = MemoryStore::new();
        store.insert_raw("ana", "garbage");
        let s = session(store);
        assert_eq!(s.progress, ProgressRecord::default());
    }

    #[test]
    fn test_blur_pauses_and_releases_inputs() {
        let mut s = session(MemoryStore::new());
        s.begin();
        s.state.enemies.clear();
        s.handle_input(&key_down("KeyD"));
        s.handle_input(&RawInput::Blur);
        assert_eq!(s.state.phase, GamePhase::Paused);
        assert_eq!(s.advance(SIM_DT), 0);

        s.resume();
        assert_eq!(s.state.phase, GamePhase::Playing);
        s.advance(SIM_DT);
        assert_eq!(s.state.player.vel.x, 0.0);
    }

    #[test]
    fn test_pause_restores_boss_fight() {
        let mut s = session(MemoryStore::new());
        s.begin();
        s.state.phase = GamePhase::BossFight;
        s.toggle_pause();
        assert_eq!(s.state.phase, GamePhase::Paused);
        s.toggle_pause();
        assert_eq!(s.state.phase, GamePhase::BossFight);
    }

    #[test]
    fn test_game_over_notifies_once_and_saves() {
        let mut s = session(MemoryStore::new());
        s.begin();
        crate::sim::combat::hurt_player(&mut s.state, 1000);
        s.advance(SIM_DT);
        s.advance(SIM_DT);
        let overs = s.hooks().log.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(overs, 1);
        assert!(s.is_finished());
        assert_eq!(s.store().save_count, 1);
        // The next run starts at full health
        assert_eq!(s.progress.hp, 150);
    }

    #[test]
    fn test_stop_ends_ticking() {
        let mut s = session(MemoryStore::new());
        s.begin();
        s.stop();
        assert!(s.is_stopped());
        assert_eq!(s.advance(SIM_DT), 0);
        assert_eq!(s.state.time_ticks, 0);
    }

    #[test]
    fn test_settings_reach_effects() {
        let mut s = session(MemoryStore::new());
        let settings = Settings {
            particles: false,
            damage_numbers: false,
            ..Default::default()
        };
        s.apply_settings(&settings);
        assert_eq!(s.state.fx.max_particles, 0);
        assert!(!s.state.fx.show_damage_text);
    }
}
