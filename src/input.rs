//! Input mapping: raw key/touch events to per-tick intents
//!
//! Backends implement [`IntentSource`]; the [`InputMapper`] forwards every raw
//! event to all of them and merges their snapshots with logical OR, so
//! keyboard and on-screen buttons can drive the same tick.

use std::collections::HashSet;

use crate::settings::KeyBindings;
use crate::sim::combat::hitbox;
use crate::sim::{GameState, Intents, Owner};

/// One of the four abstract controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Jump,
    Attack,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Left, Control::Right, Control::Jump, Control::Attack];

    /// Parse a `data-control` attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Control::Left),
            "right" => Some(Control::Right),
            "jump" => Some(Control::Jump),
            "attack" => Some(Control::Attack),
            _ => None,
        }
    }
}

/// Platform input event, already stripped of browser types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// `KeyboardEvent.code`
    KeyDown(String),
    KeyUp(String),
    /// On-screen button pressed/released
    ButtonDown(Control),
    ButtonUp(Control),
    /// Window lost focus: everything held is released
    Blur,
}

/// A pluggable intent backend
pub trait IntentSource {
    fn name(&self) -> &'static str;

    /// Observe a raw event
    fn handle(&mut self, event: &RawInput);

    /// Current intent snapshot. Reads the state, never writes it.
    fn sample(&mut self, state: &GameState) -> Intents;
}

/// Keyboard backend driven by configurable key codes
#[derive(Debug, Clone, Default)]
pub struct KeyboardBackend {
    bindings: KeyBindings,
    held: HashSet<String>,
}

impl KeyboardBackend {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
        }
    }

    fn any_held(&self, codes: &[String]) -> bool {
        codes.iter().any(|c| self.held.contains(c))
    }

    /// Whether `code` is bound to any control (the host uses this to
    /// suppress browser scrolling for game keys)
    pub fn is_bound(&self, code: &str) -> bool {
        let b = &self.bindings;
        [&b.left, &b.right, &b.jump, &b.attack]
            .iter()
            .any(|codes| codes.iter().any(|c| c == code))
    }
}

impl IntentSource for KeyboardBackend {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn handle(&mut self, event: &RawInput) {
        match event {
            RawInput::KeyDown(code) => {
                self.held.insert(code.clone());
            }
            RawInput::KeyUp(code) => {
                self.held.remove(code);
            }
            RawInput::Blur => self.held.clear(),
            RawInput::ButtonDown(_) | RawInput::ButtonUp(_) => {}
        }
    }

    fn sample(&mut self, _state: &GameState) -> Intents {
        Intents {
            move_left: self.any_held(&self.bindings.left),
            move_right: self.any_held(&self.bindings.right),
            jump: self.any_held(&self.bindings.jump),
            attack: self.any_held(&self.bindings.attack),
        }
    }
}

/// On-screen button backend. Each control counts presses so two fingers on
/// the same button release cleanly.
#[derive(Debug, Clone, Default)]
pub struct TouchBackend {
    presses: [u8; 4],
}

impl TouchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(control: Control) -> usize {
        match control {
            Control::Left => 0,
            Control::Right => 1,
            Control::Jump => 2,
            Control::Attack => 3,
        }
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.presses[Self::slot(control)] > 0
    }
}

impl IntentSource for TouchBackend {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn handle(&mut self, event: &RawInput) {
        match event {
            RawInput::ButtonDown(c) => {
                let slot = &mut self.presses[Self::slot(*c)];
                *slot = slot.saturating_add(1);
            }
            RawInput::ButtonUp(c) => {
                let slot = &mut self.presses[Self::slot(*c)];
                *slot = slot.saturating_sub(1);
            }
            RawInput::Blur => self.presses = [0; 4],
            RawInput::KeyDown(_) | RawInput::KeyUp(_) => {}
        }
    }

    fn sample(&mut self, _state: &GameState) -> Intents {
        Intents {
            move_left: self.is_pressed(Control::Left),
            move_right: self.is_pressed(Control::Right),
            jump: self.is_pressed(Control::Jump),
            attack: self.is_pressed(Control::Attack),
        }
    }
}

/// Demo player: walks right, turns to fight nearby enemies, hops over
/// incoming shots
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Alternates the attack intent so each swing is a fresh press
    swing: bool,
}

/// How far ahead the autopilot looks for something to hit
const AUTOPILOT_REACH: f32 = 90.0;
/// Horizontal distance at which an incoming shot triggers a jump
const AUTOPILOT_DODGE: f32 = 140.0;

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntentSource for Autopilot {
    fn name(&self) -> &'static str {
        "autopilot"
    }

    fn handle(&mut self, _event: &RawInput) {}

    fn sample(&mut self, state: &GameState) -> Intents {
        let player = &state.player;
        let center = player.center();

        let nearest = state
            .enemies
            .iter()
            .filter(|e| !e.is_dead())
            .map(|e| e.center().x - center.x)
            .filter(|dx| dx.abs() < AUTOPILOT_REACH + player.width)
            .min_by(|a, b| a.abs().total_cmp(&b.abs()));

        let mut intents = Intents::default();
        match nearest {
            Some(dx) => {
                let facing_it = (dx >= 0.0) == (player.facing >= 0.0);
                if !facing_it {
                    // Turn around with a single step
                    intents.move_left = dx < 0.0;
                    intents.move_right = dx >= 0.0;
                } else {
                    let reach = hitbox(player, &state.tuning);
                    let in_reach = state
                        .enemies
                        .iter()
                        .any(|e| !e.is_dead() && reach.overlaps(&e.bounds()));
                    if in_reach {
                        self.swing = !self.swing;
                        intents.attack = self.swing;
                    } else {
                        intents.move_left = dx < 0.0;
                        intents.move_right = dx >= 0.0;
                    }
                }
            }
            None => intents.move_right = true,
        }

        let incoming = state.projectiles.iter().any(|p| {
            let dx = p.pos.x - center.x;
            p.owner == Owner::Enemy && dx.abs() < AUTOPILOT_DODGE && dx * p.vel.x < 0.0
        });
        intents.jump = incoming && player.grounded;

        intents
    }
}

/// Merges any number of backends into one intent snapshot per tick
#[derive(Default)]
pub struct InputMapper {
    backends: Vec<Box<dyn IntentSource>>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Box<dyn IntentSource>) -> Self {
        self.push(backend);
        self
    }

    pub fn push(&mut self, backend: Box<dyn IntentSource>) {
        log::debug!("Input backend enabled: {}", backend.name());
        self.backends.push(backend);
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn handle(&mut self, event: &RawInput) {
        for backend in self.backends.iter_mut() {
            backend.handle(event);
        }
    }

    /// Release everything held on every backend
    pub fn release_all(&mut self) {
        self.handle(&RawInput::Blur);
    }

    pub fn sample(&mut self, state: &GameState) -> Intents {
        self.backends
            .iter_mut()
            .fold(Intents::default(), |acc, b| acc.merge(b.sample(state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Character, CharacterId};
    use crate::sim::state::{EnemyState, GamePhase};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        let mut state = GameState::new(1, Character::get(CharacterId::Davi).stats, 0, Tuning::default());
        state.start();
        state
    }

    fn key(code: &str) -> RawInput {
        RawInput::KeyDown(code.to_string())
    }

    #[test]
    fn test_keyboard_uses_bindings() {
        let state = state();
        let mut kb = KeyboardBackend::new(KeyBindings::default());
        kb.handle(&key("ArrowLeft"));
        kb.handle(&key("KeyJ"));
        let intents = kb.sample(&state);
        assert!(intents.move_left && intents.attack);
        assert!(!intents.move_right && !intents.jump);

        kb.handle(&RawInput::KeyUp("KeyJ".to_string()));
        assert!(!kb.sample(&state).attack);
        assert!(kb.is_bound("Space"));
        assert!(!kb.is_bound("KeyQ"));
    }

    #[test]
    fn test_either_binding_holds_control() {
        let state = state();
        let mut kb = KeyboardBackend::new(KeyBindings::default());
        kb.handle(&key("KeyD"));
        kb.handle(&key("ArrowRight"));
        kb.handle(&RawInput::KeyUp("KeyD".to_string()));
        assert!(kb.sample(&state).move_right);
    }

    #[test]
    fn test_touch_counts_presses() {
        let state = state();
        let mut touch = TouchBackend::new();
        touch.handle(&RawInput::ButtonDown(Control::Jump));
        touch.handle(&RawInput::ButtonDown(Control::Jump));
        touch.handle(&RawInput::ButtonUp(Control::Jump));
        assert!(touch.sample(&state).jump);
        touch.handle(&RawInput::ButtonUp(Control::Jump));
        touch.handle(&RawInput::ButtonUp(Control::Jump));
        assert!(!touch.sample(&state).jump);
    }

    #[test]
    fn test_mapper_merges_backends() {
        let state = state();
        let mut mapper = InputMapper::new()
            .with_backend(Box::new(KeyboardBackend::new(KeyBindings::default())))
            .with_backend(Box::new(TouchBackend::new()));
        assert_eq!(mapper.backend_names(), vec!["keyboard", "touch"]);

        mapper.handle(&key("KeyA"));
        mapper.handle(&RawInput::ButtonDown(Control::Attack));
        let intents = mapper.sample(&state);
        assert!(intents.move_left && intents.attack);
    }

    #[test]
    fn test_blur_releases_everything() {
        let state = state();
        let mut mapper = InputMapper::new()
            .with_backend(Box::new(KeyboardBackend::new(KeyBindings::default())))
            .with_backend(Box::new(TouchBackend::new()));
        mapper.handle(&key("KeyD"));
        mapper.handle(&RawInput::ButtonDown(Control::Left));
        mapper.release_all();
        assert_eq!(mapper.sample(&state), Intents::default());
    }

    #[test]
    fn test_autopilot_walks_then_attacks() {
        let mut state = state();
        let mut pilot = Autopilot::new();
        state.player.pos = Vec2::new(100.0, 490.0);
        let idle = pilot.sample(&state);
        assert!(idle.move_right && !idle.attack);

        // Put the first enemy inside the swing
        state.enemies[0].pos = Vec2::new(150.0, 490.0);
        state.enemies[0].state = EnemyState::Aggro;
        let first = pilot.sample(&state);
        let second = pilot.sample(&state);
        assert!(first.attack != second.attack);
        assert!(!first.move_right);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_autopilot_turns_to_enemy_behind() {
        let mut state = state();
        let mut pilot = Autopilot::new();
        state.player.pos = Vec2::new(300.0, 490.0);
        state.enemies[0].pos = Vec2::new(240.0, 490.0);
        let intents = pilot.sample(&state);
        assert!(intents.move_left && !intents.attack);
    }
}
