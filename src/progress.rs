//! Persisted game progress
//!
//! One record per player: chapter, currency, selected character, last
//! checkpoint and upgrades. The session folds outbound simulation events
//! into it and hands it to a [`crate::persistence::ProgressStore`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::{CHAPTERS, Character, CharacterId, CharacterStats};
use crate::sim::GameEvent;

/// Bumped when the record layout changes incompatibly
pub const SAVE_VERSION: u32 = 1;
/// Where a fresh chapter run spawns the player
pub const DEFAULT_CHECKPOINT_X: i32 = 100;
pub const MAX_UPGRADE_LEVEL: u32 = 10;
/// Currency cost per upgrade level
pub const UPGRADE_COST_STEP: u32 = 100;
pub const ATTACK_PER_LEVEL: i32 = 5;
pub const HEALTH_PER_LEVEL: i32 = 20;

/// Purchasable upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Attack,
    Health,
}

/// Purchased levels per track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    pub attack: u32,
    pub health: u32,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Attack => self.attack,
            UpgradeKind::Health => self.health,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Attack => &mut self.attack,
            UpgradeKind::Health => &mut self.health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("need {cost} currency, have {available}")]
    Unaffordable { cost: u32, available: u32 },
    #[error("{0:?} is already at the maximum level")]
    MaxLevel(UpgradeKind),
}

/// The saved progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub version: u32,
    /// Chapter to play next
    pub chapter: u32,
    /// Number of chapters available (at least 1)
    pub unlocked_chapters: u32,
    pub currency: u32,
    pub character: CharacterId,
    pub inventory: Vec<String>,
    pub hp: i32,
    pub max_hp: i32,
    pub last_checkpoint_x: i32,
    pub upgrades: Upgrades,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new(CharacterId::default())
    }
}

impl ProgressRecord {
    /// Fresh record for a newly selected character
    pub fn new(character: CharacterId) -> Self {
        let hp = Character::get(character).stats.hp;
        Self {
            version: SAVE_VERSION,
            chapter: 0,
            unlocked_chapters: 1,
            currency: 0,
            character,
            inventory: Vec::new(),
            hp,
            max_hp: hp,
            last_checkpoint_x: DEFAULT_CHECKPOINT_X,
            upgrades: Upgrades::default(),
        }
    }

    /// Base character stats with upgrades applied
    pub fn effective_stats(&self) -> CharacterStats {
        let base = Character::get(self.character).stats;
        let attack_bonus = ATTACK_PER_LEVEL * self.upgrades.attack.min(MAX_UPGRADE_LEVEL) as i32;
        let health_bonus = HEALTH_PER_LEVEL * self.upgrades.health.min(MAX_UPGRADE_LEVEL) as i32;
        CharacterStats {
            hp: base.hp.saturating_add(health_bonus),
            attack: base.attack.saturating_add(attack_bonus),
            ..base
        }
    }

    /// Recompute `max_hp` from the character and upgrades, clamping `hp` to it.
    /// Saved records may be partial or stale.
    pub fn normalize_hp(&mut self) {
        self.max_hp = self.effective_stats().hp.max(1);
        self.hp = self.hp.min(self.max_hp);
    }

    /// Switch character; hp resets to the new character's maximum
    pub fn select_character(&mut self, character: CharacterId) {
        self.character = character;
        self.max_hp = self.effective_stats().hp;
        self.hp = self.max_hp;
    }

    /// Pick the chapter to play. Locked chapters are refused.
    pub fn select_chapter(&mut self, chapter: u32) -> bool {
        if chapter >= self.unlocked_chapters.max(1) {
            return false;
        }
        if chapter != self.chapter {
            self.chapter = chapter;
            self.last_checkpoint_x = DEFAULT_CHECKPOINT_X;
        }
        true
    }

    /// Hp to start a run with: the saved value, or full if the last run ended at 0
    pub fn starting_hp(&self) -> i32 {
        if self.hp <= 0 {
            self.max_hp
        } else {
            self.hp.min(self.max_hp)
        }
    }

    /// Price of the next level on a track
    pub fn upgrade_cost(&self, kind: UpgradeKind) -> u32 {
        UPGRADE_COST_STEP.saturating_mul(self.upgrades.level(kind) + 1)
    }

    /// Spend currency on the next upgrade level. On error nothing changes.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, UpgradeError> {
        let level = self.upgrades.level(kind);
        if level >= MAX_UPGRADE_LEVEL {
            return Err(UpgradeError::MaxLevel(kind));
        }
        let cost = self.upgrade_cost(kind);
        if self.currency < cost {
            return Err(UpgradeError::Unaffordable {
                cost,
                available: self.currency,
            });
        }

        self.currency -= cost;
        *self.upgrades.level_mut(kind) = level + 1;
        if kind == UpgradeKind::Health {
            self.max_hp = self.max_hp.saturating_add(HEALTH_PER_LEVEL);
            self.hp = self.hp.saturating_add(HEALTH_PER_LEVEL);
        }
        log::info!("Purchased {:?} level {} for {}", kind, level + 1, cost);
        Ok(level + 1)
    }

    /// Fold one outbound simulation event into the record
    pub fn apply_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::PlayerHpChanged { hp } => self.hp = hp.clamp(0, self.max_hp),
            GameEvent::CurrencyCollected { amount } => {
                self.currency = self.currency.saturating_add(amount);
            }
            GameEvent::CheckpointReached { x } => self.last_checkpoint_x = x,
            GameEvent::Victory => {
                let total = CHAPTERS.len() as u32;
                let next = self.chapter.saturating_add(1).min(total - 1);
                self.unlocked_chapters = self.unlocked_chapters.max(next + 1).min(total);
                self.chapter = next;
                self.last_checkpoint_x = DEFAULT_CHECKPOINT_X;
                self.hp = self.max_hp;
            }
            GameEvent::GameOver => self.hp = self.max_hp,
            GameEvent::BossEncountered => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ProgressRecord::new(CharacterId::Elias);
        assert_eq!(record.hp, 120);
        assert_eq!(record.max_hp, 120);
        assert_eq!(record.unlocked_chapters, 1);
        assert_eq!(record.last_checkpoint_x, 100);
    }

    #[test]
    fn test_events_fold_into_record() {
        let mut record = ProgressRecord::new(CharacterId::Aziel);
        record.apply_event(&GameEvent::CurrencyCollected { amount: 50 });
        record.apply_event(&GameEvent::CurrencyCollected { amount: 1000 });
        record.apply_event(&GameEvent::PlayerHpChanged { hp: 85 });
        record.apply_event(&GameEvent::CheckpointReached { x: 3000 });
        assert_eq!(record.currency, 1050);
        assert_eq!(record.hp, 85);
        assert_eq!(record.last_checkpoint_x, 3000);
    }

    #[test]
    fn test_victory_unlocks_next_chapter() {
        let mut record = ProgressRecord::new(CharacterId::Aziel);
        record.last_checkpoint_x = 3000;
        record.hp = 10;
        record.apply_event(&GameEvent::Victory);
        assert_eq!(record.unlocked_chapters, 2);
        assert_eq!(record.chapter, 1);
        assert_eq!(record.last_checkpoint_x, 100);
        assert_eq!(record.hp, record.max_hp);

        // Replaying an old chapter does not relock anything
        assert!(record.select_chapter(0));
        record.apply_event(&GameEvent::Victory);
        assert_eq!(record.unlocked_chapters, 2);
        assert!(!record.select_chapter(5));
    }

    #[test]
    fn test_final_chapter_victory_stays_in_bounds() {
        let mut record = ProgressRecord::new(CharacterId::Aziel);
        record.unlocked_chapters = 7;
        record.chapter = 6;
        record.apply_event(&GameEvent::Victory);
        assert_eq!(record.chapter, 6);
        assert_eq!(record.unlocked_chapters, 7);
    }

    #[test]
    fn test_corrupt_chapter_victory_saturates() {
        let mut record = ProgressRecord::new(CharacterId::Aziel);
        record.chapter = u32::MAX;
        record.apply_event(&GameEvent::Victory);
        assert_eq!(record.chapter, 6);
        assert_eq!(record.unlocked_chapters, 7);
    }

    #[test]
    fn test_out_of_range_upgrade_levels_are_capped() {
        let mut record = ProgressRecord::new(CharacterId::Aziel);
        record.upgrades.attack = u32::MAX;
        record.upgrades.health = 3_000_000_000;
        let stats = record.effective_stats();
        assert_eq!(stats.attack, 25 + 50);
        assert_eq!(stats.hp, 150 + 200);

        record.hp = 400;
        record.normalize_hp();
        assert_eq!(record.max_hp, 350);
        assert_eq!(record.hp, 350);
    }

    #[test]
    fn test_purchase_upgrade_spends_currency() {
        let mut record = ProgressRecord::new(CharacterId::Tenzin);
        record.currency = 350;
        assert_eq!(record.purchase_upgrade(UpgradeKind::Attack), Ok(1));
        assert_eq!(record.purchase_upgrade(UpgradeKind::Attack), Ok(2));
        assert_eq!(record.currency, 50);
        assert_eq!(record.effective_stats().attack, 25);

        assert_eq!(
            record.purchase_upgrade(UpgradeKind::Attack),
            Err(UpgradeError::Unaffordable { cost: 300, available: 50 })
        );
        assert_eq!(record.upgrades.attack, 2);
        assert_eq!(record.currency, 50);
    }

    #[test]
    fn test_health_upgrade_raises_max_hp() {
        let mut record = ProgressRecord::new(CharacterId::Hiroshi);
        record.currency = 100;
        record.purchase_upgrade(UpgradeKind::Health).unwrap();
        assert_eq!(record.max_hp, 110);
        assert_eq!(record.hp, 110);
        assert_eq!(record.effective_stats().hp, 110);
    }

    #[test]
    fn test_max_level_is_enforced() {
        let mut record = ProgressRecord::new(CharacterId::Davi);
        record.currency = u32::MAX;
        record.upgrades.attack = MAX_UPGRADE_LEVEL;
        assert_eq!(
            record.purchase_upgrade(UpgradeKind::Attack),
            Err(UpgradeError::MaxLevel(UpgradeKind::Attack))
        );
    }

    #[test]
    fn test_starting_hp_after_defeat() {
        let mut record = ProgressRecord::new(CharacterId::Magdalena);
        record.apply_event(&GameEvent::PlayerHpChanged { hp: 0 });
        assert_eq!(record.starting_hp(), 110);
        record.apply_event(&GameEvent::PlayerHpChanged { hp: 40 });
        assert_eq!(record.starting_hp(), 40);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"currency": 75, "character": "tenzin"}"#).unwrap();
        assert_eq!(record.currency, 75);
        assert_eq!(record.character, CharacterId::Tenzin);
        assert_eq!(record.last_checkpoint_x, 100);
    }
}
