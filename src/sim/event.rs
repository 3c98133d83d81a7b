//! Outbound signals raised inside a tick
//!
//! Events are queued on the state and handed to the host after the frame's
//! ticks finish, so a collaborator can never re-enter the loop mid-tick.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player hp changed (damage taken, or run start)
    PlayerHpChanged { hp: i32 },
    /// An enemy died and dropped currency
    CurrencyCollected { amount: u32 },
    /// Player crossed into a new checkpoint bucket
    CheckpointReached { x: i32 },
    /// The boss noticed the player for the first time
    BossEncountered,
    /// Boss defeated (raised at most once per run)
    Victory,
    /// Player hp reached zero (raised at most once per run)
    GameOver,
}
