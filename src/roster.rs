//! Playable characters and chapters
//!
//! Read-only configuration input for a session: the selected character's
//! stats drive physics and combat, the chapter index selects level layout.

use serde::{Deserialize, Serialize};

/// Playable character identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    #[default]
    Aziel,
    Tenzin,
    Elias,
    Magdalena,
    Hiroshi,
    Davi,
}

impl CharacterId {
    pub const ALL: [CharacterId; 6] = [
        CharacterId::Aziel,
        CharacterId::Tenzin,
        CharacterId::Elias,
        CharacterId::Magdalena,
        CharacterId::Hiroshi,
        CharacterId::Davi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterId::Aziel => "aziel",
            CharacterId::Tenzin => "tenzin",
            CharacterId::Elias => "elias",
            CharacterId::Magdalena => "magdalena",
            CharacterId::Hiroshi => "hiroshi",
            CharacterId::Davi => "davi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// Combat and movement stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub hp: i32,
    pub attack: i32,
    /// Max horizontal speed (units per tick)
    pub speed: f32,
    /// Upward impulse on jump (units per tick)
    pub jump_power: f32,
}

/// A playable character definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub name: &'static str,
    pub country: &'static str,
    pub weapon: &'static str,
    pub stats: CharacterStats,
    /// Body color (visual identifier)
    pub color: [f32; 4],
}

const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

const ROSTER: [Character; 6] = [
    Character {
        id: CharacterId::Aziel,
        name: "Padre Aziel Monteiro",
        country: "Brasil",
        weapon: "Crucifixo Pesado",
        stats: CharacterStats { hp: 150, attack: 25, speed: 4.0, jump_power: 12.0 },
        color: rgb(0x34d399),
    },
    Character {
        id: CharacterId::Tenzin,
        name: "Mestre Tenzin Rampa",
        country: "Nepal",
        weapon: "Bastão Espiritual",
        stats: CharacterStats { hp: 100, attack: 15, speed: 6.0, jump_power: 15.0 },
        color: rgb(0xfbbf24),
    },
    Character {
        id: CharacterId::Elias,
        name: "Pastor Elias Kendrick",
        country: "EUA",
        weapon: "Ondas Sonoras",
        stats: CharacterStats { hp: 120, attack: 20, speed: 5.0, jump_power: 10.0 },
        color: rgb(0x60a5fa),
    },
    Character {
        id: CharacterId::Magdalena,
        name: "Irmã Magdalena de la Cruz",
        country: "Espanha",
        weapon: "Lâmina Sagrada",
        stats: CharacterStats { hp: 110, attack: 22, speed: 7.0, jump_power: 13.0 },
        color: rgb(0xf87171),
    },
    Character {
        id: CharacterId::Hiroshi,
        name: "Padre Hiroshi Nakamura",
        country: "Japão",
        weapon: "Talismãs",
        stats: CharacterStats { hp: 90, attack: 18, speed: 5.5, jump_power: 11.0 },
        color: rgb(0xc084fc),
    },
    Character {
        id: CharacterId::Davi,
        name: "Davi Bem Sahar",
        country: "Israel",
        weapon: "Símbolos Místicos",
        stats: CharacterStats { hp: 100, attack: 20, speed: 4.5, jump_power: 10.0 },
        color: rgb(0x2dd4bf),
    },
];

impl Character {
    pub fn get(id: CharacterId) -> &'static Character {
        // ROSTER is declared in CharacterId::ALL order
        &ROSTER[id as usize]
    }

    pub fn all() -> &'static [Character] {
        &ROSTER
    }
}

/// A chapter (level) of the campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub index: u32,
    pub name: &'static str,
    pub location: &'static str,
    pub boss: &'static str,
}

pub const CHAPTERS: [Chapter; 7] = [
    Chapter { index: 0, name: "Brasil", location: "Catedrais em Ruínas", boss: "O Anjo da Lapa" },
    Chapter { index: 1, name: "Nepal", location: "Mosteiros Suspensos", boss: "O Olho do Vazio" },
    Chapter { index: 2, name: "EUA", location: "Megaigrejas Colapsadas", boss: "Pastor da Ganância" },
    Chapter { index: 3, name: "Espanha", location: "Catedrais Góticas em Chamas", boss: "Inquisidor de Luz" },
    Chapter { index: 4, name: "Japão", location: "Templos Distorcidos", boss: "Kami Fragmentado" },
    Chapter { index: 5, name: "Israel", location: "Ruínas Sagradas", boss: "Selo Quebrado" },
    Chapter { index: 6, name: "Final", location: "O Céu Rasgado", boss: "A Sentinela Primordial" },
];

/// Chapter by index; out-of-range indices clamp to the final chapter
pub fn chapter(index: u32) -> &'static Chapter {
    &CHAPTERS[(index as usize).min(CHAPTERS.len() - 1)]
}
