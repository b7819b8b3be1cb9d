#![allow(dead_code)]

use bracket_terminal::prelude::RGB;

use super::{DEFAULT_HEALTH, ENEMY_DAMAGE, ENEMY_WANDER_PERIOD_MS};

#[derive(Clone, Debug)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub hp: i32,
    pub damage: i32,
    pub wander_period_ms: u64,
}

impl EnemyTemplate {
    // Cosmetic variants only; every enemy fights with the same fixed stats.
    pub fn roster() -> Vec<Self> {
        vec![
            Self::new("Barrow Ghoul", 'g', RGB::from_u8(150, 180, 120)),
            Self::new("Rot Shambler", 's', RGB::from_u8(170, 130, 90)),
            Self::new("Hollow Knight", 'k', RGB::from_u8(190, 190, 210)),
        ]
    }

    fn new(name: &'static str, glyph: char, color: RGB) -> Self {
        Self {
            name,
            glyph,
            color,
            hp: DEFAULT_HEALTH,
            damage: ENEMY_DAMAGE,
            wander_period_ms: ENEMY_WANDER_PERIOD_MS,
        }
    }
}
