#![allow(dead_code)]

use bracket_terminal::prelude::{LIGHT_BLUE, LIGHT_GREEN, RGB};

use super::{BOOST_DURATION_MS, BOOSTED_PLAYER_DAMAGE, HEAL_AMOUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LootEffect {
    Heal { amount: i32 },
    DamageBoost { damage: i32, duration_ms: u64 },
}

#[derive(Clone, Debug)]
pub struct LootTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub effect: LootEffect,
}

pub fn sword_template() -> LootTemplate {
    LootTemplate {
        name: "Gravewrought Sword",
        glyph: '/',
        color: RGB::named(LIGHT_BLUE),
        effect: LootEffect::DamageBoost {
            damage: BOOSTED_PLAYER_DAMAGE,
            duration_ms: BOOST_DURATION_MS,
        },
    }
}

pub fn heal_template() -> LootTemplate {
    LootTemplate {
        name: "Mending Draught",
        glyph: '+',
        color: RGB::named(LIGHT_GREEN),
        effect: LootEffect::Heal {
            amount: HEAL_AMOUNT,
        },
    }
}
