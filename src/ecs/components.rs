#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, NullStorage, VecStorage};

use crate::data::items::LootEffect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

// Shared by the player and every enemy. `damage` is stored negative and
// added to the victim's hp; only the player's value ever changes (boost).
#[derive(Clone, Debug)]
pub struct CombatStats {
    pub max_hp: i32,
    pub hp: i32,
    pub damage: i32,
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub name: String,
}

impl Component for Enemy {
    type Storage = VecStorage<Self>;
}

// Independent per-enemy wander timer; accumulators advance on every
// session tick and fire whenever a full period has elapsed.
#[derive(Clone, Debug)]
pub struct WanderClock {
    pub period_ms: u64,
    pub elapsed_ms: u64,
}

impl Component for WanderClock {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Loot {
    pub name: String,
    pub effect: LootEffect,
}

impl Component for Loot {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct IntentStep {
    pub delta: Point,
}

impl Default for IntentStep {
    fn default() -> Self {
        Self {
            delta: Point::new(0, 0),
        }
    }
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}
