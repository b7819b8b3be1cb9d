#![allow(dead_code)]

use bracket_pathfinding::prelude::DistanceAlg;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;

use crate::{
    ai::roll_wander_step,
    data::{DEFAULT_PLAYER_DAMAGE, MAX_HEALTH},
};

use super::{
    components::{CombatStats, Enemy, IntentStep, PlayerTag, Position, WanderClock},
    resources::{AssaultTimer, BoostSchedule, EventLog, Outcome, SessionClock, SessionStatus, TerrainContext},
};

#[derive(Default)]
pub struct WanderSystem;

impl<'a> System<'a> for WanderSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, IntentStep>,
        WriteStorage<'a, WanderClock>,
        ReadStorage<'a, Enemy>,
        ReadExpect<'a, SessionClock>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (entities, mut intents, mut clocks, enemies, session_clock, mut rng): Self::SystemData,
    ) {
        for (entity, clock, _) in (&entities, &mut clocks, &enemies).join() {
            clock.elapsed_ms += session_clock.delta_ms;
            if clock.elapsed_ms < clock.period_ms {
                continue;
            }
            clock.elapsed_ms -= clock.period_ms;

            let step = roll_wander_step(&mut rng);
            if step.x == 0 && step.y == 0 {
                continue;
            }
            let _ = intents.insert(entity, IntentStep { delta: step });
        }
    }
}

#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, IntentStep>,
        ReadExpect<'a, TerrainContext>,
    );

    fn run(&mut self, (entities, mut positions, mut intents, terrain): Self::SystemData) {
        let mut to_clear = Vec::new();
        for (entity, pos, intent) in (&entities, &mut positions, &intents).join() {
            pos.point = terrain.resolve_step(pos.point, intent.delta);
            to_clear.push(entity);
        }
        for entity in to_clear {
            intents.remove(entity);
        }
    }
}

// Passive enemy pressure: every period, all enemies adjacent to the player
// land one combined strike (a single aggregate subtraction, not one hit
// per enemy in sequence).
#[derive(Default)]
pub struct AssaultSystem;

impl<'a> System<'a> for AssaultSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Position>,
        WriteStorage<'a, CombatStats>,
        ReadStorage<'a, PlayerTag>,
        ReadStorage<'a, Enemy>,
        ReadExpect<'a, SessionClock>,
        WriteExpect<'a, AssaultTimer>,
        WriteExpect<'a, SessionStatus>,
        WriteExpect<'a, EventLog>,
    );

    fn run(
        &mut self,
        (entities, positions, mut stats, players, enemies, session_clock, mut timer, mut status, mut log): Self::SystemData,
    ) {
        let fired = timer.accumulate(session_clock.delta_ms);
        if fired == 0 {
            return;
        }

        let player_snapshot = (&entities, &positions, &players)
            .join()
            .next()
            .map(|(entity, pos, _)| (entity, pos.point));
        let Some((player_entity, player_point)) = player_snapshot else {
            return;
        };

        for _ in 0..fired {
            let mut nearby = 0u32;
            let mut raked = 0i32;
            for (pos, stat, _) in (&positions, &stats, &enemies).join() {
                if DistanceAlg::Chebyshev.distance2d(player_point, pos.point) <= 1.0 {
                    nearby += 1;
                    raked += stat.damage;
                }
            }
            if nearby == 0 {
                continue;
            }

            if let Some(player_stats) = stats.get_mut(player_entity) {
                let before = player_stats.hp;
                player_stats.hp = (player_stats.hp + raked).clamp(0, MAX_HEALTH);
                let lost = before - player_stats.hp;
                if nearby == 1 {
                    log.push(format!("A foe claws you for {lost}"));
                } else {
                    log.push(format!("{nearby} foes claw you for {lost}"));
                }
                if player_stats.hp == 0 && status.record_outcome(Outcome::Defeat) {
                    log.push("Your wounds overcome you.".to_string());
                }
            }
        }
    }
}

// Deadlines are never cancelled: every one that comes due restores the
// default damage, so an overlapping pickup is cut short by the earlier
// sword's reversion.
#[derive(Default)]
pub struct BoostSystem;

impl<'a> System<'a> for BoostSystem {
    type SystemData = (
        WriteStorage<'a, CombatStats>,
        ReadStorage<'a, PlayerTag>,
        ReadExpect<'a, SessionClock>,
        WriteExpect<'a, BoostSchedule>,
        WriteExpect<'a, EventLog>,
    );

    fn run(&mut self, (mut stats, players, session_clock, mut schedule, mut log): Self::SystemData) {
        let due = schedule.take_due(session_clock.now_ms);
        if due == 0 {
            return;
        }
        for (stat, _) in (&mut stats, &players).join() {
            if stat.damage != DEFAULT_PLAYER_DAMAGE {
                stat.damage = DEFAULT_PLAYER_DAMAGE;
                log.push("The sword's keen edge dulls.".to_string());
            }
        }
    }
}
