#![allow(dead_code)]

pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::{RGB, YELLOW};
use serde::Serialize;
use smallvec::SmallVec;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    data::{
        items::{heal_template, sword_template, LootEffect, LootTemplate},
        monsters::EnemyTemplate,
        DEFAULT_HEALTH, DEFAULT_PLAYER_DAMAGE, ENEMY_ATTACK_PERIOD_MS, ENEMY_COUNT, HEAL_COUNT,
        MAX_HEALTH, SWORD_COUNT,
    },
    map::GameMap,
};

use self::{
    components::{CombatStats, Enemy, IntentStep, Loot, PlayerTag, Position, Renderable, WanderClock},
    resources::{
        AssaultTimer, BoostSchedule, EventLog, Outcome, SessionClock, SessionStatus, TerrainContext,
    },
    systems::{AssaultSystem, BoostSystem, MovementSystem, WanderSystem},
};

const WANDER_SEED_SALT: u64 = 0x5ee3_b0b5_17c4_90ad;

pub struct SessionWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
}

#[derive(Clone, Debug)]
pub struct AttackReport {
    pub name: String,
    pub remaining_hp: i32,
    pub defeated: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActorSnapshot {
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnemySnapshot {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ItemSnapshot {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub clock_ms: u64,
    pub player: ActorSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub items: Vec<ItemSnapshot>,
    pub enemies_remaining: u32,
    pub boost_deadlines_ms: Vec<u64>,
    pub outcome: Option<Outcome>,
}

impl SessionWorld {
    // Session start: items claim their cells first, then enemies, then the
    // player, so each later placement only sees cells still marked Floor.
    pub fn new(map: &mut GameMap, seed: u64) -> Self {
        let mut placement_rng = RandomNumberGenerator::seeded(seed);
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        Self::insert_resources(&mut specs_world, seed);

        let placed = map.place_items(&mut placement_rng, SWORD_COUNT, HEAL_COUNT);
        let sword = sword_template();
        let heal = heal_template();
        for point in &placed.swords {
            Self::spawn_loot(&mut specs_world, &sword, *point);
        }
        for point in &placed.heals {
            Self::spawn_loot(&mut specs_world, &heal, *point);
        }

        let roster = EnemyTemplate::roster();
        for index in 0..ENEMY_COUNT {
            let Some(point) = map.sample_floor_cell(&mut placement_rng) else {
                eprintln!("gloomcrawl: ran out of floor, shrinking the enemy pack");
                break;
            };
            Self::spawn_enemy(&mut specs_world, &roster[index % roster.len()], point);
            specs_world.write_resource::<SessionStatus>().enemies_remaining += 1;
        }

        let player_at = map.sample_floor_cell(&mut placement_rng).unwrap_or_else(|| {
            eprintln!("gloomcrawl: no floor for the player, force-placing at origin");
            Point::new(0, 0)
        });
        let player = Self::spawn_player(&mut specs_world, player_at);

        Self {
            specs_world,
            dispatcher: Self::build_dispatcher(),
            player,
        }
    }

    // Bare session with nothing but the player; scripted scenarios and
    // tests stock it by hand.
    pub fn with_player_at(seed: u64, point: Point) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        Self::insert_resources(&mut specs_world, seed);
        let player = Self::spawn_player(&mut specs_world, point);
        Self {
            specs_world,
            dispatcher: Self::build_dispatcher(),
            player,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<CombatStats>();
        world.register::<PlayerTag>();
        world.register::<Enemy>();
        world.register::<WanderClock>();
        world.register::<Loot>();
        world.register::<IntentStep>();
    }

    fn insert_resources(world: &mut SpecsWorld, seed: u64) {
        world.insert(RandomNumberGenerator::seeded(seed ^ WANDER_SEED_SALT));
        world.insert(EventLog::default());
        world.insert(SessionClock::default());
        world.insert(AssaultTimer::new(ENEMY_ATTACK_PERIOD_MS));
        world.insert(BoostSchedule::default());
        world.insert(SessionStatus::default());
    }

    fn build_dispatcher() -> Dispatcher<'static, 'static> {
        DispatcherBuilder::new()
            .with(WanderSystem::default(), "wander", &[])
            .with(MovementSystem::default(), "movement", &["wander"])
            .with(AssaultSystem::default(), "assault", &["movement"])
            .with(BoostSystem::default(), "boost", &[])
            .build()
    }

    fn spawn_player(world: &mut SpecsWorld, point: Point) -> Entity {
        world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: b'@' as u16,
                color: RGB::named(YELLOW),
                order: 2,
            })
            .with(CombatStats {
                max_hp: MAX_HEALTH,
                hp: DEFAULT_HEALTH,
                damage: DEFAULT_PLAYER_DAMAGE,
            })
            .with(PlayerTag)
            .build()
    }

    fn spawn_enemy(world: &mut SpecsWorld, template: &EnemyTemplate, point: Point) {
        world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: template.glyph as u16,
                color: template.color,
                order: 1,
            })
            .with(Enemy {
                name: template.name.to_string(),
            })
            .with(CombatStats {
                max_hp: MAX_HEALTH,
                hp: template.hp,
                damage: template.damage,
            })
            .with(WanderClock {
                period_ms: template.wander_period_ms,
                elapsed_ms: 0,
            })
            .build();
    }

    fn spawn_loot(world: &mut SpecsWorld, template: &LootTemplate, point: Point) {
        world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: template.glyph as u16,
                color: template.color,
                order: 0,
            })
            .with(Loot {
                name: template.name.to_string(),
                effect: template.effect,
            })
            .build();
    }

    pub fn spawn_enemy_at(&mut self, template: &EnemyTemplate, point: Point) {
        Self::spawn_enemy(&mut self.specs_world, template, point);
        self.specs_world
            .write_resource::<SessionStatus>()
            .enemies_remaining += 1;
    }

    pub fn spawn_loot_at(&mut self, template: &LootTemplate, point: Point) {
        Self::spawn_loot(&mut self.specs_world, template, point);
    }

    // Drives the periodic processes: enemy wandering, passive enemy
    // pressure, boost reversion. A frozen session ignores the call.
    pub fn advance(&mut self, map: &GameMap, elapsed_ms: u64) {
        if self.outcome().is_some() {
            return;
        }
        {
            let mut clock = self.specs_world.write_resource::<SessionClock>();
            clock.delta_ms = elapsed_ms;
            clock.now_ms += elapsed_ms;
        }
        self.specs_world.insert(TerrainContext::from_map(map));
        self.dispatcher.dispatch(&mut self.specs_world);
        self.specs_world.maintain();
    }

    // Movement then pickup, in that order; the pickup check runs against
    // the resulting cell even when the step was rejected by a wall.
    pub fn move_player(&mut self, map: &GameMap, dx: i32, dy: i32) -> Point {
        let current = self.player_point();
        if self.outcome().is_some() {
            return current;
        }
        let terrain = TerrainContext::from_map(map);
        let landed = {
            let mut positions = self.specs_world.write_component::<Position>();
            match positions.get_mut(self.player) {
                Some(pos) => {
                    pos.point = terrain.resolve_step(pos.point, Point::new(dx, dy));
                    pos.point
                }
                None => current,
            }
        };
        self.evaluate_pickup(landed);
        landed
    }

    fn evaluate_pickup(&mut self, at: Point) {
        let mut heal_hit: Option<(Entity, String, i32)> = None;
        let mut sword_hit: Option<(Entity, String, i32, u64)> = None;
        {
            let entities = self.specs_world.entities();
            let positions = self.specs_world.read_component::<Position>();
            let loot = self.specs_world.read_component::<Loot>();
            for (entity, pos, item) in (&entities, &positions, &loot).join() {
                if pos.point != at {
                    continue;
                }
                match item.effect {
                    LootEffect::Heal { amount } if heal_hit.is_none() => {
                        heal_hit = Some((entity, item.name.clone(), amount));
                    }
                    LootEffect::DamageBoost {
                        damage,
                        duration_ms,
                    } if sword_hit.is_none() => {
                        sword_hit = Some((entity, item.name.clone(), damage, duration_ms));
                    }
                    _ => {}
                }
            }
        }

        // A heal ends the check; a co-located sword stays on the floor
        // until some later visit.
        if let Some((entity, name, amount)) = heal_hit {
            let gained = {
                let mut stats = self.specs_world.write_component::<CombatStats>();
                match stats.get_mut(self.player) {
                    Some(player_stats) => {
                        let before = player_stats.hp;
                        player_stats.hp = (player_stats.hp + amount).clamp(0, MAX_HEALTH);
                        player_stats.hp - before
                    }
                    None => 0,
                }
            };
            let _ = self.specs_world.entities().delete(entity);
            self.specs_world.maintain();
            self.specs_world
                .write_resource::<EventLog>()
                .push(format!("You quaff the {name}: +{gained} vigor"));
            return;
        }

        if let Some((entity, name, damage, duration_ms)) = sword_hit {
            {
                let mut stats = self.specs_world.write_component::<CombatStats>();
                if let Some(player_stats) = stats.get_mut(self.player) {
                    player_stats.damage = damage;
                }
            }
            let deadline = {
                let clock = self.specs_world.read_resource::<SessionClock>();
                clock.now_ms + duration_ms
            };
            self.specs_world
                .write_resource::<BoostSchedule>()
                .push(deadline);
            let _ = self.specs_world.entities().delete(entity);
            self.specs_world.maintain();
            self.specs_world
                .write_resource::<EventLog>()
                .push(format!("You seize the {name}: your blows land harder"));
        }
    }

    // Strike every enemy on the player's cell or any of its eight
    // neighbors. Kills are collected during the scan and resolved after.
    pub fn player_attack(&mut self) -> Vec<AttackReport> {
        if self.outcome().is_some() {
            return Vec::new();
        }
        let origin = self.player_point();
        let damage = self
            .player_stats()
            .map_or(DEFAULT_PLAYER_DAMAGE, |stats| stats.damage);

        let mut reports = Vec::new();
        let mut deaths: SmallVec<[(Entity, String); 8]> = SmallVec::new();
        {
            let entities = self.specs_world.entities();
            let positions = self.specs_world.read_component::<Position>();
            let mut stats = self.specs_world.write_component::<CombatStats>();
            let enemies = self.specs_world.read_component::<Enemy>();
            for (entity, pos, stat, enemy) in (&entities, &positions, &mut stats, &enemies).join() {
                if DistanceAlg::Chebyshev.distance2d(origin, pos.point) > 1.0 {
                    continue;
                }
                stat.hp = (stat.hp + damage).clamp(0, MAX_HEALTH);
                let defeated = stat.hp == 0;
                reports.push(AttackReport {
                    name: enemy.name.clone(),
                    remaining_hp: stat.hp,
                    defeated,
                });
                if defeated {
                    deaths.push((entity, enemy.name.clone()));
                }
            }
        }

        for (entity, name) in deaths {
            let _ = self.specs_world.entities().delete(entity);
            let (remaining, newly_won) = {
                let mut status = self.specs_world.write_resource::<SessionStatus>();
                status.enemies_remaining = status.enemies_remaining.saturating_sub(1);
                let newly_won =
                    status.enemies_remaining == 0 && status.record_outcome(Outcome::Victory);
                (status.enemies_remaining, newly_won)
            };
            let mut log = self.specs_world.write_resource::<EventLog>();
            log.push(format!("The {name} collapses, {remaining} remain"));
            if newly_won {
                log.push("The halls fall silent. You prevail.".to_string());
            }
        }
        self.specs_world.maintain();
        reports
    }

    pub fn player_point(&self) -> Point {
        let positions = self.specs_world.read_component::<Position>();
        positions
            .get(self.player)
            .map_or(Point::new(0, 0), |pos| pos.point)
    }

    pub fn set_player_position(&mut self, point: Point) {
        let mut positions = self.specs_world.write_component::<Position>();
        if let Some(pos) = positions.get_mut(self.player) {
            pos.point = point;
        }
    }

    pub fn player_stats(&self) -> Option<CombatStats> {
        let stats = self.specs_world.read_component::<CombatStats>();
        stats.get(self.player).cloned()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.specs_world.read_resource::<SessionStatus>().outcome
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.specs_world
            .read_resource::<SessionStatus>()
            .enemies_remaining
    }

    pub fn boost_active(&self) -> bool {
        self.player_stats()
            .is_some_and(|stats| stats.damage != DEFAULT_PLAYER_DAMAGE)
    }

    pub fn drain_event_log(&mut self) -> Vec<String> {
        let mut log = self.specs_world.write_resource::<EventLog>();
        std::mem::take(&mut log.entries)
    }

    // Lowest draw order first, so loot sits under enemies and enemies
    // under the player.
    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(Point, &Renderable),
    {
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let mut layered: Vec<(Point, &Renderable)> = (&positions, &renderables)
            .join()
            .map(|(pos, renderable)| (pos.point, renderable))
            .collect();
        layered.sort_by_key(|(_, renderable)| renderable.order);
        for (point, renderable) in layered {
            f(point, renderable);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let positions = self.specs_world.read_component::<Position>();
        let stats = self.specs_world.read_component::<CombatStats>();
        let enemies = self.specs_world.read_component::<Enemy>();
        let loot = self.specs_world.read_component::<Loot>();

        let player_point = self.player_point();
        let player_stats = self.player_stats();
        let player = ActorSnapshot {
            x: player_point.x,
            y: player_point.y,
            hp: player_stats.as_ref().map_or(0, |s| s.hp),
            damage: player_stats.as_ref().map_or(0, |s| s.damage),
        };

        let mut enemy_snapshots = Vec::new();
        for (pos, stat, enemy) in (&positions, &stats, &enemies).join() {
            enemy_snapshots.push(EnemySnapshot {
                name: enemy.name.clone(),
                x: pos.point.x,
                y: pos.point.y,
                hp: stat.hp,
            });
        }

        let mut item_snapshots = Vec::new();
        for (pos, item) in (&positions, &loot).join() {
            item_snapshots.push(ItemSnapshot {
                name: item.name.clone(),
                x: pos.point.x,
                y: pos.point.y,
            });
        }

        let status = self.specs_world.read_resource::<SessionStatus>();
        let clock = self.specs_world.read_resource::<SessionClock>();
        let schedule = self.specs_world.read_resource::<BoostSchedule>();
        SessionSnapshot {
            clock_ms: clock.now_ms,
            player,
            enemies: enemy_snapshots,
            items: item_snapshots,
            enemies_remaining: status.enemies_remaining,
            boost_deadlines_ms: schedule.deadlines.clone(),
            outcome: status.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BOOSTED_PLAYER_DAMAGE, ENEMY_DAMAGE};
    use crate::map::{GameMap, TileKind, MAP_COLUMNS, MAP_ROWS};
    use bracket_terminal::prelude::WHITE;

    fn open_map() -> GameMap {
        GameMap::filled(MAP_COLUMNS, MAP_ROWS, TileKind::Floor)
    }

    // A sessile enemy: its wander clock never comes due, so scenarios
    // keep full control of adjacency.
    fn pinned_enemy() -> EnemyTemplate {
        EnemyTemplate {
            name: "Test Wight",
            glyph: 'w',
            color: RGB::named(WHITE),
            hp: DEFAULT_HEALTH,
            damage: ENEMY_DAMAGE,
            wander_period_ms: u64::MAX,
        }
    }

    fn set_player_hp(session: &mut SessionWorld, hp: i32) {
        let mut stats = session.specs_world.write_component::<CombatStats>();
        stats.get_mut(session.player).unwrap().hp = hp;
    }

    #[test]
    fn populate_places_everything_on_carved_cells() {
        let mut rng = RandomNumberGenerator::seeded(404);
        let mut map = GameMap::generate(&mut rng);
        let session = SessionWorld::new(&mut map, 404);
        let snapshot = session.snapshot();

        assert_eq!(snapshot.enemies.len(), ENEMY_COUNT);
        assert_eq!(snapshot.enemies_remaining, ENEMY_COUNT as u32);
        assert_eq!(snapshot.items.len(), SWORD_COUNT + HEAL_COUNT);

        // Enemies and the player landed on cells still marked Floor,
        // items on the cells they claimed.
        assert_eq!(
            map.kind_at(Point::new(snapshot.player.x, snapshot.player.y)),
            TileKind::Floor
        );
        for enemy in &snapshot.enemies {
            assert_eq!(map.kind_at(Point::new(enemy.x, enemy.y)), TileKind::Floor);
        }
        for item in &snapshot.items {
            assert!(matches!(
                map.kind_at(Point::new(item.x, item.y)),
                TileKind::Sword | TileKind::Heal
            ));
        }
    }

    #[test]
    fn move_into_wall_returns_unchanged_position() {
        let mut map = open_map();
        map.set_kind(Point::new(6, 5), TileKind::Wall);
        let mut session = SessionWorld::with_player_at(1, Point::new(5, 5));
        let landed = session.move_player(&map, 1, 0);
        assert_eq!(landed, Point::new(5, 5));
        assert_eq!(session.player_point(), Point::new(5, 5));
    }

    #[test]
    fn move_wraps_across_the_map_edges() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(1, Point::new(0, 3));
        assert_eq!(
            session.move_player(&map, -1, 0),
            Point::new(MAP_COLUMNS - 1, 3)
        );
        assert_eq!(session.move_player(&map, 1, 0), Point::new(0, 3));
        session.set_player_position(Point::new(7, 0));
        assert_eq!(
            session.move_player(&map, 0, -1),
            Point::new(7, MAP_ROWS - 1)
        );
    }

    #[test]
    fn attack_reaches_only_adjacent_enemies() {
        let mut session = SessionWorld::with_player_at(2, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 6));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(7, 5));

        let reports = session.player_attack();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].remaining_hp, 80);
        assert!(!reports[0].defeated);

        let snapshot = session.snapshot();
        let far = snapshot
            .enemies
            .iter()
            .find(|enemy| enemy.x == 7)
            .expect("distant enemy still present");
        assert_eq!(far.hp, DEFAULT_HEALTH);
    }

    #[test]
    fn five_attacks_fell_one_enemy_and_win_fires_once() {
        let mut session = SessionWorld::with_player_at(3, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(5, 6));

        for expected_hp in [80, 60, 40, 20] {
            let reports = session.player_attack();
            assert_eq!(reports[0].remaining_hp, expected_hp);
            assert!(!reports[0].defeated);
            assert_eq!(session.enemies_remaining(), 1);
            assert_eq!(session.outcome(), None);
        }

        let reports = session.player_attack();
        assert!(reports[0].defeated);
        assert_eq!(session.enemies_remaining(), 0);
        assert_eq!(session.outcome(), Some(Outcome::Victory));

        let log = session.drain_event_log();
        assert_eq!(
            log.iter().filter(|line| line.contains("prevail")).count(),
            1
        );

        // The session is over; further strikes are no-ops.
        assert!(session.player_attack().is_empty());
    }

    #[test]
    fn simultaneous_kills_decrement_once_each_and_win_once() {
        let mut session = SessionWorld::with_player_at(4, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(4, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 5));

        for _ in 0..4 {
            let reports = session.player_attack();
            assert_eq!(reports.len(), 2);
        }
        assert_eq!(session.enemies_remaining(), 2);

        let reports = session.player_attack();
        assert!(reports.iter().all(|report| report.defeated));
        assert_eq!(session.enemies_remaining(), 0);
        assert_eq!(session.outcome(), Some(Outcome::Victory));
        let log = session.drain_event_log();
        assert_eq!(
            log.iter().filter(|line| line.contains("prevail")).count(),
            1
        );
    }

    #[test]
    fn heal_requires_exact_position() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(5, Point::new(4, 5));
        session.spawn_loot_at(&heal_template(), Point::new(6, 5));
        set_player_hp(&mut session, 30);

        // Adjacent is not enough.
        session.move_player(&map, 1, 0);
        assert_eq!(session.player_stats().unwrap().hp, 30);
        assert_eq!(session.snapshot().items.len(), 1);

        // Standing on it is.
        session.move_player(&map, 1, 0);
        assert_eq!(session.player_stats().unwrap().hp, 70);
        assert!(session.snapshot().items.is_empty());
    }

    #[test]
    fn heal_clamps_at_full_health() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(6, Point::new(4, 5));
        session.spawn_loot_at(&heal_template(), Point::new(5, 5));
        set_player_hp(&mut session, 90);
        session.move_player(&map, 1, 0);
        assert_eq!(session.player_stats().unwrap().hp, MAX_HEALTH);
    }

    #[test]
    fn heal_takes_precedence_over_a_sword_on_the_same_cell() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(7, Point::new(4, 5));
        session.spawn_loot_at(&heal_template(), Point::new(5, 5));
        session.spawn_loot_at(&sword_template(), Point::new(5, 5));
        set_player_hp(&mut session, 50);

        session.move_player(&map, 1, 0);
        let stats = session.player_stats().unwrap();
        assert_eq!(stats.hp, 90);
        // No sword check this turn: damage untouched, sword still down.
        assert_eq!(stats.damage, DEFAULT_PLAYER_DAMAGE);
        assert_eq!(session.snapshot().items.len(), 1);

        // The next visit picks the sword up.
        session.move_player(&map, 0, 0);
        assert_eq!(session.player_stats().unwrap().damage, BOOSTED_PLAYER_DAMAGE);
        assert!(session.snapshot().items.is_empty());
    }

    #[test]
    fn blocked_move_still_evaluates_pickup_in_place() {
        let mut map = open_map();
        map.set_kind(Point::new(6, 5), TileKind::Wall);
        let mut session = SessionWorld::with_player_at(8, Point::new(5, 5));
        session.spawn_loot_at(&heal_template(), Point::new(5, 5));
        set_player_hp(&mut session, 50);

        let landed = session.move_player(&map, 1, 0);
        assert_eq!(landed, Point::new(5, 5));
        assert_eq!(session.player_stats().unwrap().hp, 90);
        assert!(session.snapshot().items.is_empty());
    }

    #[test]
    fn sword_boost_reverts_after_its_full_duration() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(9, Point::new(4, 5));
        session.spawn_loot_at(&sword_template(), Point::new(5, 5));

        session.move_player(&map, 1, 0);
        assert_eq!(session.player_stats().unwrap().damage, BOOSTED_PLAYER_DAMAGE);
        assert!(session.boost_active());

        session.advance(&map, 4_999);
        assert_eq!(session.player_stats().unwrap().damage, BOOSTED_PLAYER_DAMAGE);

        session.advance(&map, 1);
        assert_eq!(session.player_stats().unwrap().damage, DEFAULT_PLAYER_DAMAGE);
        assert!(!session.boost_active());
    }

    #[test]
    fn earlier_sword_timer_still_fires_and_cuts_the_second_boost_short() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(10, Point::new(4, 5));
        session.spawn_loot_at(&sword_template(), Point::new(5, 5));
        session.spawn_loot_at(&sword_template(), Point::new(6, 5));

        session.move_player(&map, 1, 0);
        session.advance(&map, 3_000);
        session.move_player(&map, 1, 0);
        assert_eq!(session.player_stats().unwrap().damage, BOOSTED_PLAYER_DAMAGE);

        // The first pickup's deadline (5 000 ms) is still outstanding and
        // restores the default, three seconds into the second boost.
        session.advance(&map, 2_000);
        assert_eq!(session.player_stats().unwrap().damage, DEFAULT_PLAYER_DAMAGE);

        // The second deadline fires later with nothing left to revert.
        session.advance(&map, 3_000);
        assert_eq!(session.player_stats().unwrap().damage, DEFAULT_PLAYER_DAMAGE);
        assert!(session.snapshot().boost_deadlines_ms.is_empty());
    }

    #[test]
    fn passive_damage_sequence_ends_in_a_single_defeat() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(11, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 6));

        let mut observed = Vec::new();
        for _ in 0..5 {
            session.advance(&map, 800);
            observed.push(session.player_stats().unwrap().hp);
        }
        assert_eq!(observed, vec![70, 40, 10, 0, 0]);
        assert_eq!(session.outcome(), Some(Outcome::Defeat));

        let log = session.drain_event_log();
        assert_eq!(
            log.iter().filter(|line| line.contains("overcome")).count(),
            1
        );
    }

    #[test]
    fn passive_damage_scales_with_the_number_of_adjacent_enemies() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(12, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(4, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(9, 9));

        session.advance(&map, 800);
        // One combined application for the two adjacent enemies; the
        // distant one contributes nothing.
        assert_eq!(session.player_stats().unwrap().hp, 40);
        let log = session.drain_event_log();
        assert!(log.iter().any(|line| line.contains("2 foes")));
    }

    #[test]
    fn no_passive_tick_before_the_period_elapses() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(13, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 5));
        session.advance(&map, 799);
        assert_eq!(session.player_stats().unwrap().hp, DEFAULT_HEALTH);
        session.advance(&map, 1);
        assert_eq!(session.player_stats().unwrap().hp, 70);
    }

    #[test]
    fn enemies_wander_within_bounds_and_off_walls() {
        let mut map = open_map();
        // Box an enemy in with cardinal walls; wander steps are cardinal
        // only, so it can never leave its cell.
        for wall in [
            Point::new(5, 4),
            Point::new(5, 6),
            Point::new(4, 5),
            Point::new(6, 5),
        ] {
            map.set_kind(wall, TileKind::Wall);
        }
        let mut session = SessionWorld::with_player_at(14, Point::new(20, 20));
        let mut roaming = pinned_enemy();
        roaming.wander_period_ms = 500;
        session.spawn_enemy_at(&roaming, Point::new(5, 5));

        for _ in 0..20 {
            session.advance(&map, 500);
            let snapshot = session.snapshot();
            assert_eq!(snapshot.enemies[0].x, 5);
            assert_eq!(snapshot.enemies[0].y, 5);
        }
    }

    #[test]
    fn enemies_do_wander_on_an_open_map() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(15, Point::new(30, 20));
        let mut roaming = pinned_enemy();
        roaming.wander_period_ms = 500;
        session.spawn_enemy_at(&roaming, Point::new(5, 5));

        let mut moved = false;
        for _ in 0..20 {
            session.advance(&map, 500);
            let snapshot = session.snapshot();
            assert!(snapshot.enemies[0].x >= 0 && snapshot.enemies[0].x < MAP_COLUMNS);
            assert!(snapshot.enemies[0].y >= 0 && snapshot.enemies[0].y < MAP_ROWS);
            if (snapshot.enemies[0].x, snapshot.enemies[0].y) != (5, 5) {
                moved = true;
            }
        }
        assert!(moved, "enemy never left its cell in twenty periods");
    }

    #[test]
    fn enemies_may_share_a_cell() {
        let mut session = SessionWorld::with_player_at(16, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(8, 8));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(8, 8));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.enemies.len(), 2);
        assert_eq!(snapshot.enemies[0].x, snapshot.enemies[1].x);
        assert_eq!(snapshot.enemies[0].y, snapshot.enemies[1].y);
    }

    #[test]
    fn deleting_an_already_removed_enemy_is_a_no_op() {
        let mut session = SessionWorld::with_player_at(17, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(5, 6));
        let entity = {
            let entities = session.specs_world.entities();
            let enemies = session.specs_world.read_component::<Enemy>();
            (&entities, &enemies).join().next().map(|(e, _)| e).unwrap()
        };

        for _ in 0..5 {
            session.player_attack();
        }
        assert_eq!(session.enemies_remaining(), 0);

        // A second removal of the defeated enemy must not panic.
        let _ = session.specs_world.entities().delete(entity);
        session.specs_world.maintain();
    }

    #[test]
    fn frozen_session_ignores_every_intent() {
        let map = open_map();
        let mut session = SessionWorld::with_player_at(18, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 5));
        set_player_hp(&mut session, 30);
        session.advance(&map, 800);
        assert_eq!(session.outcome(), Some(Outcome::Defeat));

        let before = session.player_point();
        assert_eq!(session.move_player(&map, 1, 0), before);
        assert!(session.player_attack().is_empty());
        session.advance(&map, 10_000);
        assert_eq!(session.player_stats().unwrap().hp, 0);
    }

    #[test]
    fn snapshot_serializes_for_the_collaborator() {
        let mut session = SessionWorld::with_player_at(19, Point::new(5, 5));
        session.spawn_enemy_at(&pinned_enemy(), Point::new(6, 5));
        session.spawn_loot_at(&heal_template(), Point::new(7, 7));

        let value = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(value["player"]["hp"], 100);
        assert_eq!(value["enemies_remaining"], 1);
        assert_eq!(value["enemies"][0]["name"], "Test Wight");
        assert_eq!(value["items"][0]["x"], 7);
        assert!(value["outcome"].is_null());
    }
}
