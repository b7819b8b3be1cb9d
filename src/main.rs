mod ai;
mod data;
mod ecs;
mod map;
mod render;
mod scripted_input;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use chrono::Local;

use ecs::SessionWorld;
use map::{GameMap, MAP_ROWS};
use render::{draw_hud, draw_log, draw_map, draw_outcome};
use scripted_input::ScriptedInput;

const MAP_ORIGIN_X: i32 = 2;
const MAP_ORIGIN_Y: i32 = 8;
const LOG_PANEL_START: i32 = MAP_ORIGIN_Y + MAP_ROWS + 2;
const LOG_MAX_ENTRIES: usize = 8;

struct GloomcrawlState {
    map: GameMap,
    session: SessionWorld,
    seed: u64,
    script: Option<ScriptedInput>,
    message_log: Vec<String>,
    time_bank_ms: f32,
    outcome_announced: bool,
}

impl GloomcrawlState {
    fn new_run(seed: u64) -> Self {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let mut map = GameMap::generate(&mut rng);
        let session = SessionWorld::new(&mut map, seed);
        let mut state = Self {
            map,
            session,
            seed,
            script: None,
            message_log: Vec::new(),
            time_bank_ms: 0.0,
            outcome_announced: false,
        };
        state.push_log_entry(format!("You descend into the gloom (seed {seed:#x})"));
        state
    }

    fn restart(&mut self) {
        let seed = RandomNumberGenerator::new().rand::<u64>();
        let script = self.script.take();
        *self = Self::new_run(seed);
        self.script = script;
    }

    fn handle_input(&mut self, ctx: &mut BTerm, key: Option<VirtualKeyCode>) {
        if let Some(key) = key {
            match key {
                VirtualKeyCode::Left | VirtualKeyCode::A => self.step(-1, 0),
                VirtualKeyCode::Right | VirtualKeyCode::D => self.step(1, 0),
                VirtualKeyCode::Up | VirtualKeyCode::W => self.step(0, -1),
                VirtualKeyCode::Down | VirtualKeyCode::S => self.step(0, 1),
                VirtualKeyCode::Space => self.attack(),
                VirtualKeyCode::P => self.dump_snapshot(),
                VirtualKeyCode::R => self.restart(),
                VirtualKeyCode::Q | VirtualKeyCode::Escape => ctx.quitting = true,
                _ => {}
            }
        }
    }

    fn step(&mut self, dx: i32, dy: i32) {
        if self.session.outcome().is_some() {
            return;
        }
        let before = self.session.player_point();
        let after = self.session.move_player(&self.map, dx, dy);
        if after == before {
            self.push_log_entry(format!("Blocked at {},{}", before.x + dx, before.y + dy));
        }
    }

    fn attack(&mut self) {
        if self.session.outcome().is_some() {
            return;
        }
        let reports = self.session.player_attack();
        if reports.is_empty() {
            self.push_log_entry("Your swing cuts empty air");
            return;
        }
        // Kills announce themselves through the session log.
        for report in reports.iter().filter(|report| !report.defeated) {
            self.push_log_entry(format!(
                "You strike the {} ({} hp left)",
                report.name, report.remaining_hp
            ));
        }
    }

    fn dump_snapshot(&mut self) {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let path = format!("gloomcrawl-{stamp}.json");
        match self.write_snapshot(&path) {
            Ok(()) => self.push_log_entry(format!("Session state dumped to {path}")),
            Err(err) => self.push_log_entry(format!("State dump failed: {err}")),
        }
    }

    fn write_snapshot(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.session.snapshot())
            .map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    fn flush_session_log(&mut self) {
        for entry in self.session.drain_event_log() {
            self.push_log_entry(entry);
        }
    }

    fn announce_outcome(&mut self) {
        if self.outcome_announced || self.session.outcome().is_none() {
            return;
        }
        self.outcome_announced = true;
        self.push_log_entry("Press R to delve again, Q to quit");
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn draw_scene(&mut self, ctx: &mut BTerm) {
        if let Some(stats) = self.session.player_stats() {
            draw_hud(
                ctx,
                &stats,
                self.session.enemies_remaining(),
                self.session.boost_active(),
                self.seed,
            );
        }

        let origin = Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y);
        draw_map(ctx, &self.map, origin);
        self.session.each_renderable(|point, renderable| {
            ctx.set(
                origin.x + point.x,
                origin.y + point.y,
                renderable.color,
                RGB::named(BLACK),
                renderable.glyph,
            );
        });

        draw_log(ctx, &self.message_log, LOG_PANEL_START);

        if let Some(outcome) = self.session.outcome() {
            draw_outcome(ctx, outcome);
        }
    }
}

impl GameState for GloomcrawlState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let key = self.script.as_mut().and_then(|script| script.next_key()).or(ctx.key);
        self.handle_input(ctx, key);

        self.time_bank_ms += ctx.frame_time_ms;
        let elapsed = self.time_bank_ms.floor();
        if elapsed >= 1.0 {
            self.time_bank_ms -= elapsed;
            self.session.advance(&self.map, elapsed as u64);
        }

        self.flush_session_log();
        self.announce_outcome();
        ctx.cls();
        self.draw_scene(ctx);
    }
}

fn load_script() -> Option<ScriptedInput> {
    let path = std::env::var("GLOOMCRAWL_SCRIPT").ok()?;
    match ScriptedInput::from_file(&path) {
        Ok(script) => Some(script),
        Err(err) => {
            eprintln!("gloomcrawl: could not load script {path}: {err}");
            None
        }
    }
}

fn main() -> BError {
    let context = BTermBuilder::simple80x50()
        .with_title("Gloomcrawl · Buried Halls")
        .build()?;
    let seed = RandomNumberGenerator::new().rand::<u64>();
    let mut state = GloomcrawlState::new_run(seed);
    state.script = load_script();
    main_loop(context, state)
}
