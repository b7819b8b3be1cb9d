#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use serde::Serialize;

use crate::map::GameMap;

// Snapshot of the grid used by everything that moves. The step rule is
// the single movement contract: toroidal wrap at the edges, walls reject
// the step and leave the mover in place.
#[derive(Clone)]
pub struct TerrainContext {
    pub width: i32,
    pub height: i32,
    walkable: Vec<bool>,
}

impl TerrainContext {
    pub fn from_map(map: &GameMap) -> Self {
        let mut walkable = Vec::with_capacity((map.width * map.height) as usize);
        for y in 0..map.height {
            for x in 0..map.width {
                walkable.push(map.is_walkable(Point::new(x, y)));
            }
        }
        Self {
            width: map.width,
            height: map.height,
            walkable,
        }
    }

    pub fn wrap(&self, point: Point) -> Point {
        Point::new(point.x.rem_euclid(self.width), point.y.rem_euclid(self.height))
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        if point.x < 0 || point.x >= self.width || point.y < 0 || point.y >= self.height {
            return false;
        }
        let idx = (point.y * self.width + point.x) as usize;
        self.walkable.get(idx).copied().unwrap_or(false)
    }

    pub fn resolve_step(&self, from: Point, delta: Point) -> Point {
        let candidate = self.wrap(Point::new(from.x + delta.x, from.y + delta.y));
        if self.is_walkable(candidate) {
            candidate
        } else {
            from
        }
    }
}

#[derive(Default)]
pub struct EventLog {
    pub entries: Vec<String>,
}

impl EventLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }
}

// Session-relative milliseconds; `delta_ms` is the slice handed to the
// current advance call and is what the periodic timers accumulate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionClock {
    pub now_ms: u64,
    pub delta_ms: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct AssaultTimer {
    pub period_ms: u64,
    pub elapsed_ms: u64,
}

impl AssaultTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0,
        }
    }

    pub fn accumulate(&mut self, delta_ms: u64) -> u64 {
        self.elapsed_ms += delta_ms;
        let fired = self.elapsed_ms / self.period_ms;
        self.elapsed_ms %= self.period_ms;
        fired
    }
}

// Boost reversions are fire-and-forget: a fresh pickup never cancels an
// older deadline, each one independently restores the default damage.
#[derive(Clone, Debug, Default)]
pub struct BoostSchedule {
    pub deadlines: Vec<u64>,
}

impl BoostSchedule {
    pub fn push(&mut self, deadline_ms: u64) {
        self.deadlines.push(deadline_ms);
    }

    pub fn take_due(&mut self, now_ms: u64) -> usize {
        let before = self.deadlines.len();
        self.deadlines.retain(|deadline| *deadline > now_ms);
        before - self.deadlines.len()
    }

    pub fn is_active(&self) -> bool {
        !self.deadlines.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStatus {
    pub enemies_remaining: u32,
    pub outcome: Option<Outcome>,
}

impl SessionStatus {
    // First terminal outcome wins; returns whether this call recorded it.
    pub fn record_outcome(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}
