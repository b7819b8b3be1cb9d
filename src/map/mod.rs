#![allow(dead_code)]

use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;

pub const MAP_COLUMNS: i32 = 40;
pub const MAP_ROWS: i32 = 24;

const ROOM_COUNT_MIN: i32 = 5;
const ROOM_COUNT_MAX: i32 = 10;
const ROOM_EDGE_MIN: i32 = 3;
const ROOM_EDGE_MAX: i32 = 8;
const CORRIDOR_COUNT_MIN: i32 = 3;
const CORRIDOR_COUNT_MAX: i32 = 5;
const CORRIDOR_SPACING: i32 = 2;

const ROOM_RETRY_LIMIT: usize = 32;
const CORRIDOR_RETRY_LIMIT: usize = 32;
const CELL_RETRY_LIMIT: usize = 512;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Floor,
    Sword,
    Heal,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Blueprint {
    pub rooms: Vec<Rect>,
    pub row_corridors: Vec<i32>,
    pub col_corridors: Vec<i32>,
}

impl Blueprint {
    pub fn procedural(rng: &mut RandomNumberGenerator) -> Self {
        let mut blueprint = Self::default();

        let room_count = rng.range(ROOM_COUNT_MIN, ROOM_COUNT_MAX + 1);
        for _ in 0..room_count {
            if !blueprint.try_place_room(rng) {
                eprintln!("gloomcrawl: dropped a room after {ROOM_RETRY_LIMIT} rerolls");
            }
        }

        blueprint.row_corridors = corridor_coords(rng, MAP_ROWS);
        blueprint.col_corridors = corridor_coords(rng, MAP_COLUMNS);
        blueprint
    }

    fn try_place_room(&mut self, rng: &mut RandomNumberGenerator) -> bool {
        for _ in 0..ROOM_RETRY_LIMIT {
            let room_w = rng.range(ROOM_EDGE_MIN, ROOM_EDGE_MAX + 1);
            let room_h = rng.range(ROOM_EDGE_MIN, ROOM_EDGE_MAX + 1);
            let room_x = rng.range(0, MAP_COLUMNS - room_w + 1);
            let room_y = rng.range(0, MAP_ROWS - room_h + 1);

            // Only an exact top-left coordinate reuse forces a reroll; rooms
            // whose coordinates merely differ are allowed to overlap.
            if self
                .rooms
                .iter()
                .any(|room| room.x1 == room_x || room.y1 == room_y)
            {
                continue;
            }

            self.rooms
                .push(Rect::with_size(room_x, room_y, room_w, room_h));
            return true;
        }
        false
    }
}

fn corridor_coords(rng: &mut RandomNumberGenerator, span: i32) -> Vec<i32> {
    let count = rng.range(CORRIDOR_COUNT_MIN, CORRIDOR_COUNT_MAX + 1);
    let mut coords: Vec<i32> = Vec::new();
    for _ in 0..count {
        let mut placed = false;
        for _ in 0..CORRIDOR_RETRY_LIMIT {
            let coord = rng.range(0, span);
            // Corridors keep a two-cell gap from earlier ones on the same axis.
            if coords
                .iter()
                .any(|&used| (used - coord).abs() <= CORRIDOR_SPACING)
            {
                continue;
            }
            coords.push(coord);
            placed = true;
            break;
        }
        if !placed {
            eprintln!("gloomcrawl: dropped a corridor after {CORRIDOR_RETRY_LIMIT} rerolls");
        }
    }
    coords
}

#[derive(Clone, Debug)]
pub struct PlacedItems {
    pub swords: Vec<Point>,
    pub heals: Vec<Point>,
}

#[derive(Clone, Debug)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileKind>,
}

impl GameMap {
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![kind; size],
        }
    }

    pub fn generate(rng: &mut RandomNumberGenerator) -> Self {
        Self::from_blueprint(&Blueprint::procedural(rng))
    }

    pub fn from_blueprint(blueprint: &Blueprint) -> Self {
        let mut map = Self::filled(MAP_COLUMNS, MAP_ROWS, TileKind::Wall);

        for room in &blueprint.rooms {
            room.for_each(|pt| map.set_kind(pt, TileKind::Floor));
        }

        for &row in &blueprint.row_corridors {
            for x in 0..map.width {
                map.set_kind(Point::new(x, row), TileKind::Floor);
            }
        }

        for &col in &blueprint.col_corridors {
            for y in 0..map.height {
                map.set_kind(Point::new(col, y), TileKind::Floor);
            }
        }

        map
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn kind_at(&self, point: Point) -> TileKind {
        self.idx(point.x, point.y)
            .map_or(TileKind::Wall, |idx| self.tiles[idx])
    }

    pub fn set_kind(&mut self, point: Point, kind: TileKind) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.tiles[idx] = kind;
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.kind_at(point).is_walkable()
    }

    pub fn floor_cells(&self) -> Vec<Point> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.kind_at(point) == TileKind::Floor {
                    cells.push(point);
                }
            }
        }
        cells
    }

    pub fn first_floor_cell(&self) -> Option<Point> {
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.kind_at(point) == TileKind::Floor {
                    return Some(point);
                }
            }
        }
        None
    }

    // Reject-and-resample with a bounded retry cap; a linear scan is the
    // degraded fallback once the cap is hit.
    pub fn sample_floor_cell(&self, rng: &mut RandomNumberGenerator) -> Option<Point> {
        for _ in 0..CELL_RETRY_LIMIT {
            let point = Point::new(rng.range(0, self.width), rng.range(0, self.height));
            if self.kind_at(point) == TileKind::Floor {
                return Some(point);
            }
        }
        eprintln!("gloomcrawl: floor sampling retries exhausted, falling back to scan");
        self.first_floor_cell()
    }

    pub fn place_items(
        &mut self,
        rng: &mut RandomNumberGenerator,
        sword_count: usize,
        heal_count: usize,
    ) -> PlacedItems {
        let swords = self.mark_item_cells(rng, sword_count, TileKind::Sword);
        let heals = self.mark_item_cells(rng, heal_count, TileKind::Heal);
        PlacedItems { swords, heals }
    }

    fn mark_item_cells(
        &mut self,
        rng: &mut RandomNumberGenerator,
        count: usize,
        kind: TileKind,
    ) -> Vec<Point> {
        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            match self.sample_floor_cell(rng) {
                Some(point) => {
                    // The cell keeps its item kind for the rest of the session;
                    // live item presence is tracked by the roster, not the grid.
                    self.set_kind(point, kind);
                    cells.push(point);
                }
                None => {
                    eprintln!("gloomcrawl: no floor left for {kind:?}, dropping the rest");
                    break;
                }
            }
        }
        cells
    }
}
