#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::{
    ecs::{components::CombatStats, resources::Outcome},
    map::{GameMap, TileKind},
};

// Item cells render as plain floor; live items are drawn from the roster
// on top of the terrain.
pub fn tile_appearance(kind: TileKind) -> (u16, RGB) {
    match kind {
        TileKind::Wall => (b'#' as u16, RGB::from_u8(90, 90, 90)),
        TileKind::Floor | TileKind::Sword | TileKind::Heal => {
            (b'.' as u16, RGB::from_u8(70, 85, 70))
        }
    }
}

pub fn draw_map(ctx: &mut BTerm, map: &GameMap, origin: Point) {
    for y in 0..map.height {
        for x in 0..map.width {
            let (glyph, fg) = tile_appearance(map.kind_at(Point::new(x, y)));
            ctx.set(origin.x + x, origin.y + y, fg, RGB::named(BLACK), glyph);
        }
    }
}

pub fn draw_hud(
    ctx: &mut BTerm,
    stats: &CombatStats,
    enemies_remaining: u32,
    boost_active: bool,
    seed: u64,
) {
    let (width, _) = ctx.get_char_size();
    ctx.draw_box(0, 0, width - 1, 6, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(
        2,
        1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("Gloomcrawl · seed {seed:#018x}"),
    );

    ctx.draw_bar_horizontal(
        2,
        3,
        26,
        stats.hp,
        stats.max_hp,
        RGB::named(RED),
        RGB::named(BLACK),
    );
    ctx.print_color(
        30,
        3,
        RGB::named(GRAY),
        RGB::named(BLACK),
        format!("HP {}/{}", stats.hp, stats.max_hp),
    );

    let damage_line = if boost_active {
        format!("Damage {} (sword boost)", stats.damage)
    } else {
        format!("Damage {}", stats.damage)
    };
    let damage_color = if boost_active {
        RGB::named(LIGHT_BLUE)
    } else {
        RGB::named(GRAY)
    };
    ctx.print_color(2, 4, damage_color, RGB::named(BLACK), damage_line);
    ctx.print_color(
        2,
        5,
        RGB::named(ORANGE),
        RGB::named(BLACK),
        format!("Foes remaining: {enemies_remaining}"),
    );
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(8) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, top + 1, RGB::named(WHITE), RGB::named(BLACK), "Events");
    for (row, entry) in log.iter().take(8).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

pub fn draw_outcome(ctx: &mut BTerm, outcome: Outcome) {
    let (message, color) = match outcome {
        Outcome::Victory => ("The halls fall silent. You prevail.", RGB::named(YELLOW)),
        Outcome::Defeat => ("You fall in the dark.", RGB::named(RED)),
    };
    ctx.print_color_centered(24, color, RGB::named(BLACK), message);
    ctx.print_color_centered(
        26,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "R delves again · Q abandons the run",
    );
}
