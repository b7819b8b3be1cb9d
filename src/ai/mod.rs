#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;

// One wander step: the X axis rolls first, and the Y axis is only
// consulted when the X roll lands on exactly 0. Roughly one step in
// three ends up vertical, and a zero Y roll stands still.
pub fn roll_wander_step(rng: &mut RandomNumberGenerator) -> Point {
    let dx = rng.range(-1, 2);
    if dx != 0 {
        Point::new(dx, 0)
    } else {
        Point::new(0, rng.range(-1, 2))
    }
}
