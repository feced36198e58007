use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::world::{GridMap, WallType};

pub const PI_HALF: f64 = FRAC_PI_2;
pub const PI_THREE_HALF: f64 = 3.0 * FRAC_PI_2;

/// Grid-line steps a single march takes before giving up. Acts as the
/// depth-of-field limit; hits past it do not exist.
pub const DEPTH_OF_FIELD: usize = 100;

/// Wraps an angle into [0, 2π). Single-step correction; the input must be
/// within one revolution of range.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle >= TAU {
        angle - TAU
    } else if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(self, other: Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which family of grid lines the ray crossed at the hit: `Horizontal` is a
/// constant-y line, `Vertical` a constant-x line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A resolved wall intersection. Misses (out of bounds, depth exceeded,
/// degenerate angle on both axes) are represented as `None` at the `cast`
/// boundary, never as sentinel values.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub at: Coordinate,
    pub axis: Axis,
    pub wall: WallType,
    pub angle: f64,
    pub dist: f64,
}

/// Steps along one family of grid lines until a wall cell, the map edge, or
/// the depth ceiling.
fn march(
    start: Coordinate,
    x_off: f64,
    y_off: f64,
    block_size: f64,
    axis: Axis,
    map: &GridMap,
) -> Option<(Coordinate, WallType)> {
    let mut ix = start.x;
    let mut iy = start.y;
    for _ in 0..DEPTH_OF_FIELD {
        let mut col = (ix / block_size).floor() as i64;
        let mut row = (iy / block_size).floor() as i64;

        // Stepping against the positive axis direction means the cell the
        // ray travels through sits on the near side of the boundary line.
        if axis == Axis::Horizontal && y_off < 0.0 {
            row -= 1;
        }
        if axis == Axis::Vertical && x_off < 0.0 {
            col -= 1;
        }

        match map.at(col, row) {
            None => return None,
            Some(wall) if wall != 0 => return Some((Coordinate::new(ix, iy), wall)),
            Some(_) => {
                ix += x_off;
                iy += y_off;
            }
        }
    }
    None
}

/// Nearest wall along the constant-y grid lines. `None` for the degenerate
/// angles 0 and π, where the ray never crosses this family.
fn cast_horizontal(origin: Coordinate, angle: f64, block_size: f64, map: &GridMap) -> Option<Hit> {
    if angle == 0.0 || angle == PI {
        return None;
    }

    let a = -1.0 / angle.tan();
    let mut x_off = block_size * a;
    let mut y_off = block_size;
    let mut iy = (origin.y / block_size).floor() * block_size;
    if angle > PI {
        // heading toward -y, walk down from the line below the origin
        y_off = -block_size;
    } else {
        // heading toward +y, the first crossing is one line up
        iy += block_size;
        x_off = -x_off;
    }
    let ix = (origin.y - iy) * a + origin.x;

    let (at, wall) = march(Coordinate::new(ix, iy), x_off, y_off, block_size, Axis::Horizontal, map)?;
    Some(Hit {
        at,
        axis: Axis::Horizontal,
        wall,
        angle,
        dist: origin.distance_to(at),
    })
}

/// Nearest wall along the constant-x grid lines. `None` for π/2 and 3π/2.
fn cast_vertical(origin: Coordinate, angle: f64, block_size: f64, map: &GridMap) -> Option<Hit> {
    if angle == PI_HALF || angle == PI_THREE_HALF {
        return None;
    }

    let a = -angle.tan();
    let mut x_off = block_size;
    let mut y_off = block_size * a;
    let mut ix = (origin.x / block_size).floor() * block_size;
    if angle < PI_HALF || angle > PI_THREE_HALF {
        // heading toward +x, the first crossing is one line right
        ix += block_size;
        y_off = -y_off;
    } else {
        // heading toward -x
        x_off = -block_size;
    }
    let iy = (origin.x - ix) * a + origin.y;

    let (at, wall) = march(Coordinate::new(ix, iy), x_off, y_off, block_size, Axis::Vertical, map)?;
    Some(Hit {
        at,
        axis: Axis::Vertical,
        wall,
        angle,
        dist: origin.distance_to(at),
    })
}

/// Casts a single ray: both axis marches run independently and the nearer
/// valid hit wins. Ties go to the horizontal march.
pub fn cast(origin: Coordinate, angle: f64, block_size: f64, map: &GridMap) -> Option<Hit> {
    let horizontal = cast_horizontal(origin, angle, block_size, map);
    let vertical = cast_vertical(origin, angle, block_size, map);
    match (horizontal, vertical) {
        (Some(h), Some(v)) => Some(if h.dist > v.dist { v } else { h }),
        (h, v) => h.or(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEG: f64 = PI / 180.0;

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() <= 0.01
    }

    fn assert_hit_at(hit: Option<Hit>, x: f64, y: f64) {
        let hit = hit.expect("expected a hit");
        assert!(
            close_to(hit.at.x, x) && close_to(hit.at.y, y),
            "expected hit at ({x}, {y}), got ({}, {})",
            hit.at.x,
            hit.at.y,
        );
    }

    /// 3x3 map of `wall` with the center cell open.
    fn open_center_map() -> GridMap {
        let mut rows = vec![vec![1u8; 3]; 3];
        rows[1][1] = 0;
        GridMap::new(rows).unwrap()
    }

    fn filled_map(cols: usize, rows: usize) -> GridMap {
        GridMap::new(vec![vec![1u8; cols]; rows]).unwrap()
    }

    #[test]
    fn normalize_wraps_one_revolution() {
        for &a in &[0.0, 0.1, PI_HALF, PI, 4.0, TAU - 1e-9] {
            assert!(close_to(normalize_angle(a), a));
            assert!(close_to(normalize_angle(a + TAU), a));
            assert!(close_to(normalize_angle(a - TAU), a));
        }
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn normalized_angles_stay_in_range() {
        for i in 0..64 {
            let a = -TAU + i as f64 * (2.0 * TAU / 64.0);
            let n = normalize_angle(a);
            assert!((0.0..TAU).contains(&n), "normalize({a}) = {n}");
        }
    }

    #[test]
    fn horizontal_march_degenerate_angles() {
        let map = filled_map(20, 20);
        let origin = Coordinate::new(1.0, 1.0);
        assert!(cast_horizontal(origin, 0.0, 1.0, &map).is_none());
        assert!(cast_horizontal(origin, PI, 1.0, &map).is_none());
    }

    #[test]
    fn vertical_march_degenerate_angles() {
        let map = filled_map(20, 20);
        let origin = Coordinate::new(1.0, 1.0);
        assert!(cast_vertical(origin, PI_HALF, 1.0, &map).is_none());
        assert!(cast_vertical(origin, PI_THREE_HALF, 1.0, &map).is_none());
    }

    #[test]
    fn horizontal_march_octants() {
        let map = open_center_map();
        let origin = Coordinate::new(7.5, 7.5);
        let bs = 5.0;

        // straight up / down
        assert_hit_at(cast_horizontal(origin, PI_HALF, bs, &map), 7.5, 10.0);
        assert_hit_at(cast_horizontal(origin, PI_THREE_HALF, bs, &map), 7.5, 5.0);
        // diagonals, one per quadrant
        assert_hit_at(cast_horizontal(origin, PI_HALF + PI_HALF / 2.0, bs, &map), 5.0, 10.0);
        assert_hit_at(cast_horizontal(origin, PI_HALF - PI_HALF / 2.0, bs, &map), 10.0, 10.0);
        assert_hit_at(cast_horizontal(origin, PI + PI_HALF / 2.0, bs, &map), 5.0, 5.0);
        assert_hit_at(cast_horizontal(origin, PI_THREE_HALF + PI_HALF / 2.0, bs, &map), 10.0, 5.0);
    }

    #[test]
    fn vertical_march_octants() {
        let map = open_center_map();
        let origin = Coordinate::new(7.5, 7.5);
        let bs = 5.0;

        // straight left / right
        assert_hit_at(cast_vertical(origin, PI, bs, &map), 5.0, 7.5);
        assert_hit_at(cast_vertical(origin, 0.0, bs, &map), 10.0, 7.5);
        // diagonals, one per quadrant
        assert_hit_at(cast_vertical(origin, PI_HALF + PI_HALF / 2.0, bs, &map), 5.0, 10.0);
        assert_hit_at(cast_vertical(origin, PI_HALF - PI_HALF / 2.0, bs, &map), 10.0, 10.0);
        assert_hit_at(cast_vertical(origin, PI + PI_HALF / 2.0, bs, &map), 5.0, 5.0);
        assert_hit_at(cast_vertical(origin, PI_THREE_HALF + PI_HALF / 2.0, bs, &map), 10.0, 5.0);
    }

    // Shallow angles across several cells exercise the negative-offset index
    // adjustment: the x drift per row step exceeds a block, so a wrong cell
    // index lands in a different column entirely.
    #[test]
    fn horizontal_march_shallow_angles() {
        let map = filled_map(3, 2);
        let bs = 5.0;

        assert_hit_at(
            cast_horizontal(Coordinate::new(0.0, 0.0), 21.04 * DEG, bs, &map),
            13.0,
            5.0,
        );
        assert_hit_at(
            cast_horizontal(Coordinate::new(15.0, 0.0), 158.96 * DEG, bs, &map),
            2.0,
            5.0,
        );
        // downward rays test the row-index decrement
        assert_hit_at(
            cast_horizontal(Coordinate::new(0.0, 9.99999), 338.96 * DEG, bs, &map),
            13.0,
            5.0,
        );
        assert_hit_at(
            cast_horizontal(Coordinate::new(15.0, 9.99999), 199.65 * DEG, bs, &map),
            1.0,
            5.0,
        );
    }

    #[test]
    fn vertical_march_steep_angles() {
        let map = filled_map(2, 3);
        let bs = 5.0;

        assert_hit_at(
            cast_vertical(Coordinate::new(0.0, 0.0), 67.38 * DEG, bs, &map),
            5.0,
            12.0,
        );
        // leftward rays test the column-index decrement
        assert_hit_at(
            cast_vertical(Coordinate::new(9.9999, 0.0), 112.62 * DEG, bs, &map),
            5.0,
            12.0,
        );
        assert_hit_at(
            cast_vertical(Coordinate::new(0.0, 14.9999), 291.04 * DEG, bs, &map),
            5.0,
            2.0,
        );
        assert_hit_at(
            cast_vertical(Coordinate::new(9.9999, 15.0), 248.96 * DEG, bs, &map),
            5.0,
            2.0,
        );
    }

    #[test]
    fn cardinal_casts_hit_at_half_block() {
        let map = open_center_map();
        let origin = Coordinate::new(7.5, 7.5);
        let bs = 5.0;

        for (angle, axis) in [
            (0.0, Axis::Vertical),
            (PI_HALF, Axis::Horizontal),
            (PI, Axis::Vertical),
            (PI_THREE_HALF, Axis::Horizontal),
        ] {
            let hit = cast(origin, angle, bs, &map).expect("cardinal cast must hit");
            assert_eq!(hit.axis, axis, "axis for angle {angle}");
            assert!(close_to(hit.dist, bs / 2.0), "distance for angle {angle}: {}", hit.dist);
        }
    }

    #[test]
    fn center_of_open_cell_keeps_half_block_clearance() {
        let map = open_center_map();
        let origin = Coordinate::new(7.5, 7.5);
        for i in 0..32 {
            let angle = normalize_angle(i as f64 * TAU / 32.0 + 0.007);
            let hit = cast(origin, angle, 5.0, &map).expect("closed cell, every angle hits");
            assert!(hit.dist >= 2.5 - 1e-9, "angle {angle}: dist {}", hit.dist);
        }
    }

    #[test]
    fn straight_up_hits_horizontal_boundary() {
        // end-to-end: 3x3 walls, open center, facing π/2
        let map = open_center_map();
        let origin = Coordinate::new(7.5, 7.5);
        let hit = cast(origin, PI_HALF, 5.0, &map).unwrap();
        assert_eq!(hit.axis, Axis::Horizontal);
        assert_hit_at(Some(hit), 7.5, 10.0);
    }

    /// 4x4 map of walls with the middle 2x2 open.
    fn pocket_map() -> GridMap {
        let mut rows = vec![vec![1u8; 4]; 4];
        for y in 1..3 {
            for x in 1..3 {
                rows[y][x] = 0;
            }
        }
        GridMap::new(rows).unwrap()
    }

    #[test]
    fn nearer_axis_wins_vertical() {
        let map = pocket_map();
        let hit = cast(Coordinate::new(8.0, 6.0), 40.6 * DEG, 5.0, &map).unwrap();
        assert_eq!(hit.axis, Axis::Vertical);
        assert_hit_at(Some(hit), 15.0, 12.0);
    }

    #[test]
    fn nearer_axis_wins_horizontal() {
        let map = pocket_map();
        let hit = cast(Coordinate::new(8.0, 6.0), 56.31 * DEG, 5.0, &map).unwrap();
        assert_eq!(hit.axis, Axis::Horizontal);
        assert_hit_at(Some(hit), 14.0, 15.0);
    }

    #[test]
    fn diagonal_through_pocket_picks_nearer_corner() {
        // at 45° both marches find corner hits; the vertical one is nearer
        // and must win regardless of march evaluation order
        let map = pocket_map();
        let origin = Coordinate::new(8.0, 6.0);
        let hit = cast(origin, PI / 4.0, 5.0, &map).unwrap();
        assert_eq!(hit.axis, Axis::Vertical);
        assert_hit_at(Some(hit), 15.0, 13.0);
        assert!(hit.dist < cast_horizontal(origin, PI / 4.0, 5.0, &map).unwrap().dist);
    }

    #[test]
    fn open_map_is_a_miss() {
        let map = GridMap::new(vec![vec![0u8; 40]; 40]).unwrap();
        let origin = Coordinate::new(100.0, 100.0);
        for i in 0..16 {
            let angle = normalize_angle(i as f64 * TAU / 16.0 + 0.013);
            assert!(cast(origin, angle, 5.0, &map).is_none());
        }
    }

    // Corridor 3 cells wide with open sides: the vertical march exits the
    // map almost immediately, so the horizontal march is the only candidate
    // and the step ceiling is the binding constraint.
    fn corridor_map(rows: usize) -> GridMap {
        let mut cells = vec![vec![0u8; 3]; rows];
        cells[rows - 1] = vec![1, 1, 1];
        GridMap::new(cells).unwrap()
    }

    #[test]
    fn depth_ceiling_caps_the_march() {
        let bs = 5.0;
        let near_up = 89.9 * DEG;
        let origin = Coordinate::new(7.5, 2.5);

        // end wall within the ceiling: hit, and never past the cap
        let short = corridor_map(80);
        let hit = cast(origin, near_up, bs, &short).expect("corridor end within reach");
        assert_eq!(hit.axis, Axis::Horizontal);
        assert!(hit.dist <= DEPTH_OF_FIELD as f64 * bs);

        // end wall beyond the ceiling: the march gives up
        let long = corridor_map(120);
        assert!(cast(origin, near_up, bs, &long).is_none());
    }

    #[test]
    fn hit_carries_wall_type_and_angle() {
        let mut rows = vec![vec![1u8; 3]; 3];
        rows[1][1] = 0;
        rows[0][1] = 7;
        let map = GridMap::new(rows).unwrap();
        let hit = cast(Coordinate::new(7.5, 7.5), PI_THREE_HALF, 5.0, &map).unwrap();
        assert_eq!(hit.wall, 7);
        assert_eq!(hit.angle, PI_THREE_HALF);
    }
}
