use std::f64::consts::PI;

use crate::raycast::{cast, normalize_angle, Coordinate, PI_HALF};
use crate::world::GridMap;

/// Fraction of a block the viewer must keep between itself and the nearest
/// wall along the movement direction. Tuned, not derived.
pub const COLLISION_GATE: f64 = 0.5;

/// Movement direction relative to the facing angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDir {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl MoveDir {
    fn offset(self) -> f64 {
        match self {
            MoveDir::Forward => 0.0,
            MoveDir::Backward => PI,
            MoveDir::StrafeLeft => -PI_HALF,
            MoveDir::StrafeRight => PI_HALF,
        }
    }
}

/// Per-frame mutable viewer state. Mutated once per frame by the input
/// step, then read by the fan sampler and the projectors.
pub struct Viewer {
    pub coord: Coordinate,
    /// Facing angle, kept normalized in [0, 2π).
    pub angle: f64,
    /// Vertical look offset in degrees, clamped to [-180, 180].
    pub look: f64,
    /// World units per second.
    pub speed: f64,
}

impl Viewer {
    pub fn new(coord: Coordinate, angle: f64, speed: f64) -> Self {
        Self {
            coord,
            angle: normalize_angle(angle),
            look: 0.0,
            speed,
        }
    }

    pub fn turn(&mut self, delta: f64) {
        self.angle = normalize_angle(self.angle + delta);
    }

    pub fn look_up_down(&mut self, delta_degrees: f64) {
        self.look = (self.look + delta_degrees).clamp(-180.0, 180.0);
    }

    /// Gated translation: casts one ray along the candidate direction and
    /// only commits the move when nothing stands within the gate distance.
    /// A point-collision oracle, not a swept check; at speeds near a block
    /// per frame it can tunnel.
    pub fn try_move(
        &mut self,
        dir: MoveDir,
        dt: f64,
        block_size: f64,
        map: &GridMap,
    ) -> bool {
        let travel = normalize_angle(self.angle + dir.offset());
        let blocked = cast(self.coord, travel, block_size, map)
            .is_some_and(|hit| hit.dist <= block_size * COLLISION_GATE);
        if blocked {
            return false;
        }
        let step = self.speed * dt;
        self.coord.x += travel.cos() * step;
        self.coord.y += travel.sin() * step;
        true
    }
}
