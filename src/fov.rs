use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::raycast::{cast, normalize_angle, Hit};
use crate::viewer::Viewer;
use crate::world::GridMap;

/// A hit paired with its fisheye-corrected depth: the raw distance projected
/// onto the viewer's facing direction. Column heights use the corrected
/// depth so flat walls render flat across the whole fan.
#[derive(Clone, Copy, Debug)]
pub struct DepthHit {
    pub hit: Hit,
    pub depth: f64,
}

/// One column's worth of fan output.
#[derive(Clone, Copy, Debug)]
pub struct ViewRay {
    pub angle: f64,
    pub hit: Option<DepthHit>,
}

/// Casts `ray_count` rays fanned evenly across `fov_degrees` around the
/// viewer's facing angle, leftmost angle first. A batch operation, computed
/// fresh each call; index n of the result is screen column n.
///
/// Rays are independent pure casts over the shared read-only map, so the fan
/// runs on rayon workers; the indexed iterator keeps the output ordered.
pub fn sample_fan(
    viewer: &Viewer,
    block_size: f64,
    map: &GridMap,
    ray_count: usize,
    fov_degrees: f64,
) -> Vec<ViewRay> {
    if ray_count == 0 {
        return Vec::new();
    }
    let fov = fov_degrees.to_radians();
    let step = if ray_count > 1 {
        fov / (ray_count - 1) as f64
    } else {
        0.0
    };
    let facing = viewer.angle;
    let start = if ray_count > 1 { facing - fov / 2.0 } else { facing };
    let origin = viewer.coord;

    (0..ray_count)
        .into_par_iter()
        .map(|i| {
            let angle = normalize_angle(start + i as f64 * step);
            let hit = cast(origin, angle, block_size, map).map(|hit| DepthHit {
                hit,
                depth: hit.dist * normalize_angle(angle - facing).cos(),
            });
            ViewRay { angle, hit }
        })
        .collect()
}
