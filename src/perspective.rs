use std::f64::consts::PI;

use crate::fov::{DepthHit, ViewRay};
use crate::raycast::{Axis, Coordinate, PI_HALF, PI_THREE_HALF};
use crate::surface::{pack_rgb, PixelSurface};
use crate::texture::TextureSet;
use crate::viewer::Viewer;

/// Scale applied on top of the projection height formula. Empirically
/// tuned together with the fan FOV; 1.0 matches a 60 degree fan.
pub const HEIGHT_SCALE: f64 = 1.0;

/// How strongly the vertical look offset shifts the horizon, in screen
/// heights per 180 degrees of offset. Tuned.
pub const LOOK_SENSITIVITY: f64 = 3.0;

/// Red tint applied to walls hit across a constant-y line, a cheap
/// directional light.
const HORIZONTAL_SHADE: u8 = 50;

/// Blue level used for wall types with no registered texture.
const FALLBACK_SAMPLE: u8 = 200;

/// Depth floor; a hit this close would project to an unbounded column.
const NEAR_DEPTH: f64 = 0.05;

/// Renders the ray fan as vertical wall slices with flat sky and floor
/// fill. Column i of the fan lands at column i of the surface.
pub struct Perspective {
    pub sky: u32,
    pub floor: u32,
    pub block_size: f64,
    pub height_scale: f64,
    pub look_sensitivity: f64,
    pub textures: TextureSet,
}

impl Perspective {
    pub fn new(block_size: f64, textures: TextureSet) -> Self {
        Self {
            sky: pack_rgb(50, 150, 150),
            floor: pack_rgb(200, 200, 200),
            block_size,
            height_scale: HEIGHT_SCALE,
            look_sensitivity: LOOK_SENSITIVITY,
            textures,
        }
    }

    pub fn render<S: PixelSurface>(&self, surface: &mut S, rays: &[ViewRay], viewer: &Viewer) {
        if rays.is_empty() {
            return;
        }
        let (w, h) = surface.size();
        let col_w = w / rays.len() as f32;
        // walls extend half a column height up and down from here
        let horizon =
            h / 2.0 + (viewer.look * h as f64 * self.look_sensitivity / 180.0) as f32;

        for (i, ray) in rays.iter().enumerate() {
            let x = i as f32 * col_w;
            let Some(DepthHit { hit, depth }) = ray.hit else {
                surface.fill_rect(x, 0.0, col_w, horizon, self.sky);
                surface.fill_rect(x, horizon, col_w, h - horizon, self.floor);
                continue;
            };

            let depth = depth.max(NEAR_DEPTH);
            let col_h =
                ((self.block_size * h as f64 * self.height_scale) / depth) as f32;
            let top = horizon - col_h / 2.0;
            let bot = horizon + col_h / 2.0;

            surface.fill_rect(x, 0.0, col_w, top, self.sky);
            surface.fill_rect(x, bot, col_w, h - bot, self.floor);

            let shade = match hit.axis {
                Axis::Horizontal => HORIZONTAL_SHADE,
                Axis::Vertical => 0,
            };
            match self.textures.get(hit.wall) {
                Some(tex) => {
                    let size = tex.size();
                    let col = texture_column(hit.axis, hit.at, hit.angle, self.block_size, size);
                    let slice_h = col_h / size as f32;
                    for row in 0..size {
                        let y = top + slice_h * row as f32;
                        let color = pack_rgb(shade, 0, tex.at(col, row));
                        surface.fill_rect(x, y, col_w, slice_h, color);
                    }
                }
                None => {
                    let color = pack_rgb(shade, 0, FALLBACK_SAMPLE);
                    surface.fill_rect(x, top, col_w, col_h, color);
                }
            }
        }
    }
}

/// True when the hit face is the left side of a block (vertical-axis hit
/// with the ray heading -x) or the bottom side (horizontal-axis hit heading
/// +y). Those faces are seen "from the other side", so their texture
/// columns are read right to left to keep the image consistent while
/// walking around a block.
fn mirrored(axis: Axis, angle: f64) -> bool {
    match axis {
        Axis::Vertical => angle > PI_HALF && angle < PI_THREE_HALF,
        Axis::Horizontal => angle < PI,
    }
}

/// Horizontal texel index for a hit: position along the wall face modulo
/// one block, scaled into texel units, mirrored where the face demands it.
fn texture_column(
    axis: Axis,
    at: Coordinate,
    angle: f64,
    block_size: f64,
    tex_size: usize,
) -> usize {
    let along = match axis {
        Axis::Horizontal => at.x,
        Axis::Vertical => at.y,
    };
    let texel = block_size / tex_size as f64;
    let idx = (((along % block_size) / texel).floor() as usize).min(tex_size - 1);
    if mirrored(axis, angle) {
        tex_size - 1 - idx
    } else {
        idx
    }
}
