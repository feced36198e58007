use crate::fov::ViewRay;
use crate::surface::{pack_rgb, PixelSurface};
use crate::viewer::Viewer;
use crate::world::GridMap;

/// Overhead debug view: scaled map cells, the viewer disc, one line per
/// valid fan ray, and a facing indicator. Illustrative only; everything
/// here is coordinate scaling.
pub struct TopDown {
    pub background: u32,
    pub wall: u32,
    pub grid_line: u32,
    pub viewer_color: u32,
    pub ray: u32,
    pub facing: u32,
    pub block_size: f64,
    pub viewer_radius: f64,
}

impl TopDown {
    pub fn new(block_size: f64) -> Self {
        Self {
            background: pack_rgb(0, 0, 0),
            wall: pack_rgb(0, 50, 50),
            grid_line: pack_rgb(70, 10, 10),
            viewer_color: pack_rgb(200, 0, 0),
            ray: pack_rgb(0, 200, 200),
            facing: pack_rgb(0, 200, 0),
            block_size,
            viewer_radius: block_size / 5.0,
        }
    }

    pub fn render<S: PixelSurface>(
        &self,
        surface: &mut S,
        map: &GridMap,
        viewer: &Viewer,
        rays: &[ViewRay],
    ) {
        let (w, h) = surface.size();
        // independent per-axis world-to-surface scale
        let unit_x = w as f64 / (map.cols() as f64 * self.block_size);
        let unit_y = h as f64 / (map.rows() as f64 * self.block_size);
        let sx = |wx: f64| (wx * unit_x) as f32;
        let sy = |wy: f64| (wy * unit_y) as f32;

        surface.clear(self.background);

        let cell_w = sx(self.block_size);
        let cell_h = sy(self.block_size);
        for row in 0..map.rows() {
            for col in 0..map.cols() {
                if map.at(col as i64, row as i64) != Some(0) {
                    surface.fill_rect(
                        sx(col as f64 * self.block_size),
                        sy(row as f64 * self.block_size),
                        cell_w,
                        cell_h,
                        self.wall,
                    );
                }
            }
        }

        for row in 0..=map.rows() {
            let y = sy(row as f64 * self.block_size);
            surface.stroke_line(0.0, y, w, y, self.grid_line);
        }
        for col in 0..=map.cols() {
            let x = sx(col as f64 * self.block_size);
            surface.stroke_line(x, 0.0, x, h, self.grid_line);
        }

        let vx = sx(viewer.coord.x);
        let vy = sy(viewer.coord.y);
        for ray in rays {
            if let Some(dh) = ray.hit {
                surface.stroke_line(vx, vy, sx(dh.hit.at.x), sy(dh.hit.at.y), self.ray);
            }
        }

        let reach = self.block_size * 0.75;
        surface.stroke_line(
            vx,
            vy,
            sx(viewer.coord.x + viewer.angle.cos() * reach),
            sy(viewer.coord.y + viewer.angle.sin() * reach),
            self.facing,
        );
        let radius = (self.viewer_radius * (unit_x + unit_y) / 2.0) as f32;
        surface.fill_circle(vx, vy, radius.max(1.0), self.viewer_color);
    }
}
