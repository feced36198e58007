/// Which projector(s) draw the frame. Passed by value into the render
/// dispatch each frame; there is no ambient mode state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    TopDown,
    Perspective,
    /// Perspective view with a scaled top-down inset.
    Split,
}

/// Engine tunables, fixed at startup. The defaults are the tuned values;
/// everything here is plain data and safe to override before the loop
/// starts.
pub struct EngineConfig {
    /// World-space edge length of one grid cell.
    pub block_size: f64,
    /// Rays per fan; one screen column each.
    pub ray_count: usize,
    /// Angular width of the fan, centered on the facing angle.
    pub fov_degrees: f64,
    /// World units per second.
    pub move_speed: f64,
    /// Radians per second.
    pub turn_speed: f64,
    /// Look offset degrees per second.
    pub look_speed: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: 80.0,
            ray_count: 240,
            fov_degrees: 60.0,
            move_speed: 150.0,
            turn_speed: 2.4,
            look_speed: 90.0,
        }
    }
}
