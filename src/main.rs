use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{EngineConfig, ViewMode};
use crate::fov::sample_fan;
use crate::perspective::Perspective;
use crate::raycast::Coordinate;
use crate::surface::Framebuffer;
use crate::texture::{Texture, TextureSet};
use crate::topdown::TopDown;
use crate::viewer::{MoveDir, Viewer};
use crate::world::GridMap;

mod config;
mod fov;
mod perspective;
mod raycast;
mod surface;
mod texture;
mod topdown;
mod viewer;
mod world;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    cfg: EngineConfig,
    mode: ViewMode,
    map: GridMap,
    viewer: Viewer,
    perspective: Perspective,
    topdown: TopDown,

    fb: Framebuffer,
    inset: Framebuffer,

    keys_down: HashSet<KeyCode>,
    last_tick: Instant,

    frame_counter: u32,
    last_fps_log: Instant,
}

impl App {
    fn new(cfg: EngineConfig, map: GridMap, viewer: Viewer, textures: TextureSet) -> Self {
        let perspective = Perspective::new(cfg.block_size, textures);
        let topdown = TopDown::new(cfg.block_size);
        Self {
            window: None,
            surface: None,
            cfg,
            mode: ViewMode::Perspective,
            map,
            viewer,
            perspective,
            topdown,
            fb: Framebuffer::new(0, 0),
            inset: Framebuffer::new(0, 0),
            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            frame_counter: 0,
            last_fps_log: Instant::now(),
        }
    }

    fn tick(&mut self) {
        // Cap dt so a paused app does not teleport the viewer
        let now = Instant::now();
        let mut dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        if dt > Duration::from_millis(100) {
            dt = Duration::from_millis(100);
        }
        let dt_s = dt.as_secs_f64();

        if self.keys_down.contains(&KeyCode::ArrowLeft) {
            self.viewer.turn(-self.cfg.turn_speed * dt_s);
        }
        if self.keys_down.contains(&KeyCode::ArrowRight) {
            self.viewer.turn(self.cfg.turn_speed * dt_s);
        }
        if self.keys_down.contains(&KeyCode::ArrowUp) {
            self.viewer.look_up_down(self.cfg.look_speed * dt_s);
        }
        if self.keys_down.contains(&KeyCode::ArrowDown) {
            self.viewer.look_up_down(-self.cfg.look_speed * dt_s);
        }

        // Each direction is gated by its own collision cast
        let moves = [
            (KeyCode::KeyW, MoveDir::Forward),
            (KeyCode::KeyS, MoveDir::Backward),
            (KeyCode::KeyA, MoveDir::StrafeLeft),
            (KeyCode::KeyD, MoveDir::StrafeRight),
        ];
        for (key, dir) in moves {
            if self.keys_down.contains(&key) {
                self.viewer
                    .try_move(dir, dt_s, self.cfg.block_size, &self.map);
            }
        }
    }

    fn render(&mut self) {
        let fan = sample_fan(
            &self.viewer,
            self.cfg.block_size,
            &self.map,
            self.cfg.ray_count,
            self.cfg.fov_degrees,
        );
        match self.mode {
            ViewMode::TopDown => {
                self.topdown.render(&mut self.fb, &self.map, &self.viewer, &fan);
            }
            ViewMode::Perspective => {
                self.perspective.render(&mut self.fb, &fan, &self.viewer);
            }
            ViewMode::Split => {
                self.perspective.render(&mut self.fb, &fan, &self.viewer);
                self.inset
                    .resize(self.fb.width() / 3, self.fb.height() / 3);
                self.topdown
                    .render(&mut self.inset, &self.map, &self.viewer, &fan);
                self.fb.blit(&self.inset, 8, 8);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(960.0, 720.0));

        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        let size = window.inner_size();
        self.fb.resize(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        self.window = Some(window);

        self.last_tick = Instant::now();
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            match code {
                                KeyCode::Escape => event_loop.exit(),
                                KeyCode::Digit1 => self.mode = ViewMode::TopDown,
                                KeyCode::Digit2 => self.mode = ViewMode::Perspective,
                                KeyCode::Digit3 => self.mode = ViewMode::Split,
                                _ => {}
                            }
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();

                let size = match &self.window {
                    Some(w) if w.id() == id => w.inner_size(),
                    _ => return,
                };
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // minimized
                }

                self.fb.resize(dw, dh);
                self.render();

                let Some(surface) = self.surface.as_mut() else {
                    return;
                };
                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .unwrap();
                let mut buf = surface.buffer_mut().expect("buffer_mut");
                if buf.len() == self.fb.pixels().len() {
                    buf.copy_from_slice(self.fb.pixels());
                }
                buf.present().unwrap();

                self.frame_counter += 1;
                let now = Instant::now();
                if now.duration_since(self.last_fps_log).as_secs_f32() >= 1.0 {
                    let fps = self.frame_counter as f32
                        / now.duration_since(self.last_fps_log).as_secs_f32();
                    debug!(
                        "fps {:.1}, viewer ({:.1}, {:.1}) angle {:.3}",
                        fps, self.viewer.coord.x, self.viewer.coord.y, self.viewer.angle
                    );
                    self.frame_counter = 0;
                    self.last_fps_log = now;
                }

                self.window.as_ref().unwrap().request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                self.fb
                    .resize(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// The starting level: a walled border with a few interior obstacles.
fn starter_map() -> GridMap {
    let mut map = GridMap::bordered(10, 15, 1);
    map.set(1, 1, 1);
    map.set(7, 1, 1);
    map.set(7, 2, 2);
    map
}

fn load_textures() -> Option<TextureSet> {
    let mut set = TextureSet::new();
    let assets = [
        (1u8, "resources/textures/bricks.csv"),
        (2u8, "resources/textures/cross.csv"),
    ];
    for (wall, path) in assets {
        match Texture::load(path) {
            Ok(tex) => {
                info!("texture {path} ({size}x{size}) -> wall type {wall}", size = tex.size());
                set.insert(wall, tex);
            }
            Err(err) => {
                error!("cannot load texture {path}: {err}");
                return None;
            }
        }
    }
    Some(set)
}

fn main() {
    TermLogger::init(
        LevelFilter::Debug,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("install logger");

    let cfg = EngineConfig::default();
    let Some(textures) = load_textures() else {
        std::process::exit(1);
    };

    let map = starter_map();
    let viewer = Viewer::new(
        Coordinate::new(
            map.cols() as f64 * cfg.block_size / 2.0,
            map.rows() as f64 * cfg.block_size / 2.0,
        ),
        0.0,
        cfg.move_speed,
    );
    info!(
        "world {}x{} cells, {} rays across {} degrees",
        map.cols(),
        map.rows(),
        cfg.ray_count,
        cfg.fov_degrees
    );

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cfg, map, viewer, textures);
    let _ = event_loop.run_app(&mut app);
}
