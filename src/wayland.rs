use std::time::{Duration, Instant};

use smithay_client_toolkit::reexports::client::EventQueue;

use crate::app::App;
use crate::input::{PointerButton, PointerEventKind};
use crate::render::Rgba;
use crate::surface::{Region, Surface};
use crate::text::TextRenderer;

enum DrawCmd {
    Clear(Rgba),
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Rgba,
    },
    Fill(Region, Rgba),
    Outline(Region, f32, Rgba),
}

/// [`Surface`] backed by a Wayland window.
///
/// Draw calls between `begin_frame` and `end_frame` are buffered and replayed
/// onto a fresh shm buffer at `end_frame`, so a frame is always presented as
/// a whole. Input is pumped in `should_close`, once per loop iteration, which
/// is what gives `primary_button_just_pressed` its per-frame edge semantics.
pub struct WaylandSurface {
    app: App,
    event_queue: EventQueue<App>,
    text: TextRenderer,
    commands: Vec<DrawCmd>,
    pressed_edge: bool,
    frame_budget: Option<Duration>,
    last_frame: Instant,
}

impl WaylandSurface {
    /// Connect to the compositor and open the window. Blocks until the
    /// initial configure so that `size` reports real dimensions.
    ///
    /// Any failure here is fatal for the caller: there is nothing to retry.
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (mut app, mut event_queue) = App::new()?;
        let qh = event_queue.handle();
        app.create_window(&qh, title, width, height, fullscreen);

        while app.running && !app.is_configured() {
            event_queue.blocking_dispatch(&mut app)?;
        }

        if let Some((w, h)) = app.window_size() {
            log::info!("window configured at {w}x{h} (fullscreen: {fullscreen})");
        }

        Ok(Self {
            app,
            event_queue,
            text: TextRenderer::new(),
            commands: Vec::new(),
            pressed_edge: false,
            frame_budget: None,
            last_frame: Instant::now(),
        })
    }
}

impl Surface for WaylandSurface {
    fn size(&self) -> (u32, u32) {
        self.app.window_size().unwrap_or((1, 1))
    }

    fn should_close(&mut self) -> bool {
        if let Err(err) = self.event_queue.roundtrip(&mut self.app) {
            log::warn!("wayland dispatch failed: {err}");
            return true;
        }

        // One snapshot per frame: a press event drained here is observed
        // exactly once, no matter how long the button stays down.
        self.pressed_edge = self
            .app
            .poll_pointer_events()
            .iter()
            .any(|event| event.kind == PointerEventKind::Press(PointerButton::Left));

        !self.app.running
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn end_frame(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        let text = &mut self.text;
        self.app.render_window(|canvas| {
            for cmd in &commands {
                match cmd {
                    DrawCmd::Clear(color) => canvas.clear(color.to_color()),
                    DrawCmd::Text {
                        text: s,
                        x,
                        y,
                        size,
                        color,
                    } => text.draw_text(
                        canvas,
                        s,
                        *x as i32,
                        *y as i32,
                        *size,
                        color.to_text_color(),
                    ),
                    DrawCmd::Fill(region, color) => canvas.fill_region(*region, color.to_color()),
                    DrawCmd::Outline(region, thickness, color) => {
                        canvas.outline_region(*region, *thickness, color.to_color())
                    }
                }
            }
        });

        if let Some(budget) = self.frame_budget {
            let elapsed = self.last_frame.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
        self.last_frame = Instant::now();
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCmd::Clear(color));
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }

    fn fill_region(&mut self, region: Region, color: Rgba) {
        self.commands.push(DrawCmd::Fill(region, color));
    }

    fn outline_region(&mut self, region: Region, thickness: f32, color: Rgba) {
        self.commands.push(DrawCmd::Outline(region, thickness, color));
    }

    fn pointer_position(&self) -> (f32, f32) {
        let (x, y) = self.app.pointer_position();
        (x as f32, y as f32)
    }

    fn primary_button_just_pressed(&self) -> bool {
        self.pressed_edge
    }

    fn set_target_frame_rate(&mut self, fps: u32) {
        self.frame_budget = (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64));
    }
}
