mod app;
mod countdown;
mod input;
mod render;
mod surface;
mod text;
mod wayland;

pub use app::App;
pub use countdown::{Countdown, INITIAL_SECONDS, Layout, LoopState, TARGET_FPS, run};
pub use input::{PointerButton, PointerEvent, PointerEventKind};
pub use render::{Canvas, Rgba};
pub use surface::{Region, Surface};
pub use text::TextRenderer;
pub use wayland::WaylandSurface;

// Re-export key dependencies for users
pub use cosmic_text::Color as TextColor;
pub use tiny_skia::Color;
