use tickdown::{Rgba, Surface, WaylandSurface};

const FONT_SIZE: f32 = 48.0;
const GLYPH_ADVANCE: f32 = 0.6;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut surface = WaylandSurface::new("tickdown - Hello", 800, 600, false)?;
    surface.set_target_frame_rate(30);

    let greeting = "Hello, World!";
    while !surface.should_close() {
        let (width, height) = surface.size();
        let text_width = greeting.len() as f32 * GLYPH_ADVANCE * FONT_SIZE;

        surface.begin_frame();
        surface.clear(Rgba::rgb(30, 40, 60));
        surface.draw_text(
            greeting,
            width as f32 / 2.0 - text_width / 2.0,
            height as f32 / 2.0 - FONT_SIZE / 2.0,
            FONT_SIZE,
            Rgba::WHITE,
        );
        surface.end_frame();
    }

    Ok(())
}
