use crate::render::Rgba;

/// Axis-aligned clickable rectangle in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Rendering and input surface the countdown loop runs against.
///
/// One production implementation exists ([`crate::WaylandSurface`]); tests
/// drive the loop with a recording fake. All drawing between `begin_frame`
/// and `end_frame` is presented atomically at `end_frame`.
pub trait Surface {
    /// Current surface dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// True once the user (or compositor) has asked the window to close.
    /// Implementations may pump their event source here; callers query it
    /// exactly once per loop iteration.
    fn should_close(&mut self) -> bool;

    fn begin_frame(&mut self);

    fn end_frame(&mut self);

    fn clear(&mut self, color: Rgba);

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba);

    fn fill_region(&mut self, region: Region, color: Rgba);

    fn outline_region(&mut self, region: Region, thickness: f32, color: Rgba);

    /// Pointer location sampled for the current frame.
    fn pointer_position(&self) -> (f32, f32);

    /// True only on the frame the primary button went from released to
    /// pressed. Holding the button does not re-trigger.
    fn primary_button_just_pressed(&self) -> bool;

    /// Best-effort pacing hint.
    fn set_target_frame_rate(&mut self, fps: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_contains_interior() {
        let r = Region::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(59.5, 45.0));
    }

    #[test]
    fn test_region_excludes_far_edges() {
        let r = Region::new(10.0, 20.0, 100.0, 50.0);
        assert!(!r.contains(110.0, 45.0));
        assert!(!r.contains(59.5, 70.0));
    }

    #[test]
    fn test_region_excludes_outside() {
        let r = Region::new(10.0, 20.0, 100.0, 50.0);
        assert!(!r.contains(9.9, 45.0));
        assert!(!r.contains(59.5, 19.9));
        assert!(!r.contains(-5.0, -5.0));
    }
}
