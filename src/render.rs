use tiny_skia::{Color, Paint, PathBuilder, PixmapMut, Rect, Stroke, Transform};

use crate::surface::Region;

/// Software canvas over one Argb8888 shm buffer.
pub struct Canvas<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let Some(mut pixmap) = PixmapMut::from_bytes(self.data, self.width, self.height) else {
            return;
        };
        pixmap.fill(color);
    }

    pub fn fill_region(&mut self, region: Region, color: Color) {
        let Some(mut pixmap) = PixmapMut::from_bytes(self.data, self.width, self.height) else {
            return;
        };

        let rect = match Rect::from_xywh(region.x, region.y, region.width, region.height) {
            Some(r) => r,
            None => return,
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = false;

        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    pub fn outline_region(&mut self, region: Region, thickness: f32, color: Color) {
        let Some(mut pixmap) = PixmapMut::from_bytes(self.data, self.width, self.height) else {
            return;
        };

        let rect = match Rect::from_xywh(region.x, region.y, region.width, region.height) {
            Some(r) => r,
            None => return,
        };
        let path = PathBuilder::from_rect(rect);

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = false;

        let stroke = Stroke {
            width: thickness,
            ..Stroke::default()
        };

        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Convert from tiny-skia's RGBA to Wayland's BGRA format.
    /// Call this after all drawing is complete, before sending to compositor.
    pub fn finalize_for_wayland(&mut self) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.swap(0, 2); // Swap R (index 0) with B (index 2)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub fn to_text_color(self) -> cosmic_text::Color {
        cosmic_text::Color::rgba(self.r, self.g, self.b, self.a)
    }
}

// Common colors
impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}
