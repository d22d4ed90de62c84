//! RAM copy of the panel
//!
//! Widgets never draw to the controller directly. Every primitive lands in
//! this buffer, which remembers the smallest box enclosing the pixels that
//! actually changed. [`FrameBuffer::flush`] sends just that box to the
//! panel once a dispatch pass is over.
//!
//! Because the buffer holds the whole picture, sliders and meters can save
//! and restore the pixels under their moving parts without reading back
//! from the controller.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::ui::core::Bounds;

/// Off-screen pixel store implementing `DrawTarget<Color = Rgb565>`
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb565>,
    /// Inclusive box of changed pixels since the last flush
    dirty: Option<Bounds>,
}

impl FrameBuffer {
    pub fn new(size: Size, background: Rgb565) -> Self {
        Self {
            size,
            pixels: vec![background; (size.width * size.height) as usize],
            dirty: None,
        }
    }

    /// Read back one pixel. `None` off the panel.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.offset(point).map(|i| self.pixels[i])
    }

    /// Area changed since the last flush
    pub fn dirty_area(&self) -> Option<Bounds> {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Part of the panel covered by `area`, or `None` when they do not meet
    fn clip(&self, area: Bounds) -> Option<Bounds> {
        let clipped = Bounds {
            x0: area.x0.max(0),
            y0: area.y0.max(0),
            x1: area.x1.min(self.size.width as i32 - 1),
            y1: area.y1.min(self.size.height as i32 - 1),
        };
        (clipped.x0 <= clipped.x1 && clipped.y0 <= clipped.y1).then_some(clipped)
    }

    fn offset(&self, point: Point) -> Option<usize> {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        if (0..w).contains(&point.x) && (0..h).contains(&point.y) {
            Some((point.y * w + point.x) as usize)
        } else {
            None
        }
    }

    fn put(&mut self, point: Point, color: Rgb565) {
        let Some(i) = self.offset(point) else {
            return;
        };
        if self.pixels[i] == color {
            return;
        }
        self.pixels[i] = color;
        self.dirty = Some(match self.dirty {
            Some(d) => Bounds {
                x0: d.x0.min(point.x),
                y0: d.y0.min(point.y),
                x1: d.x1.max(point.x),
                y1: d.y1.max(point.y),
            },
            None => Bounds::new(point, 0, 0),
        });
    }

    /// Paint every pixel of the inclusive box `area`
    pub fn fill(&mut self, area: Bounds, color: Rgb565) {
        let Some(area) = self.clip(area) else {
            return;
        };
        for y in area.y0..=area.y1 {
            for x in area.x0..=area.x1 {
                self.put(Point::new(x, y), color);
            }
        }
    }

    /// Copy the pixels of `area` row by row. Points off the panel read as
    /// `outside`.
    pub fn copy_out(&self, area: Bounds, outside: Rgb565) -> Vec<Rgb565> {
        let mut pixels = Vec::with_capacity(((area.width() + 1) * (area.height() + 1)) as usize);
        for y in area.y0..=area.y1 {
            for x in area.x0..=area.x1 {
                pixels.push(self.pixel(Point::new(x, y)).unwrap_or(outside));
            }
        }
        pixels
    }

    /// Write back pixels taken with [`copy_out`](Self::copy_out)
    pub fn copy_in(&mut self, area: Bounds, pixels: &[Rgb565]) {
        let points = (area.y0..=area.y1).flat_map(|y| (area.x0..=area.x1).map(move |x| (x, y)));
        for ((x, y), color) in points.zip(pixels.iter().copied()) {
            self.put(Point::new(x, y), color);
        }
    }

    /// Send the changed area to `display` and start tracking afresh
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(area) = self.dirty.take() else {
            return Ok(());
        };
        trace!(
            "Flushing {}x{} at ({}, {})",
            area.width() + 1,
            area.height() + 1,
            area.x0,
            area.y0
        );
        let stride = self.size.width as usize;
        let pixels = &self.pixels;
        let rows = (area.y0..=area.y1).flat_map(move |y| {
            let start = y as usize * stride + area.x0 as usize;
            let end = y as usize * stride + area.x1 as usize;
            pixels[start..=end].iter().copied()
        });
        display.fill_contiguous(&area.to_rectangle(), rows)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put(point, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        if let Some(bottom_right) = area.bottom_right() {
            self.fill(Bounds::from_corners(area.top_left, bottom_right), color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let whole = Bounds::new(Point::zero(), self.size.width - 1, self.size.height - 1);
        self.fill(whole, color);
        Ok(())
    }
}
