//! Drawing surface consumed by the widget engine
//!
//! [`DrawSurface`] is the only way widgets touch pixels. Coordinates are
//! inclusive device pixels, matching [`Bounds`]. While the grey flag is set
//! every colour passed to a primitive goes through the active
//! [`GreyStyle`] first; widget colours themselves are never changed.
//!
//! [`Canvas`] implements the trait over a RAM [`FrameBuffer`] that is
//! flushed to the real panel after each pass.

use alloc::vec::Vec;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::config::GuiConfig;
use crate::error::GuiResult;
use crate::framebuffer::FrameBuffer;
use crate::ui::core::Bounds;
use crate::ui::styling::{GreyStyle, TextStyle};

/// Pixels captured by [`DrawSurface::save_region`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRegion {
    area: Bounds,
    pixels: Vec<Rgb565>,
}

impl SavedRegion {
    pub fn area(&self) -> Bounds {
        self.area
    }
}

/// Abstract 2D drawing target used by every widget
pub trait DrawSurface {
    /// Panel dimensions
    fn size(&self) -> Size;

    /// Process-wide default foreground colour
    fn fgcolor(&self) -> Rgb565;

    /// Process-wide default background colour, also used to blank areas
    fn bgcolor(&self) -> Rgb565;

    /// Font used by widgets that do not choose one
    fn default_font(&self) -> &'static MonoFont<'static>;

    /// Size of the glyph scratch buffer in bytes
    fn glyph_buffer_len(&self) -> usize;

    /// Apply the grey transform to subsequent draw calls
    fn usegrey(&mut self, greyed: bool);

    fn is_grey(&self) -> bool;

    fn grey_style(&self) -> GreyStyle;

    fn set_grey_style(&mut self, style: GreyStyle);

    fn fill_rect(&mut self, area: Bounds, color: Rgb565);

    /// One-pixel outline
    fn draw_rect(&mut self, area: Bounds, color: Rgb565);

    fn fill_rounded_rect(&mut self, area: Bounds, radius: u32, color: Rgb565);

    fn draw_rounded_rect(&mut self, area: Bounds, radius: u32, color: Rgb565);

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565);

    fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb565);

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb565);

    /// Capture the pixels of `area` so they can be put back later
    fn save_region(&mut self, area: Bounds) -> SavedRegion;

    fn restore_region(&mut self, saved: &SavedRegion);

    /// Print one line with its top-left corner at `at`
    fn print_left(&mut self, at: Point, text: &str, style: &TextStyle);

    /// Print one line centred on `center`, clamped to the panel origin
    fn print_centered(&mut self, center: Point, text: &str, style: &TextStyle);

    /// Blank the whole panel with the background colour
    fn clear(&mut self);

    /// Resolve a text style against this surface's glyph buffer
    fn text_style(
        &self,
        fg: Rgb565,
        bg: Rgb565,
        font: &'static MonoFont<'static>,
    ) -> GuiResult<TextStyle> {
        TextStyle::new(fg, bg, font, self.glyph_buffer_len())
    }
}

/// [`DrawSurface`] backed by a RAM framebuffer
pub struct Canvas {
    frame: FrameBuffer,
    fgcolor: Rgb565,
    bgcolor: Rgb565,
    font: &'static MonoFont<'static>,
    glyph_buffer_len: usize,
    grey: GreyStyle,
    greyed: bool,
}

impl Canvas {
    pub fn new(config: &GuiConfig) -> Self {
        Self {
            frame: FrameBuffer::new(config.size(), config.bg()),
            fgcolor: config.fg(),
            bgcolor: config.bg(),
            font: &FONT_6X10,
            glyph_buffer_len: config.glyph_buffer_len,
            grey: config.grey,
            greyed: false,
        }
    }

    /// Use a different default font for widgets that do not pick one
    pub fn with_default_font(mut self, font: &'static MonoFont<'static>) -> Self {
        self.font = font;
        self
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Read back one pixel
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.frame.pixel(point)
    }

    /// Push changed pixels to the real display
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.frame.flush(display)
    }

    fn resolve(&self, color: Rgb565) -> Rgb565 {
        if self.greyed {
            self.grey.apply(color)
        } else {
            color
        }
    }

    fn paint<T>(&mut self, item: T)
    where
        T: EgDrawable<Color = Rgb565>,
    {
        // The framebuffer cannot fail
        let _ = item.draw(&mut self.frame);
    }
}

impl DrawSurface for Canvas {
    fn size(&self) -> Size {
        self.frame.size()
    }

    fn fgcolor(&self) -> Rgb565 {
        self.fgcolor
    }

    fn bgcolor(&self) -> Rgb565 {
        self.bgcolor
    }

    fn default_font(&self) -> &'static MonoFont<'static> {
        self.font
    }

    fn glyph_buffer_len(&self) -> usize {
        self.glyph_buffer_len
    }

    fn usegrey(&mut self, greyed: bool) {
        self.greyed = greyed;
    }

    fn is_grey(&self) -> bool {
        self.greyed
    }

    fn grey_style(&self) -> GreyStyle {
        self.grey
    }

    fn set_grey_style(&mut self, style: GreyStyle) {
        self.grey = style;
    }

    fn fill_rect(&mut self, area: Bounds, color: Rgb565) {
        let color = self.resolve(color);
        self.frame.fill(area, color);
    }

    fn draw_rect(&mut self, area: Bounds, color: Rgb565) {
        let style = PrimitiveStyle::with_stroke(self.resolve(color), 1);
        self.paint(area.to_rectangle().into_styled(style));
    }

    fn fill_rounded_rect(&mut self, area: Bounds, radius: u32, color: Rgb565) {
        let style = PrimitiveStyle::with_fill(self.resolve(color));
        let shape =
            RoundedRectangle::with_equal_corners(area.to_rectangle(), Size::new(radius, radius));
        self.paint(shape.into_styled(style));
    }

    fn draw_rounded_rect(&mut self, area: Bounds, radius: u32, color: Rgb565) {
        let style = PrimitiveStyle::with_stroke(self.resolve(color), 1);
        let shape =
            RoundedRectangle::with_equal_corners(area.to_rectangle(), Size::new(radius, radius));
        self.paint(shape.into_styled(style));
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        let style = PrimitiveStyle::with_fill(self.resolve(color));
        self.paint(Circle::with_center(center, 2 * radius + 1).into_styled(style));
    }

    fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        let style = PrimitiveStyle::with_stroke(self.resolve(color), 1);
        self.paint(Circle::with_center(center, 2 * radius + 1).into_styled(style));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb565) {
        let style = PrimitiveStyle::with_stroke(self.resolve(color), 1);
        self.paint(Line::new(from, to).into_styled(style));
    }

    fn save_region(&mut self, area: Bounds) -> SavedRegion {
        let pixels = self.frame.copy_out(area, self.bgcolor);
        SavedRegion { area, pixels }
    }

    fn restore_region(&mut self, saved: &SavedRegion) {
        // Saved pixels are already final colours; no grey transform
        self.frame.copy_in(saved.area, &saved.pixels);
    }

    fn print_left(&mut self, at: Point, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let character_style = style.character_style(self.resolve(style.fg), self.resolve(style.bg));
        self.paint(Text::with_baseline(text, at, character_style, Baseline::Top));
    }

    fn print_centered(&mut self, center: Point, text: &str, style: &TextStyle) {
        let extent = style.measure(text);
        let at = Point::new(
            (center.x - extent.width as i32 / 2).max(0),
            (center.y - extent.height as i32 / 2).max(0),
        );
        self.print_left(at, text, style);
    }

    fn clear(&mut self) {
        let _ = self.frame.clear(self.bgcolor);
    }
}
