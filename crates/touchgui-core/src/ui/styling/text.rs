//! Resolved text styles
//!
//! A text style pairs a monospaced font with foreground and background
//! colours. Resolution checks the font against the display's glyph scratch
//! buffer, which must hold one glyph cell at two bytes per pixel.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::{GuiError, GuiResult};

/// Font and colours used to render a run of text
#[derive(Clone, Copy)]
pub struct TextStyle {
    pub fg: Rgb565,
    pub bg: Rgb565,
    pub font: &'static MonoFont<'static>,
}

impl core::fmt::Debug for TextStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextStyle")
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("cell", &self.font.character_size)
            .finish()
    }
}

impl TextStyle {
    /// Resolve a style, failing with [`GuiError::FontTooLarge`] when one
    /// glyph of `font` does not fit in `glyph_buffer_len` bytes.
    pub fn new(
        fg: Rgb565,
        bg: Rgb565,
        font: &'static MonoFont<'static>,
        glyph_buffer_len: usize,
    ) -> GuiResult<Self> {
        let cell = font.character_size;
        let required = cell.width as usize * cell.height as usize * 2;
        if required > glyph_buffer_len {
            return Err(GuiError::FontTooLarge {
                required,
                available: glyph_buffer_len,
            });
        }
        Ok(Self { fg, bg, font })
    }

    /// Same font with different colours. The font was already checked.
    pub fn with_colors(&self, fg: Rgb565, bg: Rgb565) -> Self {
        Self {
            fg,
            bg,
            font: self.font,
        }
    }

    /// Pixel height of one line
    pub fn line_height(&self) -> u32 {
        self.font.character_size.height
    }

    /// Pixel extent of `s` on one line
    pub fn measure(&self, s: &str) -> Size {
        Self::extent(self.font, s)
    }

    /// Pixel extent of `s` on one line in `font`
    pub fn extent(font: &MonoFont<'_>, s: &str) -> Size {
        let chars = s.chars().count() as u32;
        let advance = font.character_size.width + font.character_spacing;
        let width = (chars * advance).saturating_sub(font.character_spacing);
        Size::new(width, font.character_size.height)
    }

    /// embedded-graphics character style with the given (already transformed) colours
    pub(crate) fn character_style(&self, fg: Rgb565, bg: Rgb565) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyleBuilder::new()
            .font(self.font)
            .text_color(fg)
            .background_color(bg)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};

    #[test]
    fn test_font_fits_default_buffer() {
        let style = TextStyle::new(Rgb565::WHITE, Rgb565::BLACK, &FONT_6X10, 1058).unwrap();
        assert_eq!(style.line_height(), 10);
        assert_eq!(style.measure("abc"), Size::new(18, 10));
    }

    #[test]
    fn test_font_too_large() {
        let err = TextStyle::new(Rgb565::WHITE, Rgb565::BLACK, &FONT_10X20, 200).unwrap_err();
        assert_eq!(
            err,
            GuiError::FontTooLarge {
                required: 400,
                available: 200
            }
        );
    }
}
