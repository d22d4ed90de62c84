//! Named colours
//!
//! RGB565 versions of the palette the widget set is designed around.
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};

pub const WHITE: Rgb565 = Rgb565::new(255 >> 3, 255 >> 2, 255 >> 3);
pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const RED: Rgb565 = Rgb565::new(255 >> 3, 0, 0);
pub const LIGHTRED: Rgb565 = Rgb565::new(140 >> 3, 0, 0);
pub const GREEN: Rgb565 = Rgb565::new(0, 255 >> 2, 0);
pub const BLUE: Rgb565 = Rgb565::new(0, 0, 255 >> 3);
pub const YELLOW: Rgb565 = Rgb565::new(255 >> 3, 255 >> 2, 0);
pub const GREY: Rgb565 = Rgb565::new(100 >> 3, 100 >> 2, 100 >> 3);
pub const MAGENTA: Rgb565 = Rgb565::new(255 >> 3, 0, 255 >> 3);
pub const CYAN: Rgb565 = Rgb565::new(0, 255 >> 2, 255 >> 3);
pub const LIGHTGREEN: Rgb565 = Rgb565::new(0, 100 >> 2, 0);
pub const DARKGREEN: Rgb565 = Rgb565::new(0, 80 >> 2, 0);
pub const LIGHTBLUE: Rgb565 = Rgb565::new(0, 0, 80 >> 3);

/// Build an RGB565 colour from an 8-bit `[r, g, b]` triple.
pub fn from_rgb888(rgb: [u8; 3]) -> Rgb565 {
    Rgb565::from(Rgb888::new(rgb[0], rgb[1], rgb[2]))
}
