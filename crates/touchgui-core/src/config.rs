//! Runtime configuration
//!
//! Display geometry, default colours and timing for the input loop. The
//! struct is serde-serializable so firmware can keep a postcard blob in
//! flash and decode it at boot.

use alloc::vec::Vec;
use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GuiError, GuiResult};
use crate::ui::styling::{GreyStyle, from_rgb888};

/// Glyph scratch buffer size: one 23x23 glyph at two bytes per pixel
pub const DEFAULT_GLYPH_BUFFER_LEN: usize = 1058;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Default foreground colour as 8-bit RGB
    pub fgcolor: [u8; 3],
    /// Default background colour, also used to blank the screen
    pub bgcolor: [u8; 3],
    /// Transform applied to disabled widgets
    pub grey: GreyStyle,
    /// Bytes available for rendering one glyph
    pub glyph_buffer_len: usize,
    /// Delay between touch polls. Zero yields once per tick.
    pub poll_interval_ms: u32,
    /// Re-sample delay after a touch-down transition
    pub debounce_ms: u32,
    /// How long a press must be held to count as a long press
    pub long_press_ms: u32,
    /// How long a button stays in its lit colour after a press
    pub lit_ms: u32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 128,
            fgcolor: [255, 255, 255],
            bgcolor: [0, 0, 0],
            grey: GreyStyle::default(),
            glyph_buffer_len: DEFAULT_GLYPH_BUFFER_LEN,
            poll_interval_ms: 10,
            debounce_ms: 20,
            long_press_ms: 1000,
            lit_ms: 1000,
        }
    }
}

impl GuiConfig {
    /// Decode a postcard blob and validate it
    pub fn decode(bytes: &[u8]) -> GuiResult<Self> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| GuiError::InvalidConfig)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode as a postcard blob
    pub fn encode(&self) -> GuiResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| GuiError::InvalidConfig)
    }

    pub fn validate(&self) -> GuiResult<()> {
        self.grey.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(GuiError::InvalidConfig);
        }
        Ok(())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn fg(&self) -> Rgb565 {
        from_rgb888(self.fgcolor)
    }

    pub fn bg(&self) -> Rgb565 {
        from_rgb888(self.bgcolor)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms as u64)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms as u64)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms as u64)
    }

    pub fn lit_time(&self) -> Duration {
        Duration::from_millis(self.lit_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrips_through_postcard() {
        let config = GuiConfig {
            long_press_ms: 750,
            ..GuiConfig::default()
        };
        let blob = config.encode().unwrap();
        assert_eq!(GuiConfig::decode(&blob).unwrap(), config);
    }

    #[test]
    fn test_decode_rejects_bad_dim_factor() {
        let mut config = GuiConfig::default();
        // Bypass the constructor to simulate a corrupted blob
        config.grey = postcard::from_bytes(&postcard::to_allocvec(&(false, 0.5f32)).unwrap())
            .unwrap();
        let blob = config.encode().unwrap();
        assert_eq!(
            GuiConfig::decode(&blob),
            Err(GuiError::InvalidDimFactor { factor: 0.5 })
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(GuiConfig::decode(&[0xff]), Err(GuiError::InvalidConfig));
    }

    #[test]
    fn test_default_colors() {
        let config = GuiConfig::default();
        assert_eq!(config.fg(), Rgb565::WHITE);
        assert_eq!(config.bg(), Rgb565::BLACK);
    }
}
