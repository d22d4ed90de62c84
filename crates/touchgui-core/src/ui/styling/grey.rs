//! Greyed-out colour transforms
//!
//! Disabled widgets are drawn through one of two transforms: "dim" divides
//! each channel by the factor, "desaturate" replaces the colour with a grey
//! level derived from the brightest channel divided by the factor. The
//! transform is applied at draw time only; widget colours are never mutated.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GuiError, GuiResult};

/// Process-wide grey-out style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreyStyle {
    desaturate: bool,
    factor: f32,
}

impl Default for GreyStyle {
    /// Desaturate, halving brightness
    fn default() -> Self {
        Self {
            desaturate: true,
            factor: 2.0,
        }
    }
}

impl GreyStyle {
    /// Create a grey style.
    ///
    /// A factor of one or less would leave disabled widgets looking enabled
    /// and is rejected with [`GuiError::InvalidDimFactor`].
    pub fn new(desaturate: bool, factor: f32) -> GuiResult<Self> {
        let style = Self { desaturate, factor };
        style.validate()?;
        Ok(style)
    }

    /// Check the dim factor. Needed after deserializing.
    pub fn validate(&self) -> GuiResult<()> {
        // NaN fails the comparison as well
        if self.factor > 1.0 {
            Ok(())
        } else {
            Err(GuiError::InvalidDimFactor {
                factor: self.factor,
            })
        }
    }

    pub fn desaturate(&self) -> bool {
        self.desaturate
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Transform a colour for drawing a disabled widget.
    pub fn apply(&self, color: Rgb565) -> Rgb565 {
        if self.desaturate {
            let rgb = Rgb888::from(color);
            let level = (rgb.r().max(rgb.g()).max(rgb.b()) as f32 / self.factor) as u8;
            Rgb565::from(Rgb888::new(level, level, level))
        } else {
            Rgb565::new(
                (color.r() as f32 / self.factor) as u8,
                (color.g() as f32 / self.factor) as u8,
                (color.b() as f32 / self.factor) as u8,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_factor_of_one_or_less() {
        assert_eq!(
            GreyStyle::new(false, 1.0),
            Err(GuiError::InvalidDimFactor { factor: 1.0 })
        );
        assert!(GreyStyle::new(true, 0.5).is_err());
        assert!(GreyStyle::new(true, f32::NAN).is_err());
        assert!(GreyStyle::new(true, 1.01).is_ok());
    }

    #[test]
    fn test_dim_halves_each_channel() {
        let style = GreyStyle::new(false, 2.0).unwrap();
        let dimmed = style.apply(Rgb565::new(20, 40, 10));
        assert_eq!(dimmed, Rgb565::new(10, 20, 5));
    }

    #[test]
    fn test_desaturate_uses_brightest_channel() {
        let style = GreyStyle::new(true, 2.0).unwrap();
        let grey = Rgb888::from(style.apply(Rgb565::new(31, 0, 0)));
        // Every channel carries the same level
        assert_eq!(grey.r() >> 3, grey.b() >> 3);
        assert!(grey.r() > 100 && grey.r() < 140, "got {}", grey.r());
    }
}
