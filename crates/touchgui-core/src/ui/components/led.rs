//! On/off indicator lamp

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::components::{Widget, WidgetBase};
use crate::ui::core::Value;
use crate::ui::styling::{BLACK, RED};
use crate::ui::surface::DrawSurface;

pub struct Led {
    base: WidgetBase,
    on: bool,
    color: Rgb565,
    center: Point,
    radius: u32,
}

impl Led {
    /// Square LED of side `height` with a 2-pixel border
    pub fn new(location: Point, height: u32) -> Self {
        let mut base = WidgetBase::new(location, height, height);
        base.border = 2;
        Self {
            base,
            on: false,
            color: RED,
            center: location,
            radius: 0,
        }
    }

    /// Colour when lit
    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Widget for Led {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        let border = self.base.border;
        self.radius = self.base.bounds.height().saturating_sub(2 * border) / 2;
        let offset = (self.radius + border) as i32;
        self.center = self.base.bounds.top_left() + Point::new(offset, offset);
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        let fill = if self.on { self.color } else { BLACK };
        surface.fill_circle(self.center, self.radius, fill);
        surface.draw_circle(self.center, self.radius, self.base.fg);
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Flag(self.on))
    }

    fn set_value(&mut self, value: Value) -> bool {
        match value {
            Value::Flag(on) if on != self.on => {
                self.on = on;
                true
            }
            _ => false,
        }
    }

    fn set_color(&mut self, color: Rgb565) {
        self.color = color;
    }
}
