//! Vertical bar meter with tick marks and a moving pointer
//!
//! The pointer is a single row. The pixels under it are saved before it is
//! drawn and restored when it moves, so the ticks and legends behind it
//! survive.

use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::components::{Widget, WidgetBase};
use crate::ui::core::{Bounds, Text, Value, clamp_fraction, text};
use crate::ui::surface::{DrawSurface, SavedRegion};

/// Length of each tick mark
const TICK_LEN: i32 = 5;

pub struct Meter {
    base: WidgetBase,
    value: f32,
    divisions: u32,
    legends: Vec<Text>,
    pointercolor: Option<Rgb565>,
    /// Scale extent: pointer at `y1` for 0.0 and `y0` for 1.0
    y0: i32,
    y1: i32,
    pointer: Option<SavedRegion>,
}

impl Meter {
    pub fn new(location: Point, width: u32, height: u32) -> Self {
        Self {
            base: WidgetBase::new(location, width, height),
            value: 0.0,
            divisions: 10,
            legends: Vec::new(),
            pointercolor: None,
            y0: location.y,
            y1: location.y + height as i32,
            pointer: None,
        }
    }

    pub fn divisions(mut self, divisions: u32) -> Self {
        self.divisions = divisions;
        self
    }

    /// Legends printed bottom to top. Only drawn when a font was chosen.
    pub fn legends(mut self, legends: &[&str]) -> Self {
        self.legends = legends.iter().map(|s| text(s)).collect();
        self
    }

    pub fn pointercolor(mut self, color: Rgb565) -> Self {
        self.pointercolor = Some(color);
        self
    }

    pub fn initial(mut self, value: f32) -> Self {
        self.value = clamp_fraction(value);
        self
    }
}

impl Widget for Meter {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        // Room above and below the scale for half a legend
        self.base.border = match (self.base.has_font(), self.base.text_style()) {
            (true, Some(style)) => 1 + style.line_height() / 2,
            _ => 5,
        };
        // A meter always paints its own background
        self.base.fill = true;
        let border = self.base.border as i32;
        self.y0 = self.base.bounds.y0 + border + 2;
        self.y1 = self.base.bounds.y1 - border;
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        let Bounds { x0, x1, .. } = self.base.bounds;
        let height = (self.y1 - self.y0) as f32;
        let fg = self.base.fg;

        if self.base.redraw {
            // Whatever was saved is stale once the background is repainted
            self.pointer = None;
            self.base.redraw = false;
        }

        if self.divisions > 0 {
            let dy = height / self.divisions as f32;
            for tick in 0..=self.divisions {
                let y = (self.y0 as f32 + dy * tick as f32) as i32;
                surface.draw_line(Point::new(x0, y), Point::new(x0 + TICK_LEN - 1, y), fg);
                surface.draw_line(Point::new(x1 - TICK_LEN, y), Point::new(x1 - 1, y), fg);
            }
        }

        if self.base.has_font()
            && let Some(style) = self.base.text_style()
        {
            let dy = if self.legends.len() <= 1 {
                0.0
            } else {
                height / (self.legends.len() - 1) as f32
            };
            let mut y = self.y1 as f32;
            for legend in &self.legends {
                surface.print_centered(Point::new((x0 + x1) / 2, y as i32), legend, style);
                y -= dy;
            }
        }

        if let Some(saved) = self.pointer.take() {
            surface.restore_region(&saved);
        }
        let y = (self.y1 as f32 - self.value * height) as i32;
        let row = Bounds::from_corners(Point::new(x0, y), Point::new(x1, y));
        self.pointer = Some(surface.save_region(row));
        let color = self.pointercolor.unwrap_or(fg);
        surface.draw_line(Point::new(x0, y), Point::new(x1 - 1, y), color);
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Fraction(self.value))
    }

    fn set_value(&mut self, value: Value) -> bool {
        match value.normalized() {
            Value::Fraction(v) if v != self.value => {
                self.value = v;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuiConfig;
    use crate::ui::components::Element;
    use crate::ui::styling::{BLACK, RED};
    use crate::ui::surface::Canvas;

    #[test]
    fn test_pointer_moves_without_leaving_a_trail() {
        let mut canvas = Canvas::new(&GuiConfig::default());
        let mut element: Element = Meter::new(Point::new(10, 10), 26, 100)
            .divisions(0)
            .pointercolor(RED)
            .into();
        element.attach(&canvas).unwrap();
        element.draw(&mut canvas);

        // Scale runs from y = 17 to y = 105
        assert_eq!(canvas.pixel(Point::new(20, 105)), Some(RED));

        element.widget_mut().set_value(Value::Fraction(1.0));
        element.refresh(&mut canvas);
        assert_eq!(canvas.pixel(Point::new(20, 17)), Some(RED));
        assert_eq!(canvas.pixel(Point::new(20, 105)), Some(BLACK));
    }

    #[test]
    fn test_value_clamped() {
        let mut meter = Meter::new(Point::zero(), 26, 100);
        assert!(meter.set_value(Value::Fraction(1.7)));
        assert_eq!(meter.value(), Some(Value::Fraction(1.0)));
        assert!(!meter.set_value(Value::Fraction(3.0)));
    }
}
