//! Toggle box
//!
//! Each touch flips the value. When checked the box is filled with its
//! fill colour, or crossed when it has none.

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{Bounds, Response, Value};
use crate::ui::surface::DrawSurface;

pub struct Checkbox {
    base: WidgetBase,
    touch: TouchState,
    checked: bool,
    fillcolor: Option<Rgb565>,
}

impl Checkbox {
    /// Square box of side `height`
    pub fn new(location: Point, height: u32) -> Self {
        Self {
            base: WidgetBase::new(location, height, height),
            touch: TouchState::default(),
            checked: false,
            fillcolor: None,
        }
    }

    pub fn fillcolor(mut self, color: Rgb565) -> Self {
        self.fillcolor = Some(color);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Widget for Checkbox {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        let bw = self.base.border;
        let side = self.base.bounds.height().saturating_sub(2 * bw);
        let top_left = self.base.bounds.top_left() + Point::new(bw as i32, bw as i32);
        let area = Bounds::new(top_left, side, side);

        match (self.checked, self.fillcolor) {
            (true, Some(fill)) => surface.fill_rect(area, fill),
            (true, None) => {}
            (false, _) => surface.fill_rect(area, self.base.bg),
        }
        surface.draw_rect(area, self.base.fg);
        if self.checked && self.fillcolor.is_none() {
            let (x0, y0, x1, y1) = (area.x0, area.y0, area.x1, area.y1);
            surface.draw_line(Point::new(x0, y0), Point::new(x1, y1), self.base.fg);
            surface.draw_line(Point::new(x0, y1), Point::new(x1, y0), self.base.fg);
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Flag(self.checked))
    }

    fn set_value(&mut self, value: Value) -> bool {
        match value {
            Value::Flag(checked) if checked != self.checked => {
                self.checked = checked;
                true
            }
            _ => false,
        }
    }
}

impl Touch for Checkbox {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, _point: Point, _now: Instant, _timing: &Timing) -> Response {
        self.checked = !self.checked;
        Response::changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    #[test]
    fn test_touch_toggles() {
        let timing = Timing {
            long_press: Duration::from_millis(1000),
            lit: Duration::from_millis(1000),
        };
        let mut checkbox = Checkbox::new(Point::zero(), 20);
        let now = Instant::from_millis(0);
        assert_eq!(checkbox.touched(Point::new(1, 1), now, &timing), Response::changed());
        assert!(checkbox.is_checked());
        checkbox.touched(Point::new(1, 1), now, &timing);
        assert!(!checkbox.is_checked());
    }
}
