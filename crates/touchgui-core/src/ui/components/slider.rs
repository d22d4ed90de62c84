//! Vertical and horizontal sliders
//!
//! A slider is draggable: every sample while pressed moves the value, firing
//! the primary (move) callback on each change. The release callback serves
//! as the "end of move" notification.
//!
//! Only the small slide block is redrawn on a value change: the pixels
//! under it are saved before it is painted and restored before it moves.
//! Legends are printed outside the bounding box, so they do not respond
//! to touch.

use alloc::vec::Vec;
use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{Bounds, Response, Text, Value, clamp_fraction, text};
use crate::ui::surface::{DrawSurface, SavedRegion};

/// Slide block thickness along the travel axis (drawn one pixel larger)
const SLIDE_THICKNESS: i32 = 6;
const HALF_SLIDE: i32 = SLIDE_THICKNESS / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Value 0.0 at the bottom
    Vertical,
    /// Value 0.0 at the left
    Horizontal,
}

pub struct Slider {
    base: WidgetBase,
    touch: TouchState,
    orientation: Orientation,
    value: f32,
    divisions: u32,
    legends: Vec<Text>,
    slidecolor: Option<Rgb565>,
    /// Travel in pixels
    pot: i32,
    /// Extent of the slide block across the travel axis
    cross: (i32, i32),
    /// Leading edge of the slide block as last drawn
    slide: Option<i32>,
    saved: Option<SavedRegion>,
}

impl Slider {
    /// Vertical slider. The width is rounded down to an even number.
    pub fn vertical(location: Point, width: u32, height: u32) -> Self {
        Self::new(location, width & !1, height, Orientation::Vertical)
    }

    /// Horizontal slider. The height is rounded down to an even number.
    pub fn horizontal(location: Point, width: u32, height: u32) -> Self {
        Self::new(location, width, height & !1, Orientation::Horizontal)
    }

    fn new(location: Point, width: u32, height: u32, orientation: Orientation) -> Self {
        Self {
            base: WidgetBase::new(location, width, height),
            touch: TouchState::draggable(),
            orientation,
            value: 0.0,
            divisions: 10,
            legends: Vec::new(),
            slidecolor: None,
            pot: 1,
            cross: (0, 0),
            slide: None,
            saved: None,
        }
    }

    pub fn divisions(mut self, divisions: u32) -> Self {
        self.divisions = divisions;
        self
    }

    /// Legends from the 0.0 end. Only drawn when a font was chosen.
    pub fn legends(mut self, legends: &[&str]) -> Self {
        self.legends = legends.iter().map(|s| text(s)).collect();
        self
    }

    pub fn slidecolor(mut self, color: Rgb565) -> Self {
        self.slidecolor = Some(color);
        self
    }

    pub fn initial(mut self, value: f32) -> Self {
        self.value = clamp_fraction(value);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn fraction(&self) -> f32 {
        self.value
    }

    /// Slide block currently on screen
    pub fn slide_bounds(&self) -> Option<Bounds> {
        self.slide.map(|pos| self.block_at(pos))
    }

    fn block_at(&self, pos: i32) -> Bounds {
        match self.orientation {
            Orientation::Vertical => Bounds::from_corners(
                Point::new(self.cross.0, pos),
                Point::new(self.cross.1, pos + SLIDE_THICKNESS),
            ),
            Orientation::Horizontal => Bounds::from_corners(
                Point::new(pos, self.cross.0),
                Point::new(pos + SLIDE_THICKNESS, self.cross.1),
            ),
        }
    }

    fn slide_position(&self) -> i32 {
        let b = self.base.border as i32;
        let travel = self.value * self.pot as f32;
        match self.orientation {
            Orientation::Vertical => {
                let y = self.base.bounds.y0 + b + HALF_SLIDE;
                (y as f32 + self.pot as f32 - travel) as i32 - HALF_SLIDE
            }
            Orientation::Horizontal => {
                let x = self.base.bounds.x0 + b + HALF_SLIDE;
                (x as f32 + travel) as i32 - HALF_SLIDE
            }
        }
    }

    fn set_fraction(&mut self, value: f32) -> bool {
        let value = clamp_fraction(value);
        if value != self.value {
            self.value = value;
            true
        } else {
            false
        }
    }

    fn draw_vertical_scale(&self, surface: &mut dyn DrawSurface) {
        let b = self.base.border as i32;
        let fg = self.base.fg;
        let inner = self.base.bounds.width() as i32 - 2 * b;
        let x = self.base.bounds.x0 + b;
        let y = self.base.bounds.y0 + b + HALF_SLIDE;
        let dx = inner / 2 - 2;

        surface.draw_rect(
            Bounds::from_corners(Point::new(x + dx, y), Point::new(x + inner - dx, y + self.pot)),
            fg,
        );
        if self.divisions > 0 {
            let dy = self.pot as f32 / self.divisions as f32;
            for tick in 0..=self.divisions {
                let ypos = (y as f32 + dy * tick as f32) as i32;
                surface.draw_line(Point::new(x + 1, ypos), Point::new(x + dx, ypos), fg);
                let right = x + 2 + inner / 2;
                surface.draw_line(Point::new(right, ypos), Point::new(right + dx - 1, ypos), fg);
            }
        }

        if self.base.has_font()
            && let Some(style) = self.base.text_style()
        {
            let dy = match self.legends.len() {
                0 | 1 => 0.0,
                n => self.pot as f32 / (n - 1) as f32,
            };
            let half_line = style.line_height() as i32 / 2;
            let mut yl = (y + self.pot) as f32;
            for legend in &self.legends {
                let at = Point::new(x + self.base.bounds.width() as i32, yl as i32 - half_line);
                surface.print_left(at, legend, style);
                yl -= dy;
            }
        }
    }

    fn draw_horizontal_scale(&self, surface: &mut dyn DrawSurface) {
        let b = self.base.border as i32;
        let fg = self.base.fg;
        let inner = self.base.bounds.height() as i32 - 2 * b;
        let x = self.base.bounds.x0 + b + HALF_SLIDE;
        let y = self.base.bounds.y0 + b;
        let dy = inner / 2 - 2;

        surface.draw_rect(
            Bounds::from_corners(Point::new(x, y + dy), Point::new(x + self.pot, y + inner - dy)),
            fg,
        );
        if self.divisions > 0 {
            let dx = self.pot as f32 / self.divisions as f32;
            for tick in 0..=self.divisions {
                let xpos = (x as f32 + dx * tick as f32) as i32;
                surface.draw_line(Point::new(xpos, y + 1), Point::new(xpos, y + dy), fg);
                let lower = y + 2 + inner / 2;
                surface.draw_line(Point::new(xpos, lower), Point::new(xpos, lower + dy - 1), fg);
            }
        }

        if self.base.has_font()
            && let Some(style) = self.base.text_style()
        {
            let dx = match self.legends.len() {
                0 | 1 => 0.0,
                n => self.pot as f32 / (n - 1) as f32,
            };
            let top = y - style.line_height() as i32 - b - 1;
            let mut xl = x as f32;
            for legend in &self.legends {
                let offset = style.measure(legend).width as i32 / 2;
                surface.print_left(Point::new(xl as i32 - offset, top), legend, style);
                xl += dx;
            }
        }
    }
}

impl Widget for Slider {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        let b = self.base.border as i32;
        let bounds = self.base.bounds;
        let (along, across, origin) = match self.orientation {
            Orientation::Vertical => (bounds.height(), bounds.width(), bounds.x0),
            Orientation::Horizontal => (bounds.width(), bounds.height(), bounds.y0),
        };
        let block = ((across as f32 / 1.3) as i32) & !1;
        let centre = origin + b + (across as i32 - 2 * b) / 2;
        self.cross = (centre - block / 2, centre + block / 2);
        self.pot = (along as i32 - 2 * (b + HALF_SLIDE)).max(1);
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        if self.base.redraw {
            self.base.redraw = false;
            self.saved = None;
            if let Some(old) = self.slide_bounds() {
                surface.fill_rect(old, self.base.bg);
            }
            match self.orientation {
                Orientation::Vertical => self.draw_vertical_scale(surface),
                Orientation::Horizontal => self.draw_horizontal_scale(surface),
            }
        }

        if let Some(saved) = self.saved.take() {
            surface.restore_region(&saved);
        }
        let pos = self.slide_position();
        let block = self.block_at(pos);
        self.slide = Some(pos);
        self.saved = Some(surface.save_region(block));
        surface.fill_rect(block, self.slidecolor.unwrap_or(self.base.fg));
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Fraction(self.value))
    }

    fn set_value(&mut self, value: Value) -> bool {
        match value {
            Value::Fraction(v) => self.set_fraction(v),
            _ => false,
        }
    }
}

impl Touch for Slider {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, point: Point, _now: Instant, _timing: &Timing) -> Response {
        let bounds = self.base.bounds;
        let raw = match self.orientation {
            Orientation::Vertical => (bounds.y1 - point.y) as f32 / self.pot as f32,
            Orientation::Horizontal => (point.x - bounds.x0) as f32 / self.pot as f32,
        };
        if self.set_fraction(raw) {
            Response::changed()
        } else {
            Response::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuiConfig;
    use crate::ui::components::{Control, Element};
    use crate::ui::styling::{BLACK, RED};
    use crate::ui::surface::Canvas;
    use embassy_time::Duration;

    fn timing() -> Timing {
        Timing {
            long_press: Duration::from_millis(1000),
            lit: Duration::from_millis(1000),
        }
    }

    #[test]
    fn test_width_rounded_to_even() {
        let slider = Slider::vertical(Point::zero(), 21, 120);
        assert_eq!(slider.base().bounds().width(), 20);
        let slider = Slider::horizontal(Point::zero(), 120, 21);
        assert_eq!(slider.base().bounds().height(), 20);
    }

    #[test]
    fn test_vertical_touch_maps_bottom_to_zero() {
        let mut element: Element = Slider::vertical(Point::new(10, 0), 20, 120).into();
        element.attach(&Canvas::new(&GuiConfig::default())).unwrap();
        let Some(Control::Slider(slider)) = element.control_mut() else {
            panic!("not a slider");
        };
        // pot = 120 - 6
        let response = slider.touched(Point::new(20, 63), Instant::from_millis(0), &timing());
        assert_eq!(response, Response::changed());
        assert!((slider.fraction() - 0.5).abs() < 0.01);

        // Beyond either end clamps
        slider.touched(Point::new(20, 0), Instant::from_millis(0), &timing());
        assert_eq!(slider.fraction(), 1.0);
        assert_eq!(
            slider.touched(Point::new(20, -5), Instant::from_millis(0), &timing()),
            Response::NONE
        );
    }

    #[test]
    fn test_horizontal_touch_maps_left_to_zero() {
        let mut element: Element = Slider::horizontal(Point::new(0, 0), 106, 20).into();
        element.attach(&Canvas::new(&GuiConfig::default())).unwrap();
        let Some(Control::Slider(slider)) = element.control_mut() else {
            panic!("not a slider");
        };
        slider.touched(Point::new(25, 10), Instant::from_millis(0), &timing());
        assert!((slider.fraction() - 0.25).abs() < 0.01);
    }

    #[test]
    fn test_slide_moves_over_restored_background() {
        let mut canvas = Canvas::new(&GuiConfig::default());
        let mut element: Element = Slider::horizontal(Point::new(0, 40), 106, 20)
            .divisions(0)
            .slidecolor(RED)
            .into();
        element.attach(&canvas).unwrap();
        element.draw(&mut canvas);

        let Some(Control::Slider(slider)) = element.control_mut() else {
            panic!("not a slider");
        };
        let first = slider.slide_bounds().unwrap();
        assert_eq!(canvas.pixel(first.center()), Some(RED));

        slider.set_value(Value::Fraction(1.0));
        element.refresh(&mut canvas);
        // Centre of the old block is back to the slot outline or background
        assert_ne!(canvas.pixel(first.center()), Some(RED));
        assert_eq!(canvas.pixel(Point::new(first.x0, first.y0)), Some(BLACK));
    }
}
