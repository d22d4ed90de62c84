//! Rotary knob
//!
//! A round dial with tick marks and a pointer. Dragging around the centre
//! turns it; the value is the pointer's position along the usable arc,
//! from 0.0 at the anticlockwise end to 1.0 at the clockwise end. The arc
//! is centred on twelve o'clock. Touches close to the centre are ignored
//! because their angle is too unstable to use.
//!
//! Like a slider, the primary callback runs on every change while
//! dragging and the release callback marks the end of the move.

use core::f32::consts::TAU;

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use micromath::F32Ext;

use crate::error::GuiResult;
use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{Response, Value, clamp_fraction};
use crate::ui::surface::DrawSurface;

/// Touches nearer the centre than this share of the radius squared are ignored
const DEAD_ZONE: f32 = 0.5;

pub struct Knob {
    base: WidgetBase,
    touch: TouchState,
    /// Usable angle in radians
    arc: f32,
    ticks: u32,
    value: f32,
    color: Option<Rgb565>,
    origin: Point,
    radius: f32,
    /// Pointer position as last drawn
    drawn: Option<f32>,
}

impl Knob {
    /// Square knob of side `height`
    pub fn new(location: Point, height: u32) -> Self {
        let radius = height as f32 / 2.0;
        Self {
            base: WidgetBase::new(location, height, height),
            touch: TouchState::draggable(),
            arc: TAU,
            ticks: 9,
            value: 0.0,
            color: None,
            origin: location + Point::new(radius as i32, radius as i32),
            radius,
            drawn: None,
        }
    }

    /// Usable angle in radians, at most a full turn
    pub fn arc(mut self, radians: f32) -> Self {
        self.arc = clamp_fraction(radians / TAU) * TAU;
        self
    }

    /// Number of tick marks, including both ends of travel
    pub fn ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks.max(2);
        self
    }

    /// Fill colour of the dial face
    pub fn color(mut self, color: Rgb565) -> Self {
        self.color = Some(color);
        self
    }

    pub fn initial(mut self, value: f32) -> Self {
        self.value = clamp_fraction(value);
        self
    }

    pub fn fraction(&self) -> f32 {
        self.value
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    fn ticklen(&self) -> f32 {
        0.1 * self.radius
    }

    fn pointerlen(&self) -> f32 {
        (self.radius - self.ticklen() - 5.0).max(0.0)
    }

    /// Point `length` pixels from the centre, `angle` clockwise from vertical
    fn polar(&self, angle: f32, length: f32) -> Point {
        Point::new(
            self.origin.x + (length * angle.sin()) as i32,
            self.origin.y - (length * angle.cos()) as i32,
        )
    }

    fn draw_pointer(&self, surface: &mut dyn DrawSurface, value: f32, color: Rgb565) {
        let angle = value * self.arc - self.arc / 2.0;
        surface.draw_line(self.origin, self.polar(angle, self.pointerlen()), color);
    }

    fn draw_dial(&self, surface: &mut dyn DrawSurface) {
        let fg = self.base.fg;
        let ticklen = self.ticklen();
        for tick in 0..self.ticks {
            let theta = tick as f32 / (self.ticks - 1) as f32 * self.arc - self.arc / 2.0;
            surface.draw_line(
                self.polar(theta, self.radius),
                self.polar(theta, self.radius - ticklen),
                fg,
            );
        }
        let face = (self.radius - ticklen).max(0.0) as u32;
        if let Some(color) = self.color {
            surface.fill_circle(self.origin, face, color);
        }
        surface.draw_circle(self.origin, face, fg);
        surface.draw_circle(self.origin, face.saturating_sub(3), fg);
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
}

impl Widget for Knob {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        let b = self.base.border as f32;
        let radius = (self.base.bounds.height() as f32 / 2.0 - b).max(0.0);
        let offset = (b + radius) as i32;
        self.radius = radius;
        self.origin = self.base.bounds.top_left() + Point::new(offset, offset);
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        if self.base.redraw {
            self.base.redraw = false;
            self.draw_dial(surface);
        }
        if let Some(old) = self.drawn {
            let erase = self.color.unwrap_or(self.base.bg);
            self.draw_pointer(surface, old, erase);
        }
        self.draw_pointer(surface, self.value, self.base.fg);
        self.drawn = Some(self.value);
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

impl Touch for Knob {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, point: Point, _now: Instant, _timing: &Timing) -> Response {
        let dx = (point.x - self.origin.x) as f32;
        let dy = (self.origin.y - point.y) as f32;
        let r2 = self.radius * self.radius;
        if self.arc <= 0.0 || r2 <= 0.0 || (dx * dx + dy * dy) / r2 < DEAD_ZONE {
            return Response::NONE;
        }
        // Axes swapped so the angle is measured from vertical
        let half = self.arc / 2.0;
        let alpha = dx.atan2(dy).clamp(-half, half) + half;
        if self.set_fraction(alpha / self.arc) {
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
    use core::f32::consts::PI;
    use embassy_time::Duration;

    fn timing() -> Timing {
        Timing {
            long_press: Duration::from_millis(1000),
            lit: Duration::from_millis(1000),
        }
    }

    fn attached(knob: Knob) -> Element {
        let mut element: Element = knob.into();
        element.attach(&Canvas::new(&GuiConfig::default())).unwrap();
        element
    }

    #[test]
    fn test_top_is_middle_of_full_turn() {
        let mut element = attached(Knob::new(Point::zero(), 50));
        let Some(Control::Knob(knob)) = element.control_mut() else {
            panic!("not a knob");
        };
        assert_eq!(knob.origin(), Point::new(25, 25));
        let now = Instant::from_millis(0);
        assert_eq!(knob.touched(Point::new(25, 0), now, &timing()), Response::changed());
        assert!((knob.fraction() - 0.5).abs() < 0.01);

        // Three o'clock is three quarters of the way round
        knob.touched(Point::new(50, 25), now, &timing());
        assert!((knob.fraction() - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_centre_touch_ignored() {
        let mut element = attached(Knob::new(Point::zero(), 50).initial(0.3));
        let Some(Control::Knob(knob)) = element.control_mut() else {
            panic!("not a knob");
        };
        let now = Instant::from_millis(0);
        assert_eq!(knob.touched(Point::new(27, 27), now, &timing()), Response::NONE);
        assert_eq!(knob.fraction(), 0.3);
    }

    #[test]
    fn test_angle_clamped_to_arc() {
        let mut element = attached(Knob::new(Point::zero(), 50).arc(PI));
        let Some(Control::Knob(knob)) = element.control_mut() else {
            panic!("not a knob");
        };
        let now = Instant::from_millis(0);
        // Nine o'clock is the anticlockwise end of a half-turn arc
        knob.touched(Point::new(0, 25), now, &timing());
        assert!(knob.fraction() < 0.01);
        // Seven o'clock is past it
        knob.touched(Point::new(5, 45), now, &timing());
        assert_eq!(knob.fraction(), 0.0);
        // Five o'clock is past the clockwise end
        knob.touched(Point::new(45, 45), now, &timing());
        assert_eq!(knob.fraction(), 1.0);
    }

    #[test]
    fn test_ticks_and_arc_limits() {
        let knob = Knob::new(Point::zero(), 50).ticks(0).arc(10.0);
        assert_eq!(knob.ticks, 2);
        assert_eq!(knob.arc, TAU);
        assert_eq!(Knob::new(Point::zero(), 50).arc(f32::NAN).arc, 0.0);
    }

    #[test]
    fn test_pointer_moves_and_old_one_is_erased() {
        let mut canvas = Canvas::new(&GuiConfig::default());
        let mut element: Element = Knob::new(Point::zero(), 50).initial(0.5).fgcolor(RED).into();
        element.attach(&canvas).unwrap();
        element.draw(&mut canvas);
        // Pointing straight up
        assert_eq!(canvas.pixel(Point::new(25, 12)), Some(RED));

        element.widget_mut().set_value(Value::Fraction(0.75));
        element.refresh(&mut canvas);
        assert_eq!(canvas.pixel(Point::new(25, 12)), Some(BLACK));
        assert_eq!(canvas.pixel(Point::new(38, 25)), Some(RED));
    }
}
