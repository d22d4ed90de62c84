//! Push button with optional text
//!
//! A button fires its primary callback on release by default, or on press
//! when built with [`Button::on_press`].
//!
//! # Visual Features
//! - Rectangle, circle or clipped-corner shapes, filled or outlined
//! - Optional `litcolor` shown for the lit time after each press
//! - Highlight colour when the button belongs to a radio group
//!
//! # Examples
//! ```ignore
//! let id = builder
//!     .add(Button::new(Point::new(0, 0), 50, 20).text("Next").fgcolor(BLUE))?
//!     .callback(|ctx, _| ctx.change(next_screen()))
//!     .id();
//! ```

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{GroupId, Response, Text, Trigger, Value, text};
use crate::ui::surface::DrawSurface;

/// Corner radius of [`Shape::ClippedRect`]
const CLIP_RADIUS: u32 = 3;

/// Button outline. Location and size always describe the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rectangle,
    Circle,
    ClippedRect,
}

pub struct Button {
    base: WidgetBase,
    touch: TouchState,
    shape: Shape,
    filled: bool,
    text: Text,
    litcolor: Option<Rgb565>,
    lit_time: Option<Duration>,
    lit_until: Option<Instant>,
    onrelease: bool,
    highlight: Option<Rgb565>,
    pub(crate) group: Option<GroupId>,
}

impl Button {
    pub fn new(location: Point, width: u32, height: u32) -> Self {
        Self {
            base: WidgetBase::new(location, width, height),
            touch: TouchState::default(),
            shape: Shape::Rectangle,
            filled: true,
            text: Text::new(),
            litcolor: None,
            lit_time: None,
            lit_until: None,
            onrelease: true,
            highlight: None,
            group: None,
        }
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Draw the outline only
    pub fn outline(mut self) -> Self {
        self.filled = false;
        self
    }

    pub fn text(mut self, label: &str) -> Self {
        self.text = text(label);
        self
    }

    /// Colour shown briefly after each press
    pub fn litcolor(mut self, color: Rgb565) -> Self {
        self.litcolor = Some(color);
        self
    }

    /// Override the configured lit time for this button
    pub fn lit_time(mut self, duration: Duration) -> Self {
        self.lit_time = Some(duration);
        self
    }

    /// Fire the primary callback on touch-down instead of release
    pub fn on_press(mut self) -> Self {
        self.onrelease = false;
        self
    }

    pub fn label(&self) -> &str {
        &self.text
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn is_lit(&self) -> bool {
        self.lit_until.is_some()
    }

    /// Colour the button face is currently drawn in
    pub fn face_color(&self) -> Rgb565 {
        match (self.lit_until, self.litcolor) {
            (Some(_), Some(lit)) => lit,
            _ => self.highlight.unwrap_or(self.base.fg),
        }
    }

    pub(crate) fn set_highlight(&mut self, color: Option<Rgb565>) {
        self.highlight = color;
    }

    fn text_bg(&self) -> Rgb565 {
        let face = self.face_color();
        if face != self.base.fg {
            face
        } else {
            self.base.fontbg
        }
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        // A button's fill flag describes its face, and the box behind it
        // is painted whenever the face is
        self.base.fill = self.filled;
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        let bounds = self.base.bounds;
        let face = self.face_color();
        let center = match self.shape {
            Shape::Circle => {
                let radius = bounds.height() / 2;
                let center = bounds.top_left() + Point::new(radius as i32, radius as i32);
                if self.filled {
                    surface.fill_circle(center, radius, face);
                } else {
                    surface.draw_circle(center, radius, face);
                }
                center
            }
            Shape::Rectangle => {
                if self.filled {
                    surface.fill_rect(bounds, face);
                } else {
                    surface.draw_rect(bounds, face);
                }
                bounds.center()
            }
            Shape::ClippedRect => {
                if self.filled {
                    surface.fill_rounded_rect(bounds, CLIP_RADIUS, face);
                } else {
                    surface.draw_rounded_rect(bounds, CLIP_RADIUS, face);
                }
                bounds.center()
            }
        };

        if !self.text.is_empty()
            && let Some(style) = self.base.text_style()
        {
            let style = style.with_colors(self.base.fontcolor, self.text_bg());
            surface.print_centered(center, &self.text, &style);
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Text(self.text.clone()))
    }

    fn set_value(&mut self, value: Value) -> bool {
        match value {
            Value::Text(t) if t != self.text => {
                self.text = t;
                true
            }
            _ => false,
        }
    }
}

impl Touch for Button {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, _point: Point, now: Instant, timing: &Timing) -> Response {
        let mut response = Response::NONE;
        if self.litcolor.is_some() {
            self.lit_until = Some(now + self.lit_time.unwrap_or(timing.lit));
            response.redraw = true;
        }
        if !self.onrelease {
            response.fire = Some(Trigger::Primary);
        }
        response
    }

    fn untouched(&mut self) -> Response {
        if self.onrelease {
            Response::fire(Trigger::Primary)
        } else {
            Response::NONE
        }
    }

    fn poll(&mut self, now: Instant) -> bool {
        match self.lit_until {
            Some(until) if now >= until => {
                self.lit_until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::styling::{GREEN, RED};

    fn timing() -> Timing {
        Timing {
            long_press: Duration::from_millis(1000),
            lit: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_fires_on_release_by_default() {
        let mut button = Button::new(Point::zero(), 50, 20);
        let now = Instant::from_millis(0);
        assert_eq!(button.touched(Point::new(5, 5), now, &timing()), Response::NONE);
        assert_eq!(button.untouched(), Response::fire(Trigger::Primary));
    }

    #[test]
    fn test_on_press_fires_on_touch() {
        let mut button = Button::new(Point::zero(), 50, 20).on_press();
        let now = Instant::from_millis(0);
        assert_eq!(
            button.touched(Point::new(5, 5), now, &timing()),
            Response::fire(Trigger::Primary)
        );
        assert_eq!(button.untouched(), Response::NONE);
    }

    #[test]
    fn test_lit_colour_expires() {
        let mut button = Button::new(Point::zero(), 50, 20)
            .fgcolor(GREEN)
            .litcolor(RED);
        button.base.fg = GREEN;
        let start = Instant::from_millis(100);
        let response = button.touched(Point::new(5, 5), start, &timing());
        assert!(response.redraw);
        assert_eq!(button.face_color(), RED);

        assert!(!button.poll(start + Duration::from_millis(499)));
        assert!(button.poll(start + Duration::from_millis(500)));
        assert_eq!(button.face_color(), GREEN);
        // Already expired: nothing more to do
        assert!(!button.poll(start + Duration::from_millis(900)));
    }
}
