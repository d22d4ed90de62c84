//! Invisible touch area
//!
//! Same press, release and long-press contract as a button, without
//! drawing anything. Useful for overlaying hot spots on a picture or
//! making a label tappable.

use embassy_time::Instant;
use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{Response, Trigger};
use crate::ui::surface::DrawSurface;

pub struct Pad {
    base: WidgetBase,
    touch: TouchState,
    onrelease: bool,
}

impl Pad {
    pub fn new(location: Point, width: u32, height: u32) -> Self {
        Self {
            base: WidgetBase::new(location, width, height),
            touch: TouchState::default(),
            onrelease: true,
        }
    }

    /// Fire the primary callback on touch-down instead of release
    pub fn on_press(mut self) -> Self {
        self.onrelease = false;
        self
    }
}

impl Widget for Pad {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        self.base.fill = false;
        self.base.border = 0;
        Ok(())
    }

    fn show(&mut self, _surface: &mut dyn DrawSurface) {}
}

impl Touch for Pad {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, _point: Point, _now: Instant, _timing: &Timing) -> Response {
        if self.onrelease {
            Response::NONE
        } else {
            Response::fire(Trigger::Primary)
        }
    }

    fn untouched(&mut self) -> Response {
        if self.onrelease {
            Response::fire(Trigger::Primary)
        } else {
            Response::NONE
        }
    }
}
