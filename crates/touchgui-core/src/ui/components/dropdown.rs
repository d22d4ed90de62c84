//! Single-line selector that pops up a list of its entries
//!
//! Touching a dropdown with more than one entry opens a modal list just
//! below it. Picking an entry closes the list and updates the dropdown on
//! the screen it came from, running its change callback when the
//! selection moved.

use alloc::vec::Vec;
use embassy_time::Instant;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::{GuiError, GuiResult};
use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{Bounds, Response, Text, Value, text};
use crate::ui::styling::LIGHTBLUE;
use crate::ui::surface::DrawSurface;

pub struct Dropdown {
    base: WidgetBase,
    touch: TouchState,
    elements: Vec<Text>,
    selected: usize,
    select_color: Rgb565,
    entry_height: u32,
}

impl Dropdown {
    /// Fails with [`GuiError::EmptyElementSet`] when `elements` is empty.
    pub fn new(location: Point, width: u32, elements: &[&str]) -> GuiResult<Self> {
        if elements.is_empty() {
            return Err(GuiError::EmptyElementSet);
        }
        let mut base = WidgetBase::new(location, width, 0);
        base.border = 2;
        Ok(Self {
            base,
            touch: TouchState::default(),
            elements: elements.iter().map(|s| text(s)).collect(),
            selected: 0,
            select_color: LIGHTBLUE,
            entry_height: 0,
        })
    }

    /// Initially selected entry; out of range falls back to the first
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = if index < self.elements.len() { index } else { 0 };
        self
    }

    /// Highlight of the selected entry in the pop-up list
    pub fn select_color(mut self, color: Rgb565) -> Self {
        self.select_color = color;
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Text] {
        &self.elements
    }

    /// Text of the selected entry
    pub fn text_value(&self) -> &str {
        self.elements
            .get(self.selected)
            .map(|t| t.as_str())
            .unwrap_or_default()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.as_str() == entry)
    }

    pub(crate) fn selected_index(&self) -> usize {
        self.selected
    }

    /// Height of one entry, known once the dropdown is on a screen
    pub(crate) fn entry_height(&self) -> u32 {
        self.entry_height
    }

    pub(crate) fn highlight(&self) -> Rgb565 {
        self.select_color
    }

    pub(crate) fn requested_font(&self) -> Option<&'static MonoFont<'static>> {
        self.base.request.font
    }

    /// Square button area at the right-hand end holding the arrow
    fn arrow_box(&self) -> Bounds {
        let Bounds { x1, y0, y1, .. } = self.base.bounds;
        let side = self.base.bounds.height() as i32;
        Bounds::from_corners(Point::new(x1 - side, y0), Point::new(x1, y1))
    }

    fn draw_arrow(&self, surface: &mut dyn DrawSurface) {
        let fg = self.base.fg;
        let arrow = self.arrow_box();
        surface.draw_line(
            Point::new(arrow.x0, arrow.y0),
            Point::new(arrow.x0, arrow.y1),
            fg,
        );
        let centre = arrow.center();
        let half = (self.base.bounds.height() as i32 - 8) / 2;
        if half > 0 {
            let left = Point::new(centre.x - half, centre.y - half);
            let right = Point::new(centre.x + half, centre.y - half);
            let tip = Point::new(centre.x, centre.y + half);
            surface.draw_line(left, right, fg);
            surface.draw_line(left, tip, fg);
            surface.draw_line(right, tip, fg);
        }
    }
}

impl Widget for Dropdown {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        let Some(style) = self.base.text_style() else {
            return Ok(());
        };
        self.entry_height = style.line_height() + 2;
        let height = self.entry_height + 2 * self.base.border;
        let width = self.base.bounds.width();
        self.base.resize(width, height);
        // Always drawn on its own background
        self.base.fill = true;
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        if self.base.redraw {
            self.base.redraw = false;
            self.draw_arrow(surface);
        }
        let Some(style) = self.base.text_style() else {
            return;
        };
        let bw = self.base.border as i32;
        let Bounds { x0, y0, y1, .. } = self.base.bounds;
        let field = Bounds::from_corners(
            Point::new(x0 + bw, y0 + bw),
            Point::new(self.arrow_box().x0 - 1, y1 - bw),
        );
        surface.fill_rect(field, self.base.bg);
        surface.print_left(Point::new(x0 + bw, y0 + bw + 1), self.text_value(), style);
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Index(self.selected))
    }

    fn set_value(&mut self, value: Value) -> bool {
        match value {
            Value::Index(i) if i < self.elements.len() && i != self.selected => {
                self.selected = i;
                true
            }
            _ => false,
        }
    }
}

impl Touch for Dropdown {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, _point: Point, _now: Instant, _timing: &Timing) -> Response {
        // Nothing to choose from
        if self.elements.len() > 1 {
            Response::open_list()
        } else {
            Response::NONE
        }
    }
}
