//! Scrolling-free list of text entries with one selected
//!
//! A touch only records which entry is under the finger; the selection
//! changes on release. The change callback runs on every release, even
//! when the same entry is picked again.

use alloc::vec::Vec;
use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::{GuiError, GuiResult};
use crate::ui::components::{Timing, Touch, TouchState, Widget, WidgetBase};
use crate::ui::core::{Bounds, Response, Text, Value, text};
use crate::ui::styling::LIGHTBLUE;
use crate::ui::surface::DrawSurface;

pub struct Listbox {
    base: WidgetBase,
    touch: TouchState,
    elements: Vec<Text>,
    selected: usize,
    /// Entry under the current touch, applied on release
    pending: Option<usize>,
    select_color: Rgb565,
    entry_height: u32,
}

impl Listbox {
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
            pending: None,
            select_color: LIGHTBLUE,
            entry_height: 0,
        })
    }

    /// Initially selected entry; out of range falls back to the first
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = if index < self.elements.len() { index } else { 0 };
        self
    }

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

    /// Text of the selected entry
    pub fn text_value(&self) -> &str {
        self.elements
            .get(self.selected)
            .map(|t| t.as_str())
            .unwrap_or_default()
    }

    /// Index of the entry with the given text
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.as_str() == entry)
    }
}

impl Widget for Listbox {
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
        // A pixel above and below each entry
        self.entry_height = style.line_height() + 2;
        let height = self.entry_height * self.elements.len() as u32 + 2 * self.base.border;
        let width = self.base.bounds.width();
        self.base.resize(width, height);
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        let Some(style) = self.base.text_style() else {
            return;
        };
        let bw = self.base.border as i32;
        let Bounds { x0, y0, .. } = self.base.bounds;
        let width = self.base.bounds.width() as i32;
        let height = self.base.bounds.height() as i32;
        let eh = self.entry_height as i32;
        let xs = x0 + bw;
        let xe = x0 + width - 2 * bw;

        surface.fill_rect(
            Bounds::from_corners(Point::new(xs, y0 + 1), Point::new(xe, y0 - 1 + height - 2 * bw)),
            self.base.bg,
        );
        let select_style = style.with_colors(self.base.fg, self.select_color);
        for (n, entry) in self.elements.iter().enumerate() {
            let ye = y0 + n as i32 * eh;
            if n == self.selected {
                surface.fill_rect(
                    Bounds::from_corners(Point::new(xs, ye + 1), Point::new(xe, ye + eh - 1)),
                    self.select_color,
                );
                surface.print_left(Point::new(xs, ye + 1), entry, &select_style);
            } else {
                surface.print_left(Point::new(xs, ye + 1), entry, style);
            }
        }
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

impl Touch for Listbox {
    fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    fn touch_state_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    fn touched(&mut self, point: Point, _now: Instant, _timing: &Timing) -> Response {
        let dy = (point.y - self.base.bounds.y0).max(0) as u32;
        let entry = (dy / self.entry_height.max(1)) as usize;
        self.pending = Some(entry.min(self.elements.len() - 1));
        Response::NONE
    }

    fn untouched(&mut self) -> Response {
        match self.pending.take() {
            Some(entry) => {
                self.selected = entry;
                Response::changed()
            }
            None => Response::NONE,
        }
    }
}
