//! Single-line text label

use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::components::{Widget, WidgetBase};
use crate::ui::core::{Text, Value, text};
use crate::ui::surface::DrawSurface;

/// Passive text. Unless a width is given the label is sized to fit its
/// initial text; its height always follows the font.
pub struct Label {
    base: WidgetBase,
    text: Text,
    width: Option<u32>,
}

impl Label {
    pub fn new(location: Point, value: &str) -> Self {
        Self {
            base: WidgetBase::new(location, 0, 0),
            text: text(value),
            width: None,
        }
    }

    /// Fixed width, for labels whose text changes later
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for Label {
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
        let border = 2 * self.base.border;
        let width = self
            .width
            .unwrap_or_else(|| style.measure(&self.text).width + border);
        let height = style.line_height() + border;
        self.base.resize(width, height);
        Ok(())
    }

    fn show(&mut self, surface: &mut dyn DrawSurface) {
        let bw = self.base.border;
        surface.fill_rect(self.base.bounds.inset(bw), self.base.bg);
        if let Some(style) = self.base.text_style() {
            let at = self.base.bounds.top_left() + Point::new(bw as i32, bw as i32);
            surface.print_left(at, &self.text, style);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuiConfig;
    use crate::ui::components::Element;
    use crate::ui::surface::Canvas;

    #[test]
    fn test_label_sized_from_text_and_border() {
        let canvas = Canvas::new(&GuiConfig::default());
        let mut element: Element = Label::new(Point::new(4, 4), "Hello").border(1).into();
        element.attach(&canvas).unwrap();
        let bounds = element.base().bounds();
        // 5 glyphs of the 6x10 default font plus a border on each side
        assert_eq!(bounds.width(), 32);
        assert_eq!(bounds.height(), 12);
    }

    #[test]
    fn test_same_text_is_not_a_change() {
        let mut label = Label::new(Point::zero(), "a");
        assert!(!label.set_value(Value::text("a")));
        assert!(label.set_value(Value::text("b")));
        assert_eq!(label.text(), "b");
        assert!(!label.set_value(Value::Flag(true)));
    }
}
