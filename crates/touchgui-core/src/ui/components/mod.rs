//! Widgets
//!
//! Every widget carries a [`WidgetBase`] (geometry, resolved colours,
//! visibility and the disabled flag). Widgets that respond to touch also
//! carry a [`TouchState`] and implement [`Touch`]. The two capabilities are
//! kept apart by [`Element`]: the dispatcher only ever sees
//! [`Element::Touch`] entries.
//!
//! Widgets are built standalone and only resolve their colours and text
//! style when added to a screen, because the defaults come from the
//! drawing surface.

pub mod button;
pub mod checkbox;
pub mod dropdown;
pub mod groups;
pub mod knob;
pub mod label;
pub mod led;
pub mod listbox;
pub mod meter;
pub mod pad;
pub mod slider;

pub use button::{Button, Shape};
pub use checkbox::Checkbox;
pub use dropdown::Dropdown;
pub use groups::{ButtonGroup, ButtonList, RadioButtons};
pub use knob::Knob;
pub use label::Label;
pub use led::Led;
pub use listbox::Listbox;
pub use meter::Meter;
pub use pad::Pad;
pub use slider::{Orientation, Slider};

use embassy_time::{Duration, Instant};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::GuiResult;
use crate::ui::core::{Bounds, Response, Value};
use crate::ui::styling::{TextStyle, WHITE};
use crate::ui::surface::DrawSurface;

/// Colour and font choices made by the application before resolution
#[derive(Clone, Copy, Default)]
struct StyleRequest {
    fg: Option<Rgb565>,
    bg: Option<Rgb565>,
    fontcolor: Option<Rgb565>,
    font: Option<&'static MonoFont<'static>>,
}

/// State shared by every widget
pub struct WidgetBase {
    pub(crate) bounds: Bounds,
    request: StyleRequest,
    pub(crate) fg: Rgb565,
    pub(crate) bg: Rgb565,
    pub(crate) fontcolor: Rgb565,
    /// Background behind text
    pub(crate) fontbg: Rgb565,
    /// Border colour; always the original foreground
    pub(crate) bdcolor: Rgb565,
    /// Fill the bounding box with `bg` before drawing
    pub(crate) fill: bool,
    pub(crate) border: u32,
    pub(crate) visible: bool,
    pub(crate) greyed: bool,
    /// Static content must be redrawn on the next `show`
    pub(crate) redraw: bool,
    pub(crate) style: Option<TextStyle>,
}

impl WidgetBase {
    pub fn new(location: Point, width: u32, height: u32) -> Self {
        Self {
            bounds: Bounds::new(location, width, height),
            request: StyleRequest::default(),
            fg: WHITE,
            bg: Rgb565::BLACK,
            fontcolor: WHITE,
            fontbg: Rgb565::BLACK,
            bdcolor: WHITE,
            fill: false,
            border: 0,
            visible: true,
            greyed: false,
            redraw: true,
            style: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_greyed(&self) -> bool {
        self.greyed
    }

    pub fn fgcolor(&self) -> Rgb565 {
        self.fg
    }

    pub fn bgcolor(&self) -> Rgb565 {
        self.bg
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    /// Whether the application chose a font for this widget
    pub(crate) fn has_font(&self) -> bool {
        self.request.font.is_some()
    }

    /// Resolved text style. Present once the widget is on a screen.
    pub(crate) fn text_style(&self) -> Option<&TextStyle> {
        self.style.as_ref()
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.bounds = Bounds::new(self.bounds.top_left(), width, height);
    }

    /// Fill in colour defaults from the surface and resolve the text style.
    ///
    /// Fails with `FontTooLarge` when the font does not fit the surface's
    /// glyph buffer.
    pub(crate) fn resolve(&mut self, surface: &dyn DrawSurface) -> GuiResult<()> {
        let StyleRequest {
            fg,
            bg,
            fontcolor,
            font,
        } = self.request;

        self.fontcolor = fontcolor.unwrap_or(WHITE);
        self.fill = bg.is_some();
        match fg {
            None => {
                self.fg = surface.fgcolor();
                self.bg = bg.unwrap_or(surface.bgcolor());
                self.fontbg = self.bg;
            }
            Some(fg) => {
                self.fg = fg;
                self.bg = bg.unwrap_or(surface.bgcolor());
                // Text sits on the foreground colour when no background was given
                self.fontbg = bg.unwrap_or(fg);
            }
        }
        self.bdcolor = self.fg;

        let font = font.unwrap_or(surface.default_font());
        self.style = Some(surface.text_style(self.fontcolor, self.fontbg, font)?);
        Ok(())
    }

    /// Background fill and bounding box
    pub(crate) fn draw_border(&self, surface: &mut dyn DrawSurface) {
        if self.fill {
            surface.fill_rect(self.bounds, self.bg);
        }
        if self.border > 0 {
            surface.draw_rect(self.bounds, self.bdcolor);
        }
    }
}

/// Press tracking for touch targets
#[derive(Debug, Clone, Default)]
pub struct TouchState {
    /// A press is in progress; further samples are drags
    pub(crate) busy: bool,
    /// Under the current touch; cleared exactly once on release
    pub(crate) was_touched: bool,
    /// Re-run the touch handler on every sample while pressed
    pub(crate) can_drag: bool,
    pub(crate) long_press_at: Option<Instant>,
}

impl TouchState {
    pub(crate) fn draggable() -> Self {
        Self {
            can_drag: true,
            ..Self::default()
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn was_touched(&self) -> bool {
        self.was_touched
    }

    pub fn can_drag(&self) -> bool {
        self.can_drag
    }

    /// Forget any press in progress
    pub(crate) fn reset(&mut self) {
        self.busy = false;
        self.was_touched = false;
        self.long_press_at = None;
    }
}

/// Press-related durations handed to controls
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub long_press: Duration,
    pub lit: Duration,
}

/// Displayable element
pub trait Widget {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Final geometry once colours and the text style are known
    fn layout(&mut self, _surface: &dyn DrawSurface) -> GuiResult<()> {
        Ok(())
    }

    /// Render the dynamic part, and the static part when `redraw` is set
    fn show(&mut self, surface: &mut dyn DrawSurface);

    fn value(&self) -> Option<Value> {
        None
    }

    /// Store a new value. Returns whether it changed.
    fn set_value(&mut self, _value: Value) -> bool {
        false
    }

    /// Change the widget's accent colour
    fn set_color(&mut self, color: Rgb565) {
        self.base_mut().fg = color;
        self.base_mut().redraw = true;
    }

    fn fgcolor(mut self, color: Rgb565) -> Self
    where
        Self: Sized,
    {
        self.base_mut().request.fg = Some(color);
        self
    }

    fn bgcolor(mut self, color: Rgb565) -> Self
    where
        Self: Sized,
    {
        self.base_mut().request.bg = Some(color);
        self
    }

    fn fontcolor(mut self, color: Rgb565) -> Self
    where
        Self: Sized,
    {
        self.base_mut().request.fontcolor = Some(color);
        self
    }

    fn font(mut self, font: &'static MonoFont<'static>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().request.font = Some(font);
        self
    }

    fn border(mut self, width: u32) -> Self
    where
        Self: Sized,
    {
        self.base_mut().border = width;
        self
    }
}

/// Widget that responds to touch
pub trait Touch: Widget {
    fn touch_state(&self) -> &TouchState;

    fn touch_state_mut(&mut self) -> &mut TouchState;

    /// Touch-down inside the box, or a drag sample for draggable controls
    fn touched(&mut self, point: Point, now: Instant, timing: &Timing) -> Response;

    /// The touch that hit this control ended
    fn untouched(&mut self) -> Response {
        Response::NONE
    }

    /// Expire control-owned timers. Returns whether a redraw is needed.
    fn poll(&mut self, _now: Instant) -> bool {
        false
    }
}

/// Widgets that never receive touch
pub enum Indicator {
    Label(Label),
    Led(Led),
    Meter(Meter),
}

/// Touch targets
pub enum Control {
    Button(Button),
    Pad(Pad),
    Checkbox(Checkbox),
    Slider(Slider),
    Knob(Knob),
    Listbox(Listbox),
    Dropdown(Dropdown),
}

impl Control {
    pub fn as_touch(&self) -> &dyn Touch {
        match self {
            Control::Button(w) => w,
            Control::Pad(w) => w,
            Control::Checkbox(w) => w,
            Control::Slider(w) => w,
            Control::Knob(w) => w,
            Control::Listbox(w) => w,
            Control::Dropdown(w) => w,
        }
    }

    pub fn as_touch_mut(&mut self) -> &mut dyn Touch {
        match self {
            Control::Button(w) => w,
            Control::Pad(w) => w,
            Control::Checkbox(w) => w,
            Control::Slider(w) => w,
            Control::Knob(w) => w,
            Control::Listbox(w) => w,
            Control::Dropdown(w) => w,
        }
    }

    /// Whether a value change runs the primary callback. A button's or
    /// pad's primary callback means activation, not a new value.
    pub fn reports_changes(&self) -> bool {
        !matches!(self, Control::Button(_) | Control::Pad(_))
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Control::Button(b) => Some(b),
            _ => None,
        }
    }
}

/// A widget as stored on a screen
pub enum Element {
    Static(Indicator),
    Touch(Control),
}

impl Element {
    pub fn widget(&self) -> &dyn Widget {
        match self {
            Element::Static(Indicator::Label(w)) => w,
            Element::Static(Indicator::Led(w)) => w,
            Element::Static(Indicator::Meter(w)) => w,
            Element::Touch(Control::Button(w)) => w,
            Element::Touch(Control::Pad(w)) => w,
            Element::Touch(Control::Checkbox(w)) => w,
            Element::Touch(Control::Slider(w)) => w,
            Element::Touch(Control::Knob(w)) => w,
            Element::Touch(Control::Listbox(w)) => w,
            Element::Touch(Control::Dropdown(w)) => w,
        }
    }

    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        match self {
            Element::Static(Indicator::Label(w)) => w,
            Element::Static(Indicator::Led(w)) => w,
            Element::Static(Indicator::Meter(w)) => w,
            Element::Touch(Control::Button(w)) => w,
            Element::Touch(Control::Pad(w)) => w,
            Element::Touch(Control::Checkbox(w)) => w,
            Element::Touch(Control::Slider(w)) => w,
            Element::Touch(Control::Knob(w)) => w,
            Element::Touch(Control::Listbox(w)) => w,
            Element::Touch(Control::Dropdown(w)) => w,
        }
    }

    pub fn base(&self) -> &WidgetBase {
        self.widget().base()
    }

    pub fn control(&self) -> Option<&Control> {
        match self {
            Element::Touch(c) => Some(c),
            Element::Static(_) => None,
        }
    }

    pub fn control_mut(&mut self) -> Option<&mut Control> {
        match self {
            Element::Touch(c) => Some(c),
            Element::Static(_) => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, Element::Touch(_))
    }

    /// Resolve colours, text style and final geometry against `surface`
    pub(crate) fn attach(&mut self, surface: &dyn DrawSurface) -> GuiResult<()> {
        let widget = self.widget_mut();
        widget.base_mut().resolve(surface)?;
        widget.layout(surface)
    }

    /// Full render: background, border, static and dynamic content.
    /// Invisible widgets are skipped.
    pub(crate) fn draw(&mut self, surface: &mut dyn DrawSurface) {
        let widget = self.widget_mut();
        if !widget.base().visible {
            return;
        }
        widget.base_mut().redraw = true;
        surface.usegrey(widget.base().greyed);
        widget.base().draw_border(surface);
        widget.show(surface);
        surface.usegrey(false);
    }

    /// Re-render after a value or colour change. An invisible widget has
    /// its box erased instead.
    pub(crate) fn refresh(&mut self, surface: &mut dyn DrawSurface) {
        let widget = self.widget_mut();
        if !widget.base().visible {
            surface.usegrey(false);
            surface.fill_rect(widget.base().bounds, widget.base().bg);
            return;
        }
        surface.usegrey(widget.base().greyed);
        widget.show(surface);
        surface.usegrey(false);
    }
}

macro_rules! impl_into_element {
    ($($widget:ident => $outer:ident($inner:ident)),* $(,)?) => {
        $(
            impl From<$widget> for Element {
                fn from(widget: $widget) -> Self {
                    Element::$outer($inner::$widget(widget))
                }
            }
        )*
    };
}

impl_into_element!(
    Label => Static(Indicator),
    Led => Static(Indicator),
    Meter => Static(Indicator),
    Button => Touch(Control),
    Pad => Touch(Control),
    Checkbox => Touch(Control),
    Slider => Touch(Control),
    Knob => Touch(Control),
    Listbox => Touch(Control),
    Dropdown => Touch(Control),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuiConfig;
    use crate::ui::styling::{BLUE, RED};
    use crate::ui::surface::Canvas;

    fn resolved(request: StyleRequest) -> WidgetBase {
        let canvas = Canvas::new(&GuiConfig::default());
        let mut base = WidgetBase::new(Point::zero(), 10, 10);
        base.request = request;
        base.resolve(&canvas).unwrap();
        base
    }

    #[test]
    fn test_colors_default_from_surface() {
        let base = resolved(StyleRequest::default());
        assert_eq!(base.fg, WHITE);
        assert_eq!(base.bg, Rgb565::BLACK);
        assert_eq!(base.fontbg, Rgb565::BLACK);
        assert_eq!(base.bdcolor, WHITE);
        assert!(!base.fill);
    }

    #[test]
    fn test_text_sits_on_fg_without_bg() {
        let base = resolved(StyleRequest {
            fg: Some(RED),
            ..StyleRequest::default()
        });
        assert_eq!(base.fg, RED);
        assert_eq!(base.bg, Rgb565::BLACK);
        assert_eq!(base.fontbg, RED);
        assert_eq!(base.bdcolor, RED);
    }

    #[test]
    fn test_bg_enables_fill() {
        let base = resolved(StyleRequest {
            fg: Some(RED),
            bg: Some(BLUE),
            ..StyleRequest::default()
        });
        assert!(base.fill);
        assert_eq!(base.fontbg, BLUE);
        assert_eq!(base.fontcolor, WHITE);
    }
}
