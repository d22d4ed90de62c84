//! Core UI types shared by widgets, screens and the input loop

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Debounced touch events produced by the input loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// First sample of a touch, after debouncing
    Press(TouchPoint),
    /// Subsequent sample while the panel is still touched
    Drag(TouchPoint),
    /// The panel stopped reporting a touch
    Release,
}

/// Stable handle of a widget within its owning screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) usize);

impl WidgetId {
    /// Position in the screen's display list (z-order)
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Identity of one screen instance. Never reused within a `Gui`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(pub(crate) u32);

/// Handle of a button group registered on a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

/// Inclusive bounding box in device pixels.
///
/// A widget placed at `(x0, y0)` with width `w` covers `x0..=x0 + w`, so
/// two widgets sharing an edge both own the boundary pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Bounds {
    pub fn new(location: Point, width: u32, height: u32) -> Self {
        Self {
            x0: location.x,
            y0: location.y,
            x1: location.x + width as i32,
            y1: location.y + height as i32,
        }
    }

    /// Build from two opposite corners in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }

    /// Nominal width (`x1 - x0`); the box spans one more pixel than this.
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0) as u32
    }

    /// Nominal height (`y1 - y0`)
    pub fn height(&self) -> u32 {
        (self.y1 - self.y0) as u32
    }

    /// Inclusive hit test on both edges
    pub fn contains(&self, point: Point) -> bool {
        self.x0 <= point.x && point.x <= self.x1 && self.y0 <= point.y && point.y <= self.y1
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        other.y0 <= self.y1 && other.y1 >= self.y0 && other.x0 <= self.x1 && other.x1 >= self.x0
    }

    /// Shrink by `by` pixels on every side
    pub fn inset(&self, by: u32) -> Self {
        let by = by as i32;
        Self {
            x0: self.x0 + by,
            y0: self.y0 + by,
            x1: self.x1 - by,
            y1: self.y1 - by,
        }
    }

    /// Covered pixel area as an embedded-graphics rectangle
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::with_corners(self.top_left(), self.bottom_right())
    }
}

/// Short text carried by labels, buttons and listbox entries
pub type Text = heapless::String<32>;

/// Build a [`Text`], truncating on a character boundary when too long.
pub fn text(s: &str) -> Text {
    let mut out = Text::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Clamp a fraction into `0.0..=1.0`. NaN reads as `0.0`.
pub fn clamp_fraction(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Logical value of a widget
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Fractional indicator (slider, meter), always within `0.0..=1.0`
    Fraction(f32),
    /// Checkbox or LED state
    Flag(bool),
    /// Selected entry of a listbox
    Index(usize),
    /// Label or button text
    Text(Text),
}

impl Value {
    pub fn text(s: &str) -> Self {
        Value::Text(text(s))
    }

    /// Clamp fractional values into `0.0..=1.0`
    pub fn normalized(self) -> Self {
        match self {
            Value::Fraction(v) => Value::Fraction(clamp_fraction(v)),
            other => other,
        }
    }

    pub fn as_fraction(&self) -> Option<f32> {
        match self {
            Value::Fraction(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Index(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Which user callback a control asks the engine to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Value change, or activation of a button or pad
    Primary,
    /// Touch release (`cb_end`)
    Release,
    /// Touch held past the long-press time
    LongPress,
}

/// Result of feeding a touch sample to a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// The control's dynamic content must be re-rendered
    pub redraw: bool,
    /// Callback to invoke before the redraw
    pub fire: Option<Trigger>,
    /// Open the control's pop-up list
    pub open_list: bool,
}

impl Response {
    pub const NONE: Response = Response {
        redraw: false,
        fire: None,
        open_list: false,
    };

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::NONE
        }
    }

    pub fn fire(trigger: Trigger) -> Self {
        Self {
            fire: Some(trigger),
            ..Self::NONE
        }
    }

    /// Value changed: run the change callback, then redraw
    pub fn changed() -> Self {
        Self {
            redraw: true,
            fire: Some(Trigger::Primary),
            open_list: false,
        }
    }

    pub fn open_list() -> Self {
        Self {
            open_list: true,
            ..Self::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_hit_test_is_inclusive() {
        let b = Bounds::new(Point::new(10, 20), 50, 20);
        assert!(b.contains(Point::new(10, 20)));
        assert!(b.contains(Point::new(60, 40)));
        assert!(!b.contains(Point::new(61, 40)));
        assert!(!b.contains(Point::new(60, 41)));
        assert!(!b.contains(Point::new(9, 30)));
    }

    #[test]
    fn test_bounds_shared_edge_overlaps() {
        let left = Bounds::new(Point::new(0, 0), 10, 10);
        let right = Bounds::new(Point::new(10, 0), 10, 10);
        let apart = Bounds::new(Point::new(11, 0), 10, 10);
        assert!(left.overlaps(&right));
        assert!(!left.overlaps(&apart));
    }

    #[test]
    fn test_to_rectangle_covers_both_edges() {
        let rect = Bounds::new(Point::new(2, 3), 4, 5).to_rectangle();
        assert_eq!(rect.top_left, Point::new(2, 3));
        assert_eq!(rect.size, Size::new(5, 6));
    }

    #[test]
    fn test_fraction_clamped() {
        assert_eq!(Value::Fraction(-0.3).normalized(), Value::Fraction(0.0));
        assert_eq!(Value::Fraction(1.7).normalized(), Value::Fraction(1.0));
        assert_eq!(Value::Index(7).normalized(), Value::Index(7));
    }

    #[test]
    fn test_nan_fraction_reads_as_zero() {
        assert_eq!(Value::Fraction(f32::NAN).normalized(), Value::Fraction(0.0));
        assert_eq!(clamp_fraction(f32::NAN), 0.0);
        assert_eq!(clamp_fraction(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_text_truncates() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(text(long).len(), 32);
        assert_eq!(text("ok").as_str(), "ok");
    }
}
