//! Widget toolkit
//!
//! This module provides:
//! - Core value types (bounds, touch events, widget values)
//! - The drawing surface widgets render through, with grey-out support
//! - Widgets, both passive indicators and touch controls
//! - Colours, text styles and the grey-out transform

pub mod components;
pub mod core;
pub mod styling;
pub mod surface;

// Re-export commonly used items
pub use components::{
    Button, ButtonGroup, ButtonList, Checkbox, Control, Dropdown, Element, Indicator, Knob, Label,
    Led, Listbox, Meter, Orientation, Pad, RadioButtons, Shape, Slider, Touch, Widget,
};
pub use core::{
    Bounds, GroupId, Response, ScreenId, Text, TouchEvent, TouchPoint, Trigger, Value, WidgetId,
};
pub use styling::{GreyStyle, TextStyle};
pub use surface::{Canvas, DrawSurface, SavedRegion};
