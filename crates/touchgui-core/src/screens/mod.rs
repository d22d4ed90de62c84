//! Screens, their construction and the context handed to callbacks

pub mod context;
pub mod dialog;
pub(crate) mod dispatch;
pub mod screen;

pub use context::Ctx;
pub use dialog::{CLOSE_RESULT, DialogBox};
pub use screen::{
    ApertureFrame, Callback, Screen, ScreenBuilder, ScreenClass, ScreenHandler, WidgetSlot,
};
