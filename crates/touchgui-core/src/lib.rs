//! Retained-mode GUI engine for small touch LCDs
//!
//! The crate manages screens of widgets (buttons, sliders, knobs, labels,
//! LEDs, meters, checkboxes, listboxes, dropdowns and invisible touch
//! pads), routes touch
//! samples to them, and keeps a navigation stack of full screens and modal
//! apertures. Application tasks run cooperatively next to the input loop.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).
//!
//! ```ignore
//! let mut gui = Gui::new(GuiConfig::default())?;
//! gui.change(ScreenClass::new("home", |b| {
//!     b.add(Button::new(b.locn(0, 0), 50, 20).text("Go"))?
//!         .callback(|ctx, _| ctx.change(next_screen()));
//!     Ok(())
//! }))?;
//! block_on(gui.run(&mut panel, |canvas| { let _ = canvas.flush(&mut display); }))?;
//! ```

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod framebuffer;
pub mod navigation;
pub mod runtime;
pub mod screens;
pub mod ui;

pub use config::GuiConfig;
pub use error::{GuiError, GuiResult};
pub use navigation::{Gui, ShutdownHandle};
pub use runtime::{CancelToken, Cancelled, TaskLink, TaskPolicy, TouchPanel, UiRequest};
pub use screens::{
    ApertureFrame, Ctx, DialogBox, Screen, ScreenBuilder, ScreenClass, ScreenHandler,
};
