//! Input sampling and cooperative tasks driven by [`Gui::run`](crate::Gui::run)

pub mod input;
pub mod tasks;

pub use input::{Debouncer, TouchPanel};
pub use tasks::{
    CancelToken, Cancelled, REQUEST_QUEUE_LEN, Scheduler, TaskLink, TaskPolicy, UiRequest,
};
