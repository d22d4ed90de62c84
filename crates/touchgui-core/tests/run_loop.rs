//! The async input loop driven by a scripted panel

mod common;

use std::collections::VecDeque;

use common::{Counter, blank};
use embassy_futures::block_on;
use embedded_graphics::prelude::*;
use touchgui_core::ui::{Checkbox, DrawSurface, Pad, TouchPoint, Value};
use touchgui_core::{Gui, GuiConfig, GuiError, ScreenClass, ShutdownHandle, TouchPanel};

/// Replays samples, then reports no touch
struct Scripted {
    samples: VecDeque<Option<TouchPoint>>,
    reads: usize,
    stop_after: Option<(usize, ShutdownHandle)>,
}

impl Scripted {
    fn new(samples: impl IntoIterator<Item = Option<(u16, u16)>>) -> Self {
        Self {
            samples: samples
                .into_iter()
                .map(|s| s.map(|(x, y)| TouchPoint::new(x, y)))
                .collect(),
            reads: 0,
            stop_after: None,
        }
    }
}

impl TouchPanel for Scripted {
    fn get_touch(&mut self) -> Option<TouchPoint> {
        self.reads += 1;
        if let Some((limit, handle)) = &self.stop_after
            && self.reads >= *limit
        {
            handle.shutdown();
        }
        self.samples.pop_front().flatten()
    }
}

fn fast_gui() -> Gui {
    Gui::new(GuiConfig {
        poll_interval_ms: 0,
        debounce_ms: 0,
        ..GuiConfig::default()
    })
    .unwrap()
}

#[test]
fn test_run_dispatches_until_callback_shuts_down() {
    let mut gui = fast_gui();
    let toggled = Counter::default();
    let t = toggled.clone();
    gui.change(ScreenClass::new("main", move |b| {
        let t = t.clone();
        b.add(Checkbox::new(b.locn(0, 0), 20))?
            .callback(move |_, _| t.bump());
        b.add(Pad::new(b.locn(100, 100), 20, 20).on_press())?
            .callback(|ctx, _| ctx.shutdown());
        Ok(())
    }))
    .unwrap();

    // Each touch-down is sampled twice
    let mut panel = Scripted::new([
        Some((5, 5)),
        Some((5, 5)),
        Some((6, 6)),
        None,
        Some((110, 110)),
        Some((110, 110)),
    ]);
    let presents = Counter::default();
    let p = presents.clone();
    let result = block_on(gui.run(&mut panel, move |_| p.bump()));

    assert_eq!(result, Ok(()));
    assert!(gui.is_shut_down());
    assert!(panel.samples.is_empty());
    // The drag sample does not toggle again
    assert_eq!(toggled.get(), 1);
    // Initial frame, one per pass, and the final blank frame
    assert_eq!(presents.get(), 6);
}

#[test]
fn test_checkbox_state_survives_until_shutdown() {
    let mut gui = fast_gui();
    let seen = Counter::default();
    let s = seen.clone();
    gui.change(ScreenClass::new("main", move |b| {
        let s = s.clone();
        b.add(Checkbox::new(b.locn(0, 0), 20))?.callback(move |ctx, id| {
            if ctx.value(id) == Some(Value::Flag(true)) {
                s.bump();
                ctx.shutdown();
            }
        });
        Ok(())
    }))
    .unwrap();

    let mut panel = Scripted::new([Some((5, 5)), Some((5, 5)), None]);
    block_on(gui.run(&mut panel, |_| {})).unwrap();
    assert_eq!(seen.get(), 1);
    assert!(gui.current().is_none());
}

#[test]
fn test_shutdown_handle_stops_idle_loop() {
    let mut gui = fast_gui();
    gui.change(blank()).unwrap();
    let mut panel = Scripted::new([]);
    panel.stop_after = Some((3, gui.shutdown_handle()));

    block_on(gui.run(&mut panel, |_| {})).unwrap();
    assert!(gui.is_shut_down());
    assert!(panel.reads >= 3);
    let bg = gui.surface().bgcolor();
    assert_eq!(gui.surface().pixel(Point::new(10, 10)), Some(bg));
}

#[test]
fn test_run_needs_a_screen() {
    let mut gui = fast_gui();
    let mut panel = Scripted::new([]);
    assert_eq!(
        block_on(gui.run(&mut panel, |_| {})),
        Err(GuiError::ScreenNotActive)
    );
    assert_eq!(panel.reads, 0);
}
