//! Modal apertures and partial redraw on close

mod common;

use common::{Ids, blank, gui};
use embedded_graphics::prelude::*;
use touchgui_core::ui::styling::{BLUE, GREEN, RED, WHITE};
use touchgui_core::ui::{Bounds, DrawSurface, Label, Widget};
use touchgui_core::ui::{Value, WidgetId};
use touchgui_core::{ApertureFrame, Ctx, Gui, ScreenClass, ScreenHandler};

const INSIDE: Point = Point::new(75, 25);
const OUTSIDE: Point = Point::new(255, 155);

fn root(ids: Ids) -> ScreenClass {
    ScreenClass::new("root", move |b| {
        let inside = b.add(Label::new(b.locn(20, 20), "w1").width(60).bgcolor(BLUE))?;
        ids.push(inside.id());
        let outside = b.add(Label::new(b.locn(200, 150), "w2").width(60).bgcolor(BLUE))?;
        ids.push(outside.id());
        Ok(())
    })
}

fn dialog(ids: Ids) -> ScreenClass {
    let frame = ApertureFrame::new(Point::new(10, 10), 100, 60)
        .border(2)
        .bgcolor(GREEN);
    ScreenClass::aperture("dialog", frame, move |b| {
        assert_eq!(b.locn(5, 5), Point::new(15, 15));
        assert_eq!(b.size(), Size::new(100, 60));
        let label = b.add(Label::new(b.locn(5, 40), "ok?"))?;
        ids.push(label.id());
        Ok(())
    })
}

fn pixel(gui: &Gui, at: Point) -> Option<embedded_graphics::pixelcolor::Rgb565> {
    gui.surface().pixel(at)
}

#[test]
fn test_closing_aperture_redraws_covered_area_only() {
    let mut gui = gui();
    gui.change(root(Ids::default())).unwrap();
    assert_eq!(pixel(&gui, INSIDE), Some(BLUE));
    assert_eq!(pixel(&gui, OUTSIDE), Some(BLUE));

    gui.change(dialog(Ids::default())).unwrap();
    assert!(gui.current().is_some_and(|s| s.is_modal()));
    // The frame covers w1 but leaves w2 alone
    assert_eq!(pixel(&gui, INSIDE), Some(GREEN));
    assert_eq!(pixel(&gui, OUTSIDE), Some(BLUE));

    // Something outside the aperture that a full redraw would wipe
    gui.surface_mut().fill_rect(Bounds::new(OUTSIDE, 0, 0), RED);

    gui.back().unwrap();
    assert_eq!(gui.current().map(|s| s.name()), Some("root"));
    assert_eq!(pixel(&gui, INSIDE), Some(BLUE));
    assert_eq!(pixel(&gui, OUTSIDE), Some(RED));
    let bg = gui.surface().bgcolor();
    assert_eq!(pixel(&gui, Point::new(15, 65)), Some(bg));
}

/// Reacts to a dialog outcome by hiding one widget and relabelling another
struct Outcome {
    hide: WidgetId,
    status: WidgetId,
}

impl ScreenHandler for Outcome {
    fn on_open(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(result) = ctx.take_modal_result() {
            ctx.set_visible(self.hide, false);
            let text = if result.as_flag() == Some(true) {
                "yes"
            } else {
                "no"
            };
            ctx.set_text(self.status, text);
        }
    }
}

#[test]
fn test_on_open_changes_outside_aperture_are_drawn() {
    let mut gui = gui();
    let ids = Ids::default();
    let captured = ids.clone();
    gui.change(ScreenClass::new("root", move |b| {
        let hide = b
            .add(Label::new(b.locn(200, 150), "w2").width(60).bgcolor(BLUE))?
            .id();
        let status = b
            .add(Label::new(b.locn(200, 100), "").width(60).bgcolor(BLUE))?
            .id();
        captured.push(status);
        b.set_handler(Outcome { hide, status });
        Ok(())
    }))
    .unwrap();
    let status = ids.get(0);
    let status_box = gui
        .current()
        .and_then(|s| s.element(status))
        .map(|e| e.base().bounds())
        .unwrap();
    let has_text = |gui: &Gui| {
        (status_box.y0..=status_box.y1).any(|y| {
            (status_box.x0..=status_box.x1).any(|x| pixel(gui, Point::new(x, y)) == Some(WHITE))
        })
    };
    assert!(!has_text(&gui));

    gui.change(dialog(Ids::default())).unwrap();
    gui.with_ctx(|ctx| {
        ctx.set_modal_result(Value::Flag(true));
        ctx.back();
    })
    .unwrap();

    // Neither label was under the aperture, yet both show the change
    let bg = gui.surface().bgcolor();
    assert_eq!(pixel(&gui, OUTSIDE), Some(bg));
    assert_eq!(gui.value(status), Some(Value::text("yes")));
    assert!(has_text(&gui));
}

#[test]
fn test_forward_from_aperture_redraws_everything() {
    let mut gui = gui();
    gui.change(root(Ids::default())).unwrap();
    gui.change(dialog(Ids::default())).unwrap();
    gui.surface_mut().fill_rect(Bounds::new(OUTSIDE, 0, 0), RED);

    gui.change(blank()).unwrap();
    let bg = gui.surface().bgcolor();
    assert_eq!(pixel(&gui, OUTSIDE), Some(bg));

    // A full screen closed, so the dialog is drawn whole
    gui.back().unwrap();
    assert_eq!(pixel(&gui, Point::new(50, 50)), Some(GREEN));
}

#[test]
fn test_aperture_widgets_are_placed_relative_to_frame() {
    let mut gui = gui();
    let ids = Ids::default();
    gui.change(root(Ids::default())).unwrap();
    gui.change(dialog(ids.clone())).unwrap();

    let bounds = gui
        .current()
        .and_then(|s| s.element(ids.get(0)))
        .map(|e| e.base().bounds())
        .unwrap();
    assert_eq!(bounds.top_left(), Point::new(15, 50));
    assert_eq!(
        gui.current().and_then(|s| s.frame_bounds()),
        Some(Bounds::new(Point::new(10, 10), 100, 60))
    );
}
