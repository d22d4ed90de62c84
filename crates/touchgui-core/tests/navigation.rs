//! Screen stack, lifecycle hooks and dialog results

mod common;

use common::{Counter, Journal, at, blank, gui};
use embedded_graphics::prelude::*;
use touchgui_core::ui::styling::RED;
use touchgui_core::ui::{
    Bounds, Button, Canvas, DrawSurface, GreyStyle, Label, Listbox, Value, Widget,
};
use touchgui_core::{Ctx, Gui, GuiConfig, GuiError, ScreenClass, ScreenHandler};

/// Records every lifecycle hook under the screen's name
struct Recorder {
    name: &'static str,
    journal: Journal,
}

impl ScreenHandler for Recorder {
    fn on_open(&mut self, ctx: &mut Ctx<'_>) {
        match ctx.take_modal_result() {
            Some(result) => self.journal.push(format!("{} open {:?}", self.name, result)),
            None => self.journal.push(format!("{} open", self.name)),
        }
    }

    fn after_open(&mut self, _ctx: &mut Ctx<'_>) {
        self.journal.push(format!("{} after", self.name));
    }

    fn on_hide(&mut self, _ctx: &mut Ctx<'_>) {
        self.journal.push(format!("{} hide", self.name));
    }
}

fn recorded(name: &'static str, journal: &Journal) -> ScreenClass {
    let journal = journal.clone();
    ScreenClass::new(name, move |b| {
        b.set_handler(Recorder {
            name,
            journal: journal.clone(),
        });
        Ok(())
    })
}

#[test]
fn test_button_navigates_on_release() {
    let mut gui = gui();
    let released = Counter::default();
    let r = released.clone();
    let root = gui
        .change(ScreenClass::new("root", move |b| {
            let r = r.clone();
            b.add(Button::new(b.locn(0, 0), 50, 20).text("Next"))?
                .callback(|ctx, _| ctx.change(ScreenClass::new("b", |_| Ok(()))))
                .release_callback(move |_, _| r.bump());
            Ok(())
        }))
        .unwrap();

    let sentinel = Point::new(200, 200);
    gui.surface_mut().fill_rect(Bounds::new(sentinel, 1, 1), RED);

    gui.press(Point::new(25, 10), at(0)).unwrap();
    assert_eq!(gui.current().map(|s| s.name()), Some("root"));
    gui.release(at(50)).unwrap();

    assert_eq!(released.get(), 1);
    assert_eq!(gui.current().map(|s| s.name()), Some("b"));
    assert_eq!(gui.parent(), Some(root));
    assert_eq!(gui.depth(), 2);
    // The root was full screen, so the whole display was redrawn
    let bg = gui.surface().bgcolor();
    assert_eq!(gui.surface().pixel(sentinel), Some(bg));
}

#[test]
fn test_back_returns_to_parent_and_stops_at_root() {
    let mut gui = gui();
    let a = gui.change(ScreenClass::new("a", |_| Ok(()))).unwrap();
    let b = gui.change(ScreenClass::new("b", |_| Ok(()))).unwrap();
    assert_ne!(a, b);
    assert_eq!(gui.current_id(), Some(b));

    gui.back().unwrap();
    assert_eq!(gui.current_id(), Some(a));
    assert_eq!(gui.parent(), None);

    gui.back().unwrap();
    assert_eq!(gui.current_id(), Some(a));
    assert_eq!(gui.depth(), 1);
}

#[test]
fn test_back_to_ancestor() {
    let mut gui = gui();
    let a = gui.change(blank()).unwrap();
    let b = gui.change(blank()).unwrap();
    let c = gui.change(blank()).unwrap();

    assert_eq!(
        gui.back_to(c),
        Err(GuiError::InvalidScreenArgument {
            reason: "back target is not an ancestor of the current screen"
        })
    );
    assert_eq!(gui.current_id(), Some(c));

    let from_ctx = gui.with_ctx(|ctx| ctx.back_to(ctx.screen_id())).unwrap();
    assert!(matches!(from_ctx, Err(GuiError::InvalidScreenArgument { .. })));

    gui.with_ctx(|ctx| ctx.back_to(b)).unwrap().unwrap();
    assert_eq!(gui.current_id(), Some(b));
    gui.change(blank()).unwrap();
    gui.back_to(a).unwrap();
    assert_eq!(gui.current_id(), Some(a));
    assert_eq!(gui.depth(), 1);
}

#[test]
fn test_lifecycle_hook_order() {
    let mut gui = gui();
    let journal = Journal::default();
    gui.change(recorded("a", &journal)).unwrap();
    gui.change(recorded("b", &journal)).unwrap();
    gui.back().unwrap();

    assert_eq!(
        journal.entries(),
        [
            "a open", "a after", "a hide", "b open", "b after", "b hide", "a open", "a after",
        ]
    );
}

#[test]
fn test_dialog_result_seen_by_parent() {
    let mut gui = gui();
    let journal = Journal::default();
    gui.change(recorded("a", &journal)).unwrap();
    gui.change(blank()).unwrap();
    gui.with_ctx(|ctx| {
        ctx.set_modal_result(Value::text("ok"));
        ctx.back();
        // Nothing happens until the callback returns
        assert!(ctx.navigation_pending());
    })
    .unwrap();

    assert_eq!(journal.entries().last().map(String::as_str), Some("a after"));
    assert!(journal.entries().iter().any(|e| e.starts_with("a open Text")));
    assert_eq!(gui.modal_result(), None);
}

#[test]
fn test_first_navigation_request_wins() {
    let mut gui = gui();
    gui.change(blank()).unwrap();
    gui.with_ctx(|ctx| {
        ctx.change(ScreenClass::new("first", |_| Ok(())));
        ctx.change(ScreenClass::new("second", |_| Ok(())));
    })
    .unwrap();
    assert_eq!(gui.current().map(|s| s.name()), Some("first"));
    assert_eq!(gui.depth(), 2);
}

#[test]
fn test_navigation_from_hook_is_applied() {
    let mut gui = gui();
    gui.change(ScreenClass::new("splash", |b| {
        struct Skip;
        impl ScreenHandler for Skip {
            fn after_open(&mut self, ctx: &mut Ctx<'_>) {
                ctx.change(ScreenClass::new("menu", |_| Ok(())));
            }
        }
        b.set_handler(Skip);
        Ok(())
    }))
    .unwrap();
    assert_eq!(gui.current().map(|s| s.name()), Some("menu"));
}

#[test]
fn test_failed_build_leaves_stack_untouched() {
    let mut gui = gui();
    let root = gui.change(blank()).unwrap();
    let broken = ScreenClass::new("broken", |b| {
        b.add(Listbox::new(b.locn(0, 0), 80, &[])?)?;
        Ok(())
    });
    assert_eq!(gui.change(broken), Err(GuiError::EmptyElementSet));
    assert_eq!(gui.current_id(), Some(root));
    assert_eq!(gui.depth(), 1);
}

#[test]
fn test_widgets_need_a_screen() {
    let mut gui = gui();
    assert!(matches!(
        gui.add(Label::new(Point::zero(), "orphan")),
        Err(GuiError::ScreenNotActive)
    ));
    assert!(matches!(gui.with_ctx(|_| ()), Err(GuiError::ScreenNotActive)));
}

#[test]
fn test_grey_style_rejects_weak_factor() {
    let mut gui = gui();
    gui.change(blank()).unwrap();
    assert_eq!(
        gui.set_grey_style(false, 1.0),
        Err(GuiError::InvalidDimFactor { factor: 1.0 })
    );
    assert!(gui.set_grey_style(false, 3.0).is_ok());
}

#[test]
fn test_custom_surface_config_is_validated() {
    let canvas = || Canvas::new(&GuiConfig::default());
    let flat = GuiConfig {
        height: 0,
        ..GuiConfig::default()
    };
    assert!(matches!(
        Gui::with_surface(flat, canvas()),
        Err(GuiError::InvalidConfig)
    ));

    // A style that only serde could have produced
    let weak: GreyStyle = postcard::from_bytes(&postcard::to_allocvec(&(true, 1.0f32)).unwrap())
        .unwrap();
    let config = GuiConfig {
        grey: weak,
        ..GuiConfig::default()
    };
    assert!(matches!(
        Gui::with_surface(config, canvas()),
        Err(GuiError::InvalidDimFactor { .. })
    ));
    assert!(Gui::with_surface(GuiConfig::default(), canvas()).is_ok());
}

#[test]
fn test_grey_style_change_redraws_disabled_controls() {
    let mut gui = gui();
    gui.change(blank()).unwrap();
    let id = gui
        .add(Button::new(Point::zero(), 50, 20).fgcolor(RED))
        .unwrap()
        .id();
    gui.with_ctx(|ctx| ctx.set_greyed_out(id, true)).unwrap();
    let before = gui.surface().grey_style().apply(RED);
    assert_eq!(gui.surface().pixel(Point::new(10, 10)), Some(before));

    gui.with_ctx(|ctx| ctx.set_grey_style(false, 4.0))
        .unwrap()
        .unwrap();
    let after = gui.surface().grey_style().apply(RED);
    assert_ne!(before, after);
    assert_eq!(gui.surface().pixel(Point::new(10, 10)), Some(after));

    // The widget colour itself is untouched
    gui.with_ctx(|ctx| ctx.set_greyed_out(id, false)).unwrap();
    assert_eq!(gui.surface().pixel(Point::new(10, 10)), Some(RED));
    assert!(matches!(
        gui.with_ctx(|ctx| ctx.set_grey_style(true, 0.5)).unwrap(),
        Err(GuiError::InvalidDimFactor { .. })
    ));
}

#[test]
fn test_shutdown_blanks_and_restarts() {
    let mut gui = gui();
    gui.change(ScreenClass::new("lit", |b| {
        b.add(Button::new(b.locn(0, 0), 50, 20).fgcolor(RED))?;
        Ok(())
    }))
    .unwrap();
    assert_eq!(gui.surface().pixel(Point::new(10, 10)), Some(RED));

    gui.shutdown();
    assert!(gui.is_shut_down());
    assert!(gui.current().is_none());
    let bg = gui.surface().bgcolor();
    assert_eq!(gui.surface().pixel(Point::new(10, 10)), Some(bg));

    gui.change(blank()).unwrap();
    assert!(!gui.is_shut_down());
    assert_eq!(gui.depth(), 1);
}
