//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embassy_time::Instant;
use touchgui_core::ui::{Button, Control, Element, WidgetId};
use touchgui_core::{Gui, GuiConfig, ScreenClass};

/// GUI on a 320x240 panel
pub fn gui() -> Gui {
    Gui::new(GuiConfig {
        width: 320,
        height: 240,
        ..GuiConfig::default()
    })
    .unwrap()
}

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Shared call counter for callbacks
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<u32>>);

impl Counter {
    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

/// Shared record of events in the order they happened
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// Widget ids captured inside a screen's build function
#[derive(Clone, Default)]
pub struct Ids(Rc<RefCell<Vec<WidgetId>>>);

impl Ids {
    pub fn push(&self, id: WidgetId) {
        self.0.borrow_mut().push(id);
    }

    pub fn get(&self, index: usize) -> WidgetId {
        self.0.borrow()[index]
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Button on the current screen
pub fn button(gui: &Gui, id: WidgetId) -> &Button {
    match gui.current().and_then(|screen| screen.element(id)) {
        Some(Element::Touch(Control::Button(button))) => button,
        _ => panic!("{id:?} is not a button"),
    }
}

/// An empty full-display screen
pub fn blank() -> ScreenClass {
    ScreenClass::new("blank", |_| Ok(()))
}
