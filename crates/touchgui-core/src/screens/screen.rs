//! Screens and how they are built
//!
//! A [`Screen`] owns its widgets for its whole life. Widgets are stored in
//! display order (the order they were added, which is also the z-order)
//! and addressed by [`WidgetId`]. Touch targets are additionally listed in
//! the touch list, which is the hit-test order.
//!
//! Screens are never constructed directly. The navigation stack builds a
//! fresh instance from a [`ScreenClass`] each time one is opened, so going
//! forward to the same class twice gives two independent screens.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::future::Future;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::debug;

use crate::error::GuiResult;
use crate::runtime::tasks::{CancelToken, Cancelled, TaskLink, TaskPolicy};
use crate::screens::context::{Ctx, Session};
use crate::ui::components::groups::ButtonGroup;
use crate::ui::components::{Control, Element, Touch};
use crate::ui::core::{Bounds, GroupId, ScreenId, Trigger, Value, WidgetId};
use crate::ui::surface::DrawSurface;

/// Widget callback. The widget's identity is always passed, so one closure
/// can serve several widgets.
pub type Callback = Box<dyn FnMut(&mut Ctx<'_>, WidgetId)>;

type BuildFn = dyn Fn(&mut ScreenBuilder<'_>) -> GuiResult<()>;

// ---------------------------------------------------------------------------
// Lifecycle hooks
// ---------------------------------------------------------------------------

/// Optional lifecycle hooks of a screen. All default to doing nothing.
pub trait ScreenHandler {
    /// The screen just became current, before it is redrawn. Read the
    /// modal result of a dialog that just closed here. Widget changes made
    /// here are drawn straight away.
    fn on_open(&mut self, _ctx: &mut Ctx<'_>) {}

    /// The screen has been drawn
    fn after_open(&mut self, _ctx: &mut Ctx<'_>) {}

    /// Another screen is about to replace this one
    fn on_hide(&mut self, _ctx: &mut Ctx<'_>) {}
}

// ---------------------------------------------------------------------------
// Screen classes
// ---------------------------------------------------------------------------

/// Rectangle of a modal screen (aperture)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApertureFrame {
    location: Point,
    width: u32,
    height: u32,
    border: u32,
    fgcolor: Option<Rgb565>,
    bgcolor: Option<Rgb565>,
}

impl ApertureFrame {
    pub fn new(location: Point, width: u32, height: u32) -> Self {
        Self {
            location,
            width,
            height,
            border: 0,
            fgcolor: None,
            bgcolor: None,
        }
    }

    /// Border width, drawn in the foreground colour
    pub fn border(mut self, width: u32) -> Self {
        self.border = width;
        self
    }

    pub fn fgcolor(mut self, color: Rgb565) -> Self {
        self.fgcolor = Some(color);
        self
    }

    pub fn bgcolor(mut self, color: Rgb565) -> Self {
        self.bgcolor = Some(color);
        self
    }

    fn resolve(&self, surface: &dyn DrawSurface) -> Frame {
        Frame {
            bounds: Bounds::new(self.location, self.width, self.height),
            fg: self.fgcolor.unwrap_or(surface.fgcolor()),
            bg: self.bgcolor.unwrap_or(surface.bgcolor()),
            border: self.border,
        }
    }
}

/// Aperture rectangle with colours resolved against the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Frame {
    pub(crate) bounds: Bounds,
    pub(crate) fg: Rgb565,
    pub(crate) bg: Rgb565,
    pub(crate) border: u32,
}

/// Recipe for a screen: a name, an optional aperture frame and a build
/// function that adds the widgets.
///
/// ```ignore
/// let settings = ScreenClass::new("settings", |b| {
///     b.add(Label::new(b.locn(0, 0), "Settings"))?;
///     b.add(Button::new(b.locn(0, 100), 50, 20).text("Back"))?
///         .callback(|ctx, _| ctx.back());
///     Ok(())
/// });
/// gui.change(settings)?;
/// ```
#[derive(Clone)]
pub struct ScreenClass {
    name: &'static str,
    frame: Option<ApertureFrame>,
    build: Rc<BuildFn>,
}

impl ScreenClass {
    /// Full-display screen
    pub fn new<F>(name: &'static str, build: F) -> Self
    where
        F: Fn(&mut ScreenBuilder<'_>) -> GuiResult<()> + 'static,
    {
        Self {
            name,
            frame: None,
            build: Rc::new(build),
        }
    }

    /// Modal screen occupying `frame`. Closing it redraws only the area it
    /// covered.
    pub fn aperture<F>(name: &'static str, frame: ApertureFrame, build: F) -> Self
    where
        F: Fn(&mut ScreenBuilder<'_>) -> GuiResult<()> + 'static,
    {
        Self {
            name,
            frame: Some(frame),
            build: Rc::new(build),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_modal(&self) -> bool {
        self.frame.is_some()
    }

    /// Build a new screen instance. Tasks spawned by a failing build are
    /// dropped with it.
    pub(crate) fn instantiate(
        &self,
        id: ScreenId,
        surface: &dyn DrawSurface,
        session: &mut Session,
    ) -> GuiResult<Screen> {
        let mut screen = Screen::new(id, self.name);
        screen.frame = self.frame.map(|frame| frame.resolve(surface));
        let mut builder = ScreenBuilder {
            screen: &mut screen,
            surface,
            session: &mut *session,
        };
        if let Err(e) = (self.build)(&mut builder) {
            session.scheduler.drop_screen(id);
            return Err(e);
        }
        debug!(
            "Built screen {} ({} widgets, {} touch targets)",
            self.name,
            screen.slots.len(),
            screen.touch_list.len()
        );
        Ok(screen)
    }
}

impl fmt::Debug for ScreenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenClass")
            .field("name", &self.name)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct Callbacks {
    primary: Option<Callback>,
    release: Option<Callback>,
    long_press: Option<Callback>,
}

impl Callbacks {
    fn slot(&mut self, trigger: Trigger) -> &mut Option<Callback> {
        match trigger {
            Trigger::Primary => &mut self.primary,
            Trigger::Release => &mut self.release,
            Trigger::LongPress => &mut self.long_press,
        }
    }

    pub(crate) fn has(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Primary => self.primary.is_some(),
            Trigger::Release => self.release.is_some(),
            Trigger::LongPress => self.long_press.is_some(),
        }
    }

    /// Take a callback out for the duration of the call
    pub(crate) fn take(&mut self, trigger: Trigger) -> Option<Callback> {
        self.slot(trigger).take()
    }

    /// Put a callback back unless the call replaced it
    pub(crate) fn restore(&mut self, trigger: Trigger, callback: Callback) {
        let slot = self.slot(trigger);
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}

pub(crate) struct Slot {
    pub(crate) element: Element,
    pub(crate) callbacks: Callbacks,
}

/// One instance of a [`ScreenClass`] on the navigation stack
pub struct Screen {
    id: ScreenId,
    name: &'static str,
    pub(crate) slots: Vec<Slot>,
    pub(crate) touch_list: Vec<WidgetId>,
    pub(crate) groups: Vec<Option<Box<dyn ButtonGroup>>>,
    pub(crate) frame: Option<Frame>,
    pub(crate) handler: Option<Box<dyn ScreenHandler>>,
}

impl Screen {
    pub(crate) fn new(id: ScreenId, name: &'static str) -> Self {
        Self {
            id,
            name,
            slots: Vec::new(),
            touch_list: Vec::new(),
            groups: Vec::new(),
            frame: None,
            handler: None,
        }
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this screen is an aperture
    pub fn is_modal(&self) -> bool {
        self.frame.is_some()
    }

    /// Aperture rectangle, `None` for full-display screens
    pub fn frame_bounds(&self) -> Option<Bounds> {
        self.frame.map(|frame| frame.bounds)
    }

    /// Number of widgets
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn element(&self, id: WidgetId) -> Option<&Element> {
        self.slots.get(id.0).map(|slot| &slot.element)
    }

    /// Touch targets in hit-test order
    pub fn touch_list(&self) -> &[WidgetId] {
        &self.touch_list
    }

    pub fn value(&self, id: WidgetId) -> Option<Value> {
        self.element(id).and_then(|e| e.widget().value())
    }

    pub(crate) fn element_mut(&mut self, id: WidgetId) -> Option<&mut Element> {
        self.slots.get_mut(id.0).map(|slot| &mut slot.element)
    }

    pub(crate) fn control_mut(&mut self, id: WidgetId) -> Option<&mut Control> {
        self.element_mut(id).and_then(Element::control_mut)
    }

    pub(crate) fn touch_mut(&mut self, id: WidgetId) -> Option<&mut dyn Touch> {
        self.control_mut(id).map(Control::as_touch_mut)
    }

    pub(crate) fn has_callback(&self, id: WidgetId, trigger: Trigger) -> bool {
        self.slots
            .get(id.0)
            .is_some_and(|slot| slot.callbacks.has(trigger))
    }

    /// Group that owns the primary trigger of a button
    pub(crate) fn group_of(&self, id: WidgetId) -> Option<GroupId> {
        match self.element(id)? {
            Element::Touch(Control::Button(button)) => button.group(),
            _ => None,
        }
    }

    /// Resolve and store a widget. Touch targets join the touch list.
    pub(crate) fn add_element(
        &mut self,
        mut element: Element,
        surface: &dyn DrawSurface,
    ) -> GuiResult<WidgetId> {
        element.attach(surface)?;
        let id = WidgetId(self.slots.len());
        if element.is_touch() {
            self.touch_list.push(id);
        }
        self.slots.push(Slot {
            element,
            callbacks: Callbacks::default(),
        });
        Ok(id)
    }

    /// Forget presses in progress so a screen shown again starts idle
    pub(crate) fn reset_touch(&mut self) {
        for id in self.touch_list.clone() {
            if let Some(target) = self.touch_mut(id) {
                target.touch_state_mut().reset();
            }
        }
    }

    fn draw_frame(&self, surface: &mut dyn DrawSurface) {
        if let Some(frame) = self.frame {
            surface.fill_rect(frame.bounds, frame.bg);
            for i in 0..frame.border {
                surface.draw_rect(frame.bounds.inset(i), frame.fg);
            }
        }
    }

    pub(crate) fn draw_all(&mut self, surface: &mut dyn DrawSurface) {
        for slot in &mut self.slots {
            slot.element.draw(surface);
        }
    }

    /// Redraw after becoming current. `uncovered` is the area of a modal
    /// screen that just closed: only that area is blanked, and only widgets
    /// overlapping it are drawn again.
    pub(crate) fn redraw(&mut self, surface: &mut dyn DrawSurface, uncovered: Option<Bounds>) {
        let bg = surface.bgcolor();
        match (uncovered, self.is_modal()) {
            (Some(area), false) => {
                surface.fill_rect(area, bg);
                for slot in &mut self.slots {
                    if slot.element.base().bounds().overlaps(&area) {
                        slot.element.draw(surface);
                    }
                }
            }
            (Some(area), true) => {
                surface.fill_rect(area, bg);
                self.draw_frame(surface);
                self.draw_all(surface);
            }
            (None, true) => {
                self.draw_frame(surface);
                self.draw_all(surface);
            }
            (None, false) => {
                surface.clear();
                self.draw_all(surface);
            }
        }
    }

    /// Redraw every visible greyed-out widget, e.g. after the grey style
    /// changed
    pub(crate) fn redraw_greyed(&mut self, surface: &mut dyn DrawSurface) {
        for slot in &mut self.slots {
            if slot.element.base().is_greyed() {
                slot.element.draw(surface);
            }
        }
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("widgets", &self.slots.len())
            .field("modal", &self.is_modal())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Handle to a freshly added widget for attaching callbacks
pub struct WidgetSlot<'a> {
    id: WidgetId,
    callbacks: &'a mut Callbacks,
}

impl<'a> WidgetSlot<'a> {
    pub(crate) fn new(id: WidgetId, callbacks: &'a mut Callbacks) -> Self {
        Self { id, callbacks }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Activation of a button or pad, or a value change of any other
    /// control
    pub fn callback<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Ctx<'_>, WidgetId) + 'static,
    {
        self.callbacks.primary = Some(Box::new(f));
        self
    }

    /// Runs once when the touch that hit the widget ends
    pub fn release_callback<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Ctx<'_>, WidgetId) + 'static,
    {
        self.callbacks.release = Some(Box::new(f));
        self
    }

    /// Runs once when a press is held for the long-press time
    pub fn long_press<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Ctx<'_>, WidgetId) + 'static,
    {
        self.callbacks.long_press = Some(Box::new(f));
        self
    }
}

/// Passed to a [`ScreenClass`] build function
pub struct ScreenBuilder<'a> {
    screen: &'a mut Screen,
    surface: &'a dyn DrawSurface,
    session: &'a mut Session,
}

impl ScreenBuilder<'_> {
    pub fn id(&self) -> ScreenId {
        self.screen.id
    }

    pub fn surface(&self) -> &dyn DrawSurface {
        self.surface
    }

    /// Absolute position of a point given relative to the screen: the
    /// aperture origin for modal screens, the display origin otherwise.
    pub fn locn(&self, x: i32, y: i32) -> Point {
        let origin = self
            .screen
            .frame
            .map(|frame| frame.bounds.top_left())
            .unwrap_or_default();
        origin + Point::new(x, y)
    }

    /// Area available to the screen's widgets
    pub fn size(&self) -> Size {
        match self.screen.frame {
            Some(frame) => Size::new(frame.bounds.width(), frame.bounds.height()),
            None => self.surface.size(),
        }
    }

    /// Register a widget. Fails with `FontTooLarge` when its font does not
    /// fit the glyph buffer.
    pub fn add<W: Into<Element>>(&mut self, widget: W) -> GuiResult<WidgetSlot<'_>> {
        let id = self.screen.add_element(widget.into(), self.surface)?;
        Ok(WidgetSlot::new(id, &mut self.screen.slots[id.0].callbacks))
    }

    /// Register a button group whose members were added with this builder
    pub fn add_group<G: ButtonGroup + 'static>(&mut self, group: G) -> GroupId {
        let gid = GroupId(self.screen.groups.len());
        for member in group.members() {
            if let Some(Control::Button(button)) = self.screen.control_mut(member) {
                button.group = Some(gid);
            }
        }
        self.screen.groups.push(Some(Box::new(group)));
        gid
    }

    pub fn set_handler<H: ScreenHandler + 'static>(&mut self, handler: H) {
        self.screen.handler = Some(Box::new(handler));
    }

    /// Start a task owned by this screen
    pub fn spawn<F, Fut>(&mut self, policy: TaskPolicy, f: F) -> CancelToken
    where
        F: FnOnce(TaskLink) -> Fut,
        Fut: Future<Output = Result<(), Cancelled>> + 'static,
    {
        self.session
            .scheduler
            .spawn(self.screen.id, policy, &self.session.requests, f)
    }

    /// Outcome left by the last closed dialog
    pub fn modal_result(&self) -> Option<&Value> {
        self.session.modal_result.as_ref()
    }
}
