//! Callback context
//!
//! Every callback, hook and group gets a [`Ctx`]: the screen it belongs
//! to, the drawing surface and the navigation session. Navigation asked
//! for through a `Ctx` is only recorded; the engine applies it once the
//! current dispatch pass is over. The first request of a pass wins.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::future::Future;

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use log::debug;

use crate::error::{GuiError, GuiResult};
use crate::runtime::tasks::{
    CancelToken, Cancelled, RequestChannel, Scheduler, TaskLink, TaskPolicy,
};
use crate::screens::dialog::dropdown_list;
use crate::screens::screen::{Screen, ScreenHandler};
use crate::ui::components::groups::ButtonGroup;
use crate::ui::components::{Button, Control, Element, Timing};
use crate::ui::core::{GroupId, Response, ScreenId, Trigger, Value, WidgetId};
use crate::ui::styling::GreyStyle;
use crate::ui::surface::DrawSurface;

/// Pending navigation, applied after the dispatch pass
#[derive(Debug)]
pub(crate) enum NavRequest {
    Change(crate::screens::ScreenClass),
    Back,
    BackTo(ScreenId),
}

/// Entry picked from a dropdown's list, applied when its screen reopens
#[derive(Debug, Clone, Copy)]
pub(crate) struct DropdownPick {
    pub(crate) screen: ScreenId,
    pub(crate) widget: WidgetId,
    pub(crate) index: usize,
}

/// Engine state shared by all screens
pub(crate) struct Session {
    pub(crate) now: Instant,
    pub(crate) timing: Timing,
    pub(crate) nav: Option<NavRequest>,
    pub(crate) shutdown: bool,
    pub(crate) modal_result: Option<Value>,
    pub(crate) dropdown_pick: Option<DropdownPick>,
    pub(crate) scheduler: Scheduler,
    pub(crate) requests: Rc<RequestChannel>,
    /// Screens on the navigation stack, bottom first
    pub(crate) stack_ids: Vec<ScreenId>,
    next_id: u32,
}

impl Session {
    pub(crate) fn new(timing: Timing) -> Self {
        Self {
            now: Instant::from_ticks(0),
            timing,
            nav: None,
            shutdown: false,
            modal_result: None,
            dropdown_pick: None,
            scheduler: Scheduler::default(),
            requests: Rc::new(RequestChannel::new()),
            stack_ids: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn next_screen_id(&mut self) -> ScreenId {
        self.next_id += 1;
        ScreenId(self.next_id)
    }

    /// Navigation or shutdown is waiting to be applied
    pub(crate) fn is_pending(&self) -> bool {
        self.nav.is_some() || self.shutdown
    }

    pub(crate) fn request(&mut self, request: NavRequest) {
        if self.is_pending() {
            debug!("Navigation already pending, ignoring {:?}", request);
        } else {
            self.nav = Some(request);
        }
    }
}

/// Access to the GUI from callbacks, hooks and button groups
pub struct Ctx<'a> {
    pub(crate) screen: &'a mut Screen,
    surface: &'a mut dyn DrawSurface,
    pub(crate) session: &'a mut Session,
    /// The screen is on the display, so changes are drawn at once
    live: bool,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(
        screen: &'a mut Screen,
        surface: &'a mut dyn DrawSurface,
        session: &'a mut Session,
        live: bool,
    ) -> Self {
        Self {
            screen,
            surface,
            session,
            live,
        }
    }

    pub fn screen_id(&self) -> ScreenId {
        self.screen.id()
    }

    pub fn screen(&self) -> &Screen {
        &*self.screen
    }

    /// Time of the sample being dispatched
    pub fn now(&self) -> Instant {
        self.session.now
    }

    /// Draw directly, e.g. for decorations that are not widgets
    pub fn surface(&mut self) -> &mut dyn DrawSurface {
        &mut *self.surface
    }

    // -- widget state -------------------------------------------------------

    pub fn value(&self, id: WidgetId) -> Option<Value> {
        self.screen.value(id)
    }

    /// Store a new value. Fractions are clamped to `0.0..=1.0`. When the
    /// value actually changed, a control's change callback runs and the
    /// widget is redrawn. Returns whether it changed.
    pub fn set_value(&mut self, id: WidgetId, value: Value) -> bool {
        let Some(element) = self.screen.element_mut(id) else {
            return false;
        };
        if !element.widget_mut().set_value(value.normalized()) {
            return false;
        }
        let reports = element.control().is_some_and(Control::reports_changes);
        if reports {
            self.fire(id, Trigger::Primary);
        }
        self.refresh(id);
        true
    }

    pub fn set_text(&mut self, id: WidgetId, text: &str) -> bool {
        self.set_value(id, Value::text(text))
    }

    /// Selected text of a listbox or dropdown
    pub fn listbox_text(&self, id: WidgetId) -> Option<&str> {
        match self.screen.element(id)? {
            Element::Touch(Control::Listbox(listbox)) => Some(listbox.text_value()),
            Element::Touch(Control::Dropdown(dropdown)) => Some(dropdown.text_value()),
            _ => None,
        }
    }

    /// Select a listbox or dropdown entry by its text. Returns whether the
    /// selection changed.
    pub fn set_listbox_text(&mut self, id: WidgetId, text: &str) -> bool {
        let index = match self.screen.element(id) {
            Some(Element::Touch(Control::Listbox(listbox))) => listbox.position(text),
            Some(Element::Touch(Control::Dropdown(dropdown))) => dropdown.position(text),
            _ => None,
        };
        match index {
            Some(index) => self.set_value(id, Value::Index(index)),
            None => false,
        }
    }

    pub fn greyed_out(&self, id: WidgetId) -> bool {
        self.screen
            .element(id)
            .is_some_and(|e| e.base().is_greyed())
    }

    /// Disable or re-enable a control and redraw it. Disabled controls
    /// ignore touch. Passive widgets cannot be greyed out.
    pub fn set_greyed_out(&mut self, id: WidgetId, greyed: bool) -> bool {
        let Some(control) = self.screen.control_mut(id) else {
            return false;
        };
        let base = control.as_touch_mut().base_mut();
        if base.greyed == greyed {
            return false;
        }
        base.greyed = greyed;
        self.draw(id);
        true
    }

    pub fn visible(&self, id: WidgetId) -> bool {
        self.screen
            .element(id)
            .is_some_and(|e| e.base().is_visible())
    }

    /// Show or hide a widget. A hidden widget's box is erased with its
    /// background colour and it no longer receives touch.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        let Some(element) = self.screen.element_mut(id) else {
            return false;
        };
        let base = element.widget_mut().base_mut();
        if base.visible == visible {
            return false;
        }
        base.visible = visible;
        if visible {
            self.draw(id);
        } else {
            self.refresh(id);
        }
        true
    }

    /// Change a widget's accent colour and redraw it
    pub fn set_color(&mut self, id: WidgetId, color: Rgb565) {
        if let Some(element) = self.screen.element_mut(id) {
            element.widget_mut().set_color(color);
            self.refresh(id);
        }
    }

    // -- groups -------------------------------------------------------------

    /// Visible (list) or highlighted (radio) member of a group
    pub fn group_value(&self, group: GroupId) -> Option<WidgetId> {
        self.screen
            .groups
            .get(group.0)
            .and_then(|g| g.as_ref())
            .and_then(|g| g.current())
    }

    /// Make `member` the current member of a group, running the group's
    /// callback when it changed
    pub fn set_group_value(&mut self, group: GroupId, member: WidgetId) {
        self.with_group(group, |g, ctx| g.select(ctx, member));
    }

    pub fn set_group_greyed(&mut self, group: GroupId, greyed: bool) {
        self.with_group(group, |g, ctx| g.set_greyed(ctx, greyed));
    }

    /// Same as [`Gui::set_grey_style`](crate::Gui::set_grey_style)
    pub fn set_grey_style(&mut self, desaturate: bool, factor: f32) -> GuiResult<()> {
        let style = GreyStyle::new(desaturate, factor)?;
        self.surface.set_grey_style(style);
        if self.can_draw() {
            self.screen.redraw_greyed(&mut *self.surface);
        }
        Ok(())
    }

    // -- navigation ---------------------------------------------------------

    /// Open a new screen once this pass is over
    pub fn change(&mut self, class: crate::screens::ScreenClass) {
        self.session.request(NavRequest::Change(class));
    }

    /// Return to the previous screen. Does nothing on the first screen.
    pub fn back(&mut self) {
        self.session.request(NavRequest::Back);
    }

    /// Return to an ancestor of this screen
    pub fn back_to(&mut self, target: ScreenId) -> GuiResult<()> {
        if !self.ancestors().contains(&target) {
            return Err(GuiError::InvalidScreenArgument {
                reason: "back target is not an ancestor of the current screen",
            });
        }
        self.session.request(NavRequest::BackTo(target));
        Ok(())
    }

    /// Blank the display and stop the input loop
    pub fn shutdown(&mut self) {
        self.session.shutdown = true;
    }

    /// Navigation or shutdown was requested in this pass
    pub fn navigation_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// The screen beneath this one
    pub fn parent(&self) -> Option<ScreenId> {
        self.ancestors().last().copied()
    }

    fn ancestors(&self) -> &[ScreenId] {
        let ids = &self.session.stack_ids;
        match ids.iter().position(|id| *id == self.screen.id()) {
            Some(pos) => &ids[..pos],
            None => ids,
        }
    }

    // -- dialogs ------------------------------------------------------------

    /// Leave an outcome for the screen a dialog returns to
    pub fn set_modal_result(&mut self, value: Value) {
        self.session.modal_result = Some(value);
    }

    pub fn modal_result(&self) -> Option<&Value> {
        self.session.modal_result.as_ref()
    }

    pub fn take_modal_result(&mut self) -> Option<Value> {
        self.session.modal_result.take()
    }

    // -- tasks --------------------------------------------------------------

    /// Start a task owned by this screen
    pub fn spawn<F, Fut>(&mut self, policy: TaskPolicy, f: F) -> CancelToken
    where
        F: FnOnce(TaskLink) -> Fut,
        Fut: Future<Output = Result<(), Cancelled>> + 'static,
    {
        self.session
            .scheduler
            .spawn(self.screen.id(), policy, &self.session.requests, f)
    }

    // -- engine internals ---------------------------------------------------

    fn can_draw(&self) -> bool {
        self.live && !self.session.is_pending()
    }

    /// Re-render a widget's dynamic content
    pub(crate) fn refresh(&mut self, id: WidgetId) {
        if !self.can_draw() {
            return;
        }
        if let Some(element) = self.screen.element_mut(id) {
            element.refresh(&mut *self.surface);
        }
    }

    /// Full render of a widget including border and background
    pub(crate) fn draw(&mut self, id: WidgetId) {
        if !self.can_draw() {
            return;
        }
        if let Some(element) = self.screen.element_mut(id) {
            element.draw(&mut *self.surface);
        }
    }

    pub(crate) fn button_mut(&mut self, id: WidgetId) -> Option<&mut Button> {
        self.screen.control_mut(id).and_then(Control::as_button_mut)
    }

    /// Ignore the rest of the current press on `id`
    pub(crate) fn mark_busy(&mut self, id: WidgetId) {
        if let Some(target) = self.screen.touch_mut(id) {
            target.touch_state_mut().busy = true;
        }
    }

    /// Run the callback for `trigger`, then redraw if asked to
    pub(crate) fn respond(&mut self, id: WidgetId, response: Response) {
        if let Some(trigger) = response.fire {
            self.fire(id, trigger);
        }
        if response.redraw {
            self.refresh(id);
        }
        if response.open_list {
            self.open_list(id);
        }
    }

    /// Pop up a dropdown's entries below it
    fn open_list(&mut self, id: WidgetId) {
        let class = match self.screen.element(id) {
            Some(Element::Touch(Control::Dropdown(dropdown))) => {
                dropdown_list(self.screen.id(), id, dropdown)
            }
            _ => return,
        };
        debug!("Opening list of dropdown {:?}", id);
        self.change(class);
    }

    /// Remember the entry picked for `widget` on `screen`
    pub(crate) fn pick_dropdown(&mut self, screen: ScreenId, widget: WidgetId, index: usize) {
        self.session.dropdown_pick = Some(DropdownPick {
            screen,
            widget,
            index,
        });
    }

    /// Invoke a widget callback. A grouped button's primary trigger goes to
    /// its group instead.
    pub(crate) fn fire(&mut self, id: WidgetId, trigger: Trigger) {
        if trigger == Trigger::Primary
            && let Some(group) = self.screen.group_of(id)
        {
            self.with_group(group, |g, ctx| g.activate(ctx, id));
            return;
        }
        let Some(mut callback) = self
            .screen
            .slots
            .get_mut(id.0)
            .and_then(|slot| slot.callbacks.take(trigger))
        else {
            return;
        };
        callback(self, id);
        if let Some(slot) = self.screen.slots.get_mut(id.0) {
            slot.callbacks.restore(trigger, callback);
        }
    }

    fn with_group<R>(
        &mut self,
        group: GroupId,
        f: impl FnOnce(&mut dyn ButtonGroup, &mut Self) -> R,
    ) -> Option<R> {
        let mut taken = self.screen.groups.get_mut(group.0)?.take()?;
        let result = f(taken.as_mut(), self);
        if let Some(slot) = self.screen.groups.get_mut(group.0)
            && slot.is_none()
        {
            *slot = Some(taken);
        }
        Some(result)
    }

    /// Run one of the screen's lifecycle hooks
    pub(crate) fn run_handler(&mut self, hook: impl FnOnce(&mut dyn ScreenHandler, &mut Self)) {
        if let Some(mut handler) = self.screen.handler.take() {
            hook(handler.as_mut(), self);
            if self.screen.handler.is_none() {
                self.screen.handler = Some(handler);
            }
        }
    }
}
