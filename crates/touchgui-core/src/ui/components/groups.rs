//! Button groups
//!
//! A group owns the primary callback of its member buttons: activating a
//! member runs the group's logic and then the group's user callback with
//! the affected button and the arguments bound to it when it was added.
//! Release and long-press callbacks registered on a member keep working.
//!
//! - [`ButtonList`]: buttons sharing one place, only one visible. Activating
//!   the visible one shows the next, round robin.
//! - [`RadioButtons`]: buttons at their own places. The activated one is
//!   drawn in the highlight colour, all others in their own colour.

use alloc::boxed::Box;
use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use log::debug;

use crate::error::GuiResult;
use crate::screens::{Ctx, ScreenBuilder};
use crate::ui::components::{Button, Widget};
use crate::ui::core::WidgetId;

type GroupCallback<T> = Box<dyn FnMut(&mut Ctx<'_>, WidgetId, &T)>;

/// Behaviour shared by button groups registered on a screen with
/// [`ScreenBuilder::add_group`]
pub trait ButtonGroup {
    /// Member buttons in the order they were added
    fn members(&self) -> Vec<WidgetId>;

    /// The visible (list) or highlighted (radio) member
    fn current(&self) -> Option<WidgetId>;

    /// A member fired its primary trigger
    fn activate(&mut self, ctx: &mut Ctx<'_>, id: WidgetId);

    /// Make `id` the current member, as if chosen by the user
    fn select(&mut self, ctx: &mut Ctx<'_>, id: WidgetId);

    fn is_greyed(&self) -> bool;

    /// Grey out or re-enable every member
    fn set_greyed(&mut self, ctx: &mut Ctx<'_>, greyed: bool);
}

// ---------------------------------------------------------------------------
// ButtonList
// ---------------------------------------------------------------------------

/// Buttons at the same location cycling on each press, e.g. a start/stop
/// toggle
pub struct ButtonList<T> {
    members: Vec<(WidgetId, T)>,
    current: usize,
    greyed: bool,
    callback: GroupCallback<T>,
}

impl<T: 'static> ButtonList<T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&mut Ctx<'_>, WidgetId, &T) + 'static,
    {
        Self {
            members: Vec::new(),
            current: 0,
            greyed: false,
            callback: Box::new(callback),
        }
    }

    /// Add `button` to the screen under construction. The first button
    /// added is the visible one.
    pub fn add_button(
        &mut self,
        builder: &mut ScreenBuilder<'_>,
        mut button: Button,
        args: T,
    ) -> GuiResult<WidgetId> {
        button.base_mut().visible = self.members.is_empty();
        let id = builder.add(button)?.id();
        self.members.push((id, args));
        Ok(id)
    }

    fn position(&self, id: WidgetId) -> Option<usize> {
        self.members.iter().position(|(m, _)| *m == id)
    }

    fn show(&mut self, ctx: &mut Ctx<'_>, next: usize) {
        let old = self.members[self.current].0;
        self.current = next;
        let new = self.members[next].0;
        ctx.set_visible(old, false);
        ctx.set_visible(new, true);
    }
}

impl<T: 'static> ButtonGroup for ButtonList<T> {
    fn members(&self) -> Vec<WidgetId> {
        self.members.iter().map(|(id, _)| *id).collect()
    }

    fn current(&self) -> Option<WidgetId> {
        self.members.get(self.current).map(|(id, _)| *id)
    }

    fn activate(&mut self, ctx: &mut Ctx<'_>, id: WidgetId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        self.current = pos;
        let next = (pos + 1) % self.members.len();
        self.show(ctx, next);
        let (new, args) = &self.members[next];
        debug!("Button list advanced to {:?}", new);
        // A press still in progress must not activate the new button too
        ctx.mark_busy(*new);
        (self.callback)(ctx, *new, args);
    }

    fn select(&mut self, ctx: &mut Ctx<'_>, id: WidgetId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        if pos == self.current {
            return;
        }
        self.show(ctx, pos);
        let (new, args) = &self.members[pos];
        (self.callback)(ctx, *new, args);
    }

    fn is_greyed(&self) -> bool {
        self.greyed
    }

    fn set_greyed(&mut self, ctx: &mut Ctx<'_>, greyed: bool) {
        if self.greyed == greyed {
            return;
        }
        self.greyed = greyed;
        for (id, _) in &self.members {
            ctx.set_greyed_out(*id, greyed);
        }
        if let Some(current) = self.current() {
            ctx.refresh(current);
        }
    }
}

// ---------------------------------------------------------------------------
// RadioButtons
// ---------------------------------------------------------------------------

/// Single-select group: exactly one member is highlighted
pub struct RadioButtons<T> {
    members: Vec<(WidgetId, T)>,
    highlight: Rgb565,
    selected: usize,
    greyed: bool,
    callback: GroupCallback<T>,
}

impl<T: 'static> RadioButtons<T> {
    pub fn new<F>(highlight: Rgb565, callback: F) -> Self
    where
        F: FnMut(&mut Ctx<'_>, WidgetId, &T) + 'static,
    {
        Self {
            members: Vec::new(),
            highlight,
            selected: 0,
            greyed: false,
            callback: Box::new(callback),
        }
    }

    /// Index of the member highlighted at construction
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    pub fn add_button(
        &mut self,
        builder: &mut ScreenBuilder<'_>,
        mut button: Button,
        args: T,
    ) -> GuiResult<WidgetId> {
        if self.members.len() == self.selected {
            button.set_highlight(Some(self.highlight));
        }
        let id = builder.add(button)?.id();
        self.members.push((id, args));
        Ok(id)
    }
}

impl<T: 'static> ButtonGroup for RadioButtons<T> {
    fn members(&self) -> Vec<WidgetId> {
        self.members.iter().map(|(id, _)| *id).collect()
    }

    fn current(&self) -> Option<WidgetId> {
        self.members.get(self.selected).map(|(id, _)| *id)
    }

    fn activate(&mut self, ctx: &mut Ctx<'_>, id: WidgetId) {
        let Some(pos) = self.members.iter().position(|(m, _)| *m == id) else {
            return;
        };
        self.selected = pos;
        for (member, _) in &self.members {
            let highlight = (*member == id).then_some(self.highlight);
            if let Some(button) = ctx.button_mut(*member) {
                button.set_highlight(highlight);
            }
            ctx.refresh(*member);
        }
        let (_, args) = &self.members[pos];
        (self.callback)(ctx, id, args);
    }

    fn select(&mut self, ctx: &mut Ctx<'_>, id: WidgetId) {
        if self.current() != Some(id) {
            self.activate(ctx, id);
        }
    }

    fn is_greyed(&self) -> bool {
        self.greyed
    }

    fn set_greyed(&mut self, ctx: &mut Ctx<'_>, greyed: bool) {
        if self.greyed == greyed {
            return;
        }
        self.greyed = greyed;
        for (id, _) in &self.members {
            ctx.set_greyed_out(*id, greyed);
        }
    }
}
