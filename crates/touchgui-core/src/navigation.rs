//! Navigation stack and input loop
//!
//! [`Gui`] owns the drawing surface, the stack of open screens and the
//! task scheduler. The top of the stack is the current screen; every
//! other entry is the parent of the one above it.
//!
//! Navigation requested from callbacks, hooks and tasks is recorded and
//! applied once the running dispatch pass is over. Opening a screen
//! builds it first, then hides the outgoing one (cancelling its
//! cancel-on-change tasks), then runs `on_open`, draws and runs
//! `after_open`.

use alloc::rc::Rc;
use alloc::vec::Vec;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};
use embedded_graphics::prelude::*;
use log::{debug, info, warn};

use crate::config::GuiConfig;
use crate::error::{GuiError, GuiResult};
use crate::runtime::input::{Debouncer, TouchPanel};
use crate::runtime::tasks::UiRequest;
use crate::screens::context::{Ctx, NavRequest, Session};
use crate::screens::dispatch;
use crate::screens::screen::{Screen, ScreenClass, WidgetSlot};
use crate::ui::components::{Element, Timing};
use crate::ui::core::{Bounds, ScreenId, TouchEvent, Value, WidgetId};
use crate::ui::styling::GreyStyle;
use crate::ui::surface::{Canvas, DrawSurface};

/// Stops [`Gui::run`] from outside the GUI, e.g. from a button on
/// another peripheral
#[derive(Clone)]
pub struct ShutdownHandle(Rc<Signal<NoopRawMutex, ()>>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.signal(());
    }
}

/// The GUI runtime: navigation stack, drawing surface and scheduler
pub struct Gui<S: DrawSurface = Canvas> {
    surface: S,
    config: GuiConfig,
    stack: Vec<Screen>,
    session: Session,
    shutdown: Rc<Signal<NoopRawMutex, ()>>,
    closed: bool,
}

impl Gui<Canvas> {
    /// Validate `config` and draw into a RAM canvas of the configured size
    pub fn new(config: GuiConfig) -> GuiResult<Self> {
        let canvas = Canvas::new(&config);
        Self::with_surface(config, canvas)
    }
}

impl<S: DrawSurface> Gui<S> {
    /// Drive any surface. `config` is validated the same way as by
    /// [`Gui::new`].
    pub fn with_surface(config: GuiConfig, mut surface: S) -> GuiResult<Self> {
        config.validate()?;
        surface.set_grey_style(config.grey);
        let timing = Timing {
            long_press: config.long_press(),
            lit: config.lit_time(),
        };
        Ok(Self {
            surface,
            config,
            stack: Vec::new(),
            session: Session::new(timing),
            shutdown: Rc::new(Signal::new()),
            closed: false,
        })
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn current(&self) -> Option<&Screen> {
        self.stack.last()
    }

    pub fn current_id(&self) -> Option<ScreenId> {
        self.current().map(Screen::id)
    }

    /// Number of screens on the stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Screen beneath the current one
    pub fn parent(&self) -> Option<ScreenId> {
        let depth = self.stack.len();
        depth
            .checked_sub(2)
            .map(|index| self.stack[index].id())
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed
    }

    pub fn modal_result(&self) -> Option<&Value> {
        self.session.modal_result.as_ref()
    }

    /// Number of live tasks
    pub fn task_count(&self) -> usize {
        self.session.scheduler.len()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.shutdown.clone())
    }

    // -- navigation ---------------------------------------------------------

    /// Build a screen from `class` and make it current. Returns its id.
    pub fn change(&mut self, class: ScreenClass) -> GuiResult<ScreenId> {
        if self.closed {
            debug!("Restarting after shutdown");
            self.closed = false;
            self.session.shutdown = false;
            self.shutdown.reset();
        }
        let id = self.open_new(class)?;
        self.settle()?;
        Ok(id)
    }

    /// Return to the parent screen. Does nothing on the first screen.
    pub fn back(&mut self) -> GuiResult<()> {
        self.go_back();
        self.settle()
    }

    /// Return to an ancestor of the current screen
    pub fn back_to(&mut self, target: ScreenId) -> GuiResult<()> {
        self.go_back_to(target)?;
        self.settle()
    }

    /// Cancel all tasks, close every screen and blank the display
    pub fn shutdown(&mut self) {
        self.session.shutdown = true;
        self.finish_shutdown();
    }

    /// Change the grey-out style and redraw disabled widgets with it
    pub fn set_grey_style(&mut self, desaturate: bool, factor: f32) -> GuiResult<()> {
        let style = GreyStyle::new(desaturate, factor)?;
        self.surface.set_grey_style(style);
        if let Some(screen) = self.stack.last_mut() {
            screen.redraw_greyed(&mut self.surface);
        }
        Ok(())
    }

    fn open_new(&mut self, class: ScreenClass) -> GuiResult<ScreenId> {
        let id = self.session.next_screen_id();
        let screen = class.instantiate(id, &self.surface, &mut self.session)?;
        match self.stack.len().checked_sub(1) {
            Some(top) => {
                debug!("Changing to screen {}", class.name());
                self.hide(top);
            }
            None => info!("Opening first screen {}", class.name()),
        }
        self.stack.push(screen);
        self.session.stack_ids.push(id);
        self.open(None);
        Ok(id)
    }

    fn go_back(&mut self) {
        let Some(top) = self.stack.len().checked_sub(1).filter(|top| *top > 0) else {
            debug!("Already on the first screen, back ignored");
            return;
        };
        self.hide(top);
        let uncovered = self.pop();
        self.open(uncovered);
    }

    fn go_back_to(&mut self, target: ScreenId) -> GuiResult<()> {
        let depth = self.stack.len();
        let Some(pos) = self.stack[..depth.saturating_sub(1)]
            .iter()
            .position(|s| s.id() == target)
        else {
            return Err(GuiError::InvalidScreenArgument {
                reason: "back target is not an ancestor of the current screen",
            });
        };
        self.hide(depth - 1);
        let popped = depth - 1 - pos;
        let mut uncovered = None;
        for _ in 0..popped {
            uncovered = self.pop();
        }
        // Only a single closed dialog leaves the rest of the display intact
        if popped > 1 {
            uncovered = None;
        }
        self.open(uncovered);
        Ok(())
    }

    /// Drop the top screen. Returns the area it covered if it was modal.
    fn pop(&mut self) -> Option<Bounds> {
        self.session.stack_ids.pop();
        let screen = self.stack.pop()?;
        debug!("Closed screen {}", screen.name());
        screen.frame_bounds()
    }

    fn hide(&mut self, index: usize) {
        let screen = &mut self.stack[index];
        self.session.scheduler.cancel_screen(screen.id());
        screen.reset_touch();
        Ctx::new(screen, &mut self.surface, &mut self.session, false)
            .run_handler(|handler, ctx| handler.on_hide(ctx));
    }

    fn open(&mut self, uncovered: Option<Bounds>) {
        let Some(screen) = self.stack.last_mut() else {
            return;
        };
        // Live: a partial redraw only repaints the closed aperture's area
        Ctx::new(screen, &mut self.surface, &mut self.session, true)
            .run_handler(|handler, ctx| handler.on_open(ctx));
        screen.redraw(&mut self.surface, uncovered);
        Ctx::new(screen, &mut self.surface, &mut self.session, true)
            .run_handler(|handler, ctx| handler.after_open(ctx));
        // A dropdown's list just closed on an entry
        if let Some(pick) = self.session.dropdown_pick.take()
            && pick.screen == screen.id()
        {
            Ctx::new(screen, &mut self.surface, &mut self.session, true)
                .set_value(pick.widget, Value::Index(pick.index));
        }
    }

    /// Apply navigation recorded during the last pass, including any that
    /// the newly opened screens' hooks record in turn
    fn settle(&mut self) -> GuiResult<()> {
        loop {
            if self.session.shutdown {
                self.finish_shutdown();
                return Ok(());
            }
            match self.session.nav.take() {
                None => return Ok(()),
                Some(NavRequest::Change(class)) => {
                    self.open_new(class)?;
                }
                Some(NavRequest::Back) => self.go_back(),
                Some(NavRequest::BackTo(target)) => self.go_back_to(target)?,
            }
        }
    }

    fn finish_shutdown(&mut self) {
        if self.closed {
            return;
        }
        info!("Shutting down");
        self.session.scheduler.cancel_all();
        self.session.nav = None;
        self.session.stack_ids.clear();
        self.stack.clear();
        self.surface.clear();
        self.closed = true;
        self.shutdown.signal(());
    }

    // -- widgets ------------------------------------------------------------

    /// Add a widget to the current screen and draw it
    pub fn add<W: Into<Element>>(&mut self, widget: W) -> GuiResult<WidgetSlot<'_>> {
        let screen = self.stack.last_mut().ok_or(GuiError::ScreenNotActive)?;
        let id = screen.add_element(widget.into(), &self.surface)?;
        let slot = &mut screen.slots[id.0];
        slot.element.draw(&mut self.surface);
        Ok(WidgetSlot::new(id, &mut slot.callbacks))
    }

    /// Run `f` with a context on the current screen, then apply any
    /// navigation it requested
    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut Ctx<'_>) -> R) -> GuiResult<R> {
        let screen = self.stack.last_mut().ok_or(GuiError::ScreenNotActive)?;
        let result = f(&mut Ctx::new(
            screen,
            &mut self.surface,
            &mut self.session,
            true,
        ));
        self.settle()?;
        Ok(result)
    }

    pub fn value(&self, id: WidgetId) -> Option<Value> {
        self.current().and_then(|screen| screen.value(id))
    }

    pub fn set_value(&mut self, id: WidgetId, value: Value) -> GuiResult<bool> {
        self.with_ctx(|ctx| ctx.set_value(id, value))
    }

    // -- input --------------------------------------------------------------

    /// Touch-down or drag sample at `point`
    pub fn press(&mut self, point: Point, now: Instant) -> GuiResult<()> {
        self.session.now = now;
        if let Some(screen) = self.stack.last_mut() {
            dispatch::press(
                &mut Ctx::new(screen, &mut self.surface, &mut self.session, true),
                point,
            );
        }
        self.settle()
    }

    /// The panel is no longer touched
    pub fn release(&mut self, now: Instant) -> GuiResult<()> {
        self.session.now = now;
        if let Some(screen) = self.stack.last_mut() {
            dispatch::release(&mut Ctx::new(
                screen,
                &mut self.surface,
                &mut self.session,
                true,
            ));
        }
        self.settle()
    }

    pub fn handle(&mut self, event: TouchEvent, now: Instant) -> GuiResult<()> {
        match event {
            TouchEvent::Press(point) | TouchEvent::Drag(point) => self.press(point.to_point(), now),
            TouchEvent::Release => self.release(now),
        }
    }

    /// Timers, then tasks, then the requests the tasks sent
    pub fn tick(&mut self, now: Instant) -> GuiResult<()> {
        self.session.now = now;
        if let Some(screen) = self.stack.last_mut() {
            dispatch::tick(&mut Ctx::new(
                screen,
                &mut self.surface,
                &mut self.session,
                true,
            ));
        }
        self.settle()?;
        self.session.scheduler.poll();
        let requests = self.session.requests.clone();
        while let Ok(request) = requests.try_receive() {
            self.apply(request)?;
        }
        Ok(())
    }

    fn apply(&mut self, request: UiRequest) -> GuiResult<()> {
        debug!("Applying {:?}", request);
        match request {
            UiRequest::SetValue {
                screen,
                widget,
                value,
            } => self.on_screen(screen, |ctx| {
                ctx.set_value(widget, value);
            }),
            UiRequest::SetVisible {
                screen,
                widget,
                visible,
            } => self.on_screen(screen, |ctx| {
                ctx.set_visible(widget, visible);
            }),
            UiRequest::SetGreyed {
                screen,
                widget,
                greyed,
            } => self.on_screen(screen, |ctx| {
                ctx.set_greyed_out(widget, greyed);
            }),
            UiRequest::Back => self.session.request(NavRequest::Back),
            UiRequest::Change(class) => self.session.request(NavRequest::Change(class)),
            UiRequest::Shutdown => self.session.shutdown = true,
        }
        self.settle()
    }

    /// Run `f` on a screen anywhere on the stack. Only the current screen
    /// is drawn to; the others are redrawn when they come back.
    fn on_screen(&mut self, id: ScreenId, f: impl FnOnce(&mut Ctx<'_>)) {
        let depth = self.stack.len();
        let Some(index) = self.stack.iter().position(|s| s.id() == id) else {
            warn!("Dropping request for closed screen {:?}", id);
            return;
        };
        let live = index + 1 == depth;
        f(&mut Ctx::new(
            &mut self.stack[index],
            &mut self.surface,
            &mut self.session,
            live,
        ));
    }

    /// Poll `panel` and dispatch until shutdown. `present` runs after every
    /// tick to push the frame to the real display.
    ///
    /// Fails with `ScreenNotActive` when no screen is open, and with any
    /// navigation error raised by a callback. The GUI is shut down once the
    /// loop stops, whatever the reason.
    pub async fn run<P, F>(&mut self, panel: &mut P, mut present: F) -> GuiResult<()>
    where
        P: TouchPanel + ?Sized,
        F: FnMut(&mut S),
    {
        if self.stack.is_empty() {
            return Err(GuiError::ScreenNotActive);
        }
        info!("Input loop started");
        let signal = self.shutdown.clone();
        let result = match select(self.input_loop(panel, &mut present), signal.wait()).await {
            Either::First(result) => result,
            Either::Second(()) => Ok(()),
        };
        self.finish_shutdown();
        present(&mut self.surface);
        info!("Input loop stopped");
        result
    }

    async fn input_loop<P, F>(&mut self, panel: &mut P, present: &mut F) -> GuiResult<()>
    where
        P: TouchPanel + ?Sized,
        F: FnMut(&mut S),
    {
        let mut debouncer = Debouncer::new(self.config.debounce());
        let interval = self.config.poll_interval();
        present(&mut self.surface);
        while !self.closed {
            if interval.as_ticks() == 0 {
                embassy_futures::yield_now().await;
            } else {
                Timer::after(interval).await;
            }
            if let Some(event) = debouncer.sample(panel).await {
                self.handle(event, Instant::now())?;
            }
            self.tick(Instant::now())?;
            present(&mut self.surface);
        }
        Ok(())
    }
}
