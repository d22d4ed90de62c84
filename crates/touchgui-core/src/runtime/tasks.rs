//! Cooperative application tasks
//!
//! Tasks are `'static` futures owned by the [`Scheduler`] and polled once
//! per tick of the input loop. They never touch widgets directly: a task
//! talks to the GUI through its [`TaskLink`], which queues [`UiRequest`]s
//! that the engine applies between dispatch passes.
//!
//! Every task belongs to the screen that spawned it. Navigating away from
//! that screen cancels tasks spawned with [`TaskPolicy::CancelOnChange`];
//! [`TaskPolicy::Persist`] tasks keep running until they finish or the GUI
//! shuts down.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Waker};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use log::{debug, warn};
use thiserror_no_std::Error;

use crate::screens::ScreenClass;
use crate::ui::core::{ScreenId, Value, WidgetId};

/// Capacity of the task-to-GUI request queue
pub const REQUEST_QUEUE_LEN: usize = 8;

pub(crate) type RequestChannel = Channel<NoopRawMutex, UiRequest, REQUEST_QUEUE_LEN>;

/// What happens to a task when its screen stops being current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPolicy {
    CancelOnChange,
    Persist,
}

/// Shared cancellation flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Returned by [`TaskLink`] yield points once the task was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Task cancelled")]
pub struct Cancelled;

/// Change requested by a task, applied by the engine between passes
#[derive(Debug)]
pub enum UiRequest {
    SetValue {
        screen: ScreenId,
        widget: WidgetId,
        value: Value,
    },
    SetVisible {
        screen: ScreenId,
        widget: WidgetId,
        visible: bool,
    },
    SetGreyed {
        screen: ScreenId,
        widget: WidgetId,
        greyed: bool,
    },
    Back,
    Change(ScreenClass),
    Shutdown,
}

/// A task's handle to the GUI
pub struct TaskLink {
    screen: ScreenId,
    token: CancelToken,
    requests: Rc<RequestChannel>,
}

impl TaskLink {
    /// Screen that spawned the task
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Fails once the task has been cancelled
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep, checking for cancellation before and after
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.checkpoint()?;
        Timer::after(duration).await;
        self.checkpoint()
    }

    /// Give the rest of the tick to other tasks
    pub async fn yield_now(&self) -> Result<(), Cancelled> {
        self.checkpoint()?;
        embassy_futures::yield_now().await;
        self.checkpoint()
    }

    /// Queue a request, waiting for room when the queue is full
    pub async fn send(&self, request: UiRequest) -> Result<(), Cancelled> {
        self.checkpoint()?;
        self.requests.send(request).await;
        Ok(())
    }

    /// Queue a request without waiting. A full queue drops it.
    pub fn try_send(&self, request: UiRequest) -> Result<(), Cancelled> {
        self.checkpoint()?;
        if let Err(e) = self.requests.try_send(request) {
            warn!("Request queue full, dropping {:?}", e);
        }
        Ok(())
    }

    /// Set a widget value on the owning screen
    pub async fn set_value(&self, widget: WidgetId, value: Value) -> Result<(), Cancelled> {
        self.send(UiRequest::SetValue {
            screen: self.screen,
            widget,
            value,
        })
        .await
    }

    pub async fn set_visible(&self, widget: WidgetId, visible: bool) -> Result<(), Cancelled> {
        self.send(UiRequest::SetVisible {
            screen: self.screen,
            widget,
            visible,
        })
        .await
    }

    pub async fn set_greyed(&self, widget: WidgetId, greyed: bool) -> Result<(), Cancelled> {
        self.send(UiRequest::SetGreyed {
            screen: self.screen,
            widget,
            greyed,
        })
        .await
    }

    pub async fn back(&self) -> Result<(), Cancelled> {
        self.send(UiRequest::Back).await
    }

    pub async fn change(&self, class: ScreenClass) -> Result<(), Cancelled> {
        self.send(UiRequest::Change(class)).await
    }

    pub async fn shutdown(&self) -> Result<(), Cancelled> {
        self.send(UiRequest::Shutdown).await
    }
}

struct Task {
    owner: ScreenId,
    policy: TaskPolicy,
    token: CancelToken,
    future: Pin<Box<dyn Future<Output = ()>>>,
}

/// Single-threaded task set polled by the input loop
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    /// Start a task owned by `owner`. The closure receives the task's
    /// [`TaskLink`]; a `Cancelled` result ends the task quietly.
    pub(crate) fn spawn<F, Fut>(
        &mut self,
        owner: ScreenId,
        policy: TaskPolicy,
        requests: &Rc<RequestChannel>,
        f: F,
    ) -> CancelToken
    where
        F: FnOnce(TaskLink) -> Fut,
        Fut: Future<Output = Result<(), Cancelled>> + 'static,
    {
        let token = CancelToken::default();
        let link = TaskLink {
            screen: owner,
            token: token.clone(),
            requests: requests.clone(),
        };
        let body = f(link);
        let future = async move {
            if body.await.is_err() {
                debug!("Task of screen {:?} cancelled", owner);
            }
        };
        self.tasks.push(Task {
            owner,
            policy,
            token: token.clone(),
            future: Box::pin(future),
        });
        token
    }

    /// Cancel the cancel-on-change tasks of a screen that stopped being
    /// current
    pub(crate) fn cancel_screen(&mut self, owner: ScreenId) {
        self.cancel_where(|task| task.owner == owner && task.policy == TaskPolicy::CancelOnChange);
    }

    /// Cancel every task of a screen regardless of policy
    pub(crate) fn drop_screen(&mut self, owner: ScreenId) {
        self.cancel_where(|task| task.owner == owner);
    }

    pub(crate) fn cancel_all(&mut self) {
        self.cancel_where(|_| true);
    }

    fn cancel_where(&mut self, matches: impl Fn(&Task) -> bool) {
        self.tasks.retain(|task| {
            if matches(task) {
                task.token.cancel();
                false
            } else {
                true
            }
        });
    }

    /// Poll every task once, dropping finished and cancelled ones
    pub(crate) fn poll(&mut self) {
        let mut cx = Context::from_waker(Waker::noop());
        self.tasks.retain_mut(|task| {
            if task.token.is_cancelled() {
                return false;
            }
            task.future.as_mut().poll(&mut cx).is_pending() && !task.token.is_cancelled()
        });
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_task(
        scheduler: &mut Scheduler,
        requests: &Rc<RequestChannel>,
        owner: ScreenId,
        policy: TaskPolicy,
    ) -> (Rc<Cell<u32>>, CancelToken) {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let token = scheduler.spawn(owner, policy, requests, move |link| async move {
            loop {
                counter.set(counter.get() + 1);
                link.yield_now().await?;
            }
        });
        (count, token)
    }

    #[test]
    fn test_tasks_advance_once_per_poll() {
        let requests = Rc::new(RequestChannel::new());
        let mut scheduler = Scheduler::default();
        let (count, _) = counting_task(&mut scheduler, &requests, ScreenId(1), TaskPolicy::Persist);

        scheduler.poll();
        scheduler.poll();
        scheduler.poll();
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_screen_spares_persistent_tasks() {
        let requests = Rc::new(RequestChannel::new());
        let mut scheduler = Scheduler::default();
        let (transient, token) = counting_task(
            &mut scheduler,
            &requests,
            ScreenId(1),
            TaskPolicy::CancelOnChange,
        );
        let (persistent, _) =
            counting_task(&mut scheduler, &requests, ScreenId(1), TaskPolicy::Persist);
        let (other, _) = counting_task(
            &mut scheduler,
            &requests,
            ScreenId(2),
            TaskPolicy::CancelOnChange,
        );
        scheduler.poll();

        scheduler.cancel_screen(ScreenId(1));
        assert!(token.is_cancelled());
        scheduler.poll();
        assert_eq!(transient.get(), 1);
        assert_eq!(persistent.get(), 2);
        assert_eq!(other.get(), 2);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_finished_task_is_dropped() {
        let requests = Rc::new(RequestChannel::new());
        let mut scheduler = Scheduler::default();
        scheduler.spawn(ScreenId(1), TaskPolicy::Persist, &requests, |link| async move {
            link.set_value(WidgetId(0), Value::Flag(true)).await
        });
        scheduler.poll();
        assert!(scheduler.is_empty());
        assert!(matches!(
            requests.try_receive(),
            Ok(UiRequest::SetValue {
                widget: WidgetId(0),
                ..
            })
        ));
    }

    #[test]
    fn test_checkpoint_after_cancel() {
        let requests = Rc::new(RequestChannel::new());
        let link = TaskLink {
            screen: ScreenId(1),
            token: CancelToken::default(),
            requests,
        };
        assert_eq!(link.checkpoint(), Ok(()));
        link.token().cancel();
        assert_eq!(link.checkpoint(), Err(Cancelled));
        assert_eq!(link.try_send(UiRequest::Back), Err(Cancelled));
    }
}
