//! Single-slot deferred-action scheduler.
//!
//! At most one action is armed at a time; arming a new one replaces the
//! previous. The slot is identified by a generation token, so a superseded
//! sleep that still wakes up finds its token stale and does nothing. The
//! scheduler is independent of any particular event loop: a [`TimerHost`]
//! supplies the timer and task primitives.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Timer and task primitives supplied by the host event loop.
pub trait TimerHost {
    /// Queue a task onto the host's single-threaded executor.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
    /// Resolve after `delay` has passed.
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Coalesces bursts of schedule calls into a single deferred action.
///
/// Clones share the slot: a schedule through one clone replaces an action
/// armed through another.
#[derive(Clone)]
pub struct Debouncer {
    host: Rc<dyn TimerHost>,
    generation: Rc<Cell<u64>>,
}

impl Debouncer {
    pub fn new(host: Rc<dyn TimerHost>) -> Self {
        Self {
            host,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Arm `action` to run after `delay`, replacing any armed action.
    ///
    /// Of N calls issued within less than `delay` of each other, exactly the
    /// last action fires, exactly once.
    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + 'static) {
        let token = self.generation.get().wrapping_add(1);
        self.generation.set(token);

        let generation = Rc::clone(&self.generation);
        let sleep = self.host.sleep(delay);
        self.host.spawn(Box::pin(async move {
            sleep.await;
            if generation.get() == token {
                action();
            }
        }));
    }

    /// Disarm the slot; nothing fires until the next schedule.
    pub fn cancel_pending(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

/// Host backed by the tokio runtime. Tasks go onto the current `LocalSet`,
/// so callers must run inside one.
#[cfg(not(target_arch = "wasm32"))]
pub struct TokioTimers;

#[cfg(not(target_arch = "wasm32"))]
impl TimerHost for TokioTimers {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }

    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(delay))
    }
}
