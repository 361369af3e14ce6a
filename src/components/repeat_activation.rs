use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use futures_timer::Delay;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(40);

/// Timing of a press-and-hold: one firing on press, a pause, then a steady
/// stream of repeats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RepeatSchedule {
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl Default for RepeatSchedule {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

impl RepeatSchedule {
    fn interval(&self) -> Duration {
        self.interval.max(Duration::from_millis(1))
    }

    /// Wait before firing number `firing`; firing `0` is the press itself.
    pub fn delay_before(&self, firing: u32) -> Duration {
        match firing {
            0 => Duration::ZERO,
            1 => self.initial_delay,
            _ => self.interval(),
        }
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

/// Shared flag that stops a running repeat chain. Cancelling wakes the chain
/// so it finishes without waiting out its current delay.
#[derive(Clone, Debug, Default)]
pub struct CancellationHandle {
    state: Arc<CancelState>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        let waker = match self.state.waker.lock() {
            Ok(mut waker) => waker.take(),
            Err(_) => None,
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    fn register(&self, waker: &Waker) {
        if let Ok(mut slot) = self.state.waker.lock() {
            *slot = Some(waker.clone());
        }
    }
}

struct CancellableDelay<'a> {
    delay: Delay,
    handle: &'a CancellationHandle,
}

impl Future for CancellableDelay<'_> {
    /// `true` when the delay ran out, `false` when it was cancelled.
    type Output = bool;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        let this = self.get_mut();
        if this.handle.is_cancelled() {
            return Poll::Ready(false);
        }
        this.handle.register(cx.waker());
        if this.handle.is_cancelled() {
            return Poll::Ready(false);
        }
        match Pin::new(&mut this.delay).poll(cx) {
            Poll::Ready(()) => Poll::Ready(!this.handle.is_cancelled()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Pointer and touch events a stepper control forwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActivationEvent {
    PointerDown,
    PointerUp,
    PointerLeave,
    TouchStart,
    TouchEnd,
    TouchMove,
}

impl ActivationEvent {
    pub fn starts_activation(self) -> bool {
        matches!(self, Self::PointerDown | Self::TouchStart)
    }

    /// Release, leaving the control, or a finger starting to scroll.
    pub fn ends_activation(self) -> bool {
        !self.starts_activation()
    }

    /// The pressing gesture must not move keyboard focus off the text field.
    pub fn prevents_focus_change(self) -> bool {
        self.starts_activation()
    }
}

/// Press-and-hold driver for one stepper control.
#[derive(Debug, Default)]
pub struct RepeatingActivation {
    schedule: RepeatSchedule,
    current: Option<CancellationHandle>,
}

impl RepeatingActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: RepeatSchedule) -> Self {
        Self {
            schedule,
            current: None,
        }
    }

    pub fn schedule(&self) -> RepeatSchedule {
        self.schedule
    }

    pub fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }

    /// Handle of the running chain, for cancelling from elsewhere.
    pub fn handle(&self) -> Option<CancellationHandle> {
        self.current.clone()
    }

    /// Fires `action` right away and returns the task that keeps firing it
    /// until [`deactivate`](Self::deactivate). The task resolves to the
    /// number of repeats it fired. Any previous chain is cancelled first.
    pub fn activate<F>(&mut self, mut action: F) -> impl Future<Output = u32> + use<F>
    where
        F: FnMut(),
    {
        self.deactivate();
        let handle = CancellationHandle::default();
        self.current = Some(handle.clone());
        log::trace!("repeat activation started");
        action();
        repeat_chain(self.schedule, handle, action)
    }

    /// Starts a chain on press and cancels it on every ending event. Returns
    /// the repeat task when one was started; the host spawns it.
    pub fn handle_event<F>(
        &mut self,
        event: ActivationEvent,
        action: F,
    ) -> Option<impl Future<Output = u32> + use<F>>
    where
        F: FnMut(),
    {
        if event.starts_activation() {
            return Some(self.activate(action));
        }
        self.deactivate();
        None
    }

    pub fn deactivate(&mut self) {
        if let Some(handle) = self.current.take() {
            log::trace!("repeat activation stopped");
            handle.cancel();
        }
    }
}

impl Drop for RepeatingActivation {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn repeat_chain<F>(schedule: RepeatSchedule, handle: CancellationHandle, mut action: F) -> u32
where
    F: FnMut(),
{
    let mut repeats = 0u32;
    loop {
        let delay = CancellableDelay {
            delay: Delay::new(schedule.delay_before(repeats + 1)),
            handle: &handle,
        };
        if !delay.await {
            break;
        }
        action();
        repeats = repeats.saturating_add(1);
    }
    repeats
}
