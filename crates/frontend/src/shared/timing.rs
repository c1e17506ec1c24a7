//! Time source and timer scheduling for the client runtime.
//!
//! Runtime components never read the wall clock or call `setTimeout`
//! directly. They go through [`Clock`] and [`Scheduler`] so the same code runs
//! against browser timers and against [`ManualScheduler`] in tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type Task = Box<dyn FnOnce()>;
pub type RepeatingTask = Rc<dyn Fn()>;

pub trait Clock {
    /// Unix time, milliseconds.
    fn now_ms(&self) -> i64;
}

pub trait Scheduler {
    fn schedule_once(&self, delay_ms: u32, task: Task);
    fn schedule_every(&self, period_ms: u32, task: RepeatingTask);
}

/// `performance.timeOrigin + performance.now()`: Unix-anchored and monotonic
/// for the page lifetime. Falls back to the wall clock outside a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        match web_sys::window().and_then(|w| w.performance()) {
            Some(performance) => (performance.time_origin() + performance.now()) as i64,
            None => chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Timers backed by `setTimeout` / `setInterval` (gloo-timers).
///
/// Timers live for the page lifetime: handles are forgotten, there is no
/// teardown in a single-page app.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule_once(&self, delay_ms: u32, task: Task) {
        gloo_timers::callback::Timeout::new(delay_ms, task).forget();
    }

    fn schedule_every(&self, period_ms: u32, task: RepeatingTask) {
        gloo_timers::callback::Interval::new(period_ms, move || task()).forget();
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

enum PendingKind {
    Once(Task),
    Every(u32, RepeatingTask),
}

struct Pending {
    due: i64,
    seq: u64,
    kind: PendingKind,
}

/// Deterministic scheduler driven by a [`ManualClock`].
///
/// Tasks run only from [`ManualScheduler::advance`] / [`ManualScheduler::run_until`],
/// in due-time order, with the clock set to each task's due time while it runs.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: ManualClock,
    queue: Rc<RefCell<Vec<Pending>>>,
    next_seq: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            queue: Rc::new(RefCell::new(Vec::new())),
            next_seq: Rc::new(Cell::new(0)),
        }
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn advance(&self, delta_ms: i64) {
        let target = self.clock.now_ms() + delta_ms;
        self.run_until(target);
    }

    /// Runs every task due at or before `target_ms`, then parks the clock at `target_ms`.
    pub fn run_until(&self, target_ms: i64) {
        while let Some(pending) = self.pop_due(target_ms) {
            self.clock.set(pending.due.max(self.clock.now_ms()));
            match pending.kind {
                PendingKind::Once(task) => task(),
                PendingKind::Every(period, task) => {
                    task();
                    self.push(pending.due + i64::from(period), PendingKind::Every(period, task));
                }
            }
        }
        if self.clock.now_ms() < target_ms {
            self.clock.set(target_ms);
        }
    }

    fn pop_due(&self, target_ms: i64) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target_ms)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(queue.swap_remove(index))
    }

    fn push(&self, due: i64, kind: PendingKind) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(Pending { due, seq, kind });
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay_ms: u32, task: Task) {
        self.push(self.clock.now_ms() + i64::from(delay_ms), PendingKind::Once(task));
    }

    fn schedule_every(&self, period_ms: u32, task: RepeatingTask) {
        // A zero period would never let `run_until` finish.
        let period_ms = period_ms.max(1);
        self.push(
            self.clock.now_ms() + i64::from(period_ms),
            PendingKind::Every(period_ms, task),
        );
    }
}
