//! Arm/disarm-able tick sources that drive the exam countdown.
//!
//! The controller never sleeps. A scheduler delivers [`Tick`] tokens to
//! whoever owns the controller, and the owner feeds them back through
//! `SessionController::handle_tick`. Each arm call carries a generation
//! number so a tick that was already in flight when the session ended can be
//! recognised and dropped.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Default countdown cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One countdown signal, stamped with the generation that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// A periodic signal source bound to the lifetime of one exam session.
pub trait TickScheduler: Send {
    /// Start emitting ticks for `generation`, replacing any previous arming.
    fn arm(&mut self, generation: u64);

    /// Stop emitting ticks. Idempotent.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;
}

//
// ─── TOKIO INTERVAL ────────────────────────────────────────────────────────────
//

/// Emits ticks from a tokio interval task onto an unbounded channel.
///
/// `arm` must be called from within a tokio runtime.
pub struct IntervalScheduler {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    /// Create a scheduler and the receiving end its ticks arrive on.
    #[must_use]
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            period,
            tx,
            task: None,
        };
        (scheduler, rx)
    }
}

impl TickScheduler for IntervalScheduler {
    fn arm(&mut self, generation: u64) {
        self.disarm();

        let period = self.period;
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, ?period, "countdown armed");
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("countdown disarmed");
        }
    }

    fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

//
// ─── MANUAL ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct ManualState {
    armed: Option<u64>,
    arm_calls: usize,
    disarm_calls: usize,
}

/// Scheduler that never fires on its own.
///
/// Tests drive the countdown by calling `tick`/`handle_tick` directly and use
/// a cloned handle to observe arming.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation currently armed, if any.
    #[must_use]
    pub fn armed_generation(&self) -> Option<u64> {
        self.state().armed
    }

    /// A tick for the armed generation, as a real scheduler would deliver it.
    #[must_use]
    pub fn next_tick(&self) -> Option<Tick> {
        self.armed_generation().map(|generation| Tick { generation })
    }

    #[must_use]
    pub fn arm_calls(&self) -> usize {
        self.state().arm_calls
    }

    #[must_use]
    pub fn disarm_calls(&self) -> usize {
        self.state().disarm_calls
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self, generation: u64) {
        let mut state = self.state();
        state.armed = Some(generation);
        state.arm_calls += 1;
    }

    fn disarm(&mut self) {
        let mut state = self.state();
        state.armed = None;
        state.disarm_calls += 1;
    }

    fn is_armed(&self) -> bool {
        self.state().armed.is_some()
    }
}
