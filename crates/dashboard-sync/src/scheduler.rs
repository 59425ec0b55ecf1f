//! Independently timed repeating poll tasks.
//!
//! Each task fires one period after start, then once per period. A task's
//! callback never overlaps itself: ticks that come due while the previous
//! invocation is still in flight are skipped, and the cadence resumes on the
//! next period boundary. Tasks never wait on one another.
//!
//! Each run receives the scheduler's cancellation token. `stop()` cancels it
//! before aborting anything, so a task that checks the token while holding
//! its write guard never applies a result once `stop()` has returned, even
//! when it is polled on another worker thread.

use async_trait::async_trait;
use dashboard_core::error::Fault;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A repeating fetch-and-apply operation.
#[async_trait]
pub trait PollTask: Send + Sync {
    /// Run one poll. Faults are logged by the scheduler and never stop the task.
    ///
    /// Nothing may be applied once `cancel` has fired.
    async fn run(&self, cancel: &CancellationToken) -> Result<(), Fault>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

struct ScheduledTask {
    task: Arc<dyn PollTask>,
    period: Duration,
}

/// Builder for a set of poll tasks.
#[derive(Default)]
pub struct PollingScheduler {
    tasks: Vec<ScheduledTask>,
}

impl PollingScheduler {
    /// Smallest accepted period.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task that runs every `period`.
    pub fn every(mut self, period: Duration, task: Arc<dyn PollTask>) -> Self {
        self.tasks.push(ScheduledTask {
            task,
            period: period.max(Self::MIN_PERIOD),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Start every timer. The returned handle owns them.
    pub fn start(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let handles: Vec<JoinHandle<()>> = self
            .tasks
            .into_iter()
            .map(|scheduled| tokio::spawn(run_task(scheduled, token.child_token())))
            .collect();

        info!(tasks = handles.len(), "Polling scheduler started");
        SchedulerHandle { token, handles }
    }
}

async fn run_task(scheduled: ScheduledTask, token: CancellationToken) {
    let ScheduledTask { task, period } = scheduled;
    let mut next = Instant::now() + period;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = sleep_until(next) => {}
        }

        // Race the callback against shutdown so a late response is dropped
        // instead of applied.
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(task = %task.name(), "Dropping in-flight poll on shutdown");
                break;
            }
            result = task.run(&token) => {
                if let Err(fault) = result {
                    warn!(task = %task.name(), error = %fault, "Poll task failed");
                }
            }
        }

        next += period;
        let now = Instant::now();
        let mut skipped = 0u32;
        while next < now {
            next += period;
            skipped += 1;
        }
        if skipped > 0 {
            debug!(task = %task.name(), skipped, "Skipped ticks while poll was in flight");
        }
    }
}

/// Owner of a running set of poll tasks.
///
/// Dropping the handle stops every task, so teardown cannot leak timers.
pub struct SchedulerHandle {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Cancel every owned timer. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        info!("Polling scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn task_count(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
