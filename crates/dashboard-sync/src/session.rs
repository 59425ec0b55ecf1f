//! Auto-trade session control.

use dashboard_core::{Fault, SessionPhase, SessionRequest, TickOutcome, TradingService};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::view_model::{read_view, write_view, SharedViewModel};

/// One decrement of `remaining` per wall-clock second.
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Starts and stops remote auto-trading and runs the local countdown.
///
/// Owns at most one countdown task. Every path that leaves `Running` cancels
/// it before the next one can be created.
pub struct AutoTradeController {
    service: Arc<dyn TradingService>,
    view: SharedViewModel,
    countdown: Option<JoinHandle<()>>,
}

impl AutoTradeController {
    pub fn new(service: Arc<dyn TradingService>, view: SharedViewModel) -> Self {
        Self {
            service,
            view,
            countdown: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        read_view(&self.view).session.phase
    }

    pub fn remaining(&self) -> Option<u64> {
        read_view(&self.view).session.remaining
    }

    /// Whether a countdown task is alive.
    pub fn has_live_timer(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start a session when idle, stop it when running.
    ///
    /// A failed start leaves the session idle. A stop always ends idle with
    /// the countdown cancelled, even when the remote call faults; the fault
    /// is still returned.
    pub async fn toggle(&mut self, request: &SessionRequest) -> Result<SessionPhase, Fault> {
        if self.phase() == SessionPhase::Running {
            self.stop().await
        } else {
            self.start(request).await
        }
    }

    async fn start(&mut self, request: &SessionRequest) -> Result<SessionPhase, Fault> {
        let symbols = request.validate()?;

        self.service
            .start_auto_trade(request.duration, request.unit, &symbols)
            .await?;

        self.cancel_countdown();
        write_view(&self.view)
            .session
            .begin(symbols.clone(), request.duration, request.unit);
        self.countdown = Some(tokio::spawn(run_countdown(self.view.clone())));

        info!(
            duration = request.duration,
            unit = %request.unit,
            symbols = ?symbols,
            "Auto-trade session started"
        );
        Ok(SessionPhase::Running)
    }

    async fn stop(&mut self) -> Result<SessionPhase, Fault> {
        let (duration, unit, symbols) = {
            let vm = read_view(&self.view);
            (vm.session.duration, vm.session.unit, vm.session.symbols.clone())
        };

        let result = self
            .service
            .stop_auto_trade(duration, unit, &symbols)
            .await;

        self.cancel_countdown();
        write_view(&self.view).session.stop();

        match result {
            Ok(_) => {
                info!("Auto-trade session stopped");
                Ok(SessionPhase::Idle)
            }
            Err(fault) => {
                warn!(error = %fault, "Remote stop failed; session stopped locally");
                Err(fault)
            }
        }
    }

    /// Wait until the current countdown ends on its own.
    ///
    /// Returns at once when no session is running.
    pub async fn finished(&mut self) {
        if let Some(handle) = self.countdown.as_mut() {
            let _ = handle.await;
            self.countdown = None;
        }
    }

    fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
            debug!("Countdown cancelled");
        }
    }
}

/// Leaves the shared view idle. The remote session is not stopped; it ends
/// on its own when its duration runs out.
impl Drop for AutoTradeController {
    fn drop(&mut self) {
        if self.countdown.is_some() {
            self.cancel_countdown();
            write_view(&self.view).session.stop();
        }
    }
}

async fn run_countdown(view: SharedViewModel) {
    let mut ticker = interval_at(Instant::now() + COUNTDOWN_TICK, COUNTDOWN_TICK);
    loop {
        ticker.tick().await;
        let outcome = write_view(&view).session.tick();
        match outcome {
            TickOutcome::Counting(left) => debug!(remaining = left, "Auto-trade countdown"),
            TickOutcome::Expired => {
                info!("Auto-trade session expired");
                break;
            }
            TickOutcome::Inactive => break,
        }
    }
}
