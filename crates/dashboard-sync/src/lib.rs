//! Polling, reconciliation and session control for the crypto dashboard.
//!
//! - [`PollingScheduler`] runs independently timed poll tasks.
//! - [`TradeLogReconciler`] decides when a new trade log invalidates positions.
//! - [`AutoTradeController`] drives one bounded auto-trading session.
//! - [`Dashboard`] wires the account, profit and trade feeds into a
//!   [`DashboardViewModel`].

mod actions;
mod feeds;
mod reconciler;
mod scheduler;
mod session;
mod view_model;

#[cfg(test)]
mod testing;

pub use actions::{BuyTicket, UserActions};
pub use feeds::{Dashboard, PollCadence};
pub use reconciler::{reconcile, Reconciliation, TradeLogReconciler};
pub use scheduler::{PollTask, PollingScheduler, SchedulerHandle};
pub use session::AutoTradeController;
pub use view_model::{read_view, write_view, DashboardViewModel, FeedStamps, SharedViewModel};
