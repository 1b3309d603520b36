//! A live countdown that re-evaluates once per second.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{domain::Countdown, storage::Clock};

const TICK: Duration = Duration::from_secs(1);

/// Owns the timer task behind a live countdown.
///
/// The task publishes a fresh [`Countdown`] every second until the target
/// passes. Dropping the ticker stops the task.
#[derive(Debug)]
pub struct Ticker {
    receiver: watch::Receiver<Countdown>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Starts counting down to `target`. Must be called within a tokio
    /// runtime.
    #[must_use]
    pub fn start(target: DateTime<Utc>, clock: Clock) -> Self {
        let initial = Countdown::at(target, clock());
        let (sender, receiver) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut interval = time::interval(TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let countdown = Countdown::at(target, clock());
                if sender.send(countdown).is_err() {
                    break;
                }
                if countdown.is_elapsed() {
                    tracing::debug!(%target, "Countdown elapsed");
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// The latest state.
    #[must_use]
    pub fn current(&self) -> Countdown {
        *self.receiver.borrow()
    }

    /// A receiver that observes every update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.receiver.clone()
    }

    /// Whether the timer task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
