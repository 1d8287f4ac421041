//! Alarm scheduling for boundary-aligned hourly playback.
//!
//! The scheduler aligns the first alarm to a fixed minute-of-hour boundary
//! (e.g. minute 50), then repeats on a fixed interval until cancelled. Delay
//! computation is pure integer arithmetic; the armed alarms are tokio tasks
//! whose handles are owned by an [`AlarmScheduler`] value.
//!
//! An `AlarmScheduler` is not a global: the session that arms it owns it and
//! hands it back when the bot leaves, so a repeated `join` can never strand a
//! live timer behind a lost handle. Arming an alarm cancels any still-pending
//! alarm of the same kind for the same reason.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};

/// Delay used when the current minute is already exactly on the boundary.
///
/// A near-immediate fire, not "wait a full hour".
pub const IMMEDIATE_FIRE: Duration = Duration::from_millis(1000);

/// How the initial delay is computed when the boundary for this hour has
/// already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Reproduce the historical arithmetic: for a current minute `m` past the
    /// boundary `b`, wait `b + (m - b)` minutes, which is `m` minutes and
    /// generally does not land on the boundary. Kept as the default so
    /// behavior matches deployments that relied on it.
    Compat,
    /// Wait until the boundary of the next hour: `(60 - m) + b` minutes.
    NextHour,
}

/// Computes the delay from the current minute-of-hour to the next alarm.
///
/// Pure arithmetic at minute granularity; the only sub-minute value is the
/// [`IMMEDIATE_FIRE`] case when `minute_of_hour == boundary_minute`.
///
/// # Arguments
/// - `minute_of_hour` - current wall-clock minute, 0-59
/// - `boundary_minute` - target minute-of-hour, 0-59
/// - `alignment` - arithmetic used once the boundary has passed this hour
pub fn initial_delay(minute_of_hour: u32, boundary_minute: u32, alignment: Alignment) -> Duration {
    debug_assert!(minute_of_hour < 60);
    debug_assert!(boundary_minute < 60);

    if minute_of_hour < boundary_minute {
        minutes(boundary_minute - minute_of_hour)
    } else if minute_of_hour > boundary_minute {
        match alignment {
            Alignment::Compat => minutes(boundary_minute + (minute_of_hour - boundary_minute)),
            Alignment::NextHour => minutes(60 - minute_of_hour + boundary_minute),
        }
    } else {
        IMMEDIATE_FIRE
    }
}

fn minutes(n: u32) -> Duration {
    Duration::from_secs(u64::from(n) * 60)
}

/// Owns at most one pending one-shot alarm and one repeating alarm.
///
/// Alarms run as tokio tasks; cancelling aborts the task. Dropping the
/// scheduler cancels everything it armed.
#[derive(Debug, Default)]
pub struct AlarmScheduler {
    one_shot: Option<JoinHandle<()>>,
    repeating: Option<JoinHandle<()>>,
}

impl AlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot alarm that invokes `on_fire` once after `delay`.
    ///
    /// A still-pending one-shot alarm is cancelled before the new one is
    /// armed, so at most one can ever be live.
    pub fn arm<F, Fut>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.one_shot.take() {
            handle.abort();
        }
        self.one_shot = Some(tokio::spawn(async move {
            sleep(delay).await;
            tracing::debug!("one-shot alarm fired");
            on_fire().await;
        }));
    }

    /// Arms a repeating alarm that invokes `on_fire` every `period`,
    /// starting one full `period` after arming.
    ///
    /// Same single-alarm rule as [`AlarmScheduler::arm`].
    pub fn arm_repeating<F, Fut>(&mut self, period: Duration, mut on_fire: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.repeating.take() {
            handle.abort();
        }
        self.repeating = Some(tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            loop {
                timer.tick().await;
                tracing::debug!("repeating alarm fired");
                on_fire().await;
            }
        }));
    }

    /// Cancels whichever alarms are currently armed.
    ///
    /// Idempotent; cancelling with nothing armed is a no-op.
    pub fn cancel_all(&mut self) {
        if let Some(handle) = self.one_shot.take() {
            handle.abort();
        }
        if let Some(handle) = self.repeating.take() {
            handle.abort();
        }
    }
}

impl Drop for AlarmScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
