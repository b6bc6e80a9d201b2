//! Bounded fixed-interval polling of a background task.
//!
//! [`PollTracker`] is the state machine: it counts observations and decides
//! when polling is over. [`poll_task`] drives it, and is generic over the
//! status fetch and the sleep so the browser can plug in `gloo-timers` while
//! tests use an instant sleep.
//!
//! One interval between fetches with no backoff or jitter, and at most
//! `max_attempts` fetches.

use log::debug;
use std::future::Future;
use std::time::Duration;

use super::TaskStatus;
use crate::config::ClientConfig;

/// Interval and attempt budget of a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollConfig {
    /// A budget of zero attempts is raised to one so a loop always fetches.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Interval in whole milliseconds, saturated to fit browser timers.
    pub fn interval_millis(&self) -> u32 {
        u32::try_from(self.interval.as_millis()).unwrap_or(u32::MAX)
    }
}

impl From<&ClientConfig> for PollConfig {
    fn from(config: &ClientConfig) -> Self {
        PollConfig::new(
            Duration::from_millis(u64::from(config.poll_interval_ms)),
            config.max_poll_attempts,
        )
    }
}

/// How a polling loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// `SUCCESS` observed.
    Succeeded,
    /// `FAILURE` or `REVOKED` observed.
    Failed,
    /// Budget exhausted without a terminal state.
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Keep polling after another interval.
    Wait,
    Finished(PollOutcome),
}

#[derive(Debug, Clone)]
pub struct PollTracker {
    max_attempts: u32,
    attempts: u32,
    outcome: Option<PollOutcome>,
}

impl PollTracker {
    pub fn new(config: &PollConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            attempts: 0,
            outcome: None,
        }
    }

    /// Records one observed status.
    ///
    /// After the tracker has finished, further observations are ignored and
    /// the original outcome is returned again.
    pub fn observe(&mut self, status: &TaskStatus) -> PollStep {
        if let Some(outcome) = self.outcome {
            return PollStep::Finished(outcome);
        }
        self.attempts += 1;

        let outcome = if status.is_success() {
            Some(PollOutcome::Succeeded)
        } else if status.is_failure() {
            Some(PollOutcome::Failed)
        } else if self.attempts >= self.max_attempts {
            Some(PollOutcome::TimedOut)
        } else {
            None
        };

        match outcome {
            Some(outcome) => {
                debug!(
                    "polling finished after {} attempt(s): {:?} ({})",
                    self.attempts, outcome, status
                );
                self.outcome = Some(outcome);
                PollStep::Finished(outcome)
            }
            None => PollStep::Wait,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    pub fn outcome(&self) -> Option<PollOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Polls a task until it reaches a terminal state or the budget runs out.
///
/// Each round sleeps one interval, checks `is_cancelled`, then fetches the
/// status. `on_tick` runs after every non-terminal observation with the
/// attempt number. A fetch error ends the loop and is returned as is.
///
/// Returns `Ok(None)` when the caller cancelled the loop.
pub async fn poll_task<E, Fetch, FetchFut, Sleep, SleepFut, Tick, Cancelled>(
    config: &PollConfig,
    mut fetch: Fetch,
    mut sleep: Sleep,
    mut on_tick: Tick,
    is_cancelled: Cancelled,
) -> Result<Option<PollOutcome>, E>
where
    Fetch: FnMut() -> FetchFut,
    FetchFut: Future<Output = Result<TaskStatus, E>>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
    Tick: FnMut(u32, &TaskStatus),
    Cancelled: Fn() -> bool,
{
    let mut tracker = PollTracker::new(config);
    loop {
        sleep(config.interval).await;
        if is_cancelled() {
            debug!("polling cancelled after {} attempt(s)", tracker.attempts());
            return Ok(None);
        }

        let status = fetch().await?;
        match tracker.observe(&status) {
            PollStep::Wait => on_tick(tracker.attempts(), &status),
            PollStep::Finished(outcome) => return Ok(Some(outcome)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::future::ready;

    fn config(max_attempts: u32) -> PollConfig {
        PollConfig::new(Duration::from_millis(3000), max_attempts)
    }

    /// Runs `poll_task` against a scripted sequence of statuses; the last
    /// status repeats once the script is exhausted.
    async fn run_script(
        max_attempts: u32,
        script: &[TaskStatus],
    ) -> (Option<PollOutcome>, u32, Vec<u32>) {
        let queue = RefCell::new(script.iter().cloned().collect::<VecDeque<_>>());
        let last = script.last().cloned().unwrap_or(TaskStatus::Pending);
        let fetches = Cell::new(0u32);
        let mut ticks = Vec::new();

        let outcome = poll_task::<(), _, _, _, _, _, _>(
            &config(max_attempts),
            || {
                fetches.set(fetches.get() + 1);
                let next = queue.borrow_mut().pop_front().unwrap_or(last.clone());
                ready(Ok(next))
            },
            |_| ready(()),
            |attempt, _| ticks.push(attempt),
            || false,
        )
        .await
        .unwrap();

        (outcome, fetches.get(), ticks)
    }

    #[rstest]
    #[case(&[TaskStatus::Pending, TaskStatus::Started, TaskStatus::Success], Some(PollOutcome::Succeeded), 3)]
    #[case(&[TaskStatus::Success], Some(PollOutcome::Succeeded), 1)]
    #[case(&[TaskStatus::Started, TaskStatus::Failure], Some(PollOutcome::Failed), 2)]
    #[case(&[TaskStatus::Pending, TaskStatus::Revoked], Some(PollOutcome::Failed), 2)]
    #[case(&[TaskStatus::Pending], Some(PollOutcome::TimedOut), 5)]
    #[tokio::test]
    async fn stops_on_first_terminal_state_within_budget(
        #[case] script: &[TaskStatus],
        #[case] expected: Option<PollOutcome>,
        #[case] expected_fetches: u32,
    ) {
        let (outcome, fetches, _) = run_script(5, script).await;

        assert_eq!(outcome, expected);
        assert_eq!(fetches, expected_fetches);
        assert!(fetches <= 5);
    }

    #[tokio::test]
    async fn never_fetches_past_success_even_with_more_script() {
        let (outcome, fetches, ticks) = run_script(
            10,
            &[
                TaskStatus::Started,
                TaskStatus::Success,
                TaskStatus::Failure,
                TaskStatus::Pending,
            ],
        )
        .await;

        assert_eq!(outcome, Some(PollOutcome::Succeeded));
        assert_eq!(fetches, 2);
        assert_eq!(ticks, vec![1]);
    }

    #[tokio::test]
    async fn ticks_once_per_non_terminal_observation() {
        let (_, _, ticks) = run_script(
            4,
            &[TaskStatus::Pending, TaskStatus::Started, TaskStatus::Retry],
        )
        .await;

        // The fourth observation exhausts the budget and is not a tick.
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn sleeps_one_interval_before_each_fetch() {
        let sleeps = RefCell::new(Vec::new());

        poll_task::<(), _, _, _, _, _, _>(
            &config(3),
            || ready(Ok(TaskStatus::Pending)),
            |interval| {
                sleeps.borrow_mut().push(interval);
                ready(())
            },
            |_, _| {},
            || false,
        )
        .await
        .unwrap();

        assert_eq!(sleeps.into_inner(), vec![Duration::from_millis(3000); 3]);
    }

    #[tokio::test]
    async fn cancellation_stops_before_the_next_fetch() {
        let fetches = Cell::new(0u32);

        let outcome = poll_task::<(), _, _, _, _, _, _>(
            &config(10),
            || {
                fetches.set(fetches.get() + 1);
                ready(Ok(TaskStatus::Started))
            },
            |_| ready(()),
            |_, _| {},
            || fetches.get() >= 2,
        )
        .await
        .unwrap();

        assert_eq!(outcome, None);
        assert_eq!(fetches.get(), 2);
    }

    #[tokio::test]
    async fn fetch_error_ends_the_loop() {
        let fetches = Cell::new(0u32);

        let result = poll_task(
            &config(10),
            || {
                fetches.set(fetches.get() + 1);
                if fetches.get() == 2 {
                    ready(Err("gateway unreachable"))
                } else {
                    ready(Ok(TaskStatus::Pending))
                }
            },
            |_| ready(()),
            |_, _| {},
            || false,
        )
        .await;

        assert_eq!(result, Err("gateway unreachable"));
        assert_eq!(fetches.get(), 2);
    }

    #[test]
    fn tracker_ignores_observations_after_finishing() {
        let mut tracker = PollTracker::new(&config(2));

        assert_eq!(tracker.observe(&TaskStatus::Pending), PollStep::Wait);
        assert_eq!(
            tracker.observe(&TaskStatus::Started),
            PollStep::Finished(PollOutcome::TimedOut)
        );
        assert_eq!(
            tracker.observe(&TaskStatus::Success),
            PollStep::Finished(PollOutcome::TimedOut)
        );
        assert_eq!(tracker.attempts(), 2);
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn zero_budget_still_allows_one_attempt() {
        let config = PollConfig::new(Duration::from_secs(1), 0);
        let mut tracker = PollTracker::new(&config);

        assert_eq!(config.max_attempts, 1);
        assert_eq!(
            tracker.observe(&TaskStatus::Pending),
            PollStep::Finished(PollOutcome::TimedOut)
        );
    }

    #[test]
    fn config_follows_client_config() {
        let client = ClientConfig {
            poll_interval_ms: 1500,
            max_poll_attempts: 40,
            ..ClientConfig::default()
        };

        let config = PollConfig::from(&client);

        assert_eq!(config.interval_millis(), 1500);
        assert_eq!(config.max_attempts, 40);
    }
}
