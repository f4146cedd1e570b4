//! Cancellable timers backed by tokio tasks.
//!
//! [`Debouncer`] runs the most recently scheduled job after a quiet period;
//! [`RepeatTimer`] runs a job on a fixed period until cancelled. Both abort
//! their task on `cancel()` and on drop, so a torn-down owner never leaves a
//! recurring callback behind. Both must be used inside a tokio runtime.

use std::{future::Future, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Holds at most one spawned timer task.
#[derive(Debug, Default)]
struct TimerSlot {
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.handle = Some(handle);
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: TimerSlot,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: TimerSlot::default() }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending job with `job`, to run once `delay` passes without
    /// another call.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        self.slot.replace(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        }));
    }

    pub fn cancel(&mut self) {
        self.slot.cancel();
    }

    /// True while a job is waiting or running.
    pub fn is_active(&self) -> bool {
        self.slot.is_active()
    }
}

#[derive(Debug)]
pub struct RepeatTimer {
    period: Duration,
    slot: TimerSlot,
}

impl RepeatTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, slot: TimerSlot::default() }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run `tick` every `period`, first after one full period. Restarting
    /// cancels the previous loop.
    pub fn start<F, Fut>(&mut self, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = self.period;
        self.slot.replace(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A slow tick pushes the schedule back instead of bursting.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                tick().await;
            }
        }));
    }

    pub fn cancel(&mut self) {
        self.slot.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_active()
    }
}
