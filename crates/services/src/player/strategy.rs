//! Interchangeable ways of stopping playback at a segment's end.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use lingo_core::model::Segment;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::host::VideoHost;
use crate::config::{PlayerConfig, StopStrategyKind};

/// Arms a single pending pause for the segment being played.
///
/// Arming again replaces the previous trigger; at most one is ever live.
pub trait StopStrategy: Send + fmt::Debug {
    fn arm(&mut self, host: Arc<dyn VideoHost>, segment: Segment);
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
}

#[must_use]
pub fn build_strategy(config: &PlayerConfig) -> Box<dyn StopStrategy> {
    match config.stop_strategy {
        StopStrategyKind::Poll => Box::new(PollStrategy::new(config.poll_interval)),
        StopStrategyKind::Timer => Box::new(TimerStrategy::new()),
    }
}

/// Exclusively owned background stop task, aborted on replace and drop.
#[derive(Debug, Default)]
struct StopTask(Option<JoinHandle<()>>);

impl StopTask {
    fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.0 = Some(handle);
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }

    fn is_live(&self) -> bool {
        self.0.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for StopTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Reads the playhead every `interval` and pauses once it reaches the end.
#[derive(Debug)]
pub struct PollStrategy {
    interval: Duration,
    task: StopTask,
}

impl PollStrategy {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: StopTask::default(),
        }
    }
}

impl StopStrategy for PollStrategy {
    fn arm(&mut self, host: Arc<dyn VideoHost>, segment: Segment) {
        let interval = self.interval;
        debug!(end = segment.end, ?interval, "arming poll stop");
        self.task.replace(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let at = host.current_time();
                if at >= segment.end {
                    host.pause_video();
                    debug!(end = segment.end, at, "segment end reached");
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        self.task.cancel();
    }

    fn is_armed(&self) -> bool {
        self.task.is_live()
    }
}

/// Pauses once, `end - start` after arming.
///
/// Does not account for buffering before playback actually starts.
#[derive(Debug, Default)]
pub struct TimerStrategy {
    task: StopTask,
}

impl TimerStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StopStrategy for TimerStrategy {
    fn arm(&mut self, host: Arc<dyn VideoHost>, segment: Segment) {
        let delay = Duration::try_from_secs_f64(segment.duration()).unwrap_or_default();
        debug!(end = segment.end, ?delay, "arming timer stop");
        self.task.replace(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            host.pause_video();
            debug!(end = segment.end, "segment timer fired");
        }));
    }

    fn cancel(&mut self) {
        self.task.cancel();
    }

    fn is_armed(&self) -> bool {
        self.task.is_live()
    }
}
