use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;

/// The embedded video widget, as far as segment playback needs it.
///
/// Calls mirror the widget's own API and cannot fail; a widget that is not
/// ready is simply never handed to the player.
pub trait VideoHost: Send + Sync {
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool);
    fn play_video(&self);
    fn pause_video(&self);
    /// Playhead position in seconds.
    fn current_time(&self) -> f64;
}

/// A command received by [`SimulatedVideo`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCall {
    Seek { seconds: f64, allow_seek_ahead: bool },
    Play,
    Pause,
}

#[derive(Debug, Default)]
struct PlaybackState {
    position: f64,
    playing_since: Option<Instant>,
    calls: Vec<HostCall>,
}

impl PlaybackState {
    fn now(&self) -> f64 {
        match self.playing_since {
            Some(since) => self.position + since.elapsed().as_secs_f64(),
            None => self.position,
        }
    }
}

/// In-process video whose playhead follows tokio's clock.
///
/// Used by the terminal front-end and by tests running on a paused clock.
#[derive(Debug, Default)]
pub struct SimulatedVideo {
    state: Mutex<PlaybackState>,
}

impl SimulatedVideo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.lock().playing_since.is_some()
    }

    /// Every command received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, HostCall::Pause))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VideoHost for SimulatedVideo {
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) {
        let mut state = self.lock();
        state.position = seconds.max(0.0);
        if state.playing_since.is_some() {
            state.playing_since = Some(Instant::now());
        }
        state.calls.push(HostCall::Seek {
            seconds,
            allow_seek_ahead,
        });
    }

    fn play_video(&self) {
        let mut state = self.lock();
        if state.playing_since.is_none() {
            state.playing_since = Some(Instant::now());
        }
        state.calls.push(HostCall::Play);
    }

    fn pause_video(&self) {
        let mut state = self.lock();
        state.position = state.now();
        state.playing_since = None;
        state.calls.push(HostCall::Pause);
    }

    fn current_time(&self) -> f64 {
        self.lock().now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn playhead_follows_the_clock_while_playing() {
        let video = SimulatedVideo::new();
        video.seek_to(10.0, true);
        assert_eq!(video.current_time(), 10.0);

        video.play_video();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!((video.current_time() - 11.5).abs() < 1e-9);

        video.pause_video();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!((video.current_time() - 11.5).abs() < 1e-9);
        assert!(!video.is_playing());
        assert_eq!(video.pause_count(), 1);
    }
}
