use std::fmt;
use std::sync::Arc;

use lingo_core::model::Segment;
use tracing::{debug, info};

use super::host::VideoHost;
use super::strategy::{StopStrategy, build_strategy};
use crate::config::PlayerConfig;

/// Plays one `[start, end)` window of the host video and stops there.
///
/// Holds no host until [`SegmentPlayer::on_ready`]; playback requests made
/// before that are dropped.
pub struct SegmentPlayer {
    host: Option<Arc<dyn VideoHost>>,
    segment: Option<Segment>,
    strategy: Box<dyn StopStrategy>,
}

impl SegmentPlayer {
    #[must_use]
    pub fn new(strategy: Box<dyn StopStrategy>) -> Self {
        Self {
            host: None,
            segment: None,
            strategy,
        }
    }

    #[must_use]
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(build_strategy(config))
    }

    /// The host widget finished loading.
    pub fn on_ready(&mut self, host: Arc<dyn VideoHost>) {
        debug!("video host ready");
        self.host = Some(host);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.host.is_some()
    }

    #[must_use]
    pub fn host(&self) -> Option<&Arc<dyn VideoHost>> {
        self.host.as_ref()
    }

    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    #[must_use]
    pub fn is_stop_armed(&self) -> bool {
        self.strategy.is_armed()
    }

    pub fn set_segment(&mut self, segment: Segment) {
        self.segment = Some(segment);
    }

    /// Seek to the segment start, play, and arm the stop at its end.
    ///
    /// Safe to call repeatedly: the previous stop trigger is cancelled first.
    pub fn play_section(&mut self) {
        let Some(host) = self.host.clone() else {
            debug!("play_section before host ready; ignored");
            return;
        };
        let Some(segment) = self.segment else {
            debug!("play_section without a segment; ignored");
            return;
        };

        self.strategy.cancel();
        info!(start = segment.start, end = segment.end, "playing segment");
        host.seek_to(segment.start, true);
        host.play_video();
        self.strategy.arm(host, segment);
    }

    /// Set `segment` and play it.
    pub fn play(&mut self, segment: Segment) {
        self.set_segment(segment);
        self.play_section();
    }

    /// Cancel any outstanding stop trigger.
    pub fn teardown(&mut self) {
        if self.strategy.is_armed() {
            debug!("cancelling pending segment stop");
        }
        self.strategy.cancel();
    }
}

impl Drop for SegmentPlayer {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for SegmentPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentPlayer")
            .field("ready", &self.host.is_some())
            .field("segment", &self.segment)
            .field("strategy", &self.strategy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StopStrategyKind;
    use crate::player::{HostCall, SimulatedVideo};
    use std::time::Duration;

    fn ready_player(kind: StopStrategyKind) -> (SegmentPlayer, Arc<SimulatedVideo>) {
        let video = Arc::new(SimulatedVideo::new());
        let mut player =
            SegmentPlayer::from_config(&PlayerConfig::default().with_stop_strategy(kind));
        player.on_ready(video.clone());
        (player, video)
    }

    #[tokio::test(start_paused = true)]
    async fn calls_before_ready_are_ignored() {
        let mut player = SegmentPlayer::from_config(&PlayerConfig::default());
        player.play(Segment::new(0.0, 1.0));
        assert!(!player.is_stop_armed());

        let video = Arc::new(SimulatedVideo::new());
        player.on_ready(video.clone());
        assert!(video.calls().is_empty());

        player.play_section();
        assert_eq!(
            video.calls(),
            vec![
                HostCall::Seek { seconds: 0.0, allow_seek_ahead: true },
                HostCall::Play,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn plays_exactly_the_window() {
        for kind in [StopStrategyKind::Poll, StopStrategyKind::Timer] {
            let (mut player, video) = ready_player(kind);
            player.play(Segment::new(30.0, 32.5));
            tokio::time::sleep(Duration::from_secs(10)).await;

            assert_eq!(video.pause_count(), 1, "{kind}");
            let at = video.current_time();
            assert!((32.5..32.6).contains(&at), "{kind} paused at {at}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn second_play_section_cancels_the_first_stop() {
        for kind in [StopStrategyKind::Poll, StopStrategyKind::Timer] {
            let (mut player, video) = ready_player(kind);
            player.play(Segment::new(0.0, 5.0));
            tokio::time::sleep(Duration::from_secs(1)).await;
            player.play(Segment::new(10.0, 12.0));
            tokio::time::sleep(Duration::from_secs(20)).await;

            assert_eq!(video.pause_count(), 1, "{kind}");
            let at = video.current_time();
            assert!((12.0..12.1).contains(&at), "{kind} paused at {at}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_leaves_no_pending_stop() {
        let (mut player, video) = ready_player(StopStrategyKind::Timer);
        player.play(Segment::new(0.0, 2.0));
        drop(player);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(video.pause_count(), 0);
    }
}
