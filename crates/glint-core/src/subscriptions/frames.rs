use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Default frame rate for [`AnimationFrames`].
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// A frame-paced clock, the runtime's counterpart to
/// `requestAnimationFrame`.
///
/// Each frame emits the current [`Instant`]. Consumers should derive motion
/// from elapsed time rather than counting frames: late frames are skipped,
/// not queued.
///
/// The `key` separates concurrent loops, typically one per widget instance.
///
/// # Example
///
/// ```rust,ignore
/// use glint_core::subscription::subscribe;
/// use glint_core::subscriptions::AnimationFrames;
///
/// let sub = subscribe(AnimationFrames::new(self.instance)).map(Msg::Frame);
/// ```
pub struct AnimationFrames {
    /// Time between frames.
    pub interval: Duration,
    /// Distinguishes this loop from others of the same type.
    pub key: u64,
}

impl AnimationFrames {
    /// A loop at [`DEFAULT_FRAME_RATE`].
    pub fn new(key: u64) -> Self {
        Self::with_rate(key, DEFAULT_FRAME_RATE)
    }

    /// A loop at `fps` frames per second (at least one).
    pub fn with_rate(key: u64, fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            key,
        }
    }
}

impl SubscriptionSource for AnimationFrames {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.key)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let stream = tokio_stream::wrappers::IntervalStream::new(interval)
            .map(|tick| tick.into_std());
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_sets_interval() {
        let frames = AnimationFrames::with_rate(1, 50);
        assert_eq!(frames.interval, Duration::from_millis(20));
    }

    #[test]
    fn zero_rate_is_clamped() {
        let frames = AnimationFrames::with_rate(1, 0);
        assert_eq!(frames.interval, Duration::from_secs(1));
    }

    #[test]
    fn keys_separate_ids() {
        assert_ne!(AnimationFrames::new(1).id(), AnimationFrames::new(2).id());
        assert_eq!(AnimationFrames::new(3).id(), AnimationFrames::new(3).id());
    }

    #[tokio::test]
    async fn emits_increasing_instants() {
        let mut stream = AnimationFrames::with_rate(9, 100).stream();
        let first = stream.next().await;
        let second = stream.next().await;
        match (first, second) {
            (Some(a), Some(b)) => assert!(b > a),
            _ => panic!("frame stream ended early"),
        }
    }
}
