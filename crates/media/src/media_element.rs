//! HTMLMediaElement playback surface.

use common::SiteError;
use parking_lot::RwLock;
use std::time::Duration;

/// Whether the environment lets media start without a user gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutoplayPolicy {
    /// Any play request is honored.
    #[default]
    Allowed,
    /// Only muted media may start on its own.
    AllowedMuted,
    /// Every play request is rejected.
    Blocked,
}

#[derive(Debug)]
struct PlaybackFlags {
    current_time: Duration,
    paused: bool,
    ended: bool,
    muted: bool,
    play_requests: u32,
    error: Option<MediaError>,
}

/// Playback surface of a rendered `<video>`.
///
/// Shared between the resolver and the interaction strategy bound to the same
/// node, so every mutation goes through interior locking.
#[derive(Debug)]
pub struct MediaElement {
    src: String,
    policy: AutoplayPolicy,
    flags: RwLock<PlaybackFlags>,
}

impl MediaElement {
    /// Create a muted, paused element for `src`.
    pub fn new(src: &str, policy: AutoplayPolicy) -> Self {
        Self {
            src: src.to_string(),
            policy,
            flags: RwLock::new(PlaybackFlags {
                current_time: Duration::ZERO,
                paused: true,
                ended: false,
                muted: true,
                play_requests: 0,
                error: None,
            }),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn policy(&self) -> AutoplayPolicy {
        self.policy
    }

    pub fn current_time(&self) -> Duration {
        self.flags.read().current_time
    }

    /// Seek. Seeking clears `ended`.
    pub fn set_current_time(&self, time: Duration) {
        let mut flags = self.flags.write();
        flags.current_time = time;
        flags.ended = false;
    }

    pub fn paused(&self) -> bool {
        self.flags.read().paused
    }

    pub fn ended(&self) -> bool {
        self.flags.read().ended
    }

    pub fn muted(&self) -> bool {
        self.flags.read().muted
    }

    pub fn set_muted(&self, muted: bool) {
        self.flags.write().muted = muted;
    }

    /// Number of times `play` was called, honored or not.
    pub fn play_requests(&self) -> u32 {
        self.flags.read().play_requests
    }

    /// The most recent rejection, cleared by the next successful `play`.
    pub fn error(&self) -> Option<MediaError> {
        self.flags.read().error.clone()
    }

    /// Request playback under the element's autoplay policy.
    pub fn play(&self) -> Result<(), MediaError> {
        let mut flags = self.flags.write();
        flags.play_requests += 1;

        let allowed = match self.policy {
            AutoplayPolicy::Allowed => true,
            AutoplayPolicy::AllowedMuted => flags.muted,
            AutoplayPolicy::Blocked => false,
        };
        if !allowed {
            flags.error = Some(MediaError::NotAllowed);
            return Err(MediaError::NotAllowed);
        }

        flags.error = None;
        flags.paused = false;
        flags.ended = false;
        Ok(())
    }

    pub fn pause(&self) {
        self.flags.write().paused = true;
    }

    /// Playback reached the end of the resource.
    pub fn finish(&self) {
        let mut flags = self.flags.write();
        flags.paused = true;
        flags.ended = true;
    }
}

/// Media error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("Play request not allowed by the autoplay policy")]
    NotAllowed,
}

impl From<MediaError> for SiteError {
    fn from(err: MediaError) -> Self {
        SiteError::playback_rejected(err.to_string())
    }
}
