//! Hover and touch playback controllers for video previews.
//!
//! A controller owns one [`VideoPlaybackState`] and mutates it only from its
//! own handlers and timers. Timer callbacks keep a weak reference, so a pending
//! timer never keeps a detached video alive.

use crate::config::VideoConfig;
use crate::handlers::{InteractionHandlerSet, InteractionKind};
use crate::media_element::MediaElement;
use common::SiteError;
use dom::{Event, EventCallback, NodeId};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;
use web_apis::{Navigator, TimerApi, TimerHandle};

/// Playback bookkeeping for one rendered video.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoPlaybackState {
    pub has_played: bool,
    pub has_ended: bool,
    pub hover_timer: Option<TimerHandle>,
    pub long_press_timer: Option<TimerHandle>,
    pub has_replayed: bool,
}

/// Which input model drives a video.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Hover,
    Touch,
}

impl InteractionMode {
    pub fn detect(navigator: &Navigator) -> Self {
        if navigator.is_touch_device() {
            InteractionMode::Touch
        } else {
            InteractionMode::Hover
        }
    }
}

/// A video playback controller bound to one element.
pub trait InteractionStrategy: Send + Sync {
    fn mode(&self) -> InteractionMode;

    /// Snapshot of the current playback state.
    fn state(&self) -> VideoPlaybackState;

    fn element(&self) -> &Arc<MediaElement>;

    /// The video reached its end.
    fn ended(&self);

    /// Handlers for the card hosting the video. Built once with the
    /// controller; every call returns the same callbacks.
    fn handlers(&self) -> InteractionHandlerSet;
}

/// Create the controller for `mode`.
pub fn create_strategy(
    mode: InteractionMode,
    video: NodeId,
    element: Arc<MediaElement>,
    timers: Arc<dyn TimerApi>,
    config: VideoConfig,
) -> Arc<dyn InteractionStrategy> {
    match mode {
        InteractionMode::Hover => Arc::new(HoverInteraction::new(video, element, timers, config)),
        InteractionMode::Touch => Arc::new(TouchInteraction::new(video, element, timers, config)),
    }
}

struct PlaybackCore {
    video: NodeId,
    element: Arc<MediaElement>,
    state: Mutex<VideoPlaybackState>,
    timers: Arc<dyn TimerApi>,
    config: VideoConfig,
}

impl PlaybackCore {
    fn new(
        video: NodeId,
        element: Arc<MediaElement>,
        timers: Arc<dyn TimerApi>,
        config: VideoConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            video,
            element,
            state: Mutex::new(VideoPlaybackState::default()),
            timers,
            config,
        })
    }

    /// Request playback. Rejections leave the element paused and are not errors.
    fn play(&self) {
        match self.element.play() {
            Ok(()) => debug!(video = ?self.video, "playback started"),
            Err(err) => {
                let err = SiteError::from(err);
                debug!(video = ?self.video, %err, "play request rejected");
            }
        }
    }

    /// Back to idle: pending timers cancelled, rewound and paused.
    fn reset(&self, state: &mut VideoPlaybackState) {
        self.cancel(&mut state.hover_timer);
        self.cancel(&mut state.long_press_timer);
        self.element.set_current_time(Duration::ZERO);
        self.element.pause();
        state.has_played = false;
        state.has_ended = false;
        debug!(video = ?self.video, "playback reset");
    }

    fn cancel(&self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.timers.clear_timeout(handle);
        }
    }

    fn schedule(
        self: &Arc<Self>,
        delay: Duration,
        on_fire: fn(&PlaybackCore),
    ) -> TimerHandle {
        let weak: Weak<PlaybackCore> = Arc::downgrade(self);
        self.timers.set_timeout(
            delay,
            Box::new(move || {
                if let Some(core) = weak.upgrade() {
                    on_fire(&core);
                }
            }),
        )
    }

    fn mark_ended(&self) {
        self.state.lock().has_ended = true;
        debug!(video = ?self.video, "playback ended");
    }

    /// Wrap a transition as an event listener holding its own reference to the core.
    fn listener(self: &Arc<Self>, transition: fn(&Arc<PlaybackCore>, &mut Event)) -> EventCallback {
        let core = self.clone();
        Arc::new(move |event: &mut Event| transition(&core, event))
    }
}

/// Desktop controller: play after the pointer rests on the card.
#[derive(Clone)]
pub struct HoverInteraction {
    core: Arc<PlaybackCore>,
    handlers: InteractionHandlerSet,
}

impl HoverInteraction {
    pub fn new(
        video: NodeId,
        element: Arc<MediaElement>,
        timers: Arc<dyn TimerApi>,
        config: VideoConfig,
    ) -> Self {
        let core = PlaybackCore::new(video, element, timers, config);
        let handlers = InteractionHandlerSet::new()
            .with_handler(InteractionKind::PointerEnter, core.listener(|core, _| Self::enter(core)))
            .with_handler(InteractionKind::PointerLeave, core.listener(|core, _| Self::leave(core)));
        Self { core, handlers }
    }

    pub fn pointer_enter(&self) {
        Self::enter(&self.core);
    }

    pub fn pointer_leave(&self) {
        Self::leave(&self.core);
    }

    fn enter(core: &Arc<PlaybackCore>) {
        let mut state = core.state.lock();
        if state.has_played {
            return;
        }
        core.cancel(&mut state.hover_timer);
        state.hover_timer = Some(core.schedule(core.config.hover_delay, Self::hover_elapsed));
    }

    fn leave(core: &Arc<PlaybackCore>) {
        let mut state = core.state.lock();
        core.reset(&mut state);
    }

    fn hover_elapsed(core: &PlaybackCore) {
        let mut state = core.state.lock();
        state.hover_timer = None;
        if state.has_played {
            return;
        }
        state.has_played = true;
        core.play();
    }
}

impl InteractionStrategy for HoverInteraction {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Hover
    }

    fn state(&self) -> VideoPlaybackState {
        self.core.state.lock().clone()
    }

    fn element(&self) -> &Arc<MediaElement> {
        &self.core.element
    }

    fn ended(&self) {
        self.core.mark_ended();
    }

    fn handlers(&self) -> InteractionHandlerSet {
        self.handlers.clone()
    }
}

/// Touch controller: autoplay when scrolled into view, hold to replay.
#[derive(Clone)]
pub struct TouchInteraction {
    core: Arc<PlaybackCore>,
    handlers: InteractionHandlerSet,
}

impl TouchInteraction {
    pub fn new(
        video: NodeId,
        element: Arc<MediaElement>,
        timers: Arc<dyn TimerApi>,
        config: VideoConfig,
    ) -> Self {
        let core = PlaybackCore::new(video, element, timers, config);
        let visible = core.clone();
        let handlers = InteractionHandlerSet::new()
            .with_handler(InteractionKind::TouchStart, core.listener(|core, _| Self::start(core)))
            .with_handler(InteractionKind::TouchEnd, core.listener(Self::end))
            .with_handler(InteractionKind::TouchCancel, core.listener(|core, _| Self::cancel(core)))
            .with_visibility(
                core.config.intersection_threshold,
                Arc::new(move |is_intersecting| Self::visibility(&visible, is_intersecting)),
            );
        Self { core, handlers }
    }

    pub fn visibility_changed(&self, is_intersecting: bool) {
        Self::visibility(&self.core, is_intersecting);
    }

    pub fn touch_start(&self) {
        Self::start(&self.core);
    }

    /// Ends the gesture. A gesture that triggered a replay suppresses its default action.
    pub fn touch_end(&self, event: &mut Event) {
        Self::end(&self.core, event);
    }

    pub fn touch_cancel(&self) {
        Self::cancel(&self.core);
    }

    fn visibility(core: &Arc<PlaybackCore>, is_intersecting: bool) {
        let mut state = core.state.lock();
        if is_intersecting {
            if !state.has_played {
                state.has_played = true;
                core.play();
            }
        } else {
            core.reset(&mut state);
        }
    }

    fn start(core: &Arc<PlaybackCore>) {
        let mut state = core.state.lock();
        state.has_replayed = false;
        if !state.has_ended {
            return;
        }
        core.cancel(&mut state.long_press_timer);
        state.long_press_timer = Some(core.schedule(core.config.long_press, Self::long_press_elapsed));
    }

    fn end(core: &Arc<PlaybackCore>, event: &mut Event) {
        let mut state = core.state.lock();
        core.cancel(&mut state.long_press_timer);
        if state.has_replayed {
            event.prevent_default();
        }
    }

    fn cancel(core: &Arc<PlaybackCore>) {
        let mut state = core.state.lock();
        core.cancel(&mut state.long_press_timer);
    }

    fn long_press_elapsed(core: &PlaybackCore) {
        let mut state = core.state.lock();
        state.long_press_timer = None;
        core.element.set_current_time(Duration::ZERO);
        core.play();
        state.has_ended = false;
        state.has_replayed = true;
        debug!(video = ?core.video, "replayed after long press");
    }
}

impl InteractionStrategy for TouchInteraction {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Touch
    }

    fn state(&self) -> VideoPlaybackState {
        self.core.state.lock().clone()
    }

    fn element(&self) -> &Arc<MediaElement> {
        &self.core.element
    }

    fn ended(&self) {
        self.core.mark_ended();
    }

    fn handlers(&self) -> InteractionHandlerSet {
        self.handlers.clone()
    }
}
