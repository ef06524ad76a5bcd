//! The carousel controller: a two-phase state machine.
//!
//! ```text
//!            navigate / go_to / autoplay tick
//!   Settled ─────────────────────────────────▶ Transitioning
//!      ▲                                            │
//!      └────────────────────────────────────────────┘
//!        transition end | fallback unlock | resize | focus/visibility regain
//! ```
//!
//! While `Transitioning` every navigation request is dropped (not queued),
//! so at most one slide animation is in flight. Leaving `Transitioning`
//! always settles the position on a real slide: if the animation landed on
//! one of the boundary clones, the controller jumps to the matching real
//! slide without animation. See [`crate::track`] for the geometry.
//!
//! All page access goes through the injected [`CarouselHost`].

use crate::config::CarouselConfig;
use crate::host::{CarouselHost, Motion, TimerId, TimerKind};
use crate::input::SwipeTracker;
use crate::track::Track;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CarouselError {
    #[error("a carousel needs at least one slide")]
    NoSlides,
}

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Previous,
    Next,
}

/// Whether a transition is in flight. `Transitioning` is the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Settled,
    Transitioning,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// A transition started from track position `from` to `to`.
    Started { from: usize, to: usize },
    /// Dropped because another transition is in flight.
    Locked,
    /// The requested slide is already shown.
    AlreadyShown,
    /// The requested slide does not exist.
    OutOfRange,
}

impl Navigation {
    pub fn started(&self) -> bool {
        matches!(self, Navigation::Started { .. })
    }
}

/// Timings copied out of [`CarouselConfig`] at construction.
#[derive(Debug, Clone, Copy)]
struct Timing {
    interval: Duration,
    fallback_unlock: Duration,
    restore_delay: Duration,
}

/// One carousel instance bound to a host.
#[derive(Debug)]
pub struct Carousel<H: CarouselHost> {
    host: H,
    track: Track,
    timing: Timing,
    pub(crate) swipe: SwipeTracker,
    index: usize,
    phase: Phase,
    autoplay: bool,
    autoplay_timer: Option<TimerId>,
    unlock_timer: Option<TimerId>,
    restore_timer: Option<TimerId>,
}

impl<H: CarouselHost> Carousel<H> {
    /// Build a carousel over `slide_count` slides and render its initial state.
    ///
    /// Sizes the tape, snaps to the first real slide without animation,
    /// highlights dot 0, reflects the autoplay state and arms the slideshow
    /// timer when autoplay is enabled.
    pub fn new(host: H, slide_count: usize, config: &CarouselConfig) -> Result<Self, CarouselError> {
        let track = Track::new(slide_count).ok_or(CarouselError::NoSlides)?;
        let mut carousel = Self {
            host,
            track,
            timing: Timing {
                interval: config.autoplay.interval(),
                fallback_unlock: config.transition.fallback_unlock(),
                restore_delay: config.transition.restore_delay(),
            },
            swipe: SwipeTracker::new(config.swipe.threshold_px),
            index: track.first(),
            phase: Phase::Settled,
            autoplay: config.autoplay.enabled,
            autoplay_timer: None,
            unlock_timer: None,
            restore_timer: None,
        };
        carousel.render_width();
        carousel.render(Motion::Instant);
        carousel.highlight();
        carousel.host.show_autoplay(carousel.autoplay);
        carousel.restart_autoplay();
        debug!(slides = slide_count, autoplay = carousel.autoplay, "carousel ready");
        Ok(carousel)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn track(&self) -> Track {
        self.track
    }

    /// Position on the extended track (`0..=N+1`).
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Index of the slide currently shown (`0..N`).
    pub fn real_index(&self) -> usize {
        self.track.real_index(self.index)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.phase == Phase::Transitioning
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move one slide in `direction`, restarting the slideshow countdown.
    pub fn navigate(&mut self, direction: Direction) -> Navigation {
        if self.is_locked() {
            trace!(?direction, "navigation dropped: transition in flight");
            return Navigation::Locked;
        }
        let to = match direction {
            Direction::Next => self.index + 1,
            Direction::Previous => self.index - 1,
        };
        let navigation = self.begin_transition(to);
        self.restart_autoplay();
        navigation
    }

    /// Jump to real slide `target` (a dot click).
    pub fn go_to(&mut self, target: usize) -> Navigation {
        if self.is_locked() {
            trace!(target, "dot navigation dropped: transition in flight");
            return Navigation::Locked;
        }
        let Some(to) = self.track.position_of(target) else {
            return Navigation::OutOfRange;
        };
        if target == self.real_index() {
            return Navigation::AlreadyShown;
        }
        let navigation = self.begin_transition(to);
        self.restart_autoplay();
        navigation
    }

    /// Slideshow tick. Skipped silently while a transition is in flight.
    pub fn autoplay_tick(&mut self) -> Navigation {
        if self.is_locked() {
            return Navigation::Locked;
        }
        self.begin_transition(self.index + 1)
    }

    fn begin_transition(&mut self, to: usize) -> Navigation {
        let from = self.index;
        self.phase = Phase::Transitioning;
        self.index = to;
        self.render(Motion::Animated);
        self.highlight();
        self.arm_fallback_unlock();
        debug!(from, to, real = self.real_index(), "transition started");
        Navigation::Started { from, to }
    }

    // =========================================================================
    // Completion and recovery
    // =========================================================================

    /// The animation started by the last navigation has finished.
    ///
    /// Landing on a boundary clone triggers the instant jump to the real
    /// slide; animation is switched back on after the restore delay.
    pub fn transition_end(&mut self) {
        if let Some(target) = self.track.settle_target(self.index) {
            debug!(from = self.index, to = target, "loop jump");
            self.index = target;
            self.render(Motion::Instant);
            if let Some(id) = self.restore_timer.take() {
                self.host.cancel(id);
            }
            self.restore_timer = Some(
                self.host
                    .schedule(TimerKind::RestoreTransition, self.timing.restore_delay),
            );
        }
        self.unlock();
    }

    /// Clear a lock whose completion was never reported.
    pub fn force_unlock(&mut self) {
        if self.is_locked() {
            warn!(index = self.index, "transition end not observed, forcing unlock");
        }
        self.snap();
        self.unlock();
    }

    /// The viewport changed size: re-measure, snap, unlock, restart autoplay.
    pub fn resize(&mut self) {
        self.render_width();
        self.snap();
        self.unlock();
        self.restart_autoplay();
    }

    /// The page became visible again or the window regained focus.
    ///
    /// Timers and animation callbacks may have been suspended meanwhile, so
    /// any in-flight state is discarded rather than trusted.
    pub fn regain_visibility(&mut self) {
        self.snap();
        self.unlock();
        self.highlight();
        self.restart_autoplay();
    }

    // =========================================================================
    // Autoplay
    // =========================================================================

    /// Flip the slideshow on or off. Returns the new state.
    ///
    /// The timer is always re-armed with a full interval, so switching
    /// autoplay on never advances immediately.
    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        self.host.show_autoplay(self.autoplay);
        self.restart_autoplay();
        debug!(autoplay = self.autoplay, "autoplay toggled");
        self.autoplay
    }

    fn restart_autoplay(&mut self) {
        if let Some(id) = self.autoplay_timer.take() {
            self.host.cancel(id);
        }
        if self.autoplay {
            self.autoplay_timer = Some(self.host.schedule(TimerKind::Autoplay, self.timing.interval));
        }
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Dispatch an expired timer. Ids this carousel no longer tracks are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> Option<Navigation> {
        if self.autoplay_timer == Some(id) {
            return Some(self.autoplay_tick());
        }
        if self.unlock_timer == Some(id) {
            self.force_unlock();
        } else if self.restore_timer == Some(id) {
            self.restore_timer = None;
            self.host.set_motion(Motion::Animated);
        } else {
            trace!(%id, "stale timer ignored");
        }
        None
    }

    fn arm_fallback_unlock(&mut self) {
        if let Some(id) = self.unlock_timer.take() {
            self.host.cancel(id);
        }
        self.unlock_timer = Some(
            self.host
                .schedule(TimerKind::FallbackUnlock, self.timing.fallback_unlock),
        );
    }

    fn unlock(&mut self) {
        if let Some(id) = self.unlock_timer.take() {
            self.host.cancel(id);
        }
        self.phase = Phase::Settled;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Move off a clone (if needed) and render the position without animation.
    fn snap(&mut self) {
        if let Some(target) = self.track.settle_target(self.index) {
            self.index = target;
        }
        self.render(Motion::Instant);
    }

    fn render(&mut self, motion: Motion) {
        let offset = self.host.viewport_width() * self.index as f64;
        self.host.render_position(offset, motion);
    }

    fn render_width(&mut self) {
        let slide_width = self.host.viewport_width();
        let track_width = slide_width * self.track.extended_len() as f64;
        self.host.render_width(track_width, slide_width);
    }

    fn highlight(&mut self) {
        let real = self.real_index();
        self.host.highlight_dot(real);
    }
}
