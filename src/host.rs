//! The rendering and timer capability a carousel is driven through.
//!
//! The controller in [`crate::carousel`] never touches a browser. Everything
//! it needs from the page (reading the frame width, moving the tape,
//! highlighting a dot, arming timers) goes through [`CarouselHost`]. The
//! browser binding lives in `web` (feature `web`); tests and the CLI use
//! [`crate::sim::SimulatedHost`].
//!
//! ## Callbacks
//!
//! A host hands out a [`TimerId`] for every scheduled timer and later reports
//! the expiry by calling [`Carousel::on_timer`](crate::carousel::Carousel::on_timer)
//! with that id. An [`TimerKind::Autoplay`] timer repeats at its period until
//! canceled; the other kinds fire once. When an animated render finishes, the
//! host calls [`Carousel::transition_end`](crate::carousel::Carousel::transition_end).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Whether a position change is animated or applied instantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Animated,
    Instant,
}

/// What a scheduled timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Repeating slideshow tick.
    Autoplay,
    /// One-shot safety net that clears a lock whose transition never completed.
    FallbackUnlock,
    /// One-shot switch back to animated rendering after a boundary teleport.
    RestoreTransition,
}

impl TimerKind {
    /// Only autoplay timers keep firing until canceled.
    pub fn repeats(self) -> bool {
        matches!(self, TimerKind::Autoplay)
    }
}

/// Opaque handle for a scheduled timer, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Page-side operations the carousel controller depends on.
pub trait CarouselHost {
    /// Current pixel width of the visible frame (the width of one slide).
    fn viewport_width(&self) -> f64;

    /// Size the tape to `track_width` and every slide to `slide_width`.
    fn render_width(&mut self, track_width: f64, slide_width: f64);

    /// Move the tape so that `offset` pixels are scrolled past.
    fn render_position(&mut self, offset: f64, motion: Motion);

    /// Switch the rendering mode without moving the tape.
    fn set_motion(&mut self, motion: Motion);

    /// Mark dot `real_index` as the active one and clear the others.
    fn highlight_dot(&mut self, real_index: usize);

    /// Reflect the autoplay state on the play/pause affordance.
    fn show_autoplay(&mut self, playing: bool);

    /// Arm a timer that fires after `after` (and every `after` for autoplay).
    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId;

    /// Disarm a timer. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// CSS `transform` value placing the tape at `offset` pixels.
pub fn translate_x(offset: f64) -> String {
    format!("translateX(-{}px)", offset)
}

/// CSS `transition` value for an animated move.
pub fn transition_css(duration: Duration, easing: &str) -> String {
    format!("transform {}s {}", duration.as_secs_f64(), easing)
}
