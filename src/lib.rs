//! # Simple Carousel
//!
//! An infinite-loop image carousel: a strip of slides that scrolls one
//! picture at a time with an animated slide, wraps seamlessly from the last
//! slide to the first (and back), and advances on its own until paused.
//! Your filesystem is the data source: the images in a directory become the
//! slides, ordered by numeric prefix.
//!
//! # Architecture: Controller Behind a Host
//!
//! The carousel logic is a plain state machine that never touches a page.
//! Everything observable (moving the tape, highlighting a dot, arming a
//! timer) goes through the [`host::CarouselHost`] trait:
//!
//! ```text
//!   page events ──▶ input::Input ──▶ carousel::Carousel ──▶ host::CarouselHost
//!                                          ▲                      │
//!                                          └──── timers fire ─────┘
//! ```
//!
//! Two hosts ship with the crate: [`sim::SimulatedHost`] runs on a virtual
//! clock for tests and the `simulate` command, and `web::WebHost` (feature
//! `web`) drives a real DOM from WebAssembly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`track`] | Extended-track geometry: boundary clones, index mapping, loop targets |
//! | [`carousel`] | The controller: navigation, locking, loop settling, autoplay, recovery |
//! | [`host`] | The `CarouselHost` trait plus render and timer vocabulary |
//! | [`input`] | Click/key/touch/lifecycle events mapped onto controller operations |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`slides`] | Slide discovery from a directory (`NNN-name` ordering, alt text) |
//! | [`markup`] | The carousel's DOM contract rendered with Maud |
//! | [`sim`] | Virtual-clock host and scripted scenarios with traces |
//! | [`output`] | CLI output formatting for slides, renders, and traces |
//! | `web` | Browser binding (feature `web`): DOM host and event wiring |
//!
//! # Design Decisions
//!
//! ## Clones Instead of Rewinding
//!
//! The tape carries a copy of the last slide in front and a copy of the
//! first slide behind. Moving past either end animates onto the copy, then
//! jumps without animation to the real slide showing the same picture, so
//! the wrap looks like one continuous step. See [`track`].
//!
//! ## Drop, Don't Queue
//!
//! While a transition is in flight every navigation request is ignored.
//! A single flag plus a fallback timer keeps the controller from ever
//! stacking animations, and the fallback guarantees it cannot stay locked
//! if the browser never reports the end of a transition (hidden tab,
//! interrupted animation).
//!
//! ## Maud Over Template Engines
//!
//! Markup is generated with [Maud](https://maud.lambda.xyz/): malformed HTML
//! is a build error and every interpolated alt text is escaped.

pub mod carousel;
pub mod config;
pub mod host;
pub mod input;
pub mod markup;
pub mod output;
pub mod sim;
pub mod slides;
pub mod track;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
