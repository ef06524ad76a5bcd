//! Event adapters: turn page events into carousel operations.
//!
//! Hosts translate raw browser events into [`Input`] values and feed them to
//! [`Carousel::handle`]. The translation rules live here so every host (the
//! browser binding, the simulator) applies them identically:
//!
//! - clicks are delegated: the closest ancestor carrying one of the control
//!   classes decides what was clicked ([`Control::from_classes`])
//! - `ArrowLeft`/`ArrowRight` navigate; the default scroll is suppressed only
//!   when a transition actually started
//! - a single-finger horizontal swipe longer than the threshold navigates
//!   ([`SwipeTracker`])

use crate::carousel::{Carousel, Direction, Navigation};
use crate::host::CarouselHost;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Class names of the clickable controls.
pub const PREVIOUS_CLASS: &str = "previous-btn";
pub const NEXT_CLASS: &str = "next-btn";
pub const DOT_CLASS: &str = "dot";
pub const PLAY_CLASS: &str = "play-btn";

/// CSS selector matching any clickable control, for delegated lookups.
pub const CONTROL_SELECTOR: &str = ".previous-btn, .next-btn, .dot, .play-btn";

/// A clickable carousel control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Previous,
    Next,
    /// Dot for real slide index `n`.
    Dot(usize),
    PlayPause,
}

impl Control {
    /// Classify an element from its `class` attribute and `data-index`.
    ///
    /// A dot without a parseable index is not a control.
    pub fn from_classes(class_attr: &str, data_index: Option<&str>) -> Option<Self> {
        let has = |name: &str| class_attr.split_whitespace().any(|c| c == name);
        if has(PREVIOUS_CLASS) {
            Some(Control::Previous)
        } else if has(NEXT_CLASS) {
            Some(Control::Next)
        } else if has(DOT_CLASS) {
            data_index
                .and_then(|i| i.trim().parse().ok())
                .map(Control::Dot)
        } else if has(PLAY_CLASS) {
            Some(Control::PlayPause)
        } else {
            None
        }
    }
}

/// Map a `KeyboardEvent.key` value to a direction.
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Previous),
        "ArrowRight" => Some(Direction::Next),
        _ => None,
    }
}

/// Every page event the carousel reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Click(Control),
    Key(String),
    /// Client X of every active touch point.
    TouchStart(Vec<f64>),
    TouchMove(Vec<f64>),
    TouchEnd,
    Resize,
    VisibilityChange { visible: bool },
    Focus,
    TransitionEnd,
}

/// What handling an [`Input`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// Outcome of the navigation the input asked for, if it asked for one.
    pub navigation: Option<Navigation>,
    /// The host should cancel the event's default action.
    pub prevent_default: bool,
}

impl Response {
    fn navigated(navigation: Navigation) -> Self {
        Self {
            navigation: Some(navigation),
            prevent_default: false,
        }
    }
}

/// Horizontal single-finger swipe detection.
///
/// Start and latest X positions are recorded only while exactly one finger
/// is down; [`touch_end`](Self::touch_end) decides and resets.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
    end_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
            end_x: None,
        }
    }

    pub fn touch_start(&mut self, touches: &[f64]) {
        if let [x] = touches {
            self.start_x = Some(*x);
            self.end_x = None;
        }
    }

    pub fn touch_move(&mut self, touches: &[f64]) {
        if let [x] = touches {
            self.end_x = Some(*x);
        }
    }

    /// Finish the gesture. Leftward travel means next, rightward previous.
    pub fn touch_end(&mut self) -> Option<Direction> {
        match (self.start_x.take(), self.end_x.take()) {
            (Some(start), Some(end)) => {
                let delta = end - start;
                if delta.abs() > self.threshold {
                    Some(if delta < 0.0 {
                        Direction::Next
                    } else {
                        Direction::Previous
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl<H: CarouselHost> Carousel<H> {
    /// Apply one page event.
    pub fn handle(&mut self, input: Input) -> Response {
        trace!(?input, "input");
        match input {
            Input::Click(Control::Previous) => Response::navigated(self.navigate(Direction::Previous)),
            Input::Click(Control::Next) => Response::navigated(self.navigate(Direction::Next)),
            Input::Click(Control::Dot(target)) => Response::navigated(self.go_to(target)),
            Input::Click(Control::PlayPause) => {
                self.toggle_autoplay();
                Response::default()
            }
            Input::Key(key) => match key_direction(&key) {
                Some(direction) => {
                    let navigation = self.navigate(direction);
                    Response {
                        navigation: Some(navigation),
                        prevent_default: navigation.started(),
                    }
                }
                None => Response::default(),
            },
            Input::TouchStart(touches) => {
                self.swipe.touch_start(&touches);
                Response::default()
            }
            Input::TouchMove(touches) => {
                self.swipe.touch_move(&touches);
                Response::default()
            }
            Input::TouchEnd => match self.swipe.touch_end() {
                Some(direction) => Response::navigated(self.navigate(direction)),
                None => Response::default(),
            },
            Input::Resize => {
                self.resize();
                Response::default()
            }
            Input::VisibilityChange { visible: true } | Input::Focus => {
                self.regain_visibility();
                Response::default()
            }
            Input::VisibilityChange { visible: false } => Response::default(),
            Input::TransitionEnd => {
                self.transition_end();
                Response::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_buttons() {
        assert_eq!(Control::from_classes("previous-btn", None), Some(Control::Previous));
        assert_eq!(Control::from_classes("btn next-btn icon", None), Some(Control::Next));
        assert_eq!(Control::from_classes("play-btn", None), Some(Control::PlayPause));
        assert_eq!(Control::from_classes("dot dot-filled", Some("3")), Some(Control::Dot(3)));
    }

    #[test]
    fn classify_requires_whole_class_names() {
        assert_eq!(Control::from_classes("dots-box", Some("1")), None);
        assert_eq!(Control::from_classes("next-btn-wrapper", None), None);
    }

    #[test]
    fn dot_without_index_is_not_a_control() {
        assert_eq!(Control::from_classes("dot", None), None);
        assert_eq!(Control::from_classes("dot", Some("x")), None);
    }

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(key_direction("ArrowLeft"), Some(Direction::Previous));
        assert_eq!(key_direction("ArrowRight"), Some(Direction::Next));
        assert_eq!(key_direction("ArrowUp"), None);
        assert_eq!(key_direction("Enter"), None);
    }

    #[test]
    fn swipe_left_beyond_threshold_is_next() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.touch_start(&[300.0]);
        swipe.touch_move(&[260.0]);
        swipe.touch_move(&[240.0]);
        assert_eq!(swipe.touch_end(), Some(Direction::Next));
    }

    #[test]
    fn swipe_right_beyond_threshold_is_previous() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.touch_start(&[100.0]);
        swipe.touch_move(&[151.0]);
        assert_eq!(swipe.touch_end(), Some(Direction::Previous));
    }

    #[test]
    fn swipe_at_threshold_is_ignored() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.touch_start(&[100.0]);
        swipe.touch_move(&[50.0]);
        assert_eq!(swipe.touch_end(), None);
    }

    #[test]
    fn tap_without_move_is_ignored() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.touch_start(&[100.0]);
        assert_eq!(swipe.touch_end(), None);
    }

    #[test]
    fn multi_finger_touches_are_ignored() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.touch_start(&[100.0, 300.0]);
        swipe.touch_move(&[0.0, 200.0]);
        assert_eq!(swipe.touch_end(), None);
    }

    #[test]
    fn touch_end_resets_tracking() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.touch_start(&[300.0]);
        swipe.touch_move(&[100.0]);
        assert!(swipe.touch_end().is_some());
        swipe.touch_move(&[0.0]);
        assert_eq!(swipe.touch_end(), None);
    }
}
